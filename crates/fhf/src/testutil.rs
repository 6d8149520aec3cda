//! Builders for synthetic font files used in unit tests.

pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v: Vec<u8> = tag.to_vec();
    v.extend((payload.len() as u32).to_le_bytes());
    v.extend(payload);
    if payload.len() % 2 == 1 {
        v.push(0);
    }
    v
}

pub fn list(list_type: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload: Vec<u8> = list_type.to_vec();
    for child in children {
        payload.extend(child);
    }
    chunk(b"LIST", &payload)
}

pub fn container(form: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut v = vec![0xFF, 0xFE];
    v.extend(b"RIFF");
    let size: usize = 4 + children.iter().map(Vec::len).sum::<usize>();
    v.extend((size as u32).to_le_bytes());
    v.extend(form);
    for child in children {
        v.extend(child);
    }
    v
}

pub fn ftmt(version: u16, name: &str) -> Vec<u8> {
    let mut payload: Vec<u8> = version.to_le_bytes().to_vec();
    payload.extend((name.len() as u16).to_le_bytes());
    payload.extend(name.as_bytes());
    chunk(b"FTMT", &payload)
}

pub fn glmt(max_width: u16, height: u16) -> Vec<u8> {
    let mut payload: Vec<u8> = max_width.to_le_bytes().to_vec();
    payload.extend(height.to_le_bytes());
    chunk(b"GLMT", &payload)
}

/// Builds a character map chunk with `code_width` byte codes.
///
/// Records are written in the order given.
pub fn cmap(code_width: usize, records: &[(u32, u16)]) -> Vec<u8> {
    let tag: [u8; 4] = [b'C', b'M', b'0' + code_width as u8, b'B'];
    let mut payload = vec![];
    for (code, gid) in records {
        payload.extend(&code.to_le_bytes()[..code_width]);
        payload.extend(gid.to_le_bytes());
    }
    chunk(&tag, &payload)
}

/// Builds a glyph span chunk; `glyphs` holds one column vector per glyph.
pub fn glsp(first_gid: u16, width: u16, glyphs: &[Vec<u16>]) -> Vec<u8> {
    let last_gid = first_gid + glyphs.len() as u16 - 1;
    let mut payload: Vec<u8> = first_gid.to_le_bytes().to_vec();
    payload.extend(last_gid.to_le_bytes());
    payload.extend(width.to_le_bytes());
    for glyph in glyphs {
        assert_eq!(glyph.len(), width as usize);
        for column in glyph {
            payload.extend(column.to_le_bytes());
        }
    }
    chunk(b"GLSP", &payload)
}

/// A complete font laid out the way the font converter writes it.
pub fn font(cmaps: Vec<Vec<u8>>, spans: Vec<Vec<u8>>) -> Vec<u8> {
    container(
        b"FHFT",
        &[
            ftmt(2, "Test"),
            glmt(8, 16),
            list(b"CMAP", &cmaps),
            list(b"GLSP", &spans),
        ],
    )
}
