#![allow(dead_code)]
//! Builders for synthetic font files.

use std::io::Write;

pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = tag.to_vec();
    v.extend((payload.len() as u32).to_le_bytes());
    v.extend(payload);
    if payload.len() % 2 == 1 {
        v.push(0);
    }
    v
}

pub fn list(list_type: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = list_type.to_vec();
    for child in children {
        payload.extend(child);
    }
    chunk(b"LIST", &payload)
}

pub fn container(magic: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut v = vec![0xFF, 0xFE];
    v.extend(magic);
    let size: usize = 4 + children.iter().map(Vec::len).sum::<usize>();
    v.extend((size as u32).to_le_bytes());
    v.extend(b"FHFT");
    for child in children {
        v.extend(child);
    }
    v
}

pub fn ftmt(version: u16, name: &str) -> Vec<u8> {
    let mut payload = version.to_le_bytes().to_vec();
    payload.extend((name.len() as u16).to_le_bytes());
    payload.extend(name.as_bytes());
    chunk(b"FTMT", &payload)
}

pub fn glmt(max_width: u16, height: u16) -> Vec<u8> {
    let mut payload = max_width.to_le_bytes().to_vec();
    payload.extend(height.to_le_bytes());
    chunk(b"GLMT", &payload)
}

pub fn cm1b(records: &[(u8, u16)]) -> Vec<u8> {
    let mut payload = vec![];
    for (code, gid) in records {
        payload.push(*code);
        payload.extend(gid.to_le_bytes());
    }
    chunk(b"CM1B", &payload)
}

pub fn glsp(first_gid: u16, glyphs: &[[u16; 3]]) -> Vec<u8> {
    let mut payload = first_gid.to_le_bytes().to_vec();
    payload.extend((first_gid + glyphs.len() as u16 - 1).to_le_bytes());
    payload.extend(3_u16.to_le_bytes());
    for glyph in glyphs {
        for column in glyph {
            payload.extend(column.to_le_bytes());
        }
    }
    chunk(b"GLSP", &payload)
}

pub fn font_with(version: u16, records: &[(u8, u16)]) -> Vec<u8> {
    container(
        b"RIFF",
        &[
            ftmt(version, "Demo"),
            glmt(3, 16),
            list(b"CMAP", &[cm1b(records)]),
            list(
                b"GLSP",
                &[glsp(1, &[[0xFFFF, 0x8001, 0xFFFF], [0, 0x0F0F, 0]])],
            ),
        ],
    )
}

/// A font with two glyphs: 'A' is a box and 'B' a single column.
pub fn demo_font() -> Vec<u8> {
    font_with(2, &[(b'A', 1), (b'B', 2)])
}

pub fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path.to_str().unwrap().to_string()
}
