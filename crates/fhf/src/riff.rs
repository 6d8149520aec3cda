//! RIFF container framing
//!
//! The container starts with a 2 byte endianness marker followed by a standard
//!     little-endian RIFF header: the `RIFF` magic, the payload size and a form tag.
//! The payload is a sequence of chunks.
//! Every chunk is a 4 byte tag, a 4 byte size and `size` bytes of payload,
//!     followed by a single padding byte when `size` is odd.
//! `LIST` chunks hold further chunks; the first 4 bytes of their payload are
//!     the type of the list and count towards its size.
//!
//! All functions here operate on a seekable stream and leave it positioned
//!     as documented.
//! Nothing is buffered: the stream position is the only state.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{Error, FormatError, Tag};

/// The value the endianness marker must decode to in little-endian order.
pub const BYTE_ORDER_MARK: u16 = 0xFEFF;

/// Size of a chunk header (tag and size), in bytes.
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// The top-level header of the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Offset of the endianness marker.
    pub offset: u64,
    /// Declared payload size, which includes the form tag.
    pub size: u32,
    /// Application form tag.
    pub form: Tag,
}

impl ContainerHeader {
    /// Offset one past the last byte of the container.
    pub fn end(&self) -> u64 {
        self.offset + 2 + framed_size(self.size)
    }
}

/// Header of a single chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub tag: Tag,
    /// Declared payload size, excluding padding.
    pub size: u32,
    /// Offset of the chunk header in the file.
    pub offset: u64,
}

impl Chunk {
    /// Offset of the first payload byte.
    pub fn payload_start(&self) -> u64 {
        self.offset + CHUNK_HEADER_SIZE
    }

    /// Total number of bytes the chunk occupies, including header and padding.
    pub fn framed_size(&self) -> u64 {
        framed_size(self.size)
    }

    /// Offset one past the last byte of the chunk, padding included.
    pub fn end(&self) -> u64 {
        self.offset + self.framed_size()
    }
}

/// Returns the number of bytes a chunk with the given declared size occupies.
///
/// Chunks are 2-byte aligned, so chunks with an odd size carry one byte of padding.
pub fn framed_size(size: u32) -> u64 {
    let size = u64::from(size);
    CHUNK_HEADER_SIZE + size + size % 2
}

/// A chunk header as read from the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkHeader {
    Plain(Chunk),
    List { chunk: Chunk, list_type: Tag },
}

impl ChunkHeader {
    pub fn chunk(&self) -> &Chunk {
        match self {
            ChunkHeader::Plain(chunk) => chunk,
            ChunkHeader::List { chunk, .. } => chunk,
        }
    }
}

/// Reads the container header.
///
/// On success the stream is positioned at the first chunk.
/// If the header is invalid the stream is moved back to where it was when
///     the function was called.
pub fn open<R: Read + Seek>(stream: &mut R) -> Result<ContainerHeader, Error> {
    let offset = stream.stream_position()?;
    match read_container_header(stream, offset) {
        Err(Error::Format(err)) => {
            stream.seek(SeekFrom::Start(offset))?;
            Err(err.into())
        }
        result => result,
    }
}

fn read_container_header<R: Read>(stream: &mut R, offset: u64) -> Result<ContainerHeader, Error> {
    let truncated = || FormatError::TruncatedContainerHeader;
    let marker = eof_as(stream.read_u16::<LittleEndian>(), truncated)?;
    if marker != BYTE_ORDER_MARK {
        return Err(FormatError::ByteOrderMark(marker).into());
    }
    let magic = eof_as(read_tag(stream), truncated)?;
    if magic != Tag::RIFF {
        return Err(FormatError::Magic(magic).into());
    }
    let size = eof_as(stream.read_u32::<LittleEndian>(), truncated)?;
    let form = eof_as(read_tag(stream), truncated)?;
    Ok(ContainerHeader { offset, size, form })
}

/// Reads the header of the chunk at the current position.
///
/// For `LIST` chunks the list type is consumed too, leaving the stream at
///     the first child chunk.
/// For other chunks the stream is left at the first payload byte.
pub fn read_chunk_header<R: Read + Seek>(stream: &mut R) -> Result<ChunkHeader, Error> {
    let offset = stream.stream_position()?;
    let truncated = || FormatError::TruncatedChunkHeader { offset };
    let tag = eof_as(read_tag(stream), truncated)?;
    let size = eof_as(stream.read_u32::<LittleEndian>(), truncated)?;
    if tag == Tag::NULL {
        return Err(FormatError::NullChunk { offset }.into());
    }
    let chunk = Chunk { tag, size, offset };
    if tag == Tag::LIST {
        let list_type = eof_as(read_tag(stream), truncated)?;
        Ok(ChunkHeader::List { chunk, list_type })
    } else {
        Ok(ChunkHeader::Plain(chunk))
    }
}

/// Moves the stream past the chunk, padding included.
pub fn skip<S: Seek>(stream: &mut S, chunk: &Chunk) -> std::io::Result<()> {
    stream.seek(SeekFrom::Start(chunk.end()))?;
    Ok(())
}

/// Moves the stream to the first payload byte of the chunk.
pub fn rewind_into<S: Seek>(stream: &mut S, chunk: &Chunk) -> std::io::Result<()> {
    stream.seek(SeekFrom::Start(chunk.payload_start()))?;
    Ok(())
}

/// Moves the stream to the given offset within the chunk's payload.
///
/// The offset should be smaller than the chunk's declared size; this is not checked.
pub fn seek_within<S: Seek>(stream: &mut S, chunk: &Chunk, offset: u64) -> std::io::Result<()> {
    stream.seek(SeekFrom::Start(chunk.payload_start() + offset))?;
    Ok(())
}

/// Walks the chunks of a list payload.
///
/// The stream must be positioned just after the list type,
///     or, for the top-level container, just after the form tag.
/// `declared_size` is the declared size of the list, which counts the 4 byte type.
///
/// Every chunk header found is passed to `on_chunk` together with its nesting
///     depth (0 for direct children).
/// List chunks are reported before their children.
///
/// A malformed header aborts the walk.
/// Chunks reported before the failure were read correctly.
pub fn walk_list<R, F>(stream: &mut R, declared_size: u32, on_chunk: &mut F) -> Result<(), Error>
where
    R: Read + Seek,
    F: FnMut(&ChunkHeader, usize),
{
    walk_list_at_depth(stream, declared_size, 0, on_chunk)
}

fn walk_list_at_depth<R, F>(
    stream: &mut R,
    declared_size: u32,
    depth: usize,
    on_chunk: &mut F,
) -> Result<(), Error>
where
    R: Read + Seek,
    F: FnMut(&ChunkHeader, usize),
{
    let declared_size = u64::from(declared_size);
    let mut consumed: u64 = 4;
    while consumed < declared_size {
        let header = read_chunk_header(stream)?;
        consumed += header.chunk().framed_size();
        on_chunk(&header, depth);
        if let ChunkHeader::List { chunk, .. } = &header {
            walk_list_at_depth(stream, chunk.size, depth + 1, on_chunk)?;
        }
        skip(stream, header.chunk())?;
    }
    Ok(())
}

fn read_tag<R: Read>(stream: &mut R) -> std::io::Result<Tag> {
    let mut b = [0_u8; 4];
    stream.read_exact(&mut b)?;
    Ok(Tag(b))
}

/// Converts an unexpected end of file into the given format error.
fn eof_as<T, F>(result: std::io::Result<T>, err: F) -> Result<T, Error>
where
    F: FnOnce() -> FormatError,
{
    match result {
        Ok(t) => Ok(t),
        Err(io_err) if io_err.kind() == std::io::ErrorKind::UnexpectedEof => Err(err().into()),
        Err(io_err) => Err(io_err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use std::io::Cursor;

    macro_rules! framed_size_tests {
        ( $( ($name: ident, $size: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(framed_size($size), $want);
                }
            )+
        };
    }

    framed_size_tests!(
        (framed_size_empty, 0, 8),
        (framed_size_odd_1, 1, 10),
        (framed_size_even_2, 2, 10),
        (framed_size_odd_7, 7, 16),
        (framed_size_even_8, 8, 16),
        (framed_size_max, u32::MAX, 8 + u32::MAX as u64 + 1),
    );

    fn collect(b: Vec<u8>) -> (Result<(), Error>, Vec<(ChunkHeader, usize)>, u64, ContainerHeader) {
        let mut stream = Cursor::new(b);
        let header = open(&mut stream).unwrap();
        let mut seen = vec![];
        let result = walk_list(&mut stream, header.size, &mut |h, depth| seen.push((*h, depth)));
        (result, seen, stream.position(), header)
    }

    #[test]
    fn open_valid_header() {
        let b = container(b"FHFT", &[]);
        let mut stream = Cursor::new(b);
        let header = open(&mut stream).unwrap();
        assert_eq!(
            header,
            ContainerHeader {
                offset: 0,
                size: 4,
                form: Tag(*b"FHFT"),
            }
        );
        assert_eq!(stream.position(), 14);
        assert_eq!(header.end(), 14);
    }

    #[test]
    fn open_bad_byte_order_mark() {
        let mut b = container(b"FHFT", &[]);
        b.swap(0, 1);
        let mut stream = Cursor::new(b);
        let err = open(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::ByteOrderMark(0xFFFE))
        ));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn open_bad_magic_restores_position() {
        let mut b = vec![0xAA, 0xBB, 0xCC];
        let mut c = container(b"FHFT", &[]);
        c[2..6].copy_from_slice(b"RIFX");
        b.extend(c);
        let mut stream = Cursor::new(b);
        stream.set_position(3);
        let err = open(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::Magic(Tag(m))) if &m == b"RIFX"
        ));
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn open_truncated() {
        let mut stream = Cursor::new(vec![0xFF, 0xFE, b'R', b'I']);
        let err = open(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::TruncatedContainerHeader)
        ));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn open_empty_file() {
        let mut stream = Cursor::new(vec![]);
        let err = open(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::TruncatedContainerHeader)
        ));
    }

    #[test]
    fn read_plain_header() {
        let mut stream = Cursor::new(chunk(b"GLMT", &[1, 2, 3]));
        let header = read_chunk_header(&mut stream).unwrap();
        assert_eq!(
            header,
            ChunkHeader::Plain(Chunk {
                tag: Tag::GLMT,
                size: 3,
                offset: 0
            })
        );
        assert_eq!(stream.position(), 8);
    }

    #[test]
    fn read_list_header() {
        let mut stream = Cursor::new(list(b"GLSP", &[]));
        let header = read_chunk_header(&mut stream).unwrap();
        assert_eq!(
            header,
            ChunkHeader::List {
                chunk: Chunk {
                    tag: Tag::LIST,
                    size: 4,
                    offset: 0
                },
                list_type: Tag::GLSP,
            }
        );
        assert_eq!(stream.position(), 12);
    }

    #[test]
    fn read_null_header() {
        let mut stream = Cursor::new(chunk(b"NULL", &[]));
        let err = read_chunk_header(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::NullChunk { offset: 0 })
        ));
    }

    #[test]
    fn read_truncated_header() {
        let mut stream = Cursor::new(vec![0, 0, b'F', b'T', b'M', b'T', 2, 0]);
        stream.set_position(2);
        let err = read_chunk_header(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::TruncatedChunkHeader { offset: 2 })
        ));
    }

    #[test]
    fn seek_helpers() {
        let chunk = Chunk {
            tag: Tag::GLSP,
            size: 5,
            offset: 20,
        };
        let mut stream = Cursor::new(vec![0_u8; 64]);
        skip(&mut stream, &chunk).unwrap();
        assert_eq!(stream.position(), 34);
        rewind_into(&mut stream, &chunk).unwrap();
        assert_eq!(stream.position(), 28);
        seek_within(&mut stream, &chunk, 3).unwrap();
        assert_eq!(stream.position(), 31);
    }

    #[test]
    fn walk_odd_sized_siblings() {
        let b = container(
            b"FHFT",
            &[
                chunk(b"AAAA", &[1]),
                chunk(b"BBBB", &[1, 2, 3]),
                chunk(b"CCCC", &[1, 2]),
                chunk(b"DDDD", &[]),
                chunk(b"EEEE", &[9; 5]),
            ],
        );
        let (result, seen, position, header) = collect(b);
        result.unwrap();
        let got: Vec<(Tag, u32, u64)> = seen
            .iter()
            .map(|(h, _)| (h.chunk().tag, h.chunk().size, h.chunk().offset))
            .collect();
        assert_eq!(
            got,
            vec![
                (Tag(*b"AAAA"), 1, 14),
                (Tag(*b"BBBB"), 3, 24),
                (Tag(*b"CCCC"), 2, 36),
                (Tag(*b"DDDD"), 0, 46),
                (Tag(*b"EEEE"), 5, 54),
            ]
        );
        assert_eq!(position, header.end());
        assert_eq!(header.size, 4 + 10 + 12 + 10 + 8 + 14);
    }

    #[test]
    fn walk_nested_lists() {
        let b = container(
            b"FHFT",
            &[
                chunk(b"FTMT", &[2, 0, 0, 0]),
                list(
                    b"CMAP",
                    &[
                        chunk(b"CM1B", &[b'A', 1, 0]),
                        list(b"GLYF", &[chunk(b"GLSP", &[1, 0, 1, 0, 1, 0, 0xFF, 0xFF])]),
                    ],
                ),
                chunk(b"GLMT", &[8, 0, 16, 0]),
            ],
        );
        let (result, seen, position, header) = collect(b);
        result.unwrap();
        let got: Vec<(Tag, usize)> = seen.iter().map(|(h, d)| (h.chunk().tag, *d)).collect();
        assert_eq!(
            got,
            vec![
                (Tag::FTMT, 0),
                (Tag::LIST, 0),
                (Tag::CM1B, 1),
                (Tag::LIST, 1),
                (Tag::GLSP, 2),
                (Tag::GLMT, 0),
            ]
        );
        assert!(matches!(
            seen[1].0,
            ChunkHeader::List { list_type, .. } if list_type == Tag(*b"CMAP")
        ));
        assert_eq!(position, header.end());
    }

    #[test]
    fn walk_aborts_on_null_chunk() {
        let b = container(
            b"FHFT",
            &[
                chunk(b"FTMT", &[2, 0, 0, 0]),
                chunk(b"NULL", &[1, 2]),
                chunk(b"GLMT", &[8, 0, 16, 0]),
            ],
        );
        let (result, seen, _, _) = collect(b);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::NullChunk { offset: 26 }))
        ));
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.chunk().tag, Tag::FTMT);
    }

    #[test]
    fn walk_aborts_on_truncated_file() {
        let mut b = container(
            b"FHFT",
            &[chunk(b"FTMT", &[2, 0, 0, 0]), chunk(b"GLMT", &[8, 0, 16, 0])],
        );
        b.truncate(b.len() - 10);
        let (result, seen, _, _) = collect(b);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedChunkHeader { offset: 26 }))
        ));
        assert_eq!(seen.len(), 1);
    }
}
