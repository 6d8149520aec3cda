use crate::layout::Miss;
use crate::utf8::EncodingError;
use crate::{GlyphId, Tag};

/// Fatal errors.
///
/// Any of these aborts the conversion; no partial output is produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading from the font stream failed.
    #[error("failed to read font data: {0}")]
    Io(#[from] std::io::Error),
    /// The container framing is invalid.
    #[error("malformed font container: {0}")]
    Format(#[from] FormatError),
    /// The `FTMT` chunk declares a version older than the configured minimum.
    #[error("font format version {found} is older than the minimum supported version {minimum}")]
    Version { found: u16, minimum: u16 },
    /// A chunk the conversion needs is absent from the container.
    #[error("required chunk {0} was not found")]
    ChunkNotFound(Tag),
    /// The `GLMT` chunk declares a glyph height other than 16.
    #[error("unsupported glyph height {0}; only 16 pixel high glyphs are supported")]
    UnsupportedGlyphHeight(u16),
    /// The source text is not valid UTF-8.
    ///
    /// The offset is the index of the first byte of the offending sequence.
    #[error("invalid UTF-8 in source text at byte {offset}: {source}")]
    Encoding {
        offset: usize,
        #[source]
        source: EncodingError,
    },
}

/// Errors in the container framing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The file is too short to hold the container header.
    #[error("the file is too short to hold a container header")]
    TruncatedContainerHeader,
    /// The endianness marker does not read as 0xFEFF in little-endian order.
    #[error("incompatible byte order mark 0x{0:04X}")]
    ByteOrderMark(u16),
    /// The container magic is not `RIFF`.
    #[error("not a RIFF file: the magic is {0}")]
    Magic(Tag),
    /// A chunk header carries the `NULL` tag.
    #[error("malformed chunk header at offset {offset}")]
    NullChunk { offset: u64 },
    /// A chunk header is cut short by the end of the file.
    #[error("the chunk header at offset {offset} is cut short by the end of the file")]
    TruncatedChunkHeader { offset: u64 },
    /// A metadata chunk is too small to hold its fixed fields.
    #[error("the {tag} chunk at offset {offset} is too small to hold its fields")]
    TruncatedMetadata { tag: Tag, offset: u64 },
    /// A glyph span chunk is too small to hold the span header.
    #[error("the span chunk at offset {offset} is too small to hold a span header")]
    TruncatedSpanHeader { offset: u64 },
    /// A glyph span claims more bitmap data than its chunk holds.
    #[error("glyph {gid} lies outside of the span chunk at offset {offset}")]
    GlyphOutOfBounds { gid: GlyphId, offset: u64 },
}

/// Non-fatal anomalies.
///
/// Warnings are logged when they are found and also returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A character map's size is not a multiple of its record width.
    ///
    /// The trailing partial record is ignored.
    CharacterMapSizeMismatch {
        tag: Tag,
        size: u32,
        record_width: u32,
    },
    /// The font name length in `FTMT` runs past the end of the chunk.
    ///
    /// The name is truncated to the chunk.
    NameLengthExceedsChunk { declared: u16, available: u32 },
    /// A character was dropped from the layout.
    GlyphLookupMiss { codepoint: u32, miss: Miss },
    /// Record `index` of a character map is smaller than its predecessor.
    UnsortedCharacterMap { tag: Tag, index: u64 },
    /// A character map entry points at a glyph no span contains.
    DanglingGlyphId { code: u32, gid: GlyphId },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::CharacterMapSizeMismatch {
                tag,
                size,
                record_width,
            } => write!(
                f,
                "the size of character map {tag} ({size}) is not a multiple of its record width ({record_width})"
            ),
            Warning::NameLengthExceedsChunk {
                declared,
                available,
            } => write!(
                f,
                "the font name claims {declared} bytes but only {available} are left in the chunk"
            ),
            Warning::GlyphLookupMiss { codepoint, miss } => match miss {
                Miss::NotInCharacterMap => {
                    write!(f, "character 0x{codepoint:04X} wasn't found")
                }
                Miss::NoGlyphSpan(gid) => write!(
                    f,
                    "character 0x{codepoint:04X} maps to glyph {gid} which no span contains"
                ),
            },
            Warning::UnsortedCharacterMap { tag, index } => {
                write!(f, "character map {tag} is not sorted at record {index}")
            }
            Warning::DanglingGlyphId { code, gid } => write!(
                f,
                "character 0x{code:04X} maps to glyph {gid} which no span contains"
            ),
        }
    }
}
