//! Reader for the fixed-height bitmap font (.fhf) container format
//!
//! A fixed-height font is a little-endian RIFF container.
//! Its leaf chunks carry font metadata (`FTMT`), glyph metadata (`GLMT`),
//!     sorted character maps keyed by the byte width of the character code
//!     (`CM1B` to `CM4B`),
//!     and glyph spans (`GLSP`) holding column-major 16 pixel high bitmaps.
//!
//! The crate never loads the whole file.
//! The container is walked once to build a [ChunkIndex];
//!     after that every character lookup is a handful of seeks against the same stream.
//!
//! ```no_run
//! # fn main() -> Result<(), fhf::Error> {
//! let file = std::fs::File::open("font.fhf")?;
//! let (mut font, _warnings) = fhf::Font::open(std::io::BufReader::new(file), Default::default())?;
//! let (layout, _warnings) = font.layout("Hello\nworld".as_bytes())?;
//! for line in &layout.lines {
//!     println!("width={} end={}", line.width, line.end);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cmap;
mod error;
mod font;
pub mod glyph;
pub mod index;
pub mod layout;
pub mod riff;
pub mod utf8;

pub use error::{Error, FormatError, Warning};
pub use font::{Font, FontMetadata, GlyphMetadata};
pub use index::ChunkIndex;
pub use layout::{Layout, Line};

/// Oldest `FTMT` format version this crate understands.
pub const MIN_VERSION: u16 = 2;

/// The only glyph height the format supports, in pixels.
///
/// Each bitmap column is a single 16-bit word.
pub const GLYPH_HEIGHT: u16 = 16;

/// A four character code naming a chunk.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const RIFF: Tag = Tag(*b"RIFF");
    pub const LIST: Tag = Tag(*b"LIST");
    /// Tag the font writer uses for chunks it never filled in.
    pub const NULL: Tag = Tag(*b"NULL");
    pub const FTMT: Tag = Tag(*b"FTMT");
    pub const GLMT: Tag = Tag(*b"GLMT");
    pub const CM1B: Tag = Tag(*b"CM1B");
    pub const CM2B: Tag = Tag(*b"CM2B");
    pub const CM3B: Tag = Tag(*b"CM3B");
    pub const CM4B: Tag = Tag(*b"CM4B");
    pub const GLSP: Tag = Tag(*b"GLSP");
}

impl From<[u8; 4]> for Tag {
    fn from(value: [u8; 4]) -> Self {
        Tag(value)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02X}")?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A 16-bit glyph identifier.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlyphId(pub u16);

impl From<u16> for GlyphId {
    fn from(value: u16) -> Self {
        GlyphId(value)
    }
}

impl std::fmt::Display for GlyphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Settings the caller threads into the reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Fonts whose `FTMT` version is below this are rejected.
    pub min_version: u16,
    /// Log every chunk discovered while walking the container.
    pub trace_walk: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_version: MIN_VERSION,
            trace_walk: false,
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil;
