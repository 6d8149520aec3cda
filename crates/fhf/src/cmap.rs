//! Character maps
//!
//! A character map is a chunk holding fixed-width records of the form
//!     (character code, glyph id), sorted by character code.
//! Characters codes are stored in as few bytes as possible, so a font has up to
//!     four character maps, one per code width: `CM1B`, `CM2B`, `CM3B` and `CM4B`.
//! Glyph ids are always 2 bytes.
//!
//! Lookups binary search the records directly on the stream.

use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::riff::{self, Chunk};
use crate::{Error, GlyphId, Tag, Warning};

/// Number of bytes used to store a character code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CodeWidth {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl CodeWidth {
    pub const ALL: [CodeWidth; 4] = [
        CodeWidth::One,
        CodeWidth::Two,
        CodeWidth::Three,
        CodeWidth::Four,
    ];

    /// Returns the width of the character map a codepoint is stored in.
    pub fn for_codepoint(codepoint: u32) -> CodeWidth {
        match codepoint {
            0..=0xFF => CodeWidth::One,
            0x100..=0xFFFF => CodeWidth::Two,
            0x1_0000..=0xFF_FFFF => CodeWidth::Three,
            _ => CodeWidth::Four,
        }
    }

    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Size of one record: the code plus a 2 byte glyph id.
    pub fn record_width(self) -> u32 {
        self as u32 + 2
    }

    /// Tag of the character map chunk for this width.
    pub fn tag(self) -> Tag {
        match self {
            CodeWidth::One => Tag::CM1B,
            CodeWidth::Two => Tag::CM2B,
            CodeWidth::Three => Tag::CM3B,
            CodeWidth::Four => Tag::CM4B,
        }
    }
}

/// Floor of the mean of two numbers, computed without overflow.
///
/// Each bound is halved separately and the two remainders are redistributed.
pub fn midpoint(a: u64, b: u64) -> u64 {
    a / 2 + b / 2 + (a % 2 + b % 2) / 2
}

/// A character map chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterMap {
    chunk: Chunk,
    width: CodeWidth,
    len: u64,
}

impl CharacterMap {
    /// Creates a character map from its chunk.
    ///
    /// If the chunk size is not a multiple of the record width the trailing bytes
    ///     are ignored and a warning is returned.
    pub fn new(chunk: Chunk, width: CodeWidth) -> (CharacterMap, Option<Warning>) {
        let record_width = width.record_width();
        let warning = if chunk.size % record_width != 0 {
            let warning = Warning::CharacterMapSizeMismatch {
                tag: chunk.tag,
                size: chunk.size,
                record_width,
            };
            log::warn!("{warning}");
            Some(warning)
        } else {
            None
        };
        let map = CharacterMap {
            chunk,
            width,
            len: u64::from(chunk.size / record_width),
        };
        (map, warning)
    }

    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    pub fn width(&self) -> CodeWidth {
        self.width
    }

    /// Number of complete records in the map.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finds the glyph id of a character code.
    ///
    /// If the map contains the code more than once, any one of the matching
    ///     records may be returned.
    pub fn lookup<R: Read + Seek>(
        &self,
        stream: &mut R,
        code: u32,
    ) -> Result<Option<GlyphId>, Error> {
        let record_width = u64::from(self.width.record_width());
        let (mut lo, mut hi) = (0_u64, self.len);
        while lo < hi {
            let pivot = midpoint(lo, hi);
            riff::seek_within(stream, &self.chunk, pivot * record_width)?;
            let pivot_code = self.read_code(stream)?;
            log::trace!(
                "{}: pivot={pivot} code=0x{pivot_code:04X} target=0x{code:04X} range=[{lo}, {hi})",
                self.chunk.tag
            );
            match pivot_code.cmp(&code) {
                std::cmp::Ordering::Equal => {
                    let gid = stream.read_u16::<LittleEndian>()?;
                    return Ok(Some(GlyphId(gid)));
                }
                std::cmp::Ordering::Less => lo = pivot + 1,
                std::cmp::Ordering::Greater => hi = pivot,
            }
        }
        Ok(None)
    }

    /// Reads every record of the map in file order.
    pub fn entries<R: Read + Seek>(&self, stream: &mut R) -> Result<Vec<(u32, GlyphId)>, Error> {
        riff::rewind_into(stream, &self.chunk)?;
        let mut entries = vec![];
        for _ in 0..self.len {
            let code = self.read_code(stream)?;
            let gid = stream.read_u16::<LittleEndian>()?;
            entries.push((code, GlyphId(gid)));
        }
        Ok(entries)
    }

    fn read_code<R: Read>(&self, stream: &mut R) -> std::io::Result<u32> {
        // At most 4 bytes, so the value always fits.
        Ok(stream.read_uint::<LittleEndian>(self.width.bytes())? as u32)
    }
}
