//! Glyph spans
//!
//! A glyph span (`GLSP`) stores the bitmaps of a contiguous range of glyph ids.
//! Its payload starts with a 6 byte header: first glyph id, last glyph id and
//!     the column width shared by every glyph in the span.
//! The header is followed by one block of `width` 16-bit columns per glyph.
//! Each column is one horizontal pixel; bit `i` of the column is row `i`.

use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::riff::{self, Chunk};
use crate::{ChunkIndex, Error, FormatError, GlyphId, Tag};

/// The header of a glyph span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanHeader {
    pub first: GlyphId,
    pub last: GlyphId,
    /// Number of columns in every glyph of the span.
    pub width: u16,
}

impl SpanHeader {
    pub const SIZE: u32 = 6;

    /// Reads the header of a span chunk.
    pub fn read<R: Read + Seek>(stream: &mut R, span: &Chunk) -> Result<SpanHeader, Error> {
        if span.size < SpanHeader::SIZE {
            return Err(FormatError::TruncatedSpanHeader {
                offset: span.offset,
            }
            .into());
        }
        riff::rewind_into(stream, span)?;
        Ok(SpanHeader {
            first: GlyphId(stream.read_u16::<LittleEndian>()?),
            last: GlyphId(stream.read_u16::<LittleEndian>()?),
            width: stream.read_u16::<LittleEndian>()?,
        })
    }

    pub fn contains(&self, gid: GlyphId) -> bool {
        self.first <= gid && gid <= self.last
    }
}

/// The glyph spans of a font, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphStore {
    spans: Vec<Chunk>,
}

impl GlyphStore {
    pub fn new(index: &ChunkIndex) -> GlyphStore {
        GlyphStore {
            spans: index.find_all(Tag::GLSP).copied().collect(),
        }
    }

    pub fn spans(&self) -> &[Chunk] {
        &self.spans
    }

    /// Finds the span containing a glyph.
    ///
    /// Spans are expected to be disjoint.
    /// If they are not, the first span in file order that contains the glyph wins.
    pub fn find<R: Read + Seek>(
        &self,
        stream: &mut R,
        gid: GlyphId,
    ) -> Result<Option<(Chunk, SpanHeader)>, Error> {
        for span in &self.spans {
            let header = SpanHeader::read(stream, span)?;
            if header.contains(gid) {
                return Ok(Some((*span, header)));
            }
        }
        Ok(None)
    }

    /// Returns the raw bitmap columns of a glyph, or [None] if no span contains it.
    pub fn columns<R: Read + Seek>(
        &self,
        stream: &mut R,
        gid: GlyphId,
    ) -> Result<Option<Vec<u16>>, Error> {
        let Some((span, header)) = self.find(stream, gid)? else {
            return Ok(None);
        };
        let block_size = 2 * u64::from(header.width);
        let offset =
            u64::from(SpanHeader::SIZE) + block_size * u64::from(gid.0 - header.first.0);
        if offset + block_size > u64::from(span.size) {
            return Err(FormatError::GlyphOutOfBounds {
                gid,
                offset: span.offset,
            }
            .into());
        }
        log::trace!("gid: {gid}, width: {}", header.width);
        riff::seek_within(stream, &span, offset)?;
        let mut columns = vec![0_u16; header.width as usize];
        stream.read_u16_into::<LittleEndian>(&mut columns)?;
        Ok(Some(columns))
    }
}

/// Pads a glyph with blank columns so that it never touches its neighbours.
///
/// A blank column is added on each side whose outermost column has pixels set.
pub fn with_spacing(mut columns: Vec<u16>) -> Vec<u16> {
    if columns.first().is_some_and(|&column| column != 0) {
        columns.insert(0, 0);
    }
    if columns.last().is_some_and(|&column| column != 0) {
        columns.push(0);
    }
    columns
}
