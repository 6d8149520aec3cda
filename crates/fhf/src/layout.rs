//! Layout of decoded text into a column buffer and a line table

use crate::glyph::with_spacing;
use crate::{Error, GlyphId, Warning};

/// The codepoint that closes a line.
pub const NEWLINE: u32 = 0x0A;

/// Why a codepoint has no glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    /// The character map for the codepoint's width has no entry for it.
    NotInCharacterMap,
    /// The character map points at a glyph that no span contains.
    NoGlyphSpan(GlyphId),
}

/// Result of resolving a codepoint against a font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Raw bitmap columns, before spacing is applied.
    Found(Vec<u16>),
    Missing(Miss),
}

/// Something that maps codepoints to glyph bitmaps.
///
/// [crate::Font] is the implementation used in practice.
pub trait GlyphSource {
    fn resolve(&mut self, codepoint: u32) -> Result<Resolved, Error>;
}

/// A line of the layout, measured in columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Line {
    pub width: usize,
    /// Index one past the last column of the line in [Layout::columns].
    pub end: usize,
}

/// Bitmap columns of a whole text and the lines they are split into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Layout {
    pub columns: Vec<u16>,
    pub lines: Vec<Line>,
}

/// Lays out a sequence of codepoints.
///
/// Newlines close the current line.
/// Every other codepoint appends its spaced glyph columns;
///     codepoints without a glyph are dropped and reported as warnings.
/// Text without newlines yields exactly one line, even when it is empty.
/// Otherwise a final line is closed only if some codepoint follows the last newline.
pub fn assemble<S: GlyphSource + ?Sized>(
    codepoints: &[u32],
    source: &mut S,
) -> Result<(Layout, Vec<Warning>), Error> {
    let mut layout = Layout::default();
    let mut warnings = vec![];
    let mut line_start = 0_usize;
    let mut open_line = false;
    for &codepoint in codepoints {
        if codepoint == NEWLINE {
            layout.close_line(line_start);
            line_start = layout.columns.len();
            open_line = false;
            continue;
        }
        open_line = true;
        match source.resolve(codepoint)? {
            Resolved::Found(columns) => layout.columns.extend(with_spacing(columns)),
            Resolved::Missing(miss) => {
                let warning = Warning::GlyphLookupMiss { codepoint, miss };
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }
    if layout.lines.is_empty() || open_line {
        layout.close_line(line_start);
    }
    Ok((layout, warnings))
}

impl Layout {
    fn close_line(&mut self, line_start: usize) {
        let end = self.columns.len();
        self.lines.push(Line {
            width: end - line_start,
            end,
        });
    }
}
