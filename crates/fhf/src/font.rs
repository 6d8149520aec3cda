use std::collections::BTreeMap;
use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::cmap::{CharacterMap, CodeWidth};
use crate::glyph::GlyphStore;
use crate::layout::{self, GlyphSource, Layout, Miss, Resolved};
use crate::riff::{self, Chunk, ContainerHeader};
use crate::{utf8, ChunkIndex, Error, FormatError, GlyphId, Options, Tag, Warning, GLYPH_HEIGHT};

/// Contents of the `FTMT` chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FontMetadata {
    pub version: u16,
    /// Display name of the font.
    ///
    /// Bytes that are not valid UTF-8 are replaced.
    pub name: String,
}

/// Contents of the `GLMT` chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlyphMetadata {
    /// Width of the widest glyph, in pixels.
    pub max_width: u16,
    pub height: u16,
}

/// An open fixed-height font.
///
/// The font owns its stream for its whole lifetime.
/// Every lookup seeks the stream, so lookups need `&mut self`.
#[derive(Debug)]
pub struct Font<R> {
    stream: R,
    header: ContainerHeader,
    index: ChunkIndex,
    metadata: FontMetadata,
    glyph_metadata: GlyphMetadata,
    cmaps: [Option<CharacterMap>; 4],
    store: GlyphStore,
}

impl<R: Read + Seek> Font<R> {
    /// Opens a font.
    ///
    /// The container is walked once and the metadata chunks are validated.
    /// Returns the font together with the non-fatal anomalies found along the way.
    pub fn open(mut stream: R, options: Options) -> Result<(Font<R>, Vec<Warning>), Error> {
        let mut warnings = vec![];
        let header = riff::open(&mut stream)?;
        log::debug!(
            "container: size={} form={} offset={}",
            header.size,
            header.form,
            header.offset
        );
        let index = ChunkIndex::build(&mut stream, &header, &options)?;

        let ftmt = *index.require(Tag::FTMT)?;
        let metadata = read_font_metadata(&mut stream, &ftmt, &mut warnings)?;
        if metadata.version < options.min_version {
            return Err(Error::Version {
                found: metadata.version,
                minimum: options.min_version,
            });
        }

        let glmt = *index.require(Tag::GLMT)?;
        let glyph_metadata = read_glyph_metadata(&mut stream, &glmt)?;
        if glyph_metadata.height != GLYPH_HEIGHT {
            return Err(Error::UnsupportedGlyphHeight(glyph_metadata.height));
        }
        log::debug!(
            "font: name={:?} version={} max_width={}",
            metadata.name,
            metadata.version,
            glyph_metadata.max_width
        );

        let cmaps = CodeWidth::ALL.map(|width| {
            index.find_first(width.tag()).map(|chunk| {
                let (map, warning) = CharacterMap::new(*chunk, width);
                warnings.extend(warning);
                map
            })
        });
        let store = GlyphStore::new(&index);
        let font = Font {
            stream,
            header,
            index,
            metadata,
            glyph_metadata,
            cmaps,
            store,
        };
        Ok((font, warnings))
    }

    /// Lays out UTF-8 text.
    ///
    /// The text ends at its first NUL byte, if any.
    pub fn layout(&mut self, text: &[u8]) -> Result<(Layout, Vec<Warning>), Error> {
        let codepoints = utf8::decode_all(text)?;
        layout::assemble(&codepoints, self)
    }

    /// Finds the glyph id of a codepoint.
    ///
    /// Fails with [Error::ChunkNotFound] if the font has no character map for
    ///     codepoints of this magnitude.
    pub fn lookup_char(&mut self, codepoint: u32) -> Result<Option<GlyphId>, Error> {
        let width = CodeWidth::for_codepoint(codepoint);
        let map = self.cmaps[slot(width)]
            .as_ref()
            .ok_or(Error::ChunkNotFound(width.tag()))?;
        map.lookup(&mut self.stream, codepoint)
    }

    /// Returns the raw bitmap columns of a glyph.
    pub fn glyph_columns(&mut self, gid: GlyphId) -> Result<Option<Vec<u16>>, Error> {
        self.store.columns(&mut self.stream, gid)
    }

    /// Verifies every character map of the font.
    ///
    /// Reports records that are out of order and entries pointing at glyphs
    ///     no span contains.
    pub fn check(&mut self) -> Result<Vec<Warning>, Error> {
        let mut warnings = vec![];
        let mut covered: BTreeMap<GlyphId, bool> = BTreeMap::new();
        for map in self.cmaps.iter().flatten() {
            let entries = map.entries(&mut self.stream)?;
            for (i, pair) in entries.windows(2).enumerate() {
                if pair[1].0 < pair[0].0 {
                    warnings.push(Warning::UnsortedCharacterMap {
                        tag: map.chunk().tag,
                        index: i as u64 + 1,
                    });
                }
            }
            for (code, gid) in entries {
                let found = match covered.get(&gid) {
                    Some(&found) => found,
                    None => {
                        let found = self.store.find(&mut self.stream, gid)?.is_some();
                        covered.insert(gid, found);
                        found
                    }
                };
                if !found {
                    warnings.push(Warning::DanglingGlyphId { code, gid });
                }
            }
        }
        for warning in &warnings {
            log::warn!("{warning}");
        }
        Ok(warnings)
    }
}

impl<R> Font<R> {
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }

    pub fn metadata(&self) -> &FontMetadata {
        &self.metadata
    }

    pub fn glyph_metadata(&self) -> &GlyphMetadata {
        &self.glyph_metadata
    }

    /// The character maps present in the font, narrowest codes first.
    pub fn character_maps(&self) -> impl Iterator<Item = &CharacterMap> + '_ {
        self.cmaps.iter().flatten()
    }

    pub fn glyph_store(&self) -> &GlyphStore {
        &self.store
    }

    pub fn into_inner(self) -> R {
        self.stream
    }
}

impl<R: Read + Seek> GlyphSource for Font<R> {
    fn resolve(&mut self, codepoint: u32) -> Result<Resolved, Error> {
        let Some(gid) = self.lookup_char(codepoint)? else {
            return Ok(Resolved::Missing(Miss::NotInCharacterMap));
        };
        log::debug!("U+{codepoint:04X} -> glyph {gid}");
        Ok(match self.glyph_columns(gid)? {
            Some(columns) => Resolved::Found(columns),
            None => Resolved::Missing(Miss::NoGlyphSpan(gid)),
        })
    }
}

fn slot(width: CodeWidth) -> usize {
    width.bytes() - 1
}

fn read_font_metadata<R: Read + Seek>(
    stream: &mut R,
    chunk: &Chunk,
    warnings: &mut Vec<Warning>,
) -> Result<FontMetadata, Error> {
    if chunk.size < 4 {
        return Err(FormatError::TruncatedMetadata {
            tag: chunk.tag,
            offset: chunk.offset,
        }
        .into());
    }
    riff::rewind_into(stream, chunk)?;
    let version = stream.read_u16::<LittleEndian>()?;
    let declared = stream.read_u16::<LittleEndian>()?;
    let available = chunk.size - 4;
    let name_len = if u32::from(declared) > available {
        let warning = Warning::NameLengthExceedsChunk {
            declared,
            available,
        };
        log::warn!("{warning}");
        warnings.push(warning);
        available
    } else {
        u32::from(declared)
    };
    let mut name = vec![0_u8; name_len as usize];
    stream.read_exact(&mut name)?;
    Ok(FontMetadata {
        version,
        name: String::from_utf8_lossy(&name).into_owned(),
    })
}

fn read_glyph_metadata<R: Read + Seek>(
    stream: &mut R,
    chunk: &Chunk,
) -> Result<GlyphMetadata, Error> {
    if chunk.size < 4 {
        return Err(FormatError::TruncatedMetadata {
            tag: chunk.tag,
            offset: chunk.offset,
        }
        .into());
    }
    riff::rewind_into(stream, chunk)?;
    Ok(GlyphMetadata {
        max_width: stream.read_u16::<LittleEndian>()?,
        height: stream.read_u16::<LittleEndian>()?,
    })
}
