//! Flat index of the leaf chunks in a container

use std::io::{Read, Seek};

use crate::riff::{self, Chunk, ChunkHeader, ContainerHeader};
use crate::{Error, Options, Tag};

/// Every plain chunk of a container, in the order they appear in the file.
///
/// List chunks are containers only and are never part of the index.
/// The index is built once and not modified afterwards.
/// It holds no reference to the stream and can be cloned freely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkIndex {
    chunks: Vec<Chunk>,
}

impl ChunkIndex {
    /// Walks the container and indexes every plain chunk.
    ///
    /// The stream must be positioned at the first chunk, as [riff::open] leaves it.
    pub fn build<R: Read + Seek>(
        stream: &mut R,
        header: &ContainerHeader,
        options: &Options,
    ) -> Result<ChunkIndex, Error> {
        let (index, result) = ChunkIndex::walk(stream, header, options);
        result.map(|()| index)
    }

    /// Like [ChunkIndex::build], but returns the partial index if the walk fails.
    pub fn walk<R: Read + Seek>(
        stream: &mut R,
        header: &ContainerHeader,
        options: &Options,
    ) -> (ChunkIndex, Result<(), Error>) {
        let mut chunks = vec![];
        let result = riff::walk_list(stream, header.size, &mut |h: &ChunkHeader, depth| {
            if options.trace_walk {
                trace_chunk(h, depth);
            }
            if let ChunkHeader::Plain(chunk) = h {
                chunks.push(*chunk);
            }
        });
        (ChunkIndex { chunks }, result)
    }

    /// Returns the first chunk with the given tag.
    pub fn find_first(&self, tag: Tag) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| chunk.tag == tag)
    }

    /// Returns the first chunk with the given tag, or [Error::ChunkNotFound].
    pub fn require(&self, tag: Tag) -> Result<&Chunk, Error> {
        self.find_first(tag).ok_or(Error::ChunkNotFound(tag))
    }

    /// Returns all chunks with the given tag in file order.
    pub fn find_all(&self, tag: Tag) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.iter().filter(move |chunk| chunk.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

fn trace_chunk(header: &ChunkHeader, depth: usize) {
    let chunk = header.chunk();
    match header {
        ChunkHeader::Plain(_) => log::debug!(
            "{:indent$}- {} size: {} offset: {}",
            "",
            chunk.tag,
            chunk.size,
            chunk.offset,
            indent = 2 * depth
        ),
        ChunkHeader::List { list_type, .. } => log::debug!(
            "{:indent$}- {} size: {} offset: {} type: {}",
            "",
            chunk.tag,
            chunk.size,
            chunk.offset,
            list_type,
            indent = 2 * depth
        ),
    }
}
