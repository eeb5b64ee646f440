use std::mem::size_of;

use tracing::Level;

use super::{Link, LinkPool, NodeArena, NodeId, SkipRange};


/// The default size, in bytes, of the blocks in which a [`ByteArena`] stores entries.
pub const ARENA_BLOCK_SIZE: usize = 4096;


#[derive(Debug, Clone, Copy)]
struct ByteNode {
    block:  usize,
    offset: usize,
    len:    usize,
    skips:  SkipRange,
}

/// A [`NodeArena`] storing variable-length byte entries in fixed-size blocks.
///
/// Small entries are packed into a shared block; an entry longer than a quarter of the block size
/// gets a dedicated block of its own, so that little space is wasted at the end of a block. Each
/// block's buffer is allocated once with its final capacity, so an entry is never moved or copied
/// after it has been written.
#[derive(Debug, Clone)]
pub struct ByteArena {
    blocks:        Vec<Vec<u8>>,
    /// The block into which small entries are currently being packed.
    current_block: Option<usize>,
    block_size:    usize,
    nodes:         Vec<ByteNode>,
    links:         LinkPool,
    block_bytes:   usize,
}

impl ByteArena {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_block_size(ARENA_BLOCK_SIZE)
    }

    #[inline]
    #[must_use]
    pub const fn with_block_size(block_size: usize) -> Self {
        Self {
            blocks:        Vec::new(),
            current_block: None,
            block_size,
            nodes:         Vec::new(),
            links:         LinkPool::new(),
            block_bytes:   0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Allocate a new node of the given height whose entry is `entry_len` bytes long,
    /// initializing the entry with `init_entry`. The buffer passed to `init_entry` is zeroed.
    pub(crate) fn alloc_with<F>(&mut self, entry_len: usize, height: usize, init_entry: F) -> NodeId
    where
        F: FnOnce(&mut [u8]),
    {
        let (block, offset) = self.reserve(entry_len);

        #[expect(clippy::indexing_slicing, reason = "`reserve` returns an in-bounds region")]
        init_entry(&mut self.blocks[block][offset..offset + entry_len]);

        let id = NodeId::from_index(self.nodes.len());
        let skips = self.links.alloc(height);
        self.nodes.push(ByteNode { block, offset, len: entry_len, skips });
        id
    }

    /// Returns the block index and offset of `len` newly-zeroed bytes.
    fn reserve(&mut self, len: usize) -> (usize, usize) {
        if len > self.block_size / 4 {
            return (self.new_block(len, true), 0);
        }

        let current = self.current_block.filter(|&block| {
            self.blocks
                .get(block)
                .is_some_and(|buf| buf.capacity() - buf.len() >= len)
        });

        let block = if let Some(block) = current {
            block
        } else {
            let block = self.new_block(self.block_size, false);
            self.current_block = Some(block);
            block
        };

        #[expect(clippy::indexing_slicing, reason = "`block` was just checked or created")]
        let buf = &mut self.blocks[block];
        let offset = buf.len();
        // Stays within the capacity, so the buffer is not reallocated.
        buf.resize(offset + len, 0);
        (block, offset)
    }

    fn new_block(&mut self, capacity: usize, dedicated: bool) -> usize {
        tracing::event!(
            Level::TRACE,
            "byte arena allocating block {} with {capacity} bytes",
            self.blocks.len(),
        );

        let mut buf = Vec::with_capacity(capacity);
        if dedicated {
            // Filled by exactly one entry.
            buf.resize(capacity, 0);
        }
        self.block_bytes += buf.capacity();
        self.blocks.push(buf);
        self.blocks.len() - 1
    }

    #[expect(clippy::indexing_slicing, reason = "node ids are only handed out by `alloc_with`")]
    #[inline]
    fn node(&self, node: NodeId) -> ByteNode {
        self.nodes[node.index()]
    }
}

impl Default for ByteArena {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena for ByteArena {
    type Entry = [u8];

    fn entry(&self, node: NodeId) -> &[u8] {
        let node = self.node(node);
        #[expect(clippy::indexing_slicing, reason = "nodes only record regions they reserved")]
        &self.blocks[node.block][node.offset..node.offset + node.len]
    }

    #[inline]
    fn height(&self, node: NodeId) -> usize {
        self.node(node).skips.height()
    }

    #[inline]
    fn skip(&self, node: NodeId, level: usize) -> Link {
        self.links.get(self.node(node).skips, level)
    }

    fn set_skip(&mut self, node: NodeId, level: usize, link: Link) {
        let skips = self.node(node).skips;
        self.links.set(skips, level, link);
    }

    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn allocated_bytes(&self) -> usize {
        self.block_bytes
            + self.blocks.capacity() * size_of::<Vec<u8>>()
            + self.nodes.capacity() * size_of::<ByteNode>()
            + self.links.allocated_bytes()
    }
}
