//! Node storage for skiplists.
//!
//! A skiplist never frees an individual node; every node lives until its arena is dropped.
//! Nodes are addressed by [`NodeId`], an index into the arena that allocated them, and the
//! links between nodes are `Option<NodeId>` values.

mod links;
mod typed;
mod bytes;


pub use self::{bytes::{ARENA_BLOCK_SIZE, ByteArena}, typed::TypedArena};
pub(crate) use self::links::{LinkPool, SkipRange};


/// The address of a node within the [`NodeArena`] which allocated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// # Panics
    /// Panics if `index` does not fit in a `u32`. More than four billion nodes in a single
    /// arena is treated the same as allocation failure.
    #[expect(clippy::expect_used, reason = "running out of node ids is fatal, like OOM")]
    #[must_use]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("a skiplist arena may hold at most u32::MAX nodes"))
    }

    #[inline]
    #[must_use]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A link to the following node on some level of a skiplist. `None` represents the end of the
/// level.
pub type Link = Option<NodeId>;

/// Storage for the nodes of a skiplist: each node holds one entry and up to
/// [`MAX_HEIGHT`] links to following nodes.
///
/// Any [`NodeId`] passed to these methods must have been returned by the same arena; the
/// methods panic on an id that was never allocated.
///
/// [`MAX_HEIGHT`]: crate::MAX_HEIGHT
pub trait NodeArena {
    type Entry: ?Sized;

    #[must_use]
    fn entry(&self, node: NodeId) -> &Self::Entry;

    /// The number of levels `node` participates in, in `1..=MAX_HEIGHT`.
    #[must_use]
    fn height(&self, node: NodeId) -> usize;

    /// The following node of `node` on the given level. Levels at or above the node's height
    /// have no links, and return `None`.
    #[must_use]
    fn skip(&self, node: NodeId, level: usize) -> Link;

    /// # Panics
    /// Panics if `level` is at least the node's height.
    fn set_skip(&mut self, node: NodeId, level: usize, link: Link);

    /// The number of nodes allocated so far.
    #[must_use]
    fn len(&self) -> usize;

    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A close lower bound on the number of bytes of memory reserved by the arena.
    #[must_use]
    fn allocated_bytes(&self) -> usize;
}
