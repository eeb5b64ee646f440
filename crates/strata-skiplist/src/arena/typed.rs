use std::mem::size_of;

use super::{Link, LinkPool, NodeArena, NodeId, SkipRange};


#[derive(Debug, Clone)]
struct TypedNode<T> {
    entry: T,
    skips: SkipRange,
}

/// A [`NodeArena`] which stores sized entries inline, in one contiguous buffer.
#[derive(Debug, Clone)]
pub struct TypedArena<T> {
    nodes: Vec<TypedNode<T>>,
    links: LinkPool,
}

impl<T> TypedArena<T> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: LinkPool::new(),
        }
    }

    /// Store `entry` in a new node of the given height, with every link unset.
    pub(crate) fn alloc(&mut self, entry: T, height: usize) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let skips = self.links.alloc(height);
        self.nodes.push(TypedNode { entry, skips });
        id
    }

    #[expect(clippy::indexing_slicing, reason = "node ids are only handed out by `alloc`")]
    #[inline]
    fn node(&self, node: NodeId) -> &TypedNode<T> {
        &self.nodes[node.index()]
    }
}

impl<T> Default for TypedArena<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena for TypedArena<T> {
    type Entry = T;

    #[inline]
    fn entry(&self, node: NodeId) -> &T {
        &self.node(node).entry
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
        self.nodes.capacity() * size_of::<TypedNode<T>>() + self.links.allocated_bytes()
    }
}
