use std::mem::size_of;

use super::Link;


/// The links of one node: `height` consecutive slots of a [`LinkPool`], starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SkipRange {
    start:  usize,
    height: usize,
}

impl SkipRange {
    #[inline]
    #[must_use]
    pub(crate) const fn height(self) -> usize {
        self.height
    }
}

/// Every node's links, in one shared buffer, so that a node of height `h` costs `h` links
/// rather than `MAX_HEIGHT` of them.
#[derive(Default, Debug, Clone)]
pub(crate) struct LinkPool {
    links: Vec<Link>,
}

impl LinkPool {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Reserve `height` links, all initially `None`.
    pub(crate) fn alloc(&mut self, height: usize) -> SkipRange {
        let start = self.links.len();
        self.links.resize(start + height, None);
        SkipRange { start, height }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, range: SkipRange, level: usize) -> Link {
        if level < range.height {
            self.links.get(range.start + level).copied().flatten()
        } else {
            None
        }
    }

    /// # Panics
    /// Panics if `level >= range.height()`.
    pub(crate) fn set(&mut self, range: SkipRange, level: usize, link: Link) {
        assert!(
            level < range.height,
            "tried to set level {level} of a node with height {}",
            range.height,
        );
        #[expect(clippy::indexing_slicing, reason = "ranges are only handed out by `alloc`")]
        {
            self.links[range.start + level] = link;
        }
    }

    #[must_use]
    pub(crate) fn allocated_bytes(&self) -> usize {
        self.links.capacity() * size_of::<Link>()
    }
}


#[cfg(test)]
mod tests {
    use crate::arena::NodeId;
    use super::*;


    #[test]
    fn ranges_do_not_overlap() {
        let mut pool = LinkPool::new();
        let first = pool.alloc(3);
        let second = pool.alloc(2);

        pool.set(first, 2, Some(NodeId::from_index(7)));
        pool.set(second, 0, Some(NodeId::from_index(9)));

        assert_eq!(pool.get(first, 0), None);
        assert_eq!(pool.get(first, 2), Some(NodeId::from_index(7)));
        assert_eq!(pool.get(second, 0), Some(NodeId::from_index(9)));
        // Above the node's height
        assert_eq!(pool.get(second, 2), None);
        assert_eq!(second.height(), 2);
    }

    #[test]
    #[should_panic = "tried to set level 2"]
    fn set_above_height() {
        let mut pool = LinkPool::new();
        let range = pool.alloc(2);
        pool.set(range, 2, None);
    }
}
