use oorandom::Rand32;
use seekable_iterator::{Comparator, Seekable as _};

use crate::{
    arena::{ByteArena, Link, NodeArena, NodeId, TypedArena},
    comparator::{BytewiseComparator, OrdComparator},
    iter::{Iter, SkiplistSeek},
    node_heights::{DEFAULT_SEED, MAX_HEIGHT, Prng32, random_node_height},
};


/// A skiplist of sized entries, stored inline in a [`TypedArena`].
pub type TypedSkiplist<T, Cmp = OrdComparator, P = Rand32> = Skiplist<TypedArena<T>, Cmp, P>;

/// A skiplist of byte-string entries, stored in the blocks of a [`ByteArena`].
pub type ByteSkiplist<Cmp = BytewiseComparator, P = Rand32> = Skiplist<ByteArena, Cmp, P>;


/// An ordered multiset, sorted by a [`Comparator`] supplied at construction.
///
/// Entries may be inserted but never removed; every node lives in the skiplist's arena until the
/// skiplist is dropped. Entries which compare as equal are all kept, in insertion order.
///
/// Searches, insertions and seeks take expected `O(log n)` time.
#[derive(Debug, Clone)]
pub struct Skiplist<A, Cmp, P = Rand32> {
    cmp:            Cmp,
    arena:          A,
    /// The first node of each level.
    head:           [Link; MAX_HEIGHT],
    /// Invariant: at most `MAX_HEIGHT`, and `head[level]` is `Some` for every level below it.
    current_height: usize,
    prng:           P,
}

impl<A: NodeArena + Default, Cmp> Skiplist<A, Cmp, Rand32> {
    #[inline]
    #[must_use]
    pub fn new(cmp: Cmp) -> Self {
        Self::new_seeded(cmp, DEFAULT_SEED)
    }

    #[inline]
    #[must_use]
    pub fn new_seeded(cmp: Cmp, seed: u64) -> Self {
        Self::with_prng(cmp, Rand32::new(seed))
    }
}

impl<A: NodeArena, Cmp, P> Skiplist<A, Cmp, P> {
    /// Create an empty skiplist whose node heights are drawn from `prng`.
    #[inline]
    #[must_use]
    pub fn with_prng(cmp: Cmp, prng: P) -> Self
    where
        A: Default,
    {
        Self::with_arena(cmp, A::default(), prng)
    }

    /// Create an empty skiplist which allocates its nodes in the provided arena.
    ///
    /// # Panics
    /// Panics if `arena` already holds nodes.
    #[must_use]
    pub fn with_arena(cmp: Cmp, arena: A, prng: P) -> Self {
        assert!(arena.is_empty(), "a skiplist must start with an empty arena");

        Self {
            cmp,
            arena,
            head:           [None; MAX_HEIGHT],
            current_height: 0,
            prng,
        }
    }

    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &Cmp {
        &self.cmp
    }

    #[inline]
    #[must_use]
    pub const fn arena(&self) -> &A {
        &self.arena
    }

    /// The number of entries in the skiplist, counting duplicates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// A close lower bound on the memory used by the skiplist's nodes.
    #[inline]
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.arena.allocated_bytes()
    }

    /// The first link of the given level, or `None` if the level is empty or at least
    /// `MAX_HEIGHT`.
    #[inline]
    fn head_skip(&self, level: usize) -> Link {
        self.head.get(level).copied().flatten()
    }

    #[inline]
    fn skip(&self, link: Link, level: usize) -> Link {
        match link {
            Some(node) => self.arena.skip(node, level),
            None       => self.head_skip(level),
        }
    }
}

// Searching
impl<A: NodeArena, Cmp: Comparator<A::Entry>, P> Skiplist<A, Cmp, P> {
    /// Return `Some(node)` if the provided `link` should be passed over when searching for
    /// `entry`: if it sorts strictly before `entry`, or, when `INCLUSIVE`, equal to it.
    /// `None` links sort after every entry.
    fn passed_over<const INCLUSIVE: bool>(&self, link: Link, entry: &A::Entry) -> Link {
        let node = link?;
        let ordering = self.cmp.cmp(self.arena.entry(node), entry);

        if ordering.is_lt() || (INCLUSIVE && ordering.is_eq()) {
            Some(node)
        } else {
            None
        }
    }

    /// For each level, the last node passed over when searching for `entry`, or `None` if that
    /// is the head.
    fn find_preceding_neighbors<const INCLUSIVE: bool>(
        &self,
        entry: &A::Entry,
    ) -> [Link; MAX_HEIGHT] {
        let mut prev = [None; MAX_HEIGHT];
        let mut current: Link = None;

        for level in (0..self.current_height).rev() {
            while let Some(node) = self.passed_over::<INCLUSIVE>(self.skip(current, level), entry) {
                current = Some(node);
            }
            #[expect(clippy::indexing_slicing, reason = "level < current_height <= MAX_HEIGHT")]
            {
                prev[level] = current;
            }
        }

        prev
    }

    /// Find either the first node greater than or equal to `entry` (when `GEQ`), or else the
    /// last node strictly less than `entry`.
    fn find_lt_or_geq<const GEQ: bool>(&self, entry: &A::Entry) -> Link {
        let mut current: Link = None;
        let mut level = self.current_height.checked_sub(1)?;

        loop {
            let next = self.skip(current, level);

            if let Some(node) = self.passed_over::<false>(next, entry) {
                // `next` was too small; keep going on this level.
                current = Some(node);
            } else if level == 0 {
                return if GEQ { next } else { current };
            } else {
                level -= 1;
            }
        }
    }

    /// Check whether an entry comparing equal to `entry` is in the skiplist.
    #[must_use]
    pub fn contains(&self, entry: &A::Entry) -> bool {
        self.find_greater_or_equal(entry)
            .is_some_and(|node| self.cmp.cmp(self.arena.entry(node), entry).is_eq())
    }

    /// An iterator positioned at the first entry greater than or equal to `target`, or at the
    /// end position if there is no such entry.
    ///
    /// The entry it is positioned at is read with [`CursorIterator::current`]; calling
    /// [`Iterator::next`] skips that entry and advances to the one after it.
    ///
    /// [`CursorIterator::current`]: seekable_iterator::CursorIterator::current
    #[must_use]
    pub fn seek(&self, target: &A::Entry) -> Iter<'_, Self> {
        let mut iter = self.iter();
        iter.seek(target);
        iter
    }

    /// An iterator at the end position. Calling [`Iterator::next`] on it yields every entry,
    /// in ascending order.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self)
    }

    /// An iterator positioned at the first entry, or at the end position if the skiplist is
    /// empty.
    ///
    /// The first entry is read with [`CursorIterator::current`]; [`Iterator::next`] skips it
    /// and advances to the second entry. Use [`Skiplist::iter`] to yield every entry from
    /// `next`.
    ///
    /// [`CursorIterator::current`]: seekable_iterator::CursorIterator::current
    #[must_use]
    pub fn begin(&self) -> Iter<'_, Self> {
        let mut iter = self.iter();
        iter.seek_to_first();
        iter
    }

    /// An iterator at the end position, which comes after the last entry and before the first.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Iter<'_, Self> {
        Iter::new(self)
    }

    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&A::Entry> {
        self.get_first().map(|node| self.arena.entry(node))
    }

    #[must_use]
    pub fn back(&self) -> Option<&A::Entry> {
        self.find_last().map(|node| self.arena.entry(node))
    }
}

// Insertion
impl<A: NodeArena, Cmp: Comparator<A::Entry>, P: Prng32> Skiplist<A, Cmp, P> {
    /// Link a freshly allocated node into every level it participates in. The node goes after
    /// every entry which compares equal to it.
    fn link_node(&mut self, node: NodeId) {
        let node_height = self.arena.height(node);
        let prev = self.find_preceding_neighbors::<true>(self.arena.entry(node));

        // Levels which were above the current height have every `prev` link set to `None`,
        // so the node is linked from the head on those levels.
        self.current_height = self.current_height.max(node_height);

        for (level, prev_link) in prev.into_iter().enumerate().take(node_height) {
            let next = self.skip(prev_link, level);
            self.arena.set_skip(node, level, next);

            if let Some(preceding_neighbor) = prev_link {
                self.arena.set_skip(preceding_neighbor, level, Some(node));
            } else {
                #[expect(clippy::indexing_slicing, reason = "level < node_height <= MAX_HEIGHT")]
                {
                    self.head[level] = Some(node);
                }
            }
        }
    }
}

impl<T, Cmp: Comparator<T>, P: Prng32> Skiplist<TypedArena<T>, Cmp, P> {
    /// Insert an entry. Insertion always succeeds; an entry comparing equal to existing entries
    /// is kept, and sorts after them.
    pub fn insert(&mut self, entry: T) {
        let height = random_node_height(&mut self.prng);
        let node = self.arena.alloc(entry, height);
        self.link_node(node);
    }
}

impl<T, Cmp: Comparator<T>, P: Prng32> Extend<T> for Skiplist<TypedArena<T>, Cmp, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl<Cmp: Comparator<[u8]>, P: Prng32> Skiplist<ByteArena, Cmp, P> {
    /// Create and insert an entry of length `entry_len` into the skiplist, initializing the entry
    /// with `init_entry`. The buffer passed to `init_entry` is zeroed.
    ///
    /// Insertion always succeeds; an entry comparing equal to existing entries is kept, and
    /// sorts after them.
    pub fn insert_with<F>(&mut self, entry_len: usize, init_entry: F)
    where
        F: FnOnce(&mut [u8]),
    {
        let height = random_node_height(&mut self.prng);
        let node = self.arena.alloc_with(entry_len, height, init_entry);
        self.link_node(node);
    }

    /// Insert a copy of `entry`.
    #[inline]
    pub fn insert_copy(&mut self, entry: &[u8]) {
        self.insert_with(entry.len(), |buf| buf.copy_from_slice(entry));
    }
}

impl<A: NodeArena + Default, Cmp: Default> Default for Skiplist<A, Cmp, Rand32> {
    #[inline]
    fn default() -> Self {
        Self::new(Cmp::default())
    }
}

impl<A: NodeArena, Cmp: Comparator<A::Entry>, P> SkiplistSeek for Skiplist<A, Cmp, P> {
    type Entry = A::Entry;
    type Cmp   = Cmp;

    #[inline]
    fn get_first(&self) -> Link {
        self.head_skip(0)
    }

    fn find_last(&self) -> Link {
        let mut current: Link = None;

        for level in (0..self.current_height).rev() {
            while let Some(node) = self.skip(current, level) {
                current = Some(node);
            }
        }

        current
    }

    #[inline]
    fn find_greater_or_equal(&self, entry: &A::Entry) -> Link {
        self.find_lt_or_geq::<true>(entry)
    }

    #[inline]
    fn find_strictly_less(&self, entry: &A::Entry) -> Link {
        self.find_lt_or_geq::<false>(entry)
    }

    /// Entries equal to `node`'s entry are only ordered by position, so after a search for the
    /// last strictly smaller entry, walk the bottom level up to `node`.
    fn find_predecessor(&self, node: NodeId) -> Link {
        let mut current = self.find_strictly_less(self.arena.entry(node));

        loop {
            let next = self.skip(current, 0)?;
            if next == node {
                return current;
            }
            current = Some(next);
        }
    }

    #[inline]
    fn next_node(&self, node: NodeId) -> Link {
        self.arena.skip(node, 0)
    }

    #[inline]
    fn node_entry(&self, node: NodeId) -> &A::Entry {
        self.arena.entry(node)
    }
}

impl<'a, A: NodeArena, Cmp: Comparator<A::Entry>, P> IntoIterator for &'a Skiplist<A, Cmp, P> {
    type Item     = &'a A::Entry;
    type IntoIter = Iter<'a, Skiplist<A, Cmp, P>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
