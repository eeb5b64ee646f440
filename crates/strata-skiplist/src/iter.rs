use std::ptr;

use seekable_iterator::{Comparator, CursorIterator, Seekable};

use crate::arena::{Link, NodeId};


/// Methods for seeking through a skiplist, used by [`Iter`].
///
/// Every returned [`NodeId`] refers to a node of `self`.
pub trait SkiplistSeek {
    type Entry: ?Sized;
    /// The comparator which orders the entries, and which seek targets are compared with.
    type Cmp: Comparator<Self::Entry>;

    /// Return the first node in the skiplist, if the skiplist is nonempty.
    ///
    /// This operation should be fast.
    #[must_use]
    fn get_first(&self) -> Link;

    /// Return the last node in the skiplist, if the skiplist is nonempty.
    #[must_use]
    fn find_last(&self) -> Link;

    /// Return the first node whose entry compares greater than or equal to the provided `entry`,
    /// if there is such a node.
    #[must_use]
    fn find_greater_or_equal(&self, entry: &Self::Entry) -> Link;

    /// Return the last node whose entry compares strictly less than the provided `entry`,
    /// if there is such a node.
    #[must_use]
    fn find_strictly_less(&self, entry: &Self::Entry) -> Link;

    /// Return the node immediately before `node` on the bottom level, if `node` is not first.
    #[must_use]
    fn find_predecessor(&self, node: NodeId) -> Link;

    /// Return the node immediately after `node` on the bottom level, if `node` is not last.
    #[must_use]
    fn next_node(&self, node: NodeId) -> Link;

    #[must_use]
    fn node_entry(&self, node: NodeId) -> &Self::Entry;
}

/// A cursor over the entries of a skiplist.
///
/// In addition to the position of each entry, there is an end position, which comes after the
/// last entry and before the first. Moving forwards from the end position wraps to the first
/// entry, and moving backwards from it goes to the last entry.
///
/// The cursor methods come from [`CursorIterator`] and [`Seekable`].
///
/// Two iterators are equal if they refer to the same skiplist and are at the same position.
#[derive(Debug)]
pub struct Iter<'a, List: ?Sized> {
    list:   &'a List,
    cursor: Link,
}

impl<'a, List: ?Sized + SkiplistSeek> Iter<'a, List> {
    /// An iterator at the end position of `list`.
    #[inline]
    #[must_use]
    pub const fn new(list: &'a List) -> Self {
        Self {
            list,
            cursor: None,
        }
    }
}

impl<List: ?Sized> Clone for Iter<'_, List> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            list:   self.list,
            cursor: self.cursor,
        }
    }
}

impl<List: ?Sized> PartialEq for Iter<'_, List> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.list, other.list) && self.cursor == other.cursor
    }
}

impl<List: ?Sized> Eq for Iter<'_, List> {}

impl<'a, List: ?Sized + SkiplistSeek> Iterator for Iter<'a, List> {
    type Item = &'a List::Entry;

    /// Move forwards by one position and return the new current entry.
    ///
    /// From the last entry, this moves to the end position (returning `None`); from the end
    /// position, this moves to the first entry.
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor = if let Some(node) = self.cursor {
            self.list.next_node(node)
        } else {
            self.list.get_first()
        };

        self.current()
    }
}

impl<'a, List: ?Sized + SkiplistSeek> CursorIterator for Iter<'a, List> {
    /// Whether the iterator is at an entry, rather than at the end position.
    #[inline]
    fn valid(&self) -> bool {
        self.cursor.is_some()
    }

    /// The entry at the current position, or `None` at the end position.
    #[inline]
    fn current(&self) -> Option<Self::Item> {
        let list = self.list;
        self.cursor.map(|node| list.node_entry(node))
    }

    /// Move backwards by one position and return the new current entry.
    ///
    /// From the first entry, this moves to the end position; from the end position, this
    /// moves to the last entry (staying at the end position if the skiplist is empty).
    fn prev(&mut self) -> Option<Self::Item> {
        self.cursor = if let Some(node) = self.cursor {
            self.list.find_predecessor(node)
        } else {
            self.list.find_last()
        };

        self.current()
    }
}

impl<List: ?Sized + SkiplistSeek> Seekable<List::Entry, List::Cmp> for Iter<'_, List> {
    /// Move to the end position.
    #[inline]
    fn reset(&mut self) {
        self.cursor = None;
    }

    /// Move to the first entry greater than or equal to `min_bound`, or to the end position if
    /// there is none.
    fn seek(&mut self, min_bound: &List::Entry) {
        self.cursor = self.list.find_greater_or_equal(min_bound);
    }

    /// Move to the last entry strictly less than `strict_upper_bound`, or to the end position
    /// if there is none.
    fn seek_before(&mut self, strict_upper_bound: &List::Entry) {
        self.cursor = self.list.find_strictly_less(strict_upper_bound);
    }

    #[inline]
    fn seek_to_first(&mut self) {
        self.cursor = self.list.get_first();
    }

    fn seek_to_last(&mut self) {
        self.cursor = self.list.find_last();
    }
}
