//! Arena-backed [skiplists], with pluggable comparators and seekable, bidirectional cursors.
//!
//! Entries are inserted but never individually removed. Every node lives in a [`NodeArena`]
//! owned by its skiplist and is addressed by index, so the whole structure is released at once
//! when the skiplist is dropped.
//!
//! [skiplists]: https://en.wikipedia.org/wiki/Skip_list

mod comparator;
mod node_heights;

pub mod arena;
mod list;
mod iter;


pub use self::{
    arena::{ByteArena, NodeArena, TypedArena},
    comparator::{BytewiseComparator, FnComparator, OrdComparator, Reversed},
    iter::{Iter, SkiplistSeek},
    list::{ByteSkiplist, Skiplist, TypedSkiplist},
    node_heights::{BRANCHING_FACTOR, DEFAULT_SEED, MAX_HEIGHT, Prng32},
};

pub use seekable_iterator::{Comparator, CursorIterator, Seekable};
