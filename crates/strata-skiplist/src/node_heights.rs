use oorandom::Rand32;


/// The maximum height of the skiplists in this crate.
///
/// With the branching factor below, one node is generated with this maximum height per
/// approximately 4 million entries inserted into a skiplist (on average).
pub const MAX_HEIGHT: usize = 12;

/// Each additional level of a node is included with probability `1 / BRANCHING_FACTOR`.
pub const BRANCHING_FACTOR: u32 = 4;

/// The seed used by skiplists which are not explicitly seeded.
pub const DEFAULT_SEED: u64 = 0xdead_beef;


/// A simple PRNG trait, used for generating random heights for nodes in a skiplist.
///
/// Injecting a deterministic implementation makes node heights, and thus the shape of a
/// skiplist, reproducible.
pub trait Prng32 {
    /// Produces a random `u32` in the range `[0, u32::MAX]`.
    ///
    /// (See [`oorandom::Rand32::rand_u32`]; this function is the same interface.)
    #[must_use]
    fn rand_u32(&mut self) -> u32;
}

impl Prng32 for Rand32 {
    #[inline]
    fn rand_u32(&mut self) -> u32 {
        // Inherent methods take priority over trait methods
        Self::rand_u32(self)
    }
}

/// Return a random value in `1..=MAX_HEIGHT`, in a geometric distribution (higher values
/// are exponentially less likely).
///
/// Technically, `MAX_HEIGHT` is slightly more likely than in an exact and unbounded geometric
/// distribution, since what would be higher values are capped to `MAX_HEIGHT`.
pub(crate) fn random_node_height<P: ?Sized + Prng32>(prng: &mut P) -> usize {
    let mut height = 1;
    while height < MAX_HEIGHT && prng.rand_u32() % BRANCHING_FACTOR == 0 {
        height += 1;
    }
    height
}
