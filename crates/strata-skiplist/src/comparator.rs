use std::{cmp::Ordering, fmt::{Debug, Formatter, Result as FmtResult}};

use seekable_iterator::Comparator;


/// A [`Comparator`] which uses the [`Ord`] implementation of the entry type.
///
/// This is the default comparator of a [`TypedSkiplist`].
///
/// [`TypedSkiplist`]: crate::TypedSkiplist
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrdComparator;

impl<T: ?Sized + Ord> Comparator<T> for OrdComparator {
    /// Equivalent to `Ord::cmp(lhs, rhs)`.
    #[inline]
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering {
        Ord::cmp(lhs, rhs)
    }
}

/// A [`Comparator`] which sorts byte strings lexicographically, using the [`Ord`] implementation
/// of `[u8]`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BytewiseComparator;

impl Comparator<[u8]> for BytewiseComparator {
    /// Equivalent to `Ord::cmp(lhs, rhs)`.
    #[inline]
    fn cmp(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
        Ord::cmp(lhs, rhs)
    }
}

/// Inverts the order of the wrapped [`Comparator`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reversed<C> {
    #[inline]
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering {
        self.0.cmp(rhs, lhs)
    }
}

/// Adapts a closure into a [`Comparator`].
#[derive(Default, Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<T: ?Sized, F: Fn(&T, &T) -> Ordering> Comparator<T> for FnComparator<F> {
    #[inline]
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering {
        (self.0)(lhs, rhs)
    }
}

impl<F> Debug for FnComparator<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("FnComparator").field(&"<closure>").finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn reversed_inverts() {
        // `Comparator::cmp` is spelled out, since the comparators also implement `Ord`.
        let cmp = Reversed(OrdComparator);
        assert_eq!(Comparator::cmp(&cmp, &1_u8, &2), Ordering::Greater);
        assert_eq!(Comparator::cmp(&cmp, &2_u8, &2), Ordering::Equal);

        let cmp = Reversed(BytewiseComparator);
        assert_eq!(Comparator::<[u8]>::cmp(&cmp, b"a", b"b"), Ordering::Greater);
    }

    #[test]
    fn closures_and_erased_comparators() {
        let by_len = FnComparator(|lhs: &str, rhs: &str| Ord::cmp(&lhs.len(), &rhs.len()));
        assert_eq!(Comparator::<str>::cmp(&by_len, "aaa", "b"), Ordering::Greater);

        let erased: Box<dyn Comparator<[u8]>> = Box::new(BytewiseComparator);
        assert_eq!(Comparator::<[u8]>::cmp(erased.as_ref(), b"b", b"a"), Ordering::Greater);

        let _check_that_debug_works = format!("{by_len:?}");
    }
}
