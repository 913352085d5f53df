//! Key extraction and ordering functors consumed by `RbTree`.

/// Maps a stored value to the key it is ordered by.
pub trait KeyOfValue<T> {
    type Key;

    fn key<'a>(&self, value: &'a T) -> &'a Self::Key;
}

/// Key extractor for set-like trees: the value is its own key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Identity;

impl<T> KeyOfValue<T> for Identity {
    type Key = T;

    fn key<'a>(&self, value: &'a T) -> &'a T {
        value
    }
}

/// Key extractor for map-like trees: the key is the first element of the pair.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SelectFirst;

impl<K, V> KeyOfValue<(K, V)> for SelectFirst {
    type Key = K;

    fn key<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }
}

/// A strict weak ordering over keys.
///
/// The tree only ever asks whether one key is less than another; two keys are equivalent
/// when neither is less than the other. Closures of the form `Fn(&K, &K) -> bool` are
/// comparators too.
///
/// # Examples
///
/// ```
/// use ordered_tree::ordering::{Compare, Greater, Less};
///
/// assert!(Less.less(&1u32, &2u32));
/// assert!(Greater.less(&2u32, &1u32));
///
/// let by_tens = |a: &u32, b: &u32| a / 10 < b / 10;
/// assert!(by_tens.less(&9, &10));
/// assert!(!by_tens.less(&10, &19));
/// ```
pub trait Compare<K: ?Sized> {
    fn less(&self, lhs: &K, rhs: &K) -> bool;

    fn equivalent(&self, lhs: &K, rhs: &K) -> bool {
        !self.less(lhs, rhs) && !self.less(rhs, lhs)
    }
}

/// Ascending order under `Ord`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Less;

impl<K> Compare<K> for Less
where
    K: Ord + ?Sized,
{
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        lhs < rhs
    }
}

/// Descending order under `Ord`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Greater;

impl<K> Compare<K> for Greater
where
    K: Ord + ?Sized,
{
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        lhs > rhs
    }
}

impl<K, F> Compare<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        self(lhs, rhs)
    }
}
