use crate::config::Config;
use crate::error::Result;
use crate::ordering::{Compare, Identity, Less};
use crate::rb_tree::cursor::{IntoIter, Iter};
use crate::rb_tree::tree::RbTree;
use std::fmt;

/// An ordered multiset implemented using a red-black tree.
///
/// Equivalent keys are kept side by side in the order they were inserted.
///
/// # Examples
///
/// ```
/// use ordered_tree::TreeMultiSet;
///
/// let mut set = TreeMultiSet::new();
/// set.insert(1).unwrap();
/// set.insert(2).unwrap();
/// set.insert(1).unwrap();
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.count(&1), 2);
///
/// assert_eq!(set.remove_one(&1), Some(1));
/// assert_eq!(set.count(&1), 1);
/// assert_eq!(set.remove_all(&1), 1);
/// assert!(!set.contains(&1));
/// ```
pub struct TreeMultiSet<T, C = Less> {
    tree: RbTree<T, Identity, C>,
}

impl<T> TreeMultiSet<T> {
    /// Constructs a new, empty `TreeMultiSet<T>` in ascending order.
    pub fn new() -> Self {
        Self::with_compare(Less)
    }
}

impl<T, C> TreeMultiSet<T, C> {
    /// Constructs a new, empty multiset ordered by `compare`.
    pub fn with_compare(compare: C) -> Self {
        TreeMultiSet {
            tree: RbTree::new(Identity, compare),
        }
    }

    /// Constructs a new, empty multiset ordered by `compare` whose node storage follows
    /// `config`.
    pub fn with_config(compare: C, config: Config) -> Self {
        TreeMultiSet {
            tree: RbTree::with_config(Identity, compare, config),
        }
    }

    /// Returns the number of elements in the multiset, counting duplicates.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the multiset, removing all values.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum key of the multiset. Returns `None` if the multiset is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree.min()
    }

    /// Returns the maximum key of the multiset. Returns `None` if the multiset is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree.max()
    }

    /// Returns an iterator over the multiset in-order. Duplicates are yielded in insertion
    /// order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Returns the underlying tree.
    pub fn as_tree(&self) -> &RbTree<T, Identity, C> {
        &self.tree
    }
}

impl<T, C> TreeMultiSet<T, C>
where
    C: Compare<T>,
{
    /// Inserts a key after every key equivalent to it.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the node limit is reached. The multiset is
    /// unchanged.
    pub fn insert(&mut self, key: T) -> Result<()> {
        self.tree.insert_equal(key).map(|_| ())
    }

    /// Returns the number of keys equivalent to `key`.
    pub fn count(&self, key: &T) -> usize {
        self.tree.count(key)
    }

    /// Checks if a key equivalent to `key` exists in the multiset.
    pub fn contains(&self, key: &T) -> bool {
        self.tree.contains(key)
    }

    /// Removes the earliest inserted key equivalent to `key` and returns it.
    pub fn remove_one(&mut self, key: &T) -> Option<T> {
        let position = self.tree.find(key);
        self.tree.erase(position)
    }

    /// Removes every key equivalent to `key` and returns how many were removed.
    pub fn remove_all(&mut self, key: &T) -> usize {
        self.tree.erase_key(key)
    }

    /// Returns an iterator over every key equivalent to `key`, in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeMultiSet;
    ///
    /// let mut set = TreeMultiSet::with_compare(|a: &u32, b: &u32| a / 10 < b / 10);
    /// for key in &[15, 3, 11, 27, 19] {
    ///     set.insert(*key).unwrap();
    /// }
    /// assert_eq!(set.equal_range(&10).collect::<Vec<&u32>>(), vec![&15, &11, &19]);
    /// ```
    pub fn equal_range(&self, key: &T) -> Iter<'_, T> {
        let (first, last) = self.tree.equal_range(key);
        self.tree.range(first, last)
    }
}

impl<T, C> IntoIterator for TreeMultiSet<T, C> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, T, C> IntoIterator for &'a TreeMultiSet<T, C>
where
    T: 'a,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> Default for TreeMultiSet<T, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_compare(C::default())
    }
}

impl<T, C> Clone for TreeMultiSet<T, C>
where
    T: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        TreeMultiSet {
            tree: self.tree.clone(),
        }
    }
}

impl<T, C> PartialEq for TreeMultiSet<T, C>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T, C> Eq for TreeMultiSet<T, C> where T: Eq {}

impl<T, C> fmt::Debug for TreeMultiSet<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

#[cfg(test)]
mod tests {
    use super::TreeMultiSet;
    use crate::config::Config;
    use crate::error::Error;
    use crate::ordering::Less;

    #[test]
    fn test_len_empty() {
        let set: TreeMultiSet<u32> = TreeMultiSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert_eq!(set.min(), None);
    }

    #[test]
    fn test_insert_duplicates() {
        let mut set = TreeMultiSet::new();
        for key in &[3, 1, 3, 2, 3] {
            set.insert(*key).unwrap();
        }
        assert_eq!(set.len(), 5);
        assert_eq!(set.count(&3), 3);
        assert_eq!(set.count(&4), 0);
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3, &3, &3]);
        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&3));
    }

    #[test]
    fn test_equal_range_keeps_insertion_order() {
        let mut set = TreeMultiSet::with_compare(|a: &(u32, u32), b: &(u32, u32)| a.0 < b.0);
        for payload in 0..10 {
            set.insert((payload % 2, payload)).unwrap();
        }
        assert_eq!(
            set.equal_range(&(1, 0)).map(|pair| pair.1).collect::<Vec<u32>>(),
            vec![1, 3, 5, 7, 9],
        );
        assert_eq!(set.as_tree().verify(), Ok(()));
    }

    #[test]
    fn test_remove_one() {
        let mut set = TreeMultiSet::with_compare(|a: &(u32, u32), b: &(u32, u32)| a.0 < b.0);
        set.insert((1, 0)).unwrap();
        set.insert((1, 1)).unwrap();
        assert_eq!(set.remove_one(&(1, 9)), Some((1, 0)));
        assert_eq!(set.remove_one(&(1, 9)), Some((1, 1)));
        assert_eq!(set.remove_one(&(1, 9)), None);
    }

    #[test]
    fn test_remove_all() {
        let mut set = TreeMultiSet::new();
        for key in &[1, 2, 2, 2, 3] {
            set.insert(*key).unwrap();
        }
        assert_eq!(set.remove_all(&2), 3);
        assert_eq!(set.remove_all(&2), 0);
        assert!(!set.contains(&2));
        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3]);
    }

    #[test]
    fn test_with_config() {
        let mut set = TreeMultiSet::with_config(Less, Config::default().with_node_limit(2));
        set.insert(1).unwrap();
        set.insert(1).unwrap();
        assert_eq!(set.insert(1), Err(Error::AllocationFailed { limit: 2 }));
        assert_eq!(set.count(&1), 2);
    }

    #[test]
    fn test_clone_eq() {
        let mut set = TreeMultiSet::new();
        set.insert(1).unwrap();
        set.insert(1).unwrap();
        let copy = set.clone();
        assert_eq!(copy, set);
        assert_eq!(format!("{:?}", copy), "{1, 1}");
    }
}
