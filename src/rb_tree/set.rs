use crate::config::Config;
use crate::error::Result;
use crate::ordering::{Compare, Identity, Less};
use crate::rb_tree::cursor::{IntoIter, Iter};
use crate::rb_tree::tree::RbTree;
use std::fmt;
use std::iter::FusedIterator;

/// An ordered set implemented using a red-black tree.
///
/// A red-black tree is a self-balancing binary search tree that colors every node red or
/// black, forbids red nodes with red children, and keeps the number of black nodes the same
/// on every root-to-leaf path. The longest path is therefore at most twice the shortest.
///
/// # Examples
///
/// ```
/// use ordered_tree::TreeSet;
///
/// let mut set = TreeSet::new();
/// set.insert(0).unwrap();
/// set.insert(3).unwrap();
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct TreeSet<T, C = Less> {
    tree: RbTree<T, Identity, C>,
}

impl<T> TreeSet<T> {
    /// Constructs a new, empty `TreeSet<T>` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeSet;
    ///
    /// let set: TreeSet<u32> = TreeSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_compare(Less)
    }
}

impl<T, C> TreeSet<T, C> {
    /// Constructs a new, empty set ordered by `compare`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::ordering::Greater;
    /// use ordered_tree::TreeSet;
    ///
    /// let mut set = TreeSet::with_compare(Greater);
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&2, &1]);
    /// ```
    pub fn with_compare(compare: C) -> Self {
        TreeSet {
            tree: RbTree::new(Identity, compare),
        }
    }

    /// Constructs a new, empty set ordered by `compare` whose node storage follows `config`.
    pub fn with_config(compare: C, config: Config) -> Self {
        TreeSet {
            tree: RbTree::with_config(Identity, compare, config),
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeSet;
    ///
    /// let mut set = TreeSet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree.min()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree.max()
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeSet;
    ///
    /// let mut set = TreeSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreeSetIter<'_, T> {
        TreeSetIter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Returns the underlying tree.
    pub fn as_tree(&self) -> &RbTree<T, Identity, C> {
        &self.tree
    }
}

impl<T, C> TreeSet<T, C>
where
    C: Compare<T>,
{
    /// Inserts a key into the set. Returns `true` if the key was not already present; an
    /// equivalent key already in the set is kept and `key` is dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the node limit is reached. The set is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeSet;
    ///
    /// let mut set = TreeSet::new();
    /// assert_eq!(set.insert(1), Ok(true));
    /// assert_eq!(set.insert(1), Ok(false));
    /// ```
    pub fn insert(&mut self, key: T) -> Result<bool> {
        self.tree.insert_unique(key).map(|(_, inserted)| inserted)
    }

    /// Removes a key from the set. If the key exists in the set, it will return the associated
    /// key. Otherwise it will return `None`.
    pub fn remove(&mut self, key: &T) -> Option<T> {
        let position = self.tree.find(key);
        self.tree.erase(position)
    }

    /// Checks if a key exists in the set.
    pub fn contains(&self, key: &T) -> bool {
        self.tree.contains(key)
    }

    /// Returns the key in the set equivalent to `key`, if any.
    pub fn get(&self, key: &T) -> Option<&T> {
        self.tree.get(self.tree.find(key))
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeSet;
    ///
    /// let mut set = TreeSet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.tree.get(self.tree.prev(self.tree.upper_bound(key)))
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.tree.get(self.tree.lower_bound(key))
    }

    /// Returns an iterator over the keys in `[lo, hi)`. The iterator is empty if `hi` is not
    /// greater than `lo`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeSet;
    ///
    /// let mut set = TreeSet::new();
    /// for key in 0..10 {
    ///     set.insert(key).unwrap();
    /// }
    /// assert_eq!(set.range(&3, &6).collect::<Vec<&u32>>(), vec![&3, &4, &5]);
    /// assert_eq!(set.range(&6, &3).next(), None);
    /// ```
    pub fn range(&self, lo: &T, hi: &T) -> TreeSetIter<'_, T> {
        let tree_iter = if self.tree.key_comp().less(lo, hi) {
            self.tree.range(self.tree.lower_bound(lo), self.tree.lower_bound(hi))
        } else {
            self.tree.range(self.tree.end(), self.tree.end())
        };
        TreeSetIter { tree_iter }
    }
}

impl<T, C> IntoIterator for TreeSet<T, C> {
    type IntoIter = TreeSetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            tree_iter: self.tree.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a TreeSet<T, C>
where
    T: 'a,
{
    type IntoIter = TreeSetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreeSet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct TreeSetIntoIter<T> {
    tree_iter: IntoIter<T>,
}

impl<T> Iterator for TreeSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<T> DoubleEndedIterator for TreeSetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree_iter.next_back()
    }
}

impl<T> ExactSizeIterator for TreeSetIntoIter<T> {}

/// An iterator for `TreeSet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct TreeSetIter<'a, T> {
    tree_iter: Iter<'a, T>,
}

impl<'a, T> Iterator for TreeSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next()
    }
}

impl<'a, T> DoubleEndedIterator for TreeSetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree_iter.next_back()
    }
}

impl<'a, T> FusedIterator for TreeSetIter<'a, T> where T: 'a {}

impl<T, C> Default for TreeSet<T, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_compare(C::default())
    }
}

impl<T, C> Clone for TreeSet<T, C>
where
    T: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        TreeSet {
            tree: self.tree.clone(),
        }
    }
}

impl<T, C> PartialEq for TreeSet<T, C>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T, C> Eq for TreeSet<T, C> where T: Eq {}

impl<T, C> fmt::Debug for TreeSet<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}
