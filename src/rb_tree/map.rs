use crate::config::Config;
use crate::error::Result;
use crate::ordering::{Compare, Less, SelectFirst};
use crate::rb_tree::cursor::{Cursor, IntoIter, Iter};
use crate::rb_tree::tree::RbTree;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::ops::{Index, IndexMut};

/// An ordered map implemented using a red-black tree.
///
/// A red-black tree is a self-balancing binary search tree that colors every node red or
/// black, forbids red nodes with red children, and keeps the number of black nodes the same
/// on every root-to-leaf path. The longest path is therefore at most twice the shortest.
///
/// # Examples
///
/// ```
/// use ordered_tree::TreeMap;
///
/// let mut map = TreeMap::new();
/// map.insert(0, 1).unwrap();
/// map.insert(3, 4).unwrap();
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct TreeMap<T, U, C = Less> {
    tree: RbTree<(T, U), SelectFirst, C>,
}

impl<T, U> TreeMap<T, U> {
    /// Constructs a new, empty `TreeMap<T, U>` in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeMap;
    ///
    /// let map: TreeMap<u32, u32> = TreeMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_compare(Less)
    }
}

impl<T, U, C> TreeMap<T, U, C> {
    /// Constructs a new, empty map whose keys are ordered by `compare`.
    pub fn with_compare(compare: C) -> Self {
        TreeMap {
            tree: RbTree::new(SelectFirst, compare),
        }
    }

    /// Constructs a new, empty map whose keys are ordered by `compare` and whose node storage
    /// follows `config`.
    pub fn with_config(compare: C, config: Config) -> Self {
        TreeMap {
            tree: RbTree::with_config(SelectFirst, compare, config),
        }
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the map, removing all values.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree.min().map(|pair| &pair.0)
    }

    /// Returns the maximum key of the map. Returns `None` if the map is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree.max().map(|pair| &pair.0)
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.insert(2, 2).unwrap();
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreeMapIter<'_, T, U> {
        TreeMapIter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Returns the underlying tree.
    pub fn as_tree(&self) -> &RbTree<(T, U), SelectFirst, C> {
        &self.tree
    }
}

impl<T, U, C> TreeMap<T, U, C>
where
    C: Compare<T>,
{
    // Returns the first position whose key is not less than `key`, and whether its key is
    // equivalent to `key`.
    fn search(&self, key: &T) -> (Cursor, bool) {
        let position = self.tree.lower_bound(key);
        let found = match self.tree.get(position) {
            Some(pair) => !self.tree.key_comp().less(key, &pair.0),
            None => false,
        };
        (position, found)
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, it will
    /// return and replace the old key-value pair.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if a new key needs a node and the node limit is
    /// reached. The map is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.insert(1, 1), Ok(None));
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Ok(Some((1, 1))));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Result<Option<(T, U)>> {
        let (position, found) = self.search(&key);
        if found {
            return Ok(self
                .tree
                .get_mut(position)
                .map(|pair| mem::replace(pair, (key, value))));
        }
        self.tree.insert_unique_hint(position, (key, value))?;
        Ok(None)
    }

    /// Returns a mutable reference to the value of `key`, first inserting `default()` if the
    /// key is absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the key is absent and the node limit is reached.
    /// The value produced by `default` is dropped and the map is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// *map.get_or_insert_with(1, || 0).unwrap() += 5;
    /// *map.get_or_insert_with(1, || 0).unwrap() += 5;
    /// assert_eq!(map[&1], 10);
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: T, default: F) -> Result<&mut U>
    where
        F: FnOnce() -> U,
    {
        let (position, found) = self.search(&key);
        let position = if found {
            position
        } else {
            self.tree.insert_unique_hint(position, (key, default()))?
        };
        match self.tree.get_mut(position) {
            Some(pair) => Ok(&mut pair.1),
            None => unreachable!("Expected the position of a live element."),
        }
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    pub fn remove(&mut self, key: &T) -> Option<(T, U)> {
        let position = self.tree.find(key);
        self.tree.erase(position)
    }

    /// Checks if a key exists in the map.
    pub fn contains_key(&self, key: &T) -> bool {
        self.tree.contains(key)
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    pub fn get(&self, key: &T) -> Option<&U> {
        self.tree.get(self.tree.find(key)).map(|pair| &pair.1)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, 1).unwrap();
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &T) -> Option<&mut U> {
        let position = self.tree.find(key);
        self.tree.get_mut(position).map(|pair| &mut pair.1)
    }

    /// Returns a key in the map that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    pub fn floor(&self, key: &T) -> Option<&T> {
        let position = self.tree.prev(self.tree.upper_bound(key));
        self.tree.get(position).map(|pair| &pair.0)
    }

    /// Returns a key in the map that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.tree.get(self.tree.lower_bound(key)).map(|pair| &pair.0)
    }
}

impl<T, U, C> IntoIterator for TreeMap<T, U, C> {
    type IntoIter = TreeMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            tree_iter: self.tree.into_iter(),
        }
    }
}

impl<'a, T, U, C> IntoIterator for &'a TreeMap<T, U, C>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = TreeMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreeMap<T, U, C>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct TreeMapIntoIter<T, U> {
    tree_iter: IntoIter<(T, U)>,
}

impl<T, U> Iterator for TreeMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<T, U> DoubleEndedIterator for TreeMapIntoIter<T, U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree_iter.next_back()
    }
}

impl<T, U> ExactSizeIterator for TreeMapIntoIter<T, U> {}

/// An iterator for `TreeMap<T, U, C>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct TreeMapIter<'a, T, U> {
    tree_iter: Iter<'a, (T, U)>,
}

impl<'a, T, U> Iterator for TreeMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next().map(|pair| (&pair.0, &pair.1))
    }
}

impl<'a, T, U> DoubleEndedIterator for TreeMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree_iter.next_back().map(|pair| (&pair.0, &pair.1))
    }
}

impl<'a, T, U> FusedIterator for TreeMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
}

impl<T, U, C> Default for TreeMap<T, U, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_compare(C::default())
    }
}

impl<T, U, C> Clone for TreeMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        TreeMap {
            tree: self.tree.clone(),
        }
    }
}

impl<T, U, C> PartialEq for TreeMap<T, U, C>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T, U, C> Eq for TreeMap<T, U, C>
where
    T: Eq,
    U: Eq,
{
}

impl<T, U, C> fmt::Debug for TreeMap<T, U, C>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T, U, C> Index<&'a T> for TreeMap<T, U, C>
where
    C: Compare<T>,
{
    type Output = U;

    fn index(&self, key: &T) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, T, U, C> IndexMut<&'a T> for TreeMap<T, U, C>
where
    C: Compare<T>,
{
    fn index_mut(&mut self, key: &T) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}
