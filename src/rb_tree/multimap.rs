use crate::config::Config;
use crate::error::Result;
use crate::ordering::{Compare, Less, SelectFirst};
use crate::rb_tree::cursor::{IntoIter, Iter};
use crate::rb_tree::tree::RbTree;
use std::fmt;

/// An ordered multimap implemented using a red-black tree.
///
/// A key may be associated with several values. Values under equivalent keys are kept in the
/// order they were inserted.
///
/// # Examples
///
/// ```
/// use ordered_tree::TreeMultiMap;
///
/// let mut map = TreeMultiMap::new();
/// map.insert(1, "a").unwrap();
/// map.insert(0, "b").unwrap();
/// map.insert(1, "c").unwrap();
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get_all(&1).collect::<Vec<&&str>>(), vec![&"a", &"c"]);
///
/// assert_eq!(map.remove_all(&1), vec!["a", "c"]);
/// assert_eq!(map.count(&1), 0);
/// ```
pub struct TreeMultiMap<T, U, C = Less> {
    tree: RbTree<(T, U), SelectFirst, C>,
}

impl<T, U> TreeMultiMap<T, U> {
    /// Constructs a new, empty `TreeMultiMap<T, U>` in ascending key order.
    pub fn new() -> Self {
        Self::with_compare(Less)
    }
}

impl<T, U, C> TreeMultiMap<T, U, C> {
    /// Constructs a new, empty multimap whose keys are ordered by `compare`.
    pub fn with_compare(compare: C) -> Self {
        TreeMultiMap {
            tree: RbTree::new(SelectFirst, compare),
        }
    }

    /// Constructs a new, empty multimap whose keys are ordered by `compare` and whose node
    /// storage follows `config`.
    pub fn with_config(compare: C, config: Config) -> Self {
        TreeMultiMap {
            tree: RbTree::with_config(SelectFirst, compare, config),
        }
    }

    /// Returns the number of key-value pairs in the multimap.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multimap is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the multimap, removing all pairs.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns an iterator over the multimap. Pairs are yielded in key order, and pairs with
    /// equivalent keys in insertion order.
    pub fn iter(&self) -> TreeMultiMapIter<'_, T, U> {
        TreeMultiMapIter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Returns the underlying tree.
    pub fn as_tree(&self) -> &RbTree<(T, U), SelectFirst, C> {
        &self.tree
    }
}

impl<T, U, C> TreeMultiMap<T, U, C>
where
    C: Compare<T>,
{
    /// Associates `value` with `key`, after every value already associated with an equivalent
    /// key.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if the node limit is reached. The multimap is
    /// unchanged.
    pub fn insert(&mut self, key: T, value: U) -> Result<()> {
        self.tree.insert_equal((key, value)).map(|_| ())
    }

    /// Returns an iterator over the values associated with `key`, in insertion order.
    pub fn get_all(&self, key: &T) -> TreeMultiMapValues<'_, T, U> {
        let (first, last) = self.tree.equal_range(key);
        TreeMultiMapValues {
            tree_iter: self.tree.range(first, last),
        }
    }

    /// Returns the number of values associated with `key`.
    pub fn count(&self, key: &T) -> usize {
        self.tree.count(key)
    }

    /// Checks if at least one value is associated with `key`.
    pub fn contains_key(&self, key: &T) -> bool {
        self.tree.contains(key)
    }

    /// Removes every pair whose key is equivalent to `key` and returns their values in
    /// insertion order.
    pub fn remove_all(&mut self, key: &T) -> Vec<U> {
        let (mut first, last) = self.tree.equal_range(key);
        let mut values = Vec::new();
        while first != last {
            let next = self.tree.next(first);
            match self.tree.erase(first) {
                Some((_, value)) => values.push(value),
                None => break,
            }
            first = next;
        }
        values
    }
}

impl<T, U, C> IntoIterator for TreeMultiMap<T, U, C> {
    type IntoIter = IntoIter<(T, U)>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, T, U, C> IntoIterator for &'a TreeMultiMap<T, U, C>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = TreeMultiMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `TreeMultiMap<T, U, C>`.
///
/// This iterator traverses the pairs of the multimap in-order and yields immutable references.
pub struct TreeMultiMapIter<'a, T, U> {
    tree_iter: Iter<'a, (T, U)>,
}

impl<'a, T, U> Iterator for TreeMultiMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next().map(|pair| (&pair.0, &pair.1))
    }
}

impl<'a, T, U> DoubleEndedIterator for TreeMultiMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree_iter.next_back().map(|pair| (&pair.0, &pair.1))
    }
}

/// An iterator over the values associated with one key of a `TreeMultiMap<T, U, C>`.
pub struct TreeMultiMapValues<'a, T, U> {
    tree_iter: Iter<'a, (T, U)>,
}

impl<'a, T, U> Iterator for TreeMultiMapValues<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = &'a U;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next().map(|pair| &pair.1)
    }
}

impl<'a, T, U> DoubleEndedIterator for TreeMultiMapValues<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree_iter.next_back().map(|pair| &pair.1)
    }
}

impl<T, U, C> Default for TreeMultiMap<T, U, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_compare(C::default())
    }
}

impl<T, U, C> Clone for TreeMultiMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        TreeMultiMap {
            tree: self.tree.clone(),
        }
    }
}

impl<T, U, C> PartialEq for TreeMultiMap<T, U, C>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T, U, C> fmt::Debug for TreeMultiMap<T, U, C>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TreeMultiMap;
    use crate::config::Config;
    use crate::error::Error;
    use crate::ordering::Greater;

    #[test]
    fn test_len_empty() {
        let map: TreeMultiMap<u32, u32> = TreeMultiMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_get_all_insertion_order() {
        let mut map = TreeMultiMap::new();
        for payload in 0..9 {
            map.insert(payload % 3, payload).unwrap();
        }
        assert_eq!(map.get_all(&1).cloned().collect::<Vec<u32>>(), vec![1, 4, 7]);
        assert_eq!(map.get_all(&1).rev().cloned().collect::<Vec<u32>>(), vec![7, 4, 1]);
        assert_eq!(map.get_all(&5).next(), None);
        assert_eq!(map.count(&2), 3);
        assert!(map.contains_key(&0));
        assert_eq!(map.as_tree().verify(), Ok(()));
    }

    #[test]
    fn test_iter() {
        let mut map = TreeMultiMap::new();
        map.insert(2, 0).unwrap();
        map.insert(1, 1).unwrap();
        map.insert(2, 2).unwrap();
        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &1), (&2, &0), (&2, &2)],
        );
        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 1), (2, 0), (2, 2)],
        );
    }

    #[test]
    fn test_remove_all() {
        let mut map = TreeMultiMap::new();
        for payload in 0..6 {
            map.insert(payload % 2, payload).unwrap();
        }
        assert_eq!(map.remove_all(&0), vec![0, 2, 4]);
        assert_eq!(map.remove_all(&0), Vec::<u32>::new());
        assert_eq!(map.len(), 3);
        assert_eq!(map.as_tree().verify(), Ok(()));
    }

    #[test]
    fn test_with_config() {
        let mut map = TreeMultiMap::with_config(Greater, Config::default().with_node_limit(2));
        map.insert(1, 'a').unwrap();
        map.insert(2, 'b').unwrap();
        assert_eq!(map.insert(1, 'c'), Err(Error::AllocationFailed { limit: 2 }));
        assert_eq!(
            map.iter().collect::<Vec<(&u32, &char)>>(),
            vec![(&2, &'b'), (&1, &'a')],
        );
    }

    #[test]
    fn test_clone_debug() {
        let mut map = TreeMultiMap::new();
        map.insert(1, 'a').unwrap();
        map.insert(1, 'b').unwrap();
        let copy = map.clone();
        map.clear();
        assert!(copy != map);
        assert_eq!(format!("{:?}", copy), "[(1, 'a'), (1, 'b')]");
    }
}
