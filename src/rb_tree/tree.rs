use crate::arena::Entry;
use crate::config::Config;
use crate::error::Result;
use crate::ordering::{Compare, KeyOfValue};
use crate::rb_tree::cursor::{Cursor, IntoIter, Iter};
use crate::rb_tree::node::{self, Node, NodeArena, Side};
use log::debug;
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// Where a new value would be linked, or the element that already holds its key.
enum Slot {
    Vacant { parent: Option<Entry>, side: Side },
    Occupied(Entry),
}

/// An arena-backed red-black tree ordered by a key extracted from each stored value.
///
/// The tree is the engine under `TreeSet`, `TreeMap`, `TreeMultiSet` and `TreeMultiMap`.
/// It stores values of type `T`, orders them by the key `X` extracts, and compares keys with
/// `C`. Elements are addressed by `Cursor`s, which remain valid across insertions and across
/// erasures of other elements.
///
/// Nodes live in a `TypedArena` and refer to each other by `Entry` handles. The tree also
/// caches its minimum and maximum so `begin`, `min` and `max` are O(1).
///
/// # Examples
///
/// ```
/// use ordered_tree::ordering::{Identity, Less};
/// use ordered_tree::RbTree;
///
/// let mut tree = RbTree::new(Identity, Less);
/// for key in &[10, 7, 8, 15, 5] {
///     tree.insert_unique(*key).unwrap();
/// }
///
/// assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), vec![5, 7, 8, 10, 15]);
/// assert_eq!(tree.get(tree.find(&8)), Some(&8));
/// assert!(tree.find(&9).is_end());
///
/// let position = tree.find(&10);
/// assert_eq!(tree.erase(position), Some(10));
/// assert!(tree.verify().is_ok());
/// ```
pub struct RbTree<T, X, C> {
    pub(super) arena: NodeArena<T>,
    pub(super) root: Option<Entry>,
    pub(super) leftmost: Option<Entry>,
    pub(super) rightmost: Option<Entry>,
    pub(super) len: usize,
    config: Config,
    key_of: X,
    compare: C,
}

impl<T, X, C> RbTree<T, X, C> {
    /// Constructs a new, empty tree with the default `Config`.
    pub fn new(key_of: X, compare: C) -> Self {
        Self::with_config(key_of, compare, Config::default())
    }

    /// Constructs a new, empty tree whose node arena is sized according to `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::ordering::{Identity, Less};
    /// use ordered_tree::{Config, Error, RbTree};
    ///
    /// let mut tree = RbTree::with_config(Identity, Less, Config::default().with_node_limit(1));
    /// assert!(tree.insert_equal(1).is_ok());
    /// assert_eq!(tree.insert_equal(2), Err(Error::AllocationFailed { limit: 1 }));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn with_config(key_of: X, compare: C, config: Config) -> Self {
        RbTree {
            arena: NodeArena::with_config(&config),
            root: None,
            leftmost: None,
            rightmost: None,
            len: 0,
            config,
            key_of,
            compare,
        }
    }

    pub(super) fn node(&self, entry: Entry) -> &Node<T> {
        &self.arena[entry]
    }

    pub(super) fn node_mut(&mut self, entry: Entry) -> &mut Node<T> {
        &mut self.arena[entry]
    }

    /// Returns the ordering functor of the tree.
    pub fn key_comp(&self) -> &C {
        &self.compare
    }

    /// Returns the key extraction functor of the tree.
    pub fn key_of(&self) -> &X {
        &self.key_of
    }

    /// Returns the configuration the tree was constructed with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a cursor to the minimum element, or the end position if the tree is empty.
    pub fn begin(&self) -> Cursor {
        Cursor {
            node: self.leftmost,
        }
    }

    /// Returns the one-past-the-end position.
    pub fn end(&self) -> Cursor {
        Cursor::end()
    }

    /// Returns the position after `position`. The position after the maximum is the end
    /// position, and the position after the end position is `begin()`.
    pub fn next(&self, position: Cursor) -> Cursor {
        match position.node {
            Some(entry) => Cursor {
                node: node::successor(&self.arena, entry),
            },
            None => self.begin(),
        }
    }

    /// Returns the position before `position`. The position before the end position is the
    /// maximum, and the position before the minimum is the end position.
    pub fn prev(&self, position: Cursor) -> Cursor {
        match position.node {
            Some(entry) => Cursor {
                node: node::predecessor(&self.arena, entry),
            },
            None => Cursor {
                node: self.rightmost,
            },
        }
    }

    /// Returns the value at `position`, or `None` for the end position or an erased element.
    pub fn get(&self, position: Cursor) -> Option<&T> {
        position
            .node
            .and_then(|entry| self.arena.get(&entry))
            .map(|node| &node.value)
    }

    /// Mutable access to the value at `position`. Callers must not change the value's key.
    pub(crate) fn get_mut(&mut self, position: Cursor) -> Option<&mut T> {
        match position.node {
            Some(entry) => self.arena.get_mut(&entry).map(|node| &mut node.value),
            None => None,
        }
    }

    /// Returns the minimum element of the tree. Returns `None` if the tree is empty.
    pub fn min(&self) -> Option<&T> {
        self.leftmost.map(|entry| &self.node(entry).value)
    }

    /// Returns the maximum element of the tree. Returns `None` if the tree is empty.
    pub fn max(&self) -> Option<&T> {
        self.rightmost.map(|entry| &self.node(entry).value)
    }

    /// Returns an iterator over the tree in-order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.arena, self.leftmost, self.rightmost)
    }

    /// Returns an iterator over the half-open run of positions `[first, last)`. `last` must be
    /// reachable from `first` by repeated `next`.
    pub fn range(&self, first: Cursor, last: Cursor) -> Iter<'_, T> {
        if first == last {
            return Iter::new(&self.arena, None, None);
        }
        Iter::new(&self.arena, first.node, self.prev(last).node)
    }

    /// Removes the element at `position` and returns it. Returns `None` for the end position.
    /// Every other cursor stays valid.
    ///
    /// # Panics
    ///
    /// Panics if `position` refers to an element that was already erased.
    pub fn erase(&mut self, position: Cursor) -> Option<T> {
        let entry = position.node?;
        self.unlink(entry);
        self.len -= 1;
        Some(self.arena.free(&entry).value)
    }

    /// Removes every element in `[first, last)` and returns how many were removed.
    pub fn erase_range(&mut self, mut first: Cursor, last: Cursor) -> usize {
        if first == self.begin() && last.is_end() {
            let removed = self.len;
            self.clear();
            return removed;
        }

        let mut removed = 0;
        while first != last {
            let next = self.next(first);
            if self.erase(first).is_none() {
                break;
            }
            removed += 1;
            first = next;
        }
        removed
    }

    /// Removes every element. Nodes are released wholesale, without walking the tree.
    pub fn clear(&mut self) {
        if self.len != 0 {
            debug!("clearing tree of {} elements", self.len);
        }
        self.arena.clear();
        self.root = None;
        self.leftmost = None;
        self.rightmost = None;
        self.len = 0;
    }

    /// Exchanges the contents, functors and configuration of two trees.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Rebuilds `source`'s node graph in this tree's (empty) arena. Returns an error without
    /// linking anything further if an allocation fails; the partial copy is released when the
    /// tree holding it is dropped.
    fn copy_nodes(&mut self, source: &Self) -> Result<()>
    where
        T: Clone,
    {
        let source_root = match source.root {
            Some(root) => root,
            None => return Ok(()),
        };

        let mut stack = vec![(source_root, None, Side::Left)];
        while let Some((source_entry, parent, side)) = stack.pop() {
            let source_node = source.node(source_entry);
            let mut copy = Node::new(source_node.value.clone());
            copy.color = source_node.color;
            copy.parent = parent;
            let entry = self.arena.allocate(copy)?;

            match parent {
                None => self.root = Some(entry),
                Some(parent) => *self.node_mut(parent).child_mut(side) = Some(entry),
            }
            self.len += 1;

            if let Some(right) = source_node.right {
                stack.push((right, Some(entry), Side::Right));
            }
            if let Some(left) = source_node.left {
                stack.push((left, Some(entry), Side::Left));
            }
        }

        self.leftmost = self.root.map(|root| node::minimum(&self.arena, root));
        self.rightmost = self.root.map(|root| node::maximum(&self.arena, root));
        Ok(())
    }

    /// Makes a deep copy of the tree into a fresh arena with the same configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::ordering::{Identity, Less};
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::new(Identity, Less);
    /// tree.insert_unique(1).unwrap();
    ///
    /// let copy = tree.try_clone().unwrap();
    /// tree.clear();
    /// assert_eq!(copy.iter().collect::<Vec<&u32>>(), vec![&1]);
    /// ```
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
        X: Clone,
        C: Clone,
    {
        let mut copy = RbTree::with_config(self.key_of.clone(), self.compare.clone(), self.config);
        copy.copy_nodes(self)?;
        debug!("copied tree of {} elements", copy.len);
        Ok(copy)
    }

    /// Replaces the contents and functors of this tree with a deep copy of `source`, keeping
    /// this tree's configuration. On failure this tree is left untouched.
    pub fn copy_from(&mut self, source: &Self) -> Result<()>
    where
        T: Clone,
        X: Clone,
        C: Clone,
    {
        let mut copy = RbTree::with_config(source.key_of.clone(), source.compare.clone(), self.config);
        copy.copy_nodes(source)?;
        debug!("copied tree of {} elements", copy.len);
        *self = copy;
        Ok(())
    }
}

impl<T, X, C> RbTree<T, X, C>
where
    X: KeyOfValue<T>,
    C: Compare<X::Key>,
{
    fn key_at(&self, entry: Entry) -> &X::Key {
        self.key_of.key(&self.node(entry).value)
    }

    fn less(&self, lhs: &X::Key, rhs: &X::Key) -> bool {
        self.compare.less(lhs, rhs)
    }

    /// Returns a cursor to the first element whose key is not less than `key`.
    pub fn lower_bound(&self, key: &X::Key) -> Cursor {
        let mut candidate = None;
        let mut curr = self.root;
        while let Some(entry) = curr {
            if !self.less(self.key_at(entry), key) {
                candidate = Some(entry);
                curr = self.node(entry).left;
            } else {
                curr = self.node(entry).right;
            }
        }
        Cursor { node: candidate }
    }

    /// Returns a cursor to the first element whose key is greater than `key`.
    pub fn upper_bound(&self, key: &X::Key) -> Cursor {
        let mut candidate = None;
        let mut curr = self.root;
        while let Some(entry) = curr {
            if self.less(key, self.key_at(entry)) {
                candidate = Some(entry);
                curr = self.node(entry).left;
            } else {
                curr = self.node(entry).right;
            }
        }
        Cursor { node: candidate }
    }

    /// Returns `(lower_bound(key), upper_bound(key))`.
    pub fn equal_range(&self, key: &X::Key) -> (Cursor, Cursor) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Returns a cursor to the first element whose key is equivalent to `key`, or the end
    /// position if there is none.
    pub fn find(&self, key: &X::Key) -> Cursor {
        let position = self.lower_bound(key);
        match position.node {
            Some(entry) if !self.less(key, self.key_at(entry)) => position,
            _ => Cursor::end(),
        }
    }

    /// Checks if an element with a key equivalent to `key` exists in the tree.
    pub fn contains(&self, key: &X::Key) -> bool {
        !self.find(key).is_end()
    }

    /// Returns the number of elements whose key is equivalent to `key`.
    pub fn count(&self, key: &X::Key) -> usize {
        let (first, last) = self.equal_range(key);
        self.range(first, last).count()
    }

    fn locate_unique(&self, key: &X::Key) -> Slot {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(entry) = curr {
            parent = Some(entry);
            side = if self.less(key, self.key_at(entry)) {
                Side::Left
            } else {
                Side::Right
            };
            curr = self.node(entry).child(side);
        }

        let before = match (parent, side) {
            (None, _) => return Slot::Vacant { parent, side },
            (Some(entry), Side::Left) => match node::predecessor(&self.arena, entry) {
                Some(before) => before,
                None => return Slot::Vacant { parent, side },
            },
            (Some(entry), Side::Right) => entry,
        };

        if self.less(self.key_at(before), key) {
            Slot::Vacant { parent, side }
        } else {
            Slot::Occupied(before)
        }
    }

    fn locate_equal(&self, key: &X::Key) -> Slot {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(entry) = curr {
            parent = Some(entry);
            side = if self.less(key, self.key_at(entry)) {
                Side::Left
            } else {
                Side::Right
            };
            curr = self.node(entry).child(side);
        }
        Slot::Vacant { parent, side }
    }

    /// The slot immediately before `position`, whose predecessor is `before`.
    fn slot_between(&self, before: Entry, position: Entry) -> Slot {
        if self.node(before).right.is_none() {
            Slot::Vacant {
                parent: Some(before),
                side: Side::Right,
            }
        } else {
            Slot::Vacant {
                parent: Some(position),
                side: Side::Left,
            }
        }
    }

    fn locate_unique_near(&self, hint: Cursor, key: &X::Key) -> Slot {
        match hint.node {
            None => match self.rightmost {
                Some(max) if self.less(self.key_at(max), key) => Slot::Vacant {
                    parent: Some(max),
                    side: Side::Right,
                },
                _ => self.locate_unique(key),
            },
            Some(position) if Some(position) == self.leftmost => {
                if self.less(key, self.key_at(position)) {
                    Slot::Vacant {
                        parent: Some(position),
                        side: Side::Left,
                    }
                } else {
                    self.locate_unique(key)
                }
            },
            Some(position) => match node::predecessor(&self.arena, position) {
                Some(before)
                    if self.less(self.key_at(before), key)
                        && self.less(key, self.key_at(position)) =>
                {
                    self.slot_between(before, position)
                },
                _ => self.locate_unique(key),
            },
        }
    }

    // A hinted equal insertion only links at the hint when the new value would still be the
    // last among its equals there, matching `locate_equal`.
    fn locate_equal_near(&self, hint: Cursor, key: &X::Key) -> Slot {
        match hint.node {
            None => match self.rightmost {
                Some(max) if !self.less(key, self.key_at(max)) => Slot::Vacant {
                    parent: Some(max),
                    side: Side::Right,
                },
                _ => self.locate_equal(key),
            },
            Some(position) if Some(position) == self.leftmost => {
                if self.less(key, self.key_at(position)) {
                    Slot::Vacant {
                        parent: Some(position),
                        side: Side::Left,
                    }
                } else {
                    self.locate_equal(key)
                }
            },
            Some(position) => match node::predecessor(&self.arena, position) {
                Some(before)
                    if !self.less(key, self.key_at(before))
                        && self.less(key, self.key_at(position)) =>
                {
                    self.slot_between(before, position)
                },
                _ => self.locate_equal(key),
            },
        }
    }

    fn insert_at(&mut self, slot: Slot, value: T) -> Result<(Cursor, bool)> {
        match slot {
            Slot::Vacant { parent, side } => {
                let entry = self.link(parent, side, value)?;
                Ok((Cursor::at(entry), true))
            },
            Slot::Occupied(entry) => Ok((Cursor::at(entry), false)),
        }
    }

    /// Allocates a node for `value` and attaches it as the `side` child of `parent`, or as the
    /// root when `parent` is `None`. Nothing is relinked unless the allocation succeeds.
    fn link(&mut self, parent: Option<Entry>, side: Side, value: T) -> Result<Entry> {
        let mut new_node = Node::new(value);
        new_node.parent = parent;
        let entry = self.arena.allocate(new_node)?;

        match parent {
            None => {
                self.root = Some(entry);
                self.leftmost = Some(entry);
                self.rightmost = Some(entry);
            },
            Some(parent) => {
                *self.node_mut(parent).child_mut(side) = Some(entry);
                match side {
                    Side::Left if self.leftmost == Some(parent) => self.leftmost = Some(entry),
                    Side::Right if self.rightmost == Some(parent) => self.rightmost = Some(entry),
                    _ => {},
                }
            },
        }

        self.rebalance_after_insert(entry);
        self.len += 1;
        Ok(entry)
    }

    /// Inserts `value` unless an element with an equivalent key exists. Returns a cursor to
    /// the element with that key and whether `value` was inserted; a rejected `value` is
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::ordering::{Identity, Less};
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::new(Identity, Less);
    /// let (first, inserted) = tree.insert_unique(1).unwrap();
    /// assert!(inserted);
    /// assert_eq!(tree.insert_unique(1).unwrap(), (first, false));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert_unique(&mut self, value: T) -> Result<(Cursor, bool)> {
        let slot = self.locate_unique(self.key_of.key(&value));
        self.insert_at(slot, value)
    }

    /// Inserts `value` after every element with an equivalent key.
    pub fn insert_equal(&mut self, value: T) -> Result<Cursor> {
        let slot = self.locate_equal(self.key_of.key(&value));
        self.insert_at(slot, value).map(|(position, _)| position)
    }

    /// Like `insert_unique`, but links directly before `hint` when that keeps the tree
    /// ordered, skipping the descent from the root. Falls back to `insert_unique` otherwise.
    pub fn insert_unique_hint(&mut self, hint: Cursor, value: T) -> Result<Cursor> {
        let slot = self.locate_unique_near(hint, self.key_of.key(&value));
        self.insert_at(slot, value).map(|(position, _)| position)
    }

    /// Like `insert_equal`, but links directly before `hint` when the value would still follow
    /// all of its equals there. Falls back to `insert_equal` otherwise.
    pub fn insert_equal_hint(&mut self, hint: Cursor, value: T) -> Result<Cursor> {
        let slot = self.locate_equal_near(hint, self.key_of.key(&value));
        self.insert_at(slot, value).map(|(position, _)| position)
    }

    /// Inserts every value of `values` with `insert_unique`, stopping at the first failure.
    pub fn insert_unique_iter<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.insert_unique(value)?;
        }
        Ok(())
    }

    /// Inserts every value of `values` with `insert_equal`, stopping at the first failure.
    pub fn insert_equal_iter<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.insert_equal(value)?;
        }
        Ok(())
    }

    /// Removes every element whose key is equivalent to `key` and returns how many were
    /// removed.
    pub fn erase_key(&mut self, key: &X::Key) -> usize {
        let (first, last) = self.equal_range(key);
        self.erase_range(first, last)
    }
}

impl<T, X, C> IntoIterator for RbTree<T, X, C> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.arena, self.leftmost)
    }
}

impl<'a, T, X, C> IntoIterator for &'a RbTree<T, X, C>
where
    T: 'a,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, X, C> Clone for RbTree<T, X, C>
where
    T: Clone,
    X: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        // A fresh arena with the same limit always has room for a live tree's nodes.
        match self.try_clone() {
            Ok(copy) => copy,
            Err(error) => unreachable!("{}", error),
        }
    }
}

impl<T, X, C> PartialEq for RbTree<T, X, C>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, X, C> Eq for RbTree<T, X, C> where T: Eq {}

impl<T, X, C> PartialOrd for RbTree<T, X, C>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T, X, C> Ord for RbTree<T, X, C>
where
    T: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T, X, C> fmt::Debug for RbTree<T, X, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, X, C> Default for RbTree<T, X, C>
where
    X: Default,
    C: Default,
{
    fn default() -> Self {
        Self::new(X::default(), C::default())
    }
}

#[cfg(test)]
mod tests {
    use super::RbTree;
    use crate::config::Config;
    use crate::rb_tree::cursor::Cursor;
    use crate::rb_tree::node::Color::{Black, Red};
    use crate::error::Error;
    use crate::ordering::{Greater, Identity, Less, SelectFirst};

    fn tree_of(keys: &[u32]) -> RbTree<u32, Identity, Less> {
        let mut tree = RbTree::new(Identity, Less);
        for key in keys {
            tree.insert_unique(*key).unwrap();
        }
        tree
    }

    fn contents<X, C>(tree: &RbTree<u32, X, C>) -> Vec<u32> {
        tree.iter().cloned().collect()
    }

    const SCENARIO: [u32; 9] = [10, 7, 8, 15, 5, 6, 11, 13, 12];

    #[test]
    fn test_len_empty() {
        let tree: RbTree<u32, Identity, Less> = RbTree::new(Identity, Less);
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
        assert_eq!(RbTree::min(&tree), None);
        assert_eq!(RbTree::max(&tree), None);
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn test_insert_scenario() {
        let mut tree: RbTree<u32, Identity, Less> = RbTree::new(Identity, Less);
        for (index, key) in SCENARIO.iter().enumerate() {
            tree.insert_unique(*key).unwrap();
            assert_eq!(tree.len(), index + 1);
            assert_eq!(tree.verify(), Ok(()));
        }
        assert_eq!(contents(&tree), vec![5, 6, 7, 8, 10, 11, 12, 13, 15]);
        assert_eq!(RbTree::min(&tree), Some(&5));
        assert_eq!(RbTree::max(&tree), Some(&15));
    }

    #[test]
    fn test_insert_scenario_colors() {
        let tree = tree_of(&SCENARIO);
        let mut colors = Vec::new();
        let mut position = tree.begin();
        while let Some(entry) = position.node {
            colors.push(tree.node(entry).color);
            position = tree.next(position);
        }
        assert_eq!(
            colors,
            vec![Red, Black, Red, Black, Black, Red, Red, Black, Red],
        );
        assert_eq!(tree.root.map(|root| tree.node(root).value), Some(8));
    }

    #[test]
    fn test_erase_scenario_key() {
        let mut tree = tree_of(&SCENARIO);
        let position = tree.find(&10);
        assert_eq!(tree.erase(position), Some(10));
        assert_eq!(contents(&tree), vec![5, 6, 7, 8, 11, 12, 13, 15]);
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_erase_two_child_root() {
        let mut tree = tree_of(&SCENARIO);
        let root = tree.root.unwrap();
        assert!(tree.node(root).left.is_some() && tree.node(root).right.is_some());

        let value = tree.node(root).value;
        assert_eq!(tree.erase(Cursor::at(root)), Some(value));
        assert!(!tree.contains(&value));
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.get(tree.begin()), Some(&5));
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_erase_ascending() {
        let mut tree = tree_of(&SCENARIO);
        let mut sorted = SCENARIO.to_vec();
        sorted.sort();

        for (index, key) in sorted.iter().enumerate() {
            let position = tree.find(key);
            assert_eq!(tree.erase(position), Some(*key));
            assert_eq!(tree.len(), sorted.len() - index - 1);
            assert_eq!(tree.verify(), Ok(()));
        }

        assert_eq!(tree.begin(), tree.end());
        assert_eq!(tree.prev(tree.end()), tree.end());
        assert_eq!(RbTree::min(&tree), None);
        assert_eq!(RbTree::max(&tree), None);
    }

    #[test]
    fn test_erase_end() {
        let mut tree = tree_of(&[1]);
        let end = tree.end();
        assert_eq!(tree.erase(end), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_find_round_trip() {
        let mut tree = tree_of(&SCENARIO);
        let (position, inserted) = tree.insert_unique(9).unwrap();
        assert!(inserted);
        assert_eq!(tree.find(&9), position);
        assert_eq!(tree.get(position), Some(&9));

        tree.erase(position);
        assert!(tree.find(&9).is_end());
        assert!(!tree.contains(&9));
    }

    #[test]
    fn test_insert_unique_twice() {
        let mut tree = tree_of(&SCENARIO);
        for key in 0..20 {
            let len = tree.len();
            let expected_len = if tree.contains(&key) { len } else { len + 1 };
            let (first, _) = tree.insert_unique(key).unwrap();
            let (second, inserted) = tree.insert_unique(key).unwrap();
            assert!(!inserted);
            assert_eq!(first, second);
            assert_eq!(tree.len(), expected_len);
        }
        assert_eq!(tree.len(), 20);
    }

    #[test]
    fn test_bounds() {
        let tree = tree_of(&[10, 20, 30]);
        assert_eq!(tree.get(tree.lower_bound(&20)), Some(&20));
        assert_eq!(tree.get(tree.upper_bound(&20)), Some(&30));
        assert_eq!(tree.get(tree.lower_bound(&15)), Some(&20));
        assert_eq!(tree.get(tree.upper_bound(&5)), Some(&10));
        assert!(tree.lower_bound(&31).is_end());
        assert!(tree.upper_bound(&30).is_end());

        let (first, last) = tree.equal_range(&20);
        assert_eq!(tree.range(first, last).collect::<Vec<&u32>>(), vec![&20]);
        let (first, last) = tree.equal_range(&25);
        assert_eq!(first, last);
        assert_eq!(tree.count(&25), 0);
    }

    #[test]
    fn test_insert_equal_ties_in_insertion_order() {
        let mut tree: RbTree<(u32, u32), SelectFirst, Less> = RbTree::new(SelectFirst, Less);
        for key in &[5, 1, 9] {
            tree.insert_equal((*key, 0)).unwrap();
        }
        tree.insert_equal((5, 1)).unwrap();
        tree.insert_equal((5, 2)).unwrap();
        tree.insert_equal((5, 3)).unwrap();

        let (first, last) = tree.equal_range(&5);
        assert_eq!(
            tree.range(first, last).map(|pair| pair.1).collect::<Vec<u32>>(),
            vec![0, 1, 2, 3],
        );
        assert_eq!(tree.count(&5), 4);
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_insert_unique_hint() {
        let mut tree = tree_of(&[10, 20, 30]);
        let hint = tree.find(&20);
        let position = tree.insert_unique_hint(hint, 15).unwrap();
        assert_eq!(tree.get(position), Some(&15));

        let end = tree.end();
        tree.insert_unique_hint(end, 40).unwrap();
        let begin = tree.begin();
        tree.insert_unique_hint(begin, 5).unwrap();

        // Inconsistent hints fall back to a full descent.
        let begin = tree.begin();
        tree.insert_unique_hint(begin, 25).unwrap();
        let existing = tree.insert_unique_hint(end, 30).unwrap();
        assert_eq!(existing, tree.find(&30));

        assert_eq!(contents(&tree), vec![5, 10, 15, 20, 25, 30, 40]);
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_insert_equal_hint_matches_unhinted_order() {
        let mut hinted: RbTree<(u32, u32), SelectFirst, Less> = RbTree::new(SelectFirst, Less);
        let mut plain: RbTree<(u32, u32), SelectFirst, Less> = RbTree::new(SelectFirst, Less);
        for payload in 0..6 {
            let key = payload % 3;
            plain.insert_equal((key, payload)).unwrap();

            // Hint every position in turn; ties must still land after their equals.
            let mut hint = hinted.begin();
            for _ in 0..payload % 4 {
                hint = hinted.next(hint);
            }
            hinted.insert_equal_hint(hint, (key, payload)).unwrap();
            assert_eq!(hinted.verify(), Ok(()));
        }
        assert_eq!(
            hinted.iter().collect::<Vec<&(u32, u32)>>(),
            plain.iter().collect::<Vec<&(u32, u32)>>(),
        );
    }

    #[test]
    fn test_erase_key_and_range() {
        let mut tree: RbTree<u32, Identity, Less> = RbTree::new(Identity, Less);
        tree.insert_equal_iter(vec![1, 2, 2, 2, 3, 4]).unwrap();
        assert_eq!(tree.erase_key(&2), 3);
        assert_eq!(contents(&tree), vec![1, 3, 4]);
        assert_eq!(tree.verify(), Ok(()));

        let first = tree.begin();
        let last = tree.find(&4);
        assert_eq!(tree.erase_range(first, last), 2);
        assert_eq!(contents(&tree), vec![4]);

        let first = tree.begin();
        let last = tree.end();
        assert_eq!(tree.erase_range(first, last), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_cursor_stability() {
        let mut tree = tree_of(&[50]);
        let position = tree.find(&50);
        for key in 0..200 {
            tree.insert_unique(key * 3).unwrap();
        }
        assert_eq!(tree.get(position), Some(&50));

        let neighbour = tree.find(&51);
        tree.erase(neighbour);
        assert_eq!(tree.get(position), Some(&50));
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_next_prev_wraparound() {
        let tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.get(tree.prev(tree.end())), Some(&3));
        assert_eq!(tree.next(tree.end()), tree.begin());
        assert_eq!(tree.prev(tree.begin()), tree.end());
        assert!(tree.next(tree.prev(tree.end())).is_end());
    }

    #[test]
    fn test_iter_double_ended() {
        let tree = tree_of(&SCENARIO);
        let mut iter = tree.iter();
        assert_eq!(iter.next(), Some(&5));
        assert_eq!(iter.next_back(), Some(&15));
        assert_eq!(iter.rev().cloned().collect::<Vec<u32>>(), vec![13, 12, 11, 10, 8, 7, 6]);
    }

    #[test]
    fn test_into_iter() {
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(tree.into_iter().collect::<Vec<u32>>(), vec![1, 2, 3]);

        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(tree.into_iter().rev().collect::<Vec<u32>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_custom_compare() {
        let mut tree: RbTree<u32, Identity, Greater> = RbTree::new(Identity, Greater);
        tree.insert_unique_iter(vec![1, 3, 2]).unwrap();
        assert_eq!(contents(&tree), vec![3, 2, 1]);

        let mut tree = RbTree::new(Identity, |a: &u32, b: &u32| a % 10 < b % 10);
        tree.insert_unique_iter(vec![11, 25, 3, 21]).unwrap();
        assert_eq!(contents(&tree), vec![11, 3, 25]);
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_allocation_failure_leaves_tree_unchanged() {
        let config = Config::default().with_node_limit(3);
        let mut tree = RbTree::with_config(Identity, Less, config);
        tree.insert_unique_iter(vec![2, 1, 3]).unwrap();

        assert_eq!(tree.insert_unique(4), Err(Error::AllocationFailed { limit: 3 }));
        assert_eq!(tree.insert_equal(0), Err(Error::AllocationFailed { limit: 3 }));
        let hint = tree.end();
        assert!(tree.insert_unique_hint(hint, 5).is_err());

        // An existing key never needs a block.
        assert_eq!(tree.insert_unique(2).unwrap().1, false);

        assert_eq!(contents(&tree), vec![1, 2, 3]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.verify(), Ok(()));

        let position = tree.find(&1);
        tree.erase(position);
        assert!(tree.insert_unique(4).is_ok());
    }

    #[test]
    fn test_clone_is_disjoint() {
        let tree = tree_of(&SCENARIO);
        let mut copy = tree.clone();
        assert_eq!(copy, tree);
        assert_eq!(copy.verify(), Ok(()));

        let position = copy.find(&10);
        copy.erase(position);
        assert_ne!(copy, tree);
        assert_eq!(contents(&tree), vec![5, 6, 7, 8, 10, 11, 12, 13, 15]);
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_clone_preserves_colors() {
        let tree = tree_of(&SCENARIO);
        let copy = tree.try_clone().unwrap();
        let colors = |tree: &RbTree<u32, Identity, Less>| {
            let mut colors = Vec::new();
            let mut position = tree.begin();
            while let Some(entry) = position.node {
                colors.push(tree.node(entry).color);
                position = tree.next(position);
            }
            colors
        };
        assert_eq!(colors(&copy), colors(&tree));
    }

    #[test]
    fn test_copy_from_failure_keeps_destination() {
        let source = tree_of(&SCENARIO);
        let mut destination = RbTree::with_config(Identity, Less, Config::default().with_node_limit(4));
        destination.insert_unique_iter(vec![100, 200]).unwrap();

        assert_eq!(
            destination.copy_from(&source),
            Err(Error::AllocationFailed { limit: 4 }),
        );
        assert_eq!(contents(&destination), vec![100, 200]);
        assert_eq!(destination.verify(), Ok(()));

        let small = tree_of(&[1, 2, 3]);
        destination.copy_from(&small).unwrap();
        assert_eq!(destination, small);
        assert_eq!(destination.config().node_limit, Some(4));
    }

    #[test]
    fn test_swap() {
        let mut left = tree_of(&[1, 2]);
        let mut right = tree_of(&[3]);
        left.swap(&mut right);
        assert_eq!(contents(&left), vec![3]);
        assert_eq!(contents(&right), vec![1, 2]);
    }

    #[test]
    fn test_ordering() {
        assert!(tree_of(&[1, 2]) < tree_of(&[1, 3]));
        assert!(tree_of(&[1, 2]) < tree_of(&[1, 2, 3]));
        assert!(tree_of(&[2]) > tree_of(&[1, 5]));
        assert_eq!(tree_of(&[2, 1]), tree_of(&[1, 2]));
    }

    #[test]
    fn test_clear() {
        let mut tree = tree_of(&SCENARIO);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
        assert_eq!(tree.verify(), Ok(()));
        tree.insert_unique(1).unwrap();
        assert_eq!(contents(&tree), vec![1]);
    }

    #[test]
    fn test_debug() {
        let tree = tree_of(&[2, 1]);
        assert_eq!(format!("{:?}", tree), "{1, 2}");
    }
}
