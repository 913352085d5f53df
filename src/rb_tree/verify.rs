use crate::arena::Entry;
use crate::ordering::{Compare, KeyOfValue};
use crate::rb_tree::node::{self, Side};
use crate::rb_tree::tree::RbTree;
use std::error;
use std::fmt;

/// A broken structural invariant found by `RbTree::verify`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Violation {
    /// The root is red.
    RedRoot,
    /// The root has a parent.
    RootHasParent,
    /// A red node has a red child.
    RedChildOfRed,
    /// Two paths from the root to an absent child cross a different number of black nodes.
    BlackHeightMismatch,
    /// An element's key is less than its in-order predecessor's.
    OutOfOrder,
    /// A child's parent relation does not point back at the node holding it.
    BrokenParentLink,
    /// The cached minimum is not the leftmost node.
    StaleLeftmost,
    /// The cached maximum is not the rightmost node.
    StaleRightmost,
    /// The in-order walk, the element count and the live arena blocks disagree.
    LengthMismatch { expected: usize, actual: usize },
    /// The tree is empty but still caches a root, minimum or maximum.
    NonEmptyBounds,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RedRoot => write!(f, "root node is red"),
            Violation::RootHasParent => write!(f, "root node has a parent"),
            Violation::RedChildOfRed => write!(f, "red node has a red child"),
            Violation::BlackHeightMismatch => write!(f, "black heights differ between paths"),
            Violation::OutOfOrder => write!(f, "elements are out of order"),
            Violation::BrokenParentLink => write!(f, "child does not point back at its parent"),
            Violation::StaleLeftmost => write!(f, "cached minimum is stale"),
            Violation::StaleRightmost => write!(f, "cached maximum is stale"),
            Violation::LengthMismatch { expected, actual } => {
                write!(f, "expected {} elements, found {}", expected, actual)
            },
            Violation::NonEmptyBounds => write!(f, "empty tree caches a root or bounds"),
        }
    }
}

impl error::Error for Violation {}

impl<T, X, C> RbTree<T, X, C>
where
    X: KeyOfValue<T>,
    C: Compare<X::Key>,
{
    /// Checks every structural invariant of the tree: the red-black coloring rules, the
    /// ordering of keys, the parent relations, the cached bounds and the element count.
    /// Returns the first violation found.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::ordering::{Identity, Less};
    /// use ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::new(Identity, Less);
    /// tree.insert_equal_iter(vec![3, 1, 2, 1]).unwrap();
    /// assert_eq!(tree.verify(), Ok(()));
    /// ```
    pub fn verify(&self) -> Result<(), Violation> {
        let root = match self.root {
            Some(root) => root,
            None => {
                if self.leftmost.is_some() || self.rightmost.is_some() {
                    return Err(Violation::NonEmptyBounds);
                }
                return self.check_len(0);
            },
        };

        if self.node(root).is_red() {
            return Err(Violation::RedRoot);
        }
        if self.node(root).parent.is_some() {
            return Err(Violation::RootHasParent);
        }
        if self.leftmost != Some(node::minimum(&self.arena, root)) {
            return Err(Violation::StaleLeftmost);
        }
        if self.rightmost != Some(node::maximum(&self.arena, root)) {
            return Err(Violation::StaleRightmost);
        }

        let count = self.check_nodes(root)?;
        self.check_len(count)
    }

    fn check_len(&self, count: usize) -> Result<(), Violation> {
        if count != self.len {
            return Err(Violation::LengthMismatch {
                expected: self.len,
                actual: count,
            });
        }
        if self.arena.len() != self.len {
            return Err(Violation::LengthMismatch {
                expected: self.len,
                actual: self.arena.len(),
            });
        }
        Ok(())
    }

    // Walks the tree in-order with an explicit stack and returns the number of nodes visited.
    // The walk gives up once it has seen more nodes than the arena holds, so a cycle in the
    // child relations is reported instead of looping forever.
    fn check_nodes(&self, root: Entry) -> Result<usize, Violation> {
        let mut black_height = None;
        let mut previous: Option<Entry> = None;
        let mut count = 0;
        let mut stack = Vec::new();
        let mut curr = Some((root, 0));

        loop {
            while let Some((entry, blacks_above)) = curr {
                let node = self.node(entry);
                let blacks = blacks_above + if node.is_red() { 0 } else { 1 };

                for child in node.left.iter().chain(node.right.iter()) {
                    if self.node(*child).parent != Some(entry) {
                        return Err(Violation::BrokenParentLink);
                    }
                    if node.is_red() && self.node(*child).is_red() {
                        return Err(Violation::RedChildOfRed);
                    }
                }
                if node.child(Side::Left).is_none() || node.child(Side::Right).is_none() {
                    match black_height {
                        None => black_height = Some(blacks),
                        Some(height) if height != blacks => {
                            return Err(Violation::BlackHeightMismatch);
                        },
                        Some(_) => {},
                    }
                }

                stack.push((entry, blacks));
                curr = node.left.map(|left| (left, blacks));
            }

            let (entry, blacks) = match stack.pop() {
                Some(top) => top,
                None => break,
            };

            count += 1;
            if count > self.arena.len() {
                return Err(Violation::LengthMismatch {
                    expected: self.arena.len(),
                    actual: count,
                });
            }
            if let Some(previous) = previous {
                let key = self.key_of().key(&self.node(entry).value);
                let previous_key = self.key_of().key(&self.node(previous).value);
                if self.key_comp().less(key, previous_key) {
                    return Err(Violation::OutOfOrder);
                }
            }
            previous = Some(entry);
            curr = self.node(entry).right.map(|right| (right, blacks));
        }

        Ok(count)
    }
}
