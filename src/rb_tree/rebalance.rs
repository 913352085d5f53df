//! Rotations and the two red-black repair procedures.
//!
//! Both repairs are written as a loop over a classified case. Every case is expressed with
//! `rotate` and recoloring only, and each case is mirrored through `Side` so the left and right
//! variants share one body.

use crate::arena::Entry;
use crate::rb_tree::node::{self, Color, Side};
use crate::rb_tree::tree::RbTree;

/// The situation of a freshly linked red node `x`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum InsertCase {
    /// `x` is the root or its parent is black.
    Balanced,
    /// The parent and the uncle are both red.
    RedUncle {
        parent: Entry,
        uncle: Entry,
        grandparent: Entry,
    },
    /// The uncle is black and `x` is the inner grandchild. `side` is the parent's side under
    /// the grandparent.
    InnerGrandchild { parent: Entry, side: Side },
    /// The uncle is black and `x` is the outer grandchild.
    OuterGrandchild {
        parent: Entry,
        grandparent: Entry,
        side: Side,
    },
}

/// The situation of a doubly black position on `side` of its parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum EraseCase {
    RedSibling { sibling: Entry },
    BlackSiblingBlackChildren { sibling: Entry },
    /// The sibling's child nearer to the doubly black position is red and the far one black.
    BlackSiblingNearRed { sibling: Entry, near: Entry },
    BlackSiblingFarRed { sibling: Entry, far: Entry },
}

impl<T, X, C> RbTree<T, X, C> {
    fn is_red(&self, link: Option<Entry>) -> bool {
        node::is_red(&self.arena, link)
    }

    fn set_color(&mut self, entry: Entry, color: Color) {
        self.node_mut(entry).color = color;
    }

    fn side_of(&self, child: Option<Entry>, parent: Entry) -> Side {
        if self.node(parent).left == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whichever relation held `old` (a child slot of `parent`, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Entry>, old: Entry, new: Option<Entry>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(Some(old), parent);
                *self.node_mut(parent).child_mut(side) = new;
            },
        }
    }

    /// Rotates the subtree rooted at `x` toward `side`: the child of `x` on the opposite side
    /// takes the place of `x`, and `x` becomes its `side` child.
    pub(super) fn rotate(&mut self, x: Entry, side: Side) {
        let y = self
            .node(x)
            .child(side.opposite())
            .expect("Expected a child node to rotate into place.");
        let inner = self.node(y).child(side);

        *self.node_mut(x).child_mut(side.opposite()) = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        let parent = self.node(x).parent;
        self.node_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));

        *self.node_mut(y).child_mut(side) = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    pub(super) fn classify_insert(&self, x: Entry) -> InsertCase {
        let parent = match self.node(x).parent {
            Some(parent) if self.is_red(Some(parent)) => parent,
            _ => return InsertCase::Balanced,
        };
        // A red parent is never the root, so it always has a parent of its own.
        let grandparent = match self.node(parent).parent {
            Some(grandparent) => grandparent,
            None => return InsertCase::Balanced,
        };
        let side = self.side_of(Some(parent), grandparent);

        match self.node(grandparent).child(side.opposite()) {
            Some(uncle) if self.is_red(Some(uncle)) => InsertCase::RedUncle {
                parent,
                uncle,
                grandparent,
            },
            _ if self.side_of(Some(x), parent) != side => {
                InsertCase::InnerGrandchild { parent, side }
            },
            _ => InsertCase::OuterGrandchild {
                parent,
                grandparent,
                side,
            },
        }
    }

    /// Restores the red-black invariants after `x` was linked as a leaf.
    pub(super) fn rebalance_after_insert(&mut self, mut x: Entry) {
        self.set_color(x, Color::Red);
        loop {
            match self.classify_insert(x) {
                InsertCase::Balanced => break,
                InsertCase::RedUncle {
                    parent,
                    uncle,
                    grandparent,
                } => {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    x = grandparent;
                },
                InsertCase::InnerGrandchild { parent, side } => {
                    // Turns the old parent into an outer grandchild; handled next iteration.
                    self.rotate(parent, side);
                    x = parent;
                },
                InsertCase::OuterGrandchild {
                    parent,
                    grandparent,
                    side,
                } => {
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate(grandparent, side.opposite());
                    break;
                },
            }
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    pub(super) fn classify_erase(&self, parent: Entry, side: Side) -> EraseCase {
        // The doubly black side has a positive black height deficit, so the sibling exists.
        let sibling = self
            .node(parent)
            .child(side.opposite())
            .expect("Expected a sibling of a doubly black position.");
        if self.is_red(Some(sibling)) {
            return EraseCase::RedSibling { sibling };
        }

        let near = self.node(sibling).child(side).filter(|&near| self.is_red(Some(near)));
        let far = self
            .node(sibling)
            .child(side.opposite())
            .filter(|&far| self.is_red(Some(far)));
        match (near, far) {
            (_, Some(far)) => EraseCase::BlackSiblingFarRed { sibling, far },
            (Some(near), None) => EraseCase::BlackSiblingNearRed { sibling, near },
            (None, None) => EraseCase::BlackSiblingBlackChildren { sibling },
        }
    }

    /// Removes `z` from the tree structure, leaving its node allocated but unreachable, and
    /// restores every invariant. A node with two children trades places with its in-order
    /// successor first, so the node that physically leaves the tree has at most one child and
    /// no other node changes identity.
    pub(super) fn unlink(&mut self, z: Entry) {
        let z_left = self.node(z).left;
        let z_right = self.node(z).right;
        let z_parent = self.node(z).parent;

        let (x, x_parent, removed_color) = match (z_left, z_right) {
            (Some(left), Some(right)) => {
                let y = node::minimum(&self.arena, right);
                let x = self.node(y).right;

                self.node_mut(left).parent = Some(y);
                self.node_mut(y).left = Some(left);

                let x_parent = if y != right {
                    let y_parent = self.node(y).parent;
                    if let Some(x) = x {
                        self.node_mut(x).parent = y_parent;
                    }
                    if let Some(y_parent) = y_parent {
                        self.node_mut(y_parent).left = x;
                    }
                    self.node_mut(y).right = Some(right);
                    self.node_mut(right).parent = Some(y);
                    y_parent
                } else {
                    Some(y)
                };

                self.replace_child(z_parent, z, Some(y));
                self.node_mut(y).parent = z_parent;

                // `y` inherits the color of the position it now occupies; the color that left
                // the tree is the one `y` had.
                let y_color = self.node(y).color;
                let z_color = self.node(z).color;
                self.set_color(y, z_color);
                (x, x_parent, y_color)
            },
            _ => {
                let x = z_left.or(z_right);
                if let Some(x) = x {
                    self.node_mut(x).parent = z_parent;
                }
                self.replace_child(z_parent, z, x);

                if self.leftmost == Some(z) {
                    self.leftmost = match z_right {
                        None => z_parent,
                        Some(right) => Some(node::minimum(&self.arena, right)),
                    };
                }
                if self.rightmost == Some(z) {
                    self.rightmost = match z_left {
                        None => z_parent,
                        Some(left) => Some(node::maximum(&self.arena, left)),
                    };
                }
                (x, z_parent, self.node(z).color)
            },
        };

        let z_node = self.node_mut(z);
        z_node.parent = None;
        z_node.left = None;
        z_node.right = None;

        if removed_color == Color::Black {
            self.rebalance_after_erase(x, x_parent);
        }
    }

    /// Pushes the missing black of a removed node up from `x` (possibly absent) until a
    /// rotation absorbs it or it reaches the root.
    fn rebalance_after_erase(&mut self, mut x: Option<Entry>, mut x_parent: Option<Entry>) {
        while x != self.root && !self.is_red(x) {
            let parent = match x_parent {
                Some(parent) => parent,
                None => break,
            };
            let side = self.side_of(x, parent);

            match self.classify_erase(parent, side) {
                EraseCase::RedSibling { sibling } => {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate(parent, side);
                },
                EraseCase::BlackSiblingBlackChildren { sibling } => {
                    self.set_color(sibling, Color::Red);
                    x = Some(parent);
                    x_parent = self.node(parent).parent;
                },
                EraseCase::BlackSiblingNearRed { sibling, near } => {
                    self.set_color(near, Color::Black);
                    self.set_color(sibling, Color::Red);
                    self.rotate(sibling, side.opposite());
                },
                EraseCase::BlackSiblingFarRed { sibling, far } => {
                    let parent_color = self.node(parent).color;
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    self.set_color(far, Color::Black);
                    self.rotate(parent, side);
                    break;
                },
            }
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }
}
