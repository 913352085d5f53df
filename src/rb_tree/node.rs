use crate::arena::{Entry, TypedArena};

pub type NodeArena<T> = TypedArena<Node<T>>;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// Which child slot of a node a relation goes through.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing an internal node of a red black tree.
///
/// `parent` is a back-reference used for traversal and rebalancing only; the arena owns
/// every node.
pub struct Node<T> {
    pub value: T,
    pub color: Color,
    pub parent: Option<Entry>,
    pub left: Option<Entry>,
    pub right: Option<Entry>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<Entry> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Option<Entry> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Returns `true` if `link` names a red node. Absent children count as black.
pub fn is_red<T>(arena: &NodeArena<T>, link: Option<Entry>) -> bool {
    match link {
        None => false,
        Some(entry) => arena[entry].is_red(),
    }
}

pub fn minimum<T>(arena: &NodeArena<T>, mut entry: Entry) -> Entry {
    while let Some(left) = arena[entry].left {
        entry = left;
    }
    entry
}

pub fn maximum<T>(arena: &NodeArena<T>, mut entry: Entry) -> Entry {
    while let Some(right) = arena[entry].right {
        entry = right;
    }
    entry
}

/// In-order successor of `entry`, or `None` if `entry` is the maximum.
pub fn successor<T>(arena: &NodeArena<T>, entry: Entry) -> Option<Entry> {
    if let Some(right) = arena[entry].right {
        return Some(minimum(arena, right));
    }
    let mut curr = entry;
    let mut parent = arena[entry].parent;
    while let Some(next) = parent {
        if arena[next].right != Some(curr) {
            return Some(next);
        }
        curr = next;
        parent = arena[next].parent;
    }
    None
}

/// In-order predecessor of `entry`, or `None` if `entry` is the minimum.
pub fn predecessor<T>(arena: &NodeArena<T>, entry: Entry) -> Option<Entry> {
    if let Some(left) = arena[entry].left {
        return Some(maximum(arena, left));
    }
    let mut curr = entry;
    let mut parent = arena[entry].parent;
    while let Some(next) = parent {
        if arena[next].left != Some(curr) {
            return Some(next);
        }
        curr = next;
        parent = arena[next].parent;
    }
    None
}
