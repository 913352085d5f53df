use crate::arena::Entry;
use crate::rb_tree::node::{self, NodeArena};
use std::iter::FusedIterator;
use std::vec;

/// A position in an `RbTree`: either an element or the one-past-the-end position.
///
/// Cursors are plain handles and do not borrow the tree. A cursor stays valid across every
/// insertion and across every erasure except the erasure of its own element; after that it
/// must not be used again.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Cursor {
    pub(super) node: Option<Entry>,
}

impl Cursor {
    pub(super) fn at(entry: Entry) -> Self {
        Cursor { node: Some(entry) }
    }

    pub(super) fn end() -> Self {
        Cursor { node: None }
    }

    /// Returns `true` if the cursor is the one-past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

/// An iterator over a contiguous run of elements of an `RbTree`.
///
/// This iterator traverses the elements in-order and yields immutable references. It walks
/// node relations directly, so no auxiliary stack is kept.
pub struct Iter<'a, T> {
    arena: &'a NodeArena<T>,
    front: Option<Entry>,
    back: Option<Entry>,
}

impl<'a, T> Iter<'a, T> {
    /// `front` and `back` are inclusive; either being `None` yields nothing.
    pub(super) fn new(arena: &'a NodeArena<T>, front: Option<Entry>, back: Option<Entry>) -> Self {
        match (front, back) {
            (Some(_), Some(_)) => Iter { arena, front, back },
            _ => Iter {
                arena,
                front: None,
                back: None,
            },
        }
    }

    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'a, T> Iterator for Iter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.front?;
        if self.front == self.back {
            self.finish();
        } else {
            self.front = node::successor(self.arena, entry);
        }
        Some(&self.arena[entry].value)
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let entry = self.back?;
        if self.front == self.back {
            self.finish();
        } else {
            self.back = node::predecessor(self.arena, entry);
        }
        Some(&self.arena[entry].value)
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> where T: 'a {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            arena: self.arena,
            front: self.front,
            back: self.back,
        }
    }
}

/// An owning iterator for `RbTree`.
///
/// This iterator yields owned values in-order. Values not yet yielded are dropped together
/// with the iterator.
pub struct IntoIter<T> {
    arena: NodeArena<T>,
    order: vec::IntoIter<Entry>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(arena: NodeArena<T>, leftmost: Option<Entry>) -> Self {
        let mut order = Vec::with_capacity(arena.len());
        let mut curr = leftmost;
        while let Some(entry) = curr {
            order.push(entry);
            curr = node::successor(&arena, entry);
        }
        IntoIter {
            arena,
            order: order.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.order.next()?;
        Some(self.arena.free(&entry).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let entry = self.order.next_back()?;
        Some(self.arena.free(&entry).value)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
