use std::iter::FusedIterator;
use std::ptr;

use crate::node::Node;

/// In-order iterator over a splay tree.
///
/// Walks the parent links instead of keeping a stack, so it needs O(1)
/// extra memory and O(n) time for a full traversal.  Iteration never
/// splays.
pub struct Iter<'a, T> {
    current: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    /// Start at `first` (the leftmost node) with `len` values to yield.
    pub(crate) fn new(first: Option<&'a Node<T>>, len: usize) -> Self {
        Iter { current: first, remaining: len }
    }

    /// In-order successor of `node`.
    fn successor(node: &'a Node<T>) -> Option<&'a Node<T>> {
        if let Some(mut next) = node.right() {
            while let Some(left) = next.left() {
                next = left;
            }
            return Some(next);
        }
        // Climb until we arrive from a left subtree.
        let mut prev = node;
        let mut up = node.parent();
        while let Some(parent) = up {
            match parent.right() {
                Some(right) if ptr::eq(right, prev) => {
                    prev = parent;
                    up = parent.parent();
                }
                _ => break,
            }
        }
        up
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.current?;
        self.current = Self::successor(node);
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.data())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { current: self.current, remaining: self.remaining }
    }
}
