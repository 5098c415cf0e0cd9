use std::fmt;
use std::ptr;

/// A node in a splay tree.
///
/// `left` and `right` own their subtrees; `parent` is a non-owning
/// back-link used only to walk up during splaying and in-order iteration.
/// Nodes are created and freed exclusively by the tree.
pub struct Node<T> {
    pub(crate) value: T,
    pub(crate) parent: *mut Node<T>,
    pub(crate) left: *mut Node<T>,
    pub(crate) right: *mut Node<T>,
}

impl<T> Node<T> {
    /// Heap-allocate a detached node and leak it as a raw pointer.
    pub(crate) fn alloc(value: T, parent: *mut Node<T>) -> *mut Node<T> {
        Box::into_raw(Box::new(Node {
            value,
            parent,
            left: ptr::null_mut(),
            right: ptr::null_mut(),
        }))
    }

    #[inline]
    pub fn data(&self) -> &T {
        &self.value
    }

    /// Left child, if any.
    #[inline]
    pub fn left(&self) -> Option<&Node<T>> {
        // SAFETY: child links are null or point at a live node owned by
        // the same tree, which outlives this borrow.
        unsafe { self.left.as_ref() }
    }

    /// Right child, if any.
    #[inline]
    pub fn right(&self) -> Option<&Node<T>> {
        unsafe { self.right.as_ref() }
    }

    /// Parent, or `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<&Node<T>> {
        unsafe { self.parent.as_ref() }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_null() && self.right.is_null()
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("data", &self.value)
            .field("left", &self.left().map(Node::data))
            .field("right", &self.right().map(Node::data))
            .finish()
    }
}
