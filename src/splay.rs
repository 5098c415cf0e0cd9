//! Bottom-up splay tree with full-splay and semi-splay policies.
//!
//! A self-adjusting binary search tree: every access (insert, successful
//! find, min, max) rotates the accessed value toward the root.  Full
//! splaying moves it all the way up; semi-splaying (Sleator & Tarjan,
//! Section 5) only rotates the parent in the zig-zig case and roughly halves
//! the depth of the access path.  Both are amortized O(log n).
//!
//! Rotations move *values*, not node identities: the node at the top of a
//! rotation stays where it is in memory and receives the promoted value,
//! and only the child links inside the rotated triad are exchanged.  The
//! root pointer therefore never changes during a splay.
//!
//! Reference: Sleator & Tarjan, "Self-Adjusting Binary Search Trees",
//! JACM 32(3), 1985.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr;
use std::vec;

use tracing::{debug, trace};

use crate::iter::Iter;
use crate::node::Node;
use crate::ring::RingBuffer;
use crate::types::{optimal_height, Policy, TreeSummary};

mod private {
    pub trait Sealed {}
}

/// Compile-time selection of the splay heuristic.
pub trait SplayPolicy: private::Sealed {
    const KIND: Policy;
}

/// Splay the accessed node all the way to the root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FullSplay;

/// Semi-splay: halve the access path instead of collapsing it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SemiSplay;

impl private::Sealed for FullSplay {}
impl private::Sealed for SemiSplay {}

impl SplayPolicy for FullSplay {
    const KIND: Policy = Policy::Full;
}

impl SplayPolicy for SemiSplay {
    const KIND: Policy = Policy::Semi;
}

/// A splay tree of ordered values.  Duplicates are allowed and kept to the
/// right of equal values.
pub struct SplayTree<T, P = FullSplay> {
    root: *mut Node<T>,
    len: usize,
    _owns: PhantomData<Box<Node<T>>>,
    _policy: PhantomData<fn() -> P>,
}

pub type SemiSplayTree<T> = SplayTree<T, SemiSplay>;

// SAFETY: the tree exclusively owns every node reachable from `root`; the
// raw links are never shared outside a borrow of the tree.
unsafe impl<T: Send, P> Send for SplayTree<T, P> {}
unsafe impl<T: Sync, P> Sync for SplayTree<T, P> {}

// ── rotations ────────────────────────────────────────────────────────────
//
// Each takes the node whose value is being promoted and returns the node
// that holds that value afterwards.  Only nodes whose owner changed get
// their parent link rewritten.

/// Rotate right; `node` is the left child of its parent.
///
/// ```text
///      y          x
///     / \        / \
///    x   C  ->  A   y
///   / \            / \
///  A   B          B   C
/// ```
unsafe fn zig<T>(node: *mut Node<T>) -> *mut Node<T> {
    let p = (*node).parent;

    mem::swap(&mut (*p).left, &mut (*p).right);
    mem::swap(&mut (*node).left, &mut (*node).right);
    mem::swap(&mut (*node).right, &mut (*p).left);
    mem::swap(&mut (*node).value, &mut (*p).value);

    if !(*node).right.is_null() {
        (*(*node).right).parent = node;
    }
    if !(*p).left.is_null() {
        (*(*p).left).parent = p;
    }
    p
}

/// Rotate left; `node` is the right child of its parent.
///
/// ```text
///    y              x
///   / \            / \
///  A   x    ->    y   C
///     / \        / \
///    B   C      A   B
/// ```
unsafe fn zag<T>(node: *mut Node<T>) -> *mut Node<T> {
    let p = (*node).parent;

    mem::swap(&mut (*p).left, &mut (*p).right);
    mem::swap(&mut (*node).left, &mut (*node).right);
    mem::swap(&mut (*node).left, &mut (*p).right);
    mem::swap(&mut (*node).value, &mut (*p).value);

    if !(*node).left.is_null() {
        (*(*node).left).parent = node;
    }
    if !(*p).right.is_null() {
        (*(*p).right).parent = p;
    }
    p
}

/// Two right rotations; `node` is the left child of a left child.
///
/// ```text
///        z          x
///       / \        / \
///      y   D      A   y
///     / \            / \
///    x   C    ->    B   z
///   / \                / \
///  A   B              C   D
/// ```
unsafe fn zigzig<T>(node: *mut Node<T>) -> *mut Node<T> {
    let p = (*node).parent;
    let gp = (*p).parent;

    mem::swap(&mut (*gp).left, &mut (*gp).right);
    mem::swap(&mut (*p).left, &mut (*p).right);
    mem::swap(&mut (*gp).left, &mut (*node).left);
    mem::swap(&mut (*p).left, &mut (*node).right);
    mem::swap(&mut (*node).left, &mut (*node).right);
    mem::swap(&mut (*node).value, &mut (*gp).value);

    if !(*node).left.is_null() {
        (*(*node).left).parent = node;
    }
    if !(*node).right.is_null() {
        (*(*node).right).parent = node;
    }
    if !(*p).left.is_null() {
        (*(*p).left).parent = p;
    }
    if !(*gp).left.is_null() {
        (*(*gp).left).parent = gp;
    }
    gp
}

/// Two left rotations; `node` is the right child of a right child.
///
/// ```text
///    z                  x
///   / \                / \
///  A   y              y   D
///     / \            / \
///    B   x    ->    z   C
///       / \        / \
///      C   D      A   B
/// ```
unsafe fn zagzag<T>(node: *mut Node<T>) -> *mut Node<T> {
    let p = (*node).parent;
    let gp = (*p).parent;

    mem::swap(&mut (*gp).left, &mut (*gp).right);
    mem::swap(&mut (*p).left, &mut (*p).right);
    mem::swap(&mut (*gp).right, &mut (*node).right);
    mem::swap(&mut (*p).right, &mut (*node).left);
    mem::swap(&mut (*node).left, &mut (*node).right);
    mem::swap(&mut (*node).value, &mut (*gp).value);

    if !(*node).left.is_null() {
        (*(*node).left).parent = node;
    }
    if !(*node).right.is_null() {
        (*(*node).right).parent = node;
    }
    if !(*p).right.is_null() {
        (*(*p).right).parent = p;
    }
    if !(*gp).right.is_null() {
        (*(*gp).right).parent = gp;
    }
    gp
}

/// Right then left rotation; `node` is the left child of a right child.
///
/// ```text
///    z                 x
///   / \              /   \
///  A   y            z     y
///     / \    ->    / \   / \
///    x   D        A   B C   D
///   / \
///  B   C
/// ```
unsafe fn zigzag<T>(node: *mut Node<T>) -> *mut Node<T> {
    let p = (*node).parent;
    let gp = (*p).parent;

    mem::swap(&mut (*node).left, &mut (*node).right);
    mem::swap(&mut (*node).left, &mut (*gp).left);
    mem::swap(&mut (*p).left, &mut (*gp).left);
    mem::swap(&mut (*node).value, &mut (*gp).value);

    if !(*node).left.is_null() {
        (*(*node).left).parent = node;
    }
    if !(*p).left.is_null() {
        (*(*p).left).parent = p;
    }
    (*node).parent = gp;
    gp
}

/// Left then right rotation; `node` is the right child of a left child.
///
/// ```text
///      z               x
///     / \            /   \
///    y   D          y     z
///   / \      ->    / \   / \
///  A   x          A   B C   D
///     / \
///    B   C
/// ```
unsafe fn zagzig<T>(node: *mut Node<T>) -> *mut Node<T> {
    let p = (*node).parent;
    let gp = (*p).parent;

    mem::swap(&mut (*node).left, &mut (*node).right);
    mem::swap(&mut (*node).right, &mut (*gp).right);
    mem::swap(&mut (*p).right, &mut (*gp).right);
    mem::swap(&mut (*node).value, &mut (*gp).value);

    if !(*node).right.is_null() {
        (*(*node).right).parent = node;
    }
    if !(*p).right.is_null() {
        (*(*p).right).parent = p;
    }
    (*node).parent = gp;
    gp
}

#[inline]
unsafe fn is_left_child<T>(node: *mut Node<T>) -> bool {
    (*(*node).parent).left == node
}

/// Full splay: double rotations while there is a grandparent, then a final
/// single rotation if the parent is the root.
unsafe fn splay_full<T>(node: *mut Node<T>) -> *mut Node<T> {
    let mut current = node;
    while !(*current).parent.is_null() {
        let p = (*current).parent;
        current = if (*p).parent.is_null() {
            if is_left_child(current) {
                zig(current)
            } else {
                zag(current)
            }
        } else {
            match (is_left_child(p), is_left_child(current)) {
                (true, true) => zigzig(current),
                (true, false) => zagzig(current),
                (false, true) => zigzag(current),
                (false, false) => zagzag(current),
            }
        };
    }
    current
}

/// Semi splay over an access path of `depth` edges.
///
/// An odd path is first evened out with a single rotation, so every later
/// step has a grandparent.  Zig-zag shapes rotate the node twice; zig-zig
/// shapes rotate only the parent and continue from the parent's new spot,
/// leaving the accessed value one level below it.
unsafe fn splay_semi<T>(node: *mut Node<T>, depth: usize) -> *mut Node<T> {
    let mut current = node;
    let mut accessed = node;

    if depth % 2 == 1 {
        current = if is_left_child(current) {
            zig(current)
        } else {
            zag(current)
        };
        accessed = current;
    }

    while !(*current).parent.is_null() {
        let p = (*current).parent;
        debug_assert!(!(*p).parent.is_null(), "semi splay on odd-length path");
        current = match (is_left_child(p), is_left_child(current)) {
            (true, true) => {
                // The accessed value stays where `p` moves it: the left
                // child of the parent's new position.
                let top = zig(p);
                if accessed == current {
                    accessed = (*top).left;
                }
                top
            }
            (false, false) => {
                let top = zag(p);
                if accessed == current {
                    accessed = (*top).right;
                }
                top
            }
            (true, false) => {
                let top = zagzig(current);
                if accessed == current {
                    accessed = top;
                }
                top
            }
            (false, true) => {
                let top = zigzag(current);
                if accessed == current {
                    accessed = top;
                }
                top
            }
        };
    }
    accessed
}

// ── tree ─────────────────────────────────────────────────────────────────

impl<T, P> SplayTree<T, P> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// The root node, for read-only inspection of the tree's shape.
    pub fn root(&self) -> Option<&Node<T>> {
        // SAFETY: root is null or a live node owned by this tree.
        unsafe { self.root.as_ref() }
    }

    /// Smallest value, without restructuring.
    pub fn min_no_splay(&self) -> Option<&T> {
        let mut current = self.root()?;
        while let Some(left) = current.left() {
            current = left;
        }
        Some(current.data())
    }

    /// Largest value, without restructuring.
    pub fn max_no_splay(&self) -> Option<&T> {
        let mut current = self.root()?;
        while let Some(right) = current.right() {
            current = right;
        }
        Some(current.data())
    }

    /// Number of levels, counted breadth-first one generation at a time.
    pub fn height(&self) -> usize {
        let Some(root) = self.root() else {
            return 0;
        };
        let mut current: RingBuffer<&Node<T>> = RingBuffer::new();
        let mut next: RingBuffer<&Node<T>> = RingBuffer::new();
        let mut height = 0;

        current.push_back(root);
        while !current.is_empty() {
            height += 1;
            while !current.is_empty() {
                let node = current.pop_front_get();
                if let Some(left) = node.left() {
                    next.push_back(left);
                }
                if let Some(right) = node.right() {
                    next.push_back(right);
                }
            }
            current.swap(&mut next);
            // The next generation is at most twice as wide as this one.
            next.reserve(current.len() * 2);
        }
        height
    }

    /// Remove and return the smallest value without splaying.
    ///
    /// Its right subtree, if any, takes its place.  Repeated calls drain
    /// the tree in ascending order.
    pub fn delete_min_no_splay(&mut self) -> Option<T> {
        if self.root.is_null() {
            return None;
        }
        let mut current = self.root;
        // SAFETY: every link followed is non-null and owned by this tree;
        // the removed node is unlinked before it is freed.
        unsafe {
            while !(*current).left.is_null() {
                current = (*current).left;
            }
            let Node { value, parent, right, .. } = *Box::from_raw(current);

            if parent.is_null() {
                self.root = right;
            } else {
                (*parent).left = right;
            }
            if !right.is_null() {
                (*right).parent = parent;
            }
            self.len -= 1;
            Some(value)
        }
    }

    /// Free every node, visiting the tree breadth-first.
    pub fn clear(&mut self) {
        if self.root.is_null() {
            return;
        }
        // At most half the nodes of a tree can sit on its widest level.
        let mut queue = RingBuffer::with_capacity(self.len / 2 + 2);
        queue.push_back(self.root);
        let freed = self.len;
        self.root = ptr::null_mut();
        self.len = 0;

        while !queue.is_empty() {
            // SAFETY: each node is reachable from exactly one parent link,
            // so it is queued and freed exactly once.
            let node = unsafe { Box::from_raw(queue.pop_front_get()) };
            if !node.left.is_null() {
                queue.push_back(node.left);
            }
            if !node.right.is_null() {
                queue.push_back(node.right);
            }
        }
        trace!(nodes = freed, "splay tree cleared");
    }

    pub fn iter(&self) -> Iter<'_, T> {
        let mut first = self.root();
        while let Some(left) = first.and_then(Node::left) {
            first = Some(left);
        }
        Iter::new(first, self.len)
    }

    /// Reinterpret the same nodes under another splay policy.
    pub fn into_policy<Q>(mut self) -> SplayTree<T, Q> {
        SplayTree {
            root: mem::replace(&mut self.root, ptr::null_mut()),
            len: mem::take(&mut self.len),
            _owns: PhantomData,
            _policy: PhantomData,
        }
    }
}

impl<T: Ord, P: SplayPolicy> SplayTree<T, P> {
    pub fn new() -> Self {
        SplayTree {
            root: ptr::null_mut(),
            len: 0,
            _owns: PhantomData,
            _policy: PhantomData,
        }
    }

    /// Build a perfectly balanced tree from values already in ascending
    /// order, without any rotation.  Each subtree root is the median of its
    /// range.
    pub fn from_sorted(sorted: Vec<T>) -> Self {
        let len = sorted.len();
        let mut values = sorted.into_iter();
        let root = Self::build(&mut values, len);
        let policy = P::KIND;
        debug!(len, %policy, "built balanced splay tree");
        SplayTree {
            root,
            len,
            _owns: PhantomData,
            _policy: PhantomData,
        }
    }

    /// Build `n` values into a subtree, consuming them in order.
    fn build(values: &mut vec::IntoIter<T>, n: usize) -> *mut Node<T> {
        if n == 0 {
            return ptr::null_mut();
        }
        let left_len = (n - 1) / 2;
        let left = Self::build(values, left_len);
        let Some(value) = values.next() else {
            return left;
        };
        let node = Node::alloc(value, ptr::null_mut());
        let right = Self::build(values, n - 1 - left_len);
        // SAFETY: `node` is freshly allocated; `left` and `right` are
        // detached subtrees built above.
        unsafe {
            (*node).left = left;
            (*node).right = right;
            if !left.is_null() {
                (*left).parent = node;
            }
            if !right.is_null() {
                (*right).parent = node;
            }
        }
        node
    }

    pub fn policy(&self) -> Policy {
        P::KIND
    }

    /// Splay `node`, which sits `depth` edges below the root.  Returns the
    /// node now holding its value.
    unsafe fn splay(&mut self, node: *mut Node<T>, depth: usize) -> *mut Node<T> {
        match P::KIND {
            Policy::Full => splay_full(node),
            Policy::Semi => splay_semi(node, depth),
        }
    }

    /// Insert `value` as a new leaf and splay it.
    pub fn insert(&mut self, value: T) {
        self.len += 1;
        if self.root.is_null() {
            self.root = Node::alloc(value, ptr::null_mut());
            return;
        }

        let mut parent = self.root;
        let mut depth = 0;
        // SAFETY: descent only follows non-null links owned by this tree.
        unsafe {
            loop {
                depth += 1;
                let slot = if value < (*parent).value {
                    &mut (*parent).left
                } else {
                    &mut (*parent).right
                };
                if slot.is_null() {
                    let node = Node::alloc(value, parent);
                    *slot = node;
                    self.splay(node, depth);
                    return;
                }
                parent = *slot;
            }
        }
    }

    /// Search for `value`, splaying it on a hit.
    ///
    /// A miss leaves the tree untouched; the last node visited is not
    /// splayed.
    pub fn contains<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        let mut depth = 0;
        // SAFETY: as in `insert`.
        unsafe {
            while !current.is_null() {
                match value.cmp((*current).value.borrow()) {
                    Ordering::Equal => {
                        self.splay(current, depth);
                        return true;
                    }
                    Ordering::Less => current = (*current).left,
                    Ordering::Greater => current = (*current).right,
                }
                depth += 1;
            }
        }
        false
    }

    /// Smallest value, splayed toward the root.
    pub fn min(&mut self) -> Option<&T> {
        if self.root.is_null() {
            return None;
        }
        let mut current = self.root;
        let mut depth = 0;
        // SAFETY: as in `insert`; the returned reference is tied to `self`.
        unsafe {
            while !(*current).left.is_null() {
                current = (*current).left;
                depth += 1;
            }
            let top = self.splay(current, depth);
            Some(&(*top).value)
        }
    }

    /// Largest value, splayed toward the root.
    pub fn max(&mut self) -> Option<&T> {
        if self.root.is_null() {
            return None;
        }
        let mut current = self.root;
        let mut depth = 0;
        unsafe {
            while !(*current).right.is_null() {
                current = (*current).right;
                depth += 1;
            }
            let top = self.splay(current, depth);
            Some(&(*top).value)
        }
    }

    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            policy: P::KIND,
            len: self.len,
            height: self.height(),
            optimal_height: optimal_height(self.len),
        }
    }
}

impl<T, P> Drop for SplayTree<T, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Ord, P: SplayPolicy> Default for SplayTree<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, P> fmt::Debug for SplayTree<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Ord, P: SplayPolicy> Extend<T> for SplayTree<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, P: SplayPolicy> FromIterator<T> for SplayTree<T, P> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T, P> IntoIterator for &'a SplayTree<T, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Preorder rendering: `.` for an empty link, a bare value for a leaf,
    /// `(v L R)` otherwise.
    fn shape(node: Option<&Node<i32>>) -> String {
        match node {
            None => ".".to_string(),
            Some(n) if n.is_leaf() => n.data().to_string(),
            Some(n) => format!("({} {} {})", n.data(), shape(n.left()), shape(n.right())),
        }
    }

    /// Check parent/child link consistency and BST order.  Equal values may
    /// sit on either side once a rotation has moved them.
    fn assert_valid<P>(tree: &SplayTree<i32, P>) {
        fn walk(node: &Node<i32>, lo: Option<i32>, hi: Option<i32>) -> usize {
            if let Some(lo) = lo {
                assert!(*node.data() >= lo, "{} below bound {}", node.data(), lo);
            }
            if let Some(hi) = hi {
                assert!(*node.data() <= hi, "{} above bound {}", node.data(), hi);
            }
            let mut count = 1;
            if let Some(left) = node.left() {
                assert!(ptr::eq(left.parent().unwrap(), node));
                count += walk(left, lo, Some(*node.data()));
            }
            if let Some(right) = node.right() {
                assert!(ptr::eq(right.parent().unwrap(), node));
                count += walk(right, Some(*node.data()), hi);
            }
            count
        }
        match tree.root() {
            None => assert_eq!(tree.len(), 0),
            Some(root) => {
                assert!(root.parent().is_none());
                assert_eq!(walk(root, None, None), tree.len());
            }
        }
    }

    fn balanced<P: SplayPolicy>(n: i32) -> SplayTree<i32, P> {
        SplayTree::from_sorted((1..=n).collect())
    }

    #[test]
    fn from_sorted_is_balanced() {
        let tree: SplayTree<i32> = balanced(7);
        assert_eq!(shape(tree.root()), "(4 (2 1 3) (6 5 7))");
        assert_valid(&tree);

        let tree: SplayTree<i32> = balanced(4);
        assert_eq!(shape(tree.root()), "(2 1 (3 . 4))");
        assert_valid(&tree);

        let tree: SplayTree<i32> = SplayTree::from_sorted(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn zig_rotates_right() {
        let mut tree: SplayTree<i32> = balanced(3);
        assert!(tree.contains(&1));
        assert_eq!(shape(tree.root()), "(1 . (2 . 3))");
        assert_valid(&tree);
    }

    #[test]
    fn zag_rotates_left() {
        let mut tree: SplayTree<i32> = balanced(3);
        assert!(tree.contains(&3));
        assert_eq!(shape(tree.root()), "(3 (2 1 .) .)");
        assert_valid(&tree);
    }

    #[test]
    fn zigzig_left_left() {
        let mut tree: SplayTree<i32> = balanced(7);
        assert!(tree.contains(&1));
        assert_eq!(shape(tree.root()), "(1 . (2 . (4 3 (6 5 7))))");
        assert_valid(&tree);
    }

    #[test]
    fn zagzag_right_right() {
        let mut tree: SplayTree<i32> = balanced(7);
        assert!(tree.contains(&7));
        assert_eq!(shape(tree.root()), "(7 (6 (4 (2 1 3) 5) .) .)");
        assert_valid(&tree);
    }

    #[test]
    fn zigzag_left_of_right() {
        let mut tree: SplayTree<i32> = balanced(7);
        assert!(tree.contains(&5));
        assert_eq!(shape(tree.root()), "(5 (4 (2 1 3) .) (6 . 7))");
        assert_valid(&tree);
    }

    #[test]
    fn zagzig_right_of_left() {
        let mut tree: SplayTree<i32> = balanced(7);
        assert!(tree.contains(&3));
        assert_eq!(shape(tree.root()), "(3 (2 1 .) (4 . (6 5 7)))");
        assert_valid(&tree);
    }

    #[test]
    fn insert_sequence_splays_each_value() {
        let mut tree: SplayTree<i32> = SplayTree::new();
        tree.insert(5);
        tree.insert(3);
        assert_eq!(shape(tree.root()), "(3 . 5)");
        tree.insert(8);
        assert_eq!(shape(tree.root()), "(8 (5 3 .) .)");
        tree.insert(1);
        assert_eq!(shape(tree.root()), "(1 . (8 (3 . 5) .))");
        tree.insert(4);
        assert_eq!(shape(tree.root()), "(4 (1 . 3) (8 5 .))");
        assert_valid(&tree);
    }

    #[test]
    fn duplicates_keep_order_after_rotation() {
        let mut tree: SplayTree<i32> = SplayTree::new();
        tree.insert(5);
        tree.insert(5);
        // zag promotes the right-hand copy; the old root's copy ends up left.
        assert_eq!(shape(tree.root()), "(5 5 .)");
        tree.insert(5);
        assert_eq!(shape(tree.root()), "(5 (5 5 .) .)");
        assert_valid(&tree);
        assert!(tree.contains(&5));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![5, 5, 5]);

        let mut tree: SplayTree<i32> = SplayTree::new();
        tree.extend([2, 1, 2]);
        assert_eq!(shape(tree.root()), "(2 (2 1 .) .)");
        assert_valid(&tree);

        let mut semi: SemiSplayTree<i32> = SplayTree::new();
        semi.extend([3, 3, 1, 3, 2, 3]);
        assert_valid(&semi);
        assert_eq!(semi.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 3, 3, 3]);
        let mut drained = Vec::new();
        while let Some(v) = semi.delete_min_no_splay() {
            drained.push(v);
        }
        assert_eq!(drained, vec![1, 2, 3, 3, 3, 3]);
    }

    #[test]
    fn semi_splay_rotates_parent_on_zigzig() {
        let mut tree: SemiSplayTree<i32> = balanced(7);
        assert!(tree.contains(&1));
        assert_eq!(shape(tree.root()), "(2 1 (4 3 (6 5 7)))");
        assert_valid(&tree);
    }

    #[test]
    fn semi_splay_rotates_parent_on_zagzag() {
        let mut tree: SemiSplayTree<i32> = balanced(7);
        assert!(tree.contains(&7));
        assert_eq!(shape(tree.root()), "(6 (4 (2 1 3) 5) 7)");
        assert_valid(&tree);
    }

    #[test]
    fn semi_splay_double_rotates_zigzag() {
        let mut tree: SemiSplayTree<i32> = balanced(7);
        assert!(tree.contains(&5));
        assert_eq!(shape(tree.root()), "(5 (4 (2 1 3) .) (6 . 7))");
        assert_valid(&tree);
    }

    #[test]
    fn semi_splay_evens_odd_paths_first() {
        let mut tree: SemiSplayTree<i32> = balanced(3);
        assert!(tree.contains(&1));
        assert_eq!(shape(tree.root()), "(1 . (2 . 3))");

        let mut tree: SemiSplayTree<i32> = balanced(15);
        assert!(tree.contains(&1));
        assert_eq!(
            shape(tree.root()),
            "(4 (1 . (2 . 3)) (8 (6 5 7) (12 (10 9 11) (14 13 15))))"
        );
        assert_valid(&tree);
    }

    #[test]
    fn min_and_max_return_splayed_value() {
        let mut tree: SplayTree<i32> = balanced(15);
        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.root().map(Node::data), Some(&1));
        assert_eq!(tree.max(), Some(&15));
        assert_eq!(tree.root().map(Node::data), Some(&15));
        assert_valid(&tree);

        let mut semi: SemiSplayTree<i32> = balanced(15);
        assert_eq!(semi.min(), Some(&1));
        assert_eq!(semi.max(), Some(&15));
        assert_valid(&semi);

        let mut empty: SplayTree<i32> = SplayTree::new();
        assert_eq!(empty.min(), None);
        assert_eq!(empty.max_no_splay(), None);
    }

    #[test]
    fn no_splay_queries_leave_shape_alone() {
        let tree: SplayTree<i32> = balanced(7);
        assert_eq!(tree.min_no_splay(), Some(&1));
        assert_eq!(tree.max_no_splay(), Some(&7));
        assert_eq!(shape(tree.root()), "(4 (2 1 3) (6 5 7))");
    }

    #[test]
    fn failed_lookup_does_not_restructure() {
        let mut tree: SplayTree<i32> = balanced(7);
        assert!(!tree.contains(&0));
        assert!(!tree.contains(&8));
        assert_eq!(shape(tree.root()), "(4 (2 1 3) (6 5 7))");
    }

    #[test]
    fn delete_min_relinks_right_subtree() {
        let mut tree: SplayTree<i32> = SplayTree::new();
        for v in [1, 3, 2] {
            tree.insert(v);
        }
        // 2 at the root with 1 and 3 below; drain to the bare right spine.
        assert_eq!(tree.delete_min_no_splay(), Some(1));
        assert_eq!(shape(tree.root()), "(2 . 3)");
        assert_eq!(tree.delete_min_no_splay(), Some(2));
        assert_eq!(shape(tree.root()), "3");
        assert!(tree.root().unwrap().parent().is_none());
        assert_valid(&tree);
        assert_eq!(tree.delete_min_no_splay(), Some(3));
        assert_eq!(tree.delete_min_no_splay(), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn delete_min_from_inner_left_spine() {
        let mut tree: SplayTree<i32> = balanced(7);
        assert_eq!(tree.delete_min_no_splay(), Some(1));
        assert_eq!(tree.delete_min_no_splay(), Some(2));
        assert_eq!(shape(tree.root()), "(4 3 (6 5 7))");
        assert_eq!(tree.len(), 5);
        assert_valid(&tree);
    }

    #[test]
    fn height_counts_levels() {
        let mut tree: SplayTree<i32> = balanced(7);
        assert_eq!(tree.height(), 3);
        tree.contains(&1);
        assert_eq!(tree.height(), 5);
    }

    #[test]
    fn into_policy_keeps_nodes() {
        let full: SplayTree<i32> = balanced(7);
        let mut semi: SemiSplayTree<i32> = full.into_policy();
        assert_eq!(semi.policy(), Policy::Semi);
        assert_eq!(semi.len(), 7);
        assert!(semi.contains(&1));
        assert_eq!(shape(semi.root()), "(2 1 (4 3 (6 5 7)))");
    }

    #[test]
    fn clear_frees_and_resets() {
        let mut tree: SplayTree<String> =
            ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
        assert!(tree.contains("a"));
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        tree.insert("z".to_string());
        assert_eq!(tree.min_no_splay().map(String::as_str), Some("z"));
    }

    #[test]
    fn debug_lists_in_order() {
        let tree: SplayTree<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(format!("{:?}", tree), "[1, 2, 3]");
    }
}
