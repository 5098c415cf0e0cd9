//! Growable circular array (ring buffer).
//!
//! Storage is a power-of-two array of possibly-uninitialised slots.  The
//! live elements occupy `len` consecutive slots in logical order starting at
//! `begin`, wrapping past the end of storage; logical index `i` lives at
//! physical slot `(begin + i) & (capacity - 1)`.  Pushing onto a full
//! buffer doubles the capacity, so both ends push and pop in amortized O(1).

use std::fmt;
use std::iter::{Chain, FusedIterator};
use std::mem::{self, MaybeUninit};
use std::ops::{Index, IndexMut, Range};
use std::ptr;
use std::slice;

use tracing::trace;

use crate::types::MIN_CAPACITY;

/// A double-ended queue over a circular power-of-two array.
///
/// Popping from an empty buffer or indexing past `len()` is a caller error:
/// check [`is_empty`](RingBuffer::is_empty) / [`len`](RingBuffer::len) first.
/// Such calls panic rather than return a sentinel.
pub struct RingBuffer<T> {
    buf: Box<[MaybeUninit<T>]>,
    begin: usize,
    len: usize,
}

/// Round a requested capacity up to the power of two actually allocated.
fn capacity_for(n: usize) -> usize {
    n.max(MIN_CAPACITY).next_power_of_two()
}

fn alloc_slots<T>(cap: usize) -> Box<[MaybeUninit<T>]> {
    (0..cap).map(|_| MaybeUninit::uninit()).collect()
}

impl<T> RingBuffer<T> {
    /// Empty buffer with the minimum capacity (4) reserved.
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Empty buffer able to hold `n` elements without reallocating.
    pub fn with_capacity(n: usize) -> Self {
        RingBuffer {
            buf: alloc_slots(capacity_for(n)),
            begin: 0,
            len: 0,
        }
    }

    /// Buffer with no storage at all; the first push allocates.
    fn unallocated() -> Self {
        RingBuffer {
            buf: Vec::new().into_boxed_slice(),
            begin: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn mask(&self) -> usize {
        self.capacity().wrapping_sub(1)
    }

    #[inline]
    fn physical(&self, pos: usize) -> usize {
        (self.begin + pos) & self.mask()
    }

    /// Physical slot ranges holding the live elements, in logical order.
    /// The second range is empty unless the elements wrap.
    fn ranges(&self) -> (Range<usize>, Range<usize>) {
        let end = self.begin + self.len;
        let cap = self.capacity();
        if end <= cap {
            (self.begin..end, 0..0)
        } else {
            (self.begin..cap, 0..end - cap)
        }
    }

    /// The live elements as two contiguous slices, front part first.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (a, b) = self.ranges();
        let base = self.buf.as_ptr() as *const T;
        // SAFETY: both ranges lie inside the storage and cover exactly the
        // initialised slots.
        unsafe {
            (
                slice::from_raw_parts(base.add(a.start), a.len()),
                slice::from_raw_parts(base.add(b.start), b.len()),
            )
        }
    }

    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (a, b) = self.ranges();
        let base = self.buf.as_mut_ptr() as *mut T;
        // SAFETY: as in `as_slices`; the two ranges never overlap.
        unsafe {
            (
                slice::from_raw_parts_mut(base.add(a.start), a.len()),
                slice::from_raw_parts_mut(base.add(b.start), b.len()),
            )
        }
    }

    /// Move the live elements into fresh storage of `new_cap` slots.
    ///
    /// At most two bulk copies: the run from `begin` to the end of storage
    /// and the wrapped run at the start.  The old storage is released only
    /// after the new one holds every element.
    fn resize(&mut self, new_cap: usize) {
        debug_assert!(new_cap.is_power_of_two() && new_cap >= self.len);
        let mut new_buf = alloc_slots::<T>(new_cap);
        let (a, b) = self.ranges();
        // SAFETY: source ranges are initialised, destination has room for
        // `len` elements, and the old slots are treated as moved-from since
        // `MaybeUninit` never drops its contents.
        unsafe {
            let src = self.buf.as_ptr();
            let dst = new_buf.as_mut_ptr();
            ptr::copy_nonoverlapping(src.add(a.start), dst, a.len());
            ptr::copy_nonoverlapping(src.add(b.start), dst.add(a.len()), b.len());
        }
        trace!(old = self.capacity(), new = new_cap, len = self.len, "ring buffer resized");
        self.buf = new_buf;
        self.begin = 0;
    }

    fn grow(&mut self) {
        let new_cap = if self.capacity() == 0 {
            MIN_CAPACITY
        } else {
            self.capacity() * 2
        };
        self.resize(new_cap);
    }

    /// Reallocate to the next power of two >= `n`.
    ///
    /// Does nothing if `n <= len()` or the rounded capacity is the current
    /// one.  May shrink the buffer as well as grow it.
    pub fn reserve(&mut self, n: usize) {
        if n <= self.len {
            return;
        }
        let new_cap = capacity_for(n);
        if new_cap != self.capacity() {
            self.resize(new_cap);
        }
    }

    /// Release unused storage, keeping at least the minimum capacity.
    pub fn shrink_to_fit(&mut self) {
        let new_cap = capacity_for(self.len);
        if new_cap < self.capacity() {
            self.resize(new_cap);
        }
    }

    pub fn push_back(&mut self, value: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        let idx = self.physical(self.len);
        self.buf[idx].write(value);
        self.len += 1;
    }

    pub fn push_front(&mut self, value: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.begin = self.begin.wrapping_sub(1) & self.mask();
        self.buf[self.begin].write(value);
        self.len += 1;
    }

    /// Remove and return the first element.
    ///
    /// # Panics
    ///
    /// If the buffer is empty.
    pub fn pop_front_get(&mut self) -> T {
        assert!(self.len > 0, "pop_front on empty RingBuffer");
        // SAFETY: the slot at `begin` is live; it is marked free right after.
        let value = unsafe { self.buf[self.begin].assume_init_read() };
        self.begin = (self.begin + 1) & self.mask();
        self.len -= 1;
        value
    }

    /// Remove and return the last element.
    ///
    /// # Panics
    ///
    /// If the buffer is empty.
    pub fn pop_back_get(&mut self) -> T {
        assert!(self.len > 0, "pop_back on empty RingBuffer");
        self.len -= 1;
        let idx = self.physical(self.len);
        // SAFETY: slot `idx` held the last live element and is now outside
        // the live range.
        unsafe { self.buf[idx].assume_init_read() }
    }

    pub fn pop_front(&mut self) {
        drop(self.pop_front_get());
    }

    pub fn pop_back(&mut self) {
        drop(self.pop_back_get());
    }

    /// Element at logical position `pos`.
    ///
    /// # Panics
    ///
    /// If `pos >= len()`.
    #[inline]
    pub fn at(&self, pos: usize) -> &T {
        assert!(pos < self.len, "index {} out of range for RingBuffer of length {}", pos, self.len);
        let idx = self.physical(pos);
        // SAFETY: every logical position below `len` maps to a live slot.
        unsafe { self.buf[idx].assume_init_ref() }
    }

    #[inline]
    pub fn at_mut(&mut self, pos: usize) -> &mut T {
        assert!(pos < self.len, "index {} out of range for RingBuffer of length {}", pos, self.len);
        let idx = self.physical(pos);
        // SAFETY: as in `at`.
        unsafe { self.buf[idx].assume_init_mut() }
    }

    pub fn get(&self, pos: usize) -> Option<&T> {
        if pos < self.len {
            Some(self.at(pos))
        } else {
            None
        }
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).map(|last| self.at(last))
    }

    /// Insert `value` so that it ends up at logical position `pos`.
    ///
    /// Whichever side of `pos` is shorter is shifted by one slot, so the
    /// cost is O(min(pos, len - pos)).
    ///
    /// # Panics
    ///
    /// If `pos > len()`.
    pub fn insert(&mut self, pos: usize, value: T) {
        assert!(pos <= self.len, "insert position {} past end {}", pos, self.len);
        if pos == self.len {
            self.push_back(value);
            return;
        }
        if pos == 0 {
            self.push_front(value);
            return;
        }
        if self.len == self.capacity() {
            self.grow();
        }

        let mask = self.mask();
        if pos <= self.len / 2 {
            // Open a slot before the front and slide the first `pos`
            // elements down into it.
            self.begin = self.begin.wrapping_sub(1) & mask;
            for i in 0..pos {
                let to = (self.begin + i) & mask;
                let from = (self.begin + i + 1) & mask;
                self.buf.swap(to, from);
            }
        } else {
            // Slide the tail up by one, starting from the back.
            for i in (pos..self.len).rev() {
                let from = (self.begin + i) & mask;
                let to = (self.begin + i + 1) & mask;
                self.buf.swap(to, from);
            }
        }
        let idx = (self.begin + pos) & mask;
        self.buf[idx].write(value);
        self.len += 1;
    }

    /// Drop every element, keeping the storage.
    pub fn clear(&mut self) {
        let (a, b) = self.ranges();
        // Reset first so a panicking destructor cannot cause a double drop.
        self.begin = 0;
        self.len = 0;
        let base = self.buf.as_mut_ptr() as *mut T;
        // SAFETY: the ranges were the live elements and are no longer
        // reachable through `self`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(a.start), a.len()));
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(b.start), b.len()));
        }
    }

    /// Move the contents out, leaving `self` with no storage (capacity 0).
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::unallocated())
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    pub fn iter(&self) -> Iter<'_, T> {
        let (a, b) = self.as_slices();
        Iter { inner: a.iter().chain(b.iter()) }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (a, b) = self.as_mut_slices();
        IterMut { inner: a.iter_mut().chain(b.iter_mut()) }
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // Storage itself is released by the boxed slice; a zero-capacity
        // buffer has nothing to release.
        self.clear();
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RingBuffer<T> {
    fn clone(&self) -> Self {
        let mut out = if self.capacity() == 0 {
            Self::unallocated()
        } else {
            Self::with_capacity(self.capacity())
        };
        for v in self.iter() {
            out.push_back(v.clone());
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RingBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RingBuffer<T> {}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, pos: usize) -> &T {
        self.at(pos)
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, pos: usize) -> &mut T {
        self.at_mut(pos)
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        // `reserve` may shrink; extending never does.
        if self.len + lower > self.capacity() {
            self.reserve(self.len + lower);
        }
        for v in iter {
            self.push_back(v);
        }
    }
}

impl<T> FromIterator<T> for RingBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ring = RingBuffer::new();
        ring.extend(iter);
        ring
    }
}

// ── iterators ────────────────────────────────────────────────────────────

/// Front-to-back iterator over references.
pub struct Iter<'a, T> {
    inner: Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Front-to-back iterator over mutable references.
pub struct IterMut<'a, T> {
    inner: Chain<slice::IterMut<'a, T>, slice::IterMut<'a, T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator; pops from the front.
pub struct IntoIter<T> {
    ring: RingBuffer<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.ring.is_empty() {
            None
        } else {
            Some(self.ring.pop_front_get())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.ring.len(), Some(self.ring.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.ring.is_empty() {
            None
        } else {
            Some(self.ring.pop_back_get())
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for RingBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { ring: self }
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut RingBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
