//! Vector: a contiguous growable array over an exclusively owned buffer.
//!
//! Storage layout: `buf` holds `capacity` slots, the first `len` of which
//! are live values. Every path that needs a bigger (or exactly sized)
//! buffer goes through `reallocate`, which
//! 1. allocates the new buffer,
//! 2. writes any new tail values into it under an unwind guard,
//! 3. moves the existing prefix across bitwise,
//! 4. swaps the buffers and frees the old one.
//!
//! Only step 2 runs user code (`Clone`, `Default`, closures, iterators).
//! If it panics, the guard drops what was written and the fresh buffer is
//! freed; `self` is never touched, so its length, capacity and elements
//! stay exactly as before the call.

use crate::cursor::{Cursor, CursorMut, RevCursor, RevCursorMut};
use crate::error::IndexError;
use crate::raw_buf::{Filling, RawBuf};
use core::cmp::{self, Ordering};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{self, FusedIterator};
use core::mem::{self, ManuallyDrop};
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr;
use core::slice;
use tracing::trace;

const MIN_CAPACITY: usize = 1;
const GROWTH_FACTOR: usize = 2;

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

/// Contiguous growable array with doubling growth and strong unwind safety
/// on every reallocating path.
pub struct Vector<T> {
    buf: RawBuf<T>,
    len: usize,
}

// Same ownership story as Vec: the buffer is exclusively ours.
unsafe impl<T: Send> Send for Vector<T> {}
unsafe impl<T: Sync> Sync for Vector<T> {}

impl<T> Vector<T> {
    pub const fn new() -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
        }
    }

    /// Empty vector with room for exactly `cap` elements.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: RawBuf::with_capacity(cap),
            len: 0,
        }
    }

    // n == 0 stays unallocated so that empty means capacity 0.
    fn from_fill<I: Iterator<Item = T>>(n: usize, items: I) -> Self {
        let mut v = Self::new();
        if n > 0 {
            v.reallocate(n, items);
        }
        v
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    fn required(&self, extra: usize) -> usize {
        self.len
            .checked_add(extra)
            .unwrap_or_else(|| capacity_overflow())
    }

    fn grown_capacity(&self, needed: usize) -> usize {
        let doubled = cmp::max(
            MIN_CAPACITY,
            self.capacity().saturating_mul(GROWTH_FACTOR),
        );
        cmp::max(needed, doubled)
    }

    /// Move into a buffer of exactly `new_cap` slots, appending up to
    /// `new_cap - len` values from `tail` on the way. Returns how many were
    /// appended.
    fn reallocate<I: Iterator<Item = T>>(&mut self, new_cap: usize, tail: I) -> usize {
        debug_assert!(new_cap >= self.len);
        let new_buf = RawBuf::<T>::with_capacity(new_cap);
        // Declared after new_buf: on unwind the written values drop first,
        // then the fresh buffer is freed.
        // SAFETY: slots [len, new_cap) of new_buf are unused.
        let mut filling = unsafe { Filling::new(new_buf.ptr().add(self.len)) };
        filling.fill(tail, new_cap - self.len);
        let appended = filling.commit();

        // SAFETY: the live prefix is moved bitwise into disjoint storage;
        // the old buffer is freed below without dropping its slots.
        unsafe { ptr::copy_nonoverlapping(self.buf.ptr(), new_buf.ptr(), self.len) };
        let old = mem::replace(&mut self.buf, new_buf);
        trace!(
            old_capacity = old.capacity(),
            new_capacity = new_cap,
            len = self.len,
            "vector: reallocated"
        );
        drop(old);
        self.len += appended;
        appended
    }

    /// Append up to `limit` values into existing spare capacity.
    fn append_in_place<I: Iterator<Item = T>>(&mut self, tail: I, limit: usize) -> usize {
        debug_assert!(limit <= self.capacity() - self.len);
        // SAFETY: slots [len, len + limit) are unused and inside the buffer.
        let mut filling = unsafe { Filling::new(self.buf.ptr().add(self.len)) };
        filling.fill(tail, limit);
        let appended = filling.commit();
        self.len += appended;
        appended
    }

    fn release(&mut self) {
        debug_assert_eq!(self.len, 0);
        let old = mem::replace(&mut self.buf, RawBuf::new());
        if old.capacity() > 0 {
            trace!(capacity = old.capacity(), "vector: buffer released");
        }
    }

    /// Append `value`, doubling the capacity (minimum 1) when full.
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity() {
            let cap = self.grown_capacity(self.required(1));
            self.reallocate(cap, iter::once(value));
        } else {
            // SAFETY: len < capacity, so the slot is unused and in bounds.
            unsafe { ptr::write(self.buf.ptr().add(self.len), value) };
            self.len += 1;
        }
    }

    /// Remove the last element. Capacity is unchanged.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now outside [0, len).
        Some(unsafe { ptr::read(self.buf.ptr().add(self.len)) })
    }

    /// Grow the capacity to exactly `n` if it is smaller. Never shrinks.
    pub fn reserve(&mut self, n: usize) {
        if n > self.capacity() {
            self.reallocate(n, iter::empty());
        }
    }

    /// Resize to `n` elements, producing new ones with `f`.
    ///
    /// Growing past the capacity reallocates to exactly `n`. Shrinking
    /// drops the tail and keeps the capacity.
    pub fn resize_with<F>(&mut self, n: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if n <= self.len {
            self.truncate(n);
        } else if n > self.capacity() {
            self.reallocate(n, iter::repeat_with(f));
        } else {
            self.append_in_place(iter::repeat_with(f), n - self.len);
        }
    }

    /// Drop elements past `n`. Capacity is unchanged.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len {
            return;
        }
        let tail = self.len - n;
        // Shorten first so a panicking destructor cannot cause a double drop.
        self.len = n;
        // SAFETY: [n, n + tail) were live and are no longer reachable.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.ptr().add(n), tail)) }
    }

    /// Reallocate to exactly `len` slots, or release the buffer when empty.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() == self.len {
            return;
        }
        if self.len == 0 {
            self.release();
        } else {
            self.reallocate(self.len, iter::empty());
        }
    }

    /// Drop every element and release the buffer.
    pub fn clear(&mut self) {
        self.truncate(0);
        self.release();
    }

    /// Move the contents out, leaving `self` empty with no buffer.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) are live; the pointer is non-null and aligned.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Start of the buffer. Dangling (never null) when nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Bounds-checked access.
    pub fn at(&self, index: usize) -> Result<&T, IndexError> {
        self.get(index).ok_or(IndexError::OutOfRange)
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexError> {
        self.get_mut(index).ok_or(IndexError::OutOfRange)
    }

    /// # Safety
    ///
    /// `index` must be less than `len()`.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        &*self.buf.ptr().add(index)
    }

    /// # Safety
    ///
    /// `index` must be less than `len()`.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        &mut *self.buf.ptr().add(index)
    }

    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.as_slice().iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.as_mut_slice().iter_mut(),
        }
    }

    /// Cursor at the first element.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len)
    }

    /// Reversed cursor at the last element.
    pub fn rbegin(&self) -> RevCursor<'_, T> {
        Cursor::new(self.as_slice(), self.len)
    }

    /// Reversed cursor one before the first element.
    pub fn rend(&self) -> RevCursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.as_mut_slice(), 0)
    }

    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        let len = self.len;
        CursorMut::new(self.as_mut_slice(), len)
    }

    pub fn rbegin_mut(&mut self) -> RevCursorMut<'_, T> {
        let len = self.len;
        CursorMut::new(self.as_mut_slice(), len)
    }

    pub fn rend_mut(&mut self) -> RevCursorMut<'_, T> {
        CursorMut::new(self.as_mut_slice(), 0)
    }
}

impl<T: Default> Vector<T> {
    /// `n` default values; `capacity == n`.
    pub fn with_len(n: usize) -> Self {
        Self::from_fill(n, iter::repeat_with(T::default))
    }

    /// Resize to `n`, filling new slots with `T::default()` whether or not
    /// the growth fits in the current capacity.
    pub fn resize_default(&mut self, n: usize) {
        self.resize_with(n, T::default);
    }
}

impl<T: Clone> Vector<T> {
    /// `n` clones of `value`; `capacity == n`.
    pub fn from_elem(n: usize, value: T) -> Self {
        Self::from_fill(n, iter::repeat(value))
    }

    pub fn from_slice(items: &[T]) -> Self {
        Self::from_fill(items.len(), items.iter().cloned())
    }

    pub fn resize(&mut self, n: usize, value: T) {
        self.resize_with(n, || value.clone());
    }

    /// Append clones of `items`. If a clone panics, `self` is unchanged.
    pub fn extend_from_slice(&mut self, items: &[T]) {
        let needed = self.required(items.len());
        if needed > self.capacity() {
            let cap = self.grown_capacity(needed);
            self.reallocate(cap, items.iter().cloned());
        } else {
            self.append_in_place(items.iter().cloned(), items.len());
        }
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: [0, len) are live; the buffer itself is freed by RawBuf.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy with `capacity == len`.
impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(v) => v,
            None => panic!("index out of bounds: {} >= {}", index, self.len),
        }
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(v) => v,
            None => panic!("index out of bounds: {} >= {}", index, len),
        }
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for Vector<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T: PartialEq> PartialEq<[T]> for Vector<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialOrd> PartialOrd for Vector<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for Vector<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for Vector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Collected vectors are trimmed to `capacity == len`.
impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Self::new();
        for item in iter {
            v.push(item);
        }
        v.shrink_to_fit();
        v
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Vector<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(items: [T; N]) -> Self {
        Self::from_fill(N, IntoIterator::into_iter(items))
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(items: &[T]) -> Self {
        Self::from_slice(items)
    }
}

/// Borrowing iterator over a `Vector`.
#[derive(Clone, Debug)]
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, T>,
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
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Mutably borrowing iterator over a `Vector`.
#[derive(Debug)]
pub struct IterMut<'a, T> {
    inner: slice::IterMut<'a, T>,
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
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.inner.next_back()
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}
impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// Owning iterator. Elements not yielded are dropped with the iterator.
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    start: usize,
    end: usize,
}

unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [start, end) are live.
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: start < end, the slot is live and leaves the live range.
        let item = unsafe { ptr::read(self.buf.ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.start;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot was live and now sits past `end`.
        Some(unsafe { ptr::read(self.buf.ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let rest = self.end - self.start;
        // SAFETY: [start, end) are the remaining live values.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.ptr().add(self.start),
                rest,
            ))
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let me = ManuallyDrop::new(self);
        // SAFETY: `me` is never dropped, so the buffer moves out exactly once.
        let buf = unsafe { ptr::read(&me.buf) };
        IntoIter {
            buf,
            start: 0,
            end: me.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;
    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

/// Build a `Vector` like a literal: `vector![1, 2, 3]` or `vector![0; n]`.
#[macro_export]
macro_rules! vector {
    () => {
        $crate::Vector::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Vector::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Vector::from([$($x),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counted(Rc<Cell<usize>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Invariant: pushing into a full vector doubles its capacity, starting at 1.
    #[test]
    fn push_doubles_capacity() {
        let mut v = Vector::new();
        assert_eq!(v.capacity(), 0);
        let mut seen = Vec::new();
        for i in 0..9 {
            v.push(i);
            seen.push(v.capacity());
        }
        assert_eq!(seen, vec![1, 2, 4, 4, 8, 8, 8, 8, 16]);
        assert_eq!(v, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    /// Invariant: every non-empty constructor yields capacity == len; empty
    /// constructors allocate nothing.
    #[test]
    fn constructors_are_exactly_sized() {
        let a: Vector<u8> = Vector::with_len(3);
        assert_eq!((a.len(), a.capacity()), (3, 3));
        assert_eq!(a, [0, 0, 0]);

        let b = Vector::from_elem(4, "x");
        assert_eq!((b.len(), b.capacity()), (4, 4));

        let c = Vector::from_slice(&[1, 2]);
        assert_eq!((c.len(), c.capacity()), (2, 2));

        let d: Vector<i32> = (0..5).collect();
        assert_eq!((d.len(), d.capacity()), (5, 5));

        let e = vector![1, 2, 3];
        assert_eq!((e.len(), e.capacity()), (3, 3));

        let f: Vector<i32> = Vector::with_len(0);
        assert_eq!(f.capacity(), 0);
        let g: Vector<i32> = vector![];
        assert_eq!(g.capacity(), 0);
        let h = vector![7u8; 2];
        assert_eq!(h, [7, 7]);
    }

    /// Invariant: reserve grows to exactly n and never shrinks.
    #[test]
    fn reserve_is_exact_and_monotone() {
        let mut v = vector![1, 2];
        v.reserve(10);
        assert_eq!(v.capacity(), 10);
        v.reserve(3);
        assert_eq!(v.capacity(), 10);
        assert_eq!(v, [1, 2]);
    }

    /// Invariant: resize past capacity reallocates exactly; within capacity it
    /// fills in place; shrinking keeps the capacity.
    #[test]
    fn resize_policies() {
        let mut v = vector![1, 2];
        v.resize(5, 9);
        assert_eq!(v, [1, 2, 9, 9, 9]);
        assert_eq!(v.capacity(), 5);

        v.resize(2, 0);
        assert_eq!(v, [1, 2]);
        assert_eq!(v.capacity(), 5);

        v.resize_default(4);
        assert_eq!(v, [1, 2, 0, 0]);
        assert_eq!(v.capacity(), 5);

        let mut n = 10;
        v.resize_with(6, || {
            n += 1;
            n
        });
        assert_eq!(v, [1, 2, 0, 0, 11, 12]);
        assert_eq!(v.capacity(), 6);
    }

    /// Invariant: truncation drops exactly the removed elements.
    #[test]
    fn truncate_drops_tail_only() {
        let drops = Rc::new(Cell::new(0));
        let mut v: Vector<Counted> = (0..5).map(|_| Counted(drops.clone())).collect();
        v.truncate(2);
        assert_eq!(drops.get(), 3);
        assert_eq!(v.len(), 2);
        assert_eq!(v.capacity(), 5);
        drop(v);
        assert_eq!(drops.get(), 5);
    }

    /// Invariant: pop returns elements back to front and leaves capacity alone.
    #[test]
    fn pop_keeps_capacity() {
        let mut v = vector![1, 2, 3];
        v.push(4);
        let cap = v.capacity();
        assert_eq!(v.pop(), Some(4));
        assert_eq!(v.pop(), Some(3));
        assert_eq!(v.capacity(), cap);
        assert_eq!(v, [1, 2]);
        v.clear();
        assert_eq!(v.pop(), None);
    }

    /// Invariant: shrink_to_fit matches capacity to len, releasing when empty.
    #[test]
    fn shrink_to_fit_and_clear() {
        let mut v = Vector::with_capacity(8);
        v.extend_from_slice(&[1, 2, 3]);
        v.shrink_to_fit();
        assert_eq!(v.capacity(), 3);
        v.truncate(0);
        v.shrink_to_fit();
        assert_eq!(v.capacity(), 0);

        let mut w = vector![1, 2];
        w.clear();
        assert_eq!((w.len(), w.capacity()), (0, 0));
    }

    /// Invariant: checked access reports OutOfRange exactly when i >= len.
    #[test]
    fn at_reports_out_of_range() {
        let mut v = vector![10, 20];
        assert_eq!(v.at(1), Ok(&20));
        assert_eq!(v.at(2), Err(IndexError::OutOfRange));
        *v.at_mut(0).unwrap() = 11;
        assert_eq!(v[0], 11);
        assert_eq!(v.at_mut(5), Err(IndexError::OutOfRange));
        assert_eq!(unsafe { *v.get_unchecked(1) }, 20);
    }

    /// Invariant: indexing past len panics instead of reading stale slots.
    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_past_len_panics() {
        let mut v = Vector::with_capacity(4);
        v.push(1);
        let _x: i32 = v[1];
    }

    /// Invariant: take and swap move buffers without copying elements.
    #[test]
    fn take_and_swap_move_buffers() {
        let mut a = vector![1, 2, 3];
        let ptr = a.as_ptr();
        let b = a.take();
        assert!(a.is_empty());
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.as_ptr(), ptr);

        let mut c = vector![9];
        let mut d = b;
        c.swap(&mut d);
        assert_eq!(c, [1, 2, 3]);
        assert_eq!(d, [9]);
    }

    /// Invariant: the owning iterator yields from both ends and drops what it
    /// never yielded.
    #[test]
    fn into_iter_drops_remainder() {
        let drops = Rc::new(Cell::new(0));
        let v: Vector<Counted> = (0..4).map(|_| Counted(drops.clone())).collect();
        let mut it = v.into_iter();
        drop(it.next());
        drop(it.next_back());
        assert_eq!(drops.get(), 2);
        assert_eq!(it.len(), 2);
        drop(it);
        assert_eq!(drops.get(), 4);

        let w = vector![1, 2, 3];
        let back: Vec<i32> = w.into_iter().rev().collect();
        assert_eq!(back, vec![3, 2, 1]);
    }

    /// Invariant: zero-sized elements are counted without allocating.
    #[test]
    fn zero_sized_elements() {
        let mut v = Vector::new();
        for _ in 0..10 {
            v.push(());
        }
        assert_eq!(v.len(), 10);
        assert_eq!(v.pop(), Some(()));
        assert_eq!(v.into_iter().count(), 9);
    }

    /// Invariant: comparisons are element-wise and lexicographic.
    #[test]
    fn lexicographic_ordering() {
        let a = vector![1, 2, 3];
        let b = vector![1, 2, 4];
        let c = vector![1, 2];
        assert!(a < b);
        assert!(c < a);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
        assert_ne!(a, c);
        assert_eq!(format!("{:?}", c), "[1, 2]");
    }

    /// Invariant: front/back and iterators see the live range only.
    #[test]
    fn front_back_and_iterators() {
        let mut v: Vector<i32> = Vector::with_capacity(6);
        v.extend([3, 1, 2]);
        assert_eq!(v.front(), Some(&3));
        assert_eq!(v.back(), Some(&2));
        for x in v.iter_mut() {
            *x *= 2;
        }
        *v.back_mut().unwrap() += 1;
        assert_eq!(v.iter().copied().collect::<Vec<_>>(), vec![6, 2, 5]);
        assert_eq!((&v).into_iter().len(), 3);
        v.sort();
        assert_eq!(v, [2, 5, 6]);
    }
}
