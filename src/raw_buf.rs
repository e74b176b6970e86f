//! RawBuf: exclusively owned, uninitialized storage for `Vector`.
//!
//! `RawBuf` only manages memory; it never constructs or drops elements.
//! `Filling` is the unwind guard used while values are written into fresh
//! slots: if producing a value panics, the values already written are
//! dropped and nothing else is touched.

use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};
use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};

/// `capacity` slots of `T`; the pointer is dangling iff `capacity == 0`
/// or `T` is zero-sized.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _owns: PhantomData<T>,
}

impl<T> RawBuf<T> {
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _owns: PhantomData,
        }
    }

    /// # Panics
    ///
    /// Panics if `cap` slots would exceed `isize::MAX` bytes.
    pub(crate) fn with_capacity(cap: usize) -> Self {
        if cap == 0 {
            return Self::new();
        }
        let layout = match Layout::array::<T>(cap) {
            Ok(l) => l,
            Err(_) => panic!("capacity overflow"),
        };
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            // SAFETY: layout has a non-zero size.
            let raw = unsafe { alloc(layout) }.cast::<T>();
            match NonNull::new(raw) {
                Some(p) => p,
                None => handle_alloc_error(layout),
            }
        };
        Self {
            ptr,
            cap,
            _owns: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.cap == 0 || mem::size_of::<T>() == 0 {
            return;
        }
        if let Ok(layout) = Layout::array::<T>(self.cap) {
            // SAFETY: allocated in with_capacity with this exact layout.
            unsafe { dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

/// Counts values written from `start` onward. Dropping it without
/// `commit` drops exactly those values.
pub(crate) struct Filling<T> {
    start: *mut T,
    written: usize,
}

impl<T> Filling<T> {
    /// # Safety
    ///
    /// `start` must point at unused slots that stay valid for as many
    /// values as later passed to `fill`.
    pub(crate) unsafe fn new(start: *mut T) -> Self {
        Self { start, written: 0 }
    }

    /// Write at most `limit` values pulled from `items`.
    pub(crate) fn fill<I: Iterator<Item = T>>(&mut self, items: I, limit: usize) {
        for item in items.take(limit) {
            // SAFETY: the slot is unused and within the caller's bound.
            unsafe { ptr::write(self.start.add(self.written), item) };
            self.written += 1;
        }
    }

    /// Keep the written values and return how many there are.
    pub(crate) fn commit(self) -> usize {
        let n = self.written;
        mem::forget(self);
        n
    }
}

impl<T> Drop for Filling<T> {
    fn drop(&mut self) {
        // SAFETY: exactly `written` values were initialized from `start`.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.written)) }
    }
}
