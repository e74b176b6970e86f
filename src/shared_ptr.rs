//! SharedPtr: a single heap object shared through an out-of-band strong count.
//!
//! Every live `SharedPtr` in an ownership group holds the same two
//! addresses: the target object and its `StrongCount`. Cloning bumps the
//! count, dropping decrements it, and the last owner frees both
//! allocations together.

use crate::count::StrongCount;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::{self, NonNull};
use tracing::trace;

// Both pointers are live for as long as any owner holds this pair.
struct Owned<T> {
    target: NonNull<T>,
    count: NonNull<StrongCount>,
}

impl<T> Clone for Owned<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Owned<T> {}

impl<T> Owned<T> {
    #[inline]
    fn count(&self) -> &StrongCount {
        // SAFETY: the counter outlives every owner that can reach it.
        unsafe { self.count.as_ref() }
    }
}

/// Shared owning pointer with a non-atomic strong count.
///
/// Single-threaded: `!Send`/`!Sync` through its raw pointers. No weak
/// references are provided.
pub struct SharedPtr<T> {
    owned: Option<Owned<T>>,
    _owns: PhantomData<T>,
}

impl<T> SharedPtr<T> {
    /// A pointer that owns nothing. `use_count()` is 0.
    pub const fn null() -> Self {
        Self {
            owned: None,
            _owns: PhantomData,
        }
    }

    /// Move `value` to the heap and own it with a count of 1.
    pub fn new(value: T) -> Self {
        Self::from_box(Box::new(value))
    }

    /// Adopt an already heap-allocated object. The count starts at 1.
    pub fn from_box(target: Box<T>) -> Self {
        let count = Box::new(StrongCount::new(1));
        Self {
            owned: Some(Owned {
                target: NonNull::from(Box::leak(target)),
                count: NonNull::from(Box::leak(count)),
            }),
            _owns: PhantomData,
        }
    }

    /// Adopt a raw pointer. A null `ptr` yields a null `SharedPtr`.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must come from `Box::into_raw` and must not be owned
    /// by anything else.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        match NonNull::new(ptr) {
            Some(p) => Self::from_box(Box::from_raw(p.as_ptr())),
            None => Self::null(),
        }
    }

    fn from_option(target: Option<Box<T>>) -> Self {
        target.map_or_else(Self::null, Self::from_box)
    }

    /// Release the current object (if any) and adopt `target`.
    ///
    /// `reset(None)` leaves the pointer null.
    pub fn reset(&mut self, target: Option<Box<T>>) {
        let old = core::mem::replace(self, Self::from_option(target));
        drop(old);
    }

    /// Move ownership out, leaving `self` null. The count is unchanged.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.owned, &mut other.owned);
    }

    /// Number of live pointers sharing the target, or 0 when null.
    pub fn use_count(&self) -> usize {
        self.owned.as_ref().map_or(0, |o| o.count().get())
    }

    pub fn is_null(&self) -> bool {
        self.owned.is_none()
    }

    /// Borrow the target, or `None` when null.
    pub fn get(&self) -> Option<&T> {
        // SAFETY: self is an owner, so the target is alive for the borrow.
        self.owned.as_ref().map(|o| unsafe { o.target.as_ref() })
    }

    /// Mutably borrow the target when this is its only owner.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self.owned.as_mut() {
            // SAFETY: count == 1 means no other pointer can observe the target.
            Some(o) if o.count().get() == 1 => Some(unsafe { o.target.as_mut() }),
            _ => None,
        }
    }

    /// Raw address of the target, null when the pointer is null.
    pub fn as_ptr(&self) -> *const T {
        self.owned
            .as_ref()
            .map_or(ptr::null(), |o| o.target.as_ptr() as *const T)
    }

    /// True when both pointers share the same target (or are both null).
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        ptr::eq(this.as_ptr(), other.as_ptr())
    }

    /// Return the target by value if this is its only owner.
    pub fn try_unwrap(mut self) -> Result<T, Self> {
        match self.owned {
            Some(o) if o.count().get() == 1 => {
                // self becomes null so its Drop does nothing.
                self.owned = None;
                // SAFETY: sole owner; both allocations came from Box::leak.
                unsafe {
                    drop(Box::from_raw(o.count.as_ptr()));
                    Ok(*Box::from_raw(o.target.as_ptr()))
                }
            }
            _ => Err(self),
        }
    }
}

impl<T> Default for SharedPtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Clone for SharedPtr<T> {
    fn clone(&self) -> Self {
        if let Some(o) = self.owned.as_ref() {
            o.count().acquire();
        }
        Self {
            owned: self.owned,
            _owns: PhantomData,
        }
    }
}

impl<T> Drop for SharedPtr<T> {
    fn drop(&mut self) {
        let Some(o) = self.owned.take() else {
            return;
        };
        if o.count().release() {
            trace!(target_addr = ?o.target, "shared_ptr: last owner released");
            // SAFETY: count hit zero, nobody else can reach either allocation.
            // The counter goes first so a panicking T::drop cannot leak it.
            unsafe {
                drop(Box::from_raw(o.count.as_ptr()));
                drop(Box::from_raw(o.target.as_ptr()));
            }
        }
    }
}

impl<T> Deref for SharedPtr<T> {
    type Target = T;

    /// # Panics
    ///
    /// Panics when the pointer is null; use `get` for a checked borrow.
    fn deref(&self) -> &T {
        match self.get() {
            Some(t) => t,
            None => panic!("dereferenced a null SharedPtr"),
        }
    }
}

impl<T> From<Box<T>> for SharedPtr<T> {
    fn from(target: Box<T>) -> Self {
        Self::from_box(target)
    }
}

impl<T> From<T> for SharedPtr<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(t) => f
                .debug_struct("SharedPtr")
                .field("target", t)
                .field("use_count", &self.use_count())
                .finish(),
            None => f.write_str("SharedPtr(null)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked {
        drops: Rc<Cell<usize>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn tracked() -> (Rc<Cell<usize>>, Tracked) {
        let drops = Rc::new(Cell::new(0));
        let t = Tracked {
            drops: drops.clone(),
        };
        (drops, t)
    }

    /// Invariant: a null pointer reports zero owners and no target.
    #[test]
    fn null_has_no_count() {
        let p: SharedPtr<i32> = SharedPtr::null();
        assert!(p.is_null());
        assert_eq!(p.use_count(), 0);
        assert!(p.get().is_none());
        assert!(p.as_ptr().is_null());
        let q = p.clone();
        assert_eq!(q.use_count(), 0);
    }

    /// Invariant: clones share one counter; each reports the group size.
    #[test]
    fn clones_share_one_counter() {
        let a = SharedPtr::new(7);
        let b = a.clone();
        let c = b.clone();
        for p in [&a, &b, &c] {
            assert_eq!(p.use_count(), 3);
            assert_eq!(**p, 7);
        }
        assert!(SharedPtr::ptr_eq(&a, &c));
        drop(b);
        assert_eq!(a.use_count(), 2);
        assert_eq!(c.use_count(), 2);
    }

    /// Invariant: `take` moves ownership without touching the count and
    /// leaves the source null.
    #[test]
    fn take_moves_without_counting() {
        let mut a = SharedPtr::new(String::from("x"));
        let b = a.take();
        assert!(a.is_null());
        assert_eq!(a.use_count(), 0);
        assert_eq!(b.use_count(), 1);
        assert_eq!(b.as_str(), "x");
    }

    /// Invariant: `reset` releases the old group and starts a fresh count of 1
    /// (or null); the old target is destroyed only when its last owner goes.
    #[test]
    fn reset_releases_then_adopts() {
        let (drops, t) = tracked();
        let mut a = SharedPtr::new(t);
        let b = a.clone();

        a.reset(Some(Box::new(tracked().1)));
        assert_eq!(a.use_count(), 1);
        assert_eq!(b.use_count(), 1);
        assert_eq!(drops.get(), 0);

        drop(b);
        assert_eq!(drops.get(), 1);

        a.reset(None);
        assert!(a.is_null());
    }

    /// Invariant: `swap` exchanges targets and counts without changing them.
    #[test]
    fn swap_exchanges_groups() {
        let mut a = SharedPtr::new(1);
        let a2 = a.clone();
        let mut b = SharedPtr::new(2);
        a.swap(&mut b);
        assert_eq!(*a, 2);
        assert_eq!(*b, 1);
        assert_eq!(a.use_count(), 1);
        assert_eq!(b.use_count(), 2);
        assert!(SharedPtr::ptr_eq(&b, &a2));
    }

    /// Invariant: mutable access and unwrapping are only granted to a sole owner.
    #[test]
    fn unique_owner_gets_mut_and_unwrap() {
        let mut a = SharedPtr::new(vec![1, 2]);
        a.get_mut().expect("unique").push(3);

        let b = a.clone();
        assert!(a.get_mut().is_none());
        let a = match SharedPtr::try_unwrap(a) {
            Err(a) => a,
            Ok(_) => panic!("unwrap must fail while shared"),
        };
        drop(b);
        assert_eq!(SharedPtr::try_unwrap(a).ok(), Some(vec![1, 2, 3]));
    }

    /// Invariant: `try_unwrap` hands the value out without running its destructor.
    #[test]
    fn try_unwrap_does_not_drop_target() {
        let (drops, t) = tracked();
        let p = SharedPtr::new(t);
        let t = SharedPtr::try_unwrap(p).ok().expect("sole owner");
        assert_eq!(drops.get(), 0);
        drop(t);
        assert_eq!(drops.get(), 1);
    }

    /// Invariant: adopting a raw Box pointer takes ownership; a null raw pointer
    /// yields a null SharedPtr.
    #[test]
    fn from_raw_adopts_or_is_null() {
        let (drops, t) = tracked();
        let raw = Box::into_raw(Box::new(t));
        let p = unsafe { SharedPtr::from_raw(raw) };
        assert_eq!(p.use_count(), 1);
        assert_eq!(p.as_ptr(), raw as *const _);
        drop(p);
        assert_eq!(drops.get(), 1);

        let q: SharedPtr<Tracked> = unsafe { SharedPtr::from_raw(core::ptr::null_mut()) };
        assert!(q.is_null());
    }

    /// Invariant: dereferencing a null pointer through Deref fails fast.
    #[test]
    #[should_panic(expected = "dereferenced a null SharedPtr")]
    fn deref_null_panics() {
        let p: SharedPtr<u8> = SharedPtr::default();
        let _v: u8 = *p;
    }

    /// Invariant: Debug shows the target and count, or `null`.
    #[test]
    fn debug_formats_target_and_count() {
        let p = SharedPtr::new(5);
        let _q = p.clone();
        assert_eq!(format!("{:?}", p), "SharedPtr { target: 5, use_count: 2 }");
        let n: SharedPtr<i32> = SharedPtr::null();
        assert_eq!(format!("{:?}", n), "SharedPtr(null)");
    }
}
