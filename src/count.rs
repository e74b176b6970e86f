//! Single-threaded strong counter backing `SharedPtr`.
//!
//! The counter lives in its own heap cell, separate from the object it
//! tracks. Every pointer in one ownership group holds the address of the
//! same `StrongCount`.

use core::cell::Cell;
use core::marker::PhantomData;

/// Non-atomic strong reference count.
#[derive(Debug)]
pub(crate) struct StrongCount {
    count: Cell<usize>,
    // !Send + !Sync like Rc
    _nosend: PhantomData<*mut ()>,
}

impl StrongCount {
    pub(crate) fn new(initial: usize) -> Self {
        Self {
            count: Cell::new(initial),
            _nosend: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> usize {
        self.count.get()
    }

    /// Register one more owner.
    #[inline]
    pub(crate) fn acquire(&self) {
        let n = self.count.get().wrapping_add(1);
        self.count.set(n);
        if n == 0 {
            // Follow Rc semantics: abort on overflow rather than continue unsafely.
            std::process::abort();
        }
    }

    /// Drop one owner. Returns true if the count is now zero.
    #[inline]
    pub(crate) fn release(&self) -> bool {
        let c = self.count.get();
        assert!(c > 0, "StrongCount underflow");
        let n = c - 1;
        self.count.set(n);
        n == 0
    }
}
