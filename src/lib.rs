//! handmade-collections: single-threaded containers built on explicit
//! ownership: a growable array, a shared owning pointer and a chained
//! hash set.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: hand-built containers whose ownership, growth and unwind
//!   behavior are each pinned down by a small, checkable contract.
//! - Components (independent of each other):
//!   - Vector<T>: contiguous buffer in `RawBuf<T>` with `len` live
//!     elements. Growth doubles (minimum 1 slot); `reserve` and
//!     `resize` past capacity allocate exactly. Random-access cursors
//!     (`Cursor`, `RevCursor`, `CursorMut`, `RevCursorMut`) borrow the
//!     live elements.
//!   - SharedPtr<T>: one heap object plus one out-of-band `StrongCount`
//!     shared by every clone; the last owner frees both.
//!   - UnorderedSet<K, S>: separate chaining over a bucket table, with
//!     entries in a `SlotMap`; doubles the table whenever the load
//!     factor reaches 1.
//!
//! Constraints
//! - Single-threaded: `SharedPtr` is `!Send`/`!Sync` (no atomics). The
//!   vector and set have no interior mutability and are `Send` when
//!   their elements are.
//! - Every growth path is one allocate, fill, move, swap step. User code
//!   (`Clone`, `Default`, closures) only runs while filling fresh slots,
//!   under a guard that drops partial work on unwind. A panic therefore
//!   leaves the container exactly as it was.
//! - Set entries keep their precomputed `u64` hash; rehashing relinks
//!   nodes and never calls `K: Hash` or `K: Eq`.
//!
//! Error policy
//! - Checked access (`Vector::at`) returns `Result<_, IndexError>`.
//! - `Index` on a vector panics out of range; `get_unchecked` is the
//!   unchecked `unsafe` path. Dereferencing a null `SharedPtr` panics;
//!   `SharedPtr::get` is the checked path.
//! - Strong-count overflow aborts, matching `Rc`.
//!
//! Logging
//! - `tracing` events at trace level on buffer reallocation/release,
//!   set rehash and final shared-pointer release. No subscriber is
//!   installed by the library.
//!
//! Notes and non-goals
//! - No allocator customization, no weak pointers.
//! - Cursors are invalidated by mutation; the borrow checker enforces
//!   this statically, so there is no runtime checking.
//! - `resize_default` fills new slots with `T::default()` both when it
//!   reallocates and when it grows within capacity.
//! - Collecting into an `UnorderedSet` sizes the table to the number of
//!   source items (duplicates included) but stores each key once.

mod count;
mod cursor;
pub mod error;
mod raw_buf;
pub mod shared_ptr;
pub mod unordered_set;
mod unordered_set_proptest;
pub mod vector;

// Public surface
pub use cursor::{Cursor, CursorIter, CursorMut, RevCursor, RevCursorMut};
pub use error::IndexError;
pub use shared_ptr::SharedPtr;
pub use unordered_set::UnorderedSet;
pub use vector::{IntoIter, Iter, IterMut, Vector};
