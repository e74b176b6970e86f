//! Random-access cursors over a `Vector`'s live elements.
//!
//! A cursor is a position in `[0, len]` plus a borrow of the elements.
//! Forward cursors designate the element at their position; reversed
//! cursors (`REV = true`) designate the element just before it, the same
//! convention as a reverse iterator wrapping a base position. So
//! `rbegin()` and `end()` share a base position, as do `rend()` and
//! `begin()`.
//!
//! Arithmetic is O(1). Moving a cursor outside `[0, len]` panics.
//! Reading past either end yields `None`. Because a cursor borrows the
//! vector, the borrow checker rejects any use after a mutation that could
//! move elements.

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr;

fn step(pos: usize, delta: isize, len: usize) -> usize {
    match pos.checked_add_signed(delta) {
        Some(p) if p <= len => p,
        _ => panic!("cursor moved outside its vector: {} + {} not in 0..={}", pos, delta, len),
    }
}

#[inline]
fn directed(delta: isize, rev: bool) -> isize {
    if rev {
        0isize.saturating_sub(delta)
    } else {
        delta
    }
}

#[inline]
fn element_index(pos: usize, rev: bool) -> Option<usize> {
    if rev {
        pos.checked_sub(1)
    } else {
        Some(pos)
    }
}

/// Read-only random-access cursor. `Copy`, comparable, subtractable.
pub struct Cursor<'a, T, const REV: bool = false> {
    slice: &'a [T],
    pos: usize,
}

/// Read-only cursor walking from the back towards the front.
pub type RevCursor<'a, T> = Cursor<'a, T, true>;

impl<'a, T, const REV: bool> Cursor<'a, T, REV> {
    pub(crate) fn new(slice: &'a [T], pos: usize) -> Self {
        debug_assert!(pos <= slice.len());
        Self { slice, pos }
    }

    /// Base position in `[0, len]`.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The designated element, or `None` at the end of travel.
    pub fn get(&self) -> Option<&'a T> {
        element_index(self.pos, REV).and_then(|i| self.slice.get(i))
    }

    /// Move `delta` steps in this cursor's direction of travel.
    pub fn advance(&mut self, delta: isize) {
        self.pos = step(self.pos, directed(delta, REV), self.slice.len());
    }

    /// Steps from `origin` to `self` in this cursor's direction of travel.
    ///
    /// # Panics
    ///
    /// Panics if the cursors belong to different vectors.
    pub fn distance_from(&self, origin: &Self) -> isize {
        assert!(
            ptr::eq(self.slice, origin.slice),
            "cursors belong to different vectors"
        );
        let d = self.pos as isize - origin.pos as isize;
        directed(d, REV)
    }

    /// True when no element remains in the direction of travel.
    pub fn is_end(&self) -> bool {
        self.get().is_none()
    }

    fn remaining(&self) -> usize {
        if REV {
            self.pos
        } else {
            self.slice.len() - self.pos
        }
    }
}

impl<'a, T, const REV: bool> Clone for Cursor<'a, T, REV> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, const REV: bool> Copy for Cursor<'a, T, REV> {}

impl<'a, T, const REV: bool> fmt::Debug for Cursor<'a, T, REV> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(if REV { "RevCursor" } else { "Cursor" })
            .field("position", &self.pos)
            .field("len", &self.slice.len())
            .finish()
    }
}

impl<'a, T, const REV: bool> PartialEq for Cursor<'a, T, REV> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.slice, other.slice) && self.pos == other.pos
    }
}

impl<'a, T, const REV: bool> Eq for Cursor<'a, T, REV> {}

/// Ordered by direction of travel; cursors over different vectors are
/// unordered.
impl<'a, T, const REV: bool> PartialOrd for Cursor<'a, T, REV> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !ptr::eq(self.slice, other.slice) {
            return None;
        }
        let ord = self.pos.cmp(&other.pos);
        Some(if REV { ord.reverse() } else { ord })
    }
}

impl<'a, T, const REV: bool> Add<isize> for Cursor<'a, T, REV> {
    type Output = Self;
    fn add(mut self, delta: isize) -> Self {
        self.advance(delta);
        self
    }
}

impl<'a, T, const REV: bool> Sub<isize> for Cursor<'a, T, REV> {
    type Output = Self;
    fn sub(mut self, delta: isize) -> Self {
        self.advance(0isize.saturating_sub(delta));
        self
    }
}

impl<'a, T, const REV: bool> AddAssign<isize> for Cursor<'a, T, REV> {
    fn add_assign(&mut self, delta: isize) {
        self.advance(delta);
    }
}

impl<'a, T, const REV: bool> SubAssign<isize> for Cursor<'a, T, REV> {
    fn sub_assign(&mut self, delta: isize) {
        self.advance(0isize.saturating_sub(delta));
    }
}

impl<'a, T, const REV: bool> Sub for Cursor<'a, T, REV> {
    type Output = isize;
    fn sub(self, origin: Self) -> isize {
        self.distance_from(&origin)
    }
}

/// Elements from a cursor to its end of travel, in its direction.
pub struct CursorIter<'a, T, const REV: bool = false> {
    cursor: Cursor<'a, T, REV>,
}

impl<'a, T, const REV: bool> Cursor<'a, T, REV> {
    /// Iterate from this position to the end of travel. The cursor itself
    /// is not an iterator, so `==` and `<` always compare positions.
    pub fn iter(self) -> CursorIter<'a, T, REV> {
        CursorIter { cursor: self }
    }
}

impl<'a, T, const REV: bool> Clone for CursorIter<'a, T, REV> {
    fn clone(&self) -> Self {
        Self { cursor: self.cursor }
    }
}

impl<'a, T, const REV: bool> fmt::Debug for CursorIter<'a, T, REV> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorIter").field(&self.cursor).finish()
    }
}

impl<'a, T, const REV: bool> Iterator for CursorIter<'a, T, REV> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.cursor.get()?;
        self.cursor.advance(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.cursor.remaining();
        (n, Some(n))
    }
}

impl<'a, T, const REV: bool> ExactSizeIterator for CursorIter<'a, T, REV> {}

impl<'a, T, const REV: bool> FusedIterator for CursorIter<'a, T, REV> {}

/// Mutable random-access cursor. Moves like `Cursor` but is not `Copy`.
/// Two live mutable cursors cannot coexist, so distances and ordering go
/// through `position()` or `as_cursor()`.
pub struct CursorMut<'a, T, const REV: bool = false> {
    slice: &'a mut [T],
    pos: usize,
}

/// Mutable cursor walking from the back towards the front.
pub type RevCursorMut<'a, T> = CursorMut<'a, T, true>;

impl<'a, T, const REV: bool> CursorMut<'a, T, REV> {
    pub(crate) fn new(slice: &'a mut [T], pos: usize) -> Self {
        debug_assert!(pos <= slice.len());
        Self { slice, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn get(&self) -> Option<&T> {
        element_index(self.pos, REV).and_then(|i| self.slice.get(i))
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        let i = element_index(self.pos, REV)?;
        self.slice.get_mut(i)
    }

    /// Consume the cursor, keeping the borrow of the designated element.
    pub fn into_mut(self) -> Option<&'a mut T> {
        let i = element_index(self.pos, REV)?;
        let slice = self.slice;
        slice.get_mut(i)
    }

    pub fn advance(&mut self, delta: isize) {
        self.pos = step(self.pos, directed(delta, REV), self.slice.len());
    }

    pub fn is_end(&self) -> bool {
        self.get().is_none()
    }

    /// Read-only view at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T, REV> {
        Cursor::new(&*self.slice, self.pos)
    }
}

impl<'a, T, const REV: bool> fmt::Debug for CursorMut<'a, T, REV> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(if REV { "RevCursorMut" } else { "CursorMut" })
            .field("position", &self.pos)
            .field("len", &self.slice.len())
            .finish()
    }
}

impl<'a, T, const REV: bool> Add<isize> for CursorMut<'a, T, REV> {
    type Output = Self;
    fn add(mut self, delta: isize) -> Self {
        self.advance(delta);
        self
    }
}

impl<'a, T, const REV: bool> Sub<isize> for CursorMut<'a, T, REV> {
    type Output = Self;
    fn sub(mut self, delta: isize) -> Self {
        self.advance(0isize.saturating_sub(delta));
        self
    }
}

impl<'a, T, const REV: bool> AddAssign<isize> for CursorMut<'a, T, REV> {
    fn add_assign(&mut self, delta: isize) {
        self.advance(delta);
    }
}

impl<'a, T, const REV: bool> SubAssign<isize> for CursorMut<'a, T, REV> {
    fn sub_assign(&mut self, delta: isize) {
        self.advance(0isize.saturating_sub(delta));
    }
}
