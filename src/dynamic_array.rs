//! DynamicArray: contiguous, owning, growable storage.
//!
//! The buffer is a boxed slice of possibly-uninitialized slots; slots
//! `[0, len)` are always initialized. All raw-pointer work (moving the live
//! prefix on reallocation, shifting on insert/erase) is confined to this
//! file.
//!
//! Reallocation happens in `reserve`, `shrink_to_fit`, and in any insertion
//! that crosses the [`GrowthPolicy`] threshold. It moves every element to a
//! new buffer, so no borrow into the array may survive it; the borrow checker
//! enforces this. Positions are plain indices and keep their meaning as
//! indices across reallocation.

use crate::config::GrowthPolicy;
use crate::cursor::{ConstView, Cursor, CursorMut, ReverseView, Walk};
use crate::error::{Error, Result};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};
use core::ops::{Add, Index, IndexMut, Sub};
use core::ptr;
use core::slice;
use log::trace;

fn allocate<T>(capacity: usize) -> Box<[MaybeUninit<T>]> {
    core::iter::repeat_with(MaybeUninit::uninit)
        .take(capacity)
        .collect()
}

/// Native cursor of [`DynamicArray`]: an index into the live range.
///
/// `end()` is the index `len`. Stepping before index 0 wraps to a
/// before-begin position that reads as `None`, so reverse views built from
/// `begin()` terminate correctly.
pub struct ArrayPos<T> {
    index: usize,
    _pd: PhantomData<fn() -> T>,
}

impl<T> ArrayPos<T> {
    #[inline]
    pub(crate) fn at(index: usize) -> Self {
        ArrayPos {
            index,
            _pd: PhantomData,
        }
    }

    pub fn index(self) -> usize {
        self.index
    }
}

impl<T> Clone for ArrayPos<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayPos<T> {}

impl<T> PartialEq for ArrayPos<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for ArrayPos<T> {}

impl<T> PartialOrd for ArrayPos<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ArrayPos<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for ArrayPos<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for ArrayPos<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArrayPos").field(&self.index).finish()
    }
}

impl<T> Add<usize> for ArrayPos<T> {
    type Output = Self;
    fn add(self, rhs: usize) -> Self {
        ArrayPos::at(self.index.wrapping_add(rhs))
    }
}

impl<T> Sub<usize> for ArrayPos<T> {
    type Output = Self;
    fn sub(self, rhs: usize) -> Self {
        ArrayPos::at(self.index.wrapping_sub(rhs))
    }
}

impl<T> Cursor for ArrayPos<T> {
    type Seq = DynamicArray<T>;
    type Item = T;

    #[inline]
    fn get<'a>(&self, seq: &'a DynamicArray<T>) -> Option<&'a T> {
        seq.get(self.index)
    }

    #[inline]
    fn move_next(&mut self, _seq: &DynamicArray<T>) {
        self.index = self.index.wrapping_add(1);
    }

    #[inline]
    fn move_prev(&mut self, _seq: &DynamicArray<T>) {
        self.index = self.index.wrapping_sub(1);
    }
}

impl<T> CursorMut for ArrayPos<T> {
    #[inline]
    fn get_mut<'a>(&self, seq: &'a mut DynamicArray<T>) -> Option<&'a mut T> {
        seq.get_mut(self.index)
    }
}

pub type Iter<'a, T> = Walk<'a, ArrayPos<T>>;

pub struct DynamicArray<T> {
    buf: Box<[MaybeUninit<T>]>,
    len: usize,
    policy: GrowthPolicy,
}

impl<T> DynamicArray<T> {
    /// Empty array with the default policy (capacity 10, 1.5x at 80% fill).
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            buf: allocate(policy.initial_capacity()),
            len: 0,
            policy,
        }
    }

    /// Empty array with exactly `capacity` slots and the default policy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: allocate(capacity),
            len: 0,
            policy: GrowthPolicy::default(),
        }
    }

    /// `n` clones of `value`, in a buffer of exactly `n` slots.
    pub fn filled(n: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut a = Self::with_capacity(n);
        a.resize(n, value);
        a
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
        self.buf.len()
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are initialized.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().cast::<T>(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots [0, len) are initialized.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr().cast::<T>(), self.len) }
    }

    /// Ensure `capacity() >= n`. Reallocates (moving every element) only
    /// when the current buffer is too small.
    pub fn reserve(&mut self, n: usize) {
        if n <= self.capacity() {
            return;
        }
        self.reallocate(n);
    }

    /// Drop unused capacity.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() > self.len {
            self.reallocate(self.len);
        }
    }

    fn reallocate(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.len);
        trace!(
            "dynamic array reallocating {} -> {} slots ({} live)",
            self.capacity(),
            new_capacity,
            self.len
        );
        let mut fresh = allocate::<T>(new_capacity);
        // SAFETY: both buffers hold at least `len` slots and do not overlap.
        // The old slots are treated as moved-from; dropping a boxed slice of
        // MaybeUninit never drops the values.
        unsafe {
            ptr::copy_nonoverlapping(self.buf.as_ptr(), fresh.as_mut_ptr(), self.len);
        }
        self.buf = fresh;
    }

    fn grow_for_insert(&mut self) {
        let capacity = self.capacity();
        if self.policy.should_grow(self.len, capacity) {
            let target = self.policy.grown_capacity(capacity, self.len + 1);
            self.reserve(target);
        }
    }

    /// Append `value`, growing first if the policy asks for it.
    pub fn push_back(&mut self, value: T) {
        self.grow_for_insert();
        self.buf[self.len].write(value);
        self.len += 1;
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(Error::Empty);
        }
        self.len -= 1;
        // SAFETY: slot `len` was initialized and is now outside the live range.
        Ok(unsafe { self.buf[self.len].assume_init_read() })
    }

    /// Insert `value` before `pos`; `pos == end()` appends. Returns the
    /// position of the inserted element. O(n).
    pub fn insert(&mut self, pos: ArrayPos<T>, value: T) -> Result<ArrayPos<T>> {
        let index = pos.index;
        if index > self.len {
            return Err(Error::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.grow_for_insert();
        // SAFETY: capacity > len after growth, so shifting [index, len) one
        // slot right stays in bounds; slot `index` is then overwritten.
        unsafe {
            let p = self.buf.as_mut_ptr().cast::<T>().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            ptr::write(p, value);
        }
        self.len += 1;
        Ok(ArrayPos::at(index))
    }

    /// Remove the element at `pos`, shifting the tail left. Returns the
    /// position now holding the element that followed. O(n).
    pub fn erase(&mut self, pos: ArrayPos<T>) -> Result<ArrayPos<T>> {
        self.remove(pos.index)?;
        Ok(pos)
    }

    /// Remove and return the element at `index`. O(n).
    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(Error::OutOfRange {
                index,
                len: self.len,
            });
        }
        // SAFETY: index < len; after the read the slot is a hole that the
        // shift of (index, len) fills.
        let value = unsafe {
            let p = self.buf.as_mut_ptr().cast::<T>().add(index);
            let value = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - index - 1);
            value
        };
        self.len -= 1;
        Ok(value)
    }

    /// Drop elements past `n`; no-op when `n >= len`. Capacity is kept.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len {
            return;
        }
        let tail = self.len - n;
        self.len = n;
        // SAFETY: [n, n + tail) were live and are no longer reachable.
        unsafe {
            let p = self.buf.as_mut_ptr().cast::<T>().add(n);
            ptr::drop_in_place(slice::from_raw_parts_mut(p, tail));
        }
    }

    /// Shrink to `n` elements, or grow to `n` by appending clones of `value`.
    pub fn resize(&mut self, n: usize, value: T)
    where
        T: Clone,
    {
        if n < self.len {
            self.truncate(n);
            return;
        }
        self.reserve(n);
        while self.len < n {
            self.buf[self.len].write(value.clone());
            self.len += 1;
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Checked access reporting the index and length on failure.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.get(index).ok_or(Error::OutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    pub fn front(&self) -> Result<&T> {
        self.as_slice().first().ok_or(Error::Empty)
    }

    pub fn back(&self) -> Result<&T> {
        self.as_slice().last().ok_or(Error::Empty)
    }

    pub fn begin(&self) -> ArrayPos<T> {
        ArrayPos::at(0)
    }

    pub fn end(&self) -> ArrayPos<T> {
        ArrayPos::at(self.len)
    }

    pub fn cbegin(&self) -> ConstView<ArrayPos<T>> {
        ConstView::new(self.begin())
    }

    pub fn cend(&self) -> ConstView<ArrayPos<T>> {
        ConstView::new(self.end())
    }

    pub fn rbegin(&self) -> ReverseView<ArrayPos<T>> {
        ReverseView::new(self.end())
    }

    pub fn rend(&self) -> ReverseView<ArrayPos<T>> {
        ReverseView::new(self.begin())
    }

    pub fn crbegin(&self) -> ConstView<ReverseView<ArrayPos<T>>> {
        ConstView::new(self.rbegin())
    }

    pub fn crend(&self) -> ConstView<ReverseView<ArrayPos<T>>> {
        ConstView::new(self.rend())
    }

    /// Walk `begin()..end()`. Double-ended, so `.rev()` walks backwards.
    pub fn iter(&self) -> Iter<'_, T> {
        Walk::new(self, self.begin(), self.end())
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: drops exactly the live prefix; the slots themselves are
        // released by the boxed slice.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let mut out = DynamicArray {
            buf: allocate(self.capacity()),
            len: 0,
            policy: self.policy,
        };
        for v in self.as_slice() {
            out.buf[out.len].write(v.clone());
            out.len += 1;
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Some(target) = self.len.checked_add(lower) {
            self.reserve(target);
        }
        for v in iter {
            self.push_back(v);
        }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut a = Self::new();
        a.extend(iter);
        a
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T> From<Vec<T>> for DynamicArray<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Owning iterator; unconsumed elements are dropped with it.
pub struct IntoIter<T> {
    buf: Box<[MaybeUninit<T>]>,
    front: usize,
    back: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: [front, back) are initialized and each is read once.
        let v = unsafe { self.buf[self.front].assume_init_read() };
        self.front += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { self.buf[self.back].assume_init_read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        for slot in &mut self.buf[self.front..self.back] {
            // SAFETY: the remaining range was never read out.
            unsafe { slot.assume_init_drop() };
        }
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(mut self) -> IntoIter<T> {
        let back = mem::replace(&mut self.len, 0);
        let buf = mem::take(&mut self.buf);
        IntoIter { buf, front: 0, back }
    }
}

/// Build a [`DynamicArray`] from a literal list, or `n` copies of a value.
#[macro_export]
macro_rules! dynamic_array {
    () => {
        $crate::DynamicArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynamicArray::filled($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynamicArray::from([$($x),+])
    };
}
