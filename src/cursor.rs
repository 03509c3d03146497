//! Cursor capabilities and the views derived from them.
//!
//! Every container defines exactly one native cursor: a small `Copy`
//! position that knows how to step forward and backward through its
//! container and how to read the element it names. Cursors never borrow the
//! container; reads and steps take the container as an argument, the same
//! way a map handle resolves against its map.
//!
//! From that one cursor, the generic views below produce every other
//! traversal mode without touching the container's linking logic:
//!
//! - [`ConstView<C>`]: same positions, read-only access.
//! - [`ReverseView<C>`]: wraps the position *one past* its target, so the
//!   reverse begin is built from the forward end and the reverse end from the
//!   forward begin.
//! - `ConstView<ReverseView<C>>`: read-only reverse traversal.
//!
//! [`Walk`] adapts any `[first, last)` cursor range into a borrowing
//! `Iterator`, so `for` loops work over every mode.
//!
//! Stepping a cursor past the ends of its range is not an error, but the
//! positions reached there read as `None`.

use core::iter::FusedIterator;

/// A bidirectional position within a sequence `Seq`.
///
/// Equality is position identity: two cursors are equal iff they name the
/// same slot (or are both the end marker) of the same container.
pub trait Cursor: Copy + Eq {
    /// The container this cursor walks.
    type Seq: ?Sized;
    /// The element type yielded on dereference.
    type Item;

    /// Read the element at this position; `None` at the end marker or on a
    /// position that no longer names a live element.
    fn get<'a>(&self, seq: &'a Self::Seq) -> Option<&'a Self::Item>;

    /// Step forward in place.
    fn move_next(&mut self, seq: &Self::Seq);

    /// Step backward in place.
    fn move_prev(&mut self, seq: &Self::Seq);

    /// The position after this one. The receiver is left untouched, which
    /// gives post-increment: `let old = cur; cur = cur.successor(seq);`.
    #[inline]
    fn successor(self, seq: &Self::Seq) -> Self {
        let mut c = self;
        c.move_next(seq);
        c
    }

    /// The position before this one.
    #[inline]
    fn predecessor(self, seq: &Self::Seq) -> Self {
        let mut c = self;
        c.move_prev(seq);
        c
    }
}

/// A cursor that can also hand out mutable access to its element.
pub trait CursorMut: Cursor {
    fn get_mut<'a>(&self, seq: &'a mut Self::Seq) -> Option<&'a mut Self::Item>;
}

/// Read-only view over a cursor. Traversal and equality are those of the
/// wrapped cursor; it never implements [`CursorMut`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstView<C>(C);

impl<C> ConstView<C> {
    pub fn new(inner: C) -> Self {
        ConstView(inner)
    }

    /// The wrapped cursor.
    pub fn base(self) -> C {
        self.0
    }
}

impl<C: Cursor> Cursor for ConstView<C> {
    type Seq = C::Seq;
    type Item = C::Item;

    #[inline]
    fn get<'a>(&self, seq: &'a Self::Seq) -> Option<&'a Self::Item> {
        self.0.get(seq)
    }

    #[inline]
    fn move_next(&mut self, seq: &Self::Seq) {
        self.0.move_next(seq)
    }

    #[inline]
    fn move_prev(&mut self, seq: &Self::Seq) {
        self.0.move_prev(seq)
    }
}

/// Reverse traversal over a cursor.
///
/// The wrapped cursor sits one past the element this view reads: reading
/// copies the inner cursor, steps the copy back once and reads there.
/// Stepping forward steps the inner cursor back and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReverseView<C>(C);

impl<C> ReverseView<C> {
    pub fn new(inner: C) -> Self {
        ReverseView(inner)
    }

    /// The wrapped forward cursor (one past the element this view reads).
    pub fn base(self) -> C {
        self.0
    }
}

impl<C: Cursor> Cursor for ReverseView<C> {
    type Seq = C::Seq;
    type Item = C::Item;

    #[inline]
    fn get<'a>(&self, seq: &'a Self::Seq) -> Option<&'a Self::Item> {
        self.0.predecessor(seq).get(seq)
    }

    #[inline]
    fn move_next(&mut self, seq: &Self::Seq) {
        self.0.move_prev(seq)
    }

    #[inline]
    fn move_prev(&mut self, seq: &Self::Seq) {
        self.0.move_next(seq)
    }
}

impl<C: CursorMut> CursorMut for ReverseView<C> {
    #[inline]
    fn get_mut<'a>(&self, seq: &'a mut Self::Seq) -> Option<&'a mut Self::Item> {
        let target = self.0.predecessor(seq);
        target.get_mut(seq)
    }
}

/// Borrowing iterator over the cursor range `[front, back)`.
///
/// `next` reads at `front` and then advances it; `next_back` retreats
/// `back` and then reads. Iteration stops once the two meet, or early if a
/// position reads as `None`.
pub struct Walk<'a, C: Cursor> {
    seq: &'a C::Seq,
    front: C,
    back: C,
}

impl<'a, C: Cursor> Walk<'a, C> {
    pub fn new(seq: &'a C::Seq, first: C, last: C) -> Self {
        Walk {
            seq,
            front: first,
            back: last,
        }
    }

    /// Remaining range as a `(first, last)` cursor pair.
    pub fn range(&self) -> (C, C) {
        (self.front, self.back)
    }
}

impl<'a, C: Cursor> Clone for Walk<'a, C> {
    fn clone(&self) -> Self {
        Walk {
            seq: self.seq,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, C: Cursor> Iterator for Walk<'a, C>
where
    C::Item: 'a,
{
    type Item = &'a C::Item;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.front.get(self.seq);
        if item.is_none() {
            self.front = self.back;
            return None;
        }
        self.front.move_next(self.seq);
        item
    }
}

impl<'a, C: Cursor> DoubleEndedIterator for Walk<'a, C>
where
    C::Item: 'a,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back.move_prev(self.seq);
        let item = self.back.get(self.seq);
        if item.is_none() {
            self.back = self.front;
        }
        item
    }
}

impl<'a, C: Cursor> FusedIterator for Walk<'a, C> where C::Item: 'a {}
