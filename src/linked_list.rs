//! LinkedList: doubly-linked list anchored by a data-less sentinel.
//!
//! Nodes live in a `SlotMap` arena and link to each other through
//! generational keys, so the list is the single owner of every node and a
//! position that outlives its node can never alias a newer one.
//!
//! Topology: the sentinel and the nodes form a ring. A link that is `None`
//! points at the sentinel: the head's `prev`, the tail's `next`, and both
//! sentinel links when the list is empty. [`ListPos`] uses the same
//! encoding, so `end()` *is* the sentinel; stepping back from `end()` lands
//! on the tail and stepping forward from it lands on the head.
//!
//! Every insertion allocates its node before touching any link, so a failed
//! allocation leaves the list as it was.
//!
//! Each list draws a process-unique id at construction and stamps it into
//! the positions it hands out. Slot keys of two lists can coincide, so a
//! position is only resolved against the list whose id it carries; anywhere
//! else it reads as `None` and is rejected with `InvalidPosition`.

use crate::cursor::{ConstView, Cursor, CursorMut, ReverseView, Walk};
use crate::error::{Error, Result};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::mem;
use core::sync::atomic::{AtomicU64, Ordering};
use slotmap::{new_key_type, SecondaryMap, SlotMap};

new_key_type! {
    struct NodeKey;
}

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

fn next_list_id() -> u64 {
    NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    next: Option<NodeKey>,
    prev: Option<NodeKey>,
}

/// The permanent anchor: `next` is the head, `prev` the tail.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Sentinel {
    next: Option<NodeKey>,
    prev: Option<NodeKey>,
}

/// Native cursor of [`LinkedList`]: a node, or the sentinel (`end()`), of
/// one particular list.
pub struct ListPos<T> {
    owner: u64,
    node: Option<NodeKey>,
    _pd: PhantomData<fn() -> T>,
}

impl<T> ListPos<T> {
    #[inline]
    fn new(owner: u64, node: Option<NodeKey>) -> Self {
        ListPos {
            owner,
            node,
            _pd: PhantomData,
        }
    }

    #[inline]
    fn belongs_to(self, list: &LinkedList<T>) -> bool {
        self.owner == list.id
    }

    /// Whether this is the end marker.
    pub fn is_end(self) -> bool {
        self.node.is_none()
    }
}

impl<T> Clone for ListPos<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListPos<T> {}

impl<T> PartialEq for ListPos<T> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.node == other.node
    }
}

impl<T> Eq for ListPos<T> {}

impl<T> Hash for ListPos<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.node.hash(state);
    }
}

impl<T> fmt::Debug for ListPos<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(k) => f.debug_tuple("ListPos").field(&k).finish(),
            None => f.write_str("ListPos(end)"),
        }
    }
}

impl<T> Cursor for ListPos<T> {
    type Seq = LinkedList<T>;
    type Item = T;

    #[inline]
    fn get<'a>(&self, seq: &'a LinkedList<T>) -> Option<&'a T> {
        if !self.belongs_to(seq) {
            return None;
        }
        self.node
            .and_then(|k| seq.nodes.get(k))
            .map(|n| &n.value)
    }

    /// A stale node steps to `end()`; a position of another list does not
    /// move.
    #[inline]
    fn move_next(&mut self, seq: &LinkedList<T>) {
        if !self.belongs_to(seq) {
            return;
        }
        self.node = match self.node {
            Some(k) => seq.nodes.get(k).and_then(|n| n.next),
            None => seq.sentinel.next,
        };
    }

    #[inline]
    fn move_prev(&mut self, seq: &LinkedList<T>) {
        if !self.belongs_to(seq) {
            return;
        }
        self.node = match self.node {
            Some(k) => seq.nodes.get(k).and_then(|n| n.prev),
            None => seq.sentinel.prev,
        };
    }
}

impl<T> CursorMut for ListPos<T> {
    #[inline]
    fn get_mut<'a>(&self, seq: &'a mut LinkedList<T>) -> Option<&'a mut T> {
        if !self.belongs_to(seq) {
            return None;
        }
        self.node
            .and_then(|k| seq.nodes.get_mut(k))
            .map(|n| &mut n.value)
    }
}

pub type Iter<'a, T> = Walk<'a, ListPos<T>>;

pub struct LinkedList<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    sentinel: Sentinel,
    id: u64,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            sentinel: Sentinel::default(),
            id: next_list_id(),
        }
    }

    /// `n` clones of `value`.
    pub fn filled(n: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut l = Self::new();
        for _ in 0..n {
            l.push_back(value.clone());
        }
        l
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // The link slot named by `at`, where `None` is the sentinel.
    fn next_link(&mut self, at: Option<NodeKey>) -> &mut Option<NodeKey> {
        match at {
            Some(k) => &mut self.nodes[k].next,
            None => &mut self.sentinel.next,
        }
    }

    fn prev_link(&mut self, at: Option<NodeKey>) -> &mut Option<NodeKey> {
        match at {
            Some(k) => &mut self.nodes[k].prev,
            None => &mut self.sentinel.prev,
        }
    }

    fn prev_of(&self, at: Option<NodeKey>) -> Option<NodeKey> {
        match at {
            Some(k) => self.nodes[k].prev,
            None => self.sentinel.prev,
        }
    }

    // Allocate first, then relink: prev.next, node.{prev,next}, next.prev.
    fn link_before(&mut self, at: Option<NodeKey>, value: T) -> NodeKey {
        let prev = self.prev_of(at);
        let key = self.nodes.insert(Node {
            value,
            next: at,
            prev,
        });
        *self.next_link(prev) = Some(key);
        *self.prev_link(at) = Some(key);
        key
    }

    // Returns the removed value and the key that followed it.
    fn unlink(&mut self, key: NodeKey) -> Option<(T, Option<NodeKey>)> {
        let Node { value, next, prev } = self.nodes.remove(key)?;
        *self.next_link(prev) = next;
        *self.prev_link(next) = prev;
        Some((value, next))
    }

    fn live(&self, pos: ListPos<T>) -> Result<NodeKey> {
        match pos.node {
            Some(k) if pos.belongs_to(self) && self.nodes.contains_key(k) => Ok(k),
            _ => Err(Error::InvalidPosition),
        }
    }

    pub fn push_back(&mut self, value: T) {
        self.link_before(None, value);
    }

    pub fn push_front(&mut self, value: T) {
        let head = self.sentinel.next;
        self.link_before(head, value);
    }

    pub fn pop_back(&mut self) -> Result<T> {
        let tail = self.sentinel.prev.ok_or(Error::Empty)?;
        self.unlink(tail).map(|(v, _)| v).ok_or(Error::Empty)
    }

    pub fn pop_front(&mut self) -> Result<T> {
        let head = self.sentinel.next.ok_or(Error::Empty)?;
        self.unlink(head).map(|(v, _)| v).ok_or(Error::Empty)
    }

    /// Insert before `pos` (`end()` appends) and return the new element's
    /// position. Fails on a stale position or one from another list.
    pub fn insert(&mut self, pos: ListPos<T>, value: T) -> Result<ListPos<T>> {
        let at = match pos.node {
            None if pos.belongs_to(self) => None,
            _ => Some(self.live(pos)?),
        };
        let key = self.link_before(at, value);
        Ok(ListPos::new(self.id, Some(key)))
    }

    /// Remove the element at `pos`; returns the position that followed it.
    pub fn erase(&mut self, pos: ListPos<T>) -> Result<ListPos<T>> {
        let key = self.live(pos)?;
        let (_, next) = self.unlink(key).ok_or(Error::InvalidPosition)?;
        Ok(ListPos::new(self.id, next))
    }

    /// Remove the element at `pos` and return it.
    pub fn remove(&mut self, pos: ListPos<T>) -> Result<T> {
        let key = self.live(pos)?;
        self.unlink(key)
            .map(|(v, _)| v)
            .ok_or(Error::InvalidPosition)
    }

    pub fn front(&self) -> Result<&T> {
        self.sentinel
            .next
            .map(|k| &self.nodes[k].value)
            .ok_or(Error::Empty)
    }

    pub fn front_mut(&mut self) -> Result<&mut T> {
        match self.sentinel.next {
            Some(k) => Ok(&mut self.nodes[k].value),
            None => Err(Error::Empty),
        }
    }

    pub fn back(&self) -> Result<&T> {
        self.sentinel
            .prev
            .map(|k| &self.nodes[k].value)
            .ok_or(Error::Empty)
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        match self.sentinel.prev {
            Some(k) => Ok(&mut self.nodes[k].value),
            None => Err(Error::Empty),
        }
    }

    /// Position of the `index`-th element, walking from the head. O(n).
    pub fn position(&self, index: usize) -> Result<ListPos<T>> {
        if index >= self.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.len(),
            });
        }
        let mut pos = self.begin();
        for _ in 0..index {
            pos.move_next(self);
        }
        Ok(pos)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.at(index).ok()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.at_mut(index).ok()
    }

    /// Checked O(n) indexed access.
    pub fn at(&self, index: usize) -> Result<&T> {
        let pos = self.position(index)?;
        pos.get(self).ok_or(Error::InvalidPosition)
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let pos = self.position(index)?;
        pos.get_mut(self).ok_or(Error::InvalidPosition)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Drop every element. Positions handed out before stay invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.sentinel = Sentinel::default();
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    pub fn begin(&self) -> ListPos<T> {
        ListPos::new(self.id, self.sentinel.next)
    }

    pub fn end(&self) -> ListPos<T> {
        ListPos::new(self.id, None)
    }

    pub fn cbegin(&self) -> ConstView<ListPos<T>> {
        ConstView::new(self.begin())
    }

    pub fn cend(&self) -> ConstView<ListPos<T>> {
        ConstView::new(self.end())
    }

    pub fn rbegin(&self) -> ReverseView<ListPos<T>> {
        ReverseView::new(self.end())
    }

    pub fn rend(&self) -> ReverseView<ListPos<T>> {
        ReverseView::new(self.begin())
    }

    pub fn crbegin(&self) -> ConstView<ReverseView<ListPos<T>>> {
        ConstView::new(self.rbegin())
    }

    pub fn crend(&self) -> ConstView<ReverseView<ListPos<T>>> {
        ConstView::new(self.rend())
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Walk::new(self, self.begin(), self.end())
    }

    /// Mutable iteration in list order.
    ///
    /// The arena hands out disjoint `&mut` borrows only in slot order, so
    /// this ranks the nodes by list order first and buffers one reference
    /// per element: O(n) extra memory per call.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let mut rank: SecondaryMap<NodeKey, usize> = SecondaryMap::with_capacity(self.len());
        let mut pos = self.begin();
        let mut i = 0;
        while let Some(k) = pos.node {
            rank.insert(k, i);
            i += 1;
            pos.move_next(self);
        }
        let mut ordered: Vec<Option<&mut T>> = Vec::with_capacity(i);
        ordered.resize_with(i, || None);
        for (k, node) in self.nodes.iter_mut() {
            if let Some(&r) = rank.get(k) {
                ordered[r] = Some(&mut node.value);
            }
        }
        IterMut {
            inner: ordered.into_iter(),
        }
    }

    #[cfg(test)]
    pub(crate) fn check_links(&self) {
        let mut count = 0;
        let mut prev = None;
        let mut cur = self.sentinel.next;
        while let Some(k) = cur {
            let node = &self.nodes[k];
            assert_eq!(node.prev, prev, "prev link mismatch");
            prev = cur;
            cur = node.next;
            count += 1;
            assert!(count <= self.len(), "cycle through nodes");
        }
        assert_eq!(count, self.len());
        assert_eq!(self.sentinel.prev, prev, "sentinel tail mismatch");
        assert_eq!(self.sentinel.next.is_none(), self.sentinel.prev.is_none());
    }
}

pub struct IterMut<'a, T> {
    inner: std::vec::IntoIter<Option<&'a mut T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next().flatten()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.inner.next_back().flatten()
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T> core::ops::Index<usize> for LinkedList<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> core::ops::IndexMut<usize> for LinkedList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push_back(v);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut l = Self::new();
        l.extend(iter);
        l
    }
}

impl<T, const N: usize> From<[T; N]> for LinkedList<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T> From<Vec<T>> for LinkedList<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Owning iterator popping from either end.
pub struct IntoIter<T> {
    list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

/// Build a [`LinkedList`] from a literal list, or `n` copies of a value.
#[macro_export]
macro_rules! linked_list {
    () => {
        $crate::LinkedList::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::LinkedList::filled($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::LinkedList::from([$($x),+])
    };
}
