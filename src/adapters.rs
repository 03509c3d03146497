//! Stack and Queue adapters over any [`Sequence`].
//!
//! Both are thin wrappers that only forward to the underlying container;
//! all invariants belong to that container.

use crate::dynamic_array::DynamicArray;
use crate::error::{Error, Result};
use crate::linked_list::LinkedList;
use core::marker::PhantomData;

/// The end operations a container must offer to back an adapter.
pub trait Sequence {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_back(&mut self, value: Self::Item);
    fn pop_back(&mut self) -> Result<Self::Item>;
    fn pop_front(&mut self) -> Result<Self::Item>;
    fn front(&self) -> Result<&Self::Item>;
    fn back(&self) -> Result<&Self::Item>;
    fn back_mut(&mut self) -> Result<&mut Self::Item>;
}

impl<T> Sequence for DynamicArray<T> {
    type Item = T;

    fn len(&self) -> usize {
        DynamicArray::len(self)
    }

    fn push_back(&mut self, value: T) {
        DynamicArray::push_back(self, value)
    }

    fn pop_back(&mut self) -> Result<T> {
        DynamicArray::pop_back(self)
    }

    /// Shifts every remaining element down by one.
    fn pop_front(&mut self) -> Result<T> {
        if DynamicArray::is_empty(self) {
            return Err(Error::Empty);
        }
        self.remove(0)
    }

    fn front(&self) -> Result<&T> {
        DynamicArray::front(self)
    }

    fn back(&self) -> Result<&T> {
        DynamicArray::back(self)
    }

    fn back_mut(&mut self) -> Result<&mut T> {
        match DynamicArray::len(self) {
            0 => Err(Error::Empty),
            n => self.at_mut(n - 1),
        }
    }
}

impl<T> Sequence for LinkedList<T> {
    type Item = T;

    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    fn push_back(&mut self, value: T) {
        LinkedList::push_back(self, value)
    }

    fn pop_back(&mut self) -> Result<T> {
        LinkedList::pop_back(self)
    }

    fn pop_front(&mut self) -> Result<T> {
        LinkedList::pop_front(self)
    }

    fn front(&self) -> Result<&T> {
        LinkedList::front(self)
    }

    fn back(&self) -> Result<&T> {
        LinkedList::back(self)
    }

    fn back_mut(&mut self) -> Result<&mut T> {
        LinkedList::back_mut(self)
    }
}

/// LIFO adapter; the top is the back of the sequence.
#[derive(Debug, Clone)]
pub struct Stack<T, C = DynamicArray<T>> {
    seq: C,
    _item: PhantomData<fn() -> T>,
}

impl<T, C: Sequence<Item = T> + Default> Stack<T, C> {
    pub fn new() -> Self {
        Self::from_sequence(C::default())
    }
}

impl<T, C: Sequence<Item = T> + Default> Default for Stack<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Sequence<Item = T>> Stack<T, C> {
    /// Adopt an existing sequence; its back becomes the top.
    pub fn from_sequence(seq: C) -> Self {
        Stack {
            seq,
            _item: PhantomData,
        }
    }

    pub fn into_inner(self) -> C {
        self.seq
    }

    pub fn push(&mut self, value: T) {
        self.seq.push_back(value)
    }

    pub fn pop(&mut self) -> Result<T> {
        self.seq.pop_back()
    }

    pub fn top(&self) -> Result<&T> {
        self.seq.back()
    }

    pub fn top_mut(&mut self) -> Result<&mut T> {
        self.seq.back_mut()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// FIFO adapter; pushes at the back, pops from the front.
#[derive(Debug, Clone)]
pub struct Queue<T, C = LinkedList<T>> {
    seq: C,
    _item: PhantomData<fn() -> T>,
}

impl<T, C: Sequence<Item = T> + Default> Queue<T, C> {
    pub fn new() -> Self {
        Self::from_sequence(C::default())
    }
}

impl<T, C: Sequence<Item = T> + Default> Default for Queue<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Sequence<Item = T>> Queue<T, C> {
    pub fn from_sequence(seq: C) -> Self {
        Queue {
            seq,
            _item: PhantomData,
        }
    }

    pub fn into_inner(self) -> C {
        self.seq
    }

    pub fn push(&mut self, value: T) {
        self.seq.push_back(value)
    }

    pub fn pop(&mut self) -> Result<T> {
        self.seq.pop_front()
    }

    pub fn front(&self) -> Result<&T> {
        self.seq.front()
    }

    pub fn back(&self) -> Result<&T> {
        self.seq.back()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}
