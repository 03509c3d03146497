#![cfg(test)]

// Property tests for LinkedList kept inside the crate so they can check the
// private link structure after every operation.

use crate::cursor::Cursor;
use crate::error::Error;
use crate::linked_list::{LinkedList, ListPos};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
enum Op {
    PushBack(i32),
    PushFront(i32),
    PopBack,
    PopFront,
    // Indices are reduced modulo the current length (plus one for insert).
    Insert(usize, i32),
    Erase(usize),
    Mutate(usize, i32),
    Reverse,
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        any::<i32>().prop_map(Op::PushBack),
        any::<i32>().prop_map(Op::PushFront),
        Just(Op::PopBack),
        Just(Op::PopFront),
        (0usize..16, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        (0usize..16).prop_map(Op::Erase),
        (0usize..16, any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
        Just(Op::Reverse),
        Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..80)
}

// Property: state-machine equivalence against VecDeque.
// - end operations, positional insert/erase and in-place mutation agree with
//   the model;
// - the link structure (prev/next agreement, sentinel head/tail) is
//   consistent after every operation;
// - the reverse walk is the forward walk reversed;
// - positions of erased nodes never resolve again.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut: LinkedList<i32> = LinkedList::new();
        let mut model: VecDeque<i32> = VecDeque::new();
        let mut stale: Vec<ListPos<i32>> = Vec::new();

        for op in ops {
            match op {
                Op::PushBack(v) => {
                    sut.push_back(v);
                    model.push_back(v);
                }
                Op::PushFront(v) => {
                    sut.push_front(v);
                    model.push_front(v);
                }
                Op::PopBack => {
                    prop_assert_eq!(sut.pop_back().ok(), model.pop_back());
                }
                Op::PopFront => {
                    prop_assert_eq!(sut.pop_front().ok(), model.pop_front());
                }
                Op::Insert(i, v) => {
                    let i = i % (model.len() + 1);
                    let pos = if i == model.len() {
                        sut.end()
                    } else {
                        sut.position(i).expect("index within [0, len)")
                    };
                    let at = sut.insert(pos, v).expect("live position");
                    model.insert(i, v);
                    prop_assert_eq!(at.get(&sut), Some(&v));
                    prop_assert_eq!(at.successor(&sut), pos);
                }
                Op::Erase(i) => {
                    if model.is_empty() {
                        prop_assert_eq!(sut.erase(sut.end()), Err(Error::InvalidPosition));
                    } else {
                        let i = i % model.len();
                        let pos = sut.position(i).expect("index within [0, len)");
                        let next = sut.erase(pos).expect("live position");
                        model.remove(i);
                        prop_assert_eq!(next.get(&sut), model.get(i));
                        stale.push(pos);
                    }
                }
                Op::Mutate(i, d) => {
                    if !model.is_empty() {
                        let i = i % model.len();
                        let v = sut.at_mut(i).expect("index within [0, len)");
                        *v = v.wrapping_add(d);
                        model[i] = model[i].wrapping_add(d);
                    }
                }
                Op::Reverse => {
                    let fwd: Vec<i32> = sut.iter().copied().collect();
                    let mut rev: Vec<i32> = sut.iter().rev().copied().collect();
                    rev.reverse();
                    prop_assert_eq!(fwd, rev);
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            sut.check_links();
            for pos in &stale {
                prop_assert!(pos.get(&sut).is_none());
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert!(sut.iter().eq(model.iter()));
        }
    }
}
