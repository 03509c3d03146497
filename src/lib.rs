//! cursor-collections: generic containers (a growable array, a
//! sentinel-anchored doubly-linked list, a separate-chaining hash table)
//! whose const and reverse traversals are all derived from one native
//! cursor per container.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: write the linking/indexing logic of each container exactly
//!   once and obtain every other traversal mode by composition.
//! - Layers:
//!   - `cursor`: the `Cursor`/`CursorMut` capability traits, the
//!     `ConstView` and `ReverseView` adapters, and `Walk`, which turns a
//!     `[first, last)` cursor range into a borrowing iterator.
//!   - `DynamicArray<T>`: contiguous buffer with a `GrowthPolicy`; native
//!     cursor `ArrayPos<T>` (an index).
//!   - `LinkedList<T>`: nodes in a `slotmap` arena, linked by generational
//!     keys around a data-less sentinel; native cursor `ListPos<T>`.
//!   - `HashTable<V, P, S>`: separate chaining over boxed chains; keys are
//!     projected from stored values by `P: KeyOf<V>`.
//!   - `Stack`/`Queue`: thin adapters over any `Sequence`.
//!
//! Positions
//! - Cursors are small `Copy` values that never borrow their container.
//!   Reads and steps take the container as an argument
//!   (`pos.get(&list)`, `pos.get_mut(&mut list)`), so a position can be
//!   held across mutations and simply re-resolved afterwards.
//! - A position that no longer names a live element reads as `None`:
//!   array positions are bounds-checked; list positions carry a
//!   generational key, so a freed and reused node slot is not confused
//!   with the node that used to live there.
//! - The end position of a list *is* the sentinel. Stepping forward from
//!   the tail reaches it and stepping back from it reaches the tail, which
//!   is what lets a reverse view be built from `end()`.
//!
//! Reverse views
//! - `ReverseView<C>` holds the forward cursor one past the element it
//!   reads. `rbegin()` wraps `end()` and `rend()` wraps `begin()`; reading
//!   steps a copy back once. No container implements reverse traversal
//!   itself.
//!
//! Growth and hashing
//! - The array grows before an insertion that would fill it to the
//!   policy's threshold (default: 80% full, factor 1.5, initial capacity
//!   10). Every reallocation is logged at `trace` level.
//! - The hash table keeps its bucket count fixed unless a
//!   `TableConfig::max_load_factor` is set; a rehash at least doubles the bucket
//!   count, relinks the existing nodes and is logged at `debug` level.
//! - `insert` accepts duplicate keys and prepends, so lookups and removals
//!   resolve to the newest duplicate. `insert_unique` refuses duplicates
//!   with `Error::DuplicateKey`.
//!
//! Notes and non-goals
//! - Single-threaded; no interior mutability anywhere.
//! - No custom allocators, no serialization.
//! - Fallible operations return `Result<_, Error>`; `Index` panics like
//!   the std collections do.

pub mod adapters;
pub mod config;
pub mod cursor;
pub mod dynamic_array;
pub mod error;
pub mod hash_table;
pub mod linked_list;
mod linked_list_proptest;

// Public surface
pub use adapters::{Queue, Sequence, Stack};
pub use config::{GrowthPolicy, TableConfig};
pub use cursor::{ConstView, Cursor, CursorMut, ReverseView, Walk};
pub use dynamic_array::{ArrayPos, DynamicArray};
pub use error::{Error, Result};
pub use hash_table::{ChainedMap, ChainedSet, First, HashTable, Identity, KeyOf};
pub use linked_list::{LinkedList, ListPos};
