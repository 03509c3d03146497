//! HashTable: separate chaining over a fixed array of buckets.
//!
//! Values are stored whole; their key is obtained through a [`KeyOf`]
//! projection and hashed with the table's `BuildHasher`. Each bucket is a
//! singly-linked chain of boxed nodes. Insertion prepends, so within a chain
//! the most recently inserted value comes first, and lookups resolve
//! duplicate keys to the newest one.
//!
//! The bucket count is fixed unless [`TableConfig::max_load_factor`] is set,
//! in which case an insertion that overloads the table at least doubles the
//! bucket count, enough to get back under the limit, and relinks every node
//! in place.

use crate::config::TableConfig;
use crate::error::{Error, Result};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use core::mem;
use hashbrown::hash_map::DefaultHashBuilder;
use log::debug;

/// Projection from a stored value to the key it is indexed by.
pub trait KeyOf<V> {
    type Key: ?Sized + Hash + Eq;
    fn key_of(value: &V) -> &Self::Key;
}

/// The value is its own key (set semantics).
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<T: Hash + Eq> KeyOf<T> for Identity {
    type Key = T;
    #[inline]
    fn key_of(value: &T) -> &T {
        value
    }
}

/// `(K, V)` pairs keyed by `K` (map semantics).
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

impl<K: Hash + Eq, V> KeyOf<(K, V)> for First {
    type Key = K;
    #[inline]
    fn key_of(value: &(K, V)) -> &K {
        &value.0
    }
}

struct ChainNode<V> {
    value: V,
    next: Link<V>,
}

type Link<V> = Option<Box<ChainNode<V>>>;

pub struct HashTable<V, P, S = DefaultHashBuilder> {
    buckets: Vec<Link<V>>,
    len: usize,
    hasher: S,
    config: TableConfig,
    _projection: PhantomData<fn() -> P>,
}

/// Values hashed by themselves.
pub type ChainedSet<T, S = DefaultHashBuilder> = HashTable<T, Identity, S>;

/// `(K, V)` pairs hashed by `K`.
pub type ChainedMap<K, V, S = DefaultHashBuilder> = HashTable<(K, V), First, S>;

fn empty_buckets<V>(n: usize) -> Vec<Link<V>> {
    let mut buckets = Vec::with_capacity(n);
    buckets.resize_with(n, || None);
    buckets
}

impl<V, P, S> HashTable<V, P, S>
where
    P: KeyOf<V>,
    S: BuildHasher + Default,
{
    /// Ten fixed buckets.
    pub fn new() -> Self {
        Self::with_config_and_hasher(TableConfig::default(), S::default())
    }

    /// `buckets` fixed buckets; fails when `buckets == 0`.
    pub fn with_buckets(buckets: usize) -> Result<Self> {
        Ok(Self::with_config(TableConfig::fixed(buckets)?))
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, S::default())
    }
}

impl<V, P, S> Default for HashTable<V, P, S>
where
    P: KeyOf<V>,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, P, S> HashTable<V, P, S>
where
    P: KeyOf<V>,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(TableConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Self {
        Self {
            buckets: empty_buckets(config.buckets()),
            len: 0,
            hasher,
            config,
            _projection: PhantomData,
        }
    }

    #[inline]
    fn bucket_of<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    fn chain(&self, bucket: usize) -> Chain<'_, V> {
        Chain {
            cur: self.buckets[bucket].as_deref(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of values chained in `bucket`, or `None` past the last bucket.
    pub fn bucket_len(&self, bucket: usize) -> Option<usize> {
        (bucket < self.buckets.len()).then(|| self.chain(bucket).count())
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Prepend `value` to its bucket. Duplicate keys are accepted; always
    /// returns `true`.
    pub fn insert(&mut self, value: V) -> bool {
        let bucket = self.bucket_of(P::key_of(&value));
        let head = self.buckets[bucket].take();
        self.buckets[bucket] = Some(Box::new(ChainNode { value, next: head }));
        self.len += 1;
        self.grow_if_overloaded();
        true
    }

    /// Insert only if no value with the same key is present.
    pub fn insert_unique(&mut self, value: V) -> Result<()> {
        if self.find(P::key_of(&value)) {
            return Err(Error::DuplicateKey);
        }
        self.insert(value);
        Ok(())
    }

    /// First value in chain order whose key equals `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        P::Key: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let bucket = self.bucket_of(key);
        self.chain(bucket).find(|v| P::key_of(v).borrow() == key)
    }

    pub fn find<Q>(&self, key: &Q) -> bool
    where
        P::Key: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).is_some()
    }

    /// Number of stored values with this key.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        P::Key: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let bucket = self.bucket_of(key);
        self.chain(bucket)
            .filter(|v| P::key_of(v).borrow() == key)
            .count()
    }

    /// Unlink and return the first value in chain order with this key.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        P::Key: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let bucket = self.bucket_of(key);
        let depth = self
            .chain(bucket)
            .position(|v| P::key_of(v).borrow() == key)?;
        let mut link = &mut self.buckets[bucket];
        for _ in 0..depth {
            link = &mut link.as_mut()?.next;
        }
        let mut node = link.take()?;
        *link = node.next.take();
        self.len -= 1;
        Some(node.value)
    }

    /// Remove the first match; `false` (and no change) when absent.
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        P::Key: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove(key).is_some()
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        P::Key: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let bucket = self.bucket_of(key);
        let mut cur = self.buckets[bucket].as_deref_mut();
        while let Some(node) = cur {
            if P::key_of(&node.value).borrow() == key {
                return Some(&mut node.value);
            }
            cur = node.next.as_deref_mut();
        }
        None
    }

    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            // Unlink iteratively; dropping a long chain recursively could
            // exhaust the stack.
            let mut cur = bucket.take();
            while let Some(mut node) = cur {
                cur = node.next.take();
            }
        }
        self.len = 0;
    }

    // At least double, and enough that the load factor is back under `max`
    // after a single rehash.
    fn grow_if_overloaded(&mut self) {
        if let Some(max) = self.config.max_load_factor() {
            if self.load_factor() > max {
                let needed = (self.len as f64 / max).ceil() as usize;
                self.rehash(needed.max(self.buckets.len().saturating_mul(2)));
            }
        }
    }

    /// Redistribute every node over `buckets` buckets (at least one).
    /// Nodes are relinked, not reallocated; values with equal keys keep
    /// their relative order.
    pub fn rehash(&mut self, buckets: usize) {
        let buckets = buckets.max(1);
        debug!(
            "hash table rehash {} -> {} buckets ({} entries)",
            self.buckets.len(),
            buckets,
            self.len
        );
        let old = mem::replace(&mut self.buckets, empty_buckets(buckets));
        let mut chain = Vec::new();
        for mut head in old {
            while let Some(mut node) = head {
                head = node.next.take();
                chain.push(node);
            }
            while let Some(mut node) = chain.pop() {
                let bucket = self.bucket_of(P::key_of(&node.value));
                node.next = self.buckets[bucket].take();
                self.buckets[bucket] = Some(node);
            }
        }
    }

    /// All values, bucket by bucket, each chain newest first.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Chain { cur: None },
            remaining: self.len,
        }
    }
}

impl<K, V, S> HashTable<(K, V), First, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Value half of the newest pair with this key.
    pub fn value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).map(|(_, v)| v)
    }

    /// Mutable value half of the newest pair with this key. Keys stay
    /// immutable so the pair cannot migrate buckets.
    pub fn value_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(key).map(|(_, v)| v)
    }
}

impl<V, P, S> Drop for HashTable<V, P, S> {
    fn drop(&mut self) {
        for bucket in self.buckets.iter_mut() {
            let mut cur = bucket.take();
            while let Some(mut node) = cur {
                cur = node.next.take();
            }
        }
    }
}

impl<V, P, S> Clone for HashTable<V, P, S>
where
    V: Clone,
    P: KeyOf<V>,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        // Sized from the live bucket count, which may exceed the configured
        // one after a rehash.
        let mut out = HashTable {
            buckets: empty_buckets(self.buckets.len()),
            len: self.len,
            hasher: self.hasher.clone(),
            config: self.config,
            _projection: PhantomData,
        };
        for (i, head) in self.buckets.iter().enumerate() {
            let values: Vec<&V> = Chain { cur: head.as_deref() }.collect();
            for v in values.into_iter().rev() {
                let next = out.buckets[i].take();
                out.buckets[i] = Some(Box::new(ChainNode {
                    value: v.clone(),
                    next,
                }));
            }
        }
        out
    }
}

impl<V, P, S> fmt::Debug for HashTable<V, P, S>
where
    V: fmt::Debug,
    P: KeyOf<V>,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<V, P, S> Extend<V> for HashTable<V, P, S>
where
    P: KeyOf<V>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl<V, P, S> FromIterator<V> for HashTable<V, P, S>
where
    P: KeyOf<V>,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut t = Self::new();
        t.extend(iter);
        t
    }
}

impl<'a, V, P, S> IntoIterator for &'a HashTable<V, P, S>
where
    P: KeyOf<V>,
    S: BuildHasher,
{
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct Chain<'a, V> {
    cur: Option<&'a ChainNode<V>>,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        let node = self.cur?;
        self.cur = node.next.as_deref();
        Some(&node.value)
    }
}

/// Iterator over every stored value.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Link<V>>,
    chain: Chain<'a, V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        loop {
            if let Some(v) = self.chain.next() {
                self.remaining -= 1;
                return Some(v);
            }
            let head = self.buckets.next()?;
            self.chain = Chain {
                cur: head.as_deref(),
            };
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::Hasher;

    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    // Every key lands in bucket 0.
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        }
    }

    /// Invariant: insert/find/erase on a small integer-keyed map.
    #[test]
    fn insert_find_erase_scenario() {
        let mut t: ChainedMap<i32, &str> = ChainedMap::new();
        assert!(t.insert((1, "one")));
        assert!(t.insert((2, "two")));
        assert!(t.find(&1));
        assert!(t.erase(&1));
        assert!(!t.find(&1));
        assert!(t.find(&2));
        assert_eq!(t.len(), 1);
        assert_eq!(t.value(&2), Some(&"two"));
    }

    /// Invariant: erasing an absent key reports `false` and keeps the size.
    #[test]
    fn erase_absent_is_noop() {
        let mut t: ChainedSet<u32> = [1, 2, 3].into_iter().collect();
        assert!(!t.erase(&9));
        assert_eq!(t.len(), 3);
    }

    /// Invariant: under full collision, chain order is newest first and
    /// duplicates resolve to the most recent insert.
    #[test]
    fn chain_order_under_collision() {
        let mut t: ChainedMap<&str, i32, ConstBuildHasher> =
            HashTable::with_hasher(ConstBuildHasher);
        t.insert(("a", 1));
        t.insert(("b", 2));
        t.insert(("a", 3));
        assert_eq!(t.bucket_len(0), Some(3));
        assert_eq!(t.bucket_len(1), Some(0));
        assert_eq!(t.bucket_len(10), None);
        let order: Vec<_> = t.iter().copied().collect();
        assert_eq!(order, vec![("a", 3), ("b", 2), ("a", 1)]);
        assert_eq!(t.value(&"a"), Some(&3));
        assert_eq!(t.count(&"a"), 2);

        // erase removes the newest duplicate; the older one surfaces
        assert!(t.erase(&"a"));
        assert_eq!(t.value(&"a"), Some(&1));
        assert!(t.erase(&"a"));
        assert!(!t.find(&"a"));
        assert_eq!(t.remove(&"b"), Some(("b", 2)));
        assert!(t.is_empty());
    }

    /// Invariant: removal from the middle and tail of a chain relinks it.
    #[test]
    fn remove_relinks_chain() {
        let mut t: ChainedSet<i32, ConstBuildHasher> = HashTable::with_hasher(ConstBuildHasher);
        for v in 1..=5 {
            t.insert(v);
        }
        assert_eq!(t.remove(&3), Some(3));
        assert_eq!(t.remove(&1), Some(1));
        let order: Vec<i32> = t.iter().copied().collect();
        assert_eq!(order, vec![5, 4, 2]);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn insert_unique_rejects_duplicates() {
        let mut t: ChainedMap<String, i32> = ChainedMap::new();
        assert_eq!(t.insert_unique(("k".to_string(), 1)), Ok(()));
        assert_eq!(
            t.insert_unique(("k".to_string(), 2)),
            Err(Error::DuplicateKey)
        );
        assert_eq!(t.len(), 1);
        // borrowed lookup: store String, query with &str
        assert_eq!(t.value("k"), Some(&1));
        *t.value_mut("k").unwrap() = 5;
        assert_eq!(t.value("k"), Some(&5));
    }

    /// Invariant: the bucket count is fixed by default, and doubles when a
    /// load-factor limit is configured.
    #[test]
    fn rehash_only_when_configured() {
        let mut fixed: ChainedSet<u32> = HashTable::with_buckets(4).unwrap();
        for v in 0..100 {
            fixed.insert(v);
        }
        assert_eq!(fixed.bucket_count(), 4);
        assert!(fixed.load_factor() > 20.0);

        let cfg = TableConfig::new(4, Some(1.0)).unwrap();
        let mut grown: ChainedSet<u32> = HashTable::with_config(cfg);
        for v in 0..100 {
            grown.insert(v);
        }
        assert!(grown.bucket_count() >= 100);
        assert!(grown.load_factor() <= 1.0);
        assert!((0..100).all(|v| grown.find(&v)));
        assert_eq!(grown.iter().count(), 100);
    }

    /// Invariant: rehashing keeps newest-first order among equal keys.
    #[test]
    fn rehash_preserves_duplicate_order() {
        let mut t: ChainedMap<u8, u32> = HashTable::with_buckets(1).unwrap();
        for i in 0..10 {
            t.insert((i % 3, u32::from(i)));
        }
        t.rehash(7);
        assert_eq!(t.bucket_count(), 7);
        assert_eq!(t.value(&0), Some(&9));
        assert!(t.erase(&0));
        assert_eq!(t.value(&0), Some(&6));
        assert_eq!(t.count(&1), 3);
        assert_eq!(t.len(), 9);
    }

    /// Invariant: with a load-factor limit, every insert leaves the table
    /// at or under the limit, and growth is bounded by the entry count.
    #[test]
    fn growth_restores_limit_in_one_step() {
        let cfg = TableConfig::new(1, Some(0.25)).unwrap();
        let mut t: ChainedSet<u32> = HashTable::with_config(cfg);
        for v in 0..50 {
            t.insert(v);
            assert!(t.load_factor() <= 0.25);
            assert!(t.bucket_count() <= 8 * t.len());
        }
        assert!((0..50).all(|v| t.find(&v)));
    }

    /// Invariant: a clone keeps the grown bucket count and chain order.
    #[test]
    fn clone_after_rehash() {
        let cfg = TableConfig::new(2, Some(1.0)).unwrap();
        let mut t: ChainedMap<u8, u8> = HashTable::with_config(cfg);
        for i in 0..20 {
            t.insert((i % 4, i));
        }
        let c = t.clone();
        assert_eq!(c.bucket_count(), t.bucket_count());
        assert_eq!(c.len(), 20);
        assert_eq!(
            c.iter().collect::<Vec<_>>(),
            t.iter().collect::<Vec<_>>()
        );
        assert_eq!(c.value(&3), Some(&19));
    }

    #[test]
    fn clone_and_clear() {
        let mut t: ChainedMap<u8, u8, ConstBuildHasher> = HashTable::with_hasher(ConstBuildHasher);
        t.extend([(1, 1), (2, 2), (1, 3)]);
        let c = t.clone();
        assert_eq!(
            c.iter().collect::<Vec<_>>(),
            t.iter().collect::<Vec<_>>()
        );
        t.clear();
        assert!(t.is_empty());
        assert!(!t.find(&1));
        assert_eq!(c.len(), 3);
        assert_eq!(c.value(&1), Some(&3));
    }

    #[test]
    fn zero_buckets_rejected() {
        let t: Result<ChainedSet<u8>> = HashTable::with_buckets(0);
        assert!(matches!(t, Err(Error::InvalidPolicy(_))));
    }

    /// Invariant: dropping a table with a very long chain does not recurse.
    #[test]
    fn long_chain_drops_iteratively() {
        let mut t: ChainedSet<u32, ConstBuildHasher> = HashTable::with_hasher(ConstBuildHasher);
        for v in 0..200_000 {
            t.insert(v);
        }
        assert_eq!(t.bucket_len(0), Some(200_000));
        drop(t);
    }
}
