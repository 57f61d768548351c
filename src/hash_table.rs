//! HashTable: separate chaining over a prime-sized bucket vector.

use crate::chain::Chain;
use crate::error::CapacityError;
use crate::primes;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use log::{debug, warn};
use std::collections::hash_map::RandomState;
use std::io;

/// A hash table mapping unique keys to values.
///
/// Each bucket holds a chain of entries; a key lives in bucket
/// `hash(key) % bucket_count()`. The bucket count is always prime. When an
/// insert pushes `len()` past `bucket_count()`, every entry is moved into a
/// fresh bucket vector sized to the largest prime `<= 2 * bucket_count()`.
///
/// Mutation goes through `&mut self`; sharing a table between threads needs
/// an external lock such as `Mutex<HashTable<K, V>>`.
pub struct HashTable<K, V, S = RandomState> {
    hasher: S,
    buckets: Vec<Chain<K, V>>,
    len: usize,
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Creates a table with `DEFAULT_BUCKETS` (101) buckets.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Creates a table with `prime_below(size)` buckets.
    ///
    /// Sizes too small to hold a prime fall back to `DEFAULT_CAPACITY`;
    /// sizes above `MAX_PRIME` are rejected.
    pub fn with_capacity(size: usize) -> Result<Self, CapacityError> {
        Self::with_capacity_and_hasher(size, Default::default())
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

fn empty_buckets<K, V>(count: usize) -> Vec<Chain<K, V>> {
    let mut buckets = Vec::with_capacity(count);
    buckets.resize_with(count, Chain::default);
    buckets
}

impl<K, V, S> HashTable<K, V, S> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Visits every entry in bucket order, then chain order within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flat_map(|chain| chain.iter())
    }

    /// Drops every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.len = 0;
    }

    /// Returns a `Display` adapter listing each bucket as `v[i]: k v:k v`.
    pub fn dump(&self) -> Dump<'_, K, V, S> {
        Dump { table: self }
    }

    /// Writes the `dump` listing to `out`.
    pub fn dump_to<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        write!(out, "{}", self.dump())
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(primes::DEFAULT_BUCKETS, hasher)
    }

    pub fn with_capacity_and_hasher(size: usize, hasher: S) -> Result<Self, CapacityError> {
        let bucket_count = match primes::prime_below(size) {
            Ok(p) => p,
            Err(CapacityError::TooSmall { requested }) => {
                debug!(
                    "requested size {} too small, using {} buckets",
                    requested,
                    primes::DEFAULT_CAPACITY
                );
                primes::DEFAULT_CAPACITY
            }
            Err(e) => return Err(e),
        };
        Ok(Self::from_parts(bucket_count, hasher))
    }

    fn from_parts(bucket_count: usize, hasher: S) -> Self {
        Self {
            hasher,
            buckets: empty_buckets(bucket_count),
            len: 0,
        }
    }

    fn index_in<Q>(hasher: &S, q: &Q, bucket_count: usize) -> usize
    where
        Q: ?Sized + Hash,
    {
        (hasher.hash_one(q) % bucket_count as u64) as usize
    }

    fn bucket_of<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        Self::index_in(&self.hasher, q, self.buckets.len())
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// True iff `q` is stored with a value equal to `value`.
    pub fn matches<Q>(&self, q: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        self.get(q).map_or(false, |v| v == value)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.buckets[self.bucket_of(q)].get(q).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.bucket_of(q);
        self.buckets[idx].get_mut(q).map(|e| &mut e.value)
    }

    /// Inserts `key -> value`.
    ///
    /// Returns `false` when the key is already stored with an equal value
    /// (nothing changes). Returns `true` when the value was replaced or a new
    /// entry was added; a new entry may trigger a rehash.
    pub fn insert(&mut self, key: K, value: V) -> bool
    where
        V: PartialEq,
    {
        let idx = self.bucket_of(&key);
        if let Some(entry) = self.buckets[idx].get_mut(&key) {
            if entry.value == value {
                return false;
            }
            entry.value = value;
            return true;
        }
        self.push_new(idx, key, value);
        true
    }

    /// Copying form of [`insert`](Self::insert) with the same results. The key
    /// is cloned only for a new entry and the value only when stored.
    pub fn insert_cloned(&mut self, key: &K, value: &V) -> bool
    where
        K: Clone,
        V: Clone + PartialEq,
    {
        let idx = self.bucket_of(key);
        if let Some(entry) = self.buckets[idx].get_mut(key) {
            if entry.value == *value {
                return false;
            }
            entry.value = value.clone();
            return true;
        }
        self.push_new(idx, key.clone(), value.clone());
        true
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.bucket_of(q);
        match self.buckets[idx].remove(q) {
            Some(_) => {
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    // `idx` must be the bucket of `key`, and `key` must be absent.
    fn push_new(&mut self, idx: usize, key: K, value: V) {
        self.buckets[idx].push(key, value);
        self.len += 1;
        if self.len > self.buckets.len() {
            self.rehash();
        }
    }

    /// Moves every entry into a bucket vector of the next prime size.
    ///
    /// Entries are placed directly rather than through `insert`: keys are
    /// already unique and placement must not re-enter the growth check. One
    /// step is always enough since the next prime is above the current count.
    fn rehash(&mut self) {
        let old_count = self.buckets.len();
        let Some(new_count) = primes::grown(old_count) else {
            warn!(
                "bucket count capped at {}, not growing (len={})",
                old_count, self.len
            );
            return;
        };

        let mut fresh = empty_buckets(new_count);
        for entry in self.buckets.drain(..).flat_map(Chain::into_entries) {
            let idx = Self::index_in(&self.hasher, &entry.key, new_count);
            fresh[idx].push_entry(entry);
        }
        self.buckets = fresh;

        debug_assert!(self.len <= self.buckets.len());
        debug!(
            "rehashed {} entries: {} -> {} buckets, longest chain {}",
            self.len,
            old_count,
            new_count,
            self.buckets.iter().map(Chain::len).max().unwrap_or(0)
        );
    }
}

impl<K, V, S> Extend<(K, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> fmt::Debug for HashTable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Bucket listing returned by [`HashTable::dump`].
pub struct Dump<'a, K, V, S> {
    table: &'a HashTable<K, V, S>,
}

impl<K, V, S> fmt::Display for Dump<'_, K, V, S>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.table.buckets.iter().enumerate() {
            write!(f, "v[{}]: ", i)?;
            for (n, (k, v)) in chain.iter().enumerate() {
                if n > 0 {
                    f.write_str(":")?;
                }
                write!(f, "{} {}", k, v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Structural invariants: the size counter matches the chains and every
    /// entry sits in the bucket its hash selects.
    pub(crate) fn assert_invariants(&self) {
        let total: usize = self.buckets.iter().map(|c| c.len()).sum();
        assert_eq!(total, self.len, "len must equal the sum of chain lengths");
        assert!(!self.buckets.is_empty());
        for (i, chain) in self.buckets.iter().enumerate() {
            for (k, _) in chain.iter() {
                assert_eq!(self.bucket_of(k), i, "entry stored in the wrong bucket");
            }
        }
    }

    pub(crate) fn chain_len(&self, idx: usize) -> usize {
        self.buckets[idx].len()
    }

    pub(crate) fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.bucket_of(q)
    }
}
