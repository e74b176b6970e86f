//! UnorderedSet: open hashing with per-bucket chains and doubling rehash.
//!
//! Entries live in a `SlotMap` and carry their precomputed `u64` hash plus
//! a link to the next entry of the same chain. The bucket table is a `Vec`
//! of chain descriptors (head, tail, length); chains keep insertion order.
//! Rehashing only relinks nodes using the stored hashes, so it never calls
//! back into `K: Hash` or `K: Eq`.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use core::slice;
use hashbrown::hash_map::DefaultHashBuilder;
use slotmap::{DefaultKey, SlotMap};
use tracing::trace;

// Doubling happens as soon as len / bucket_count reaches this bound.
const MAX_LOAD_FACTOR: usize = 1;

#[derive(Clone, Debug)]
struct Node<K> {
    key: K,
    hash: u64,
    next: Option<DefaultKey>,
}

#[derive(Copy, Clone, Debug, Default)]
struct Chain {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
    len: usize,
}

/// Hash set with separate chaining. Load factor stays below 1.0 after
/// every insertion.
#[derive(Clone)]
pub struct UnorderedSet<K, S = DefaultHashBuilder> {
    hasher: S,
    nodes: SlotMap<DefaultKey, Node<K>>,
    buckets: Vec<Chain>,
}

impl<K> UnorderedSet<K>
where
    K: Eq + Hash,
{
    /// Empty set with zero buckets; the first insert allocates one.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Empty set starting with exactly `n` buckets.
    pub fn with_buckets(n: usize) -> Self {
        Self::with_buckets_and_hasher(n, Default::default())
    }
}

impl<K> Default for UnorderedSet<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> UnorderedSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_buckets_and_hasher(0, hasher)
    }

    pub fn with_buckets_and_hasher(n: usize, hasher: S) -> Self {
        Self {
            hasher,
            nodes: SlotMap::with_key(),
            buckets: vec![Chain::default(); n],
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn bucket_index(&self, hash: u64) -> usize {
        debug_assert!(!self.buckets.is_empty());
        (hash % self.buckets.len() as u64) as usize
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// `len / bucket_count`, or 0.0 with no buckets.
    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            return 0.0;
        }
        self.len() as f64 / self.buckets.len() as f64
    }

    /// Number of keys in bucket `i`; 0 for an out-of-range index.
    pub fn bucket_size(&self, i: usize) -> usize {
        self.buckets.get(i).map_or(0, |c| c.len)
    }

    /// Bucket index `q` hashes to, or `None` while there are no buckets.
    pub fn bucket<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        if self.buckets.is_empty() {
            return None;
        }
        Some(self.bucket_index(self.make_hash(q)))
    }

    fn find_hashed<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let mut cur = self.buckets[self.bucket_index(hash)].head;
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.hash == hash && node.key.borrow() == q {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.find_hashed(hash, q).map(|k| &self.nodes[k].key)
    }

    /// Insert `key` unless an equal key is present. Returns whether it was
    /// added.
    pub fn insert(&mut self, key: K) -> bool {
        let hash = self.make_hash(&key);
        if self.find_hashed(hash, &key).is_some() {
            // A tight rehash can leave the table full; a rejected insert
            // still restores the bound.
            self.grow_if_loaded();
            return false;
        }
        if self.buckets.is_empty() {
            self.rebuild(1);
        }
        let k = self.nodes.insert(Node {
            key,
            hash,
            next: None,
        });
        self.link(k, hash);
        self.grow_if_loaded();
        true
    }

    // Doubles the bucket count until len / bucket_count drops below the bound.
    fn grow_if_loaded(&mut self) {
        let count = self.buckets.len();
        if self.len() >= count * MAX_LOAD_FACTOR {
            let mut target = count.max(1);
            while self.len() >= target * MAX_LOAD_FACTOR {
                target = target.checked_mul(2).unwrap_or(usize::MAX);
            }
            self.rebuild(target);
        }
    }

    /// Remove the key equal to `q`. Returns whether one was removed. The
    /// table never shrinks here.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.buckets.is_empty() {
            return false;
        }
        let hash = self.make_hash(q);
        let b = self.bucket_index(hash);
        let mut prev = None;
        let mut cur = self.buckets[b].head;
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.hash == hash && node.key.borrow() == q {
                let next = node.next;
                match prev {
                    Some(p) => self.nodes[p].next = next,
                    None => self.buckets[b].head = next,
                }
                let chain = &mut self.buckets[b];
                if chain.tail == Some(k) {
                    chain.tail = prev;
                }
                chain.len -= 1;
                // Structure is consistent again before K::drop runs.
                self.nodes.remove(k);
                return true;
            }
            prev = cur;
            cur = node.next;
        }
        false
    }

    /// Rebuild with `n` buckets if `n` differs from the current count and
    /// is at least `len()`. Otherwise does nothing.
    pub fn rehash(&mut self, n: usize) {
        if n != self.buckets.len() && n >= self.len() {
            self.rebuild(n);
        }
    }

    /// `rehash(n)` when `n` exceeds the current bucket count.
    pub fn reserve(&mut self, n: usize) {
        if n > self.buckets.len() {
            self.rehash(n);
        }
    }

    /// Drop every key and return to zero buckets.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets = Vec::new();
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            nodes: &self.nodes,
            buckets: self.buckets.iter(),
            cur: None,
            remaining: self.len(),
        }
    }

    /// Keys of bucket `i` in insertion order; empty for an out-of-range index.
    pub fn chain(&self, i: usize) -> ChainIter<'_, K> {
        let c = self.buckets.get(i).copied().unwrap_or_default();
        ChainIter {
            nodes: &self.nodes,
            cur: c.head,
            remaining: c.len,
        }
    }

    // Relinks every node into a fresh table of `n` chains, preserving the
    // relative order of nodes that land in the same chain.
    fn rebuild(&mut self, n: usize) {
        debug_assert!(n >= self.len());
        let old = mem::replace(&mut self.buckets, vec![Chain::default(); n]);
        trace!(from = old.len(), to = n, len = self.len(), "unordered_set: rehash");
        for chain in old {
            let mut cur = chain.head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                cur = node.next.take();
                let hash = node.hash;
                self.link(k, hash);
            }
        }
    }

    fn link(&mut self, k: DefaultKey, hash: u64) {
        let b = self.bucket_index(hash);
        let chain = &mut self.buckets[b];
        match chain.tail {
            Some(t) => self.nodes[t].next = Some(k),
            None => chain.head = Some(k),
        }
        chain.tail = Some(k);
        chain.len += 1;
    }
}

impl<K, S> UnorderedSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Move the contents out, leaving `self` empty with zero buckets.
    pub fn take(&mut self) -> Self {
        let empty = Self::with_hasher(self.hasher.clone());
        mem::replace(self, empty)
    }
}

/// Equal when both hold the same keys, regardless of bucket layout.
impl<K, S> PartialEq for UnorderedSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K, S> Eq for UnorderedSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, S> fmt::Debug for UnorderedSet<K, S>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self
            .buckets
            .iter()
            .flat_map(|c| ChainIter {
                nodes: &self.nodes,
                cur: c.head,
                remaining: c.len,
            });
        f.debug_set().entries(keys).finish()
    }
}

/// Range construction: the table starts with one bucket per source element
/// (duplicates included), then every element goes through `insert`, so
/// source duplicates are stored once.
impl<K, S> FromIterator<K> for UnorderedSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let items: Vec<K> = iter.into_iter().collect();
        let mut set = Self::with_buckets_and_hasher(items.len(), S::default());
        set.extend(items);
        set
    }
}

impl<K, S> Extend<K> for UnorderedSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K, S> IntoIterator for &'a UnorderedSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;
    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// Keys in bucket order, then chain order.
pub struct Iter<'a, K> {
    nodes: &'a SlotMap<DefaultKey, Node<K>>,
    buckets: slice::Iter<'a, Chain>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        loop {
            if let Some(k) = self.cur {
                let nodes = self.nodes;
                let node = &nodes[k];
                self.cur = node.next;
                self.remaining -= 1;
                return Some(&node.key);
            }
            self.cur = self.buckets.next()?.head;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> ExactSizeIterator for Iter<'a, K> {}
impl<'a, K> FusedIterator for Iter<'a, K> {}

/// Keys of a single bucket in insertion order.
pub struct ChainIter<'a, K> {
    nodes: &'a SlotMap<DefaultKey, Node<K>>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K> Iterator for ChainIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let k = self.cur?;
        let nodes = self.nodes;
        let node = &nodes[k];
        self.cur = node.next;
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> ExactSizeIterator for ChainIter<'a, K> {}
impl<'a, K> FusedIterator for ChainIter<'a, K> {}
