#![cfg(test)]

// Property tests for UnorderedSet kept inside the crate so they can check
// chain bookkeeping against the bucket introspection API.

use crate::unordered_set::UnorderedSet;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves towards earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    Remove(usize),
    Contains(String),
    Rehash(usize),
    Reserve(usize),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => idx.clone().prop_map(Op::Insert),
            2 => idx.clone().prop_map(Op::Remove),
            2 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(Op::Contains),
            1 => (0usize..40).prop_map(Op::Rehash),
            1 => (0usize..40).prop_map(Op::Reserve),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_ops<S>(mut sut: UnorderedSet<Key, S>, pool: &[String], ops: Vec<Op>) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashSet<Key> = HashSet::new();
    for op in ops {
        match op {
            Op::Insert(i) => {
                let k = key_from(pool, i);
                let added = sut.insert(k.clone());
                prop_assert_eq!(added, model.insert(k));
                prop_assert!(sut.load_factor() < 1.0, "load factor must stay below 1 after insert");
            }
            Op::Remove(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert!(!sut.contains(&k));
            }
            Op::Contains(s) => {
                let has_model = model.iter().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains(s.as_str()), has_model);
            }
            Op::Rehash(n) => {
                let before = sut.bucket_count();
                sut.rehash(n);
                let expect = if n != before && n >= model.len() { n } else { before };
                prop_assert_eq!(sut.bucket_count(), expect);
            }
            Op::Reserve(n) => {
                let before = sut.bucket_count();
                sut.reserve(n);
                prop_assert_eq!(sut.bucket_count(), before.max(n));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), 0);
            }
            Op::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().cloned().collect();
                let m_keys: BTreeSet<_> = model.iter().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                prop_assert_eq!(sut.iter().count(), model.len());
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let total: usize = (0..sut.bucket_count()).map(|i| sut.bucket_size(i)).sum();
        prop_assert_eq!(total, model.len());
        for k in &model {
            let b = sut.bucket(k).expect("live key implies buckets");
            prop_assert!(sut.chain(b).any(|x| x == k), "key must sit in its own bucket");
        }
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashSet.
// - insert/remove report the same outcome as the model.
// - the load factor stays below 1 after every insert.
// - rehash/reserve follow their bucket-count rules.
// - every key sits in the chain its hash selects; chain lengths sum to len.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_ops(UnorderedSet::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants under worst-case collisions. This stresses
// equality probing and unlinking inside a single long chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_ops(UnorderedSet::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

// Property: chains keep insertion order across growth-triggered rehashes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_chain_order_is_insertion_order(keys in proptest::collection::vec(any::<u16>(), 0..200)) {
        let mut sut = UnorderedSet::with_hasher(ConstBuildHasher);
        let mut order = Vec::new();
        for k in keys {
            if sut.insert(k) {
                order.push(k);
            }
        }
        let chained: Vec<u16> = sut.chain(0).copied().collect();
        prop_assert_eq!(chained, order);
    }
}
