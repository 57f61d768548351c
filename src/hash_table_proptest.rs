#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check
// bucket placement, which is not part of the public API.

use crate::hash_table::test_hashers::ConstBuildHasher;
use crate::hash_table::HashTable;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::hash_map::RandomState;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

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

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    InsertCloned(usize, i32),
    Remove(usize),
    Get(usize),
    Matches(usize, i32),
    Contains(String),
    Mutate(usize, i32),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        // Small value range so updates hit both the equal and unequal paths.
        let val = 0i32..4;
        let op = prop_oneof![
            4 => (idx.clone(), val.clone()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), val.clone()).prop_map(|(i, v)| OpI::InsertCloned(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Get),
            1 => (idx.clone(), val.clone()).prop_map(|(i, v)| OpI::Matches(i, v)),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_state_machine<S: BuildHasher>(
    mut sut: HashTable<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                let expect_change = model.get(&k) != Some(&v);
                prop_assert_eq!(sut.insert(k.clone(), v), expect_change);
                model.insert(k, v);
            }
            OpI::InsertCloned(i, v) => {
                let k = key_from(pool, i);
                let expect_change = model.get(&k) != Some(&v);
                prop_assert_eq!(sut.insert_cloned(&k, &v), expect_change);
                model.insert(k, v);
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let present = model.remove(&k).is_some();
                prop_assert_eq!(sut.remove(&k), present);
                prop_assert!(!sut.contains(&k));
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            OpI::Matches(i, v) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.matches(&k, &v), model.get(&k) == Some(&v));
            }
            OpI::Contains(s) => {
                let has = sut.contains(s.as_str());
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                if let Some(vr) = sut.get_mut(&k) {
                    *vr = vr.saturating_add(d);
                    let mv = model.get_mut(&k).expect("model tracks live key");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(&k));
                }
            }
            OpI::Clear => {
                let buckets = sut.bucket_count();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), buckets);
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                prop_assert_eq!(sut.iter().count(), sut.len());
            }
        }

        // Post-conditions after each op
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.len() <= sut.bucket_count());
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `insert`/`insert_cloned` return false exactly for an identical pair.
// - `remove` reports presence and the key stops resolving.
// - `len` equals distinct keys inserted minus keys removed, across rehashes.
// - Every entry sits in the bucket its hash selects after each op.
// Starting from 3 buckets forces several rehashes per case.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: HashTable<Key, i32, RandomState> =
            HashTable::with_capacity_and_hasher(3, RandomState::new()).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: Same state-machine invariants under worst-case collision
// behavior (constant hasher), which puts every entry in bucket 0.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: HashTable<Key, i32, ConstBuildHasher> =
            HashTable::with_capacity_and_hasher(3, ConstBuildHasher).unwrap();
        run_state_machine(sut, &pool, ops)?;
    }
}
