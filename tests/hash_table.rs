// HashTable unit test suite (consolidated).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Membership: a key resolves from insert until remove or clear.
// - Uniqueness: re-inserting an identical pair is a no-op returning false.
// - Update: a new value for a stored key replaces it, len unchanged.
// - Growth: rehashing is a pure reorganization (no loss, no duplicates).
// - Persistence: write_to_file then load reproduces the mapping.
use chained_hashtable::{prime_below, CapacityError, HashTable, PersistError};
use std::collections::BTreeMap;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn snapshot<K: Ord + Clone, V: Clone>(t: &HashTable<K, V>) -> BTreeMap<K, V> {
    t.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

// Test: membership lifetime.
// Assumes: contains reflects insert/remove/clear.
// Verifies: true after insert, false after remove, false after clear.
#[test]
fn contains_until_removed_or_cleared() {
    let mut t = HashTable::new();
    t.insert("x".to_string(), 1);
    t.insert("y".to_string(), 2);
    assert!(t.contains("x"));
    assert!(t.remove("x"));
    assert!(!t.contains("x"));
    assert!(t.contains("y"));
    t.clear();
    assert!(!t.contains("y"));
    assert_eq!(t.len(), 0);
}

// Test: duplicate pair insert.
// Verifies: second identical insert returns false and len is unchanged.
#[test]
fn identical_insert_is_idempotent() {
    let mut t = HashTable::new();
    assert!(t.insert(42u64, "answer".to_string()));
    assert!(!t.insert(42u64, "answer".to_string()));
    assert_eq!(t.len(), 1);
}

// Test: update in place.
// Verifies: (k, v1) then (k, v2) returns true, len unchanged, v2 stored.
#[test]
fn insert_with_new_value_updates() {
    let mut t = HashTable::new();
    assert!(t.insert("k".to_string(), 1));
    assert!(t.insert("k".to_string(), 2));
    assert_eq!(t.len(), 1);
    assert!(t.matches("k", &2));
    assert!(!t.matches("k", &1));
}

// Test: size accounting.
// Verifies: len == distinct keys inserted - keys successfully removed,
// including across several rehashes and with failed removals mixed in.
#[test]
fn len_tracks_inserts_and_removes() {
    let mut t: HashTable<u32, u32> = HashTable::with_capacity(5).unwrap();
    for i in 0..500 {
        t.insert(i, i);
    }
    for i in 0..500 {
        t.insert(i, i); // duplicates
    }
    assert_eq!(t.len(), 500);
    let mut removed = 0;
    for i in (0..700).step_by(3) {
        if t.remove(&i) {
            removed += 1;
        }
    }
    assert_eq!(removed, 167);
    assert_eq!(t.len(), 500 - removed);
}

// Test: growth from a tiny table.
// Assumes: growth triggers exactly when len > bucket_count.
// Verifies: 5 keys into 3 buckets end in 5 buckets with every key present.
#[test]
fn rehash_from_three_buckets() {
    let mut t: HashTable<String, usize> = HashTable::with_capacity(3).unwrap();
    assert_eq!(t.bucket_count(), 3);
    for i in 0..5 {
        t.insert(format!("key-{}", i), i);
        assert!((0..=i).all(|j| t.contains(format!("key-{}", j).as_str())));
    }
    assert_eq!(t.len(), 5);
    assert_eq!(t.bucket_count(), 5);
    assert_eq!(prime_below(t.bucket_count()), Ok(t.bucket_count()));
}

// Test: bucket counts follow the prime ladder as the table grows.
// Verifies: each growth lands on prime_below(2 * previous).
#[test]
fn growth_follows_prime_ladder() {
    let mut t: HashTable<u32, ()> = HashTable::with_capacity(11).unwrap();
    let mut seen = vec![t.bucket_count()];
    for i in 0..1_000 {
        t.insert(i, ());
        if *seen.last().unwrap() != t.bucket_count() {
            seen.push(t.bucket_count());
        }
    }
    assert_eq!(seen, vec![11, 19, 37, 73, 139, 277, 547, 1093]);
    for w in seen.windows(2) {
        assert_eq!(prime_below(2 * w[0]), Ok(w[1]));
    }
}

// Test: capacity bounds.
// Verifies: oversized requests fail with TooLarge, never a composite size.
#[test]
fn oversized_capacity_is_rejected() {
    let err = HashTable::<u8, u8>::with_capacity(usize::MAX).unwrap_err();
    assert!(matches!(err, CapacityError::TooLarge { .. }));
}

// Test: boundary behaviors.
// Verifies: remove on empty, load of a missing path, write of an empty table.
#[test]
fn boundary_cases() {
    let dir = TempDir::new().unwrap();

    let mut t: HashTable<String, i32> = HashTable::new();
    assert!(!t.remove("nothing"));
    assert_eq!(t.len(), 0);

    t.insert("stay".to_string(), 9);
    let before = snapshot(&t);
    match t.load(dir.path().join("missing.txt")) {
        Err(PersistError::Open { path, .. }) => assert!(path.ends_with("missing.txt")),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(snapshot(&t), before);

    let empty: HashTable<String, i32> = HashTable::new();
    let out = dir.path().join("empty.txt");
    empty.write_to_file(&out).unwrap();
    assert_eq!(fs::read(&out).unwrap().len(), 0);
}

// Test: persistence round-trip.
// Verifies: same (k, v) set after write_to_file + load into a fresh table,
// and the file holds one record per line.
#[test]
fn write_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pairs.txt");

    let mut t: HashTable<String, i64> = HashTable::new();
    for i in 0..200i64 {
        t.insert(format!("k{}", i), i * i - 50);
    }
    t.write_to_file(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 200);
    assert!(text.lines().all(|l| l.split_whitespace().count() == 2));

    let mut back: HashTable<String, i64> = HashTable::new();
    assert_eq!(back.load(&path).unwrap(), 200);
    assert_eq!(snapshot(&back), snapshot(&t));
}

// Test: load into a non-empty table.
// Verifies: loaded records update existing keys and add new ones.
#[test]
fn load_merges_into_existing_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("merge.txt");
    fs::write(&path, "a 10\nb 20 c 30\n").unwrap();

    let mut t: HashTable<String, i32> = HashTable::new();
    t.insert("a".to_string(), 1);
    t.insert("z".to_string(), 26);
    assert_eq!(t.load(&path).unwrap(), 3);
    assert_eq!(t.len(), 4);
    assert_eq!(t.get("a"), Some(&10));
    assert_eq!(t.get("z"), Some(&26));
}

// Test: dump listing shape.
// Verifies: one line per bucket, each entry listed exactly once.
#[test]
fn dump_lists_every_bucket_and_entry() {
    let mut t: HashTable<String, i32> = HashTable::with_capacity(7).unwrap();
    for (k, v) in [("a", 1), ("b", 2), ("l", 3)] {
        t.insert(k.to_string(), v);
    }
    let out = t.dump().to_string();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), t.bucket_count());
    for (i, line) in lines.iter().enumerate() {
        assert!(line.starts_with(&format!("v[{}]: ", i)));
    }
    let mut entries: Vec<String> = lines
        .iter()
        .filter_map(|l| l.split_once(": ").map(|(_, rest)| rest))
        .filter(|rest| !rest.is_empty())
        .flat_map(|rest| rest.split(':').map(str::to_string))
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["a 1", "b 2", "l 3"]);
}

// Test: external synchronization.
// Assumes: the table itself is not synchronized; callers lock around it.
// Verifies: a Mutex-wrapped table can be shared and mutated from threads.
#[test]
fn shared_behind_a_mutex() {
    let shared = Arc::new(Mutex::new(HashTable::<u32, u32>::new()));
    let handles: Vec<_> = (0..4u32)
        .map(|tid| {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for i in 0..100 {
                    shared.lock().unwrap().insert(tid * 1_000 + i, i);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(shared.lock().unwrap().len(), 400);
}
