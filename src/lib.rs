//! chained-hashtable: a separate-chaining hash table with prime-sized
//! bucket vectors and a plain-text persistence format.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, owning key/value table whose behavior on insert,
//!   update, removal and growth is fully predictable.
//! - Layers:
//!   - `primes`: largest-prime-below selection via a per-call sieve,
//!     bounded by `MAX_PRIME`.
//!   - `Chain<K, V>`: the entries of one bucket, scanned linearly.
//!   - `HashTable<K, V, S>`: the bucket vector, the size counter and the
//!     growth policy; the public surface.
//!   - `persist`: load from / write to whitespace-separated text.
//!
//! Constraints
//! - Single-threaded: every mutation takes `&mut self`. Sharing a table
//!   across threads is the caller's job (wrap it in a lock).
//! - Ownership is a tree: table -> chains -> entries. No handles or
//!   references into the table survive a mutation.
//! - Keys are unique table-wide and immutable once stored; inserting an
//!   existing key replaces its value.
//! - `len()` always equals the sum of chain lengths.
//!
//! Hashing and growth
//! - A key lives in bucket `hasher.hash_one(key) % bucket_count()`. The
//!   hasher is `RandomState` unless one is supplied.
//! - Bucket counts are primes. When an insert makes `len()` exceed
//!   `bucket_count()`, all entries move into a fresh vector sized to the
//!   largest prime `<= 2 * bucket_count()`, which then replaces the old one.
//!   That prime is always above the old count, so one step restores
//!   `len() <= bucket_count()`.
//! - Growth stops at `MAX_PRIME`; past that point chains simply lengthen.
//!
//! Persistence
//! - `write_to_file` emits one `key value` line per entry in bucket order.
//! - `load` reads token pairs with `FromStr` until end of input or the
//!   first pair that fails to parse; a dangling key is dropped.
//! - Round-trips need `Display` output that is a single token and parses
//!   back with `FromStr`.
//!
//! Notes and non-goals
//! - No concurrent access, no durability guarantees (no fsync, no atomic
//!   rename), no custom rehash policy.
//! - Logging goes through the `log` facade; no logger is installed.

mod chain;
pub mod error;
mod hash_table;
mod hash_table_proptest;
mod persist;
pub mod primes;

// Public surface
pub use error::{CapacityError, PersistError};
pub use hash_table::{Dump, HashTable};
pub use primes::prime_below;
