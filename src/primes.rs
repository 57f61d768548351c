//! Prime selection for bucket counts.
//!
//! Bucket counts are always primes so that `hash % buckets` does not inherit
//! the regular patterns a composite modulus picks up from hash values. The
//! sieve is rebuilt on every query; table sizes are modest and requests above
//! [`MAX_PRIME`] are refused instead of building an unbounded sieve.

use crate::error::CapacityError;

/// Largest size accepted by [`prime_below`]. It is itself prime.
pub const MAX_PRIME: usize = 1_301_081;

/// Bucket count used when a requested size is too small to hold a prime.
pub const DEFAULT_CAPACITY: usize = 11;

/// Bucket count of a table built with `HashTable::new()`.
pub const DEFAULT_BUCKETS: usize = 101;

/// Returns the largest prime `<= n`.
pub fn prime_below(n: usize) -> Result<usize, CapacityError> {
    if n > MAX_PRIME {
        return Err(CapacityError::TooLarge {
            requested: n,
            max: MAX_PRIME,
        });
    }
    if n == MAX_PRIME {
        return Ok(MAX_PRIME);
    }
    if n <= 1 {
        return Err(CapacityError::TooSmall { requested: n });
    }

    // 2 <= n < MAX_PRIME
    let sieve = sieve(n);
    Ok((2..=n).rev().find(|&i| sieve[i]).unwrap_or(2))
}

/// Next bucket count after `current` is exceeded, or `None` once growth is
/// capped at `MAX_PRIME`.
pub(crate) fn grown(current: usize) -> Option<usize> {
    if current >= MAX_PRIME {
        return None;
    }
    let target = current.saturating_mul(2).min(MAX_PRIME);
    prime_below(target).ok().filter(|&p| p > current)
}

// is_prime[i] for 0..=n
fn sieve(n: usize) -> Vec<bool> {
    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    if n >= 1 {
        is_prime[1] = false;
    }
    let mut i = 2;
    while i * i <= n {
        if is_prime[i] {
            for j in (i * i..=n).step_by(i) {
                is_prime[j] = false;
            }
        }
        i += 1;
    }
    is_prime
}
