//! `AdHash` — incremental structural hashing.
//!
//! Computes `φ(S) = Σ f(k, v)` over all entries using wrapping arithmetic.
//! Two mixing seeds prevent degeneration when `hash(v) = 0`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// First mixing seed (golden ratio constant).
const SEED_1: u64 = 0x9E37_79B9_7F4A_7C15;

/// Second mixing seed (large prime).
const SEED_2: u64 = 0x517C_C1B7_2722_0A95;

/// Computes the 64-bit hash of a value using the standard hasher.
///
/// Used for `AdHash` mixing, where the full 64 bits of entropy are kept.
#[must_use]
pub fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Computes the 32-bit trie-routing hash of a key.
///
/// The trie addresses keys with 5-bit slices of a 32-bit hash (seven
/// levels, shifts `0..=30`). The ambient hasher produces 64 bits; the two
/// halves are xor-folded down to 32 so that high-order entropy from the
/// hasher still participates in the low slices used at shallow levels.
#[must_use]
pub fn hash_key<T: Hash>(value: &T) -> u32 {
    let h = hash_one(value);
    (((h >> 32) ^ h) & 0xFFFF_FFFF) as u32
}

/// Computes the `AdHash` contribution of a single entry.
///
/// `f(k, v) = key_hash · SEED₁ ⊕ value_hash · SEED₂`
#[must_use]
pub const fn entry_adhash(key_hash: u32, value_hash: u64) -> u64 {
    (key_hash as u64).wrapping_mul(SEED_1) ^ value_hash.wrapping_mul(SEED_2)
}
