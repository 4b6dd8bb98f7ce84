//! Error types for fallible map operations.

use thiserror::Error;

/// Errors produced by [`ChampMap`](crate::ChampMap)/[`Transient`](crate::Transient)
/// operations that can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChampError {
    /// `insert_strict` was called with a key that is already present.
    #[error("key already present")]
    KeyAlreadyPresent,
    /// A transient was used after it had already been converted back to a
    /// persistent map via `persistent()`.
    #[error("transient used after persistent()")]
    TransientDead,
    /// A transient was used from a thread other than the one that created it.
    #[error("transient accessed from a non-owning thread")]
    NonOwnerAccess,
    /// A three-way merge hit a key that changed incompatibly on both sides
    /// and the caller's conflict function reported failure.
    #[error("merge conflict: {0}")]
    Conflict(String),
    /// A `TinyMap` insert would exceed capacity or saturate the bitmap;
    /// the caller should `promote()` first and insert into the result.
    #[error("tiny-map insert requires promotion to ChampMap first")]
    PromotionRequired,
}
