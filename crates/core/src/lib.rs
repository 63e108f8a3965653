//! Core types for tasklens change detection
//!
//! This crate provides:
//! - BLAKE3 content hashing
//! - File fingerprints (content hash or size + mtime)
//! - The three-way `ChangeSet`
//! - The persisted fingerprint store
//! - Detection configuration and the shared error taxonomy

pub mod changeset;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod hash;
pub mod store;

// Re-exports
pub use changeset::{ChangeKind, ChangeSet};
pub use config::{DetectConfig, FingerprintMode, MatchPolicy, StrategyPreference};
pub use error::{DetectError, Result};
pub use fingerprint::Fingerprint;
pub use hash::Blake3Hash;
pub use store::{normalize_path, FingerprintMap, FingerprintStore};
