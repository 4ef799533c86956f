//! Fast hash collections.
//!
//! Re-exports of the AHash-backed map and set used throughout Berth.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
