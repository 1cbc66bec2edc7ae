//! A key/value cache map with a process-wide time-to-live and lazy expiration.
//!
//! Expired entries are swept on access rather than by a background task; see
//! [`cache::map::TtlCacheMap`] for the single-owner container and
//! [`cache::shared::SharedTtlCacheMap`] for the coarse-locked handle.

pub mod cache;
pub mod clock;
