//! Background Tasks Module
//!
//! Contains tasks that run off the response path.
//!
//! # Tasks
//! - Refresh: stale-while-revalidate's unawaited fetch-and-store

mod refresh;

pub use refresh::spawn_refresh;
