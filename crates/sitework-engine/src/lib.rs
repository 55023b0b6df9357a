//! The activity engine: the write path that turns entity mutations into
//! persisted activity records, and the read path that serves role-filtered
//! feeds and read-state changes.
//!
//! Generic over any [`sitework_core::store::ActivityStore`] backend.

pub mod error;
pub mod feed;
pub mod log;
pub mod read_state;
pub mod recorder;
pub mod update;

pub use error::{Error, Result};
pub use log::ActivityLog;
