//! Runtime layer for the Olympics dashboard.
//!
//! Owns the shared snapshot cache over the CSV data directory and the
//! per-session state that turns a filter selection into page models.

pub mod data_manager;
pub mod session;
pub mod snapshot;

pub use olympics_core as core;
pub use olympics_data as data;
