//! Shared types for the Olympics analytics dashboard.
//!
//! Holds the error type, the in-memory [`table::Table`] frame, the semantic
//! column roles, typed records and the user's filter selection.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod roles;
pub mod selection;
pub mod table;

pub use error::{DashboardError, Result};
