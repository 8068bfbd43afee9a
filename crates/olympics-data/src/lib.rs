//! Data layer for the Olympics dashboard.
//!
//! Reads the CSV datasets, resolves their heterogeneous column names into a
//! canonical schema, enriches medal tables with country and continent
//! metadata, and exposes the pure filter/aggregate functions every page is
//! built from.

pub mod analysis;
pub mod continents;
pub mod extract;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod resolver;

pub use olympics_core as core;
