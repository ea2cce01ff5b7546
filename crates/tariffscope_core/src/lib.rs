//! Tariff comparison library
//!
//! This crate loads salary tables (per job group and pay step) for named
//! tariffs and compares them. It supports:
//! - Resolving a table source from an ordered list of local and remote candidates
//! - Pairing two tariffs cell by cell with range and allow-list filters
//! - Absolute and relative deltas against a selectable reference side
//! - Descriptive statistics, correlation and histograms
//! - Multi-year lifetime earnings simulation across pay steps
//! - SVG/HTML rendering and CSV/TSV/PNG export
//!
//! # Pipeline
//!
//! ```ignore
//! use tariffscope_core::pipeline::{Selections, load_and_recompute};
//! use tariffscope_core::source::{Source, TableLoader};
//!
//! let loader = TableLoader::new(vec![Source::local("./tables")]);
//! let selections = Selections::for_pair("TV-L", "TVöD-VKA");
//! let outcome = load_and_recompute(&loader, &selections).await?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod adapter;
pub mod analysis;
pub mod error;
pub mod export;
pub mod numeric;
pub mod pairing;
pub mod pipeline;
pub mod simulation;
pub mod source;
pub mod stats;

// ============================================================================
// Type definition and presentation modules
// ============================================================================

pub mod model;
pub mod render;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{
    CompareError, ExportError, FetchError, LoadError, ResolutionError, SimulationError,
};
pub use model::{Cell, Delta, Grid, Metadata, ReferenceMode, Side, SimulationStep, Table};
pub use pipeline::{
    Dashboard, Recomputed, Selections, compare_many, load_and_recompute, recompute,
};
pub use source::{Source, TableLoader, TableSource};
pub use stats::{Summary, correlation, describe};
