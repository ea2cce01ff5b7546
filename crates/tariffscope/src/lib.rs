//! Terminal dashboard for comparing salary tables
//!
//! This crate wraps `tariffscope_core` in a ratatui interface and a small CLI.
//! It supports:
//! - Five dashboard tabs over one recomputed tariff pair
//! - Cycling tariffs, groups, reference side and simulation parameters by key
//! - CSV, TSV and PNG export into the data directory
//! - Listing and JSON comparison subcommands

// ============================================================================
// Application modules
// ============================================================================

pub mod app;
pub mod cli;
pub mod commands;
pub mod export;
pub mod logging;
pub mod settings;

// ============================================================================
// Interface modules
// ============================================================================

pub mod components;
pub mod screens;
pub mod state;
pub mod util;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use app::App;
pub use logging::init_logging;
pub use settings::Settings;
