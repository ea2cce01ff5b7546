//! Scenario tests across loading, pairing and rendering
//!
//! Tests are organized by topic:
//! - `fixtures` - Temporary table trees on disk
//! - `loading` - Candidate resolution, caching and allowance lookup
//! - `dashboard` - End-to-end recomputation from a local tree
//! - `comparison` - Multi-table comparison payloads
//! - `export` - Delimited and raster export of recomputed cells

mod fixtures;
