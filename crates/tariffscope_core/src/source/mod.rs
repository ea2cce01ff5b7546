//! Table sources and the caching loader.
//!
//! A [`TableSource`] fetches text files relative to a base location. The
//! [`TableLoader`] probes an ordered list of candidate sources for a
//! non-empty `index.json`, keeps the first that answers, and caches every
//! table it loads from it for the rest of the session.
//!
//! - [`LocalDir`]: a directory on the local filesystem
//! - [`HttpMirror`]: an HTTP(S) base URL, e.g. a raw GitHub mirror (feature `remote`)

mod fallback;
mod index;
mod loader;
mod local;

#[cfg(feature = "remote")]
mod http;

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use crate::error::FetchError;

pub use fallback::{FallbackError, try_in_order};
pub use index::{IndexError, parse_index};
pub use loader::{AllowanceTable, TableLoader};
pub use local::LocalDir;

#[cfg(feature = "remote")]
pub use http::{DEFAULT_PROBE_TIMEOUT, HttpMirror};

/// Index listing file name at the base of a source
pub const INDEX_FILE: &str = "index.json";
/// Salary grid file name inside a table directory
pub const TABLE_FILE: &str = "Table.csv";
/// Progression duration grid file name inside a table directory
pub const ADVANCEMENT_FILE: &str = "Adv.csv";
/// Metadata file name inside a table directory
pub const META_FILE: &str = "Meta.csv";
/// Directory next to the tables tree holding allowance tables
pub const DEFAULT_ALLOWANCES_SEGMENT: &str = "allowances";

/// Read-only access to text files below a base location.
pub trait TableSource: fmt::Display + Send + Sync {
    /// Fetch the file at `segments` below the base, one path segment per entry.
    fn fetch_text(&self, segments: &[&str]) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Fetch the index listing; sources may apply probe-specific limits here.
    fn probe_index(&self) -> impl Future<Output = Result<String, FetchError>> + Send {
        self.fetch_text(&[INDEX_FILE])
    }

    /// The same kind of source with the last base segment replaced by `segment`.
    fn sibling(&self, segment: &str) -> Self
    where
        Self: Sized;
}

/// Any of the built-in sources
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Local(LocalDir),
    #[cfg(feature = "remote")]
    Http(HttpMirror),
}

impl Source {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Source::Local(LocalDir::new(path))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(s) => fmt::Display::fmt(s, f),
            #[cfg(feature = "remote")]
            Source::Http(s) => fmt::Display::fmt(s, f),
        }
    }
}

impl TableSource for Source {
    async fn fetch_text(&self, segments: &[&str]) -> Result<String, FetchError> {
        match self {
            Source::Local(s) => s.fetch_text(segments).await,
            #[cfg(feature = "remote")]
            Source::Http(s) => s.fetch_text(segments).await,
        }
    }

    async fn probe_index(&self) -> Result<String, FetchError> {
        match self {
            Source::Local(s) => s.probe_index().await,
            #[cfg(feature = "remote")]
            Source::Http(s) => s.probe_index().await,
        }
    }

    fn sibling(&self, segment: &str) -> Self {
        match self {
            Source::Local(s) => Source::Local(s.sibling(segment)),
            #[cfg(feature = "remote")]
            Source::Http(s) => Source::Http(s.sibling(segment)),
        }
    }
}

/// Drop repeated candidates, keeping the first occurrence.
pub fn dedup_candidates<S: PartialEq>(candidates: Vec<S>) -> Vec<S> {
    let mut out: Vec<S> = Vec::with_capacity(candidates.len());
    for c in candidates {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}
