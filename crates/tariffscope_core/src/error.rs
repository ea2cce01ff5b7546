use std::fmt;

use crate::simulation::YEARS_RANGE;

/// Errors from fetching a single resource from a table source
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{location}: HTTP status {status}")]
    Status { location: String, status: u16 },

    #[error("{location}: {message}")]
    Transport { location: String, message: String },

    #[error("{location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{location}: {message}")]
    Decode { location: String, message: String },
}

impl FetchError {
    /// The path or URL the failed fetch pointed at
    pub fn location(&self) -> &str {
        match self {
            FetchError::Status { location, .. }
            | FetchError::Transport { location, .. }
            | FetchError::Io { location, .. }
            | FetchError::Decode { location, .. } => location,
        }
    }

    /// Failure description without the location
    pub fn reason(&self) -> String {
        match self {
            FetchError::Status { status, .. } => format!("HTTP status {status}"),
            FetchError::Transport { message, .. } | FetchError::Decode { message, .. } => {
                message.clone()
            }
            FetchError::Io { source, .. } => source.to_string(),
        }
    }
}

/// One failed candidate during base resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub location: String,
    pub reason: String,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.location, self.reason)
    }
}

/// No candidate source exposed a usable, non-empty index listing
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not load index.json from any table source; tried: {}", join_attempts(.attempts))]
pub struct ResolutionError {
    pub attempts: Vec<Attempt>,
}

fn join_attempts(attempts: &[Attempt]) -> String {
    if attempts.is_empty() {
        return "no candidates configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Errors from the table loader
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("failed to load table '{name}': {source}")]
    Fetch {
        name: String,
        #[source]
        source: FetchError,
    },
}

/// Errors from the export adapter
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("delimited export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("delimited export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid SVG markup: {0}")]
    Svg(String),

    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("raster export is not available in this build")]
    RasterUnavailable,
}

/// Errors from the lifetime simulation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("group '{0}' has no comparable pay steps")]
    NoCells(String),

    #[error("projection length {0} is outside {min}..={max} years", min = YEARS_RANGE.0, max = YEARS_RANGE.1)]
    YearsOutOfRange(u32),
}

/// Errors from multi-table comparisons
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("at least two tables are required for comparison")]
    TooFewTables,

    #[error("baseline '{0}' must be one of the selected tables")]
    UnknownBaseline(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_lists_every_attempt() {
        let err = ResolutionError {
            attempts: vec![
                Attempt {
                    location: "./tables/index.json".to_string(),
                    reason: "not found".to_string(),
                },
                Attempt {
                    location: "https://mirror/tables/index.json".to_string(),
                    reason: "HTTP status 404".to_string(),
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("./tables/index.json (not found)"));
        assert!(msg.contains(" | https://mirror/tables/index.json (HTTP status 404)"));
    }

    #[test]
    fn test_resolution_error_without_candidates() {
        let err = ResolutionError { attempts: vec![] };
        assert!(err.to_string().ends_with("no candidates configured"));
    }

    #[test]
    fn test_fetch_error_location() {
        let err = FetchError::Status {
            location: "x/Table.csv".to_string(),
            status: 500,
        };
        assert_eq!(err.location(), "x/Table.csv");
        assert_eq!(err.to_string(), "x/Table.csv: HTTP status 500");
        assert_eq!(err.reason(), "HTTP status 500");
    }
}
