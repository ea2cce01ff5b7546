use serde::Serialize;

use super::{Grid, Metadata};

/// Fallback progression duration used when a step has no usable duration
pub const DEFAULT_DURATION_YEARS: f64 = 2.0;

/// A named tariff: salary grid, progression durations and metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub grid: Grid,
    pub durations: Grid,
    pub metadata: Metadata,
}

impl Table {
    pub fn new(name: impl Into<String>, grid: Grid, durations: Grid, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            grid,
            durations,
            metadata,
        }
    }

    /// Years spent at `step` as listed in the duration grid.
    ///
    /// Missing and zero entries yield `None`; callers apply
    /// [`DEFAULT_DURATION_YEARS`].
    pub fn duration(&self, group: &str, step: &str) -> Option<f64> {
        self.durations
            .number(group, step)
            .filter(|years| *years != 0.0)
    }

    /// Version label, falling back to the table name
    pub fn version_label(&self) -> &str {
        self.metadata.version().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_lookup() {
        let mut durations = Grid::with_steps(vec!["1".into(), "2".into(), "3".into()]);
        durations.insert_row("E5", vec!["1".into(), "0".into(), "".into()]);
        let table = Table::new("T", Grid::default(), durations, Metadata::new());

        assert_eq!(table.duration("E5", "1"), Some(1.0));
        assert_eq!(table.duration("E5", "2"), None);
        assert_eq!(table.duration("E5", "3"), None);
        assert_eq!(table.duration("E9", "1"), None);
        assert_eq!(table.version_label(), "T");
    }
}
