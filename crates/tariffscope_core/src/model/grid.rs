use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::numeric::parse_number;

/// One group row of a [`Grid`], aligned with the grid's step header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub group: String,
    pub values: Vec<String>,
}

/// Two-level table indexed by group id and step id.
///
/// Cells hold the raw text from the source file. Group order follows the file,
/// step order follows the header; lookups go through hash indexes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grid {
    steps: Vec<String>,
    rows: Vec<GridRow>,
    #[serde(skip)]
    step_index: FxHashMap<String, usize>,
    #[serde(skip)]
    group_index: FxHashMap<String, usize>,
}

impl Grid {
    /// Create an empty grid with the given step header
    pub fn with_steps(steps: Vec<String>) -> Self {
        let step_index = steps
            .iter()
            .enumerate()
            .map(|(idx, step)| (step.clone(), idx))
            .collect();
        Self {
            steps,
            rows: Vec::new(),
            step_index,
            group_index: FxHashMap::default(),
        }
    }

    /// Insert a group row. Missing trailing cells become empty strings, extra
    /// cells are dropped. A repeated group id replaces the earlier row.
    pub fn insert_row(&mut self, group: impl Into<String>, mut values: Vec<String>) {
        let group = group.into();
        values.resize(self.steps.len(), String::new());
        let row = GridRow {
            group: group.clone(),
            values,
        };
        match self.group_index.get(&group) {
            Some(&idx) => self.rows[idx] = row,
            None => {
                self.group_index.insert(group, self.rows.len());
                self.rows.push(row);
            }
        }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.group.as_str())
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.group_index.contains_key(group)
    }

    pub fn row(&self, group: &str) -> Option<&GridRow> {
        self.group_index.get(group).map(|&idx| &self.rows[idx])
    }

    /// Raw cell text at (group, step)
    pub fn get(&self, group: &str, step: &str) -> Option<&str> {
        let row = self.row(group)?;
        let idx = *self.step_index.get(step)?;
        row.values.get(idx).map(String::as_str)
    }

    /// Parsed cell value at (group, step)
    pub fn number(&self, group: &str, step: &str) -> Option<f64> {
        self.get(group, step).and_then(parse_number)
    }

    /// Iterate (step, raw value) pairs of one group row in header order
    pub fn row_cells<'a>(
        &'a self,
        group: &str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + use<'a> {
        let row = self.row(group);
        self.steps.iter().enumerate().filter_map(move |(idx, step)| {
            row.and_then(|r| r.values.get(idx))
                .map(|value| (step.as_str(), value.as_str()))
        })
    }

    /// Every numeric value in the grid, row by row
    pub fn numeric_values(&self) -> Vec<f64> {
        self.rows
            .iter()
            .flat_map(|row| row.values.iter())
            .filter_map(|raw| parse_number(raw))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
