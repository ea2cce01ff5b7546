//! Pairing of two tariffs by (group, step), range filters and deltas.

use serde::{Deserialize, Serialize};

use crate::model::{Cell, Delta, ReferenceMode, Table, ZERO_REFERENCE_RELATIVE_DELTA};
use crate::numeric::{group_ordinal, leading_integer, parse_number, parse_ordinal_list};

/// Default inclusive group ordinal range
pub const DEFAULT_GROUP_RANGE: (f64, f64) = (1.0, 99.0);
/// Default inclusive step ordinal range
pub const DEFAULT_STEP_RANGE: (f64, f64) = (1.0, 99.0);

/// Every (group, step) where both tables hold a numeric salary.
///
/// Groups follow A's file order, steps follow A's header. Cells that are
/// empty or non-numeric on either side are skipped.
pub fn extract_pairs(a: &Table, b: &Table) -> Vec<Cell> {
    let mut cells = Vec::new();
    for group in a.grid.groups() {
        if !b.grid.contains_group(group) {
            continue;
        }
        let group_num = group_ordinal(group);
        for (step, raw_a) in a.grid.row_cells(group) {
            let Some(value_a) = parse_number(raw_a) else {
                continue;
            };
            let Some(value_b) = b.grid.number(group, step) else {
                continue;
            };
            cells.push(Cell {
                group: group.to_string(),
                group_ordinal: group_num,
                step: step.to_string(),
                step_ordinal: leading_integer(step),
                a: value_a,
                b: value_b,
            });
        }
    }
    cells
}

/// Range and allow-list filters over group and step ordinals.
///
/// Unset, zero or non-finite bounds fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub group_from: Option<f64>,
    pub group_to: Option<f64>,
    pub step_from: Option<f64>,
    pub step_to: Option<f64>,
    /// Comma-separated group ordinals; when non-empty, ANDed with the ranges
    pub explicit_groups: String,
}

fn bound(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(default)
}

impl Filters {
    pub fn group_range(&self) -> (f64, f64) {
        (
            bound(self.group_from, DEFAULT_GROUP_RANGE.0),
            bound(self.group_to, DEFAULT_GROUP_RANGE.1),
        )
    }

    pub fn step_range(&self) -> (f64, f64) {
        (
            bound(self.step_from, DEFAULT_STEP_RANGE.0),
            bound(self.step_to, DEFAULT_STEP_RANGE.1),
        )
    }

    pub fn explicit_group_list(&self) -> Vec<i64> {
        parse_ordinal_list(&self.explicit_groups)
    }

    fn matches(&self, cell: &Cell, explicit: &[i64]) -> bool {
        let (g_from, g_to) = self.group_range();
        let (s_from, s_to) = self.step_range();

        let group_ok = cell
            .group_ordinal
            .is_none_or(|g| (g as f64) >= g_from && (g as f64) <= g_to);
        let step_ok = cell
            .step_ordinal
            .is_some_and(|s| (s as f64) >= s_from && (s as f64) <= s_to);
        let in_range = group_ok && step_ok;

        if explicit.is_empty() {
            in_range
        } else {
            in_range && cell.group_ordinal.is_some_and(|g| explicit.contains(&g))
        }
    }
}

/// Keep the cells passing `filters`, preserving order.
pub fn apply_filters(cells: Vec<Cell>, filters: &Filters) -> Vec<Cell> {
    let explicit = filters.explicit_group_list();
    cells
        .into_iter()
        .filter(|cell| filters.matches(cell, &explicit))
        .collect()
}

/// Signed difference and percentage for `cell` under `mode`.
pub fn delta(cell: &Cell, mode: ReferenceMode) -> Delta {
    let a_minus_b = cell.a - cell.b;
    let (abs, reference) = match mode {
        ReferenceMode::AMinusB => (a_minus_b, cell.b),
        ReferenceMode::BMinusA => (-a_minus_b, cell.a),
    };
    let rel = if reference == 0.0 {
        ZERO_REFERENCE_RELATIVE_DELTA
    } else {
        abs / reference * 100.0
    };
    Delta { abs, rel }
}

/// Distinct group ids of `cells` in first-seen order
pub fn groups_of(cells: &[Cell]) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for cell in cells {
        if !groups.iter().any(|g| g == &cell.group) {
            groups.push(cell.group.clone());
        }
    }
    groups
}

/// Cells of one group sorted by step ordinal
pub fn group_cells<'a>(cells: &'a [Cell], group: &str) -> Vec<&'a Cell> {
    let mut selected: Vec<&Cell> = cells.iter().filter(|c| c.group == group).collect();
    selected.sort_by_key(|c| c.step_key());
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grid, Metadata};

    fn table(name: &str, rows: &[(&str, &[&str])]) -> Table {
        let mut grid = Grid::with_steps(vec!["1".into(), "2".into(), "3".into()]);
        for (group, values) in rows {
            grid.insert_row(*group, values.iter().map(|v| v.to_string()).collect());
        }
        Table::new(name, grid, Grid::default(), Metadata::new())
    }

    fn cell(group: &str, step: &str, a: f64, b: f64) -> Cell {
        Cell {
            group: group.to_string(),
            group_ordinal: group_ordinal(group),
            step: step.to_string(),
            step_ordinal: leading_integer(step),
            a,
            b,
        }
    }

    #[test]
    fn test_extract_pairs_skips_empty_side() {
        let mut a_grid = Grid::with_steps(vec!["S1".into()]);
        a_grid.insert_row("G1", vec!["1000".into()]);
        let mut b_grid = Grid::with_steps(vec!["S1".into()]);
        b_grid.insert_row("G1", vec!["".into()]);
        let a = Table::new("A", a_grid, Grid::default(), Metadata::new());
        let b = Table::new("B", b_grid, Grid::default(), Metadata::new());

        assert!(extract_pairs(&a, &b).is_empty());
    }

    #[test]
    fn test_extract_pairs_common_groups_only() {
        let a = table(
            "A",
            &[("E1", &["100", "110", "x"]), ("E2", &["200", "210", "220"])],
        );
        let b = table("B", &[("E2", &["190", "", "230,5"]), ("E1", &["90"])]);

        let cells = extract_pairs(&a, &b);
        let keys: Vec<_> = cells.iter().map(|c| (c.group.as_str(), c.step.as_str())).collect();
        assert_eq!(keys, vec![("E1", "1"), ("E2", "1"), ("E2", "3")]);
        assert_eq!(cells[2].b, 230.5);
        assert_eq!(cells[1].group_ordinal, Some(2));
        assert_eq!(cells[1].step_ordinal, Some(1));
    }

    #[test]
    fn test_filter_defaults_and_ranges() {
        let cells = vec![
            cell("E1", "1", 1.0, 1.0),
            cell("E5", "2", 1.0, 1.0),
            cell("E12", "6", 1.0, 1.0),
            cell("Azubi", "1", 1.0, 1.0),
            cell("E3", "Ü", 1.0, 1.0),
        ];

        let all = apply_filters(cells.clone(), &Filters::default());
        assert_eq!(all.len(), 4, "only the step without ordinal is dropped");

        let filters = Filters {
            group_from: Some(2.0),
            group_to: Some(10.0),
            step_to: Some(f64::NAN),
            ..Default::default()
        };
        let groups: Vec<_> = apply_filters(cells, &filters)
            .into_iter()
            .map(|c| c.group)
            .collect();
        assert_eq!(groups, vec!["E5", "Azubi"]);
    }

    #[test]
    fn test_explicit_groups_and_with_ranges() {
        let cells = vec![
            cell("E5", "1", 1.0, 1.0),
            cell("E9", "1", 1.0, 1.0),
            cell("E13", "1", 1.0, 1.0),
            cell("Azubi", "1", 1.0, 1.0),
        ];
        let filters = Filters {
            group_to: Some(10.0),
            explicit_groups: "9, 13".to_string(),
            ..Default::default()
        };

        let groups: Vec<_> = apply_filters(cells, &filters)
            .into_iter()
            .map(|c| c.group)
            .collect();
        assert_eq!(groups, vec!["E9"]);
    }

    #[test]
    fn test_delta_modes_are_antisymmetric() {
        let c = cell("E1", "1", 3300.0, 3000.0);

        let ab = delta(&c, ReferenceMode::AMinusB);
        let ba = delta(&c, ReferenceMode::BMinusA);

        assert_eq!(ab.abs, 300.0);
        assert_eq!(ba.abs, -300.0);
        assert_eq!(ab.abs, -ba.abs);
        assert!((ab.rel - 10.0).abs() < 1e-9);
        assert!((ba.rel - (-300.0 / 3300.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_delta_zero_reference() {
        let c = cell("E1", "1", 100.0, 0.0);
        assert_eq!(delta(&c, ReferenceMode::AMinusB).rel, 0.0);
        assert_eq!(delta(&c, ReferenceMode::BMinusA).rel, -100.0);
    }

    #[test]
    fn test_group_helpers() {
        let cells = vec![
            cell("E2", "3", 1.0, 1.0),
            cell("E1", "1", 1.0, 1.0),
            cell("E2", "1", 1.0, 1.0),
        ];
        assert_eq!(groups_of(&cells), vec!["E2", "E1"]);
        let steps: Vec<_> = group_cells(&cells, "E2").iter().map(|c| c.step.as_str()).collect();
        assert_eq!(steps, vec!["1", "3"]);
    }
}
