use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{Cell, Table, ZERO_REFERENCE_RELATIVE_DELTA};
use crate::numeric::parse_number;

/// Percent increase from the previous step, per side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepIncrease {
    pub step: String,
    pub a: f64,
    pub b: f64,
}

fn percent_increase(prev: f64, next: f64) -> f64 {
    if prev == 0.0 {
        ZERO_REFERENCE_RELATIVE_DELTA
    } else {
        (next - prev) / prev * 100.0
    }
}

/// Step-to-step increases of one group's step-sorted cells
pub fn group_progression(cells: &[&Cell]) -> Vec<StepIncrease> {
    cells
        .windows(2)
        .map(|pair| StepIncrease {
            step: pair[1].step.clone(),
            a: percent_increase(pair[0].a, pair[1].a),
            b: percent_increase(pair[0].b, pair[1].b),
        })
        .collect()
}

/// One pay step on a career timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionPoint {
    pub step: String,
    /// Years of service when the step is reached
    pub start_year: f64,
    pub duration_years: f64,
    pub salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionSeries {
    pub group: String,
    pub points: Vec<ProgressionPoint>,
}

/// Career timeline of every group of `table`.
///
/// Steps without a salary are skipped; a missing duration counts as zero
/// years here, so the next step starts at the same year.
pub fn progression_series(table: &Table) -> Vec<ProgressionSeries> {
    table
        .grid
        .groups()
        .filter_map(|group| {
            let mut year = 0.0;
            let points: Vec<ProgressionPoint> = table
                .grid
                .row_cells(group)
                .filter_map(|(step, raw)| {
                    let salary = parse_number(raw)?;
                    let duration = table.durations.number(group, step).unwrap_or(0.0);
                    let point = ProgressionPoint {
                        step: step.to_string(),
                        start_year: year,
                        duration_years: duration,
                        salary,
                    };
                    year += duration;
                    Some(point)
                })
                .collect();
            (!points.is_empty()).then(|| ProgressionSeries {
                group: group.to_string(),
                points,
            })
        })
        .collect()
}

/// Timelines of one group in two tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPair {
    pub group: String,
    pub base: Vec<ProgressionPoint>,
    pub compare: Vec<ProgressionPoint>,
}

/// Timelines of the groups both tables describe, sorted by group id
pub fn progression_graph(base: &Table, compare: &Table) -> Vec<SeriesPair> {
    let compare_series = progression_series(compare);
    let mut pairs: Vec<SeriesPair> = progression_series(base)
        .into_iter()
        .filter_map(|series| {
            let other = compare_series.iter().find(|s| s.group == series.group)?;
            Some(SeriesPair {
                group: series.group,
                base: series.points,
                compare: other.points.clone(),
            })
        })
        .collect();
    pairs.sort_by(|x, y| x.group.cmp(&y.group));
    pairs
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDurations {
    pub step: String,
    pub base_years: f64,
    pub compare_years: f64,
    /// `compare_years - base_years`
    pub delta_years: f64,
}

/// Duration rules of one group compared across two tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupLogic {
    pub group: String,
    pub steps: Vec<StepDurations>,
    pub base_total_years: f64,
    pub compare_total_years: f64,
    pub delta_total_years: f64,
}

/// Shorter step ids first, then lexical: "2" < "10" < "Ü1"
fn step_order(x: &&str, y: &&str) -> Ordering {
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Compare the duration grids of two tables.
///
/// Covers groups and steps present in both duration grids. Steps where
/// either side lacks a number are left out, and groups left with no steps
/// are dropped.
pub fn progression_logic(base: &Table, compare: &Table) -> Vec<GroupLogic> {
    let mut groups: Vec<&str> = base
        .durations
        .groups()
        .filter(|g| compare.durations.contains_group(g))
        .collect();
    groups.sort_unstable();

    let mut steps: Vec<&str> = base
        .durations
        .steps()
        .iter()
        .map(String::as_str)
        .filter(|s| compare.durations.steps().iter().any(|o| o == *s))
        .collect();
    steps.sort_by(step_order);

    groups
        .into_iter()
        .filter_map(|group| {
            let rows: Vec<StepDurations> = steps
                .iter()
                .filter_map(|step| {
                    let base_years = base.durations.number(group, step)?;
                    let compare_years = compare.durations.number(group, step)?;
                    Some(StepDurations {
                        step: step.to_string(),
                        base_years,
                        compare_years,
                        delta_years: compare_years - base_years,
                    })
                })
                .collect();
            if rows.is_empty() {
                return None;
            }
            let base_total_years: f64 = rows.iter().map(|r| r.base_years).sum();
            let compare_total_years: f64 = rows.iter().map(|r| r.compare_years).sum();
            Some(GroupLogic {
                group: group.to_string(),
                steps: rows,
                base_total_years,
                compare_total_years,
                delta_total_years: compare_total_years - base_total_years,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::parse_table;

    fn table(name: &str, grid: &str, adv: &str) -> Table {
        parse_table(name, grid, adv, "key,value\n").unwrap()
    }

    #[test]
    fn test_group_progression_percentages() {
        let cells = [
            Cell {
                group: "E1".into(),
                group_ordinal: Some(1),
                step: "1".into(),
                step_ordinal: Some(1),
                a: 1000.0,
                b: 0.0,
            },
            Cell {
                group: "E1".into(),
                group_ordinal: Some(1),
                step: "2".into(),
                step_ordinal: Some(2),
                a: 1100.0,
                b: 500.0,
            },
        ];
        let refs: Vec<&Cell> = cells.iter().collect();
        let prog = group_progression(&refs);
        assert_eq!(prog.len(), 1);
        assert_eq!(prog[0].step, "2");
        assert!((prog[0].a - 10.0).abs() < 1e-9);
        assert_eq!(prog[0].b, 0.0);
    }

    #[test]
    fn test_progression_series_accumulates_years() {
        let t = table("A", "EG,1,2,3\nE1,100,,300\nE2,,,\n", "EG,1,2,3\nE1,2,3,\n");
        let series = progression_series(&t);
        assert_eq!(series.len(), 1);
        let points = &series[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].start_year, points[0].duration_years), (0.0, 2.0));
        assert_eq!((points[1].step.as_str(), points[1].start_year), ("3", 2.0));
        assert_eq!(points[1].duration_years, 0.0);
    }

    #[test]
    fn test_progression_graph_common_groups_sorted() {
        let a = table("A", "EG,1\nE9,1\nE1,1\n", "EG,1\n");
        let b = table("B", "EG,1\nE1,2\nE9,2\nE5,2\n", "EG,1\n");
        let groups: Vec<_> = progression_graph(&a, &b).into_iter().map(|p| p.group).collect();
        assert_eq!(groups, vec!["E1", "E9"]);
    }

    #[test]
    fn test_progression_logic_totals() {
        let a = table("A", "EG,1\n", "EG,10,2,1\nE1,4,2,1\nE2,1,1,1\n");
        let b = table("B", "EG,1\n", "EG,1,2,10,11\nE1,1,3,5,9\nE3,1,1,1,1\n");
        let logic = progression_logic(&a, &b);

        assert_eq!(logic.len(), 1);
        let e1 = &logic[0];
        let steps: Vec<_> = e1.steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(steps, vec!["1", "2", "10"]);
        assert_eq!(e1.base_total_years, 7.0);
        assert_eq!(e1.compare_total_years, 9.0);
        assert_eq!(e1.delta_total_years, 2.0);
        assert_eq!(e1.steps[2].delta_years, 1.0);
    }
}
