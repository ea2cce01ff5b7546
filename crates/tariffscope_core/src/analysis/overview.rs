use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::model::{Cell, ReferenceMode};
use crate::pairing::delta;

/// Mean values of one step across all groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepAverage {
    pub step: String,
    #[serde(skip)]
    pub step_ordinal: Option<i64>,
    pub a: f64,
    pub b: f64,
    /// Mean signed delta under the active reference mode
    pub delta: f64,
}

/// Per-step averages sorted by step ordinal, steps without one last
pub fn step_averages(cells: &[Cell], mode: ReferenceMode) -> Vec<StepAverage> {
    let mut sums: Vec<(StepAverage, usize)> = Vec::new();
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();

    for cell in cells {
        let idx = *index.entry(cell.step.as_str()).or_insert_with(|| {
            sums.push((
                StepAverage {
                    step: cell.step.clone(),
                    step_ordinal: cell.step_ordinal,
                    a: 0.0,
                    b: 0.0,
                    delta: 0.0,
                },
                0,
            ));
            sums.len() - 1
        });
        let (acc, n) = &mut sums[idx];
        acc.a += cell.a;
        acc.b += cell.b;
        acc.delta += delta(cell, mode).abs;
        *n += 1;
    }

    let mut out: Vec<StepAverage> = sums
        .into_iter()
        .map(|(mut avg, n)| {
            let n = n as f64;
            avg.a /= n;
            avg.b /= n;
            avg.delta /= n;
            avg
        })
        .collect();
    out.sort_by_key(|s| s.step_ordinal.unwrap_or(i64::MAX));
    out
}

/// Headline figures of a filtered comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub steps: Vec<StepAverage>,
    pub max_a: f64,
    pub max_b: f64,
    /// Last step average minus first step average
    pub spread_a: f64,
    pub spread_b: f64,
    /// Spread divided by the number of step transitions
    pub mean_increase_a: f64,
    pub mean_increase_b: f64,
    /// Largest absolute delta in magnitude
    pub max_abs_delta: f64,
    /// Largest relative delta in magnitude, in percent
    pub max_rel_delta: f64,
}

pub fn overview(cells: &[Cell], mode: ReferenceMode) -> Option<Overview> {
    if cells.is_empty() {
        return None;
    }
    let steps = step_averages(cells, mode);
    let (spread_a, spread_b) = match (steps.first(), steps.last()) {
        (Some(first), Some(last)) => (last.a - first.a, last.b - first.b),
        _ => (0.0, 0.0),
    };
    let transitions = steps.len().saturating_sub(1) as f64;
    let per_step = |spread: f64| if transitions > 0.0 { spread / transitions } else { 0.0 };

    let (max_abs_delta, max_rel_delta) = cells.iter().fold((0.0_f64, 0.0_f64), |(abs, rel), c| {
        let d = delta(c, mode);
        (abs.max(d.abs.abs()), rel.max(d.rel.abs()))
    });

    Some(Overview {
        max_a: cells.iter().map(|c| c.a).fold(f64::NEG_INFINITY, f64::max),
        max_b: cells.iter().map(|c| c.b).fold(f64::NEG_INFINITY, f64::max),
        spread_a,
        spread_b,
        mean_increase_a: per_step(spread_a),
        mean_increase_b: per_step(spread_b),
        max_abs_delta,
        max_rel_delta,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{group_ordinal, leading_integer};

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
    fn test_step_averages_sorted_by_ordinal() {
        let cells = vec![
            cell("E1", "10", 300.0, 200.0),
            cell("E1", "2", 100.0, 100.0),
            cell("E2", "2", 300.0, 200.0),
        ];
        let steps = step_averages(&cells, ReferenceMode::AMinusB);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].step, "2");
        assert_eq!((steps[0].a, steps[0].b, steps[0].delta), (200.0, 150.0, 50.0));
        assert_eq!(steps[1].step, "10");
    }

    #[test]
    fn test_overview_kpis() {
        let cells = vec![
            cell("E1", "1", 2000.0, 2100.0),
            cell("E1", "2", 2200.0, 2150.0),
            cell("E1", "3", 2600.0, 2300.0),
        ];
        let o = overview(&cells, ReferenceMode::AMinusB).unwrap();
        assert_eq!(o.max_a, 2600.0);
        assert_eq!(o.max_b, 2300.0);
        assert_eq!(o.spread_a, 600.0);
        assert_eq!(o.spread_b, 200.0);
        assert_eq!(o.mean_increase_a, 300.0);
        assert_eq!(o.max_abs_delta, 300.0);
        assert!((o.max_rel_delta - 300.0 / 2300.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_step_has_no_increase() {
        let cells = vec![cell("E1", "1", 10.0, 5.0)];
        let o = overview(&cells, ReferenceMode::BMinusA).unwrap();
        assert_eq!((o.spread_a, o.mean_increase_a), (0.0, 0.0));
        assert_eq!(o.max_abs_delta, 5.0);
        assert!(overview(&[], ReferenceMode::AMinusB).is_none());
    }
}
