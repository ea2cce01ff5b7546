//! Lifetime earnings projection for one job group.
//!
//! The simulation walks the group's pay steps year by year. Each step lasts
//! its progression duration; the final step is held for the rest of the
//! projection.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::model::metadata::keys;
use crate::model::{Cell, DEFAULT_DURATION_YEARS, Metadata, SimulationStep, Table};

/// Inclusive bounds of a projection's length in years
pub const YEARS_RANGE: (u32, u32) = (1, 60);

/// Which monthly components count toward compensation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Components {
    pub base_salary: bool,
    /// Year-end bonus, a percentage of salary spread over twelve months
    pub year_end_bonus: bool,
    /// Flat monthly savings-plan payment
    pub savings_plan: bool,
    /// Flat monthly allowance
    pub flat_allowance: bool,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            base_salary: true,
            year_end_bonus: false,
            savings_plan: false,
            flat_allowance: false,
        }
    }
}

/// Source of the years spent at each pay step
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    /// Durations from the tariff's progression grid
    #[default]
    Advancement,
    /// A fixed [`DEFAULT_DURATION_YEARS`] for every step
    Standard,
    /// A user supplied duration for every step
    Custom { years: f64 },
}

impl TimeMode {
    pub fn label(&self) -> String {
        match self {
            TimeMode::Advancement => "Stufenlaufzeit".to_string(),
            TimeMode::Standard => format!("Standard ({DEFAULT_DURATION_YEARS} J.)"),
            TimeMode::Custom { years } => format!("Individuell ({years} J.)"),
        }
    }

    /// Cycle Advancement -> Standard -> Custom -> Advancement
    pub fn next(self, custom_years: f64) -> Self {
        match self {
            TimeMode::Advancement => TimeMode::Standard,
            TimeMode::Standard => TimeMode::Custom {
                years: custom_years,
            },
            TimeMode::Custom { .. } => TimeMode::Advancement,
        }
    }
}

/// Years spent at (group, step) under `mode`
pub fn duration_years(table: &Table, group: &str, step: &str, mode: TimeMode) -> f64 {
    match mode {
        TimeMode::Advancement => table.duration(group, step).unwrap_or(DEFAULT_DURATION_YEARS),
        TimeMode::Standard => DEFAULT_DURATION_YEARS,
        TimeMode::Custom { years } => {
            if years.is_finite() && years != 0.0 {
                years
            } else {
                DEFAULT_DURATION_YEARS
            }
        }
    }
}

/// Monthly compensation for a salary under the enabled components
pub fn monthly_compensation(salary: f64, metadata: &Metadata, components: Components) -> f64 {
    let mut total = 0.0;
    if components.base_salary {
        total += salary;
    }
    if components.savings_plan {
        total += metadata.number_or_zero(keys::SAVINGS_PLAN_MONTHLY);
    }
    if components.flat_allowance {
        total += metadata.number_or_zero(keys::FLAT_ALLOWANCE_MONTHLY);
    }
    if components.year_end_bonus {
        let percent = metadata.number_or_zero(keys::YEAR_END_BONUS_PERCENT);
        total += salary * (percent / 100.0) / 12.0;
    }
    total
}

/// Part-time factor to apply; zero or non-finite counts as full time
pub fn effective_work_factor(factor: f64) -> f64 {
    if factor.is_finite() && factor != 0.0 {
        factor
    } else {
        1.0
    }
}

/// Parameters of one projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// 1-based pay step to start from
    pub start_step: u32,
    pub years: u32,
    /// Part-time factor applied to every annual amount
    pub work_factor: f64,
    pub components: Components,
    pub time_mode: TimeMode,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            start_step: 1,
            years: 10,
            work_factor: 1.0,
            components: Components::default(),
            time_mode: TimeMode::default(),
        }
    }
}

/// Project cumulative earnings over `params.years` years.
///
/// `cells` are the comparable steps of one group in step order. Durations are
/// taken from `progression` (tariff A). Returns exactly `params.years` steps;
/// a length outside [`YEARS_RANGE`] is an error.
pub fn simulate(
    cells: &[&Cell],
    progression: &Table,
    meta_a: &Metadata,
    meta_b: &Metadata,
    params: &SimulationParams,
) -> Result<Vec<SimulationStep>, SimulationError> {
    if !(YEARS_RANGE.0..=YEARS_RANGE.1).contains(&params.years) {
        return Err(SimulationError::YearsOutOfRange(params.years));
    }
    let Some(first) = cells.first() else {
        return Err(SimulationError::NoCells(String::new()));
    };
    let group = first.group.as_str();
    let last_index = cells.len() - 1;
    let factor = effective_work_factor(params.work_factor);

    let mut index = (params.start_step.saturating_sub(1) as usize).min(last_index);
    let mut remaining = duration_years(progression, group, &cells[index].step, params.time_mode);
    let mut cumulative_a = 0.0;
    let mut cumulative_b = 0.0;
    let mut out = Vec::with_capacity(params.years as usize);

    for year in 1..=params.years {
        let cell = cells[index];
        let annual_a = monthly_compensation(cell.a, meta_a, params.components) * 12.0 * factor;
        let annual_b = monthly_compensation(cell.b, meta_b, params.components) * 12.0 * factor;
        cumulative_a += annual_a;
        cumulative_b += annual_b;
        out.push(SimulationStep {
            year,
            step: cell.step.clone(),
            annual_a,
            annual_b,
            annual_delta: annual_a - annual_b,
            cumulative_a,
            cumulative_b,
            cumulative_delta: cumulative_a - cumulative_b,
        });

        remaining -= 1.0;
        if remaining <= 0.0 && index < last_index {
            index += 1;
            remaining = duration_years(progression, group, &cells[index].step, params.time_mode);
        }
    }

    tracing::debug!(group, years = params.years, "simulation complete");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grid;

    fn cell(step: &str, a: f64, b: f64) -> Cell {
        Cell {
            group: "E9".to_string(),
            group_ordinal: Some(9),
            step: step.to_string(),
            step_ordinal: step.parse().ok(),
            a,
            b,
        }
    }

    fn progression(durations: &[&str]) -> Table {
        let steps = (1..=durations.len()).map(|s| s.to_string()).collect();
        let mut grid = Grid::with_steps(steps);
        grid.insert_row("E9", durations.iter().map(|d| d.to_string()).collect());
        Table::new("A", Grid::default(), grid, Metadata::new())
    }

    fn steps_of(result: &[SimulationStep]) -> Vec<&str> {
        result.iter().map(|s| s.step.as_str()).collect()
    }

    #[test]
    fn test_never_advances_past_final_step() {
        let cells = [cell("1", 3000.0, 2900.0), cell("2", 3200.0, 3000.0)];
        let refs: Vec<&Cell> = cells.iter().collect();
        let params = SimulationParams {
            years: 5,
            ..Default::default()
        };

        let result = simulate(
            &refs,
            &progression(&["2", "2"]),
            &Metadata::new(),
            &Metadata::new(),
            &params,
        )
        .unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(steps_of(&result), vec!["1", "1", "2", "2", "2"]);
        assert_eq!(result[0].annual_a, 36_000.0);
        assert_eq!(result[4].cumulative_a, 2.0 * 36_000.0 + 3.0 * 38_400.0);
        assert_eq!(result[4].cumulative_delta, result[4].cumulative_a - result[4].cumulative_b);
    }

    #[test]
    fn test_missing_duration_falls_back() {
        let cells = [cell("1", 1.0, 1.0), cell("2", 1.0, 1.0), cell("3", 1.0, 1.0)];
        let refs: Vec<&Cell> = cells.iter().collect();
        let params = SimulationParams {
            years: 4,
            ..Default::default()
        };

        let result = simulate(
            &refs,
            &progression(&["1", "", "1"]),
            &Metadata::new(),
            &Metadata::new(),
            &params,
        )
        .unwrap();
        assert_eq!(steps_of(&result), vec!["1", "2", "2", "3"]);
    }

    #[test]
    fn test_start_step_and_time_modes() {
        let cells = [cell("1", 1.0, 1.0), cell("2", 1.0, 1.0), cell("3", 1.0, 1.0)];
        let refs: Vec<&Cell> = cells.iter().collect();
        let table = progression(&["5", "5", "5"]);
        let meta = Metadata::new();

        let standard = SimulationParams {
            start_step: 2,
            years: 3,
            time_mode: TimeMode::Standard,
            ..Default::default()
        };
        let result = simulate(&refs, &table, &meta, &meta, &standard).unwrap();
        assert_eq!(steps_of(&result), vec!["2", "2", "3"]);

        let custom = SimulationParams {
            start_step: 0,
            years: 3,
            time_mode: TimeMode::Custom { years: 1.0 },
            ..Default::default()
        };
        let result = simulate(&refs, &table, &meta, &meta, &custom).unwrap();
        assert_eq!(steps_of(&result), vec!["1", "2", "3"]);

        let beyond = SimulationParams {
            start_step: 9,
            years: 2,
            ..Default::default()
        };
        let result = simulate(&refs, &table, &meta, &meta, &beyond).unwrap();
        assert_eq!(steps_of(&result), vec!["3", "3"]);
    }

    #[test]
    fn test_components_and_work_factor() {
        let meta: Metadata = [
            ("jsz_percent", "60"),
            ("vwl_amount_monthly", "6,65"),
            ("allowance_flat_monthly", "100"),
        ]
        .into_iter()
        .collect();

        let all = Components {
            base_salary: true,
            year_end_bonus: true,
            savings_plan: true,
            flat_allowance: true,
        };
        let monthly = monthly_compensation(3000.0, &meta, all);
        assert!((monthly - (3000.0 + 150.0 + 6.65 + 100.0)).abs() < 1e-9);

        let bonus_only = Components {
            base_salary: false,
            year_end_bonus: true,
            ..Components::default()
        };
        assert!((monthly_compensation(3000.0, &meta, bonus_only) - 150.0).abs() < 1e-9);

        let cells = [cell("1", 3000.0, 3000.0)];
        let refs: Vec<&Cell> = cells.iter().collect();
        let params = SimulationParams {
            years: 1,
            work_factor: 0.5,
            ..Default::default()
        };
        let result = simulate(&refs, &progression(&["2"]), &meta, &Metadata::new(), &params).unwrap();
        assert_eq!(result[0].annual_a, 18_000.0);
        assert_eq!(result[0].annual_delta, 0.0);
    }

    #[test]
    fn test_years_outside_range_are_rejected() {
        let cells = [cell("1", 1.0, 1.0)];
        let refs: Vec<&Cell> = cells.iter().collect();
        let table = progression(&["2"]);
        let meta = Metadata::new();

        let params: SimulationParams =
            serde_json::from_str(r#"{"years": 4000000000}"#).unwrap();
        assert_eq!(
            simulate(&refs, &table, &meta, &meta, &params),
            Err(SimulationError::YearsOutOfRange(4_000_000_000))
        );

        let none = SimulationParams {
            years: 0,
            ..Default::default()
        };
        assert_eq!(
            simulate(&refs, &table, &meta, &meta, &none),
            Err(SimulationError::YearsOutOfRange(0))
        );

        let longest = SimulationParams {
            years: YEARS_RANGE.1,
            ..Default::default()
        };
        assert_eq!(simulate(&refs, &table, &meta, &meta, &longest).unwrap().len(), 60);
    }

    #[test]
    fn test_zero_or_nan_work_factor_counts_as_full_time() {
        let cells = [cell("1", 1000.0, 900.0)];
        let refs: Vec<&Cell> = cells.iter().collect();
        let table = progression(&["2"]);
        let meta = Metadata::new();

        for factor in [0.0, f64::NAN, f64::INFINITY] {
            let params = SimulationParams {
                years: 1,
                work_factor: factor,
                ..Default::default()
            };
            let result = simulate(&refs, &table, &meta, &meta, &params).unwrap();
            assert_eq!(result[0].annual_a, 12_000.0);
            assert_eq!(result[0].annual_delta, 1_200.0);
        }
        assert_eq!(effective_work_factor(0.75), 0.75);
    }

    #[test]
    fn test_empty_cells_is_error() {
        let result = simulate(
            &[],
            &progression(&[]),
            &Metadata::new(),
            &Metadata::new(),
            &SimulationParams::default(),
        );
        assert!(matches!(result, Err(SimulationError::NoCells(_))));
    }
}
