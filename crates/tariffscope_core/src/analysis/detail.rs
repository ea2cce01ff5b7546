use serde::Serialize;

use crate::model::{Cell, Delta, ReferenceMode, Table};
use crate::numeric::is_whole;
use crate::pairing::delta;
use crate::simulation::{Components, TimeMode, duration_years, monthly_compensation};

/// One step of the detail view for a single group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub step: String,
    pub a: f64,
    pub b: f64,
    pub delta: Delta,
    /// Either value is a whole number
    pub rounding_suspect: bool,
    pub duration_a: f64,
    pub duration_b: f64,
    /// Annual compensation under the enabled components
    pub annual_a: f64,
    pub annual_b: f64,
}

/// Detail rows for the step-sorted cells of one group
pub fn detail_rows(
    cells: &[&Cell],
    mode: ReferenceMode,
    a: &Table,
    b: &Table,
    components: Components,
    time_mode: TimeMode,
) -> Vec<DetailRow> {
    cells
        .iter()
        .map(|cell| DetailRow {
            step: cell.step.clone(),
            a: cell.a,
            b: cell.b,
            delta: delta(cell, mode),
            rounding_suspect: is_whole(cell.a) || is_whole(cell.b),
            duration_a: duration_years(a, &cell.group, &cell.step, time_mode),
            duration_b: duration_years(b, &cell.group, &cell.step, time_mode),
            annual_a: monthly_compensation(cell.a, &a.metadata, components) * 12.0,
            annual_b: monthly_compensation(cell.b, &b.metadata, components) * 12.0,
        })
        .collect()
}
