use serde::Serialize;

use crate::model::Cell;
use crate::numeric::is_whole;
use crate::pairing::{group_cells, groups_of};

/// Step-to-step change above which a transition counts as an outlier
pub const OUTLIER_JUMP: f64 = 800.0;

/// Plausibility checks over the filtered cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    /// No group decreases from one step to the next on either side
    pub monotone: bool,
    /// Step transitions whose change exceeds [`OUTLIER_JUMP`] on either side
    pub outliers: usize,
    /// Cells where either value is a whole number
    pub rounded: usize,
}

pub fn quality_checks(cells: &[Cell]) -> QualityReport {
    let mut report = QualityReport {
        monotone: true,
        outliers: 0,
        rounded: 0,
    };

    for group in groups_of(cells) {
        let members = group_cells(cells, &group);
        for pair in members.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.a < prev.a || next.b < prev.b {
                report.monotone = false;
            }
            if (next.a - prev.a).abs() > OUTLIER_JUMP || (next.b - prev.b).abs() > OUTLIER_JUMP {
                report.outliers += 1;
            }
        }
        report.rounded += members
            .iter()
            .filter(|c| is_whole(c.a) || is_whole(c.b))
            .count();
    }
    report
}
