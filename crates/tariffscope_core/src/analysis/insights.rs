use serde::Serialize;

use crate::model::{Cell, ReferenceMode};
use crate::pairing::{delta, group_cells, groups_of};

/// Number of groups reported as winners and as losers
pub const INSIGHT_GROUPS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDelta {
    pub group: String,
    pub mean_delta: f64,
    /// Delta at step 1, 0 when the group has no step 1
    pub entry: f64,
    /// Delta at the highest step
    pub senior: f64,
}

/// Groups ranked by mean signed delta, highest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentInsights {
    pub ranked: Vec<GroupDelta>,
    pub winners: Vec<String>,
    pub losers: Vec<String>,
}

impl ArgumentInsights {
    /// Entry and senior delta of the top ranked group
    pub fn entry_vs_senior(&self) -> Option<(f64, f64)> {
        self.ranked.first().map(|g| (g.entry, g.senior))
    }
}

pub fn argument_insights(cells: &[Cell], mode: ReferenceMode) -> ArgumentInsights {
    let mut ranked: Vec<GroupDelta> = groups_of(cells)
        .into_iter()
        .map(|group| {
            let members = group_cells(cells, &group);
            let deltas: Vec<f64> = members.iter().map(|c| delta(c, mode).abs).collect();
            let entry = members
                .iter()
                .zip(&deltas)
                .find(|(c, _)| c.step_ordinal == Some(1))
                .map_or(0.0, |(_, d)| *d);
            GroupDelta {
                mean_delta: deltas.iter().sum::<f64>() / deltas.len() as f64,
                entry,
                senior: deltas.last().copied().unwrap_or(0.0),
                group,
            }
        })
        .collect();
    ranked.sort_by(|x, y| y.mean_delta.total_cmp(&x.mean_delta));

    let winners = ranked
        .iter()
        .take(INSIGHT_GROUPS)
        .map(|g| g.group.clone())
        .collect();
    let losers = ranked[ranked.len().saturating_sub(INSIGHT_GROUPS)..]
        .iter()
        .map(|g| g.group.clone())
        .collect();

    ArgumentInsights {
        ranked,
        winners,
        losers,
    }
}
