//! Derived views over paired cells and loaded tables.
//!
//! Everything here is a pure function of its inputs:
//! - [`overview`]: step averages and headline KPIs
//! - [`argument_insights`]: groups ranked by mean delta
//! - [`quality_checks`]: monotonicity, jumps and rounding
//! - [`detail_rows`]: one group's steps with durations and annual pay
//! - progression: per-group increases, career series and duration logic
//! - comparison: multi-table payloads and allowance matrices

mod allowances;
mod comparison;
mod detail;
mod insights;
mod overview;
mod progression;
mod quality;

pub use allowances::{
    AllowanceComparison, AllowancePresence, AllowanceSummary, TableAllowances, compare_allowances,
    summarize_allowance,
};
pub use comparison::{
    HeatmapEntry, MultiComparison, PairComparison, TableMetrics, compare_pair, compare_tables,
    heatmap_entries, table_metrics, unique_selection,
};
pub use detail::{DetailRow, detail_rows};
pub use insights::{ArgumentInsights, GroupDelta, INSIGHT_GROUPS, argument_insights};
pub use overview::{Overview, StepAverage, overview, step_averages};
pub use progression::{
    GroupLogic, ProgressionPoint, ProgressionSeries, SeriesPair, StepDurations, StepIncrease,
    group_progression, progression_graph, progression_logic, progression_series,
};
pub use quality::{OUTLIER_JUMP, QualityReport, quality_checks};
