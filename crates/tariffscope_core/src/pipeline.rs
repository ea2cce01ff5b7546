//! Selections in, renderable dashboard out.
//!
//! [`recompute`] is the single entry point a front end calls whenever a
//! selection changes. It is synchronous and pure; [`load_and_recompute`]
//! wraps it with the two table loads.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{
    self, ArgumentInsights, DetailRow, MultiComparison, Overview, QualityReport, StepIncrease,
};
use crate::error::{CompareError, LoadError};
use crate::model::{Cell, Delta, Metadata, ReferenceMode, SimulationStep, Table};
use crate::pairing::{Filters, apply_filters, delta, extract_pairs, group_cells, groups_of};
use crate::render::svg::HeatmapValue;
use crate::render::{self, Kpi, html, svg};
use crate::simulation::{SimulationParams, simulate};
use crate::source::{TableLoader, TableSource};
use crate::stats::{self, Bin, Summary};

/// Default number of histogram bins
pub const DEFAULT_HISTOGRAM_BINS: usize = 12;

/// Everything the user can choose on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selections {
    pub tariff_a: String,
    pub tariff_b: String,
    pub reference: ReferenceMode,
    pub filters: Filters,
    pub heatmap: HeatmapValue,
    /// Group shown in the detail view; the first filtered group when unset or filtered out
    pub detail_group: Option<String>,
    /// Group to simulate; same fallback as `detail_group`
    pub simulation_group: Option<String>,
    pub simulation: SimulationParams,
    /// Add winner/loser tiles to the overview
    pub argument_mode: bool,
    pub histogram_bins: usize,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            tariff_a: String::new(),
            tariff_b: String::new(),
            reference: ReferenceMode::default(),
            filters: Filters::default(),
            heatmap: HeatmapValue::default(),
            detail_group: None,
            simulation_group: None,
            simulation: SimulationParams::default(),
            argument_mode: false,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl Selections {
    pub fn for_pair(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            tariff_a: a.into(),
            tariff_b: b.into(),
            ..Self::default()
        }
    }
}

/// Rendered SVG charts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Charts {
    pub curve: String,
    pub difference_band: String,
    pub micro: String,
    pub heatmap: String,
    pub histogram_a: String,
    pub histogram_b: String,
    pub histogram_delta: String,
    pub lifetime: String,
}

/// Rendered HTML fragments
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fragments {
    pub kpi_tiles: String,
    pub detail_table: String,
    pub lifetime_table: String,
    pub sources_table: String,
    pub governance: String,
}

/// Numbers and markup for one table pair under one set of selections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub tariff_a: String,
    pub tariff_b: String,
    pub reference: ReferenceMode,
    /// Filtered cells in pairing order
    pub cells: Vec<Cell>,
    /// Delta of each cell, aligned with `cells`
    pub deltas: Vec<Delta>,
    pub summary_a: Summary,
    pub summary_b: Summary,
    /// Summary of the absolute deltas
    pub summary_delta: Summary,
    /// Pearson correlation of A and B values
    pub correlation: Option<f64>,
    pub overview: Overview,
    pub kpis: Vec<Kpi>,
    pub insights: ArgumentInsights,
    pub quality: QualityReport,
    /// Filtered groups in pairing order
    pub groups: Vec<String>,
    pub detail_group: String,
    pub detail: Vec<DetailRow>,
    pub progression: Vec<StepIncrease>,
    pub simulation_group: String,
    pub simulation: Vec<SimulationStep>,
    pub bins_a: Vec<Bin>,
    pub bins_b: Vec<Bin>,
    pub bins_delta: Vec<Bin>,
    pub validity: String,
    pub version: String,
    pub metadata_a: Metadata,
    pub metadata_b: Metadata,
    pub charts: Charts,
    pub fragments: Fragments,
}

impl Dashboard {
    /// Standalone HTML page with every chart and table
    pub fn html_report(&self) -> String {
        let detail_title = format!("Detail {}", self.detail_group);
        let simulation_title = format!("Lebensverdienst {}", self.simulation_group);
        let detail = format!("{}{}", self.fragments.detail_table, self.charts.micro);
        let lifetime = format!("{}{}", self.charts.lifetime, self.fragments.lifetime_table);
        let distributions = format!(
            "{}{}{}",
            self.charts.histogram_a, self.charts.histogram_b, self.charts.histogram_delta
        );
        let sources = format!(
            "<p>{}</p><p>{}</p>{}{}",
            render::escape(&self.validity),
            render::escape(&self.version),
            self.fragments.sources_table,
            self.fragments.governance
        );

        html::page(
            &format!("Tarifvergleich {} / {}", self.tariff_a, self.tariff_b),
            &[
                html::Section {
                    title: "Überblick",
                    body: &self.fragments.kpi_tiles,
                },
                html::Section {
                    title: "Verlauf",
                    body: &format!("{}{}", self.charts.curve, self.charts.difference_band),
                },
                html::Section {
                    title: &detail_title,
                    body: &detail,
                },
                html::Section {
                    title: "Heatmap",
                    body: &self.charts.heatmap,
                },
                html::Section {
                    title: "Verteilung",
                    body: &distributions,
                },
                html::Section {
                    title: &simulation_title,
                    body: &lifetime,
                },
                html::Section {
                    title: "Quellen",
                    body: &sources,
                },
            ],
        )
    }
}

/// Outcome of a recomputation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Recomputed {
    /// No cell survived filtering
    NoData,
    Ready(Box<Dashboard>),
}

impl Recomputed {
    pub fn dashboard(&self) -> Option<&Dashboard> {
        match self {
            Recomputed::Ready(d) => Some(&**d),
            Recomputed::NoData => None,
        }
    }
}

fn pick_group(preferred: Option<&str>, groups: &[String]) -> String {
    preferred
        .filter(|g| groups.iter().any(|known| known == g))
        .map(str::to_string)
        .or_else(|| groups.first().cloned())
        .unwrap_or_default()
}

/// Pair, filter, analyse and render `a` against `b`.
pub fn recompute(a: &Table, b: &Table, selections: &Selections) -> Recomputed {
    let cells = apply_filters(extract_pairs(a, b), &selections.filters);
    let (Some(summary_a), Some(summary_b), Some(overview)) = (
        stats::describe(&cells.iter().map(|c| c.a).collect::<Vec<_>>()),
        stats::describe(&cells.iter().map(|c| c.b).collect::<Vec<_>>()),
        analysis::overview(&cells, selections.reference),
    ) else {
        tracing::debug!(a = %a.name, b = %b.name, "no cells after filtering");
        return Recomputed::NoData;
    };

    let mode = selections.reference;
    let values_a: Vec<f64> = cells.iter().map(|c| c.a).collect();
    let values_b: Vec<f64> = cells.iter().map(|c| c.b).collect();
    let deltas: Vec<Delta> = cells.iter().map(|c| delta(c, mode)).collect();
    let abs_deltas: Vec<f64> = deltas.iter().map(|d| d.abs).collect();
    let Some(summary_delta) = stats::describe(&abs_deltas) else {
        return Recomputed::NoData;
    };

    let groups = groups_of(&cells);
    let insights = analysis::argument_insights(&cells, mode);
    let quality = analysis::quality_checks(&cells);
    let kpis = render::overview_kpis(&overview, selections.argument_mode.then_some(&insights));

    let params = &selections.simulation;
    let detail_group = pick_group(selections.detail_group.as_deref(), &groups);
    let detail_cells = group_cells(&cells, &detail_group);
    let detail = analysis::detail_rows(
        &detail_cells,
        mode,
        a,
        b,
        params.components,
        params.time_mode,
    );
    let progression = analysis::group_progression(&detail_cells);

    let simulation_group = pick_group(selections.simulation_group.as_deref(), &groups);
    let simulation_cells = group_cells(&cells, &simulation_group);
    let simulation = simulate(&simulation_cells, a, &a.metadata, &b.metadata, params)
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "simulation skipped");
            Vec::new()
        });

    let bins = selections.histogram_bins.max(1);
    let bins_a = stats::histogram(&values_a, bins);
    let bins_b = stats::histogram(&values_b, bins);
    let bins_delta = stats::histogram(&abs_deltas, bins);

    let charts = Charts {
        curve: svg::curve_plot(&overview.steps),
        difference_band: svg::difference_band(&overview.steps),
        micro: svg::micro_chart(&progression),
        heatmap: svg::heatmap(&cells, mode, selections.heatmap),
        histogram_a: svg::histogram(&bins_a, render::COLOR_A),
        histogram_b: svg::histogram(&bins_b, render::COLOR_B),
        histogram_delta: svg::histogram(&bins_delta, render::COLOR_DELTA),
        lifetime: svg::lifetime_chart(&simulation),
    };
    let fragments = Fragments {
        kpi_tiles: html::kpi_tiles(&kpis),
        detail_table: html::detail_table(&detail),
        lifetime_table: html::lifetime_table(&simulation),
        sources_table: html::sources_table(a, b),
        governance: html::governance_cards(&quality, a, b),
    };

    tracing::debug!(
        a = %a.name,
        b = %b.name,
        cells = cells.len(),
        groups = groups.len(),
        "recomputed dashboard"
    );

    Recomputed::Ready(Box::new(Dashboard {
        tariff_a: a.name.clone(),
        tariff_b: b.name.clone(),
        reference: mode,
        correlation: stats::correlation(&values_a, &values_b),
        summary_a,
        summary_b,
        summary_delta,
        overview,
        kpis,
        insights,
        quality,
        groups,
        detail_group,
        detail,
        progression,
        simulation_group,
        simulation,
        bins_a,
        bins_b,
        bins_delta,
        validity: render::validity_line(a, b),
        version: render::version_line(a, b),
        metadata_a: a.metadata.clone(),
        metadata_b: b.metadata.clone(),
        charts,
        fragments,
        deltas,
        cells,
    }))
}

/// Load both selected tariffs concurrently, then [`recompute`].
pub async fn load_and_recompute<S: TableSource>(
    loader: &TableLoader<S>,
    selections: &Selections,
) -> Result<Recomputed, LoadError> {
    let (a, b) = tokio::try_join!(
        loader.load_table(&selections.tariff_a),
        loader.load_table(&selections.tariff_b),
    )?;
    Ok(recompute(&a, &b, selections))
}

/// Load the selected tables and their allowances and build the multi-table payload.
pub async fn compare_many<S: TableSource>(
    loader: &TableLoader<S>,
    names: &[String],
    baseline: Option<&str>,
) -> Result<MultiComparison, CompareError> {
    let (selected, baseline) = analysis::unique_selection(names, baseline)?;

    let mut tables = Vec::with_capacity(selected.len());
    for name in &selected {
        tables.push(loader.load_table(name).await?);
    }

    let mut allowances = FxHashMap::default();
    for table in &tables {
        for name in table.metadata.allowance_names() {
            if allowances.contains_key(&name) {
                continue;
            }
            let allowance = loader.load_allowance(&name).await.map_err(LoadError::from)?;
            allowances.insert(name, allowance);
        }
    }

    let refs: Vec<&Table> = tables.iter().map(|t| t.as_ref()).collect();
    tracing::info!(tables = refs.len(), baseline = %baseline, "comparing tables");
    analysis::compare_tables(&refs, &baseline, &allowances)
}
