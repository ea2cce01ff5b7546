use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::CompareError;
use crate::model::{ReferenceMode, Table};
use crate::pairing::{delta, extract_pairs};
use crate::source::AllowanceTable;
use crate::stats::describe;

use super::allowances::{AllowanceComparison, compare_allowances};
use super::progression::{GroupLogic, SeriesPair, progression_graph, progression_logic};

/// Cell-wise difference of `compare` against `base`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapEntry {
    pub group: String,
    pub step: String,
    pub base: f64,
    pub compare: f64,
    /// `compare - base`
    pub delta: f64,
    /// Delta in percent of `base`
    pub delta_pct: f64,
}

/// Common cells of two tables, sorted by group id then step id
pub fn heatmap_entries(base: &Table, compare: &Table) -> Vec<HeatmapEntry> {
    let mut entries: Vec<HeatmapEntry> = extract_pairs(base, compare)
        .iter()
        .map(|cell| {
            let d = delta(cell, ReferenceMode::BMinusA);
            HeatmapEntry {
                group: cell.group.clone(),
                step: cell.step.clone(),
                base: cell.a,
                compare: cell.b,
                delta: d.abs,
                delta_pct: d.rel,
            }
        })
        .collect();
    entries.sort_by(|x, y| x.group.cmp(&y.group).then_with(|| x.step.cmp(&y.step)));
    entries
}

/// Distribution of every salary value in one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetrics {
    pub table: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub spread: f64,
}

/// `None` when the table holds no numeric salary
pub fn table_metrics(table: &Table) -> Option<TableMetrics> {
    let summary = describe(&table.grid.numeric_values())?;
    Some(TableMetrics {
        table: table.name.clone(),
        count: summary.count,
        mean: summary.mean,
        median: summary.median,
        min: summary.min,
        max: summary.max,
        spread: summary.spread,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairComparison {
    pub a: String,
    pub b: String,
    pub heatmap: Vec<HeatmapEntry>,
    pub graph: Vec<SeriesPair>,
    pub progression_logic: Vec<GroupLogic>,
}

/// Heatmap, career timelines and duration logic of `b` against `a`
pub fn compare_pair(a: &Table, b: &Table) -> PairComparison {
    PairComparison {
        a: a.name.clone(),
        b: b.name.clone(),
        heatmap: heatmap_entries(a, b),
        graph: progression_graph(a, b),
        progression_logic: progression_logic(a, b),
    }
}

/// Comparison payload across several selected tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiComparison {
    pub selected_tables: Vec<String>,
    pub baseline: String,
    /// Per selected table; `null` for tables without numeric values
    pub metrics: Vec<Option<TableMetrics>>,
    /// Baseline against every other selected table
    pub baseline_comparisons: Vec<PairComparison>,
    /// Every unordered pair in selection order
    pub pairwise_comparisons: Vec<PairComparison>,
    pub allowances: AllowanceComparison,
}

/// Deduplicate `names` keeping first occurrences and settle the baseline.
///
/// Needs at least two names before deduplication. The baseline defaults to
/// the first name and must be one of the selection.
pub fn unique_selection(
    names: &[String],
    baseline: Option<&str>,
) -> Result<(Vec<String>, String), CompareError> {
    if names.len() < 2 {
        return Err(CompareError::TooFewTables);
    }
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(name) {
            unique.push(name.clone());
        }
    }
    let baseline = match baseline {
        Some(b) if unique.iter().any(|n| n == b) => b.to_string(),
        Some(b) => return Err(CompareError::UnknownBaseline(b.to_string())),
        None => unique[0].clone(),
    };
    Ok((unique, baseline))
}

/// Build the multi-table payload for already loaded `tables`.
///
/// `tables` is the deduplicated selection in order and must contain `baseline`.
pub fn compare_tables(
    tables: &[&Table],
    baseline: &str,
    allowances: &FxHashMap<String, AllowanceTable>,
) -> Result<MultiComparison, CompareError> {
    let base = tables
        .iter()
        .find(|t| t.name == baseline)
        .ok_or_else(|| CompareError::UnknownBaseline(baseline.to_string()))?;

    let baseline_comparisons = tables
        .iter()
        .filter(|t| t.name != baseline)
        .map(|t| compare_pair(base, t))
        .collect();

    let mut pairwise_comparisons = Vec::new();
    for (i, left) in tables.iter().enumerate() {
        for right in &tables[i + 1..] {
            pairwise_comparisons.push(compare_pair(left, right));
        }
    }

    Ok(MultiComparison {
        selected_tables: tables.iter().map(|t| t.name.clone()).collect(),
        baseline: baseline.to_string(),
        metrics: tables.iter().map(|t| table_metrics(t)).collect(),
        baseline_comparisons,
        pairwise_comparisons,
        allowances: compare_allowances(tables, allowances),
    })
}
