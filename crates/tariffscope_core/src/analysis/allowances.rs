use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::model::Table;
use crate::model::metadata::keys;
use crate::source::AllowanceTable;

/// Characteristics of one allowance as far as its files describe it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowanceSummary {
    pub allowance: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adding_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub func_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

impl AllowanceSummary {
    fn unavailable(name: &str) -> Self {
        Self {
            allowance: name.to_string(),
            available: false,
            label: None,
            adding_type: None,
            func_type: None,
            options: Vec::new(),
            min_value: None,
            max_value: None,
        }
    }
}

pub fn summarize_allowance(table: &AllowanceTable) -> AllowanceSummary {
    if !table.available {
        return AllowanceSummary::unavailable(&table.name);
    }
    let meta = &table.metadata;
    let values = table.grid.numeric_values();
    let field = |key: &str| Some(meta.get(key).unwrap_or_default().trim().to_string());

    AllowanceSummary {
        allowance: table.name.clone(),
        available: true,
        label: Some(meta.label().to_string()),
        adding_type: field(keys::ADDING_TYPE),
        func_type: field(keys::FUNC_TYPE),
        options: meta.list(keys::OPTIONS),
        min_value: values.iter().copied().reduce(f64::min),
        max_value: values.iter().copied().reduce(f64::max),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableAllowances {
    pub table: String,
    pub allowances: Vec<AllowanceSummary>,
}

/// Which selected tables reference an allowance, aligned with
/// [`AllowanceComparison::tables`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowancePresence {
    pub allowance: String,
    pub present: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowanceComparison {
    pub tables: Vec<String>,
    pub by_table: Vec<TableAllowances>,
    /// One row per allowance name, sorted
    pub presence: Vec<AllowancePresence>,
}

/// Allowance sets of `tables` and which table references which allowance.
///
/// `loaded` maps allowance names to their fetched tables; names missing
/// from it are reported as unavailable.
pub fn compare_allowances(
    tables: &[&Table],
    loaded: &FxHashMap<String, AllowanceTable>,
) -> AllowanceComparison {
    let names_per_table: Vec<Vec<String>> = tables
        .iter()
        .map(|t| t.metadata.allowance_names())
        .collect();

    let by_table = tables
        .iter()
        .zip(&names_per_table)
        .map(|(table, names)| TableAllowances {
            table: table.name.clone(),
            allowances: names
                .iter()
                .map(|name| {
                    loaded
                        .get(name)
                        .map_or_else(|| AllowanceSummary::unavailable(name), summarize_allowance)
                })
                .collect(),
        })
        .collect();

    let mut all: Vec<&String> = names_per_table.iter().flatten().collect();
    all.sort();
    all.dedup();
    let presence = all
        .into_iter()
        .map(|allowance| AllowancePresence {
            allowance: allowance.clone(),
            present: names_per_table.iter().map(|n| n.contains(allowance)).collect(),
        })
        .collect();

    AllowanceComparison {
        tables: tables.iter().map(|t| t.name.clone()).collect(),
        by_table,
        presence,
    }
}
