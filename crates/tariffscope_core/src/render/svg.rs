//! SVG charts.
//!
//! Every chart is a standalone `<svg>` element with `viewBox`, `width` and
//! `height`, so it can be embedded in HTML or rasterized as is.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{StepAverage, StepIncrease};
use crate::model::{Cell, ReferenceMode, SimulationStep};
use crate::pairing::{delta, groups_of};
use crate::stats::Bin;

use super::{COLOR_A, COLOR_AXIS, COLOR_B, COLOR_DELTA, escape, hsl_to_hex, money};

/// Heatmap cell width including the gap
pub const HEATMAP_CELL_WIDTH: f64 = 70.0;
/// Heatmap cell height including the gap
pub const HEATMAP_CELL_HEIGHT: f64 = 36.0;

/// Which delta the heatmap colours by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapValue {
    #[default]
    Abs,
    Rel,
}

impl HeatmapValue {
    pub fn toggled(self) -> Self {
        match self {
            HeatmapValue::Abs => HeatmapValue::Rel,
            HeatmapValue::Rel => HeatmapValue::Abs,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HeatmapValue::Abs => "absolut",
            HeatmapValue::Rel => "relativ",
        }
    }

    pub fn pick(self, cell: &Cell, mode: ReferenceMode) -> f64 {
        let d = delta(cell, mode);
        match self {
            HeatmapValue::Abs => d.abs,
            HeatmapValue::Rel => d.rel,
        }
    }
}

fn open(width: f64, height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    )
}

fn axis(x1: f64, y: f64, x2: f64) -> String {
    format!(r#"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="{COLOR_AXIS}"/>"#)
}

/// `x` of point `i` of `n` spread over `[left, left + span]`
fn spread_x(i: usize, n: usize, left: f64, span: f64) -> f64 {
    left + i as f64 / n.saturating_sub(1).max(1) as f64 * span
}

fn path_data(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| format!("{}{x:.1},{y:.1}", if i == 0 { 'M' } else { 'L' }))
        .collect::<Vec<_>>()
        .join(" ")
}

fn line(points: &[(f64, f64)], color: &str, width: u32, dash: Option<&str>) -> String {
    if points.is_empty() {
        return String::new();
    }
    let dash = dash
        .map(|d| format!(r#" stroke-dasharray="{d}""#))
        .unwrap_or_default();
    format!(
        r#"<path d="{}" stroke="{color}" fill="none" stroke-width="{width}"{dash}/>"#,
        path_data(points)
    )
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value != 0.0 {
        value
    } else {
        fallback
    }
}

/// Step averages of both tariffs as two curves with hover titles
pub fn curve_plot(steps: &[StepAverage]) -> String {
    let values = || steps.iter().flat_map(|s| [s.a, s.b]);
    let max_y = finite_or(values().fold(f64::NEG_INFINITY, f64::max), 1.0);
    let min_y = finite_or(values().fold(f64::INFINITY, f64::min), 0.0);
    let range = (max_y - min_y).max(1.0);
    let n = steps.len();
    let x = |i| spread_x(i, n, 60.0, 900.0);
    let y = |v: f64| 260.0 - (v - min_y) / range * 210.0;

    let points = |pick: fn(&StepAverage) -> f64| -> Vec<(f64, f64)> {
        steps.iter().enumerate().map(|(i, s)| (x(i), y(pick(s)))).collect()
    };
    let a = points(|s| s.a);
    let b = points(|s| s.b);
    let circles = |pts: &[(f64, f64)], pick: fn(&StepAverage) -> f64, color: &str| -> String {
        pts.iter()
            .zip(steps)
            .map(|((cx, cy), s)| {
                format!(
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="4" fill="{color}"><title>Stufe {}: {}</title></circle>"#,
                    escape(&s.step),
                    money(pick(s))
                )
            })
            .collect()
    };

    format!(
        "{}{}{}{}{}{}</svg>",
        open(980.0, 280.0),
        axis(50.0, 260.0, 960.0),
        line(&a, COLOR_A, 3, None),
        line(&b, COLOR_B, 3, None),
        circles(&a, |s| s.a, COLOR_A),
        circles(&b, |s| s.b, COLOR_B),
    )
}

/// Mean delta per step as bars around a zero line; positive up in B's colour
pub fn difference_band(steps: &[StepAverage]) -> String {
    let max_band = steps
        .iter()
        .map(|s| s.delta.abs())
        .fold(1.0_f64, f64::max);
    let n = steps.len();
    let bars: String = steps
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let h = s.delta.abs() / max_band * 90.0;
            let (top, color) = if s.delta >= 0.0 {
                (110.0 - h, COLOR_B)
            } else {
                (110.0, COLOR_A)
            };
            format!(
                r#"<rect x="{:.1}" y="{top:.1}" width="32" height="{h:.1}" fill="{color}"><title>Stufe {}: {}</title></rect>"#,
                spread_x(i, n, 60.0, 900.0) - 16.0,
                escape(&s.step),
                money(s.delta)
            )
        })
        .collect();

    format!("{}{}{bars}</svg>", open(980.0, 220.0), axis(50.0, 110.0, 960.0))
}

/// Step-to-step percentage increases of one group
pub fn micro_chart(progression: &[StepIncrease]) -> String {
    let max_y = progression
        .iter()
        .flat_map(|p| [p.a, p.b])
        .fold(0.0_f64, f64::max)
        + 1.0;
    let n = progression.len();
    let point = |i: usize, v: f64| (spread_x(i, n, 70.0, 860.0), 230.0 - v / max_y * 180.0);
    let a: Vec<_> = progression.iter().enumerate().map(|(i, p)| point(i, p.a)).collect();
    let b: Vec<_> = progression.iter().enumerate().map(|(i, p)| point(i, p.b)).collect();

    format!(
        "{}{}{}{}</svg>",
        open(980.0, 260.0),
        axis(50.0, 230.0, 950.0),
        line(&a, COLOR_A, 3, None),
        line(&b, COLOR_B, 3, None),
    )
}

/// Group x step grid coloured by delta: warm for positive, cool for negative
pub fn heatmap(cells: &[Cell], mode: ReferenceMode, value: HeatmapValue) -> String {
    let groups = groups_of(cells);
    let mut steps: Vec<(&str, Option<i64>)> = Vec::new();
    for cell in cells {
        if !steps.iter().any(|(s, _)| *s == cell.step) {
            steps.push((cell.step.as_str(), cell.step_ordinal));
        }
    }
    steps.sort_by_key(|(_, ordinal)| ordinal.unwrap_or(i64::MAX));

    let mut lookup: FxHashMap<(&str, &str), &Cell> = FxHashMap::default();
    for cell in cells {
        lookup
            .entry((cell.group.as_str(), cell.step.as_str()))
            .or_insert(cell);
    }
    let range = cells
        .iter()
        .map(|c| value.pick(c, mode).abs())
        .fold(1.0_f64, f64::max);
    let decimals: usize = match value {
        HeatmapValue::Abs => 0,
        HeatmapValue::Rel => 1,
    };

    let mut rects = String::new();
    for (gi, group) in groups.iter().enumerate() {
        for (si, (step, _)) in steps.iter().enumerate() {
            let Some(cell) = lookup.get(&(group.as_str(), *step)) else {
                continue;
            };
            let v = value.pick(cell, mode);
            let ratio = v.abs() / range;
            let hue = if v >= 0.0 { 5.0 } else { 215.0 };
            let fill = hsl_to_hex(hue, 55.0 + ratio * 35.0, 94.0 - ratio * 35.0);
            let x = 120.0 + si as f64 * HEATMAP_CELL_WIDTH;
            let y = 30.0 + gi as f64 * HEATMAP_CELL_HEIGHT;
            rects.push_str(&format!(
                r#"<rect class="heatcell" data-group="{g}" x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/><text x="{tx}" y="{ty}" text-anchor="middle" font-size="11">{v:.decimals$}</text>"#,
                g = escape(group),
                w = HEATMAP_CELL_WIDTH - 2.0,
                h = HEATMAP_CELL_HEIGHT - 2.0,
                tx = x + HEATMAP_CELL_WIDTH / 2.0,
                ty = y + 21.0,
            ));
        }
    }

    let group_labels: String = groups
        .iter()
        .enumerate()
        .map(|(gi, g)| {
            format!(
                r#"<text x="8" y="{}" font-size="12">{}</text>"#,
                54.0 + gi as f64 * HEATMAP_CELL_HEIGHT,
                escape(g)
            )
        })
        .collect();
    let step_labels: String = steps
        .iter()
        .enumerate()
        .map(|(si, (s, _))| {
            format!(
                r#"<text x="{}" y="20" font-size="12">St {}</text>"#,
                145.0 + si as f64 * HEATMAP_CELL_WIDTH,
                escape(s)
            )
        })
        .collect();

    let width = 160.0 + steps.len() as f64 * HEATMAP_CELL_WIDTH;
    let height = 60.0 + groups.len() as f64 * HEATMAP_CELL_HEIGHT;
    format!("{}{group_labels}{step_labels}{rects}</svg>", open(width, height))
}

/// Equal-width histogram bars with range titles
pub fn histogram(bins: &[Bin], color: &str) -> String {
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
    let bar_width = 900.0 / bins.len().max(1) as f64;
    let bars: String = bins
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            let h = bin.count as f64 / max_count * 200.0;
            let x = 60.0 + i as f64 * bar_width;
            format!(
                r#"<rect x="{x:.1}" y="{:.1}" width="{:.1}" height="{h:.1}" fill="{color}"><title>{:.0} - {:.0}: {}</title></rect><text x="{:.1}" y="248" text-anchor="middle" font-size="10">{:.0}</text>"#,
                230.0 - h,
                (bar_width - 4.0).max(1.0),
                bin.lower,
                bin.upper,
                bin.count,
                x + bar_width / 2.0,
                bin.lower,
            )
        })
        .collect();

    format!("{}{}{bars}</svg>", open(980.0, 260.0), axis(50.0, 230.0, 960.0))
}

/// Cumulative earnings of both tariffs and their dashed difference
pub fn lifetime_chart(simulation: &[SimulationStep]) -> String {
    let max_y = finite_or(
        simulation
            .iter()
            .flat_map(|s| [s.cumulative_a, s.cumulative_b])
            .fold(f64::NEG_INFINITY, f64::max),
        1.0,
    );
    let n = simulation.len();
    let series = |pick: fn(&SimulationStep) -> f64| -> Vec<(f64, f64)> {
        simulation
            .iter()
            .enumerate()
            .map(|(i, s)| (spread_x(i, n, 60.0, 900.0), 260.0 - pick(s) / max_y * 220.0))
            .collect()
    };

    format!(
        "{}{}{}{}{}</svg>",
        open(980.0, 290.0),
        axis(50.0, 260.0, 950.0),
        line(&series(|s| s.cumulative_a), COLOR_A, 3, None),
        line(&series(|s| s.cumulative_b), COLOR_B, 3, None),
        line(&series(|s| s.cumulative_delta), COLOR_DELTA, 2, Some("6 4")),
    )
}
