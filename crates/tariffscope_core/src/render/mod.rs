//! Presentation of comparison results as SVG and HTML fragments.
//!
//! Renderers are pure functions returning markup strings. Labels are German,
//! amounts are euro with two decimals.

pub mod html;
pub mod svg;

use serde::Serialize;

use crate::analysis::{ArgumentInsights, Overview};
use crate::model::{Metadata, Table};

/// Tariff A series colour
pub const COLOR_A: &str = "#1d4ed8";
/// Tariff B series colour
pub const COLOR_B: &str = "#d32f2f";
/// Cumulative delta colour
pub const COLOR_DELTA: &str = "#0f8a5f";
pub const COLOR_AXIS: &str = "#9aaccc";

/// Placeholder for a missing value
pub const MISSING: &str = "—";

/// `1234.5` -> `"1234.50 €"`; non-finite values render as [`MISSING`]
pub fn money(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2} €")
    } else {
        MISSING.to_string()
    }
}

/// `12.345` -> `"12.35%"`
pub fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}%")
    } else {
        MISSING.to_string()
    }
}

/// Escape text for use in element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// HSL (hue in degrees, saturation and lightness in percent) as `#rrggbb`
pub fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);
    let a = s * l.min(1.0 - l);
    let channel = |n: f64| {
        let k = (n + hue / 30.0).rem_euclid(12.0);
        let v = l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0);
        (v * 255.0).round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0.0), channel(8.0), channel(4.0))
}

/// A labelled headline figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
}

impl Kpi {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

fn joined_or_missing(groups: &[String]) -> String {
    if groups.is_empty() {
        MISSING.to_string()
    } else {
        groups.join(", ")
    }
}

/// Headline tiles of the overview; argument tiles are appended when `insights` is given
pub fn overview_kpis(overview: &Overview, insights: Option<&ArgumentInsights>) -> Vec<Kpi> {
    let mut kpis = vec![
        Kpi::new("Max Betrag Tarif A", money(overview.max_a)),
        Kpi::new("Max Betrag Tarif B", money(overview.max_b)),
        Kpi::new(
            "Spreizung Stufe 1 bis Endstufe (A/B)",
            format!("{} / {}", money(overview.spread_a), money(overview.spread_b)),
        ),
        Kpi::new(
            "Mittlere Steigerung je Stufe (A/B)",
            format!(
                "{} / {}",
                money(overview.mean_increase_a),
                money(overview.mean_increase_b)
            ),
        ),
        Kpi::new("Größte Abweichung absolut", money(overview.max_abs_delta)),
        Kpi::new("Größte Abweichung relativ", percent(overview.max_rel_delta)),
    ];
    if let Some(insights) = insights {
        let entry_vs_senior = insights
            .entry_vs_senior()
            .map_or_else(|| MISSING.to_string(), |(entry, senior)| {
                format!("{} vs {}", money(entry), money(senior))
            });
        kpis.push(Kpi::new("Größte Verlierer EGs", joined_or_missing(&insights.losers)));
        kpis.push(Kpi::new("Größte Gewinner EGs", joined_or_missing(&insights.winners)));
        kpis.push(Kpi::new("Einstieg vs Langjährig", entry_vs_senior));
    }
    kpis
}

/// Validity dates of both tariffs and A's source
pub fn validity_line(a: &Table, b: &Table) -> String {
    format!(
        "Gültigkeitsstand: A={} • B={} • Quelle: {}",
        a.metadata.valid_from_label().as_deref().unwrap_or("n/a"),
        b.metadata.valid_from_label().as_deref().unwrap_or("n/a"),
        a.metadata.source_url().unwrap_or("n/a"),
    )
}

pub fn version_line(a: &Table, b: &Table) -> String {
    format!("Version: A={} • B={}", a.version_label(), b.version_label())
}

/// Provenance label of a table's metadata
pub fn derivation_label(metadata: &Metadata) -> &'static str {
    if metadata.is_derived() {
        "abgeleitet"
    } else {
        "original/unklar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grid, Metadata};

    #[test]
    fn test_money_and_percent() {
        assert_eq!(money(1234.5), "1234.50 €");
        assert_eq!(money(f64::NAN), "—");
        assert_eq!(percent(12.345), "12.35%");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<E & "9">"#), "&lt;E &amp; &quot;9&quot;&gt;");
        assert_eq!(escape("TVöD"), "TVöD");
    }

    #[test]
    fn test_hsl_to_hex() {
        assert_eq!(hsl_to_hex(0.0, 100.0, 50.0), "#ff0000");
        assert_eq!(hsl_to_hex(120.0, 100.0, 50.0), "#00ff00");
        assert_eq!(hsl_to_hex(215.0, 0.0, 100.0), "#ffffff");
        assert_eq!(hsl_to_hex(5.0, 55.0, 94.0), "#f8e9e7");
    }

    #[test]
    fn test_meta_lines() {
        let meta: Metadata = [("valid_from", "2024-03-01"), ("version", "v7"), ("derived", "true")]
            .into_iter()
            .collect();
        let a = Table::new("A", Grid::default(), Grid::default(), meta);
        let b = Table::new("B", Grid::default(), Grid::default(), Metadata::new());

        assert_eq!(
            validity_line(&a, &b),
            "Gültigkeitsstand: A=01.03.2024 • B=n/a • Quelle: n/a"
        );
        assert_eq!(version_line(&a, &b), "Version: A=v7 • B=B");
        assert_eq!(derivation_label(&a.metadata), "abgeleitet");
        assert_eq!(derivation_label(&b.metadata), "original/unklar");
    }
}
