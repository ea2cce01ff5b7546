//! HTML fragments: tables, KPI cards and a self-contained report page.

use crate::analysis::{DetailRow, QualityReport};
use crate::model::{SimulationStep, Table};

use super::{Kpi, MISSING, derivation_label, escape, money, percent};

/// Card shown instead of the dashboard when no cell survives filtering
pub const NO_DATA: &str = r#"<div class="card">Keine Daten nach Filterung.</div>"#;

fn card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="card"><div class="k">{}</div><div class="v">{}</div></div>"#,
        escape(label),
        escape(value)
    )
}

pub fn kpi_tiles(kpis: &[Kpi]) -> String {
    kpis.iter().map(|k| card(&k.label, &k.value)).collect()
}

/// Hover text of a detail row: rounding hint, durations and annual pay
pub fn detail_tooltip(row: &DetailRow) -> String {
    let rounding = if row.rounding_suspect {
        "Rundungsartefakt möglich"
    } else {
        "keine auffällige Rundung"
    };
    format!(
        "{rounding}; Laufzeit A={} Jahre, B={} Jahre; Jahresbrutto A={}, B={}",
        row.duration_a,
        row.duration_b,
        money(row.annual_a),
        money(row.annual_b)
    )
}

pub fn detail_table(rows: &[DetailRow]) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            let class = if row.delta.abs >= 0.0 { "positive" } else { "negative" };
            format!(
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="{class}" data-tip="{}">{}</td><td>{}</td></tr>"#,
                escape(&row.step),
                money(row.a),
                money(row.b),
                escape(&detail_tooltip(row)),
                money(row.delta.abs),
                percent(row.delta.rel),
            )
        })
        .collect();

    format!(
        "<table><thead><tr><th>Stufe</th><th>Tarif A</th><th>Tarif B</th><th>Differenz abs.</th><th>Differenz rel.</th></tr></thead><tbody>{body}</tbody></table>"
    )
}

pub fn lifetime_table(simulation: &[SimulationStep]) -> String {
    let body: String = simulation
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                s.year,
                escape(&s.step),
                money(s.annual_a),
                money(s.annual_b),
                money(s.annual_delta),
            )
        })
        .collect();

    format!(
        "<table><thead><tr><th>Jahr</th><th>Stufe</th><th>Jahresbrutto A</th><th>Jahresbrutto B</th><th>Differenz</th></tr></thead><tbody>{body}</tbody></table>"
    )
}

fn source_row(table: &Table) -> String {
    let meta = &table.metadata;
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        escape(&table.name),
        escape(meta.source_url().unwrap_or(MISSING)),
        derivation_label(&table.metadata),
        escape(meta.notes().unwrap_or(MISSING)),
    )
}

/// Provenance of both tariffs
pub fn sources_table(a: &Table, b: &Table) -> String {
    format!(
        "<table><thead><tr><th>Tarif</th><th>Quellen</th><th>Abgeleitet/Original</th><th>Hinweise</th></tr></thead><tbody>{}{}</tbody></table>",
        source_row(a),
        source_row(b)
    )
}

/// Data quality and change history cards
pub fn governance_cards(quality: &QualityReport, a: &Table, b: &Table) -> String {
    let history = format!(
        "{} / {}",
        a.metadata.commit_hash().unwrap_or("n/a"),
        b.metadata.commit_hash().unwrap_or("n/a")
    );
    format!(
        r#"<div class="cards">{}{}{}{}</div>"#,
        card(
            "Monotone Steigerung geprüft",
            if quality.monotone { "Ja" } else { "Auffällig" }
        ),
        card("Ausreißer markiert", &quality.outliers.to_string()),
        card("Rundungsartefakte markiert", &quality.rounded.to_string()),
        card("Änderungsverlauf", &history),
    )
}

/// A section of the report page; `body` is trusted markup
pub struct Section<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

/// Standalone HTML page embedding `sections` in order
pub fn page(title: &str, sections: &[Section<'_>]) -> String {
    let body: String = sections
        .iter()
        .map(|s| {
            format!(
                "<section><h2>{}</h2>{}</section>",
                escape(s.title),
                s.body
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="de">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
        css = PAGE_CSS,
    )
}

const PAGE_CSS: &str = "body{font-family:sans-serif;margin:2rem;color:#1f2937}\
section{margin-bottom:2rem}\
table{border-collapse:collapse}\
td,th{border:1px solid #d1d5db;padding:4px 8px;text-align:right}\
.cards{display:flex;flex-wrap:wrap;gap:8px}\
.card{border:1px solid #d1d5db;border-radius:6px;padding:8px 12px}\
.k{font-size:12px;color:#6b7280}.v{font-size:18px}\
.positive{color:#d32f2f}.negative{color:#1d4ed8}\
svg{max-width:100%;height:auto}";
