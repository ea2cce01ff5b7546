use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Wrap},
};
use tariffscope_core::Metadata;
use tariffscope_core::render::{MISSING, derivation_label};

use super::{Screen, dashboard_or_message};
use crate::components::{Component, EventResult};
use crate::state::AppState;
use crate::util::styles::{HEADER_COLOR, POSITIVE_COLOR, WARNING_COLOR, titled_block};

pub struct SourcesScreen;

fn metadata_row<'a>(name: &'a str, metadata: &'a Metadata) -> Row<'a> {
    let text = |v: Option<&'a str>| Cell::from(v.unwrap_or(MISSING));
    Row::new(vec![
        Cell::from(name),
        Cell::from(
            metadata
                .valid_from_label()
                .unwrap_or_else(|| MISSING.to_string()),
        ),
        text(metadata.version()),
        Cell::from(derivation_label(metadata)),
        text(metadata.commit_hash()),
        text(metadata.source_url()),
    ])
}

impl SourcesScreen {
    pub fn new() -> Self {
        Self
    }
}

impl Component for SourcesScreen {
    fn handle_key(&mut self, _key: KeyEvent, _state: &mut AppState) -> EventResult {
        EventResult::NotHandled
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(dashboard) = dashboard_or_message(frame, area, state, self.title()) else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Summary
                Constraint::Length(5), // Tables
                Constraint::Length(5), // Quality
                Constraint::Min(3),    // Notes
            ])
            .split(area);

        let source = state.source_label.as_deref().unwrap_or(MISSING);
        let summary = vec![
            Line::from(format!("Quelle: {source}")),
            Line::from(format!("Gültigkeit: {}", dashboard.validity)),
            Line::from(format!("Version: {}", dashboard.version)),
        ];
        frame.render_widget(Paragraph::new(summary).block(titled_block("Stand")), chunks[0]);

        let header = Row::new(["Tarif", "Gültig ab", "Version", "Herkunft", "Commit", "Quelle"])
            .style(Style::default().fg(HEADER_COLOR).add_modifier(Modifier::BOLD));
        let rows = vec![
            metadata_row(&dashboard.tariff_a, &dashboard.metadata_a),
            metadata_row(&dashboard.tariff_b, &dashboard.metadata_b),
        ];
        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(16),
                Constraint::Length(10),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(titled_block("Tabellen"));
        frame.render_widget(table, chunks[1]);

        let quality = &dashboard.quality;
        let flag = |ok: bool, text: String| {
            let color = if ok { POSITIVE_COLOR } else { WARNING_COLOR };
            Line::from(Span::styled(text, Style::default().fg(color)))
        };
        let quality_lines = vec![
            flag(
                quality.monotone,
                if quality.monotone {
                    "Stufen steigen in allen Gruppen monoton".to_string()
                } else {
                    "Nicht monotone Stufenfolge gefunden".to_string()
                },
            ),
            flag(
                quality.outliers == 0,
                format!("Sprünge über Schwellwert: {}", quality.outliers),
            ),
            flag(
                quality.rounded == 0,
                format!("Verdächtig runde Werte: {}", quality.rounded),
            ),
        ];
        frame.render_widget(
            Paragraph::new(quality_lines).block(titled_block("Datenqualität")),
            chunks[2],
        );

        let notes: Vec<Line> = [
            (&dashboard.tariff_a, &dashboard.metadata_a),
            (&dashboard.tariff_b, &dashboard.metadata_b),
        ]
        .into_iter()
        .filter_map(|(name, meta)| meta.notes().map(|n| Line::from(format!("{name}: {n}"))))
        .collect();
        frame.render_widget(
            Paragraph::new(notes)
                .wrap(Wrap { trim: true })
                .block(titled_block("Hinweise")),
            chunks[3],
        );
    }
}

impl Screen for SourcesScreen {
    fn title(&self) -> &str {
        "Quellen"
    }
}
