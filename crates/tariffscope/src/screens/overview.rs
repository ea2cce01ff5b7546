use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
};
use tariffscope_core::{Dashboard, Summary};

use super::{Screen, dashboard_or_message};
use crate::components::{Component, EventResult};
use crate::state::AppState;
use crate::util::format::{format_euro, format_euro_short};
use crate::util::styles::{COLOR_A, COLOR_B, HEADER_COLOR, titled_block, value_color};

pub struct OverviewScreen;

impl OverviewScreen {
    pub fn new() -> Self {
        Self
    }

    fn render_kpis(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let lines: Vec<Line> = dashboard
            .kpis
            .iter()
            .map(|kpi| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<40}", kpi.label),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(kpi.value.clone()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(titled_block("Kennzahlen")), area);
    }

    fn render_curve(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let steps = &dashboard.overview.steps;
        let series = |pick: fn(&tariffscope_core::analysis::StepAverage) -> f64| -> Vec<(f64, f64)> {
            steps
                .iter()
                .enumerate()
                .map(|(i, s)| ((i + 1) as f64, pick(s)))
                .collect()
        };
        let data_a = series(|s| s.a);
        let data_b = series(|s| s.b);

        let values = || steps.iter().flat_map(|s| [s.a, s.b]);
        let min = values().fold(f64::INFINITY, f64::min);
        let max = values().fold(f64::NEG_INFINITY, f64::max);
        let padding = (max - min).abs().max(1.0) * 0.1;
        let (y_min, y_max) = (min - padding, max + padding);

        let datasets = vec![
            Dataset::default()
                .name(dashboard.tariff_a.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(COLOR_A))
                .data(&data_a),
            Dataset::default()
                .name(dashboard.tariff_b.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(COLOR_B))
                .data(&data_b),
        ];

        let x_labels: Vec<Span> = steps.iter().map(|s| Span::raw(s.step.clone())).collect();
        let x_axis = Axis::default()
            .title("Stufe".dark_gray())
            .bounds([1.0, steps.len().max(2) as f64])
            .labels(x_labels);
        let y_axis = Axis::default()
            .bounds([y_min, y_max])
            .labels(vec![
                Span::raw(format_euro_short(y_min)),
                Span::raw(format_euro_short((y_min + y_max) / 2.0)),
                Span::raw(format_euro_short(y_max)),
            ]);

        let chart = Chart::new(datasets)
            .block(titled_block("Mittelwert je Stufe"))
            .x_axis(x_axis)
            .y_axis(y_axis);
        frame.render_widget(chart, area);
    }

    fn summary_row<'a>(label: &'a str, summary: &Summary) -> Row<'a> {
        Row::new(vec![
            Cell::from(label),
            Cell::from(summary.count.to_string()),
            Cell::from(format_euro(summary.mean)),
            Cell::from(format_euro(summary.median)),
            Cell::from(format_euro(summary.p10)),
            Cell::from(format_euro(summary.p90)),
            Cell::from(format_euro(summary.stddev)),
            Cell::from(format!("{:.3}", summary.cv)),
        ])
    }

    fn render_statistics(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let header = Row::new(["", "n", "Mittel", "Median", "P10", "P90", "Std.abw.", "VK"])
            .style(Style::default().fg(HEADER_COLOR).add_modifier(Modifier::BOLD));
        let delta_label = format!("Δ {}", dashboard.reference.label());
        let rows = vec![
            Self::summary_row(&dashboard.tariff_a, &dashboard.summary_a),
            Self::summary_row(&dashboard.tariff_b, &dashboard.summary_b),
            Self::summary_row(&delta_label, &dashboard.summary_delta)
                .style(Style::default().fg(value_color(dashboard.summary_delta.mean))),
        ];
        let correlation = dashboard
            .correlation
            .map_or_else(|| "—".to_string(), |r| format!("{r:.3}"));

        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(5),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .block(titled_block(&format!("Statistik (Korrelation A/B: {correlation})")));
        frame.render_widget(table, area);
    }
}

impl Component for OverviewScreen {
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
                Constraint::Length(dashboard.kpis.len() as u16 + 2), // KPIs
                Constraint::Min(10),                                  // Curve
                Constraint::Length(6),                                // Statistics
            ])
            .split(area);

        self.render_kpis(frame, chunks[0], dashboard);
        self.render_curve(frame, chunks[1], dashboard);
        self.render_statistics(frame, chunks[2], dashboard);
    }
}

impl Screen for OverviewScreen {
    fn title(&self) -> &str {
        "Überblick"
    }
}
