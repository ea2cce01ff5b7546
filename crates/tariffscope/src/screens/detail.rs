use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Row, Table, TableState},
};
use tariffscope_core::Dashboard;

use super::{Screen, dashboard_or_message};
use crate::components::{Component, EventResult};
use crate::state::AppState;
use crate::util::format::{format_euro, format_percent, format_signed_euro, format_years};
use crate::util::styles::{
    COLOR_A, COLOR_B, HEADER_COLOR, WARNING_COLOR, block_with_help, titled_block, value_color,
};

pub struct DetailScreen;

impl DetailScreen {
    pub fn new() -> Self {
        Self
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, state: &AppState, dashboard: &Dashboard) {
        let header = Row::new([
            "Stufe", "Tarif A", "Tarif B", "Δ", "Δ %", "Laufzeit A", "Laufzeit B", "Jahr A",
            "Jahr B", "",
        ])
        .style(Style::default().fg(HEADER_COLOR).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = dashboard
            .detail
            .iter()
            .map(|row| {
                let color = value_color(row.delta.abs);
                let flag = if row.rounding_suspect {
                    Span::styled("gerundet?", Style::default().fg(WARNING_COLOR))
                } else {
                    Span::raw("")
                };
                Row::new(vec![
                    Cell::from(row.step.clone()),
                    Cell::from(format_euro(row.a)),
                    Cell::from(format_euro(row.b)),
                    Cell::from(format_signed_euro(row.delta.abs)).style(Style::default().fg(color)),
                    Cell::from(format_percent(row.delta.rel)).style(Style::default().fg(color)),
                    Cell::from(format_years(row.duration_a)),
                    Cell::from(format_years(row.duration_b)),
                    Cell::from(format_euro(row.annual_a)),
                    Cell::from(format_euro(row.annual_b)),
                    Cell::from(Line::from(flag)),
                ])
            })
            .collect();

        let title = format!(
            "Detail {} ({}, {})",
            dashboard.detail_group,
            dashboard.reference.label(),
            state.selections.simulation.time_mode.label()
        );
        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(13),
                Constraint::Length(13),
                Constraint::Length(13),
                Constraint::Length(10),
                Constraint::Length(11),
                Constraint::Length(11),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Min(9),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(block_with_help(&title, "j/k: Zeile | g/G: Gruppe | t: Laufzeitmodus"));

        let mut table_state = TableState::default().with_selected(Some(state.detail_scroll));
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    /// Step-to-step increase in percent, one bar pair per step
    fn render_progression(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let bar = |value: f64, color: Color| {
            Bar::default()
                .value((value * 100.0).round().max(0.0) as u64)
                .text_value(format_percent(value))
                .style(Style::default().fg(color))
        };

        let mut chart = BarChart::default()
            .block(titled_block("Steigerung je Stufe (A/B)"))
            .bar_width(7)
            .bar_gap(1)
            .group_gap(3)
            .direction(Direction::Vertical);
        for step in &dashboard.progression {
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(format!("St {}", step.step)))
                    .bars(&[bar(step.a, COLOR_A), bar(step.b, COLOR_B)]),
            );
        }
        frame.render_widget(chart, area);
    }
}

impl Component for DetailScreen {
    fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> EventResult {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                state.scroll(true);
                EventResult::Handled
            }
            KeyCode::Char('k') | KeyCode::Up => {
                state.scroll(false);
                EventResult::Handled
            }
            _ => EventResult::NotHandled,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(dashboard) = dashboard_or_message(frame, area, state, self.title()) else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),     // Detail table
                Constraint::Length(12), // Progression
            ])
            .split(area);

        self.render_table(frame, chunks[0], state, dashboard);
        self.render_progression(frame, chunks[1], dashboard);
    }
}

impl Screen for DetailScreen {
    fn title(&self) -> &str {
        "Detail"
    }
}
