use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
};
use tariffscope_core::Dashboard;
use tariffscope_core::model::SimulationStep;
use tariffscope_core::simulation::Components;

use super::{Screen, dashboard_or_message};
use crate::components::{Component, EventResult};
use crate::state::AppState;
use crate::util::format::{format_euro, format_euro_short, format_signed_euro};
use crate::util::styles::{
    COLOR_A, COLOR_B, HEADER_COLOR, POSITIVE_COLOR, block_with_help, titled_block, value_color,
};

pub struct SimulationScreen;

fn components_label(components: Components) -> String {
    let names = [
        (components.base_salary, "Grundgehalt"),
        (components.year_end_bonus, "Jahressonderzahlung"),
        (components.savings_plan, "VL"),
        (components.flat_allowance, "Zulage"),
    ];
    let enabled: Vec<&str> = names
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();
    if enabled.is_empty() {
        "keine".to_string()
    } else {
        enabled.join(" + ")
    }
}

impl SimulationScreen {
    pub fn new() -> Self {
        Self
    }

    fn render_parameters(&self, frame: &mut Frame, area: Rect, state: &AppState, dashboard: &Dashboard) {
        let params = &state.selections.simulation;
        let total = dashboard.simulation.last().map_or(0.0, |s| s.cumulative_delta);
        let lines = vec![
            Line::from(format!(
                "EG {} ab Stufe {} über {} Jahre | Laufzeit: {} | Arbeitszeitfaktor {:.2}",
                dashboard.simulation_group,
                params.start_step,
                params.years,
                params.time_mode.label(),
                params.work_factor
            )),
            Line::from(vec![
                Span::raw(format!("Bestandteile: {} | ", components_label(params.components))),
                Span::raw("Differenz kumuliert (A − B): "),
                Span::styled(
                    format_signed_euro(total),
                    Style::default().fg(value_color(total)).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(titled_block("Parameter")), area);
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let series = |pick: fn(&SimulationStep) -> f64| -> Vec<(f64, f64)> {
            dashboard
                .simulation
                .iter()
                .map(|s| (s.year as f64, pick(s)))
                .collect()
        };
        let data_a = series(|s| s.cumulative_a);
        let data_b = series(|s| s.cumulative_b);
        let data_delta = series(|s| s.cumulative_delta);

        let all = || data_a.iter().chain(&data_b).chain(&data_delta).map(|(_, y)| *y);
        let y_min = all().fold(0.0_f64, f64::min);
        let y_max = all().fold(1.0_f64, f64::max);
        let years = dashboard.simulation.len().max(2) as f64;

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
            Dataset::default()
                .name("Δ kumuliert")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(POSITIVE_COLOR))
                .data(&data_delta),
        ];

        let chart = Chart::new(datasets)
            .block(titled_block("Kumulierter Verdienst"))
            .x_axis(
                Axis::default()
                    .title("Jahr".dark_gray())
                    .bounds([1.0, years])
                    .labels(vec![
                        Span::raw("1"),
                        Span::raw(format!("{}", (years / 2.0).round())),
                        Span::raw(format!("{years}")),
                    ]),
            )
            .y_axis(Axis::default().bounds([y_min, y_max]).labels(vec![
                Span::raw(format_euro_short(y_min)),
                Span::raw(format_euro_short((y_min + y_max) / 2.0)),
                Span::raw(format_euro_short(y_max)),
            ]));
        frame.render_widget(chart, area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, state: &AppState, dashboard: &Dashboard) {
        let header = Row::new([
            "Jahr", "Stufe", "Jahr A", "Jahr B", "Δ Jahr", "Kumuliert A", "Kumuliert B", "Δ kumuliert",
        ])
        .style(Style::default().fg(HEADER_COLOR).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = dashboard
            .simulation
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.year.to_string()),
                    Cell::from(s.step.clone()),
                    Cell::from(format_euro(s.annual_a)),
                    Cell::from(format_euro(s.annual_b)),
                    Cell::from(format_signed_euro(s.annual_delta))
                        .style(Style::default().fg(value_color(s.annual_delta))),
                    Cell::from(format_euro(s.cumulative_a)),
                    Cell::from(format_euro(s.cumulative_b)),
                    Cell::from(format_signed_euro(s.cumulative_delta))
                        .style(Style::default().fg(value_color(s.cumulative_delta))),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(6),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Length(13),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Min(14),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(block_with_help("Jahre", "j/k: Zeile | g/G: Gruppe | +/-: Jahre | t: Laufzeit"));

        let mut table_state = TableState::default().with_selected(Some(state.simulation_scroll));
        frame.render_stateful_widget(table, area, &mut table_state);
    }
}

impl Component for SimulationScreen {
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
                Constraint::Length(4),      // Parameters
                Constraint::Percentage(50), // Chart
                Constraint::Min(6),         // Table
            ])
            .split(area);

        self.render_parameters(frame, chunks[0], state, dashboard);
        self.render_chart(frame, chunks[1], dashboard);
        self.render_table(frame, chunks[2], state, dashboard);
    }
}

impl Screen for SimulationScreen {
    fn title(&self) -> &str {
        "Lebensverdienst"
    }
}
