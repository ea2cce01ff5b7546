use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Cell, Row, Table},
};
use tariffscope_core::Dashboard;
use tariffscope_core::render::svg::HeatmapValue;

use super::{Screen, dashboard_or_message};
use crate::components::{Component, EventResult};
use crate::state::AppState;
use crate::util::styles::{HEADER_COLOR, block_with_help, heat_color, heat_text_color};

/// Width of one step column
const COLUMN_WIDTH: u16 = 9;

pub struct HeatmapScreen;

impl HeatmapScreen {
    pub fn new() -> Self {
        Self
    }

    /// Group x step matrix of the selected delta; `None` where the pair has no cell
    fn matrix(dashboard: &Dashboard, value: HeatmapValue) -> Vec<Vec<Option<f64>>> {
        dashboard
            .groups
            .iter()
            .map(|group| {
                dashboard
                    .overview
                    .steps
                    .iter()
                    .map(|step| {
                        dashboard
                            .cells
                            .iter()
                            .find(|c| c.group == *group && c.step == step.step)
                            .map(|c| value.pick(c, dashboard.reference))
                    })
                    .collect()
            })
            .collect()
    }
}

impl Component for HeatmapScreen {
    fn handle_key(&mut self, _key: KeyEvent, _state: &mut AppState) -> EventResult {
        EventResult::NotHandled
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(dashboard) = dashboard_or_message(frame, area, state, self.title()) else {
            return;
        };
        let value = state.selections.heatmap;
        let matrix = Self::matrix(dashboard, value);
        let range = matrix
            .iter()
            .flatten()
            .flatten()
            .map(|v| v.abs())
            .fold(1.0_f64, f64::max);

        let mut header = vec![Cell::from("EG")];
        header.extend(
            dashboard
                .overview
                .steps
                .iter()
                .map(|s| Cell::from(format!("St {}", s.step))),
        );
        let header =
            Row::new(header).style(Style::default().fg(HEADER_COLOR).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = dashboard
            .groups
            .iter()
            .zip(&matrix)
            .map(|(group, values)| {
                let mut cells = vec![Cell::from(group.clone())];
                cells.extend(values.iter().map(|v| match v {
                    Some(v) => {
                        let ratio = v.abs() / range;
                        let text = match value {
                            HeatmapValue::Abs => format!("{v:.0}"),
                            HeatmapValue::Rel => format!("{v:.1}"),
                        };
                        Cell::from(text).style(
                            Style::default()
                                .bg(heat_color(*v, ratio))
                                .fg(heat_text_color(ratio)),
                        )
                    }
                    None => Cell::from("·"),
                }));
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Length(8)];
        widths.extend(dashboard.overview.steps.iter().map(|_| Constraint::Length(COLUMN_WIDTH)));

        let title = format!(
            "Heatmap Δ {} ({})",
            dashboard.reference.label(),
            value.label()
        );
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(block_with_help(&title, "h: absolut/relativ | r: Bezug | p: PNG"));
        frame.render_widget(table, area);
    }
}

impl Screen for HeatmapScreen {
    fn title(&self) -> &str {
        "Heatmap"
    }
}
