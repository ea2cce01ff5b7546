pub mod detail;
pub mod heatmap;
pub mod overview;
pub mod simulation;
pub mod sources;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
};
use tariffscope_core::Dashboard;

use crate::components::Component;
use crate::state::{AppState, View};
use crate::util::styles::titled_block;

/// Trait for full screen views
pub trait Screen: Component {
    /// Get the screen title
    fn title(&self) -> &str;
}

/// The dashboard to draw, or render the loading/no-data/error message instead.
pub fn dashboard_or_message<'a>(
    frame: &mut Frame,
    area: Rect,
    state: &'a AppState,
    title: &str,
) -> Option<&'a Dashboard> {
    let lines = match &state.view {
        View::Ready(dashboard) => return Some(&**dashboard),
        View::Loading => vec![Line::from(""), Line::from("  Lade Tabellen...")],
        View::NoData => vec![
            Line::from(""),
            Line::from("  Keine Daten im gewählten Filterbereich."),
            Line::from(""),
            Line::from("  Andere Tarife wählen oder die Filter in config.yaml weiter fassen."),
        ],
        View::Fatal(message) => vec![
            Line::from(""),
            Line::styled(format!("  {message}"), Style::default().fg(Color::Red)),
        ],
    };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(titled_block(title));
    frame.render_widget(paragraph, area);
    None
}
