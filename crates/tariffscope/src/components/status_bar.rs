use super::{Component, EventResult};
use crate::state::{AppState, TabId};
use crate::util::styles::{HELP_COLOR, POSITIVE_COLOR};
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    fn help_text(state: &AppState) -> &'static str {
        match state.active_tab {
            TabId::Overview => {
                "1-5: tabs | a/A b/B: tariffs | r: reference | m: arguments | c/x/p: export | q: quit"
            }
            TabId::Detail => "j/k: scroll | g/G: group | t: time mode | r: reference | q: quit",
            TabId::Heatmap => "h: abs/rel | r: reference | p: PNG export | q: quit",
            TabId::Simulation => "j/k: scroll | g/G: group | +/-: years | t: time mode | q: quit",
            TabId::Sources => "a/A b/B: tariffs | 1-5: tabs | q: quit",
        }
    }
}

impl Component for StatusBar {
    fn handle_key(&mut self, _key: KeyEvent, _state: &mut AppState) -> EventResult {
        EventResult::NotHandled
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let content = if let Some(error) = &state.error_message {
            Line::from(vec![
                Span::styled("Fehler: ", Style::default().fg(Color::Red)),
                Span::raw(error),
            ])
        } else if let Some(status) = &state.status_message {
            Line::from(Span::styled(status, Style::default().fg(POSITIVE_COLOR)))
        } else {
            Line::from(Span::styled(
                Self::help_text(state),
                Style::default().fg(HELP_COLOR),
            ))
        };

        let paragraph = Paragraph::new(content).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}
