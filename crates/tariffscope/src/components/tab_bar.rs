use super::{Component, EventResult};
use crate::state::{AppState, TabId};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};

pub struct TabBar;

impl TabBar {
    pub fn new() -> Self {
        Self
    }
}

impl Component for TabBar {
    fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> EventResult {
        let KeyCode::Char(c) = key.code else {
            return EventResult::NotHandled;
        };
        let tab = c
            .to_digit(10)
            .and_then(|d| (d as usize).checked_sub(1))
            .and_then(TabId::from_index);
        match tab {
            Some(tab) => {
                state.switch_tab(tab);
                EventResult::Handled
            }
            None => EventResult::NotHandled,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let titles: Vec<Line> = TabId::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| {
                let content = format!("[{}] {}", idx + 1, tab.name());
                if *tab == state.active_tab {
                    Line::from(Span::styled(
                        content,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(content, Style::default().fg(Color::Gray)))
                }
            })
            .collect();

        let pair = format!(
            " A: {}  B: {}  ({}) ",
            state.selections.tariff_a,
            state.selections.tariff_b,
            state.selections.reference.label()
        );

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .title_top(Line::from(pair).right_aligned()),
            )
            .select(state.active_tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        frame.render_widget(tabs, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_digit_keys_switch_tabs() {
        let mut state = AppState::default();
        let mut bar = TabBar::new();

        assert_eq!(bar.handle_key(key('3'), &mut state), EventResult::Handled);
        assert_eq!(state.active_tab, TabId::Heatmap);
        assert_eq!(bar.handle_key(key('0'), &mut state), EventResult::NotHandled);
        assert_eq!(bar.handle_key(key('6'), &mut state), EventResult::NotHandled);
        assert_eq!(bar.handle_key(key('x'), &mut state), EventResult::NotHandled);
        assert_eq!(state.active_tab, TabId::Heatmap);
    }
}
