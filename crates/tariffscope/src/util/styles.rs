//! Common styling utilities for TUI components

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};

/// Standard color for focused panels
pub const FOCUS_COLOR: Color = Color::Yellow;

/// Standard color for help text
pub const HELP_COLOR: Color = Color::DarkGray;

/// Standard color for headers
pub const HEADER_COLOR: Color = Color::Cyan;

/// Tariff A series
pub const COLOR_A: Color = Color::Blue;

/// Tariff B series
pub const COLOR_B: Color = Color::Red;

/// Standard color for positive values
pub const POSITIVE_COLOR: Color = Color::Green;

/// Standard color for negative values
pub const NEGATIVE_COLOR: Color = Color::Red;

/// Standard color for warning/caution values
pub const WARNING_COLOR: Color = Color::Yellow;

/// Bordered block with a padded title.
pub fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
}

/// Bordered block with title and bottom help text.
pub fn block_with_help(title: &str, help_text: &str) -> Block<'static> {
    let mut block = titled_block(title);
    if !help_text.is_empty() {
        block = block.title_bottom(Line::from(format!(" {help_text} ")).fg(HELP_COLOR));
    }
    block
}

/// Get the appropriate color for a delta (green for positive, red for negative).
pub fn value_color(value: f64) -> Color {
    if value >= 0.0 {
        POSITIVE_COLOR
    } else {
        NEGATIVE_COLOR
    }
}

/// Heatmap background: red for positive, blue for negative, darker with `ratio` in [0, 1]
pub fn heat_color(value: f64, ratio: f64) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    let fade = |full: f64| (255.0 - (255.0 - full) * ratio).round() as u8;
    if value >= 0.0 {
        Color::Rgb(fade(200.0), fade(60.0), fade(50.0))
    } else {
        Color::Rgb(fade(40.0), fade(90.0), fade(200.0))
    }
}

/// Readable foreground on a [`heat_color`] background
pub fn heat_text_color(ratio: f64) -> Color {
    if ratio > 0.55 { Color::White } else { Color::Black }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_color_scale() {
        assert_eq!(heat_color(1.0, 0.0), Color::Rgb(255, 255, 255));
        assert_eq!(heat_color(1.0, 1.0), Color::Rgb(200, 60, 50));
        assert_eq!(heat_color(-1.0, 1.0), Color::Rgb(40, 90, 200));
        assert_eq!(heat_text_color(0.9), Color::White);
    }

    #[test]
    fn test_value_color() {
        assert_eq!(value_color(0.0), POSITIVE_COLOR);
        assert_eq!(value_color(-0.5), NEGATIVE_COLOR);
    }
}
