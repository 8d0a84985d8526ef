// Status Bar rendering module
//
// Renders the bottom status bar with playback state, keyboard shortcuts,
// layer toggle indicators and the last load error.

use crate::app::{AppState, PlaybackState};
use crate::theme::{ACCENT_BLUE, ACTIVE_GREEN, ERROR_RED, TEXT_GREY, WARNING_ORANGE};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    // Calculate available width for hints (subtract borders and playback badge)
    let available_width = area.width.saturating_sub(4) as usize;

    struct Hint {
        priority: u8,
        key: &'static str,
        desc: &'static str,
    }

    let hints = [
        Hint { priority: 1, key: "Q:", desc: "Quit | " },
        Hint { priority: 1, key: "Space:", desc: "Play | " },
        Hint { priority: 1, key: "←→:", desc: "Step | " },
        Hint { priority: 2, key: "+/-:", desc: "Speed | " },
        Hint { priority: 2, key: "z/x:", desc: "Zoom | " },
        Hint { priority: 2, key: "m:", desc: "Scaling | " },
        Hint { priority: 2, key: "g:", desc: "Thresholds | " },
        Hint { priority: 3, key: "Tab:", desc: "Next sim | " },
        Hint { priority: 3, key: "↑↓:", desc: "Select | " },
        Hint { priority: 3, key: "[/]:", desc: "Midpoint | " },
        Hint { priority: 3, key: "PgUp/PgDn:", desc: "Seek | " },
    ];

    let (badge, badge_color) = match app.playback.state() {
        PlaybackState::Playing => (format!(" ▶ {}x ", app.playback.speed()), ACTIVE_GREEN),
        PlaybackState::Stopped => (format!(" ⏸ {}x ", app.playback.speed()), TEXT_GREY),
    };
    let mut current_length = badge.chars().count();
    let mut spans = vec![Span::styled(
        badge,
        Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
    )];

    if let Some(error) = &app.load_error {
        // A failed load takes the place of the hints
        spans.push(Span::styled(
            format!("Load failed: {}", error),
            Style::default().fg(WARNING_ORANGE),
        ));
    } else {
        for priority in 1..=3 {
            for hint in hints.iter().filter(|h| h.priority == priority) {
                let hint_length = hint.key.chars().count() + hint.desc.len();
                if current_length + hint_length <= available_width {
                    spans.push(Span::styled(
                        hint.key,
                        Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::raw(hint.desc));
                    current_length += hint_length;
                }
            }
        }
    }

    spans.push(Span::raw(" "));
    spans.extend(build_toggle_indicators(app));

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(ACCENT_BLUE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

fn indicator(key: &'static str, state: &'static str, on: bool) -> Vec<Span<'static>> {
    let color = if on { ACTIVE_GREEN } else { TEXT_GREY };
    vec![
        Span::styled(format!("[{}:", key), Style::default().fg(TEXT_GREY)),
        Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled("] ", Style::default().fg(TEXT_GREY)),
    ]
}

/// Build layer indicator spans: [c:ON] [r:ON] [t:ON] [a:ON] [i:ON] [v:OFF]
pub fn build_toggle_indicators(app: &AppState) -> Vec<Span<'static>> {
    let on_off = |on: bool| if on { "ON" } else { "OFF" };
    let layers = &app.layers;

    let mut spans = Vec::new();
    spans.extend(indicator("c", on_off(layers.circles), layers.circles));
    spans.extend(indicator("r", on_off(layers.routes), layers.routes));
    spans.extend(indicator("t", on_off(layers.labels), layers.labels));
    spans.extend(indicator("a", on_off(layers.camps), layers.camps));
    spans.extend(indicator("i", on_off(layers.cities), layers.cities));
    match layers.heatmap {
        Some(view) => spans.extend(indicator("v", view.label(), true)),
        None => spans.extend(indicator("v", "OFF", false)),
    }

    if app.session.is_none() && app.load_error.is_none() {
        spans.push(Span::styled(
            "no simulation",
            Style::default().fg(ERROR_RED).add_modifier(Modifier::ITALIC),
        ));
    }
    spans
}
