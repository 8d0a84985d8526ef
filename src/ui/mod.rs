// UI rendering module
//
// This module contains all UI rendering components for driftmap.
// The main draw() function orchestrates rendering of all UI panels.

mod inspector;
mod map;
mod status_bar;

use crate::app::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use inspector::render_inspector;
use map::render_map;
use status_bar::render_status_bar;

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &AppState) {
    let size = f.area();

    // Main layout: body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    // Body: map + inspector
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // Map
            Constraint::Percentage(30), // Inspector
        ])
        .split(chunks[0]);

    render_map(f, body_chunks[0], app);
    render_inspector(f, body_chunks[1], app);

    render_status_bar(f, chunks[1], app);
}
