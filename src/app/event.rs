// Keyboard event handling
//
// This module contains the keyboard event handler that processes
// user input and updates the application state accordingly.

use super::config::SEEK_STEP;
use super::AppState;
use crossterm::event::KeyCode;
use std::time::Instant;

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q`, `Esc` - Quit the application
/// - `Space` - Play / pause
/// - `Left`, `Right` - Step back / forward
/// - `Home`, `End` - Jump to the first / last step
/// - `PageUp`, `PageDown` - Seek ten steps back / forward
/// - `+`, `=` - Faster playback
/// - `-`, `_` - Slower playback
/// - `z`, `x` - Zoom in / out
/// - `Up`, `Down` - Select location
/// - `m` - Cycle scaling method
/// - `g` - Cycle threshold mode
/// - `[`, `]` - Move the logistic curve midpoints one step earlier / later
/// - `v` - Cycle heatmap view (off / refugees / difference)
/// - `c` - Toggle circles
/// - `r` - Toggle routes
/// - `t` - Toggle labels
/// - `a` - Toggle camp markers
/// - `i` - Toggle city markers
/// - `Tab` - Load the next simulation
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            false
        }
        KeyCode::Char(' ') => {
            app.toggle_playback(Instant::now());
            true
        }
        KeyCode::Left => {
            app.back();
            true
        }
        KeyCode::Right => {
            app.forward();
            true
        }
        KeyCode::Home => {
            app.beginning();
            true
        }
        KeyCode::End => {
            app.end();
            true
        }
        KeyCode::PageUp => {
            app.seek(-(SEEK_STEP as isize));
            true
        }
        KeyCode::PageDown => {
            app.seek(SEEK_STEP as isize);
            true
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.faster(Instant::now());
            true
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            app.slower(Instant::now());
            true
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => {
            app.zoom_in();
            true
        }
        KeyCode::Char('x') | KeyCode::Char('X') => {
            app.zoom_out();
            true
        }
        KeyCode::Up => {
            app.select_previous_location();
            true
        }
        KeyCode::Down => {
            app.select_next_location();
            true
        }
        KeyCode::Char('m') | KeyCode::Char('M') => {
            app.cycle_scaling();
            true
        }
        KeyCode::Char('g') | KeyCode::Char('G') => {
            app.cycle_threshold_mode();
            true
        }
        KeyCode::Char('[') => {
            app.nudge_logistic_midpoint(-1.0);
            true
        }
        KeyCode::Char(']') => {
            app.nudge_logistic_midpoint(1.0);
            true
        }
        KeyCode::Char('v') | KeyCode::Char('V') => {
            app.cycle_heatmap_view();
            true
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            app.toggle_circles();
            true
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.toggle_routes();
            true
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.toggle_labels();
            true
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.toggle_camps();
            true
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            app.toggle_cities();
            true
        }
        KeyCode::Tab => {
            app.next_simulation();
            true
        }
        _ => true,
    }
}
