// Heat gradient
//
// Maps a heatmap intensity (0.0 ~ 1.0) onto a blue -> green -> yellow -> red
// ramp for the terminal canvas.

use ratatui::style::Color;

const GRADIENT: [(u8, u8, u8); 4] = [
    (0, 0, 255),
    (0, 255, 0),
    (255, 255, 0),
    (255, 0, 0),
];

/// Interpolate between two RGB colors based on a ratio (0.0 ~ 1.0)
///
/// # Arguments
/// * `color1` - Starting color as (r, g, b) tuple
/// * `color2` - Ending color as (r, g, b) tuple
/// * `ratio` - Interpolation ratio (0.0 = color1, 1.0 = color2)
pub fn interpolate_color(color1: (u8, u8, u8), color2: (u8, u8, u8), ratio: f32) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * ratio).round() as u8;
    Color::Rgb(
        channel(color1.0, color2.0),
        channel(color1.1, color2.1),
        channel(color1.2, color2.2),
    )
}

/// Color for an intensity in `[0, 1]`; out-of-range input is clamped
pub fn heat_color(intensity: f64) -> Color {
    let t = if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let segments = (GRADIENT.len() - 1) as f64;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(GRADIENT.len() - 2);
    interpolate_color(GRADIENT[idx], GRADIENT[idx + 1], (pos - idx as f64) as f32)
}
