// Theme module - color palette for the map and the panels around it
//
// Panel chrome uses the constants below. Map colors live in an immutable
// Palette that is handed to the directive builders, so nothing looks
// colors up from shared mutable state.

pub mod heat;

pub use heat::heat_color;

use crate::render::Bucket;
use ratatui::style::Color;

/// Borders, titles, key hints
/// RGB: (122, 162, 247)
pub const ACCENT_BLUE: Color = Color::Rgb(122, 162, 247);

/// Warnings such as a failed simulation load
/// RGB: (255, 158, 100)
pub const WARNING_ORANGE: Color = Color::Rgb(255, 158, 100);

/// Errors
/// RGB: (247, 118, 142)
pub const ERROR_RED: Color = Color::Rgb(247, 118, 142);

/// Enabled toggles, playing state
/// RGB: (158, 206, 106)
pub const ACTIVE_GREEN: Color = Color::Rgb(158, 206, 106);

/// General text
/// RGB: (169, 177, 214)
pub const TEXT_GREY: Color = Color::Rgb(169, 177, 214);

/// Coastlines drawn under the simulation layers
/// RGB: (65, 72, 104)
pub const COASTLINE: Color = Color::Rgb(65, 72, 104);

/// Camp markers
/// RGB: (214, 69, 65)
pub const CAMP_MARKER: Color = Color::Rgb(214, 69, 65);

/// City markers
/// RGB: (56, 170, 221)
pub const CITY_MARKER: Color = Color::Rgb(56, 170, 221);

/// Stroke and fill for one visual class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub color: Color,
    pub fill_color: Option<Color>,
    pub fill_opacity: f32,
}

impl Swatch {
    pub const fn stroke(color: Color) -> Self {
        Self {
            color,
            fill_color: None,
            fill_opacity: 0.5,
        }
    }

    pub const fn filled(color: Color, fill_color: Color) -> Self {
        Self {
            color,
            fill_color: Some(fill_color),
            fill_opacity: 0.5,
        }
    }

    /// Fill color, falling back to the stroke color
    pub fn fill(&self) -> Color {
        self.fill_color.unwrap_or(self.color)
    }
}

/// Colors for every bucket of every map layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub circle_low: Swatch,
    pub circle_mid: Swatch,
    pub circle_high: Swatch,
    pub link_low: Swatch,
    pub link_mid: Swatch,
    pub link_high: Swatch,
    /// Forced redirections, regardless of flow
    pub link_forced: Swatch,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            circle_low: Swatch::filled(Color::Rgb(0, 0, 255), Color::Rgb(0, 51, 255)),
            circle_mid: Swatch::filled(Color::Rgb(0, 128, 0), Color::Rgb(51, 255, 0)),
            circle_high: Swatch::filled(Color::Rgb(255, 0, 0), Color::Rgb(255, 0, 51)),
            link_low: Swatch::stroke(Color::Rgb(28, 155, 255)),
            link_mid: Swatch::stroke(Color::Rgb(66, 232, 51)),
            link_high: Swatch::stroke(Color::Rgb(254, 79, 75)),
            link_forced: Swatch::filled(Color::Rgb(0, 0, 255), Color::Rgb(0, 51, 255)),
        }
    }
}

impl Palette {
    pub fn circle(&self, bucket: Bucket) -> Swatch {
        match bucket {
            Bucket::Low => self.circle_low,
            Bucket::Mid => self.circle_mid,
            Bucket::High => self.circle_high,
        }
    }

    pub fn link(&self, bucket: Bucket) -> Swatch {
        match bucket {
            Bucket::Low => self.link_low,
            Bucket::Mid => self.link_mid,
            Bucket::High => self.link_high,
        }
    }
}
