// Render directives
//
// The core never draws. Builders turn scaled magnitudes and thresholds into
// plain directives (circles, half-edge lines, heatmap payload, location
// markers) and hand them
// to a RenderSink; the terminal map is one such sink.

pub mod circles;
pub mod heatmap;
pub mod lines;
pub mod markers;
pub mod projection;
pub mod threshold;

pub use heatmap::{HeatmapBuilder, HeatmapView};
pub use projection::{Equirectangular, Projection};
pub use threshold::{ThresholdMode, ThresholdSet, Thresholds};

use crate::scaling::ScalingTool;
use crate::theme::Palette;
use ratatui::style::Color;

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Color/size class chosen from a scaled magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Low,
    Mid,
    High,
}

/// A scaled circle at a location
#[derive(Debug, Clone, PartialEq)]
pub struct CircleDirective {
    pub name: String,
    pub position: LatLng,
    pub color: Color,
    pub fill_color: Color,
    pub fill_opacity: f32,
    pub radius_pixels: f64,
    pub bucket: Bucket,
}

/// How a line's color was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Forced redirection, fixed color
    Forced,
    Bucketed(Bucket),
}

/// Kind of place a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Camp,
    City,
}

/// Fixed-size glyph at a location, drawn whatever its refugee count
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDirective {
    pub name: String,
    pub position: LatLng,
    pub kind: MarkerKind,
}

/// A route drawn as a half-edge arrow: source, destination, arrowhead point
#[derive(Debug, Clone, PartialEq)]
pub struct LineDirective {
    pub points: [LatLng; 3],
    pub color: Color,
    pub weight: u16,
    pub offset: u16,
    pub popup_text: String,
    pub class: LineClass,
}

/// One weighted heatmap point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
}

/// Heatmap data with its (already scaled) value range
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPayload {
    pub max: f64,
    pub min: f64,
    pub data: Vec<HeatPoint>,
}

/// Receiver of render directives
pub trait RenderSink {
    /// Drop everything emitted for the previous frame
    fn clear(&mut self);
    fn circle(&mut self, directive: CircleDirective);
    fn line(&mut self, directive: LineDirective);
    fn heatmap(&mut self, payload: HeatmapPayload);
    fn marker(&mut self, directive: MarkerDirective);
}

/// Sink that keeps the directives of the latest frame in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameBuffer {
    pub circles: Vec<CircleDirective>,
    pub lines: Vec<LineDirective>,
    pub heatmap: Option<HeatmapPayload>,
    pub markers: Vec<MarkerDirective>,
}

impl RenderSink for FrameBuffer {
    fn clear(&mut self) {
        self.circles.clear();
        self.lines.clear();
        self.heatmap = None;
        self.markers.clear();
    }

    fn circle(&mut self, directive: CircleDirective) {
        self.circles.push(directive);
    }

    fn line(&mut self, directive: LineDirective) {
        self.lines.push(directive);
    }

    fn heatmap(&mut self, payload: HeatmapPayload) {
        self.heatmap = Some(payload);
    }

    fn marker(&mut self, directive: MarkerDirective) {
        self.markers.push(directive);
    }
}

/// Everything a builder needs to turn a magnitude into a directive
///
/// Borrowed and immutable for the duration of one redraw.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub scaling: &'a ScalingTool,
    pub thresholds: &'a Thresholds,
    pub palette: &'a Palette,
    pub radius_multiplier: f64,
}
