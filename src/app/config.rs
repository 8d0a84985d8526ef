// Application configuration types
//
// This module contains constants and settings structs for:
// - Playback timing and speed
// - Map view (zoom, circle size)
// - Layer visibility

use crate::render::{HeatmapView, ThresholdMode};
use crate::scaling::{ScalingKind, DEFAULT_MIDPOINT_DEVIATION};
use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Playback tick interval at 1x speed in milliseconds
pub const TICK_INTERVAL_MS: u64 = 200;

/// Slowest playback speed multiplier
pub const MIN_SPEED: f64 = 0.25;

/// Fastest playback speed multiplier
pub const MAX_SPEED: f64 = 8.0;

/// Speed changes double or halve the multiplier
pub const SPEED_FACTOR: f64 = 2.0;

/// How long the event loop waits for input before redrawing
pub const UI_POLL_MS: u64 = 50;

/// Radius in pixels of the circle for the largest location
pub const DEFAULT_MAX_RADIUS_PX: f64 = 30.0;

pub const DEFAULT_ZOOM: f64 = 6.0;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 12.0;

/// Zoom change per key press
pub const ZOOM_STEP: f64 = 1.0;

/// Steps skipped by PageUp / PageDown
pub const SEEK_STEP: usize = 10;

// ============================================================================
// Configuration Structs
// ============================================================================

/// Which map layers are drawn
/// Each field has its own toggle key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSettings {
    /// Heatmap view, or `None` when the heatmap is hidden (toggle with 'v')
    pub heatmap: Option<HeatmapView>,

    /// Scaled location circles (toggle with 'c')
    pub circles: bool,

    /// Route half-edges (toggle with 'r')
    pub routes: bool,

    /// Location names next to circles (toggle with 't')
    pub labels: bool,

    /// Camp markers (toggle with 'a')
    pub camps: bool,

    /// City markers (toggle with 'i')
    pub cities: bool,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            heatmap: None,
            circles: true,
            routes: true,
            labels: true,
            camps: true,
            cities: true,
        }
    }
}

impl LayerSettings {
    /// Off -> refugees -> difference -> off
    pub fn cycle_heatmap(&mut self) {
        self.heatmap = match self.heatmap {
            None => Some(HeatmapView::Refugees),
            Some(HeatmapView::Refugees) => Some(HeatmapView::Difference),
            Some(HeatmapView::Difference) => None,
        };
    }
}

/// Startup configuration, filled from the command line
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub scaling: ScalingKind,
    pub threshold_mode: ThresholdMode,

    /// Playback speed multiplier (0.25-8.0)
    pub speed: f64,

    pub max_radius_px: f64,

    /// Divisor for the logistic midpoint fit
    pub mid_point_deviation: f64,

    pub zoom: f64,
}

impl PlaybackConfig {
    /// Interval between playback steps at `speed`
    pub fn tick_interval(speed: f64) -> Duration {
        let micros = (TICK_INTERVAL_MS as f64 * 1000.0 / speed).round();
        Duration::from_micros(micros as u64)
    }

    /// Interval the event loop polls for input
    pub fn ui_interval(&self) -> Duration {
        Duration::from_millis(UI_POLL_MS)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            scaling: ScalingKind::default(),
            threshold_mode: ThresholdMode::default(),
            speed: 1.0,
            max_radius_px: DEFAULT_MAX_RADIUS_PX,
            mid_point_deviation: DEFAULT_MIDPOINT_DEVIATION,
            zoom: DEFAULT_ZOOM,
        }
    }
}
