// Heatmap payload
//
// Two views over the same locations: current population, or the absolute
// change since the previous step. The payload's max/min travel in the same
// scaled units as the point values.

use super::{HeatPoint, HeatmapPayload};
use crate::data::{Dataset, Location};
use crate::scaling::{MagnitudeKind, ScalingTool};
use clap::ValueEnum;

pub const DEFAULT_HEATMAP_MAX: u64 = 10_000;
pub const DEFAULT_HEATMAP_MIN: u64 = 1;

/// Which magnitude feeds the heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum HeatmapView {
    /// Refugees present at each location
    #[default]
    Refugees,
    /// Absolute change in refugees since the previous step
    Difference,
}

impl HeatmapView {
    pub fn label(self) -> &'static str {
        match self {
            HeatmapView::Refugees => "refugees",
            HeatmapView::Difference => "difference",
        }
    }

    fn magnitude_kind(self) -> MagnitudeKind {
        match self {
            HeatmapView::Refugees => MagnitudeKind::Location,
            HeatmapView::Difference => MagnitudeKind::Difference,
        }
    }

    fn magnitude(self, location: &Location) -> u64 {
        match self {
            HeatmapView::Refugees => location.refugees,
            HeatmapView::Difference => location.difference.unsigned_abs(),
        }
    }
}

/// Assembles heatmap payloads for one view
///
/// Bounds are stored raw and scaled when a payload is built, so switching
/// the scaling method never leaves them in stale units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapBuilder {
    view: HeatmapView,
    max: u64,
    min: u64,
}

impl HeatmapBuilder {
    pub fn new(view: HeatmapView) -> Self {
        Self {
            view,
            max: DEFAULT_HEATMAP_MAX,
            min: DEFAULT_HEATMAP_MIN,
        }
    }

    /// Builder whose upper bound is the largest magnitude of `dataset`
    pub fn for_dataset(view: HeatmapView, dataset: &Dataset) -> Self {
        let max = match view {
            HeatmapView::Refugees => dataset.max_location_value(),
            HeatmapView::Difference => dataset.timeline.max_diff(),
        };
        let mut builder = Self::new(view);
        builder.set_max_min(max.max(DEFAULT_HEATMAP_MIN), DEFAULT_HEATMAP_MIN);
        builder
    }

    pub fn set_max_min(&mut self, max: u64, min: u64) {
        self.max = max;
        self.min = min;
    }

    /// Raw (unscaled) bounds
    pub fn bounds(&self) -> (u64, u64) {
        (self.max, self.min)
    }

    pub fn build(&self, locations: &[Location], scaling: &ScalingTool) -> HeatmapPayload {
        let kind = self.view.magnitude_kind();
        let data = locations
            .iter()
            .filter_map(|location| {
                let magnitude = self.view.magnitude(location);
                (magnitude > 0).then(|| HeatPoint {
                    lat: location.lat,
                    lng: location.lng,
                    value: scaling.scale_as(kind, magnitude),
                })
            })
            .collect();

        HeatmapPayload {
            max: scaling.scale_as(kind, self.max),
            min: scaling.scale_as(kind, self.min),
            data,
        }
    }
}

impl Default for HeatmapBuilder {
    fn default() -> Self {
        Self::new(HeatmapView::default())
    }
}
