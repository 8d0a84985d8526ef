// Circle sizing
//
// One circle per populated location: bucket picks the color, the scaled
// magnitude times a calibrated multiplier gives the radius in pixels.

use super::{CircleDirective, LatLng, RenderContext, RenderSink};
use crate::data::Location;
use crate::scaling::ScalingTool;
use tracing::debug;

/// Multiplier used until one has been calibrated against a dataset
pub const DEFAULT_RADIUS_MULTIPLIER: f64 = 15.0;

/// Multiplier that maps `max_magnitude` to exactly `max_radius_px`
///
/// Falls back to `DEFAULT_RADIUS_MULTIPLIER` when the scaled maximum is zero
/// (empty dataset, or a maximum of 1 under logarithmic scaling).
pub fn radius_multiplier(max_radius_px: f64, max_magnitude: u64, scaling: &ScalingTool) -> f64 {
    let scaled_max = scaling.scale(max_magnitude);
    if scaled_max > 0.0 && scaled_max.is_finite() {
        max_radius_px / scaled_max
    } else {
        debug!(
            max_magnitude,
            "Scaled maximum is zero, keeping default radius multiplier"
        );
        DEFAULT_RADIUS_MULTIPLIER
    }
}

/// Circle for one location, or `None` when it holds no refugees
pub fn build_circle(location: &Location, ctx: &RenderContext<'_>) -> Option<CircleDirective> {
    if location.refugees == 0 {
        return None;
    }

    let scaled = ctx.scaling.scale(location.refugees);
    let bucket = ctx.thresholds.locations.bucket(scaled);
    let swatch = ctx.palette.circle(bucket);

    Some(CircleDirective {
        name: location.name.clone(),
        position: LatLng::new(location.lat, location.lng),
        color: swatch.color,
        fill_color: swatch.fill(),
        fill_opacity: swatch.fill_opacity,
        radius_pixels: scaled * ctx.radius_multiplier,
        bucket,
    })
}

pub fn build_circles(locations: &[Location], ctx: &RenderContext<'_>, sink: &mut dyn RenderSink) {
    for circle in locations.iter().filter_map(|l| build_circle(l, ctx)) {
        sink.circle(circle);
    }
}
