// Route lines
//
// Each link becomes a three-point polyline: source, destination, and a
// point that turns the segment into a one-sided arrow (half-edge) pointing
// at the destination. The arrowhead is placed in pixel space, so it depends
// on the current zoom.

use super::projection::{Projection, ScreenPoint};
use super::{LatLng, LineClass, LineDirective, RenderContext, RenderSink};
use crate::data::Link;
use std::f64::consts::FRAC_PI_4;

/// Length of the arrowhead stroke in pixels
pub const ARROWHEAD_LENGTH_PX: f64 = 30.0;

/// Angle between the route and the arrowhead stroke
pub const ARROWHEAD_ANGLE: f64 = FRAC_PI_4;

pub const LINE_WEIGHT: u16 = 3;
pub const LINE_OFFSET: u16 = 5;

/// Scaled value recorded for forced links, below any real threshold
pub const FORCED_SENTINEL: f64 = -1.0;

/// Third point of the half-edge between `from` and `to`
///
/// The stroke leaves the destination at 45 degrees off the direction back
/// towards the source, `ARROWHEAD_LENGTH_PX` pixels long.
pub fn halfedge_point(from: LatLng, to: LatLng, projection: &dyn Projection) -> LatLng {
    let source = projection.project(from);
    let target = projection.project(to);

    let segment_angle = (source.y - target.y).atan2(source.x - target.x);
    let offset_angle = segment_angle - ARROWHEAD_ANGLE;

    projection.unproject(ScreenPoint {
        x: target.x + ARROWHEAD_LENGTH_PX * offset_angle.cos(),
        y: target.y + ARROWHEAD_LENGTH_PX * offset_angle.sin(),
    })
}

/// Scaled magnitude used for bucketing; forced links get the sentinel
pub fn scaled_link_value(link: &Link, ctx: &RenderContext<'_>) -> f64 {
    if link.forced {
        FORCED_SENTINEL
    } else {
        ctx.scaling.scale_link(link.refugees)
    }
}

/// Line for one link
///
/// Links without flow are skipped unless forced; forced links always draw
/// in the forced color.
pub fn build_line(
    link: &Link,
    ctx: &RenderContext<'_>,
    projection: &dyn Projection,
) -> Option<LineDirective> {
    if link.refugees == 0 && !link.forced {
        return None;
    }

    let (class, swatch) = if link.forced {
        (LineClass::Forced, ctx.palette.link_forced)
    } else {
        let bucket = ctx.thresholds.links.bucket(scaled_link_value(link, ctx));
        (LineClass::Bucketed(bucket), ctx.palette.link(bucket))
    };

    let from = LatLng::new(link.from.lat, link.from.lng);
    let to = LatLng::new(link.to.lat, link.to.lng);

    Some(LineDirective {
        points: [from, to, halfedge_point(from, to, projection)],
        color: swatch.color,
        weight: LINE_WEIGHT,
        offset: LINE_OFFSET,
        popup_text: link.popup_text(),
        class,
    })
}

pub fn build_lines(
    links: &[Link],
    ctx: &RenderContext<'_>,
    projection: &dyn Projection,
    sink: &mut dyn RenderSink,
) {
    for line in links.iter().filter_map(|l| build_line(l, ctx, projection)) {
        sink.line(line);
    }
}

/// Recompute the arrowhead of every line for a new projection (zoom change)
pub fn refresh_arrowheads(lines: &mut [LineDirective], projection: &dyn Projection) {
    for line in lines.iter_mut() {
        let [from, to, _] = line.points;
        line.points[2] = halfedge_point(from, to, projection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::link;
    use crate::render::{Bucket, Equirectangular, FrameBuffer, ThresholdSet, Thresholds};
    use crate::scaling::ScalingTool;
    use crate::theme::Palette;

    fn thresholds() -> Thresholds {
        Thresholds {
            locations: ThresholdSet::degenerate(),
            links: ThresholdSet::from_scaled(vec![1.0, 5.0, 9.0]),
        }
    }

    fn pixel_distance(a: LatLng, b: LatLng, projection: &dyn Projection) -> f64 {
        let pa = projection.project(a);
        let pb = projection.project(b);
        ((pa.x - pb.x).powi(2) + (pa.y - pb.y).powi(2)).sqrt()
    }

    #[test]
    fn test_forced_link_with_zero_flow_is_drawn() {
        let thresholds = thresholds();
        let palette = Palette::default();
        let ctx = RenderContext {
            scaling: &ScalingTool::Raw,
            thresholds: &thresholds,
            palette: &palette,
            radius_multiplier: 1.0,
        };
        let projection = Equirectangular::new(6.0);

        let forced = build_line(&link("A", "B", 0, true), &ctx, &projection).unwrap();
        assert_eq!(forced.class, LineClass::Forced);
        assert_eq!(forced.color, palette.link_forced.color);
        assert_eq!(scaled_link_value(&link("A", "B", 0, true), &ctx), FORCED_SENTINEL);

        assert!(build_line(&link("A", "B", 0, false), &ctx, &projection).is_none());
    }

    #[test]
    fn test_forced_link_ignores_magnitude() {
        let thresholds = thresholds();
        let palette = Palette::default();
        let ctx = RenderContext {
            scaling: &ScalingTool::Raw,
            thresholds: &thresholds,
            palette: &palette,
            radius_multiplier: 1.0,
        };
        let projection = Equirectangular::new(6.0);

        let line = build_line(&link("A", "B", 1_000, true), &ctx, &projection).unwrap();
        assert_eq!(line.class, LineClass::Forced);
        assert_eq!(line.color, palette.link_forced.color);
    }

    #[test]
    fn test_bucketed_colors_and_style() {
        let thresholds = thresholds();
        let palette = Palette::default();
        let ctx = RenderContext {
            scaling: &ScalingTool::Raw,
            thresholds: &thresholds,
            palette: &palette,
            radius_multiplier: 1.0,
        };
        let projection = Equirectangular::new(6.0);

        let low = build_line(&link("A", "B", 2, false), &ctx, &projection).unwrap();
        let mid = build_line(&link("A", "B", 7, false), &ctx, &projection).unwrap();
        let high = build_line(&link("A", "B", 10, false), &ctx, &projection).unwrap();

        assert_eq!(low.class, LineClass::Bucketed(Bucket::Low));
        assert_eq!(low.color, palette.link_low.color);
        assert_eq!(mid.class, LineClass::Bucketed(Bucket::Mid));
        assert_eq!(mid.color, palette.link_mid.color);
        assert_eq!(high.class, LineClass::Bucketed(Bucket::High));
        assert_eq!(high.color, palette.link_high.color);

        assert_eq!(high.weight, LINE_WEIGHT);
        assert_eq!(high.offset, LINE_OFFSET);
        assert_eq!(high.popup_text, "Route from A to B\nRefugees: 10");
    }

    #[test]
    fn test_halfedge_point_geometry() {
        let projection = Equirectangular::new(6.0);
        // Due east along the equator
        let from = LatLng::new(0.0, 0.0);
        let to = LatLng::new(0.0, 10.0);

        let arrow = halfedge_point(from, to, &projection);

        assert!((pixel_distance(arrow, to, &projection) - ARROWHEAD_LENGTH_PX).abs() < 1e-6);
        // Stroke points back towards the source and off to one side
        assert!(arrow.lng < to.lng);
        assert!(arrow.lat < to.lat);

        let a = projection.project(arrow);
        let t = projection.project(to);
        assert!(((t.x - a.x) - (a.y - t.y).abs()).abs() < 1e-6);
    }

    #[test]
    fn test_arrowheads_follow_zoom() {
        let thresholds = thresholds();
        let palette = Palette::default();
        let ctx = RenderContext {
            scaling: &ScalingTool::Raw,
            thresholds: &thresholds,
            palette: &palette,
            radius_multiplier: 1.0,
        };
        let mut frame = FrameBuffer::default();
        let far = Equirectangular::new(3.0);
        build_lines(&[link("A", "B", 4, false)], &ctx, &far, &mut frame);

        let before = frame.lines[0].points[2];
        let near = Equirectangular::new(8.0);
        refresh_arrowheads(&mut frame.lines, &near);
        let after = frame.lines[0].points[2];

        let to = frame.lines[0].points[1];
        assert_ne!(before, after);
        // Still 30 pixels long at the new zoom, so geographically shorter
        assert!((pixel_distance(after, to, &near) - ARROWHEAD_LENGTH_PX).abs() < 1e-6);
        assert!(
            (after.lng - to.lng).abs() + (after.lat - to.lat).abs()
                < (before.lng - to.lng).abs() + (before.lat - to.lat).abs()
        );
    }
}
