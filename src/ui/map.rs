// Map panel
//
// Draws the latest FrameBuffer over a world coastline canvas. Canvas
// coordinates are degrees (x = lng, y = lat); pixel quantities from the
// directives are converted with the projection's pixels-per-degree.

use crate::app::AppState;
use crate::render::{FrameBuffer, LatLng, MarkerKind, Projection};
use crate::theme::{heat_color, ACCENT_BLUE, CAMP_MARKER, CITY_MARKER, COASTLINE, TEXT_GREY};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Map, MapResolution, Points},
        Block, BorderType, Borders,
    },
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Approximate size of one terminal cell in layer pixels
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Radius of one heatmap blob in pixels
const HEAT_RADIUS_PX: f64 = 12.0;

/// Labels longer than this many columns are cut with an ellipsis
const MAX_LABEL_WIDTH: usize = 16;

/// Visible part of the world, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Viewport centered on `center` for a panel of `area` cells
pub fn viewport(center: LatLng, area: Rect, projection: &dyn Projection) -> Viewport {
    let ppd = projection.pixels_per_degree();
    let half_width = area.width as f64 * CELL_WIDTH_PX / 2.0 / ppd;
    let half_height = area.height as f64 * CELL_HEIGHT_PX / 2.0 / ppd;
    Viewport {
        x_bounds: [center.lng - half_width, center.lng + half_width],
        y_bounds: [center.lat - half_height, center.lat + half_height],
    }
}

/// Position of `value` between `min` and `max`, in `[0, 1]`
pub fn heat_intensity(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 1.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Cut `label` to at most `max_width` display columns
pub fn truncate_label(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

pub fn render_map(f: &mut Frame, area: Rect, app: &AppState) {
    let (title, center) = match &app.session {
        Some(session) => {
            let meta = &session.dataset().meta;
            let title = meta
                .name
                .clone()
                .unwrap_or_else(|| session.dataset().name.clone());
            (title, LatLng::new(meta.center[0], meta.center[1]))
        }
        None => (
            "no simulation loaded".to_string(),
            LatLng::new(crate::data::DEFAULT_CENTER[0], crate::data::DEFAULT_CENTER[1]),
        ),
    };

    let inner = Rect {
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
        ..area
    };
    let view = viewport(center, inner, &app.projection);
    let ppd = app.projection.pixels_per_degree();
    let frame = &app.frame;
    let labels_enabled = app.layers.labels;
    let selected = app.selected().map(|l| LatLng::new(l.lat, l.lng));

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(format!(" {} · zoom {:.0} ", title, app.projection.zoom()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_BLUE)),
        )
        .marker(Marker::Braille)
        .x_bounds(view.x_bounds)
        .y_bounds(view.y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: COASTLINE,
                resolution: MapResolution::High,
            });
            ctx.layer();

            draw_heatmap(ctx, frame, ppd);
            draw_routes(ctx, frame);
            draw_circles(ctx, frame, ppd);
            draw_markers(ctx, frame);

            if let Some(position) = selected {
                ctx.print(
                    position.lng,
                    position.lat,
                    Span::styled("◆", Style::default().fg(ACCENT_BLUE)),
                );
            }

            if labels_enabled {
                for circle in &frame.circles {
                    ctx.print(
                        circle.position.lng,
                        circle.position.lat,
                        Span::styled(
                            format!(" {}", truncate_label(&circle.name, MAX_LABEL_WIDTH)),
                            Style::default().fg(TEXT_GREY).add_modifier(Modifier::DIM),
                        ),
                    );
                }
            }
        });

    f.render_widget(canvas, area);
}

fn draw_heatmap(ctx: &mut ratatui::widgets::canvas::Context<'_>, frame: &FrameBuffer, ppd: f64) {
    let Some(heatmap) = &frame.heatmap else {
        return;
    };
    for point in &heatmap.data {
        let color = heat_color(heat_intensity(point.value, heatmap.min, heatmap.max));
        ctx.draw(&Circle {
            x: point.lng,
            y: point.lat,
            radius: HEAT_RADIUS_PX / ppd,
            color,
        });
        ctx.draw(&Points {
            coords: &[(point.lng, point.lat)],
            color,
        });
    }
}

fn draw_routes(ctx: &mut ratatui::widgets::canvas::Context<'_>, frame: &FrameBuffer) {
    for line in &frame.lines {
        let [from, to, head] = line.points;
        ctx.draw(&CanvasLine {
            x1: from.lng,
            y1: from.lat,
            x2: to.lng,
            y2: to.lat,
            color: line.color,
        });
        ctx.draw(&CanvasLine {
            x1: to.lng,
            y1: to.lat,
            x2: head.lng,
            y2: head.lat,
            color: line.color,
        });
    }
}

fn draw_circles(ctx: &mut ratatui::widgets::canvas::Context<'_>, frame: &FrameBuffer, ppd: f64) {
    for circle in &frame.circles {
        ctx.draw(&Circle {
            x: circle.position.lng,
            y: circle.position.lat,
            radius: circle.radius_pixels / ppd,
            color: circle.color,
        });
        ctx.draw(&Points {
            coords: &[(circle.position.lng, circle.position.lat)],
            color: circle.fill_color,
        });
    }
}

fn marker_color(kind: MarkerKind) -> ratatui::style::Color {
    match kind {
        MarkerKind::Camp => CAMP_MARKER,
        MarkerKind::City => CITY_MARKER,
    }
}

fn draw_markers(ctx: &mut ratatui::widgets::canvas::Context<'_>, frame: &FrameBuffer) {
    for marker in &frame.markers {
        ctx.print(
            marker.position.lng,
            marker.position.lat,
            Span::styled(
                marker.kind.glyph(),
                Style::default().fg(marker_color(marker.kind)),
            ),
        );
    }
}
