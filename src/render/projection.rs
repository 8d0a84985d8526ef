// Map projection
//
// Screen-space placement depends on zoom; anything computed in pixels
// (arrowheads) has to be recomputed when the zoom changes.

use super::LatLng;

/// Width of the whole world in pixels at zoom 0
pub const WORLD_PIXELS_AT_ZOOM_0: f64 = 256.0;

/// Point in layer pixel space, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Conversion between geographic and pixel coordinates
pub trait Projection {
    fn project(&self, position: LatLng) -> ScreenPoint;
    fn unproject(&self, point: ScreenPoint) -> LatLng;

    /// Pixels covered by one degree of longitude
    fn pixels_per_degree(&self) -> f64;
}

/// Plate carrée projection scaled by `2^zoom`
///
/// Matches the degree-based coordinate space of the terminal map canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    zoom: f64,
}

impl Equirectangular {
    pub fn new(zoom: f64) -> Self {
        Self { zoom }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }
}

impl Projection for Equirectangular {
    fn project(&self, position: LatLng) -> ScreenPoint {
        let k = self.pixels_per_degree();
        ScreenPoint {
            x: (position.lng + 180.0) * k,
            y: (90.0 - position.lat) * k,
        }
    }

    fn unproject(&self, point: ScreenPoint) -> LatLng {
        let k = self.pixels_per_degree();
        LatLng {
            lat: 90.0 - point.y / k,
            lng: point.x / k - 180.0,
        }
    }

    fn pixels_per_degree(&self) -> f64 {
        WORLD_PIXELS_AT_ZOOM_0 / 360.0 * 2f64.powf(self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_at_several_zooms() {
        let position = LatLng::new(16.37, -2.29);
        for zoom in [0.0, 3.0, 6.5, 12.0] {
            let projection = Equirectangular::new(zoom);
            let back = projection.unproject(projection.project(position));
            assert!((back.lat - position.lat).abs() < 1e-9);
            assert!((back.lng - position.lng).abs() < 1e-9);
        }
    }

    #[test]
    fn test_screen_y_grows_southwards() {
        let projection = Equirectangular::new(4.0);
        let north = projection.project(LatLng::new(10.0, 0.0));
        let south = projection.project(LatLng::new(-10.0, 0.0));
        assert!(south.y > north.y);
    }

    #[test]
    fn test_zoom_doubles_scale() {
        let a = Equirectangular::new(5.0);
        let b = Equirectangular::new(6.0);
        assert!((b.pixels_per_degree() / a.pixels_per_degree() - 2.0).abs() < 1e-12);
    }
}
