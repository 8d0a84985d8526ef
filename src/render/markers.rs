// Location markers
//
// Camps and cities get a fixed glyph at every step, including steps where
// they hold no refugees and therefore have no circle.

use super::{LatLng, MarkerDirective, MarkerKind, RenderSink};
use crate::data::Location;

impl MarkerKind {
    pub fn of(location: &Location) -> Self {
        if location.camp {
            MarkerKind::Camp
        } else {
            MarkerKind::City
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            MarkerKind::Camp => "▲",
            MarkerKind::City => "●",
        }
    }
}

/// Marker for `location` if its kind is enabled
pub fn build_marker(location: &Location, camps: bool, cities: bool) -> Option<MarkerDirective> {
    let kind = MarkerKind::of(location);
    let enabled = match kind {
        MarkerKind::Camp => camps,
        MarkerKind::City => cities,
    };
    enabled.then(|| MarkerDirective {
        name: location.name.clone(),
        position: LatLng::new(location.lat, location.lng),
        kind,
    })
}

pub fn build_markers(
    locations: &[Location],
    camps: bool,
    cities: bool,
    sink: &mut dyn RenderSink,
) {
    for marker in locations.iter().filter_map(|l| build_marker(l, camps, cities)) {
        sink.marker(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::location;
    use crate::render::FrameBuffer;

    fn camp(name: &str, refugees: u64) -> Location {
        Location {
            camp: true,
            ..location(name, refugees)
        }
    }

    #[test]
    fn test_empty_locations_still_get_markers() {
        let locations = vec![camp("Mbera", 0), location("Bamako", 0)];
        let mut frame = FrameBuffer::default();
        build_markers(&locations, true, true, &mut frame);

        assert_eq!(frame.markers.len(), 2);
        assert_eq!(frame.markers[0].kind, MarkerKind::Camp);
        assert_eq!(frame.markers[1].kind, MarkerKind::City);
        assert_eq!(frame.markers[1].name, "Bamako");
    }

    #[test]
    fn test_marker_kinds_toggle_independently() {
        let locations = vec![camp("Mbera", 12), location("Bamako", 3), camp("Fassala", 0)];

        let mut frame = FrameBuffer::default();
        build_markers(&locations, true, false, &mut frame);
        let names: Vec<_> = frame.markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Mbera", "Fassala"]);

        let mut frame = FrameBuffer::default();
        build_markers(&locations, false, true, &mut frame);
        let names: Vec<_> = frame.markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Bamako"]);

        assert_eq!(build_marker(&locations[0], false, false), None);
    }

    #[test]
    fn test_glyphs_differ_by_kind() {
        assert_ne!(MarkerKind::Camp.glyph(), MarkerKind::City.glyph());
        assert_eq!(MarkerKind::of(&camp("Mbera", 0)).glyph(), "▲");
    }
}
