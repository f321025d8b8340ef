/// A single recorded GPS position in decimal degrees. Coordinates are
/// carried through as parsed, no range validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// An ordered open path of track points. The order is the order of
/// travel and every transformation in this crate preserves it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    pub points: Vec<TrackPoint>,
}

impl From<geo_types::Point<f64>> for TrackPoint {
    fn from(point: geo_types::Point<f64>) -> Self {
        TrackPoint {
            latitude: point.y(),
            longitude: point.x(),
        }
    }
}

impl Route {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Route { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
