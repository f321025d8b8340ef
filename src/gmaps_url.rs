use itertools::Itertools;

use crate::route_vector::Route;

/// Travel mode baked into the directions link via the `!3e` data flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Driving,
    Cycling,
    Walking,
}

impl TravelMode {
    /// Parses the form values accepted by the HTTP surface.
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "car" => Some(TravelMode::Driving),
            "bike" => Some(TravelMode::Cycling),
            "walking" => Some(TravelMode::Walking),
            _ => None,
        }
    }

    fn data_flag(&self) -> &'static str {
        match self {
            TravelMode::Driving => "!3e0",
            TravelMode::Cycling => "!3e1",
            TravelMode::Walking => "!3e2",
        }
    }
}

/// Builds a Google Maps directions deep link with one waypoint per
/// route point.
pub fn of(route: &Route, mode: TravelMode) -> String {
    let waypoints = route
        .points
        .iter()
        .map(|p| format!("{:.6},{:.6}", p.latitude, p.longitude))
        .join("/");
    format!(
        "https://www.google.com/maps/dir/{}/data=!3m1!4b1!4m2!4m1{}",
        waypoints,
        mode.data_flag()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route_vector::TrackPoint;

    #[test]
    fn builds_directions_url() {
        let route = Route::new(vec![
            TrackPoint {
                latitude: 57.700713,
                longitude: 11.96678,
            },
            TrackPoint {
                latitude: 57.705065,
                longitude: 11.939024,
            },
        ]);
        assert_eq!(
            of(&route, TravelMode::Cycling),
            "https://www.google.com/maps/dir/57.700713,11.966780/57.705065,11.939024/data=!3m1!4b1!4m2!4m1!3e1"
        );
    }

    #[test]
    fn parses_form_values() {
        assert_eq!(
            TravelMode::from_form_value("car"),
            Some(TravelMode::Driving)
        );
        assert_eq!(
            TravelMode::from_form_value("walking"),
            Some(TravelMode::Walking)
        );
        assert_eq!(TravelMode::from_form_value("boat"), None);
    }
}
