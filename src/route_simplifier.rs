use crate::route_vector::{Route, TrackPoint};

/// Spacing budget the shrinking search starts from.
pub const DEFAULT_SPACING_BUDGET: usize = 100;
/// Minimum bearing change, in degrees, for an interior point to count
/// as a turn worth keeping.
pub const DEFAULT_TURN_THRESHOLD_DEG: f64 = 45.0;

#[derive(Debug, Clone, Copy)]
pub struct SimplifyOptions {
    pub spacing_budget: usize,
    pub turn_threshold_deg: f64,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        SimplifyOptions {
            spacing_budget: DEFAULT_SPACING_BUDGET,
            turn_threshold_deg: DEFAULT_TURN_THRESHOLD_DEG,
        }
    }
}

/// Reduces `route` to at most `max_size` points while keeping both
/// endpoints and preferring points where the path actually turns.
pub fn simplify(route: &Route, max_size: usize) -> Route {
    simplify_with_options(route, max_size, &SimplifyOptions::default())
}

/// A single spacing pass cannot bound the corner filter's output (a
/// corner-dense track keeps more points than a straight one at the same
/// spacing), so we walk the spacing budget down until the two-stage
/// pipeline fits under `max_size`.
///
/// If the budget bottoms out the last iteration's result is returned as
/// is. At a spacing budget of 1 that result is just the two endpoints,
/// so it can exceed `max_size` only when `max_size < 2`. We don't
/// truncate further in that case since it would drop an endpoint.
pub fn simplify_with_options(route: &Route, max_size: usize, options: &SimplifyOptions) -> Route {
    if route.points.len() <= max_size {
        return route.clone();
    }

    let mut budget = options.spacing_budget.max(1);
    loop {
        let spaced = pick_spaced(&route.points, budget);
        let filtered = keep_turns(&spaced, options.turn_threshold_deg);
        budget -= 1;
        if filtered.len() <= max_size || budget == 0 {
            return Route::new(filtered);
        }
    }
}

/// Picks an evenly spaced subset of `items`: the first and last element
/// plus every `step`th one, capped at `max_count` in total. Inputs that
/// already fit are returned unchanged.
pub fn pick_spaced<T: Clone>(items: &[T], max_count: usize) -> Vec<T> {
    if items.len() <= max_count {
        return items.to_vec();
    }
    if max_count == 0 {
        return Vec::new();
    }

    let step = items.len() / max_count;
    let mut out = Vec::with_capacity(max_count);
    for (i, item) in items.iter().enumerate() {
        if i == 0 || i == items.len() - 1 {
            out.push(item.clone());
        } else if i % step == 0 && out.len() < max_count - 1 {
            out.push(item.clone());
        }
    }
    out
}

/// Drops interior points that sit on a near-straight run, keeping the
/// endpoints and every point whose bearing changes by at least
/// `turn_threshold_deg`.
///
/// The inbound bearing is measured from the last point we *kept*, not
/// the last point we visited, so a long gentle arc of small-angle
/// segments still collapses down to its real turning points.
pub fn keep_turns(points: &[TrackPoint], turn_threshold_deg: f64) -> Vec<TrackPoint> {
    let mut out: Vec<TrackPoint> = Vec::new();
    for (i, p) in points.iter().enumerate() {
        if i == 0 || i == points.len() - 1 {
            out.push(*p);
            continue;
        }

        let prev = out[out.len() - 1];
        let next = points[i + 1];

        let inbound = bearing_deg(&prev, p);
        let outbound = bearing_deg(p, &next);

        if bearing_diff_deg(inbound, outbound).abs() >= turn_threshold_deg {
            out.push(*p);
        }
    }
    out
}

fn bearing_deg(from: &TrackPoint, to: &TrackPoint) -> f64 {
    (to.latitude - from.latitude)
        .atan2(to.longitude - from.longitude)
        .to_degrees()
}

/// Normalizes a bearing difference into [-180, 180] so that bearings on
/// either side of the ±180° boundary compare as geometrically close.
fn bearing_diff_deg(a: f64, b: f64) -> f64 {
    let mut diff = (a - b) % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::bearing_diff_deg;

    #[test]
    fn bearing_diff_wraps_at_antimeridian() {
        assert_eq!(bearing_diff_deg(179.0, -179.0), -2.0);
        assert_eq!(bearing_diff_deg(-179.0, 179.0), 2.0);
        assert_eq!(bearing_diff_deg(90.0, 45.0), 45.0);
        assert_eq!(bearing_diff_deg(0.0, 0.0), 0.0);
    }
}
