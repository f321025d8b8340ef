use gpxmaps_core::route_simplifier::{pick_spaced, simplify, simplify_with_options, SimplifyOptions};
use gpxmaps_core::route_vector::{Route, TrackPoint};

fn point(latitude: f64, longitude: f64) -> TrackPoint {
    TrackPoint {
        latitude,
        longitude,
    }
}

fn straight_line(count: usize) -> Route {
    Route::new(
        (0..count)
            .map(|i| point(0.0, i as f64 * 0.001))
            .collect(),
    )
}

// Open traversal of a square with side 3: four corners, two collinear
// points between each pair of corners.
fn square() -> Route {
    Route::new(vec![
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(2.0, 0.0),
        point(3.0, 0.0),
        point(3.0, 1.0),
        point(3.0, 2.0),
        point(3.0, 3.0),
        point(2.0, 3.0),
        point(1.0, 3.0),
        point(0.0, 3.0),
        point(0.0, 2.0),
        point(0.0, 1.0),
    ])
}

#[test]
fn small_route_is_returned_unchanged() {
    let route = square();
    assert_eq!(simplify(&route, 12), route);
    assert_eq!(simplify(&route, 100), route);
}

#[test]
fn endpoints_are_always_kept() {
    for max_size in [2, 5, 20, 150] {
        let route = straight_line(1000);
        let simplified = simplify(&route, max_size);
        assert_eq!(simplified.points[0], route.points[0]);
        assert_eq!(
            simplified.points[simplified.len() - 1],
            route.points[route.len() - 1]
        );
    }
}

#[test]
fn output_respects_max_size() {
    let route = square();
    for max_size in [5, 6, 10, 11] {
        assert!(simplify(&route, max_size).len() <= max_size);
    }
}

#[test]
fn straight_line_collapses_to_endpoints() {
    let route = straight_line(1000);
    let simplified = simplify(&route, 20);
    assert_eq!(
        simplified.points,
        vec![route.points[0], route.points[999]]
    );
}

#[test]
fn square_keeps_its_corners() {
    let route = square();
    let simplified = simplify(&route, 10);
    assert_eq!(
        simplified.points,
        vec![
            point(0.0, 0.0),
            point(3.0, 0.0),
            point(3.0, 3.0),
            point(0.0, 3.0),
            point(0.0, 1.0),
        ]
    );
}

#[test]
fn empty_and_single_point_routes_are_total() {
    assert!(simplify(&Route::default(), 10).is_empty());
    let single = Route::new(vec![point(1.0, 2.0)]);
    assert_eq!(simplify(&single, 10), single);
}

// With the budget exhausted the result is the best effort, which for a
// spacing budget of 1 is the two endpoints. A max size below 2 is
// therefore allowed to be exceeded rather than dropping an endpoint.
#[test]
fn exhausted_budget_returns_best_effort() {
    let route = straight_line(3);
    let simplified = simplify(&route, 1);
    assert_eq!(
        simplified.points,
        vec![route.points[0], route.points[2]]
    );
}

#[test]
fn custom_turn_threshold_is_honored() {
    // 30 degree bends: dropped at the default threshold, kept at 10.
    let route = Route::new(vec![
        point(0.0, 0.0),
        point(0.0, 1.0),
        point(0.5773502691896258, 2.0),
        point(0.5773502691896258, 3.0),
        point(0.0, 4.0),
    ]);
    let loose = simplify(&route, 3);
    assert_eq!(loose.len(), 2);

    let strict = simplify_with_options(
        &route,
        4,
        &SimplifyOptions {
            turn_threshold_deg: 10.0,
            ..SimplifyOptions::default()
        },
    );
    assert!(strict.len() > 2);
}

#[test]
fn pick_spaced_keeps_endpoints_and_count() {
    let items: Vec<usize> = (0..100).collect();
    let spaced = pick_spaced(&items, 10);
    assert_eq!(spaced.len(), 10);
    assert_eq!(spaced[0], 0);
    assert_eq!(spaced[9], 99);

    let mut sorted = spaced.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, spaced, "relative order must be preserved");
}

#[test]
fn pick_spaced_is_a_noop_for_small_inputs() {
    let items = vec![1, 2, 3];
    assert_eq!(pick_spaced(&items, 3), items);
    assert_eq!(pick_spaced(&items, 10), items);
}

#[test]
fn pick_spaced_zero_target_is_empty() {
    let items = vec![1, 2, 3];
    assert!(pick_spaced(&items, 0).is_empty());
}
