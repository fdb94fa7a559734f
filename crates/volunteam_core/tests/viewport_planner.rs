use volunteam_core::{plan_region, EdgePadding, Position, ViewportError, MIN_SPAN_DEGREES};

const EPS: f64 = 1e-9;

#[test]
fn frames_two_points_around_their_midpoint() {
    let positions = [Position::new(10.0, 10.0), Position::new(20.0, 20.0)];

    let region = plan_region(&positions, EdgePadding::new(0.1, 0.1)).unwrap();

    assert!((region.center.latitude - 15.0).abs() < EPS);
    assert!((region.center.longitude - 15.0).abs() < EPS);
    // 10 degrees of span must fit inside the 80% left after padding.
    assert!((region.latitude_delta - 12.5).abs() < EPS);
    assert!((region.longitude_delta - 12.5).abs() < EPS);
    assert!(positions.iter().all(|position| region.contains(position)));
}

#[test]
fn zero_padding_uses_exact_bounding_box() {
    let positions = [
        Position::new(-5.0, 30.0),
        Position::new(5.0, 40.0),
        Position::new(0.0, 35.0),
    ];

    let region = plan_region(&positions, EdgePadding::none()).unwrap();

    assert!((region.latitude_delta - 10.0).abs() < EPS);
    assert!((region.longitude_delta - 10.0).abs() < EPS);
    let (south_west, north_east) = region.bounds();
    assert!((south_west.latitude + 5.0).abs() < EPS);
    assert!((north_east.longitude - 40.0).abs() < EPS);
}

#[test]
fn single_position_gets_minimum_span() {
    let position = Position::new(-23.55, -46.63);

    let region = plan_region(&[position], EdgePadding::none()).unwrap();

    assert_eq!(region.center, position);
    assert!(region.latitude_delta >= MIN_SPAN_DEGREES);
    assert!(region.longitude_delta >= MIN_SPAN_DEGREES);
    assert!(region.contains(&position));
}

#[test]
fn collinear_positions_only_widen_the_flat_axis() {
    let positions = [Position::new(1.0, 50.0), Position::new(3.0, 50.0)];

    let region = plan_region(&positions, EdgePadding::none()).unwrap();

    assert!((region.latitude_delta - 2.0).abs() < EPS);
    assert!((region.longitude_delta - MIN_SPAN_DEGREES).abs() < EPS);
}

#[test]
fn region_contains_every_position_for_varied_inputs() {
    let sets: Vec<Vec<Position>> = vec![
        vec![Position::new(0.0, 0.0)],
        vec![Position::new(-90.0, -180.0), Position::new(90.0, 180.0)],
        vec![
            Position::new(51.5, -0.12),
            Position::new(48.85, 2.35),
            Position::new(40.41, -3.7),
            Position::new(52.52, 13.4),
        ],
        (0..25)
            .map(|step| Position::new(-60.0 + step as f64 * 4.5, 170.0 - step as f64 * 13.0))
            .collect(),
    ];

    for positions in sets {
        for padding in [EdgePadding::none(), EdgePadding::new(0.2, 0.3), EdgePadding::new(1.0, 1.0)] {
            let region = plan_region(&positions, padding).unwrap();
            for position in &positions {
                assert!(
                    region.contains(position),
                    "{position:?} outside {region:?}"
                );
            }
        }
    }
}

#[test]
fn deltas_are_capped_at_whole_globe() {
    let positions = [Position::new(-90.0, -180.0), Position::new(90.0, 180.0)];

    let region = plan_region(&positions, EdgePadding::new(0.3, 0.3)).unwrap();

    assert!(region.latitude_delta <= 180.0);
    assert!(region.longitude_delta <= 360.0);
}

#[test]
fn empty_input_signals_no_visible_markers() {
    assert_eq!(
        plan_region(&[], EdgePadding::none()),
        Err(ViewportError::NoVisibleMarkers)
    );
}

#[test]
fn invalid_position_is_rejected() {
    let positions = [Position::new(10.0, 10.0), Position::new(f64::INFINITY, 0.0)];

    assert!(matches!(
        plan_region(&positions, EdgePadding::none()),
        Err(ViewportError::InvalidPosition(_))
    ));
}
