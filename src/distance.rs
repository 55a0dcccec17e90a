use crate::domain::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers, using the haversine formula.
pub fn haversine(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lon = (d_lon / 2.0).sin();
    let h = sin_d_lat * sin_d_lat + a.latitude().to_radians().cos() * b.latitude().to_radians().cos() * sin_d_lon * sin_d_lon;
    // Rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Formats a distance for display, meters below one kilometer.
pub fn format_distance(kilometers: f64) -> String {
    let meters = (kilometers * 1000.0).round();
    if meters < 1000.0 {
        format!("{} m", meters)
    } else {
        format!("{:.1} km", kilometers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coordinate(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }

    #[test]
    fn haversine_is_zero_for_the_same_coordinate() {
        let bogor = coordinate(-6.5944, 106.7886);
        assert_eq!(haversine(&bogor, &bogor), 0.0);
    }

    #[test]
    fn haversine_of_one_degree_longitude_at_the_equator() {
        let distance = haversine(&coordinate(0.0, 0.0), &coordinate(0.0, 1.0));
        assert!((distance - 111.19).abs() <= 0.5, "unexpected distance {}", distance);
    }

    #[rstest]
    #[case::jakarta_bogor((-6.2088, 106.8456), (-6.5944, 106.7886))]
    #[case::across_the_antimeridian((10.0, 179.5), (-10.0, -179.5))]
    #[case::pole_to_pole((90.0, 0.0), (-90.0, 0.0))]
    #[case::antipodal((0.0, 0.0), (0.0, 180.0))]
    #[case::amsterdam_new_york((52.3676, 4.9041), (40.7128, -74.0060))]
    fn haversine_is_symmetric(#[case] a: (f64, f64), #[case] b: (f64, f64)) {
        let a = coordinate(a.0, a.1);
        let b = coordinate(b.0, b.1);

        let there = haversine(&a, &b);
        let back = haversine(&b, &a);

        assert!(there >= 0.0);
        assert!((there - back).abs() <= 1e-9 * there.max(1.0), "{} != {}", there, back);
    }

    #[test]
    fn haversine_between_jakarta_and_bogor() {
        let distance = haversine(&coordinate(-6.2088, 106.8456), &coordinate(-6.5944, 106.7886));
        assert!((distance - 43.3).abs() < 0.5, "unexpected distance {}", distance);
    }

    #[test]
    fn haversine_of_antipodal_points_is_half_the_circumference() {
        let distance = haversine(&coordinate(0.0, 0.0), &coordinate(0.0, 180.0));
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[rstest]
    #[case::meters(0.85, "850 m")]
    #[case::rounded_meters(0.0004, "0 m")]
    #[case::one_kilometer(1.0, "1.0 km")]
    #[case::rounds_up_to_a_kilometer(0.9996, "1.0 km")]
    #[case::just_below_a_kilometer(0.9994, "999 m")]
    #[case::kilometers(43.349, "43.3 km")]
    fn format_distance_picks_a_unit(#[case] kilometers: f64, #[case] expected: &str) {
        assert_eq!(format_distance(kilometers), expected);
    }
}
