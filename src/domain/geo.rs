// Great-circle distance on a spherical Earth

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in kilometers between two points
/// given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distances for every consecutive pair of a coordinate sequence.
/// Yields n-1 legs for n points, nothing for fewer than two.
pub fn leg_distances_km(coords: &[(f64, f64)]) -> Vec<f64> {
    coords
        .windows(2)
        .map(|leg| haversine_km(leg[0].0, leg[0].1, leg[1].0, leg[1].1))
        .collect()
}

/// Total path length in kilometers over consecutive pairs.
pub fn path_distance_km(coords: &[(f64, f64)]) -> f64 {
    leg_distances_km(coords).iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_have_zero_distance() {
        assert_eq!(haversine_km(-23.55, -46.63, -23.55, -46.63), 0.0);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        // Haversine reference value for (0,0) -> (0,1).
        let d = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let ab = haversine_km(-23.5, -46.6, -22.9, -43.2);
        let ba = haversine_km(-22.9, -43.2, -23.5, -46.6);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_leg_distances_cover_consecutive_pairs() {
        let coords = [(0.0, 0.0), (0.0, 1.0), (0.0, 1.0)];
        let legs = leg_distances_km(&coords);

        assert_eq!(legs.len(), 2);
        assert!((legs[0] - 111.19).abs() < 0.1);
        assert_eq!(legs[1], 0.0);
    }

    #[test]
    fn test_path_distance_sums_legs() {
        let coords = [(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)];
        let total = path_distance_km(&coords);
        let legs: f64 = leg_distances_km(&coords).iter().sum();
        assert!((total - legs).abs() < 1e-9);
    }

    #[test]
    fn test_short_paths_have_zero_length() {
        assert_eq!(path_distance_km(&[]), 0.0);
        assert_eq!(path_distance_km(&[(10.0, 20.0)]), 0.0);
    }
}
