//! Great-circle distances on a spherical earth.
//!
//! Both map paths size their outputs with the haversine formula: the tile
//! stitcher records image dimensions in kilometers, the static-map path works
//! in meters. No input validation happens here; the formula succeeds for any
//! finite input and the result is only meaningful for coordinates that are
//! actually latitudes and longitudes.

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two (latitude, longitude) pairs
/// given in degrees.
///
/// # Examples
///
/// ```
/// use tilecloud_core::distance::haversine_m;
///
/// // one degree of latitude is roughly 111 km
/// let d = haversine_m(0.0, 0.0, 1.0, 0.0);
/// assert!((d - 111_195.0).abs() < 1.0);
/// ```
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
	let phi1 = lat1.to_radians();
	let phi2 = lat2.to_radians();
	let delta_phi = (lat2 - lat1).to_radians();
	let delta_lambda = (lon2 - lon1).to_radians();

	let a = (delta_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
	let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

	EARTH_RADIUS_M * c
}

/// Great-circle distance in kilometers between two (latitude, longitude)
/// pairs given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
	haversine_m(lat1, lon1, lat2, lon2) / 1000.0
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use rstest::rstest;

	#[test]
	fn zero_distance_for_identical_points() {
		assert_eq!(haversine_m(35.6895, 139.6917, 35.6895, 139.6917), 0.0);
		assert_eq!(haversine_m(0.0, 0.0, 0.0, 0.0), 0.0);
		assert_eq!(haversine_m(-45.0, 170.0, -45.0, 170.0), 0.0);
	}

	#[rstest]
	#[case(35.6895, 139.6917, 34.6937, 135.5023)]
	#[case(0.0, 0.0, 0.0, 1.0)]
	#[case(-80.0, -170.0, 80.0, 170.0)]
	fn symmetry(#[case] lat1: f64, #[case] lon1: f64, #[case] lat2: f64, #[case] lon2: f64) {
		assert_eq!(
			haversine_m(lat1, lon1, lat2, lon2),
			haversine_m(lat2, lon2, lat1, lon1)
		);
	}

	#[test]
	fn tokyo_to_osaka() {
		// reference value computed once with the same formula
		let d = haversine_m(35.6895, 139.6917, 34.6937, 135.5023);
		assert_relative_eq!(d, 396_435.64, epsilon = 1.0);
		assert_relative_eq!(haversine_km(35.6895, 139.6917, 34.6937, 135.5023), 396.43564, epsilon = 0.001);
	}

	#[test]
	fn one_degree_of_longitude_at_the_equator() {
		assert_relative_eq!(haversine_m(0.0, 0.0, 0.0, 1.0), 111_194.93, epsilon = 0.01);
	}

	#[rstest]
	#[case((35.0, 139.0), (36.0, 140.0), (34.0, 138.0))]
	#[case((0.0, 0.0), (10.0, 10.0), (-10.0, 20.0))]
	#[case((80.0, 0.0), (-80.0, 0.0), (0.0, 90.0))]
	fn triangle_inequality(#[case] a: (f64, f64), #[case] b: (f64, f64), #[case] c: (f64, f64)) {
		let ab = haversine_m(a.0, a.1, b.0, b.1);
		let bc = haversine_m(b.0, b.1, c.0, c.1);
		let ac = haversine_m(a.0, a.1, c.0, c.1);
		// spherical geometry, so allow a hair of slack
		assert!(ac <= ab + bc + 1e-6, "ac={ac} ab={ab} bc={bc}");
	}
}
