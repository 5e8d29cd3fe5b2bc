//! WGS84 longitude/latitude to Irish Transverse Mercator (EPSG:2157).
//!
//! Forward Transverse Mercator on the GRS80 ellipsoid using the series expansion
//! from Snyder, *Map Projections: A Working Manual* (1987), eqs. 8-9 and 8-10.

const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const INVERSE_FLATTENING: f64 = 298.257_222_101;

const ORIGIN_LATITUDE: f64 = 53.5;
const CENTRAL_MERIDIAN: f64 = -8.0;
const SCALE_FACTOR: f64 = 0.999_82;
pub const FALSE_EASTING: f64 = 600_000.0;
pub const FALSE_NORTHING: f64 = 750_000.0;

fn eccentricity_squared() -> f64 {
    let f = 1.0 / INVERSE_FLATTENING;
    f * (2.0 - f)
}

/// Distance along the meridian from the equator to latitude `phi` (radians).
fn meridian_arc(phi: f64) -> f64 {
    let e2 = eccentricity_squared();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    SEMI_MAJOR_AXIS
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// Projects a WGS84 coordinate in degrees to ITM `(easting, northing)` in metres.
pub fn to_irish_transverse_mercator(latitude: f64, longitude: f64) -> (f64, f64) {
    let e2 = eccentricity_squared();
    let ep2 = e2 / (1.0 - e2);

    let phi = latitude.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = SEMI_MAJOR_AXIS / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = (longitude - CENTRAL_MERIDIAN).to_radians() * cos_phi;

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let x = SCALE_FACTOR
        * n
        * (a + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0);

    let y = SCALE_FACTOR
        * (meridian_arc(phi) - meridian_arc(ORIGIN_LATITUDE.to_radians())
            + n * tan_phi
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

    (FALSE_EASTING + x, FALSE_NORTHING + y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_false_origin() {
        let (easting, northing) = to_irish_transverse_mercator(ORIGIN_LATITUDE, CENTRAL_MERIDIAN);
        assert!((easting - FALSE_EASTING).abs() < 1e-6);
        assert!((northing - FALSE_NORTHING).abs() < 1e-6);
    }

    #[test]
    fn test_symmetric_about_central_meridian() {
        let (east_e, east_n) = to_irish_transverse_mercator(52.0, -6.5);
        let (west_e, west_n) = to_irish_transverse_mercator(52.0, -9.5);

        assert!(east_e > FALSE_EASTING);
        assert!(west_e < FALSE_EASTING);
        assert!(((east_e - FALSE_EASTING) + (west_e - FALSE_EASTING)).abs() < 1e-6);
        assert!((east_n - west_n).abs() < 1e-6);
    }

    #[test]
    fn test_known_point() {
        // Spire of Dublin, published ITM 715830 734697.
        let (easting, northing) = to_irish_transverse_mercator(53.349_805, -6.260_31);
        assert!((easting - 715_830.0).abs() < 10.0, "easting {}", easting);
        assert!((northing - 734_697.0).abs() < 10.0, "northing {}", northing);
    }

    #[test]
    fn test_northing_increases_northwards() {
        let (_, south) = to_irish_transverse_mercator(51.5, -8.0);
        let (_, north) = to_irish_transverse_mercator(55.3, -8.0);
        assert!(south < FALSE_NORTHING);
        assert!(north > FALSE_NORTHING);
    }
}
