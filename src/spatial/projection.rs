// src/spatial/projection.rs
//! UTM zone 12N (NAD83) to Web Mercator.
//!
//! Inverse transverse Mercator uses the series expansion from Snyder,
//! "Map Projections: A Working Manual" (USGS PP 1395), eq. 8-12 to 8-18.
//! NAD83 and WGS84 differ by about a metre here, below what the map shows.

use serde::Serialize;

/// The wkid ArcGIS Online reports for Web Mercator layers.
pub const WEB_MERCATOR_LATEST_WKID: u32 = 102100;

const GRS80_A: f64 = 6_378_137.0;
const GRS80_F: f64 = 1.0 / 298.257_222_101;
const UTM_K0: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const ZONE_12_CENTRAL_MERIDIAN: f64 = -111.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Returns (latitude, longitude) in degrees for a northern-hemisphere zone 12
/// coordinate.
pub fn utm12n_to_geographic(easting: f64, northing: f64) -> (f64, f64) {
    let e2 = GRS80_F * (2.0 - GRS80_F);
    let ep2 = e2 / (1.0 - e2);
    let x = easting - UTM_FALSE_EASTING;

    let m = northing / UTM_K0;
    let mu = m / (GRS80_A * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_phi, cos_phi) = phi1.sin_cos();
    let tan_phi = phi1.tan();
    let c1 = ep2 * cos_phi.powi(2);
    let t1 = tan_phi.powi(2);
    let n1 = GRS80_A / (1.0 - e2 * sin_phi.powi(2)).sqrt();
    let r1 = GRS80_A * (1.0 - e2) / (1.0 - e2 * sin_phi.powi(2)).powf(1.5);
    let d = x / (n1 * UTM_K0);

    let lat = phi1
        - (n1 * tan_phi / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                    - 252.0 * ep2
                    - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = ZONE_12_CENTRAL_MERIDIAN.to_radians()
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi;

    (lat.to_degrees(), lon.to_degrees())
}

pub fn geographic_to_web_mercator(lat: f64, lon: f64) -> Point {
    Point {
        x: GRS80_A * lon.to_radians(),
        y: GRS80_A * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
    }
}

pub fn utm12n_to_web_mercator(easting: f64, northing: f64) -> Point {
    let (lat, lon) = utm12n_to_geographic(easting, northing);
    geographic_to_web_mercator(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_central_meridian_has_no_longitude_offset() {
        let (lat, lon) = utm12n_to_geographic(500_000.0, 4_500_000.0);
        assert_close(lon, -111.0, 1e-9);
        assert_close(lat, 40.650_856, 1e-5);
    }

    #[test]
    fn test_salt_lake_city_point() {
        let (lat, lon) = utm12n_to_geographic(424_777.0, 4_513_294.0);
        assert_close(lat, 40.767_176, 1e-5);
        assert_close(lon, -111.891_296, 1e-5);

        let point = utm12n_to_web_mercator(424_777.0, 4_513_294.0);
        assert_close(point.x, -12_455_682.1, 2.0);
        assert_close(point.y, 4_978_060.6, 2.0);
    }

    #[test]
    fn test_equator_maps_to_zero_y() {
        let point = geographic_to_web_mercator(0.0, -111.0);
        assert_close(point.y, 0.0, 1e-6);
        assert_close(point.x, -12_356_463.478, 1e-3);
    }
}
