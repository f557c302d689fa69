//! Spherical geometry primitives.
//!
//! Longitudes are *west* longitudes in `[0°, 360°[` (positive toward the
//! west, the planetary convention used by the Cassini archive), latitudes
//! are planetocentric north latitudes in `[-90°, 90°]`.

use crate::errors::{Result, VimsError};

/// Cartesian 3-vector.
pub type Xyz = [f64; 3];

/// Restrict an angle to the `[-180°, 180°[` range.
pub fn deg180(ang: f64) -> f64 {
    (ang + 180.0).rem_euclid(360.0) - 180.0
}

/// Restrict an angle to the `[0°, 360°[` range.
pub fn deg360(ang: f64) -> f64 {
    ang.rem_euclid(360.0)
}

/// Vector norm.
pub fn norm(v: &Xyz) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Normalized copy of a vector.
pub fn hat(v: &Xyz) -> Xyz {
    let n = norm(v);
    [v[0] / n, v[1] / n, v[2] / n]
}

/// Dot product.
pub fn dot(v1: &Xyz, v2: &Xyz) -> f64 {
    v1[0] * v2[0] + v1[1] * v2[1] + v1[2] * v2[2]
}

/// Cross product.
pub fn cross(v1: &Xyz, v2: &Xyz) -> Xyz {
    [
        v1[1] * v2[2] - v1[2] * v2[1],
        v1[2] * v2[0] - v1[0] * v2[2],
        v1[0] * v2[1] - v1[1] * v2[0],
    ]
}

/// Convert cartesian coordinates to (west longitude, latitude) in degrees.
pub fn lonlat(v: &Xyz) -> (f64, f64) {
    let lon_w = deg360(-v[1].atan2(v[0]).to_degrees());
    let lat = (v[2] / norm(v)).asin().to_degrees();
    (lon_w, lat)
}

/// Convert (west longitude, latitude) in degrees to cartesian coordinates.
///
/// `r` is the point distance (planet radius or altitude).
pub fn xyz(lon_w: f64, lat: f64, r: f64) -> Xyz {
    let lon_e = (-lon_w).to_radians();
    let lat = lat.to_radians();
    [
        r * lat.cos() * lon_e.cos(),
        r * lat.cos() * lon_e.sin(),
        r * lat.sin(),
    ]
}

/// Right ascension / declination (degrees) of a J2000 pointing vector.
pub fn radec(j2000: &Xyz) -> (f64, f64) {
    let (lon_w, lat) = lonlat(j2000);
    (deg360(-lon_w), lat)
}

/// Angular separation between two vectors (degrees).
///
/// The dot product is clamped to 1 to absorb rounding on near-parallel
/// vectors.
pub fn angle(v1: &Xyz, v2: &Xyz) -> f64 {
    let d = dot(&hat(v1), &hat(v2));
    if d >= 1.0 {
        0.0
    } else {
        d.max(-1.0).acos().to_degrees()
    }
}

/// Trigonometric half versine of an angle in radians.
pub fn hav(theta: f64) -> f64 {
    0.5 * (1.0 - theta.cos())
}

/// Haversine distance between two points on a sphere of radius `r`.
///
/// Longitudes and latitudes in degrees, distance in `r` units.
pub fn hav_dist(lon_1: f64, lat_1: f64, lon_2: f64, lat_2: f64, r: f64) -> f64 {
    let (lambda_1, phi_1) = (lon_1.to_radians(), lat_1.to_radians());
    let (lambda_2, phi_2) = (lon_2.to_radians(), lat_2.to_radians());
    2.0 * r
        * (hav(phi_2 - phi_1) + phi_1.cos() * phi_2.cos() * hav(lambda_2 - lambda_1))
            .sqrt()
            .asin()
}

/// Surface area of the spherical quadrangle bounded by two meridians and
/// two parallels (in `r` units squared).
pub fn areaquad(lon_0: f64, lat_0: f64, lon_1: f64, lat_1: f64, r: f64) -> f64 {
    let dlambda = (lon_1 - lon_0).to_radians();
    let (sin_phi_0, sin_phi_1) = (lat_0.to_radians().sin(), lat_1.to_radians().sin());
    (r * r * dlambda * (sin_phi_1 - sin_phi_0)).abs()
}

/// Local azimuth angle between the sun and the observer (degrees).
///
/// Zero when either the incidence or the emergence is zero (the azimuth is
/// degenerate at the sub-solar / sub-spacecraft point).
pub fn azimuth(inc: f64, eme: f64, phase: f64) -> f64 {
    if inc == 0.0 || eme == 0.0 {
        return 0.0;
    }
    let (i, e, p) = (inc.to_radians(), eme.to_radians(), phase.to_radians());
    let azi = (p.cos() - i.cos() * e.cos()) / (i.sin() * e.sin());
    azi.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Indices of the two vectors with the largest mutual distance.
pub fn v_max_dist(pts: &[Xyz]) -> Result<(usize, usize)> {
    if pts.len() < 2 {
        return Err(VimsError::InvalidGeometry(
            "at least 2 points are required".into(),
        ));
    }
    let mut best = (0, 1);
    let mut d_max = -1.0;
    for i in 0..pts.len() {
        for j in (i + 1)..pts.len() {
            let d = (0..3).map(|k| (pts[i][k] - pts[j][k]).powi(2)).sum::<f64>();
            if d > d_max {
                d_max = d;
                best = (i, j);
            }
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
    }

    #[test]
    fn angle_ranges() {
        assert_eq!(deg180(0.0), 0.0);
        assert_eq!(deg180(360.0), 0.0);
        assert_eq!(deg180(270.0), -90.0);
        assert_eq!(deg180(-90.0), -90.0);
        assert_eq!(deg180(-270.0), 90.0);

        assert_eq!(deg360(0.0), 0.0);
        assert_eq!(deg360(360.0), 0.0);
        assert_eq!(deg360(-90.0), 270.0);
        assert_eq!(deg360(270.0), 270.0);
        assert_eq!(deg360(-270.0), 90.0);
    }

    #[test]
    fn cartesian_geographic() {
        let (lon, lat) = lonlat(&[1.0, 0.0, 0.0]);
        assert_close(lon, 0.0, 1e-9);
        assert_close(lat, 0.0, 1e-9);

        let (lon, lat) = lonlat(&[0.0, 1.0, 0.0]);
        assert_close(lon, 270.0, 1e-9);
        assert_close(lat, 0.0, 1e-9);

        let (lon, lat) = lonlat(&[1.0, 1.0, 0.0]);
        assert_close(lon, 315.0, 1e-9);
        assert_close(lat, 0.0, 1e-9);

        let (lon, lat) = lonlat(&[1.0, 0.0, 1.0]);
        assert_close(lon, 0.0, 1e-9);
        assert_close(lat, 45.0, 1e-9);

        let v = xyz(90.0, 0.0, 1.0);
        assert_close(v[0], 0.0, 1e-9);
        assert_close(v[1], -1.0, 1e-9);
        assert_close(v[2], 0.0, 1e-9);

        let v = xyz(315.0, 0.0, 1.0);
        assert_close(v[0], std::f64::consts::FRAC_1_SQRT_2, 1e-9);
        assert_close(v[1], std::f64::consts::FRAC_1_SQRT_2, 1e-9);

        let v = xyz(0.0, 45.0, 1.0);
        assert_close(v[0], std::f64::consts::FRAC_1_SQRT_2, 1e-9);
        assert_close(v[2], std::f64::consts::FRAC_1_SQRT_2, 1e-9);
    }

    #[test]
    fn radec_from_j2000() {
        let (ra, dec) = radec(&[1.0, 0.0, 0.0]);
        assert_close(ra, 0.0, 1e-9);
        assert_close(dec, 0.0, 1e-9);

        let (ra, dec) = radec(&[0.0, 1.0, 0.0]);
        assert_close(ra, 90.0, 1e-9);
        assert_close(dec, 0.0, 1e-9);

        let (ra, dec) = radec(&[0.0, 0.0, 1.0]);
        assert_close(ra, 0.0, 1e-9);
        assert_close(dec, 90.0, 1e-9);
    }

    #[test]
    fn norms_and_angles() {
        assert_close(norm(&[1.0, 0.0, 0.0]), 1.0, 1e-12);
        assert_close(norm(&[1.0, 1.0, 1.0]), 1.732_050_808, 1e-9);

        let h = hat(&[1.0, 1.0, 1.0]);
        assert_close(h[0], 0.577_350_269, 1e-9);

        assert_close(angle(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), 90.0, 1e-9);
        assert_close(angle(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]), 0.0, 1e-9);
    }

    #[test]
    fn haversine() {
        assert_close(hav_dist(0.0, 0.0, 90.0, 0.0, 1.0), std::f64::consts::FRAC_PI_2, 1e-9);
        assert_close(hav_dist(20.0, 30.0, 120.0, 45.0, 1.0).to_degrees(), 75.687, 1e-3);
    }

    #[test]
    fn quadrangle_area() {
        assert_close(areaquad(0.0, -90.0, 360.0, 90.0, 1.0), 4.0 * std::f64::consts::PI, 1e-6);
        assert_close(areaquad(0.0, 15.0, 30.0, 45.0, 1.0), 4.0 * std::f64::consts::PI * 0.0187, 1e-3);
        assert_eq!(areaquad(0.0, 15.0, 0.0, 45.0, 1.0), 0.0);
        assert_eq!(areaquad(0.0, 15.0, 30.0, 15.0, 1.0), 0.0);
    }

    #[test]
    fn local_azimuth() {
        assert_eq!(azimuth(0.0, 45.0, 60.0), 0.0);
        assert_eq!(azimuth(30.0, 0.0, 60.0), 0.0);
        assert_close(azimuth(30.0, 45.0, 60.0), 108.532, 1e-3);
    }

    #[test]
    fn max_dist_pair() {
        let pts = [
            [1.0, 0.0, 0.0],
            [0.9, 0.1, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        assert_eq!(v_max_dist(&pts).unwrap(), (0, 2));
        assert!(v_max_dist(&pts[..1]).is_err());
    }
}
