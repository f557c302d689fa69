//! Great circles on a sphere.

use crate::errors::{Result, VimsError};
use crate::vectors::{angle, cross, hat, lonlat, xyz, Xyz};

/// Great circle arc between two anchor points (slerp interpolation).
///
/// Returns `npt` points, endpoints included, as (west longitude,
/// latitude) pairs. Errors when the anchors are identical or antipodal
/// (the arc is degenerate).
pub fn great_circle_arc(
    lon_0: f64,
    lat_0: f64,
    lon_1: f64,
    lat_1: f64,
    npt: usize,
) -> Result<Vec<(f64, f64)>> {
    let pt_0 = xyz(lon_0, lat_0, 1.0);
    let pt_1 = xyz(lon_1, lat_1, 1.0);

    let omega = angle(&pt_0, &pt_1).to_radians();
    let s = omega.sin();

    if s.abs() < 1e-12 {
        return Err(VimsError::InvalidGeometry(format!(
            "degenerate great circle between ({lon_0}, {lat_0}) and ({lon_1}, {lat_1})"
        )));
    }

    let mut pts = Vec::with_capacity(npt);
    for i in 0..npt {
        let t = i as f64 / (npt - 1) as f64;
        let f_0 = ((1.0 - t) * omega).sin() / s;
        let f_1 = (t * omega).sin() / s;
        let v: Xyz = [
            f_0 * pt_0[0] + f_1 * pt_1[0],
            f_0 * pt_0[1] + f_1 * pt_1[1],
            f_0 * pt_0[2] + f_1 * pt_1[2],
        ];
        pts.push(lonlat(&v));
    }
    Ok(pts)
}

/// Full great circle through two anchor points.
///
/// Returns `npt` points covering 360° of the circle, starting at the
/// first anchor.
pub fn great_circle(
    lon_0: f64,
    lat_0: f64,
    lon_1: f64,
    lat_1: f64,
    npt: usize,
) -> Result<Vec<(f64, f64)>> {
    let pt_0 = xyz(lon_0, lat_0, 1.0);
    let pt_1 = xyz(lon_1, lat_1, 1.0);

    let n = cross(&pt_0, &pt_1);
    if (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt() < 1e-12 {
        return Err(VimsError::InvalidGeometry(format!(
            "degenerate great circle between ({lon_0}, {lat_0}) and ({lon_1}, {lat_1})"
        )));
    }

    // Orthonormal basis of the circle plane, anchored on the first point.
    let e_0 = hat(&pt_0);
    let e_1 = hat(&cross(&hat(&n), &e_0));

    let mut pts = Vec::with_capacity(npt);
    for i in 0..npt {
        let t = 2.0 * std::f64::consts::PI * i as f64 / (npt - 1) as f64;
        let v: Xyz = [
            t.cos() * e_0[0] + t.sin() * e_1[0],
            t.cos() * e_0[1] + t.sin() * e_1[1],
            t.cos() * e_0[2] + t.sin() * e_1[2],
        ];
        pts.push(lonlat(&v));
    }
    Ok(pts)
}

/// Latitude of the great circle through two anchor points at a given
/// west longitude.
pub fn great_circle_lat(
    lon_w: f64,
    lon_0: f64,
    lat_0: f64,
    lon_1: f64,
    lat_1: f64,
) -> Result<f64> {
    let pt_0 = xyz(lon_0, lat_0, 1.0);
    let pt_1 = xyz(lon_1, lat_1, 1.0);

    let n = cross(&pt_0, &pt_1);
    if n[2].abs() < 1e-12 {
        return Err(VimsError::InvalidGeometry(
            "great circle normal lies in the equatorial plane".into(),
        ));
    }

    // Zero of n · p(lon, lat) with p on the unit sphere.
    let lon_e = (-lon_w).to_radians();
    let lat = (-(n[0] * lon_e.cos() + n[1] * lon_e.sin()) / n[2]).atan();
    Ok(lat.to_degrees())
}

/// Great circle defined by its pole: points at 90° of the pole.
pub fn great_circle_pole(lon_p: f64, lat_p: f64, npt: usize) -> Result<Vec<(f64, f64)>> {
    let pole = xyz(lon_p, lat_p, 1.0);

    // Any vector orthogonal to the pole anchors the circle.
    let seed: Xyz = if lat_p.abs() < 89.0 {
        [0.0, 0.0, 1.0]
    } else {
        [1.0, 0.0, 0.0]
    };
    let e_0 = hat(&cross(&pole, &seed));
    let e_1 = hat(&cross(&pole, &e_0));

    let mut pts = Vec::with_capacity(npt);
    for i in 0..npt {
        let t = 2.0 * std::f64::consts::PI * i as f64 / (npt - 1) as f64;
        let v: Xyz = [
            t.cos() * e_0[0] + t.sin() * e_1[0],
            t.cos() * e_0[1] + t.sin() * e_1[1],
            t.cos() * e_0[2] + t.sin() * e_1[2],
        ];
        pts.push(lonlat(&v));
    }
    Ok(pts)
}
