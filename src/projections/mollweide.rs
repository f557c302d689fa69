//! Mollweide projection (Proj4 `moll`).
//!
//! Equal-area pseudo-cylindrical projection. The auxiliary angle θ
//! solves `2θ + sin 2θ = π sin φ` (Newton-Raphson).

use crate::errors::{Result, VimsError};
use crate::planets::Planet;
use crate::projections::{MapPath, Projection, EPSILON};
use crate::vectors::{deg180, deg360};

const MAX_ITER: usize = 100;

/// Mollweide projection.
#[derive(Debug, Clone)]
pub struct Mollweide {
    lon_w_0: f64,
    target: String,
    radius_km: f64,
}

impl Mollweide {
    /// Projection centered on `lon_w_0` on a target body.
    pub fn new(lon_w_0: f64, target: &Planet) -> Mollweide {
        Mollweide::with_radius(lon_w_0, target.name, target.radius())
    }

    /// Projection with an explicit radius [km].
    pub fn with_radius(lon_w_0: f64, target: &str, radius_km: f64) -> Mollweide {
        Mollweide {
            lon_w_0,
            target: target.to_string(),
            radius_km,
        }
    }

    /// Auxiliary x-radius [m].
    pub fn rx(&self) -> f64 {
        self.r() * std::f64::consts::SQRT_2 / std::f64::consts::FRAC_PI_2
    }

    /// Auxiliary y-radius [m].
    pub fn ry(&self) -> f64 {
        self.r() * std::f64::consts::SQRT_2
    }

    /// Map extent `[x_min, x_max, y_min, y_max]`.
    pub fn extent(&self) -> [f64; 4] {
        [
            -2.0 * self.ry(),
            2.0 * self.ry(),
            -self.ry(),
            self.ry(),
        ]
    }

    /// Solve the auxiliary θ angle for a latitude [degree].
    fn theta(&self, lat: f64) -> f64 {
        if lat.abs() >= 90.0 {
            return std::f64::consts::FRAC_PI_2.copysign(lat);
        }

        // Newton-Raphson on Θ = 2θ.
        let target = std::f64::consts::PI * lat.to_radians().sin();
        let mut big_theta = lat.to_radians();
        for _ in 0..MAX_ITER {
            let delta = (big_theta + big_theta.sin() - target) / (1.0 + big_theta.cos());
            big_theta -= delta;
            if delta.abs() <= EPSILON {
                break;
            }
        }
        big_theta / 2.0
    }
}

impl Default for Mollweide {
    /// Unitary projection (`ry` = 1 m).
    fn default() -> Mollweide {
        Mollweide::with_radius(0.0, "Undefined", 1e-3 / std::f64::consts::SQRT_2)
    }
}

impl Projection for Mollweide {
    fn name(&self) -> &'static str {
        "Mollweide"
    }

    fn proj4_key(&self) -> &'static str {
        "moll"
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn lon_w_0(&self) -> f64 {
        self.lon_w_0
    }

    fn lat_0(&self) -> f64 {
        0.0
    }

    fn radius_km(&self) -> f64 {
        self.radius_km
    }

    fn proj4(&self) -> String {
        format!(
            "+proj={} +lon_0={} +x_0=0 +y_0=0 +R={:?} +units=m +no_defs",
            self.proj4_key(),
            self.lon_0(),
            self.r(),
        )
    }

    fn wkt(&self) -> String {
        format!(
            "PROJCS[\"PROJCS_{target}_{name}\",\
             GEOGCS[\"GCS_{target}\",\
             DATUM[\"D_{target}\",\
             SPHEROID[\"{target}_Mean_Sphere\", {r}, 0]],\
             PRIMEM[\"Greenwich\",0],\
             UNIT[\"Degree\",0.017453292519943295]],\
             PROJECTION[\"{name}\"],\
             PARAMETER[\"false_easting\", 0],\
             PARAMETER[\"false_northing\", 0],\
             PARAMETER[\"central_meridian\", {lon_0}],\
             UNIT[\"Meter\", 1]]",
            target = self.target(),
            name = self.name(),
            r = self.r() as i64,
            lon_0 = self.lon_0(),
        )
    }

    fn xy(&self, lon_w: f64, lat: f64) -> Option<(f64, f64)> {
        if lat.abs() >= 90.0 {
            return Some((0.0, if lat > 0.0 { self.ry() } else { -self.ry() }));
        }

        // Keep the anti-meridian on the +x side of the map.
        let dlon = if self.lon_w_0 - lon_w == 180.0 {
            std::f64::consts::PI
        } else {
            deg180(self.lon_w_0 - lon_w).to_radians()
        };

        let theta = self.theta(lat);
        Some((self.rx() * dlon * theta.cos(), self.ry() * theta.sin()))
    }

    fn lonlat(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if (y / self.ry()).abs() > 1.0 {
            return None;
        }
        let theta = (y / self.ry()).asin();

        let lon = x / (self.rx() * theta.cos());
        if lon.abs() > std::f64::consts::PI {
            return None;
        }

        let lat = ((2.0 * theta + (2.0 * theta).sin()) / std::f64::consts::PI).asin();
        Some((
            deg360(self.lon_w_0 - lon.to_degrees()),
            lat.to_degrees(),
        ))
    }

    /// Path projection is not supported: a footprint crossing the map
    /// edge has no single-ring image in this projection.
    fn project_path(&self, _path: &MapPath) -> Result<MapPath> {
        Err(VimsError::InvalidGeometry(
            "path projection is not supported by the Mollweide projection".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planets::TITAN;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
    }

    #[test]
    fn definitions() {
        let proj = Mollweide::new(0.0, &TITAN);

        assert_eq!(proj.name(), "Mollweide");
        assert_eq!(proj.proj4_key(), "moll");
        assert_eq!(proj.lon_w_0(), 0.0);
        assert_eq!(proj.r(), 2_574_730.0);
        assert_close(
            proj.rx(),
            2_574_730.0 * std::f64::consts::SQRT_2 / std::f64::consts::FRAC_PI_2,
            1e-6,
        );
        assert_close(proj.ry(), 2_574_730.0 * std::f64::consts::SQRT_2, 1e-6);

        assert_eq!(
            proj.proj4(),
            "+proj=moll +lon_0=0 +x_0=0 +y_0=0 +R=2574730.0 +units=m +no_defs"
        );

        assert_eq!(
            proj.wkt(),
            "PROJCS[\"PROJCS_Titan_Mollweide\",\
             GEOGCS[\"GCS_Titan\",\
             DATUM[\"D_Titan\",\
             SPHEROID[\"Titan_Mean_Sphere\", 2574730, 0]],\
             PRIMEM[\"Greenwich\",0],\
             UNIT[\"Degree\",0.017453292519943295]],\
             PROJECTION[\"Mollweide\"],\
             PARAMETER[\"false_easting\", 0],\
             PARAMETER[\"false_northing\", 0],\
             PARAMETER[\"central_meridian\", 0],\
             UNIT[\"Meter\", 1]]"
        );

        let extent = proj.extent();
        assert_close(extent[1], 2.0 * proj.ry(), 1e-6);
        assert_close(extent[2], -proj.ry(), 1e-6);
    }

    #[test]
    fn forward() {
        let proj = Mollweide::default();

        let cases = [
            ((0.0, 0.0), (0.0, 0.0)),
            ((0.0, 90.0), (0.0, 1.0)),
            ((0.0, -90.0), (0.0, -1.0)),
            ((90.0, 0.0), (-1.0, 0.0)),
            ((180.0, 0.0), (-2.0, 0.0)),
            ((-180.0, 0.0), (2.0, 0.0)),
            ((270.0, 0.0), (1.0, 0.0)),
            ((360.0, 0.0), (0.0, 0.0)),
            ((180.0, 90.0), (0.0, 1.0)),
            ((-180.0, -90.0), (0.0, -1.0)),
        ];
        for ((lon, lat), (ex, ey)) in cases {
            let (x, y) = proj.xy(lon, lat).unwrap();
            assert_close(x, ex, 1e-6);
            assert_close(y, ey, 1e-6);
        }

        // Near-pole convergence.
        let (x, y) = proj.xy(0.0, 90.0 - 1e-12).unwrap();
        assert_close(x, 0.0, 1e-6);
        assert_close(y, 1.0, 1e-6);

        // Mid-latitude point (θ solve).
        let (x, y) = proj.xy(90.0, 45.0).unwrap();
        assert_close(x, -1.139_725, 1e-6);
        assert_close(y, 0.837_273, 1e-6);
    }

    #[test]
    fn inverse() {
        let proj = Mollweide::default();

        // Outside the ellipse.
        assert!(proj.lonlat(0.0, 1.5).is_none());
        assert!(proj.lonlat(2.5, 0.0).is_none());

        let (lon, lat) = proj.lonlat(0.0, 0.0).unwrap();
        assert_close(lon, 0.0, 1e-9);
        assert_close(lat, 0.0, 1e-9);

        let (lon, lat) = proj.lonlat(-1.0, 0.0).unwrap();
        assert_close(lon, 90.0, 1e-6);
        assert_close(lat, 0.0, 1e-6);

        // Roundtrip on a mid-latitude point.
        let (x, y) = proj.xy(120.0, 30.0).unwrap();
        let (lon, lat) = proj.lonlat(x, y).unwrap();
        assert_close(lon, 120.0, 1e-6);
        assert_close(lat, 30.0, 1e-6);
    }
}
