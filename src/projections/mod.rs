//! Cartographic projections.
//!
//! Every projection maps (west longitude, latitude) degrees to map
//! coordinates in meters (forward) and back (inverse), and renders its
//! Proj4 / WKT definition strings. Footprint paths are projected
//! vertex-wise; the equirectangular projection additionally re-draws
//! polygons that wrap a pole or cross the anti-meridian.

pub mod equirectangular;
pub mod mollweide;
pub mod orthographic;
pub mod path;
pub mod stereographic;

pub use equirectangular::Equirectangular;
pub use mollweide::Mollweide;
pub use orthographic::Orthographic;
pub use path::{MapPath, PathCode};
pub use stereographic::Stereographic;

use crate::errors::Result;

/// Default numerical tolerance of the projections.
pub const EPSILON: f64 = 1e-10;

/// East central meridian matching a west central meridian.
pub(crate) fn east_meridian(lon_w_0: f64) -> f64 {
    if lon_w_0.abs() == 180.0 {
        180.0
    } else {
        (-lon_w_0 + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Cosine and sine of an angle in degrees.
pub(crate) fn cs(deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (rad.cos(), rad.sin())
}

/// A ground projection on a spherical target.
pub trait Projection {
    /// Projection name (used in WKT).
    fn name(&self) -> &'static str;

    /// Proj4 projection key.
    fn proj4_key(&self) -> &'static str;

    /// Target body name.
    fn target(&self) -> &str;

    /// Center west longitude [degree].
    fn lon_w_0(&self) -> f64;

    /// Center latitude [degree].
    fn lat_0(&self) -> f64;

    /// Target radius [km].
    fn radius_km(&self) -> f64;

    /// Target radius [m].
    fn r(&self) -> f64 {
        self.radius_km() * 1e3
    }

    /// East central meridian [degree].
    fn lon_0(&self) -> f64 {
        east_meridian(self.lon_w_0())
    }

    /// Forward projection. `None` when the point has no image (far
    /// side, anti-origin).
    fn xy(&self, lon_w: f64, lat: f64) -> Option<(f64, f64)>;

    /// Inverse projection. `None` when the map point is outside the
    /// projection domain.
    fn lonlat(&self, x: f64, y: f64) -> Option<(f64, f64)>;

    /// Forward-project point pairs (NaN marks unprojectable points).
    fn xy_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(lon_w, lat)| self.xy(lon_w, lat).unwrap_or((f64::NAN, f64::NAN)))
            .collect()
    }

    /// Inverse-project map points (NaN marks out-of-domain points).
    fn lonlat_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(x, y)| self.lonlat(x, y).unwrap_or((f64::NAN, f64::NAN)))
            .collect()
    }

    /// Project a geographic path into map coordinates, vertex-wise.
    fn project_path(&self, path: &MapPath) -> Result<MapPath> {
        Ok(MapPath::new(
            self.xy_points(path.vertices()),
            path.codes().to_vec(),
        ))
    }

    /// Proj4 definition string.
    fn proj4(&self) -> String {
        format!(
            "+proj={} +lat_0={} +lon_0={} +k=1 +x_0=0 +y_0=0 +a={:?} +b={:?} +units=m +no_defs",
            self.proj4_key(),
            self.lat_0(),
            self.lon_0(),
            self.r(),
            self.r(),
        )
    }

    /// WKT definition string.
    fn wkt(&self) -> String {
        format!(
            "PROJCS[\"PROJCS_{target}_{name}\",\
             GEOGCS[\"GCS_{target}\",\
             DATUM[\"D_{target}\",\
             SPHEROID[\"{target}_MEAN_SPHERE\", {r}, 0]],\
             PRIMEM[\"Greenwich\",0],\
             UNIT[\"Degree\",0.017453292519943295]],\
             PROJECTION[\"{name}\"],\
             PARAMETER[\"false_easting\", 0],\
             PARAMETER[\"false_northing\", 0],\
             PARAMETER[\"scale_factor\", 1],\
             PARAMETER[\"central_meridian\", {lon_0}],\
             PARAMETER[\"latitude_of_origin\", {lat_0}],\
             UNIT[\"Meter\", 1]]",
            target = self.target(),
            name = self.name(),
            r = self.r() as i64,
            lon_0 = self.lon_0(),
            lat_0 = self.lat_0(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn east_meridians() {
        assert_eq!(east_meridian(0.0), 0.0);
        assert_eq!(east_meridian(90.0), -90.0);
        assert_eq!(east_meridian(270.0), 90.0);
        assert_eq!(east_meridian(180.0), 180.0);
        assert_eq!(east_meridian(-180.0), 180.0);
    }
}
