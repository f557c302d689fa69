//! Orthographic projection (Proj4 `ortho`).

use crate::planets::Planet;
use crate::projections::{cs, Projection};
use crate::vectors::deg360;

/// Far-side cutoff of the orthographic projection.
const EPSILON: f64 = 1e-18;

/// Orthographic projection (view from infinity).
#[derive(Debug, Clone)]
pub struct Orthographic {
    lon_w_0: f64,
    lat_0: f64,
    target: String,
    radius_km: f64,
    clat0: f64,
    slat0: f64,
}

impl Orthographic {
    /// Projection centered on (`lon_w_0`, `lat_0`) on a target body.
    pub fn new(lon_w_0: f64, lat_0: f64, target: &Planet) -> Orthographic {
        Orthographic::with_radius(lon_w_0, lat_0, target.name, target.radius())
    }

    /// Projection with an explicit radius [km].
    pub fn with_radius(
        lon_w_0: f64,
        lat_0: f64,
        target: &str,
        radius_km: f64,
    ) -> Orthographic {
        let (clat0, slat0) = cs(lat_0);
        Orthographic {
            lon_w_0,
            lat_0,
            target: target.to_string(),
            radius_km,
            clat0,
            slat0,
        }
    }
}

impl Default for Orthographic {
    /// Equatorial projection on a unit (1 m) sphere.
    fn default() -> Orthographic {
        Orthographic::with_radius(0.0, 0.0, "Undefined", 1e-3)
    }
}

impl Projection for Orthographic {
    fn name(&self) -> &'static str {
        "Orthographic"
    }

    fn proj4_key(&self) -> &'static str {
        "ortho"
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn lon_w_0(&self) -> f64 {
        self.lon_w_0
    }

    fn lat_0(&self) -> f64 {
        self.lat_0
    }

    fn radius_km(&self) -> f64 {
        self.radius_km
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

    fn xy(&self, lon_w: f64, lat: f64) -> Option<(f64, f64)> {
        let (clat, slat) = cs(lat);
        let (cdlon, sdlon) = cs(self.lon_w_0 - lon_w);

        // Cosine of the angular distance to the projection center.
        let g = self.slat0 * slat + self.clat0 * clat * cdlon;
        if g < EPSILON {
            return None; // Far side.
        }

        let x = self.r() * clat * sdlon;
        let y = self.r() * (self.clat0 * slat - self.slat0 * clat * cdlon);
        Some((x, y))
    }

    fn lonlat(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let rh = (x * x + y * y).sqrt();
        if rh <= EPSILON {
            return Some((self.lon_w_0, self.lat_0));
        }
        if rh > self.r() {
            return None; // Outside the limb.
        }

        let c = (rh / self.r()).asin();
        let (cosc, sinc) = (c.cos(), c.sin());

        let lat = (cosc * self.slat0 + y / rh * sinc * self.clat0).asin();
        let lon_w = if self.clat0 < EPSILON {
            if self.lat_0 >= 0.0 {
                x.atan2(-y)
            } else {
                x.atan2(y)
            }
        } else {
            (sinc * x).atan2(rh * self.clat0 * cosc - self.slat0 * sinc * y)
        };

        Some((
            deg360(self.lon_w_0 - lon_w.to_degrees()),
            lat.to_degrees(),
        ))
    }
}
