//! Stereographic projection (Proj4 `stere`).

use crate::planets::Planet;
use crate::projections::{cs, Projection, EPSILON};
use crate::vectors::deg360;

/// Stereographic projection, polar by default.
#[derive(Debug, Clone)]
pub struct Stereographic {
    lon_w_0: f64,
    lat_0: f64,
    target: String,
    radius_km: f64,
    clat0: f64,
    slat0: f64,
}

impl Stereographic {
    /// Projection centered on (`lon_w_0`, `lat_0`) on a target body.
    pub fn new(lon_w_0: f64, lat_0: f64, target: &Planet) -> Stereographic {
        Stereographic::with_radius(lon_w_0, lat_0, target.name, target.radius())
    }

    /// Projection with an explicit radius [km].
    pub fn with_radius(
        lon_w_0: f64,
        lat_0: f64,
        target: &str,
        radius_km: f64,
    ) -> Stereographic {
        let (clat0, slat0) = cs(lat_0);
        Stereographic {
            lon_w_0,
            lat_0,
            target: target.to_string(),
            radius_km,
            clat0,
            slat0,
        }
    }
}

impl Default for Stereographic {
    /// North-polar projection on a unit (1 m) sphere.
    fn default() -> Stereographic {
        Stereographic::with_radius(0.0, 90.0, "Undefined", 1e-3)
    }
}

impl Projection for Stereographic {
    fn name(&self) -> &'static str {
        "Stereographic"
    }

    fn proj4_key(&self) -> &'static str {
        "stere"
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

    fn xy(&self, lon_w: f64, lat: f64) -> Option<(f64, f64)> {
        // The anti-origin parallel has no stereographic image.
        if (lat + self.lat_0).abs() <= EPSILON {
            return None;
        }
        let (clat, slat) = cs(lat);
        let (cdlon, sdlon) = cs(self.lon_w_0 - lon_w);

        let denom = 1.0 + self.slat0 * slat + self.clat0 * clat * cdlon;
        if denom.abs() <= EPSILON {
            return None; // Anti-origin for oblique centers.
        }
        let r = 2.0 * self.r() / denom;
        let x = r * clat * sdlon;
        let y = r * (self.clat0 * slat - self.slat0 * clat * cdlon);
        Some((x, y))
    }

    fn lonlat(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let rh = (x * x + y * y).sqrt();
        if rh <= EPSILON {
            return Some((self.lon_w_0, self.lat_0));
        }

        let c = 2.0 * (rh / (2.0 * self.r())).atan();
        let (cosc, sinc) = (c.cos(), c.sin());

        let lat = (cosc * self.slat0 + y / rh * sinc * self.clat0).asin();
        let lon_w = if self.clat0 < EPSILON {
            // Polar forms.
            if self.lat_0 > 0.0 {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planets::TITAN;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
    }

    fn proj() -> Stereographic {
        Stereographic::new(0.0, 90.0, &TITAN)
    }

    #[test]
    fn definitions() {
        let proj = proj();

        assert_eq!(proj.name(), "Stereographic");
        assert_eq!(proj.proj4_key(), "stere");
        assert_eq!(proj.target(), "Titan");
        assert_eq!(proj.radius_km(), TITAN.radius());
        assert_eq!(proj.r(), TITAN.radius() * 1e3);
        assert_eq!(proj.lat_0(), 90.0);
        assert_eq!(proj.lon_w_0(), 0.0);

        assert_eq!(
            proj.proj4(),
            "+proj=stere +lat_0=90 +lon_0=0 +k=1 +x_0=0 +y_0=0 \
             +a=2574730.0 +b=2574730.0 +units=m +no_defs"
        );

        assert_eq!(
            proj.wkt(),
            "PROJCS[\"PROJCS_Titan_Stereographic\",\
             GEOGCS[\"GCS_Titan\",\
             DATUM[\"D_Titan\",\
             SPHEROID[\"Titan_MEAN_SPHERE\", 2574730, 0]],\
             PRIMEM[\"Greenwich\",0],\
             UNIT[\"Degree\",0.017453292519943295]],\
             PROJECTION[\"Stereographic\"],\
             PARAMETER[\"false_easting\", 0],\
             PARAMETER[\"false_northing\", 0],\
             PARAMETER[\"scale_factor\", 1],\
             PARAMETER[\"central_meridian\", 0],\
             PARAMETER[\"latitude_of_origin\", 90],\
             UNIT[\"Meter\", 1]]"
        );
    }

    #[test]
    fn forward() {
        let proj = proj();

        let (x, y) = proj.xy(0.0, 90.0).unwrap();
        assert_close(x, 0.0, 1e-6);
        assert_close(y, 0.0, 1e-6);

        let expected = [
            (0.0, (0.0, -450_519.0)),
            (90.0, (-450_519.0, 0.0)),
            (180.0, (0.0, 450_519.0)),
            (-90.0, (450_519.0, 0.0)),
        ];
        for (lon, (ex, ey)) in expected {
            let (x, y) = proj.xy(lon, 80.0).unwrap();
            assert_close(x, ex, 1.0);
            assert_close(y, ey, 1.0);
        }

        // The anti-origin (south pole) has no image.
        assert!(proj.xy(0.0, -90.0).is_none());
    }

    #[test]
    fn inverse() {
        let proj = proj();

        let (lon, lat) = proj.lonlat(0.0, 0.0).unwrap();
        assert_close(lon, 0.0, 1e-6);
        assert_close(lat, 90.0, 1e-6);

        let (lon, lat) = proj.lonlat(-450_519.0, 0.0).unwrap();
        assert_close(lon, 90.0, 1e-3);
        assert_close(lat, 80.0, 1e-3);

        let (lon, lat) = proj.lonlat(450_519.0, 0.0).unwrap();
        assert_close(lon, 270.0, 1e-3);
        assert_close(lat, 80.0, 1e-3);

        let (lon, lat) = proj.lonlat(0.0, -450_519.0).unwrap();
        assert_close(lon, 0.0, 1e-3);
        assert_close(lat, 80.0, 1e-3);
    }

    #[test]
    fn roundtrip_oblique() {
        let proj = Stereographic::new(30.0, 20.0, &TITAN);
        for (lon, lat) in [(30.0, 20.0), (50.0, -10.0), (350.0, 60.0)] {
            let (x, y) = proj.xy(lon, lat).unwrap();
            let (lon_2, lat_2) = proj.lonlat(x, y).unwrap();
            assert_close(lon_2, lon, 1e-6);
            assert_close(lat_2, lat, 1e-6);
        }
    }

    #[test]
    fn path_projection() {
        use crate::projections::MapPath;

        let proj = proj();
        let ring = [(0.0, 80.0), (90.0, 80.0), (180.0, 80.0), (270.0, 80.0)];
        let projected = proj.project_path(&MapPath::polygon(&ring)).unwrap();
        assert_eq!(projected.len(), 5);
        assert_close(projected.vertices()[1].0, -450_519.0, 1.0);
    }
}
