//! Equirectangular projection (Proj4 `eqc`).
//!
//! a.k.a. Plate Carrée / Equidistant Cylindrical. Footprint polygons
//! that wrap a pole or cross the anti-meridian are re-drawn so the
//! projected path stays meaningful on the rectangular map.

use crate::errors::{Result, VimsError};
use crate::planets::Planet;
use crate::projections::{cs, MapPath, PathCode, Projection};
use crate::vectors::deg180;

/// Equirectangular projection.
#[derive(Debug, Clone)]
pub struct Equirectangular {
    lon_w_0: f64,
    lat_0: f64,
    lat_ts: f64,
    target: String,
    radius_km: f64,
    /// Cosine of the latitude of true scale.
    rc: f64,
}

impl Equirectangular {
    /// Projection centered on (`lon_w_0`, `lat_0`) on a target body.
    pub fn new(lon_w_0: f64, lat_0: f64, target: &Planet) -> Equirectangular {
        Equirectangular::with_radius(lon_w_0, lat_0, 0.0, target.name, target.radius())
    }

    /// Projection with an explicit latitude of true scale and radius
    /// [km].
    pub fn with_radius(
        lon_w_0: f64,
        lat_0: f64,
        lat_ts: f64,
        target: &str,
        radius_km: f64,
    ) -> Equirectangular {
        let (rc, _) = cs(lat_ts);
        Equirectangular {
            lon_w_0,
            lat_0,
            lat_ts,
            target: target.to_string(),
            radius_km,
            rc,
        }
    }

    /// Latitude of true scale [degree].
    pub fn lat_ts(&self) -> f64 {
        self.lat_ts
    }

    /// Cosine of the latitude of true scale.
    pub fn rc(&self) -> f64 {
        self.rc
    }

    /// Projected x value of the crossing (anti-)meridian.
    pub fn xc(&self) -> f64 {
        std::f64::consts::PI * self.r() * self.rc
    }

    /// Projected y value of the poles.
    pub fn yc(&self) -> f64 {
        std::f64::consts::FRAC_PI_2 * self.r()
    }

    /// Redraw a projected ring around the nearest pole.
    ///
    /// `cross[i]` flags the segment (i, i+1) jumping across the map.
    fn cross_pole(&self, x: &[f64], y: &[f64], cross: &[bool]) -> MapPath {
        let xc = self.xc();
        let pole = {
            let extreme = y
                .iter()
                .cloned()
                .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                .unwrap_or(0.0);
            if extreme >= 0.0 {
                self.yc()
            } else {
                -self.yc()
            }
        };

        let mut verts = vec![(x[0], y[0])];
        for i in 0..cross.len() {
            if cross[i] {
                let (x_1, x_2, f) = if x[i] > 0.0 {
                    // Right cross.
                    (xc, -xc, (xc - x[i]) / (x[i + 1] + 2.0 * xc - x[i]))
                } else {
                    // Left cross.
                    (-xc, xc, (xc + x[i]) / (x[i] - x[i + 1] + 2.0 * xc))
                };
                let y_cross = (y[i + 1] - y[i]) * f + y[i];

                verts.push((x_1, y_cross));
                verts.push((x_1, pole));
                verts.push((x_2, pole));
                verts.push((x_2, y_cross));
            }
            verts.push((x[i + 1], y[i + 1]));
        }

        let n = verts.len();
        let mut codes = vec![PathCode::LineTo; n];
        codes[0] = PathCode::MoveTo;
        codes[n - 1] = PathCode::ClosePoly;
        MapPath::new(verts, codes)
    }

    /// Split a projected ring crossing the anti-meridian in two pieces.
    fn cross_antimeridian(&self, x: &[f64], y: &[f64]) -> MapPath {
        let xc = self.xc();
        let npt = x.len() - 1;

        // Right piece, in [0, xc].
        let xr: Vec<f64> = x.iter().map(|&v| v.rem_euclid(2.0 * xc)).collect();
        let mut rv: Vec<(f64, f64)> = Vec::new();
        for i in 0..npt {
            if xr[i] <= xc {
                rv.push((xr[i], y[i]));
            }
            if (xr[i] <= xc && xr[i + 1] > xc) || (xr[i] > xc && xr[i + 1] <= xc) {
                let f = (xc - xr[i]) / (xr[i + 1] - xr[i]);
                rv.push((xc, (y[i + 1] - y[i]) * f + y[i]));
            }
        }
        if let Some(&first) = rv.first() {
            rv.push(first);
        }

        // Left piece, in [-xc, 0].
        let xl: Vec<f64> = xr.iter().map(|&v| v - 2.0 * xc).collect();
        let mut lv: Vec<(f64, f64)> = Vec::new();
        for i in 0..npt {
            if xl[i] >= -xc {
                lv.push((xl[i], y[i]));
            }
            if (xl[i] >= -xc && xl[i + 1] < -xc) || (xl[i] < -xc && xl[i + 1] >= -xc) {
                let f = (-xc - xl[i]) / (xl[i + 1] - xl[i]);
                lv.push((-xc, (y[i + 1] - y[i]) * f + y[i]));
            }
        }
        if let Some(&first) = lv.first() {
            lv.push(first);
        }

        let mut verts = Vec::with_capacity(lv.len() + rv.len());
        let mut codes = Vec::with_capacity(lv.len() + rv.len());
        for piece in [&lv, &rv] {
            for (i, &v) in piece.iter().enumerate() {
                verts.push(v);
                codes.push(if i == 0 {
                    PathCode::MoveTo
                } else if i == piece.len() - 1 {
                    PathCode::ClosePoly
                } else {
                    PathCode::LineTo
                });
            }
        }
        MapPath::new(verts, codes)
    }
}

impl Default for Equirectangular {
    /// Unitary projection: 1 x-unit per degree of longitude.
    fn default() -> Equirectangular {
        Equirectangular::with_radius(180.0, 0.0, 0.0, "Undefined", 180e-3 / std::f64::consts::PI)
    }
}

impl Projection for Equirectangular {
    fn name(&self) -> &'static str {
        "Equirectangular"
    }

    fn proj4_key(&self) -> &'static str {
        "eqc"
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

    fn proj4(&self) -> String {
        format!(
            "+proj={} +lat_0={} +lon_0={} +lat_ts={} +x_0=0 +y_0=0 +a={:?} +b={:?} +units=m +no_defs",
            self.proj4_key(),
            self.lat_0(),
            self.lon_0(),
            self.lat_ts(),
            self.r(),
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
             PARAMETER[\"standard_parallel_1\", {lat_ts}],\
             PARAMETER[\"central_meridian\", {lon_0}],\
             PARAMETER[\"latitude_of_origin\", {lat_0}],\
             UNIT[\"Meter\", 1]]",
            target = self.target(),
            name = self.name(),
            r = self.r() as i64,
            lat_ts = self.lat_ts(),
            lon_0 = self.lon_0(),
            lat_0 = self.lat_0(),
        )
    }

    fn xy(&self, lon_w: f64, lat: f64) -> Option<(f64, f64)> {
        // Keep the anti-meridian on the +x side of the map.
        let dlon = if self.lon_w_0 - lon_w == 180.0 {
            std::f64::consts::PI
        } else {
            deg180(self.lon_w_0 - lon_w).to_radians()
        };
        let dlat = (lat - self.lat_0).to_radians();
        Some((self.r() * dlon * self.rc, self.r() * dlat))
    }

    fn lonlat(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let mut lon_w = (-(x / (self.r() * self.rc)).to_degrees() - self.lon_w_0)
            .rem_euclid(360.0);
        if (lon_w - 360.0).abs() < 1e-5 {
            lon_w = 0.0;
        }
        let lat = (y / self.r()).to_degrees() + self.lat_0;
        Some((lon_w, lat))
    }

    /// Project a ring, re-drawing pole wraps and anti-meridian
    /// crossings. More than 2 crossings is an error.
    fn project_path(&self, path: &MapPath) -> Result<MapPath> {
        let projected = self.xy_points(path.vertices());
        let x: Vec<f64> = projected.iter().map(|p| p.0).collect();
        let y: Vec<f64> = projected.iter().map(|p| p.1).collect();

        let xc = self.xc();
        let cross: Vec<bool> = x.windows(2).map(|w| (w[1] - w[0]).abs() > xc).collect();
        let n_cross = cross.iter().filter(|&&c| c).count();

        match n_cross {
            0 => Ok(MapPath::new(projected, path.codes().to_vec())),
            1 => Ok(self.cross_pole(&x, &y, &cross)),
            2 => Ok(self.cross_antimeridian(&x, &y)),
            n => Err(VimsError::InvalidGeometry(format!(
                "path vertices cross the anti-meridian {n} times"
            ))),
        }
    }
}
