//! Named Cassini flybys.
//!
//! The catalog ships with the crate (`data/flybys.csv`) and records the
//! targeted close encounters used to tag VIMS observations.

use std::sync::OnceLock;

use chrono::NaiveDateTime;

use crate::errors::{Result, VimsError};

const FLYBYS_CSV: &str = include_str!("../data/flybys.csv");

/// A single targeted flyby.
#[derive(Debug, Clone, PartialEq)]
pub struct Flyby {
    /// Orbit (rev) number.
    pub rev: u32,
    /// Flyby name (`Ta`, `T3`, `E5`, …).
    pub name: String,
    /// Targeted flyby ID (uppercase).
    pub targeted: String,
    /// Satellite name.
    pub satellite: String,
    /// Closest-approach time (UTC).
    pub ca: NaiveDateTime,
    /// Closest-approach day of year.
    pub doy: u16,
    /// Closest-approach altitude [km].
    pub alt_km: u32,
    /// Inbound / outbound leg of the orbit.
    pub in_out: String,
    /// Relative speed at closest approach [km/s].
    pub speed_km_s: f64,
    /// Phase angle at closest approach [deg].
    pub phase_deg: u32,
}

impl Flyby {
    /// Whether `name` designates this flyby (case-insensitive, matches
    /// either the name or the targeted ID).
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.targeted.eq_ignore_ascii_case(name)
    }

    /// Signed offset [s] from this flyby closest approach to `t`.
    pub fn delta(&self, t: NaiveDateTime) -> f64 {
        (t - self.ca).num_milliseconds() as f64 * 1e-3
    }
}

impl std::fmt::Display for Flyby {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.targeted)
    }
}

fn parse_catalog(raw: &str) -> Result<Vec<Flyby>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut flybys = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| VimsError::InvalidTime(e.to_string()))?;
        let get = |i: usize| record.get(i).unwrap_or("").to_string();
        let ca = NaiveDateTime::parse_from_str(&get(4), "%Y-%b-%d %H:%M")
            .map_err(|_| VimsError::InvalidTime(get(4)))?;
        flybys.push(Flyby {
            rev: get(0).parse().unwrap_or(0),
            name: get(1),
            targeted: get(2),
            satellite: get(3),
            ca,
            doy: get(5).parse().unwrap_or(0),
            alt_km: get(6).parse().unwrap_or(0),
            in_out: get(7),
            speed_km_s: get(8).parse().unwrap_or(0.0),
            phase_deg: get(9).parse().unwrap_or(0),
        });
    }
    Ok(flybys)
}

/// The full flyby catalog, sorted by closest-approach time.
pub fn flybys() -> &'static [Flyby] {
    static CATALOG: OnceLock<Vec<Flyby>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let mut list = parse_catalog(FLYBYS_CSV).expect("embedded flyby catalog is valid");
        list.sort_by_key(|f| f.ca);
        list
    })
}

/// Lookup a flyby by name or targeted ID (case-insensitive).
pub fn flyby(name: &str) -> Option<&'static Flyby> {
    flybys().iter().find(|f| f.matches(name))
}

/// The flyby whose closest approach is nearest to `t`.
pub fn closest_flyby(t: NaiveDateTime) -> &'static Flyby {
    flybys()
        .iter()
        .min_by(|a, b| {
            a.delta(t)
                .abs()
                .partial_cmp(&b.delta(t).abs())
                .expect("finite offsets")
        })
        .expect("catalog is not empty")
}
