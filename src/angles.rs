//! Right ascension and declination angles.
//!
//! Thin wrappers around `f64` degrees that carry the sky-coordinate
//! conventions: right ascension wraps to `[0°, 360°[` and formats as
//! HMS, declination is bounded to `[-90°, 90°]` and formats as DMS.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{Result, VimsError};

fn re_hms() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+)[h\s:](\d+)[m\s:](\d+\.\d+|\d+)s?").expect("valid HMS regex")
    })
}

fn re_dms() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[+-]?(\d+)[d\s:°º](\d+)[m\s:'′](\d+\.\d+|\d+)[s'\x22″]?'?")
            .expect("valid DMS regex")
    })
}

/// Whole part of a value, after rounding away sub-nanodegree noise.
fn rint(value: f64) -> i64 {
    let scale = 1e9;
    ((value * scale).round() / scale).trunc() as i64
}

// ---------------------------------------------------------------------------
// Right ascension
// ---------------------------------------------------------------------------

/// Right ascension angle, degrees in `[0°, 360°[`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RightAscension(f64);

impl RightAscension {
    /// New right ascension from degrees (wrapped modulo 360°).
    pub fn new(deg: f64) -> Self {
        RightAscension(deg.rem_euclid(360.0))
    }

    /// Parse an HMS string (`12h34m56.789s`, `12:34:56`, `12 34 56`)
    /// into degrees.
    pub fn parse(hms: &str) -> Result<f64> {
        let caps = re_hms()
            .captures(hms)
            .ok_or_else(|| VimsError::InvalidAngle(format!("invalid HMS string `{hms}`")))?;
        let h: f64 = caps[1].parse().unwrap_or(0.0);
        let m: f64 = caps[2].parse().unwrap_or(0.0);
        let s: f64 = caps[3].parse().unwrap_or(0.0);
        let deg = (h + m / 60.0 + s / 3600.0) / 24.0 * 360.0;
        Ok((deg * 1e9).round() / 1e9)
    }

    /// Angle in degrees.
    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Angle in decimal hours.
    pub fn hours(&self) -> f64 {
        self.0 / 360.0 * 24.0
    }

    /// Whole hours part.
    pub fn h(&self) -> i64 {
        rint(self.hours())
    }

    /// Decimal minutes past the whole hour.
    pub fn minutes(&self) -> f64 {
        (self.hours() - self.h() as f64) * 60.0
    }

    /// Whole minutes part.
    pub fn m(&self) -> i64 {
        rint(self.minutes())
    }

    /// Decimal seconds past the whole minute.
    pub fn seconds(&self) -> f64 {
        (self.hours() - self.h() as f64 - self.m() as f64 / 60.0) * 3600.0
    }

    /// Angle in radians.
    pub fn radians(&self) -> f64 {
        self.0.to_radians()
    }

    /// Cosine of the angle.
    pub fn cos(&self) -> f64 {
        self.radians().cos()
    }

    /// Sine of the angle.
    pub fn sin(&self) -> f64 {
        self.radians().sin()
    }
}

impl fmt::Display for RightAscension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}h{:02}m{:.3}s", self.h(), self.m(), self.seconds())
    }
}

impl FromStr for RightAscension {
    type Err = VimsError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(RightAscension::new(Self::parse(s)?))
    }
}

impl From<f64> for RightAscension {
    fn from(deg: f64) -> Self {
        RightAscension::new(deg)
    }
}

impl std::ops::Add<f64> for RightAscension {
    type Output = RightAscension;

    fn add(self, rhs: f64) -> RightAscension {
        RightAscension::new(self.0 + rhs)
    }
}

impl std::ops::Sub<f64> for RightAscension {
    type Output = RightAscension;

    fn sub(self, rhs: f64) -> RightAscension {
        RightAscension::new(self.0 - rhs)
    }
}

// ---------------------------------------------------------------------------
// Declination
// ---------------------------------------------------------------------------

/// Declination angle, degrees in `[-90°, 90°]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Declination(f64);

impl Declination {
    /// New declination from degrees.
    ///
    /// Errors if the value is outside `[-90°, 90°]`.
    pub fn new(deg: f64) -> Result<Self> {
        if deg > 90.0 {
            return Err(VimsError::InvalidAngle(format!(
                "declination must be lower than 90°: `{deg}`"
            )));
        }
        if deg < -90.0 {
            return Err(VimsError::InvalidAngle(format!(
                "declination must be larger than -90°: `{deg}`"
            )));
        }
        Ok(Declination(deg))
    }

    /// Parse a DMS string (`12d34m56s`, `-12:34:56`, `12°34′56″`)
    /// into degrees.
    pub fn parse(dms: &str) -> Result<f64> {
        let caps = re_dms()
            .captures(dms)
            .ok_or_else(|| VimsError::InvalidAngle(format!("invalid DMS string `{dms}`")))?;
        let d: f64 = caps[1].parse().unwrap_or(0.0);
        let m: f64 = caps[2].parse().unwrap_or(0.0);
        let s: f64 = caps[3].parse().unwrap_or(0.0);
        let mut deg = d + m / 60.0 + s / 3600.0;
        if dms.starts_with('-') {
            deg = -deg;
        }
        Ok((deg * 1e9).round() / 1e9)
    }

    /// Signed angle in degrees.
    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Sign prefix for formatting.
    pub fn sign(&self) -> char {
        if self.0 >= 0.0 {
            '+'
        } else {
            '-'
        }
    }

    /// Whole (absolute) degrees part.
    pub fn d(&self) -> i64 {
        rint(self.0.abs())
    }

    /// Decimal minutes past the whole degree.
    pub fn minutes(&self) -> f64 {
        (self.0.abs() - self.d() as f64).abs() * 60.0
    }

    /// Whole minutes part.
    pub fn m(&self) -> i64 {
        rint(self.minutes())
    }

    /// Decimal seconds past the whole minute.
    pub fn seconds(&self) -> f64 {
        (self.0.abs() - self.d() as f64 - self.m() as f64 / 60.0).abs() * 3600.0
    }

    /// Angle in radians.
    pub fn radians(&self) -> f64 {
        self.0.to_radians()
    }

    /// Cosine of the angle.
    pub fn cos(&self) -> f64 {
        self.radians().cos()
    }

    /// Sine of the angle.
    pub fn sin(&self) -> f64 {
        self.radians().sin()
    }
}

impl fmt::Display for Declination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}°{:02}′{:.3}″",
            self.sign(),
            self.d(),
            self.m(),
            self.seconds()
        )
    }
}

impl FromStr for Declination {
    type Err = VimsError;

    fn from_str(s: &str) -> Result<Self> {
        Declination::new(Self::parse(s)?)
    }
}
