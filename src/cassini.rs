//! Cassini image IDs and spacecraft clock conversions.
//!
//! VIMS products are named after the spacecraft clock count at
//! acquisition (`v1487096932_1.qub`, `C1487096932_1_ir.cub`). The
//! clock drifts slowly against UTC; conversions interpolate in a
//! per-year anchor table extracted from the mission kernels
//! (`naif0012.tls`, `cas00171.tsc`).

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::errors::{Result, VimsError};
use crate::interp::linear_clamped;
use crate::times::pds_time;

/// Yearly (UTC timestamp, spacecraft clock) anchors, 1999-2018.
const SCLK_ANCHORS: [(f64, f64); 20] = [
    (915_148_800.0, 1_293_840_277.05),
    (946_684_800.0, 1_325_376_485.089),
    (978_307_200.0, 1_356_999_098.185),
    (1_009_843_200.0, 1_388_535_319.111),
    (1_041_379_200.0, 1_420_071_542.054),
    (1_072_915_200.0, 1_451_607_752.163),
    (1_104_537_600.0, 1_483_230_358.172),
    (1_136_073_600.0, 1_514_766_561.229),
    (1_167_609_600.0, 1_546_302_762.211),
    (1_199_145_600.0, 1_577_838_967.232),
    (1_230_768_000.0, 1_609_461_592.044),
    (1_262_304_000.0, 1_640_997_816.03),
    (1_293_840_000.0, 1_672_534_037.122),
    (1_325_376_000.0, 1_704_070_236.234),
    (1_356_998_400.0, 1_735_692_838.148),
    (1_388_534_400.0, 1_767_229_038.233),
    (1_420_070_400.0, 1_798_765_239.134),
    (1_451_606_400.0, 1_830_301_441.106),
    (1_483_228_800.0, 1_861_924_044.223),
    (1_514_764_800.0, 1_893_460_247.199),
];

fn anchors() -> (&'static [f64], &'static [f64]) {
    static COLS: OnceLock<(Vec<f64>, Vec<f64>)> = OnceLock::new();
    let (ts, sclk) = COLS.get_or_init(|| {
        (
            SCLK_ANCHORS.iter().map(|a| a.0).collect(),
            SCLK_ANCHORS.iter().map(|a| a.1).collect(),
        )
    });
    (ts, sclk)
}

fn re_img_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{10}_\d+(?:_\d+)?").expect("valid image ID regex"))
}

fn re_sclk() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{10})(\.\d+)?").expect("valid clock regex"))
}

/// Extract the Cassini image ID from a file name.
///
/// ```
/// # use rusty_vims::cassini::img_id;
/// assert_eq!(img_id("C1487096932_1_ir.cub").unwrap(), "1487096932_1");
/// assert_eq!(img_id("v1487096932_1_001.qub").unwrap(), "1487096932_1_001");
/// ```
pub fn img_id(fname: &str) -> Result<String> {
    re_img_id()
        .find(fname)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| VimsError::InvalidImgId(fname.into()))
}

/// Extract the spacecraft clock count from an ID, file name or number.
pub fn cassini_time(time: &str) -> Result<f64> {
    let caps = re_sclk()
        .captures(time)
        .ok_or_else(|| VimsError::InvalidTime(time.into()))?;
    let whole = &caps[1];
    let frac = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    format!("{whole}{frac}")
        .parse()
        .map_err(|_| VimsError::InvalidTime(time.into()))
}

/// Convert a spacecraft clock count to UTC (rounded to the second).
pub fn sclk2utc(sclk: f64) -> DateTime<Utc> {
    let (ts, clocks) = anchors();
    let timestamp = linear_clamped(sclk, clocks, ts);
    DateTime::from_timestamp(timestamp.round() as i64, 0)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).expect("epoch"))
}

/// Convert a Cassini time (ID, file name or clock string) to UTC.
pub fn cassini2utc(time: &str) -> Result<DateTime<Utc>> {
    Ok(sclk2utc(cassini_time(time)?))
}

/// Convert a UTC time string to spacecraft clock counts (one per
/// timestamp found in the input).
pub fn utc2cassini(time: &str) -> Result<Vec<f64>> {
    let (ts, clocks) = anchors();
    Ok(pds_time(time)?
        .iter()
        .map(|t| {
            let micros = t.and_utc().timestamp_micros() as f64;
            linear_clamped(micros * 1e-6, ts, clocks)
        })
        .collect())
}
