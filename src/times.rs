//! PDS time parsing.
//!
//! The Cassini archive spells times in several ways: ISO
//! (`2005-02-14T18:02:29.123`), day-of-year (`2005-045T18:02:29`),
//! civil dates (`May 17, 2007`) and compact folder names
//! (`2005015T175855`). Each parser extracts every timestamp found in
//! the input, so range strings (`… 2010-274T00:00:00 through
//! 2010-365T23:59:59`) yield two entries.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::errors::{Result, VimsError};

fn re_iso() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{4})-(\d{2})-(\d{2})[T:\s]?(\d{2})?:?(\d{2})?:?(\d{2})?\.?(\d{1,6})?")
            .expect("valid ISO regex")
    })
}

fn re_doy() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{4})-(\d{3})[T:\s]?(\d{2})?:?(\d{2})?:?(\d{2})?\.?(\d{1,6})?")
            .expect("valid DOY regex")
    })
}

fn re_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(through|to)?\s?([A-Z][a-z]{2})[a-z]*\s(\d+),\s(\d{4})")
            .expect("valid date regex")
    })
}

fn re_folder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{4})(\d{3})T(\d{2})(\d{2})(\d{2})").expect("valid folder regex")
    })
}

/// Microseconds encoded by a fractional-second capture (`123` -> 123 ms).
fn frac_micro(frac: Option<regex::Match<'_>>) -> u32 {
    match frac {
        None => 0,
        Some(m) => {
            let digits = m.as_str();
            let value: f64 = format!("0.{digits}").parse().unwrap_or(0.0);
            (1e6 * value).round() as u32
        }
    }
}

fn opt_u32(m: Option<regex::Match<'_>>) -> u32 {
    m.and_then(|v| v.as_str().parse().ok()).unwrap_or(0)
}

/// Parse every ISO time pattern found in the input.
pub fn dt_iso(time: &str) -> Result<Vec<NaiveDateTime>> {
    let mut out = Vec::new();
    for caps in re_iso().captures_iter(time) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| VimsError::InvalidTime(time.into()))?;
        let t = date
            .and_hms_micro_opt(
                opt_u32(caps.get(4)),
                opt_u32(caps.get(5)),
                opt_u32(caps.get(6)),
                frac_micro(caps.get(7)),
            )
            .ok_or_else(|| VimsError::InvalidTime(time.into()))?;
        out.push(t);
    }
    if out.is_empty() {
        return Err(VimsError::InvalidTime(time.into()));
    }
    Ok(out)
}

/// Parse every day-of-year time pattern found in the input.
pub fn dt_doy(time: &str) -> Result<Vec<NaiveDateTime>> {
    let mut out = Vec::new();
    for caps in re_doy().captures_iter(time) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let doy: u32 = caps[2].parse().unwrap_or(0);
        let date = NaiveDate::from_yo_opt(year, doy)
            .ok_or_else(|| VimsError::InvalidTime(time.into()))?;
        let t = date
            .and_hms_micro_opt(
                opt_u32(caps.get(3)),
                opt_u32(caps.get(4)),
                opt_u32(caps.get(5)),
                frac_micro(caps.get(6)),
            )
            .ok_or_else(|| VimsError::InvalidTime(time.into()))?;
        out.push(t);
    }
    if out.is_empty() {
        return Err(VimsError::InvalidTime(time.into()));
    }
    Ok(out)
}

fn month_number(abbr: &str) -> Option<u32> {
    Some(match abbr {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    })
}

/// Parse every civil date pattern (`Feb 14, 2005`) found in the input.
///
/// A date prefixed by `to` or `through` (or when `eod` is set) is
/// promoted to the end of its day (`23:59:59`).
pub fn dt_date(time: &str, eod: bool) -> Result<Vec<NaiveDateTime>> {
    let mut out = Vec::new();
    for caps in re_date().captures_iter(time) {
        let month = month_number(&caps[2])
            .ok_or_else(|| VimsError::InvalidTime(time.into()))?;
        let day: u32 = caps[3].parse().unwrap_or(0);
        let year: i32 = caps[4].parse().unwrap_or(0);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| VimsError::InvalidTime(time.into()))?;
        let end = eod || caps.get(1).is_some();
        let t = if end {
            date.and_hms_opt(23, 59, 59)
        } else {
            date.and_hms_opt(0, 0, 0)
        }
        .ok_or_else(|| VimsError::InvalidTime(time.into()))?;
        out.push(t);
    }
    if out.is_empty() {
        return Err(VimsError::InvalidTime(time.into()));
    }
    Ok(out)
}

/// Parse a PDS time string, trying ISO, then day-of-year, then civil
/// dates, then compact folder names.
pub fn pds_time(time: &str) -> Result<Vec<NaiveDateTime>> {
    dt_iso(time)
        .or_else(|_| dt_doy(time))
        .or_else(|_| dt_date(time, false))
        .or_else(|_| dt_doy(&pds_folder(time)?))
        .map_err(|_| VimsError::InvalidTime(time.into()))
}

/// Re-format compact PDS folder names (`2005015T175855[_2005016T184233]`)
/// as day-of-year times joined by a space.
pub fn pds_folder(name: &str) -> Result<String> {
    let parts: Vec<String> = re_folder()
        .captures_iter(name)
        .map(|caps| {
            format!(
                "{}-{}T{}:{}:{}",
                &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
            )
        })
        .collect();
    if parts.is_empty() {
        return Err(VimsError::InvalidTime(name.into()));
    }
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn iso() {
        assert_eq!(
            dt_iso("2005-02-14T18:02:29.123").unwrap(),
            vec![NaiveDate::from_ymd_opt(2005, 2, 14)
                .unwrap()
                .and_hms_milli_opt(18, 2, 29, 123)
                .unwrap()]
        );
        assert_eq!(
            dt_iso("2005-02-14 18:02:29").unwrap(),
            vec![ymd_hms(2005, 2, 14, 18, 2, 29)]
        );
        assert_eq!(
            dt_iso("2005-02-14:18:02").unwrap(),
            vec![ymd_hms(2005, 2, 14, 18, 2, 0)]
        );
        assert_eq!(
            dt_iso("2005-02-14").unwrap(),
            vec![ymd_hms(2005, 2, 14, 0, 0, 0)]
        );

        let times = dt_iso("from 2005-02-14T18:02:29 to 2005-02-14T18:03").unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(times[0], ymd_hms(2005, 2, 14, 18, 2, 29));
        assert_eq!(times[1], ymd_hms(2005, 2, 14, 18, 3, 0));

        assert!(dt_iso("2005-045").is_err());
    }

    #[test]
    fn doy() {
        assert_eq!(
            dt_doy("2005-045T18:02:29.123").unwrap(),
            vec![NaiveDate::from_ymd_opt(2005, 2, 14)
                .unwrap()
                .and_hms_milli_opt(18, 2, 29, 123)
                .unwrap()]
        );
        assert_eq!(
            dt_doy("2005-045 18:02:29").unwrap(),
            vec![ymd_hms(2005, 2, 14, 18, 2, 29)]
        );
        assert_eq!(
            dt_doy("2005-045:18:02").unwrap(),
            vec![ymd_hms(2005, 2, 14, 18, 2, 0)]
        );
        assert_eq!(
            dt_doy("2005-045").unwrap(),
            vec![ymd_hms(2005, 2, 14, 0, 0, 0)]
        );

        let times = dt_doy("from 2005-045T18:02:29 to 2005-045T18:03").unwrap();
        assert_eq!(times.len(), 2);

        assert!(dt_doy("2005-02-14").is_err());
    }

    #[test]
    fn date() {
        assert_eq!(
            dt_date("Feb 14, 2005", false).unwrap(),
            vec![ymd_hms(2005, 2, 14, 0, 0, 0)]
        );
        assert_eq!(
            dt_date("Febr 14, 2005", false).unwrap(),
            vec![ymd_hms(2005, 2, 14, 0, 0, 0)]
        );
        assert_eq!(
            dt_date("Feb 14, 2005", true).unwrap(),
            vec![ymd_hms(2005, 2, 14, 23, 59, 59)]
        );
        assert_eq!(
            dt_date("to Feb 14, 2005", false).unwrap(),
            vec![ymd_hms(2005, 2, 14, 23, 59, 59)]
        );

        let times = dt_date("from Feb 14, 2005 through March 12, 2006", false).unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(times[0], ymd_hms(2005, 2, 14, 0, 0, 0));
        assert_eq!(times[1], ymd_hms(2006, 3, 12, 23, 59, 59));

        assert!(dt_date("2005-02-14", false).is_err());
    }

    #[test]
    fn pds() {
        assert_eq!(
            pds_time("May 17, 2007").unwrap(),
            vec![ymd_hms(2007, 5, 17, 0, 0, 0)]
        );
        assert_eq!(
            pds_time("2010-274T00:00:00").unwrap(),
            vec![ymd_hms(2010, 10, 1, 0, 0, 0)]
        );
        assert_eq!(
            pds_time("2011-10-01T00:02:04.244").unwrap(),
            vec![NaiveDate::from_ymd_opt(2011, 10, 1)
                .unwrap()
                .and_hms_milli_opt(0, 2, 4, 244)
                .unwrap()]
        );

        let times = pds_time("… May 17, 2007 through Jun 30, 2007").unwrap();
        assert_eq!(times[0], ymd_hms(2007, 5, 17, 0, 0, 0));
        assert_eq!(times[1], ymd_hms(2007, 6, 30, 23, 59, 59));

        let times = pds_time("… 2010-274T00:00:00 through 2010-365T23:59:59").unwrap();
        assert_eq!(times[0], ymd_hms(2010, 10, 1, 0, 0, 0));
        assert_eq!(times[1], ymd_hms(2010, 12, 31, 23, 59, 59));

        let times = pds_time("2005015T175855_2005016T184233/").unwrap();
        assert_eq!(times[0], ymd_hms(2005, 1, 15, 17, 58, 55));
        assert_eq!(times[1], ymd_hms(2005, 1, 16, 18, 42, 33));

        assert!(pds_time("No data available").is_err());
    }

    #[test]
    fn folder() {
        assert_eq!(pds_folder("2005015T175855").unwrap(), "2005-015T17:58:55");
        assert_eq!(
            pds_folder("2005015T175855_2005016T184233/").unwrap(),
            "2005-015T17:58:55 2005-016T18:42:33"
        );
    }
}
