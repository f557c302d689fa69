//! VIMS wavelength calibration.
//!
//! Channel/wavelength tables ship with the crate:
//! `data/wvlns_std.csv` holds the 352 standard channel wavelengths and
//! full-widths at half maximum (channels 1-96 are VIS, 97-352 are IR),
//! `data/wvlns_ir_shift.csv` the time-dependent IR wavelength shift
//! (nm per fractional year). The FWHM is invariant with time and no
//! shift is known for the visible channels.

use std::sync::OnceLock;

use crate::errors::{Result, VimsError};
use crate::interp::linear_nan;

const WVLNS_CSV: &str = include_str!("../data/wvlns_std.csv");
const SHIFT_CSV: &str = include_str!("../data/wvlns_ir_shift.csv");

/// Number of VIMS channels (VIS + IR).
pub const N_CHANNELS: usize = 352;

/// Number of VIS channels (1..=96).
pub const N_VIS: usize = 96;

/// Number of IR channels (97..=352).
pub const N_IR: usize = 256;

/// Default hot-pixel detection threshold factor.
pub const HOT_PIXEL_TOL: f64 = 2.0;

/// Default hot-pixel detection percentile.
pub const HOT_PIXEL_FRAC: f64 = 95.0;

struct WavelengthTable {
    channels: Vec<f64>,
    wvlns: Vec<f64>,
    fwhms: Vec<f64>,
    comments: Vec<String>,
}

struct ShiftTable {
    years: Vec<f64>,
    shifts: Vec<f64>,
}

fn table() -> &'static WavelengthTable {
    static TABLE: OnceLock<WavelengthTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut reader = csv::Reader::from_reader(WVLNS_CSV.as_bytes());
        let mut t = WavelengthTable {
            channels: Vec::with_capacity(N_CHANNELS),
            wvlns: Vec::with_capacity(N_CHANNELS),
            fwhms: Vec::with_capacity(N_CHANNELS),
            comments: Vec::with_capacity(N_CHANNELS),
        };
        for record in reader.records() {
            let record = record.expect("embedded wavelength table is valid");
            t.channels.push(record[0].parse().expect("channel"));
            t.wvlns.push(record[1].parse().expect("wavelength"));
            t.fwhms.push(record[2].parse().expect("fwhm"));
            t.comments
                .push(record.get(3).unwrap_or("").trim().to_string());
        }
        assert_eq!(t.channels.len(), N_CHANNELS);
        t
    })
}

fn shift_table() -> &'static ShiftTable {
    static TABLE: OnceLock<ShiftTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut reader = csv::Reader::from_reader(SHIFT_CSV.as_bytes());
        let mut t = ShiftTable {
            years: Vec::new(),
            shifts: Vec::new(),
        };
        for record in reader.records() {
            let record = record.expect("embedded shift table is valid");
            t.years.push(record[0].parse().expect("year"));
            t.shifts.push(record[1].parse().expect("shift"));
        }
        t
    })
}

// ---------------------------------------------------------------------------
// Channel -> wavelength lookups
// ---------------------------------------------------------------------------

/// All channel numbers (1..=352).
pub fn channels() -> &'static [f64] {
    &table().channels
}

/// VIS standard wavelengths [um] (channels 1..=96).
pub fn vis_wavelengths() -> &'static [f64] {
    &table().wvlns[..N_VIS]
}

/// IR standard wavelengths [um] (channels 97..=352).
pub fn ir_wavelengths() -> &'static [f64] {
    &table().wvlns[N_VIS..]
}

/// VIS full-widths at half maximum [um].
pub fn vis_fwhms() -> &'static [f64] {
    &table().fwhms[..N_VIS]
}

/// IR full-widths at half maximum [um].
pub fn ir_fwhms() -> &'static [f64] {
    &table().fwhms[N_VIS..]
}

/// VIS wavelength [um] at a (possibly fractional) band, NaN outside
/// channels 1..=96.
pub fn vis_wavelength(band: f64) -> f64 {
    let t = table();
    linear_nan(band, &t.channels[..N_VIS], &t.wvlns[..N_VIS])
}

/// VIS full-width at half maximum [um] at a band, NaN outside 1..=96.
pub fn vis_fwhm(band: f64) -> f64 {
    let t = table();
    linear_nan(band, &t.channels[..N_VIS], &t.fwhms[..N_VIS])
}

/// IR standard wavelength [um] at a (possibly fractional) band, NaN
/// outside channels 97..=352.
pub fn ir_wavelength(band: f64) -> f64 {
    let t = table();
    linear_nan(band, &t.channels[N_VIS..], &t.wvlns[N_VIS..])
}

/// IR wavelength [um] at a band, corrected for the time shift at the
/// given fractional year.
pub fn ir_wavelength_at(band: f64, year: f64) -> f64 {
    ir_wavelength(band) + 1e-3 * ir_shift(year)
}

/// IR full-width at half maximum [um] at a band, NaN outside 97..=352.
///
/// The FWHM is considered invariant with time.
pub fn ir_fwhm(band: f64) -> f64 {
    let t = table();
    linear_nan(band, &t.channels[N_VIS..], &t.fwhms[N_VIS..])
}

/// IR wavelength shift [nm] at a fractional year, NaN outside the
/// table coverage.
pub fn ir_shift(year: f64) -> f64 {
    let t = shift_table();
    linear_nan(year, &t.years, &t.shifts)
}

/// Wavenumber [cm-1] of a wavelength [um].
pub fn wavenumber(wvln: f64) -> f64 {
    1e4 / wvln
}

/// Full-width at half maximum in wavenumber [cm-1].
pub fn fwhm_wavenumber(wvln: f64, fwhm: f64) -> f64 {
    1e4 / (wvln - fwhm / 2.0) - 1e4 / (wvln + fwhm / 2.0)
}

/// Contiguous bad IR pixel ranges as (start wavelength, width) [um].
///
/// Channels flagged in the standard table are grouped when closer
/// than 1.5 channels; the range starts half a FWHM below the first
/// flagged wavelength and spans the summed FWHMs.
pub fn bad_ir_pixels() -> Vec<(f64, f64)> {
    let t = table();
    let mut groups: Vec<(f64, f64)> = Vec::new();
    let mut last_channel = f64::NEG_INFINITY;
    for i in N_VIS..N_CHANNELS {
        if t.comments[i].is_empty() {
            continue;
        }
        let (channel, wvln, fwhm) = (t.channels[i], t.wvlns[i], t.fwhms[i]);
        if channel - last_channel > 1.5 {
            groups.push((wvln - 0.5 * fwhm, fwhm));
        } else if let Some(last) = groups.last_mut() {
            last.1 += fwhm;
        }
        last_channel = channel;
    }
    groups
}

// ---------------------------------------------------------------------------
// Spectral helpers
// ---------------------------------------------------------------------------

/// Median of a slice (mean of the two middle values for even lengths).
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}

/// Moving median filter with a window of `width` samples.
///
/// The window is centered (biased right for even widths) and clamped
/// at the edges of the signal.
pub fn moving_median(signal: &[f64], width: usize) -> Vec<f64> {
    let n = signal.len();
    let lo = (width.max(1) - 1) / 2;
    let hi = width.max(1) / 2;
    (0..n)
        .map(|i| {
            let start = i.saturating_sub(lo);
            let stop = (i + hi + 1).min(n);
            let mut window = signal[start..stop].to_vec();
            median(&mut window)
        })
        .collect()
}

/// Percentile of a slice (linear interpolation between samples).
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Flag hot pixels: samples larger than `tol` times the `frac`
/// percentile of the signal.
pub fn is_hot_pixel(signal: &[f64], tol: f64, frac: f64) -> Vec<bool> {
    let threshold = tol * percentile(signal, frac);
    signal.iter().map(|&v| v > threshold).collect()
}

/// IR channel numbers of the hot pixels in a background spectrum.
///
/// The spectrum covers either all 352 channels or the 256 IR channels.
pub fn ir_hot_pixels(spectrum: &[f64]) -> Result<Vec<u32>> {
    let ir = ir_part(spectrum)?;
    Ok(is_hot_pixel(ir, HOT_PIXEL_TOL, HOT_PIXEL_FRAC)
        .iter()
        .enumerate()
        .filter(|(_, &hot)| hot)
        .map(|(i, _)| (N_VIS + 1 + i) as u32)
        .collect())
}

/// IR hot pixels from a stack of background spectra (median combined).
pub fn ir_hot_pixels_median(spectra: &[Vec<f64>]) -> Result<Vec<u32>> {
    ir_hot_pixels(&median_spectrum(spectra)?)
}

fn ir_part(spectrum: &[f64]) -> Result<&[f64]> {
    match spectrum.len() {
        N_CHANNELS => Ok(&spectrum[N_VIS..]),
        N_IR => Ok(spectrum),
        n => Err(VimsError::InvalidSpectra(format!(
            "expected {N_CHANNELS} or {N_IR} channels, got {n}"
        ))),
    }
}

/// Split an IR spectrum between the two IR multiplexers
/// (odd channels 97, 99, … 351 and even channels 98, 100, … 352).
pub fn ir_multiplexer(spectrum: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let ir = ir_part(spectrum)?;
    let mux_1 = ir.iter().step_by(2).copied().collect();
    let mux_2 = ir.iter().skip(1).step_by(2).copied().collect();
    Ok((mux_1, mux_2))
}

/// Locate the spatial (sample / line) axes of a spectra array shape.
///
/// The band axis is recognized by its 352 or 256 length; every other
/// axis is spatial.
pub fn sample_line_axes(shape: &[usize]) -> Result<Vec<usize>> {
    if shape.len() < 2 {
        return Err(VimsError::InvalidSpectra(format!(
            "expected at least 2 axes, got shape {shape:?}"
        )));
    }
    let band = shape
        .iter()
        .position(|&n| n == N_CHANNELS || n == N_IR)
        .ok_or_else(|| {
            VimsError::InvalidSpectra(format!("no band axis in shape {shape:?}"))
        })?;
    Ok((0..shape.len()).filter(|&i| i != band).collect())
}

/// Median spectrum of a stack of spectra.
///
/// Accepts rows-of-spectra (inner length 352/256) or the transposed
/// layout (outer length 352/256).
pub fn median_spectrum(spectra: &[Vec<f64>]) -> Result<Vec<f64>> {
    if spectra.is_empty() {
        return Err(VimsError::InvalidSpectra("empty spectra stack".into()));
    }
    let inner = spectra[0].len();
    if inner == N_CHANNELS || inner == N_IR {
        // Band axis inside: median across rows, channel by channel.
        Ok((0..inner)
            .map(|b| {
                let mut column: Vec<f64> = spectra.iter().map(|row| row[b]).collect();
                median(&mut column)
            })
            .collect())
    } else if spectra.len() == N_CHANNELS || spectra.len() == N_IR {
        // Band axis outside: median within each row.
        Ok(spectra
            .iter()
            .map(|row| median(&mut row.clone()))
            .collect())
    } else {
        Err(VimsError::InvalidSpectra(format!(
            "no band axis in a {} x {} stack",
            spectra.len(),
            inner
        )))
    }
}
