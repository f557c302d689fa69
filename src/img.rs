//! Band plane rendering.
//!
//! Turns a NaN-masked band plane into an 8-bit grayscale or
//! colormapped PNG with a percentile contrast stretch (invalid pixels
//! render transparent).

use std::path::Path;

use image::{GrayImage, Rgba, RgbaImage};
use log::debug;

use crate::color::Colormap;
use crate::errors::{Result, VimsError};
use crate::wvlns::percentile;

/// Default lower stretch percentile.
pub const STRETCH_P_MIN: f64 = 0.5;

/// Default upper stretch percentile.
pub const STRETCH_P_MAX: f64 = 99.5;

/// Contrast bounds of a plane: (`p_min`, `p_max`) percentiles of the
/// finite values.
pub fn stretch(plane: &[f64], p_min: f64, p_max: f64) -> (f64, f64) {
    let finite: Vec<f64> = plane.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return (0.0, 1.0);
    }
    let lo = percentile(&finite, p_min);
    let hi = percentile(&finite, p_max);
    if hi > lo {
        (lo, hi)
    } else {
        (lo, lo + 1.0)
    }
}

fn normalize(value: f64, lo: f64, hi: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    Some(((value - lo) / (hi - lo)).clamp(0.0, 1.0))
}

fn check_shape(plane: &[f64], width: usize, height: usize) -> Result<()> {
    if plane.len() != width * height {
        return Err(VimsError::InvalidGeometry(format!(
            "plane has {} values for a {width} x {height} image",
            plane.len()
        )));
    }
    Ok(())
}

/// Render a row-major plane as 8-bit grayscale (invalid pixels black).
pub fn to_gray(plane: &[f64], width: usize, height: usize) -> Result<GrayImage> {
    check_shape(plane, width, height)?;
    let (lo, hi) = stretch(plane, STRETCH_P_MIN, STRETCH_P_MAX);

    Ok(GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let v = plane[y as usize * width + x as usize];
        let level = normalize(v, lo, hi)
            .map(|n| (n * 255.0).round() as u8)
            .unwrap_or(0);
        image::Luma([level])
    }))
}

/// Render a row-major plane through a colormap (invalid pixels
/// transparent).
pub fn to_rgba(
    plane: &[f64],
    width: usize,
    height: usize,
    cmap: &Colormap,
) -> Result<RgbaImage> {
    check_shape(plane, width, height)?;
    let (lo, hi) = stretch(plane, STRETCH_P_MIN, STRETCH_P_MAX);

    Ok(RgbaImage::from_fn(width as u32, height as u32, |x, y| {
        let v = plane[y as usize * width + x as usize];
        match normalize(v, lo, hi) {
            Some(n) => {
                let [r, g, b] = cmap.color_for(n);
                Rgba([r, g, b, 255])
            }
            None => Rgba([0, 0, 0, 0]),
        }
    }))
}

/// Save a plane as a grayscale PNG.
pub fn save_gray(plane: &[f64], width: usize, height: usize, path: &Path) -> Result<()> {
    debug!("saving {} x {} grayscale plane to {}", width, height, path.display());
    to_gray(plane, width, height)?
        .save(path)
        .map_err(|e| VimsError::Io(std::io::Error::other(e)))
}

/// Save a plane as a colormapped PNG.
pub fn save_rgba(
    plane: &[f64],
    width: usize,
    height: usize,
    cmap: &Colormap,
    path: &Path,
) -> Result<()> {
    debug!("saving {} x {} colormapped plane to {}", width, height, path.display());
    to_rgba(plane, width, height, cmap)?
        .save(path)
        .map_err(|e| VimsError::Io(std::io::Error::other(e)))
}
