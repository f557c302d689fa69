//! ISIS3 cube reader.
//!
//! ISIS cubes start with an `Object = IsisCube` PVL label. The core is
//! either band-sequential or tiled (`TileSamples` x `TileLines` tiles,
//! padded at the right/bottom edges), stored as bytes, signed words or
//! IEEE floats with a linear `Base` / `Multiplier` scaling. Special
//! pixel values decode to NaN.

use std::path::{Path, PathBuf};

use log::debug;

use crate::cube::pvl::{Block, Label};
use crate::errors::{Result, VimsError};
use crate::times;

const ISIS_MAGIC: &[u8] = b"Object = IsisCube";

/// ISIS core pixel storage types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    UnsignedByte,
    SignedWord,
    Real,
}

impl PixelType {
    fn from_label(name: &str) -> Result<PixelType> {
        match name {
            "UnsignedByte" => Ok(PixelType::UnsignedByte),
            "SignedWord" => Ok(PixelType::SignedWord),
            "Real" => Ok(PixelType::Real),
            other => Err(VimsError::UnsupportedLayout(format!(
                "unsupported pixel type `{other}`"
            ))),
        }
    }

    /// Pixel size in bytes.
    pub fn size(&self) -> usize {
        match self {
            PixelType::UnsignedByte => 1,
            PixelType::SignedWord => 2,
            PixelType::Real => 4,
        }
    }
}

/// Core byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Lsb,
    Msb,
}

impl ByteOrder {
    fn from_label(name: &str) -> Result<ByteOrder> {
        match name {
            "Lsb" => Ok(ByteOrder::Lsb),
            "Msb" => Ok(ByteOrder::Msb),
            other => Err(VimsError::UnsupportedLayout(format!(
                "unsupported byte order `{other}`"
            ))),
        }
    }
}

/// An ISIS3 cube with its decoded core.
#[derive(Debug)]
pub struct IsisCube {
    path: PathBuf,
    label: Label,
    ns: usize,
    nl: usize,
    nb: usize,
    pixel_type: PixelType,
    /// Scaled core in (band, line, sample) order, specials as NaN.
    data: Vec<f64>,
}

impl IsisCube {
    /// Open and decode an ISIS cube file.
    pub fn open(path: &Path) -> Result<IsisCube> {
        let bytes = std::fs::read(path)?;
        if bytes.len() < ISIS_MAGIC.len() || &bytes[..ISIS_MAGIC.len()] != ISIS_MAGIC {
            return Err(VimsError::NotIsis(path.to_path_buf()));
        }

        let text = String::from_utf8_lossy(&bytes);
        let label = Label::parse(&text)?;

        let core = label
            .block_path(&["IsisCube", "Core"])
            .ok_or_else(|| VimsError::NotIsis(path.to_path_buf()))?;

        let dim = core
            .block("Dimensions")
            .ok_or_else(|| VimsError::MissingKey("Dimensions".into()))?;
        let ns = dim.int("Samples")? as usize;
        let nl = dim.int("Lines")? as usize;
        let nb = dim.int("Bands")? as usize;

        let pixels = core
            .block("Pixels")
            .ok_or_else(|| VimsError::MissingKey("Pixels".into()))?;
        let pixel_type = PixelType::from_label(pixels.str("Type")?)?;
        let byte_order = ByteOrder::from_label(pixels.str("ByteOrder")?)?;
        let base = pixels.float("Base")?;
        let mult = pixels.float("Multiplier")?;

        let start_byte = core.int("StartByte")? as usize - 1;

        // Tile shape defaults to the full frame (band sequential).
        let tile_samples = core.int("TileSamples").unwrap_or(ns as i64) as usize;
        let tile_lines = core.int("TileLines").unwrap_or(nl as i64) as usize;

        debug!(
            "loading ISIS cube {}: {} x {} x {} ({:?}, tiles {} x {})",
            path.display(),
            ns,
            nl,
            nb,
            pixel_type,
            tile_samples,
            tile_lines
        );

        let data = decode_core(
            &bytes,
            start_byte,
            ns,
            nl,
            nb,
            tile_samples,
            tile_lines,
            pixel_type,
            byte_order,
            base,
            mult,
        )
        .ok_or_else(|| VimsError::NotIsis(path.to_path_buf()))?;

        Ok(IsisCube {
            path: path.to_path_buf(),
            label,
            ns,
            nl,
            nb,
            pixel_type,
            data,
        })
    }

    /// Source file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full parsed label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// `IsisCube` header block.
    pub fn header(&self) -> &Block {
        self.label.block("IsisCube").expect("validated at open")
    }

    /// Number of samples.
    pub fn ns(&self) -> usize {
        self.ns
    }

    /// Number of lines.
    pub fn nl(&self) -> usize {
        self.nl
    }

    /// Number of bands.
    pub fn nb(&self) -> usize {
        self.nb
    }

    /// Core pixel storage type.
    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// Cube shape (bands, lines, samples).
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nb, self.nl, self.ns)
    }

    /// Scaled value at (sample, line, band), all 1-indexed. Special
    /// pixels read as NaN.
    pub fn value(&self, sample: usize, line: usize, band: usize) -> Result<f64> {
        let s = check(sample, self.ns, "sample")?;
        let l = check(line, self.nl, "line")?;
        let b = check(band, self.nb, "band")?;
        Ok(self.data[(b * self.nl + l) * self.ns + s])
    }

    /// Band plane, row-major (NL x NS). Bands are 1-indexed.
    pub fn band_image(&self, band: usize) -> Result<&[f64]> {
        let b = check(band, self.nb, "band")?;
        let plane = self.nl * self.ns;
        Ok(&self.data[b * plane..(b + 1) * plane])
    }

    /// Pixel spectrum (NB values). Sample and line are 1-indexed.
    pub fn spectrum(&self, sample: usize, line: usize) -> Result<Vec<f64>> {
        let s = check(sample, self.ns, "sample")?;
        let l = check(line, self.nl, "line")?;
        Ok((0..self.nb)
            .map(|b| self.data[(b * self.nl + l) * self.ns + s])
            .collect())
    }

    /// Original band numbers from the `BandBin` group.
    pub fn bands(&self) -> Result<Vec<i64>> {
        self.band_bin()?.ints("OriginalBand")
    }

    /// Central wavelengths [um] from the `BandBin` group.
    pub fn wavelengths(&self) -> Result<Vec<f64>> {
        self.band_bin()?.floats("Center")
    }

    fn band_bin(&self) -> Result<&Block> {
        self.header()
            .block("BandBin")
            .ok_or_else(|| VimsError::MissingKey("BandBin".into()))
    }

    fn instrument(&self) -> Result<&Block> {
        self.header()
            .block("Instrument")
            .ok_or_else(|| VimsError::MissingKey("Instrument".into()))
    }

    /// Instrument start time (UTC).
    pub fn start(&self) -> Result<chrono::NaiveDateTime> {
        Ok(times::dt_iso(self.instrument()?.str("StartTime")?)?[0])
    }

    /// Instrument stop time (UTC).
    pub fn stop(&self) -> Result<chrono::NaiveDateTime> {
        Ok(times::dt_iso(self.instrument()?.str("StopTime")?)?[0])
    }

    /// Acquisition duration [s].
    pub fn duration(&self) -> Result<f64> {
        Ok((self.stop()? - self.start()?).num_milliseconds() as f64 * 1e-3)
    }

    /// Acquisition mid-time (UTC).
    pub fn mid_time(&self) -> Result<chrono::NaiveDateTime> {
        let start = self.start()?;
        let half = (self.stop()? - start) / 2;
        Ok(start + half)
    }

    /// Main target name.
    pub fn target_name(&self) -> Result<String> {
        Ok(self.instrument()?.str("TargetName")?.to_string())
    }

    /// Target tri-axial radii [km] from the cached NAIF keywords.
    pub fn target_radii(&self) -> Result<[f64; 3]> {
        let naif = self
            .label
            .block("NaifKeywords")
            .ok_or_else(|| VimsError::MissingKey("NaifKeywords".into()))?;
        let key = naif
            .key_names()
            .find(|k| k.contains("RADII"))
            .ok_or_else(|| VimsError::MissingKey("RADII".into()))?
            .to_string();
        let radii = naif.floats(&key)?;
        if radii.len() != 3 {
            return Err(VimsError::WrongType(key));
        }
        Ok([radii[0], radii[1], radii[2]])
    }

    /// Target mean radius [km] (geometric mean of the tri-axial radii).
    pub fn target_radius(&self) -> Result<f64> {
        let [a, b, c] = self.target_radii()?;
        Ok((a * b * c).powf(1.0 / 3.0))
    }
}

impl std::fmt::Display for IsisCube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn check(value: usize, max: usize, name: &'static str) -> Result<usize> {
    if value < 1 || value > max {
        return Err(VimsError::IndexOutOfRange {
            name,
            value: value as i64,
            max,
        });
    }
    Ok(value - 1)
}

/// Decode one stored pixel to its scaled value (NaN for specials).
fn decode_pixel(
    raw: &[u8],
    pixel_type: PixelType,
    order: ByteOrder,
    base: f64,
    mult: f64,
) -> f64 {
    match pixel_type {
        PixelType::UnsignedByte => {
            let v = raw[0];
            // 0 and 255 are the byte special values (NULL and HRS/HIS).
            if v == 0 || v == 255 {
                f64::NAN
            } else {
                v as f64 * mult + base
            }
        }
        PixelType::SignedWord => {
            let v = match order {
                ByteOrder::Lsb => i16::from_le_bytes([raw[0], raw[1]]),
                ByteOrder::Msb => i16::from_be_bytes([raw[0], raw[1]]),
            };
            // NULL = -32768, LRS/LIS/HIS/HRS fill the next four values.
            if v <= -32764 {
                f64::NAN
            } else {
                v as f64 * mult + base
            }
        }
        PixelType::Real => {
            let v = match order {
                ByteOrder::Lsb => f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
                ByteOrder::Msb => f32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            };
            // Float specials cluster at the type boundary.
            if !v.is_finite() || v.abs() >= 3.4e38 {
                f64::NAN
            } else {
                v as f64 * mult + base
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn decode_core(
    bytes: &[u8],
    start_byte: usize,
    ns: usize,
    nl: usize,
    nb: usize,
    tile_samples: usize,
    tile_lines: usize,
    pixel_type: PixelType,
    order: ByteOrder,
    base: f64,
    mult: f64,
) -> Option<Vec<f64>> {
    let px = pixel_type.size();
    let tiles_s = ns.div_ceil(tile_samples);
    let tiles_l = nl.div_ceil(tile_lines);
    let tile_px = tile_samples * tile_lines;
    let nbytes = nb * tiles_l * tiles_s * tile_px * px;
    let body = bytes.get(start_byte..start_byte + nbytes)?;

    let mut data = vec![f64::NAN; nb * nl * ns];
    let mut offset = 0;

    for b in 0..nb {
        for tl in 0..tiles_l {
            for ts in 0..tiles_s {
                for row in 0..tile_lines {
                    for col in 0..tile_samples {
                        let raw = &body[offset..offset + px];
                        offset += px;

                        let l = tl * tile_lines + row;
                        let s = ts * tile_samples + col;
                        if l < nl && s < ns {
                            data[(b * nl + l) * ns + s] =
                                decode_pixel(raw, pixel_type, order, base, mult);
                        }
                    }
                }
            }
        }
    }
    Some(data)
}
