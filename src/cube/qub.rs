//! Raw VIMS QUB reader.
//!
//! A QUB is an ASCII PVL header padded to whole records, followed by
//! the binary cube. The cube is stored in `(SAMPLE, BAND, LINE)` order:
//! each of the NL lines holds NB bands; each band holds the NS core
//! samples then the side-plane suffix sample; after the bands comes the
//! band-suffix (back-plane) block of `NS + SS` positions.
//!
//! Core DNs are big-endian integers (`SUN_INTEGER`); negative values
//! flag invalid pixels and decode to NaN.

use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::cassini::img_id;
use crate::cube::pvl::Label;
use crate::errors::{Result, VimsError};
use crate::times;

/// Environment variable pointing to the local VIMS data folder.
pub const VIMS_DATA_ENV: &str = "VIMS_DATA";

/// A decoded suffix plane (side or back plane item).
#[derive(Debug, Clone)]
pub struct SuffixPlane {
    /// Item name from the label (`BACKGROUND`, `LATITUDE`, …).
    pub name: String,
    /// Row-major values, one row per line.
    pub data: Vec<i32>,
    /// (rows, columns) of `data`.
    pub shape: (usize, usize),
}

impl SuffixPlane {
    /// One row of the plane.
    pub fn row(&self, i: usize) -> &[i32] {
        let (_, ncols) = self.shape;
        &self.data[i * ncols..(i + 1) * ncols]
    }
}

/// A raw VIMS QUB cube.
#[derive(Debug)]
pub struct Qub {
    img_id: String,
    path: PathBuf,
    label: Label,
    ns: usize,
    nl: usize,
    nb: usize,
    ss: usize,
    data: Vec<i32>,
    side_plane: Option<SuffixPlane>,
    back_planes: Vec<SuffixPlane>,
}

/// Byte decoding for one suffix/core item kind.
#[derive(Debug, Clone, Copy)]
struct ItemKind {
    bytes: usize,
    big_endian: bool,
}

impl ItemKind {
    fn new(item_type: &str, bytes: i64) -> Result<ItemKind> {
        let bytes = match bytes {
            2 => 2,
            4 => 4,
            other => {
                return Err(VimsError::UnsupportedLayout(format!(
                    "unsupported ITEM_BYTES `{other}`"
                )))
            }
        };
        Ok(ItemKind {
            bytes,
            big_endian: item_type == "SUN_INTEGER",
        })
    }

    fn decode(&self, raw: &[u8]) -> i32 {
        match (self.bytes, self.big_endian) {
            (2, true) => i16::from_be_bytes([raw[0], raw[1]]) as i32,
            (2, false) => i16::from_le_bytes([raw[0], raw[1]]) as i32,
            (4, true) => i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            _ => i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
        }
    }
}

impl Qub {
    /// Open a QUB by image ID in a data root folder.
    ///
    /// Without an explicit root the `VIMS_DATA` environment variable is
    /// used, falling back to the current directory.
    pub fn from_id(id: &str, root: Option<&Path>) -> Result<Qub> {
        let id = img_id(id)?;
        let root = match root {
            Some(r) => r.to_path_buf(),
            None => env::var_os(VIMS_DATA_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        Qub::open(&root.join(format!("v{id}.qub")))
    }

    /// Open and decode a QUB file.
    pub fn open(path: &Path) -> Result<Qub> {
        let bytes = std::fs::read(path)?;
        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
        if !head.contains("^QUBE") {
            return Err(VimsError::NotAQub(path.to_path_buf()));
        }

        let text = String::from_utf8_lossy(&bytes);
        let label = Label::parse(&text)?;

        let record_bytes = label.int("RECORD_BYTES")? as usize;
        let header_bytes = (label
            .pointer("QUBE")
            .ok_or_else(|| VimsError::NotAQub(path.to_path_buf()))? as usize
            - 1)
            * record_bytes;

        let core = label
            .block("QUBE")
            .ok_or_else(|| VimsError::NotAQub(path.to_path_buf()))?
            .clone();

        // Axis order sanity: the VIMS pipeline always writes
        // (SAMPLE, BAND, LINE).
        let axis = core.strs("AXIS_NAME")?;
        if axis != ["SAMPLE", "BAND", "LINE"] {
            return Err(VimsError::UnsupportedLayout(format!(
                "unexpected AXIS_NAME `{axis:?}`"
            )));
        }
        let i_sample = 0;
        let i_band = 1;
        let i_line = 2;

        let core_items = core.ints("CORE_ITEMS")?;
        let suffix_items = core.ints("SUFFIX_ITEMS")?;
        if core_items.len() != 3 || suffix_items.len() != 3 {
            return Err(VimsError::UnsupportedLayout(
                "CORE_ITEMS and SUFFIX_ITEMS must have 3 entries".into(),
            ));
        }
        let (ns, nb, nl) = (
            core_items[i_sample] as usize,
            core_items[i_band] as usize,
            core_items[i_line] as usize,
        );
        let (ss, sb) = (
            suffix_items[i_sample] as usize,
            suffix_items[i_band] as usize,
        );
        if ss > 1 {
            return Err(VimsError::UnsupportedLayout(format!(
                "unsupported sample suffix count `{ss}`"
            )));
        }

        let core_kind = ItemKind::new(core.str("CORE_ITEM_TYPE")?, core.int("CORE_ITEM_BYTES")?)?;

        let side_kind = if ss > 0 {
            Some(ItemKind::new(
                core.str("SAMPLE_SUFFIX_ITEM_TYPE")?,
                core.int("SAMPLE_SUFFIX_ITEM_BYTES")?,
            )?)
        } else {
            None
        };

        let (back_kinds, back_names) = if sb > 0 {
            let types = core.strs("BAND_SUFFIX_ITEM_TYPE")?;
            let bytes = core.ints("BAND_SUFFIX_ITEM_BYTES")?;
            let names = core.strs("BAND_SUFFIX_NAME")?;
            let kinds = types
                .iter()
                .zip(&bytes)
                .map(|(t, &b)| ItemKind::new(t, b))
                .collect::<Result<Vec<_>>>()?;
            (kinds, names)
        } else {
            (Vec::new(), Vec::new())
        };

        // Per-line byte layout.
        let b_side = side_kind.map(|k| k.bytes).unwrap_or(0);
        let b_band = ns * core_kind.bytes + ss * b_side;
        let b_back_record: usize = back_kinds.iter().map(|k| k.bytes).sum();
        let b_back = (ns + ss) * b_back_record;
        let b_line = nb * b_band + b_back;

        let body = bytes
            .get(header_bytes..header_bytes + nl * b_line)
            .ok_or_else(|| VimsError::NotAQub(path.to_path_buf()))?;

        debug!(
            "loading QUB {}: {} samples x {} lines x {} bands",
            path.display(),
            ns,
            nl,
            nb
        );

        // Decode the interleaved planes in one pass over the lines.
        let mut data = vec![0_i32; nl * nb * ns];
        let mut side_data = vec![0_i32; if ss > 0 { nl * nb } else { 0 }];
        let mut back_data = vec![vec![0_i32; nl * (ns + ss)]; back_kinds.len()];

        for l in 0..nl {
            let line = &body[l * b_line..(l + 1) * b_line];
            for b in 0..nb {
                let band = &line[b * b_band..(b + 1) * b_band];
                for s in 0..ns {
                    let raw = &band[s * core_kind.bytes..(s + 1) * core_kind.bytes];
                    data[(l * nb + b) * ns + s] = core_kind.decode(raw);
                }
                if let Some(kind) = side_kind {
                    let raw = &band[ns * core_kind.bytes..ns * core_kind.bytes + kind.bytes];
                    side_data[l * nb + b] = kind.decode(raw);
                }
            }
            let back = &line[nb * b_band..];
            for pos in 0..(ns + ss) {
                let mut offset = pos * b_back_record;
                for (item, kind) in back_kinds.iter().enumerate() {
                    let raw = &back[offset..offset + kind.bytes];
                    back_data[item][l * (ns + ss) + pos] = kind.decode(raw);
                    offset += kind.bytes;
                }
            }
        }

        let side_plane = side_kind.map(|_| SuffixPlane {
            name: core
                .strs("SAMPLE_SUFFIX_NAME")
                .ok()
                .and_then(|names| names.first().cloned())
                .unwrap_or_default(),
            data: side_data,
            shape: (nl, nb),
        });

        let back_planes = back_names
            .into_iter()
            .zip(back_data)
            .map(|(name, data)| SuffixPlane {
                name,
                data,
                shape: (nl, ns + ss),
            })
            .collect();

        Ok(Qub {
            img_id: img_id(&path.to_string_lossy())?,
            path: path.to_path_buf(),
            label,
            ns,
            nl,
            nb,
            ss,
            data,
            side_plane,
            back_planes,
        })
    }

    /// Image ID.
    pub fn img_id(&self) -> &str {
        &self.img_id
    }

    /// Source file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full parsed label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// QUBE core metadata block.
    pub fn core(&self) -> &super::pvl::Block {
        self.label.block("QUBE").expect("validated at open")
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

    /// Number of sample-suffix items.
    pub fn ss(&self) -> usize {
        self.ss
    }

    /// Instrument ID.
    pub fn instrument_id(&self) -> Result<String> {
        Ok(self.core().str("INSTRUMENT_ID")?.to_string())
    }

    /// Target name.
    pub fn target(&self) -> Result<String> {
        Ok(self.core().str("TARGET_NAME")?.to_string())
    }

    /// Acquisition start time (UTC).
    pub fn start(&self) -> Result<chrono::NaiveDateTime> {
        let raw = self.core().str("START_TIME")?;
        Ok(times::dt_doy(raw.trim_end_matches('Z'))?[0])
    }

    /// Acquisition stop time (UTC).
    pub fn stop(&self) -> Result<chrono::NaiveDateTime> {
        let raw = self.core().str("STOP_TIME")?;
        Ok(times::dt_doy(raw.trim_end_matches('Z'))?[0])
    }

    /// Acquisition duration [s].
    pub fn duration(&self) -> Result<f64> {
        Ok((self.stop()? - self.start()?).num_milliseconds() as f64 * 1e-3)
    }

    /// (IR, VIS) exposure durations [s].
    pub fn expo(&self) -> Result<(f64, f64)> {
        let ms = self.core().floats("EXPOSURE_DURATION")?;
        if ms.len() != 2 {
            return Err(VimsError::WrongType("EXPOSURE_DURATION".into()));
        }
        Ok((ms[0] * 1e-3, ms[1] * 1e-3))
    }

    /// IR sampling mode.
    pub fn sampling_mode_ir(&self) -> Result<String> {
        let mut modes = self.core().strs("SAMPLING_MODE_ID")?;
        if modes.is_empty() {
            return Err(VimsError::WrongType("SAMPLING_MODE_ID".into()));
        }
        Ok(modes.remove(0))
    }

    /// VIS sampling mode(s).
    pub fn sampling_mode_vis(&self) -> Result<Vec<String>> {
        let mut modes = self.core().strs("SAMPLING_MODE_ID")?;
        if modes.is_empty() {
            return Err(VimsError::WrongType("SAMPLING_MODE_ID".into()));
        }
        modes.remove(0);
        Ok(modes)
    }

    fn check(&self, value: usize, max: usize, name: &'static str) -> Result<usize> {
        if value < 1 || value > max {
            return Err(VimsError::IndexOutOfRange {
                name,
                value: value as i64,
                max,
            });
        }
        Ok(value - 1)
    }

    /// Raw DN at (sample, line, band), all 1-indexed. `None` flags an
    /// invalid (negative) DN.
    pub fn dn(&self, sample: usize, line: usize, band: usize) -> Result<Option<i32>> {
        let s = self.check(sample, self.ns, "sample")?;
        let l = self.check(line, self.nl, "line")?;
        let b = self.check(band, self.nb, "band")?;
        let v = self.data[(l * self.nb + b) * self.ns + s];
        Ok((v >= 0).then_some(v))
    }

    /// Band image as NaN-masked values, row-major (NL x NS). Bands are
    /// 1-indexed.
    pub fn band_image(&self, band: usize) -> Result<Vec<f64>> {
        let b = self.check(band, self.nb, "band")?;
        Ok((0..self.nl * self.ns)
            .map(|i| {
                let (l, s) = (i / self.ns, i % self.ns);
                let v = self.data[(l * self.nb + b) * self.ns + s];
                if v < 0 {
                    f64::NAN
                } else {
                    v as f64
                }
            })
            .collect())
    }

    /// Pixel spectrum as NaN-masked values (NB). Sample and line are
    /// 1-indexed.
    pub fn spectrum(&self, sample: usize, line: usize) -> Result<Vec<f64>> {
        let s = self.check(sample, self.ns, "sample")?;
        let l = self.check(line, self.nl, "line")?;
        Ok((0..self.nb)
            .map(|b| {
                let v = self.data[(l * self.nb + b) * self.ns + s];
                if v < 0 {
                    f64::NAN
                } else {
                    v as f64
                }
            })
            .collect())
    }

    /// Every pixel spectrum, in line-major order (NL * NS rows).
    pub fn spectra(&self) -> Vec<Vec<f64>> {
        let mut out = Vec::with_capacity(self.nl * self.ns);
        for l in 1..=self.nl {
            for s in 1..=self.ns {
                out.push(self.spectrum(s, l).expect("indices in range"));
            }
        }
        out
    }

    /// Side plane (NL x NB), usually the IR `BACKGROUND` measurement.
    pub fn side_plane(&self) -> Option<&SuffixPlane> {
        self.side_plane.as_ref()
    }

    /// Back planes (NL x (NS + SS) each).
    pub fn back_planes(&self) -> &[SuffixPlane] {
        &self.back_planes
    }

    /// Back plane by name.
    pub fn back_plane(&self, name: &str) -> Option<&SuffixPlane> {
        self.back_planes
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Qub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.img_id)
    }
}
