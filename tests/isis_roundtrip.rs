//! Read back a synthetic tiled ISIS cube.

use rusty_vims::cube::{IsisCube, PixelType};

const START_BYTE: usize = 1025;

/// ISIS NULL float constant.
const NULL_4: f32 = -3.402_822_6e38;

/// Scaled value expected at (band, line, sample), 0-indexed.
fn value(b: usize, l: usize, s: usize) -> f64 {
    (100 * b + 10 * l + s) as f64
}

/// Build a 3 x 3 x 2 cube tiled in 2 x 2 tiles of little-endian
/// floats, with `value = raw * 2 + 1` scaling and one NULL pixel.
fn build_cube() -> Vec<u8> {
    let label = "\
Object = IsisCube
  Object = Core
    StartByte   = 1025
    Format      = Tile
    TileSamples = 2
    TileLines   = 2

    Group = Dimensions
      Samples = 3
      Lines   = 3
      Bands   = 2
    End_Group

    Group = Pixels
      Type       = Real
      ByteOrder  = Lsb
      Base       = 1.0
      Multiplier = 2.0
    End_Group
  End_Object

  Group = Instrument
    StartTime        = \"2005-02-15T06:58:00.000\"
    StopTime         = \"2005-02-15T07:00:00.000\"
    ExposureDuration = 160.0 <ms>
    TargetName       = Titan
  End_Group

  Group = BandBin
    OriginalBand = (97, 98)
    Center       = (0.884210, 0.900831)
  End_Group
End_Object

Object = NaifKeywords
  BODY606_RADII = (2575.0, 2574.0, 2574.0)
End_Object
End
";

    let mut bytes = label.as_bytes().to_vec();
    assert!(bytes.len() < START_BYTE);
    bytes.resize(START_BYTE - 1, b' ');

    // Tiles stream band by band, tile-row by tile-row.
    for b in 0..2 {
        for tl in 0..2 {
            for ts in 0..2 {
                for row in 0..2 {
                    for col in 0..2 {
                        let (l, s) = (tl * 2 + row, ts * 2 + col);
                        let raw: f32 = if l >= 3 || s >= 3 {
                            0.0 // tile padding, discarded
                        } else if (b, l, s) == (0, 2, 2) {
                            NULL_4
                        } else {
                            ((value(b, l, s) - 1.0) / 2.0) as f32
                        };
                        bytes.extend_from_slice(&raw.to_le_bytes());
                    }
                }
            }
        }
    }
    bytes
}

fn write_cube(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("C1487096932_1_ir.cub");
    std::fs::write(&path, build_cube()).unwrap();
    path
}

#[test]
fn isis_loader() {
    let dir = tempfile::tempdir().unwrap();
    let cube = IsisCube::open(&write_cube(dir.path())).unwrap();

    assert_eq!(cube.ns(), 3);
    assert_eq!(cube.nl(), 3);
    assert_eq!(cube.nb(), 2);
    assert_eq!(cube.shape(), (2, 3, 3));
    assert_eq!(cube.pixel_type(), PixelType::Real);

    assert_eq!(cube.target_name().unwrap(), "Titan");
    assert_eq!(cube.bands().unwrap(), vec![97, 98]);
    assert_eq!(cube.wavelengths().unwrap(), vec![0.884210, 0.900831]);

    assert_eq!(
        cube.start().unwrap().format("%H:%M:%S").to_string(),
        "06:58:00"
    );
    assert!((cube.duration().unwrap() - 120.0).abs() < 1e-9);
    assert_eq!(
        cube.mid_time().unwrap().format("%H:%M:%S").to_string(),
        "06:59:00"
    );
}

#[test]
fn isis_core_detiling() {
    let dir = tempfile::tempdir().unwrap();
    let cube = IsisCube::open(&write_cube(dir.path())).unwrap();

    // 1-indexed (sample, line, band) access across tile boundaries.
    assert_eq!(cube.value(1, 1, 1).unwrap(), 0.0);
    assert_eq!(cube.value(2, 1, 1).unwrap(), 1.0);
    assert_eq!(cube.value(3, 1, 1).unwrap(), 2.0);
    assert_eq!(cube.value(1, 3, 1).unwrap(), 20.0);
    assert_eq!(cube.value(3, 2, 2).unwrap(), 112.0);

    // The NULL pixel decodes to NaN.
    assert!(cube.value(3, 3, 1).unwrap().is_nan());
    // Same position is valid in the other band.
    assert_eq!(cube.value(3, 3, 2).unwrap(), 122.0);

    // Out-of-range indices.
    assert!(cube.value(4, 1, 1).is_err());
    assert!(cube.value(1, 0, 1).is_err());
    assert!(cube.value(1, 1, 3).is_err());

    // Band plane and spectrum shapes.
    let plane = cube.band_image(2).unwrap();
    assert_eq!(plane.len(), 9);
    assert_eq!(plane[0], 100.0);
    assert_eq!(plane[8], 122.0);

    assert_eq!(cube.spectrum(2, 2).unwrap(), vec![11.0, 111.0]);
}

#[test]
fn isis_naif_radii() {
    let dir = tempfile::tempdir().unwrap();
    let cube = IsisCube::open(&write_cube(dir.path())).unwrap();

    assert_eq!(cube.target_radii().unwrap(), [2575.0, 2574.0, 2574.0]);

    let mean = cube.target_radius().unwrap();
    let expected = (2575.0_f64 * 2574.0 * 2574.0).powf(1.0 / 3.0);
    assert!((mean - expected).abs() < 1e-9);
}

#[test]
fn isis_rejects_other_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("C1487096932_1_ir.cub");
    std::fs::write(&path, b"PDS_VERSION_ID = PDS3").unwrap();
    assert!(IsisCube::open(&path).is_err());
}
