//! Read back a synthetic raw QUB file.

use std::io::Write;

use rusty_vims::cube::Qub;

const RECORD: usize = 512;

/// Core DN written at (line, band, sample).
fn dn(l: usize, b: usize, s: usize) -> i16 {
    if (l, b, s) == (1, 2, 1) {
        -42 // invalid pixel
    } else {
        (100 * l + 10 * b + s) as i16
    }
}

/// Build a 2 samples x 3 lines x 4 bands QUB with a side plane and two
/// back planes, all big-endian.
fn build_qub() -> Vec<u8> {
    let header = "\
RECORD_BYTES = 512\r
^QUBE = 3\r
OBJECT = QUBE\r
  AXIS_NAME = (SAMPLE,BAND,LINE)\r
  CORE_ITEMS = (2,4,3)\r
  SUFFIX_ITEMS = (1,2,0)\r
  CORE_ITEM_BYTES = 2\r
  CORE_ITEM_TYPE = SUN_INTEGER\r
  SAMPLE_SUFFIX_NAME = BACKGROUND\r
  SAMPLE_SUFFIX_ITEM_BYTES = 4\r
  SAMPLE_SUFFIX_ITEM_TYPE = SUN_INTEGER\r
  BAND_SUFFIX_NAME = (LATITUDE,LONGITUDE)\r
  BAND_SUFFIX_ITEM_BYTES = (4,4)\r
  BAND_SUFFIX_ITEM_TYPE = (SUN_INTEGER,SUN_INTEGER)\r
  INSTRUMENT_ID = VIMS\r
  TARGET_NAME = \"TITAN\"\r
  START_TIME = 2005-046T06:30:00.000Z\r
  STOP_TIME = 2005-046T06:35:00.000Z\r
  EXPOSURE_DURATION = (160.0,5000.0)\r
  SAMPLING_MODE_ID = (NORMAL,NORMAL,NORMAL)\r
END_OBJECT = QUBE\r
END\r
";

    let mut bytes = header.as_bytes().to_vec();
    assert!(bytes.len() <= 2 * RECORD, "header must fit two records");
    bytes.resize(2 * RECORD, b' ');

    let (ns, nb, nl, ss) = (2, 4, 3, 1);
    for l in 0..nl {
        for b in 0..nb {
            for s in 0..ns {
                bytes.extend_from_slice(&dn(l, b, s).to_be_bytes());
            }
            // Side plane item (BACKGROUND).
            let side = (1000 + 10 * l + b) as i32;
            bytes.extend_from_slice(&side.to_be_bytes());
        }
        // Back planes: (ns + ss) positions x 2 interleaved items.
        for pos in 0..(ns + ss) {
            let lat = (2000 + 10 * l + pos) as i32;
            let lon = (3000 + 10 * l + pos) as i32;
            bytes.extend_from_slice(&lat.to_be_bytes());
            bytes.extend_from_slice(&lon.to_be_bytes());
        }
    }
    bytes
}

fn write_qub(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("v1487096932_1.qub");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&build_qub()).unwrap();
    path
}

#[test]
fn qub_loader() {
    let dir = tempfile::tempdir().unwrap();
    let qub = Qub::open(&write_qub(dir.path())).unwrap();

    assert_eq!(qub.to_string(), "1487096932_1");
    assert_eq!(qub.img_id(), "1487096932_1");
    assert_eq!(qub.ns(), 2);
    assert_eq!(qub.nl(), 3);
    assert_eq!(qub.nb(), 4);
    assert_eq!(qub.ss(), 1);

    assert_eq!(qub.instrument_id().unwrap(), "VIMS");
    assert_eq!(qub.target().unwrap(), "TITAN");
    assert_eq!(qub.sampling_mode_ir().unwrap(), "NORMAL");
    assert_eq!(qub.sampling_mode_vis().unwrap().len(), 2);

    let (ir, vis) = qub.expo().unwrap();
    assert!((ir - 0.16).abs() < 1e-9);
    assert!((vis - 5.0).abs() < 1e-9);

    assert_eq!(
        qub.start().unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
        "2005-02-15 06:30:00"
    );
    assert!((qub.duration().unwrap() - 300.0).abs() < 1e-9);
}

#[test]
fn qub_core_values() {
    let dir = tempfile::tempdir().unwrap();
    let qub = Qub::open(&write_qub(dir.path())).unwrap();

    // 1-indexed (sample, line, band) access.
    assert_eq!(qub.dn(1, 1, 1).unwrap(), Some(0));
    assert_eq!(qub.dn(2, 1, 1).unwrap(), Some(1));
    assert_eq!(qub.dn(1, 2, 3).unwrap(), Some(120));
    assert_eq!(qub.dn(2, 3, 4).unwrap(), Some(231));

    // Negative DNs are invalid.
    assert_eq!(qub.dn(2, 2, 3).unwrap(), None);

    // Out-of-range indices.
    assert!(qub.dn(0, 1, 1).is_err());
    assert!(qub.dn(3, 1, 1).is_err());
    assert!(qub.dn(1, 4, 1).is_err());
    assert!(qub.dn(1, 1, 5).is_err());

    // Band image (NL x NS) with the invalid pixel as NaN.
    let img = qub.band_image(3).unwrap();
    assert_eq!(img.len(), 6);
    assert_eq!(img[0], 20.0);
    assert!(img[1 * 2 + 1].is_nan());

    // Pixel spectrum across the 4 bands.
    let spectrum = qub.spectrum(1, 2).unwrap();
    assert_eq!(spectrum, vec![100.0, 110.0, 120.0, 130.0]);

    assert_eq!(qub.spectra().len(), 6);
}

#[test]
fn qub_suffix_planes() {
    let dir = tempfile::tempdir().unwrap();
    let qub = Qub::open(&write_qub(dir.path())).unwrap();

    let side = qub.side_plane().expect("side plane");
    assert_eq!(side.name, "BACKGROUND");
    assert_eq!(side.shape, (3, 4));
    assert_eq!(side.row(0), &[1000, 1001, 1002, 1003]);
    assert_eq!(side.row(2), &[1020, 1021, 1022, 1023]);

    assert_eq!(qub.back_planes().len(), 2);
    let lat = qub.back_plane("LATITUDE").expect("latitude plane");
    assert_eq!(lat.shape, (3, 3));
    assert_eq!(lat.row(1), &[2010, 2011, 2012]);

    let lon = qub.back_plane("LONGITUDE").expect("longitude plane");
    assert_eq!(lon.row(2), &[3020, 3021, 3022]);
}

#[test]
fn qub_from_id_env_root() {
    let dir = tempfile::tempdir().unwrap();
    write_qub(dir.path());

    let qub = Qub::from_id("1487096932_1", Some(dir.path())).unwrap();
    assert_eq!(qub.nb(), 4);

    assert!(Qub::from_id("1487096932_1", Some(std::path::Path::new("/nonexistent"))).is_err());
}

#[test]
fn qub_rejects_non_qub() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1487096932_1.qub");
    std::fs::write(&path, b"not a qub at all").unwrap();
    assert!(Qub::open(&path).is_err());
}
