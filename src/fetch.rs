//! Archive access: HTTP downloads and MD5 checksums.
//!
//! The PDS imaging node publishes MD5 checksums next to the data
//! files; downloads can be verified on the fly.

use std::path::Path;

use log::info;
use md5::{Digest, Md5};

use crate::errors::{Result, VimsError};

/// Scheme + host prefix of a URL (`https://host/`).
///
/// Scheme-less absolute paths (`/host/…`) keep their leading slash.
pub fn domain(url: &str) -> Result<String> {
    if let Some((scheme, rest)) = url.split_once("://") {
        let (host, _) = rest
            .split_once('/')
            .ok_or_else(|| VimsError::InvalidUrl(url.into()))?;
        if host.is_empty() {
            return Err(VimsError::InvalidUrl(url.into()));
        }
        return Ok(format!("{scheme}://{host}/"));
    }
    if let Some(rest) = url.strip_prefix('/') {
        let (host, _) = rest
            .split_once('/')
            .ok_or_else(|| VimsError::InvalidUrl(url.into()))?;
        if host.is_empty() {
            return Err(VimsError::InvalidUrl(url.into()));
        }
        return Ok(format!("/{host}/"));
    }
    Err(VimsError::InvalidUrl(url.into()))
}

/// Whether a URL answers with a success status.
pub fn url_exists(url: &str) -> bool {
    match reqwest::blocking::get(url) {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

/// Hex MD5 digest of raw bytes.
pub fn get_md5(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Hex MD5 digest of a file.
pub fn get_md5_file(path: &Path) -> Result<String> {
    Ok(get_md5(&std::fs::read(path)?))
}

/// Check data against an expected MD5 digest.
pub fn check_md5(data: &[u8], md5: &str) -> Result<()> {
    let computed = get_md5(data);
    if computed == md5 {
        Ok(())
    } else {
        Err(VimsError::ChecksumMismatch {
            computed,
            expected: md5.to_string(),
        })
    }
}

/// Download a URL into memory, optionally checking its MD5.
pub fn wget_bytes(url: &str, md5: Option<&str>) -> Result<Vec<u8>> {
    info!("downloading {url}");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let data = response.bytes()?.to_vec();
    if let Some(md5) = md5 {
        check_md5(&data, md5)?;
    }
    Ok(data)
}

/// Download a URL to a file, optionally checking its MD5.
///
/// Errors if the file already exists, unless `overwrite` is set.
pub fn wget(url: &str, filename: &Path, md5: Option<&str>, overwrite: bool) -> Result<()> {
    if filename.exists() && !overwrite {
        return Err(VimsError::FileExists(filename.to_path_buf()));
    }
    let data = wget_bytes(url, md5)?;
    std::fs::write(filename, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_domains() {
        assert_eq!(
            domain("https://pds-imaging.jpl.nasa.gov/volumes/vims.html").unwrap(),
            "https://pds-imaging.jpl.nasa.gov/"
        );
        assert_eq!(
            domain("http://pds-imaging.jpl.nasa.gov/volumes/vims.html").unwrap(),
            "http://pds-imaging.jpl.nasa.gov/"
        );
        assert_eq!(
            domain("/pds-imaging.jpl.nasa.gov/volumes/vims.html").unwrap(),
            "/pds-imaging.jpl.nasa.gov/"
        );

        assert!(domain("pds-imaging.jpl.nasa.gov/volumes/vims.html").is_err());
        assert!(domain("//pds-imaging.jpl.nasa.gov/").is_err());
        assert!(domain("http://pds-imaging.jpl.nasa.gov").is_err());
    }

    #[test]
    fn md5_digests() {
        // RFC 1321 reference digests.
        assert_eq!(get_md5(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(get_md5(b"abc"), "900150983cd24fb0d6963f7d28e17f72");

        assert!(check_md5(b"abc", "900150983cd24fb0d6963f7d28e17f72").is_ok());
        assert!(matches!(
            check_md5(b"abc", "deadbeef"),
            Err(VimsError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn overwrite_protection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.qub");
        std::fs::write(&path, b"existing").unwrap();

        let err = wget("https://invalid.invalid/x", &path, None, false);
        assert!(matches!(err, Err(VimsError::FileExists(_))));
    }
}
