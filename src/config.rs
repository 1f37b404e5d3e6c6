//! Manifest (`pkbin.jsonc`) discovery and loading.
//!
//! Only the given directory is searched; there is no walk up through parent
//! directories and no caching between calls.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::parser::{self, ParseError};

/// The only manifest filename that is recognized.
pub const MANIFEST_FILENAME: &str = "pkbin.jsonc";

/// Path of the manifest inside `dir`.
#[must_use]
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILENAME)
}

/// Read and parse the manifest in `dir`.
///
/// Parsing runs in two phases: JSONC normalization, then strict decoding.
///
/// # Errors
///
/// - [`Error::ConfigNotFound`] if `dir` has no manifest file
/// - [`Error::ConfigRead`] if the file exists but cannot be read
/// - [`Error::ConfigParse`] if the content is not valid JSONC or `scripts` has the wrong shape
pub fn load_manifest(dir: &Path) -> Result<Manifest> {
    let path = manifest_path(dir);
    log::debug!("loading manifest from {}", path.display());

    let bytes = fs::read(&path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::ConfigNotFound(dir.to_path_buf()),
        _ => Error::ConfigRead {
            path: path.clone(),
            source,
        },
    })?;

    let source = std::str::from_utf8(&bytes)
        .map_err(|err| Box::new(ParseError::invalid_utf8(&bytes, &err, Some(MANIFEST_FILENAME))))?;

    let normalized = parser::normalize(source, Some(MANIFEST_FILENAME))?;
    let manifest = Manifest::from_json_str(&normalized, Some(MANIFEST_FILENAME))?;

    log::debug!("loaded {} script(s) from {}", manifest.len(), path.display());
    Ok(manifest)
}
