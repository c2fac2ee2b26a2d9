//! Verification of an admitted bundle against the live classpath.
//!
//! An instrumentation bundle ships the fingerprint store of the library
//! version it was compiled against. Before its rules are applied, that
//! store is compared class by class with fingerprints captured from the
//! library actually present.

use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracescope_fingerprint::{ClassFingerprint, LibraryFingerprint, NamedFingerprint};
use tracing::debug;
use zip::ZipArchive;

/// Conventional path of the fingerprint store inside a bundle.
pub const FINGERPRINT_PATH: &str = "fingerprint.bin";

/// Reads the fingerprint store a bundle ships, if any.
///
/// A bundle without a store carries no structural requirements (`None`); a
/// store that fails to decode is an error, never a silent pass.
pub fn bundle_fingerprint(bundle: &Path) -> Result<Option<LibraryFingerprint>> {
    if bundle.is_dir() {
        let path = bundle.join(FINGERPRINT_PATH);
        if !path.exists() {
            return Ok(None);
        }
        return Ok(Some(LibraryFingerprint::load(&path)?));
    }

    let mut archive = ZipArchive::new(File::open(bundle)?)?;
    let mut entry = match archive.by_name(FINGERPRINT_PATH) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(Some(LibraryFingerprint::from_slice(&bytes)?))
}

/// Returns the classes `required` demands that `live` is missing or
/// declares incompatibly.
///
/// An empty result means the bundle may be applied. Anything else is not an
/// error here; callers decide between hard failure and skip-with-warning.
pub fn incompatibilities<'a>(
    required: &'a LibraryFingerprint,
    live: &LibraryFingerprint,
) -> Vec<&'a ClassFingerprint> {
    let mut failed = Vec::new();
    for reference in required.classes() {
        match live.get(reference.name()) {
            Some(candidate) if reference.compatible(candidate) => {}
            _ => {
                debug!("Fingerprint mismatch for {}", reference.name());
                failed.push(reference);
            }
        }
    }
    failed
}

/// True when every class `required` demands is present and compatible.
pub fn is_compatible(required: &LibraryFingerprint, live: &LibraryFingerprint) -> bool {
    incompatibilities(required, live).is_empty()
}
