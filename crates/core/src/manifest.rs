//! Bundle manifest reader.

use crate::error::{Result, TracescopeError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Conventional descriptor path at the root of a plugin bundle.
pub const MANIFEST_PATH: &str = "plugin.json";

/// Category of a plugin bundle, selecting which enable/disable default
/// applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Instrumentation,
    Tracer,
}

/// Declarative descriptor shipped at the root of a plugin bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PluginKind,
}

impl PluginManifest {
    /// Reads the descriptor from a bundle directory or archive.
    ///
    /// A bundle without a descriptor is a plain resource: `Ok(None)`. A
    /// descriptor that does not parse fails the whole discovery step; a
    /// corrupt manifest must neither silently admit nor silently drop a
    /// bundle.
    pub fn from_bundle(bundle: &Path) -> Result<Option<PluginManifest>> {
        if bundle.is_dir() {
            let path = bundle.join(MANIFEST_PATH);
            if !path.exists() {
                return Ok(None);
            }
            let bytes = std::fs::read(path)?;
            return Self::parse(bundle, &bytes).map(Some);
        }

        let mut archive = ZipArchive::new(File::open(bundle)?)?;
        let mut entry = match archive.by_name(MANIFEST_PATH) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Self::parse(bundle, &bytes).map(Some)
    }

    fn parse(bundle: &Path, bytes: &[u8]) -> Result<PluginManifest> {
        serde_json::from_slice(bytes).map_err(|source| TracescopeError::Manifest {
            bundle: bundle.to_path_buf(),
            source,
        })
    }
}
