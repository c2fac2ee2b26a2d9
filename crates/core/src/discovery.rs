//! Resource discovery and extraction.
//!
//! Walks classpath-like resource roots for entries under a well-known path
//! prefix, extracts nested bundle archives into a private scratch
//! directory, and admits them through the per-category enable/disable
//! policies. One invocation owns one scratch directory; dropping the
//! returned set deletes everything it extracted.

use crate::archive;
use crate::error::Result;
use crate::manifest::{PluginKind, PluginManifest};
use crate::policy::PluginPolicy;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Extension of nested bundle archives.
const BUNDLE_EXTENSION: &str = ".jar";

/// Discovers plugin bundles under a path prefix across a set of resource
/// roots.
pub struct PluginDiscovery {
    roots: Vec<PathBuf>,
    prefix: String,
    instrumentation: PluginPolicy,
    tracer: PluginPolicy,
}

impl PluginDiscovery {
    /// Discovery over the given roots with both categories fully enabled.
    pub fn new(roots: Vec<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            roots,
            prefix: prefix.into(),
            instrumentation: PluginPolicy::allow_all(),
            tracer: PluginPolicy::allow_all(),
        }
    }

    pub fn with_instrumentation_policy(mut self, policy: PluginPolicy) -> Self {
        self.instrumentation = policy;
        self
    }

    pub fn with_tracer_policy(mut self, policy: PluginPolicy) -> Self {
        self.tracer = policy;
        self
    }

    fn policy_for(&self, kind: PluginKind) -> &PluginPolicy {
        match kind {
            PluginKind::Instrumentation => &self.instrumentation,
            PluginKind::Tracer => &self.tracer,
        }
    }

    /// Walks every root once and returns the admitted bundle set.
    ///
    /// Roots that are not zip-backed are skipped, as are roots already
    /// visited under another spelling of the same location. Extraction and
    /// descriptor failures abort the whole run; a partial plugin set is
    /// worse than a hard failure at startup.
    pub fn discover(&self) -> Result<PluginSet> {
        debug!(
            "Instrumentation plugins are {} by default",
            enabled_word(self.instrumentation.default_enabled())
        );
        debug!(
            "Tracer plugins are {} by default",
            enabled_word(self.tracer.default_enabled())
        );

        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut scratch: Option<TempDir> = None;
        let mut files: HashSet<PathBuf> = HashSet::new();
        let mut manifests: HashMap<PathBuf, Option<PluginManifest>> = HashMap::new();

        for root in &self.roots {
            let Ok(canonical) = fs::canonicalize(root) else {
                debug!("Skipping unreadable root {}", root.display());
                continue;
            };
            if !visited.insert(canonical.clone()) {
                continue;
            }
            if !archive::is_archive(&canonical) {
                debug!("Skipping non-archive root {}", canonical.display());
                continue;
            }

            debug!("Scanning {}", canonical.display());
            self.extract_root(&canonical, &mut scratch, &mut files, &mut manifests)?;
        }

        info!(
            "Discovery admitted {} bundles from {} roots",
            files.len(),
            visited.len()
        );
        Ok(PluginSet {
            scratch,
            files,
            manifests,
        })
    }

    fn extract_root(
        &self,
        root: &Path,
        scratch: &mut Option<TempDir>,
        files: &mut HashSet<PathBuf>,
        manifests: &mut HashMap<PathBuf, Option<PluginManifest>>,
    ) -> Result<()> {
        let mut archive = ZipArchive::new(File::open(root)?)?;
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();
            if name.len() <= self.prefix.len() || !name.starts_with(&self.prefix) {
                continue;
            }

            let dest_root = match scratch {
                Some(dir) => dir.path().to_path_buf(),
                None => {
                    let dir = tempfile::Builder::new().prefix("tracescope-").tempdir()?;
                    let path = dir.path().to_path_buf();
                    *scratch = Some(dir);
                    path
                }
            };

            let dest = dest_root.join(&name);
            if entry.is_dir() {
                fs::create_dir_all(&dest)?;
                continue;
            }
            if !name.ends_with(BUNDLE_EXTENSION) {
                continue;
            }

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            // The most recently visited root wins on a name collision.
            let mut out = File::create(&dest)?;
            io::copy(&mut entry, &mut out)?;
            drop(out);

            let manifest = PluginManifest::from_bundle(&dest)?;
            let admitted = match &manifest {
                None => true,
                Some(manifest) => {
                    let admitted = self.policy_for(manifest.kind).admits(&manifest.name);
                    debug!(
                        "{:?} plugin {} is {}",
                        manifest.kind,
                        manifest.name,
                        enabled_word(admitted)
                    );
                    admitted
                }
            };

            if admitted {
                files.insert(dest.clone());
                manifests.insert(dest, manifest);
            } else {
                files.remove(&dest);
                manifests.remove(&dest);
                if let Err(err) = fs::remove_file(&dest) {
                    warn!("Failed to remove rejected bundle {}: {err}", dest.display());
                }
            }
        }
        Ok(())
    }
}

/// The admitted bundle set of one discovery run.
///
/// Owns the scratch directory the bundles were extracted into; the set must
/// outlive every use of the extracted files. Dropping it deletes the
/// directory recursively.
#[derive(Debug)]
pub struct PluginSet {
    scratch: Option<TempDir>,
    files: HashSet<PathBuf>,
    manifests: HashMap<PathBuf, Option<PluginManifest>>,
}

impl PluginSet {
    /// Extracted files admitted into the active set.
    pub fn files(&self) -> &HashSet<PathBuf> {
        &self.files
    }

    /// Side table from extracted file to its manifest; plain resources map
    /// to `None`.
    pub fn manifests(&self) -> &HashMap<PathBuf, Option<PluginManifest>> {
        &self.manifests
    }

    pub fn manifest(&self, file: &Path) -> Option<&PluginManifest> {
        self.manifests.get(file).and_then(|manifest| manifest.as_ref())
    }

    /// The scratch directory, when anything was extracted.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch.as_ref().map(|dir| dir.path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Drop for PluginSet {
    fn drop(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            let path = scratch.path().to_path_buf();
            if let Err(err) = scratch.close() {
                warn!(
                    "Failed to clean scratch directory {}: {err}",
                    path.display()
                );
            }
        }
    }
}

fn enabled_word(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
