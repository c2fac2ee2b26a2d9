//! Archive helpers: format sniffing, directory packing, and resource
//! location parsing.

use crate::error::{Result, TracescopeError};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// ZIP local-file-header magic.
const ZIP_MAGIC: [u8; 2] = [0x50, 0x4B];

/// Sniffs the leading magic bytes; only zip-backed files count as archives.
pub fn is_archive(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => magic == ZIP_MAGIC,
        Err(_) => false,
    }
}

/// Packs every file under `dir` into a jar at `dest`, preserving relative
/// paths.
pub fn pack_dir(dir: &Path, dest: &Path) -> Result<()> {
    let mut writer = ZipWriter::new(File::create(dest)?);
    let options = SimpleFileOptions::default();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let name = relative.to_string_lossy().replace('\\', "/");
        writer.start_file(name, options)?;
        let mut file = File::open(entry.path())?;
        io::copy(&mut file, &mut writer)?;
    }
    writer.finish()?;
    Ok(())
}

/// Resolves a resource URL string to the location that backs it.
///
/// `jar:file:/path/to.jar!/resource` yields the jar; `file:/root/resource`
/// yields the root with the resource path stripped. The URL must end with
/// `resource_path`; any other scheme is rejected.
pub fn source_location(url: &str, resource_path: &str) -> Result<PathBuf> {
    if !url.ends_with(resource_path) {
        return Err(TracescopeError::UnsupportedLocation(format!(
            "{url} does not end with \"{resource_path}\""
        )));
    }

    if let Some(rest) = url.strip_prefix("jar:file:") {
        let jar = rest.rfind('!').map(|index| &rest[..index]).unwrap_or(rest);
        return Ok(PathBuf::from(jar));
    }

    if let Some(rest) = url.strip_prefix("file:") {
        return Ok(PathBuf::from(&rest[..rest.len() - resource_path.len()]));
    }

    Err(TracescopeError::UnsupportedLocation(url.to_string()))
}
