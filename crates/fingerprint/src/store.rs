//! Persisted library fingerprints.
//!
//! A library fingerprint is the set of class fingerprints captured from one
//! archive. It is written once at capture time, shipped inside the bundle
//! that was compiled against that archive, and decoded again at verification
//! time. The wire format is MessagePack; round-tripping preserves structural
//! equality.

use crate::classfile;
use crate::error::Result;
use crate::model::{ClassFingerprint, NamedFingerprint};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Name-sorted collection of class fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFingerprint {
    classes: Vec<ClassFingerprint>,
}

impl LibraryFingerprint {
    pub fn new(mut classes: Vec<ClassFingerprint>) -> Self {
        classes.sort();
        Self { classes }
    }

    pub fn classes(&self) -> &[ClassFingerprint] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Looks up a class fingerprint by type name.
    pub fn get(&self, name: &str) -> Option<&ClassFingerprint> {
        self.classes
            .binary_search_by(|class| class.name().cmp(name))
            .ok()
            .map(|index| &self.classes[index])
    }

    /// Captures a fingerprint for every classfile in the given jar archive.
    pub fn from_archive(archive_path: &Path) -> Result<Self> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut classes = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let entry_name = entry.name().to_string();
            if !entry_name.ends_with(".class")
                || entry_name.ends_with("module-info.class")
                || entry_name.ends_with("package-info.class")
            {
                continue;
            }

            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            classes.push(classfile::describe_bytes(bytes)?.into());
        }

        debug!(
            "Captured {} class fingerprints from {}",
            classes.len(),
            archive_path.display()
        );
        Ok(Self::new(classes))
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(self)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        rmp_serde::encode::write(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        Ok(rmp_serde::from_read(reader)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::read_from(BufReader::new(File::open(path)?))
    }
}
