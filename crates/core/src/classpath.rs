//! Classpath parsing.

use std::path::PathBuf;

/// Path-entry separator: `;` on windows, `:` elsewhere.
const SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Splits a classpath-style string into its entries, preserving order and
/// dropping empty segments.
pub fn split(classpath: &str) -> Vec<PathBuf> {
    classpath
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Entries of the process `CLASSPATH` environment variable, if set.
pub fn from_env() -> Vec<PathBuf> {
    std::env::var("CLASSPATH")
        .map(|value| split(&value))
        .unwrap_or_default()
}
