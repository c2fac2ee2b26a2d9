//! Drives the full discovery pipeline against real archives on disk: root
//! walking, deduplication, extraction, admission, and fingerprint
//! verification of the admitted bundles.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracescope_core::policy::WILDCARD;
use tracescope_core::{PluginDiscovery, PluginKind, PluginPolicy, verify};
use tracescope_fingerprint::{
    ClassFingerprint, FieldFingerprint, LibraryFingerprint, MethodFingerprint,
};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const PREFIX: &str = "plugins/";

/// Builds a bundle jar in memory, optionally with a descriptor and an
/// embedded fingerprint store.
fn bundle_bytes(manifest: Option<&str>, fingerprint: Option<&LibraryFingerprint>) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("rule.class", options).unwrap();
    writer.write_all(b"rule bytes").unwrap();
    if let Some(manifest) = manifest {
        writer.start_file("plugin.json", options).unwrap();
        writer.write_all(manifest.as_bytes()).unwrap();
    }
    if let Some(fingerprint) = fingerprint {
        writer.start_file(verify::FINGERPRINT_PATH, options).unwrap();
        writer.write_all(&fingerprint.to_vec().unwrap()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Writes a resource-root jar containing the given entries.
fn write_root(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
}

fn manifest(name: &str, kind: &str) -> String {
    format!(r#"{{"name":"{name}","type":"{kind}"}}"#)
}

fn admitted_names(set: &tracescope_core::PluginSet) -> Vec<String> {
    let mut names: Vec<String> = set
        .files()
        .iter()
        .map(|file| file.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn admission_follows_category_default_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("agent.jar");
    write_root(
        &root,
        &[
            (
                "plugins/pluginA.jar",
                &bundle_bytes(Some(&manifest("pluginA", "instrumentation")), None)[..],
            ),
            (
                "plugins/pluginB.jar",
                &bundle_bytes(Some(&manifest("pluginB", "instrumentation")), None)[..],
            ),
            (
                "plugins/jaeger.jar",
                &bundle_bytes(Some(&manifest("jaeger", "tracer")), None)[..],
            ),
            ("plugins/plain.jar", &bundle_bytes(None, None)[..]),
            ("plugins/readme.txt", b"not a bundle"),
        ],
    );

    let policy = PluginPolicy::from_map(HashMap::from([
        (WILDCARD.to_string(), false),
        ("pluginA".to_string(), true),
    ]));
    let set = PluginDiscovery::new(vec![root], PREFIX)
        .with_instrumentation_policy(policy)
        .discover()
        .unwrap();

    // pluginB is rejected by the instrumentation default; the tracer
    // category keeps its own (enabled) default; manifest-less bundles pass
    // through unfiltered.
    assert_eq!(
        admitted_names(&set),
        ["jaeger.jar", "plain.jar", "pluginA.jar"]
    );

    // The rejected bundle's extracted copy is gone from the scratch dir.
    let scratch = set.scratch_dir().unwrap();
    assert!(scratch.join("plugins/pluginA.jar").exists());
    assert!(!scratch.join("plugins/pluginB.jar").exists());

    let plugin_a = set
        .files()
        .iter()
        .find(|f| f.ends_with("pluginA.jar"))
        .unwrap();
    assert_eq!(set.manifest(plugin_a).unwrap().kind, PluginKind::Instrumentation);
    let plain = set.files().iter().find(|f| f.ends_with("plain.jar")).unwrap();
    assert!(set.manifest(plain).is_none());
}

#[test]
fn duplicate_roots_are_visited_once() {
    let dir = tempfile::tempdir().unwrap();
    let root_a = dir.path().join("root-a.jar");
    let root_b = dir.path().join("root-b.jar");
    write_root(
        &root_a,
        &[("plugins/shared.jar", &bundle_bytes(None, None)[..])],
    );
    let b_payload = bundle_bytes(Some(&manifest("shared", "instrumentation")), None);
    write_root(&root_b, &[("plugins/shared.jar", &b_payload[..])]);

    // root_a appears again after root_b; without deduplication its copy
    // would overwrite root_b's last-wins extraction.
    let roots = vec![root_a.clone(), root_b, root_a];
    let set = PluginDiscovery::new(roots, PREFIX).discover().unwrap();

    assert_eq!(set.len(), 1);
    let shared = set.files().iter().next().unwrap();
    assert_eq!(
        set.manifest(shared).map(|m| m.name.as_str()),
        Some("shared")
    );
}

#[test]
fn later_roots_overwrite_earlier_extractions() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.jar");
    let second = dir.path().join("second.jar");
    write_root(
        &first,
        &[(
            "plugins/dual.jar",
            &bundle_bytes(Some(&manifest("from-first", "instrumentation")), None)[..],
        )],
    );
    write_root(
        &second,
        &[(
            "plugins/dual.jar",
            &bundle_bytes(Some(&manifest("from-second", "instrumentation")), None)[..],
        )],
    );

    let set = PluginDiscovery::new(vec![first, second], PREFIX)
        .discover()
        .unwrap();

    assert_eq!(set.len(), 1);
    let dual = set.files().iter().next().unwrap();
    assert_eq!(
        set.manifest(dual).map(|m| m.name.as_str()),
        Some("from-second")
    );
}

#[test]
fn non_archive_and_missing_roots_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("classes");
    std::fs::write(&text, "just text").unwrap();
    let missing = dir.path().join("does-not-exist.jar");
    let plugin_dir = dir.path().join("exploded");
    std::fs::create_dir(&plugin_dir).unwrap();

    let set = PluginDiscovery::new(vec![text, missing, plugin_dir], PREFIX)
        .discover()
        .unwrap();

    assert!(set.is_empty());
    assert!(set.scratch_dir().is_none());
}

#[test]
fn malformed_descriptors_abort_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("agent.jar");
    write_root(
        &root,
        &[(
            "plugins/broken.jar",
            &bundle_bytes(Some(r#"{"name":"broken""#), None)[..],
        )],
    );

    assert!(PluginDiscovery::new(vec![root], PREFIX).discover().is_err());
}

#[test]
fn scratch_directory_is_deleted_with_the_set() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("agent.jar");
    write_root(
        &root,
        &[("plugins/keep.jar", &bundle_bytes(None, None)[..])],
    );

    let set = PluginDiscovery::new(vec![root], PREFIX).discover().unwrap();
    let scratch: PathBuf = set.scratch_dir().unwrap().to_path_buf();
    assert!(scratch.exists());

    drop(set);
    assert!(!scratch.exists());
}

#[test]
fn admitted_bundles_are_gated_by_their_fingerprint_store() {
    let required = LibraryFingerprint::new(vec![ClassFingerprint::new(
        "com.example.Connection",
        None,
        vec![],
        vec![],
        vec![MethodFingerprint::new("m", vec![], None)],
        vec![FieldFingerprint::new("f", "int")],
    )]);

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("agent.jar");
    write_root(
        &root,
        &[(
            "plugins/connection.jar",
            &bundle_bytes(
                Some(&manifest("connection", "instrumentation")),
                Some(&required),
            )[..],
        )],
    );

    let set = PluginDiscovery::new(vec![root], PREFIX).discover().unwrap();
    let bundle = set.files().iter().next().unwrap();
    let shipped = verify::bundle_fingerprint(bundle).unwrap().unwrap();
    assert_eq!(shipped, required);

    // The live library declares more than the bundle demands: compatible.
    let live = LibraryFingerprint::new(vec![ClassFingerprint::new(
        "com.example.Connection",
        None,
        vec![],
        vec![],
        vec![MethodFingerprint::new("m", vec![], None)],
        vec![
            FieldFingerprint::new("f", "int"),
            FieldFingerprint::new("g", "java.lang.String"),
        ],
    )]);
    assert!(verify::is_compatible(&shipped, &live));

    // Remove the demanded method: incompatible.
    let live_without_m = LibraryFingerprint::new(vec![ClassFingerprint::new(
        "com.example.Connection",
        None,
        vec![],
        vec![],
        vec![],
        vec![
            FieldFingerprint::new("f", "int"),
            FieldFingerprint::new("g", "java.lang.String"),
        ],
    )]);
    assert!(!verify::is_compatible(&shipped, &live_without_m));
}
