// Uninstall Contract Tests
//
// These tests pin the uninstall invariants: batch validation against the
// install root, install/uninstall round trips and registry-only listing.

use rk_core::{Installer, KernelTarget, Registry, Result, RkError, Settings, Uninstaller};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

const REGISTRY: &str = r#"{
    "py2": {"display_name": "Python 2 (remote)", "language": "python", "interpreter": "python2", "remote_host": "host2"},
    "py3": {"display_name": "Python 3 (remote)", "language": "python", "interpreter": "python3", "remote_host": "host3"}
}"#;

fn fixture() -> (TempDir, Settings, Registry) {
    let temp_dir = TempDir::new().unwrap();
    let img = temp_dir.path().join("img");
    fs::create_dir(&img).unwrap();
    fs::write(img.join("logo-32.png"), b"32").unwrap();
    fs::write(img.join("logo-64.png"), b"64").unwrap();

    let yaml = format!(
        "kernels_location: {}\nimg_location: img\nlogo_name: logo-{{size}}.png\nscript: rkscript\n\
         connection_file: \"{{connection_file}}\"\nregistry_path: kernels.json\nkernel_name: template\n\
         display_name: Template\nlanguage: python\ninterpreter: python\nremote_host: localhost\n",
        temp_dir.path().join("kernels").display()
    );
    let settings = Settings::from_yaml_str(&yaml, temp_dir.path()).unwrap();
    let registry = Registry::from_json_str(REGISTRY).unwrap();
    fs::create_dir_all(&settings.install_root).unwrap();
    (temp_dir, settings, registry)
}

fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let content = e
                .file_type()
                .is_file()
                .then(|| fs::read(e.path()).unwrap());
            (rel, content)
        })
        .collect()
}

fn decline(_: &str) -> Result<bool> {
    Ok(false)
}

/// INVARIANT: install(K) then uninstall(K) leaves no residue
#[test]
fn install_uninstall_round_trip() {
    let (_temp, settings, registry) = fixture();
    fs::create_dir(settings.install_root.join("unrelated")).unwrap();
    fs::write(settings.install_root.join("unrelated").join("kernel.json"), b"{}").unwrap();
    let before = snapshot(&settings.install_root);

    Installer::new(&settings, &registry)
        .install(&KernelTarget::names(["py3"]), &mut decline)
        .unwrap();
    assert_ne!(snapshot(&settings.install_root), before);

    Uninstaller::new(&settings)
        .uninstall(&KernelTarget::names(["py3"]))
        .unwrap();

    assert_eq!(snapshot(&settings.install_root), before);
}

/// INVARIANT: one missing name blocks the whole uninstall batch
#[test]
fn uninstall_validates_whole_batch() {
    let (_temp, settings, registry) = fixture();
    Installer::new(&settings, &registry)
        .install(&KernelTarget::names(["py3"]), &mut decline)
        .unwrap();
    let before = snapshot(&settings.install_root);

    let err = Uninstaller::new(&settings)
        .uninstall(&KernelTarget::names(["py3", "py2", "ghost"]))
        .unwrap_err();

    assert!(matches!(err, RkError::UnknownKernel(ref names) if names == &["py2", "ghost"]));
    assert_eq!(snapshot(&settings.install_root), before);
}

/// INVARIANT: uninstall-all on an empty root succeeds with nothing removed
#[test]
fn uninstall_all_on_empty_root() {
    let (_temp, settings, _registry) = fixture();

    let removed = Uninstaller::new(&settings)
        .uninstall(&KernelTarget::All)
        .unwrap();

    assert!(removed.is_empty());
    assert_eq!(settings.messages.uninstalled_all(&removed), "No kernels to uninstall");
}

/// INVARIANT: uninstall-all removes every directory, including unregistered ones
#[test]
fn uninstall_all_ignores_registry() {
    let (_temp, settings, registry) = fixture();
    Installer::new(&settings, &registry)
        .install(&KernelTarget::All, &mut decline)
        .unwrap();
    fs::create_dir(settings.install_root.join("hand-made")).unwrap();

    let removed = Uninstaller::new(&settings)
        .uninstall(&KernelTarget::All)
        .unwrap();

    assert_eq!(removed, vec!["hand-made", "py2", "py3"]);
    assert!(fs::read_dir(&settings.install_root).unwrap().next().is_none());
}

/// INVARIANT: listing reflects the registry, not the install root
#[test]
fn listing_ignores_disk_state() {
    let (_temp, settings, registry) = fixture();
    let listed_before = registry.list();

    Installer::new(&settings, &registry)
        .install(&KernelTarget::names(["py2"]), &mut decline)
        .unwrap();
    fs::remove_dir_all(settings.install_root.join("py2")).unwrap();

    assert_eq!(registry.list(), listed_before);
    assert_eq!(listed_before.len(), 2);
}

/// INVARIANT: a missing template is NoTemplate, never UnknownKernel
#[test]
fn missing_template_is_distinct() {
    let (_temp, settings, _registry) = fixture();

    let err = Uninstaller::new(&settings)
        .uninstall(&KernelTarget::Template)
        .unwrap_err();

    assert!(matches!(err, RkError::NoTemplate(_)));
    assert!(err.unknown_names().is_empty());
}
