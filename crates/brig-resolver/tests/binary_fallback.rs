use brig_core::manifest::{InstalledSet, Manifest};
use brig_core::package::Package;
use brig_resolver::fingerprint::{closure_fingerprint, BinaryVerifier};
use brig_resolver::resolver::{resolve, ResolveOptions};

fn manifest(toml: &str) -> Manifest {
    Manifest::from_toml_str(toml).unwrap()
}

fn bin_manifest() -> Manifest {
    manifest(
        r#"
[[package]]
name = "a"
version = "1.0-0_5d4546a90e"
"#,
    )
}

fn src_manifest() -> Manifest {
    manifest(
        r#"
[[package]]
name = "a"
version = "1.0-0"
"#,
    )
}

#[test]
fn binary_preferred_when_its_manifest_comes_first() {
    let plan = resolve(
        "a == 1.0-0",
        &[bin_manifest(), src_manifest()],
        &InstalledSet::new(),
        &ResolveOptions::default(),
    )
    .unwrap()
    .emit();
    assert_eq!(plan, "a-1.0-0_5d4546a90e");
}

#[test]
fn source_preferred_when_manifest_order_reversed() {
    let plan = resolve(
        "a == 1.0-0",
        &[src_manifest(), bin_manifest()],
        &InstalledSet::new(),
        &ResolveOptions::default(),
    )
    .unwrap()
    .emit();
    assert_eq!(plan, "a-1.0-0");
}

#[test]
fn stale_binary_falls_through_to_source() {
    // The binary's suffix was computed against b-0.9-0, but the
    // manifests now resolve b to 1.0-0, so the binary is invalid.
    let stale = closure_fingerprint(&["b-0.9-0".to_string()], 10);
    let bin = manifest(&format!(
        r#"
[[package]]
name = "a"
version = "1.0-0_{stale}"
deps = ["b"]
"#
    ));
    let src = manifest(
        r#"
[[package]]
name = "a"
version = "1.0-0"
deps = ["b"]

[[package]]
name = "b"
version = "1.0-0"
"#,
    );

    let plan = resolve(
        "a",
        &[bin, src],
        &InstalledSet::new(),
        &ResolveOptions::default(),
    )
    .unwrap()
    .emit();
    assert_eq!(plan, "b-1.0-0 a-1.0-0");
}

#[test]
fn current_binary_is_accepted_with_its_closure() {
    let suffix = closure_fingerprint(&["b-1.0-0".to_string()], 10);
    let bin = manifest(&format!(
        r#"
[[package]]
name = "a"
version = "1.0-0_{suffix}"
deps = ["b"]
"#
    ));
    let src = manifest(
        r#"
[[package]]
name = "a"
version = "1.0-0"
deps = ["b"]

[[package]]
name = "b"
version = "1.0-0"
"#,
    );

    let plan = resolve(
        "a",
        &[bin, src],
        &InstalledSet::new(),
        &ResolveOptions::default(),
    )
    .unwrap()
    .emit();
    assert_eq!(plan, format!("b-1.0-0 a-1.0-0_{suffix}"));
}

#[test]
fn binary_with_installed_deps_is_still_validated() {
    // b is closed via the installed set, so nothing is freshly placed
    // for the binary; its stale suffix must still be checked.
    let installed = InstalledSet::from_toml_str(
        r#"
[[package]]
name = "b"
version = "1.0-0"
"#,
    )
    .unwrap();
    let bin = manifest(
        r#"
[[package]]
name = "a"
version = "1.0-0_deadbeef"
deps = ["b"]
"#,
    );
    let src = manifest(
        r#"
[[package]]
name = "a"
version = "1.0-0"
deps = ["b"]
"#,
    );

    let plan = resolve("a", &[bin, src], &installed, &ResolveOptions::default()).unwrap();
    assert_eq!(plan.emit(), "a-1.0-0");
}

struct RejectBinaries;

impl BinaryVerifier for RejectBinaries {
    fn verify(&self, candidate: &Package, _declared_deps: usize, _resolved_deps: &[String]) -> bool {
        !candidate.is_binary()
    }
}

#[test]
fn injected_verifier_overrides_default() {
    let options = ResolveOptions::default().with_verifier(Box::new(RejectBinaries));
    let plan = resolve(
        "a == 1.0-0",
        &[bin_manifest(), src_manifest()],
        &InstalledSet::new(),
        &options,
    )
    .unwrap()
    .emit();
    // Even dependency-free binaries are refused, so the source build
    // from the lower-priority manifest wins.
    assert_eq!(plan, "a-1.0-0");
}

#[test]
fn all_binaries_rejected_is_no_candidate() {
    let options = ResolveOptions::default().with_verifier(Box::new(RejectBinaries));
    let err = resolve(
        "a == 1.0-0",
        &[bin_manifest()],
        &InstalledSet::new(),
        &options,
    )
    .unwrap_err()
    .to_string();
    assert!(err.contains("No suitable candidate"), "got: {err}");
}
