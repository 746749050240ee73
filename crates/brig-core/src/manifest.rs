//! Manifest indexes: raw candidate records, per-name insertion-ordered
//! candidate lists, multi-manifest merging, and the installed set.
//!
//! Ingestion of remote indices happens elsewhere; this module accepts
//! already-materialized documents. The TOML front door uses the
//! `[[package]]` array-of-tables form so candidate order survives
//! parsing.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use brig_util::errors::BrigError;

use crate::constraint::Constraint;
use crate::package::{DependencyList, Package};
use crate::platform::PlatformSpec;
use crate::version::Version;

/// A whole manifest document in raw form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDoc {
    #[serde(default)]
    pub package: Vec<PackageRecord>,
}

/// One raw candidate record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub deps: Vec<DepEntry>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// An entry in a raw dependency list: either a plain constraint string
/// or a keyed section of per-platform additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepEntry {
    Spec(String),
    Platforms {
        platforms: BTreeMap<String, Vec<String>>,
    },
}

impl PackageRecord {
    /// Normalize the wild raw form into an immutable [`Package`].
    pub fn into_package(self) -> miette::Result<Package> {
        let version = Version::parse(&self.version)?;
        let mut positional = Vec::new();
        let mut overrides: BTreeMap<String, Vec<Constraint>> = BTreeMap::new();
        for entry in &self.deps {
            match entry {
                DepEntry::Spec(spec) => positional.push(Constraint::parse(spec)?),
                DepEntry::Platforms { platforms } => {
                    for (tag, specs) in platforms {
                        let list = overrides.entry(tag.clone()).or_default();
                        for spec in specs {
                            list.push(Constraint::parse(spec)?);
                        }
                    }
                }
            }
        }
        let platforms = PlatformSpec::from_tags(&self.platforms);
        Ok(Package::new(
            self.name,
            version,
            DependencyList::new(positional, overrides),
            platforms,
        ))
    }
}

/// An index of candidate packages: for each name, an ordered list
/// preserving record insertion order. Never key-sorted; the per-name
/// order is what the resolver iterates.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    packages: HashMap<String, Vec<Package>>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest from a TOML document.
    pub fn from_toml_str(content: &str) -> miette::Result<Self> {
        let doc: ManifestDoc = toml::from_str(content).map_err(|e| BrigError::Manifest {
            message: format!("Failed to parse manifest: {e}"),
        })?;
        Self::from_records(doc.package)
    }

    /// Build an index from raw records, preserving their order.
    pub fn from_records(records: Vec<PackageRecord>) -> miette::Result<Self> {
        let mut packages: HashMap<String, Vec<Package>> = HashMap::new();
        for record in records {
            let package = record.into_package()?;
            packages
                .entry(package.name().to_string())
                .or_default()
                .push(package);
        }
        Ok(Self { packages })
    }

    /// The candidates recorded for `name`, in insertion order.
    pub fn candidates(&self, name: &str) -> &[Package] {
        self.packages.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct package names in the index.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Merge an ordered list of manifests into one index.
    ///
    /// Earlier manifests come first and win: a candidate whose
    /// `(name, version)` pair already appeared in an earlier manifest
    /// is silently dropped. Each surviving package is stamped with the
    /// rank of the manifest that contributed it.
    pub fn merge(manifests: &[Manifest]) -> Manifest {
        let mut packages: HashMap<String, Vec<Package>> = HashMap::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for (rank, manifest) in manifests.iter().enumerate() {
            for (name, candidates) in &manifest.packages {
                let merged = packages.entry(name.clone()).or_default();
                for package in candidates {
                    let key = (name.clone(), package.version().to_string());
                    if !seen.insert(key) {
                        continue;
                    }
                    merged.push(package.clone().with_rank(rank));
                }
            }
        }
        Manifest { packages }
    }
}

/// The packages already present on the system, exactly one version per
/// name. Consulted read-only during resolution.
#[derive(Debug, Clone, Default)]
pub struct InstalledSet {
    packages: HashMap<String, Package>,
}

impl InstalledSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an installed set from a TOML document in the same
    /// `[[package]]` form as manifests.
    pub fn from_toml_str(content: &str) -> miette::Result<Self> {
        let doc: ManifestDoc = toml::from_str(content).map_err(|e| BrigError::Manifest {
            message: format!("Failed to parse installed set: {e}"),
        })?;
        Self::from_records(doc.package)
    }

    /// Build from raw records; a later record for the same name
    /// replaces the earlier one.
    pub fn from_records(records: Vec<PackageRecord>) -> miette::Result<Self> {
        let mut set = Self::new();
        for record in records {
            set.insert(record.into_package()?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, package: Package) {
        self.packages.insert(package.name().to_string(), package);
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_earlier_manifest_wins() {
        let bin = Manifest::from_toml_str(
            r#"
[[package]]
name = "a"
version = "1.0-0"
"#,
        )
        .unwrap();
        let src = Manifest::from_toml_str(
            r#"
[[package]]
name = "a"
version = "1.0-0"

[[package]]
name = "a"
version = "2.0-0"
"#,
        )
        .unwrap();

        let merged = Manifest::merge(&[bin, src]);
        let candidates = merged.candidates("a");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].version().to_string(), "1.0-0");
        assert_eq!(candidates[0].manifest_rank(), 0);
        assert_eq!(candidates[1].version().to_string(), "2.0-0");
        assert_eq!(candidates[1].manifest_rank(), 1);
    }

    #[test]
    fn merge_keeps_binary_and_source_variants() {
        // Same release, but the binary's hash suffix makes it a
        // distinct candidate; both must survive for fallback.
        let bin = Manifest::from_toml_str(
            r#"
[[package]]
name = "a"
version = "1.0-0_5d4546a90e"
"#,
        )
        .unwrap();
        let src = Manifest::from_toml_str(
            r#"
[[package]]
name = "a"
version = "1.0-0"
"#,
        )
        .unwrap();

        let merged = Manifest::merge(&[bin, src]);
        assert_eq!(merged.candidates("a").len(), 2);
    }

    #[test]
    fn candidates_preserve_insertion_order() {
        let manifest = Manifest::from_toml_str(
            r#"
[[package]]
name = "a"
version = "1-0"

[[package]]
name = "a"
version = "2-0"
"#,
        )
        .unwrap();
        let versions: Vec<String> = manifest
            .candidates("a")
            .iter()
            .map(|p| p.version().to_string())
            .collect();
        assert_eq!(versions, vec!["1-0", "2-0"]);
    }

    #[test]
    fn unknown_name_has_no_candidates() {
        let manifest = Manifest::new();
        assert!(manifest.candidates("missing").is_empty());
    }

    #[test]
    fn malformed_dep_is_a_manifest_error() {
        let result = Manifest::from_toml_str(
            r#"
[[package]]
name = "a"
version = "1.0"
deps = ["b >="]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn installed_set_one_version_per_name() {
        let mut set = InstalledSet::from_toml_str(
            r#"
[[package]]
name = "a"
version = "1.2-0"
"#,
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").unwrap().version().to_string(), "1.2-0");

        let record = PackageRecord {
            name: "a".to_string(),
            version: "1.3-0".to_string(),
            deps: vec![],
            platforms: vec![],
        };
        set.insert(record.into_package().unwrap());
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").unwrap().version().to_string(), "1.3-0");
    }
}
