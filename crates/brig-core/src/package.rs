//! Immutable package records and their dependency lists.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::constraint::Constraint;
use crate::platform::PlatformSpec;
use crate::version::Version;

/// A candidate package loaded from a manifest. Immutable once built.
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    version: Version,
    deps: DependencyList,
    platforms: PlatformSpec,
    manifest_rank: usize,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        version: Version,
        deps: DependencyList,
        platforms: PlatformSpec,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            deps,
            platforms,
            manifest_rank: 0,
        }
    }

    /// Stamp the index of the manifest this package came from
    /// (lower rank = higher priority).
    pub(crate) fn with_rank(mut self, rank: usize) -> Self {
        self.manifest_rank = rank;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn manifest_rank(&self) -> usize {
        self.manifest_rank
    }

    /// The `name-version` token used in plan emission and fingerprints.
    pub fn ident(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    pub fn is_binary(&self) -> bool {
        self.version.is_binary()
    }

    pub fn supports(&self, platform_tags: &BTreeSet<String>) -> bool {
        self.platforms.matches(platform_tags)
    }

    /// The dependencies that apply on the given runtime platform,
    /// positional entries first, in declaration order.
    pub fn deps_for(&self, platform_tags: &BTreeSet<String>) -> Vec<&Constraint> {
        self.deps.for_platform(platform_tags)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// A package's dependency declarations: positional constraints plus
/// per-platform additions keyed by tag.
#[derive(Debug, Clone, Default)]
pub struct DependencyList {
    positional: Vec<Constraint>,
    platform_overrides: BTreeMap<String, Vec<Constraint>>,
}

impl DependencyList {
    pub fn new(
        positional: Vec<Constraint>,
        platform_overrides: BTreeMap<String, Vec<Constraint>>,
    ) -> Self {
        Self {
            positional,
            platform_overrides,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.platform_overrides.is_empty()
    }

    /// Positional constraints followed by the entries of every
    /// platform section whose tag is in the runtime set.
    pub fn for_platform(&self, platform_tags: &BTreeSet<String>) -> Vec<&Constraint> {
        let mut out: Vec<&Constraint> = self.positional.iter().collect();
        for (tag, extra) in &self.platform_overrides {
            if platform_tags.contains(tag) {
                out.extend(extra.iter());
            }
        }
        out
    }
}
