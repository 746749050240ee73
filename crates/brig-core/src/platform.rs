//! Platform specifications and runtime tag filtering.
//!
//! A package either runs anywhere, or names the platform tags it
//! supports. A `!`-prefixed tag excludes a platform instead.

use std::collections::BTreeSet;

/// The runtime platform tags assumed when the caller supplies none.
pub fn default_platform_tags() -> BTreeSet<String> {
    ["unix", "linux"].into_iter().map(String::from).collect()
}

/// The set of platforms a package supports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlatformSpec {
    /// No restriction (absent or empty tag list).
    #[default]
    Any,
    Tags(Vec<PlatformTag>),
}

/// A single tag in a platform spec, possibly negated (`!win32`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTag {
    pub name: String,
    pub negated: bool,
}

impl PlatformSpec {
    /// Build a spec from raw tag strings; `!` prefixes negate.
    pub fn from_tags(tags: &[String]) -> Self {
        if tags.is_empty() {
            return PlatformSpec::Any;
        }
        PlatformSpec::Tags(
            tags.iter()
                .map(|tag| match tag.strip_prefix('!') {
                    Some(name) => PlatformTag {
                        name: name.to_string(),
                        negated: true,
                    },
                    None => PlatformTag {
                        name: tag.clone(),
                        negated: false,
                    },
                })
                .collect(),
        )
    }

    /// Test this spec against the runtime tag set.
    ///
    /// A matching negated tag rejects outright. If positive tags are
    /// present, at least one must match; a negation-only spec accepts
    /// whenever no negated tag matched.
    pub fn matches(&self, required: &BTreeSet<String>) -> bool {
        let tags = match self {
            PlatformSpec::Any => return true,
            PlatformSpec::Tags(tags) => tags,
        };
        if tags
            .iter()
            .any(|tag| tag.negated && required.contains(&tag.name))
        {
            return false;
        }
        let mut has_positive = false;
        for tag in tags.iter().filter(|tag| !tag.negated) {
            has_positive = true;
            if required.contains(&tag.name) {
                return true;
            }
        }
        !has_positive
    }
}
