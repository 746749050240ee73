//! The ordered install plan produced by a successful resolution.

use std::fmt;

use brig_core::package::Package;

/// An ordered list of packages to install. Post-order: every package
/// appears after the dependencies the plan itself pulled in.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    packages: Vec<Package>,
}

impl Plan {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().any(|package| package.name() == name)
    }

    /// The textual form: space-separated canonical `name-version`
    /// tokens in install order.
    pub fn emit(&self) -> String {
        self.packages
            .iter()
            .map(Package::ident)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.emit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brig_core::manifest::PackageRecord;

    fn pkg(name: &str, version: &str) -> Package {
        PackageRecord {
            name: name.to_string(),
            version: version.to_string(),
            deps: vec![],
            platforms: vec![],
        }
        .into_package()
        .unwrap()
    }

    #[test]
    fn emit_in_order() {
        let plan = Plan::new(vec![pkg("b", "1.0-0"), pkg("a", "1.0")]);
        assert_eq!(plan.emit(), "b-1.0-0 a-1.0-0");
        assert_eq!(plan.to_string(), plan.emit());
    }

    #[test]
    fn empty_plan_emits_nothing() {
        let plan = Plan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.emit(), "");
    }

    #[test]
    fn contains_by_name() {
        let plan = Plan::new(vec![pkg("a", "1.0")]);
        assert!(plan.contains("a"));
        assert!(!plan.contains("b"));
    }
}
