//! Dependency constraint parsing: `"name"`, `"name OP version"`, or
//! `"name version"` (bare version implies `==`).

use std::fmt;

use brig_util::errors::{BrigError, BrigResult};

use crate::version::{ConstraintOp, Version};

/// Recognized operators, longest match first. `=` aliases `==`.
const OPERATORS: [(&str, ConstraintOp); 8] = [
    ("==", ConstraintOp::Eq),
    ("~=", ConstraintOp::Ne),
    ("<=", ConstraintOp::Le),
    (">=", ConstraintOp::Ge),
    ("~>", ConstraintOp::Compatible),
    ("<", ConstraintOp::Lt),
    (">", ConstraintOp::Gt),
    ("=", ConstraintOp::Eq),
];

/// A requirement on a named package: an optional operator and version.
///
/// A constraint without an operator carries no version and matches any
/// version of the package.
#[derive(Debug, Clone)]
pub struct Constraint {
    name: String,
    op: Option<ConstraintOp>,
    version: Option<Version>,
}

impl Constraint {
    /// A constraint matching any version of `name`.
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: None,
            version: None,
        }
    }

    pub fn new(name: impl Into<String>, op: ConstraintOp, version: Version) -> Self {
        Self {
            name: name.into(),
            op: Some(op),
            version: Some(version),
        }
    }

    /// Parse a dependency string. Whitespace around the operator is
    /// optional; `"name 1.0"` parses as `"name == 1.0"`.
    pub fn parse(input: &str) -> BrigResult<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(BrigError::Spec {
                message: "empty dependency specification".to_string(),
            }
            .into());
        }

        for (symbol, op) in OPERATORS {
            if let Some(pos) = s.find(symbol) {
                let name = s[..pos].trim();
                let ver = s[pos + symbol.len()..].trim();
                if name.is_empty() || ver.is_empty() {
                    return Err(BrigError::Spec {
                        message: format!("unparseable dependency \"{input}\""),
                    }
                    .into());
                }
                return Ok(Self::new(name, op, Version::parse(ver)?));
            }
        }

        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), None, _) => Ok(Self::any(name)),
            (Some(name), Some(ver), None) => {
                Ok(Self::new(name, ConstraintOp::Eq, Version::parse(ver)?))
            }
            _ => Err(BrigError::Spec {
                message: format!("unparseable dependency \"{input}\""),
            }
            .into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn op(&self) -> Option<ConstraintOp> {
        self.op
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Check whether a concrete version satisfies this constraint.
    pub fn satisfied_by(&self, version: &Version) -> bool {
        match (self.op, &self.version) {
            (Some(op), Some(bound)) => op.matches(version, bound),
            _ => true,
        }
    }

    /// The requirement portion without the name, for diagnostics:
    /// `"any"`, `"1.0-0"` (exact), or `">= 1.4-0"`.
    pub fn requirement(&self) -> String {
        match (self.op, &self.version) {
            (Some(ConstraintOp::Eq), Some(version)) => version.to_string(),
            (Some(op), Some(version)) => format!("{op} {version}"),
            _ => "any".to_string(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.op, &self.version) {
            (Some(op), Some(version)) => write!(f, "{} {op} {version}", self.name),
            _ => f.write_str(&self.name),
        }
    }
}
