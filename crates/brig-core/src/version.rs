//! Package version parsing, comparison, and constraint operators.
//!
//! Versions use a custom ordering that differs from semver:
//! - The string splits on `.` and `-`, and again wherever a digit run
//!   meets a letter run (`1.2alpha` has components `1`, `2`, `alpha`)
//! - Numeric components compare as integers
//! - Pre-release tags have a defined ordering:
//!   `work` < `alpha` < `beta` < `pre` < `rc` < release; any other
//!   alphabetic token still sorts below a plain release
//! - A trailing `-N` revision compares last, numerically
//! - A trailing `_HEX` suffix marks a binary package; it is opaque to
//!   ordering and preserved on display

use std::cmp::Ordering;
use std::fmt;

use brig_util::errors::{BrigError, BrigResult};

/// A parsed package version with comparable components.
#[derive(Debug, Clone)]
pub struct Version {
    main: String,
    components: Vec<Component>,
    revision: Option<u64>,
    binary_hash: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Component {
    Numeric(u64),
    Tag { weight: i8, text: String },
}

impl Version {
    /// Parse a version string of the form `[v]N(.N|letters)*(-R)?(_HEX)?`.
    pub fn parse(input: &str) -> BrigResult<Self> {
        let mut s = input.trim();
        if s.is_empty() {
            return Err(BrigError::Spec {
                message: "empty version string".to_string(),
            }
            .into());
        }

        if (s.starts_with('v') || s.starts_with('V'))
            && s[1..].starts_with(|c: char| c.is_ascii_digit())
        {
            s = &s[1..];
        }

        // Binary packages carry a trailing `_HEX` build fingerprint.
        let binary_hash = match s.rsplit_once('_') {
            Some((head, tail))
                if !head.is_empty()
                    && !tail.is_empty()
                    && tail.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) =>
            {
                let hash = tail.to_string();
                s = head;
                Some(hash)
            }
            _ => None,
        };

        // A trailing all-digit `-N` segment is the revision.
        let revision = match s.rsplit_once('-') {
            Some((head, tail))
                if !head.is_empty()
                    && !tail.is_empty()
                    && tail.chars().all(|c| c.is_ascii_digit()) =>
            {
                let rev = tail.parse::<u64>().map_err(|_| BrigError::Spec {
                    message: format!("revision out of range in \"{input}\""),
                })?;
                s = head;
                Some(rev)
            }
            _ => None,
        };

        let components = parse_components(s, input)?;

        Ok(Self {
            main: s.to_string(),
            components,
            revision,
            binary_hash,
        })
    }

    /// The `-N` revision, defaulting to 0 when absent.
    pub fn revision(&self) -> u64 {
        self.revision.unwrap_or(0)
    }

    /// The `_HEX` fingerprint suffix, if this is a binary package version.
    pub fn binary_hash(&self) -> Option<&str> {
        self.binary_hash.as_deref()
    }

    pub fn is_binary(&self) -> bool {
        self.binary_hash.is_some()
    }

    /// `~>` compatibility: every component of `bound` appears in `self`
    /// at the same position with an equal value, and `self >= bound`.
    ///
    /// `3.3` and `3.3.2` are compatible with `~> 3.3`; `3.4` is not.
    pub fn compatible_with(&self, bound: &Version) -> bool {
        let prefix_equal = (0..bound.components.len()).all(|i| {
            compare_components(self.components.get(i), bound.components.get(i))
                == Ordering::Equal
        });
        prefix_equal && self >= bound
    }
}

impl fmt::Display for Version {
    /// Canonical form: main components with an explicit revision
    /// (`3.3.2` prints as `3.3.2-0`) and the binary suffix if present.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.main, self.revision())?;
        if let Some(ref hash) = self.binary_hash {
            write!(f, "_{hash}")?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.components.len().max(other.components.len());
        for i in 0..max_len {
            let ord = compare_components(self.components.get(i), other.components.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.revision().cmp(&other.revision())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A dependency constraint operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// `==` or `=`: exact equality of parsed components, revision included.
    Eq,
    /// `~=`: inequality.
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `~>`: compatible-with (see [`Version::compatible_with`]).
    Compatible,
}

impl ConstraintOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Eq => "==",
            ConstraintOp::Ne => "~=",
            ConstraintOp::Lt => "<",
            ConstraintOp::Le => "<=",
            ConstraintOp::Gt => ">",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Compatible => "~>",
        }
    }

    /// Check whether `candidate` satisfies this operator against `bound`.
    pub fn matches(self, candidate: &Version, bound: &Version) -> bool {
        match self {
            ConstraintOp::Eq => candidate == bound,
            ConstraintOp::Ne => candidate != bound,
            ConstraintOp::Lt => candidate < bound,
            ConstraintOp::Le => candidate <= bound,
            ConstraintOp::Gt => candidate > bound,
            ConstraintOp::Ge => candidate >= bound,
            ConstraintOp::Compatible => candidate.compatible_with(bound),
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

fn compare_components(a: Option<&Component>, b: Option<&Component>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(c), None) => compare_component_to_missing(c),
        (None, Some(c)) => compare_component_to_missing(c).reverse(),
        (Some(a), Some(b)) => compare_two_components(a, b),
    }
}

/// A missing component counts as numeric zero, but any tag sorts below
/// it: `1.0 == 1.0.0` while `1.2alpha < 1.2`.
fn compare_component_to_missing(component: &Component) -> Ordering {
    match component {
        Component::Numeric(0) => Ordering::Equal,
        Component::Numeric(_) => Ordering::Greater,
        Component::Tag { .. } => Ordering::Less,
    }
}

fn compare_two_components(a: &Component, b: &Component) -> Ordering {
    match (a, b) {
        (Component::Numeric(a), Component::Numeric(b)) => a.cmp(b),
        (Component::Numeric(_), Component::Tag { .. }) => Ordering::Greater,
        (Component::Tag { .. }, Component::Numeric(_)) => Ordering::Less,
        (
            Component::Tag { weight: wa, text: ta },
            Component::Tag { weight: wb, text: tb },
        ) => wa.cmp(wb).then_with(|| ta.cmp(tb)),
    }
}

fn parse_components(main: &str, input: &str) -> BrigResult<Vec<Component>> {
    let mut components = Vec::new();
    for segment in main.split(['.', '-']) {
        if segment.is_empty() {
            return Err(BrigError::Spec {
                message: format!("empty segment in version \"{input}\""),
            }
            .into());
        }
        push_tokens(segment, input, &mut components)?;
    }
    Ok(components)
}

/// Split a segment at digit/letter transitions and classify each run.
fn push_tokens(segment: &str, input: &str, out: &mut Vec<Component>) -> BrigResult<()> {
    let mut rest = segment;
    while let Some(first) = rest.chars().next() {
        let run_len = if first.is_ascii_digit() {
            rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len())
        } else if first.is_ascii_alphabetic() {
            rest.find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len())
        } else {
            return Err(BrigError::Spec {
                message: format!("unexpected character {first:?} in version \"{input}\""),
            }
            .into());
        };
        let (token, tail) = rest.split_at(run_len);
        out.push(classify(token, input)?);
        rest = tail;
    }
    Ok(())
}

fn classify(token: &str, input: &str) -> BrigResult<Component> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        let value = token.parse::<u64>().map_err(|_| BrigError::Spec {
            message: format!("numeric component out of range in \"{input}\""),
        })?;
        return Ok(Component::Numeric(value));
    }
    let text = token.to_ascii_lowercase();
    let weight = match text.as_str() {
        "work" => -5,
        "alpha" => -4,
        "beta" => -3,
        "pre" => -2,
        "rc" => -1,
        _ => 0,
    };
    Ok(Component::Tag { weight, text })
}
