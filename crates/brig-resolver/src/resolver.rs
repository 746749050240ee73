//! Core resolution algorithm: depth-first traversal over the merged
//! manifest index, newest-first within manifest rank, with rollback to
//! the previous candidate when a subtree fails.

use std::collections::{BTreeSet, HashMap};

use brig_core::constraint::Constraint;
use brig_core::manifest::{InstalledSet, Manifest};
use brig_core::package::Package;
use brig_core::platform::default_platform_tags;
use brig_core::version::Version;

use crate::error::ResolveError;
use crate::fingerprint::{BinaryVerifier, FingerprintVerifier};
use crate::plan::Plan;

/// Per-call resolver configuration: the runtime platform tag set and
/// the binary validation hook.
pub struct ResolveOptions {
    pub platform_tags: BTreeSet<String>,
    pub verifier: Box<dyn BinaryVerifier>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            platform_tags: default_platform_tags(),
            verifier: Box::new(FingerprintVerifier),
        }
    }
}

impl ResolveOptions {
    pub fn with_platform_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platform_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_verifier(mut self, verifier: Box<dyn BinaryVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}

/// Resolve a request string (`"a"`, `"a = 1.0-0"`, `"a ~> 5.2"`)
/// against the given manifests, in manifest priority order.
///
/// On success the plan lists every package to install, each after the
/// dependencies it pulled in. Packages whose installed version already
/// satisfies their constraint are omitted.
pub fn resolve(
    request: &str,
    manifests: &[Manifest],
    installed: &InstalledSet,
    options: &ResolveOptions,
) -> miette::Result<Plan> {
    let constraint = Constraint::parse(request)?;
    resolve_constraint(&constraint, manifests, installed, options)
}

/// [`resolve`] for an already-parsed request.
pub fn resolve_constraint(
    request: &Constraint,
    manifests: &[Manifest],
    installed: &InstalledSet,
    options: &ResolveOptions,
) -> miette::Result<Plan> {
    let index = Manifest::merge(manifests);
    let mut session = Session {
        index: &index,
        installed,
        options,
        order: Vec::new(),
        placed: HashMap::new(),
        path: Vec::new(),
    };
    session.resolve_one(request)?;
    Ok(Plan::new(session.order))
}

/// The state of one resolve call. Nothing outlives it.
struct Session<'a> {
    index: &'a Manifest,
    installed: &'a InstalledSet,
    options: &'a ResolveOptions,
    /// The plan under construction, in install order.
    order: Vec<Package>,
    /// Names committed to `order`, with the committed version.
    placed: HashMap<String, Version>,
    /// Names on the active DFS path, for cycle reporting.
    path: Vec<String>,
}

impl Session<'_> {
    fn resolve_one(&mut self, constraint: &Constraint) -> Result<(), ResolveError> {
        let name = constraint.name();

        if let Some(pos) = self.path.iter().position(|entry| entry == name) {
            let mut cycle: Vec<&str> = self.path[pos..].iter().map(String::as_str).collect();
            cycle.push(name);
            return Err(ResolveError::CircularDependency {
                path: cycle.join(" -> "),
            });
        }

        if let Some(selected) = self.placed.get(name) {
            if constraint.satisfied_by(selected) {
                return Ok(());
            }
            return Err(ResolveError::SelectionConflict {
                name: name.to_string(),
                selected: selected.to_string(),
                requirement: constraint.requirement(),
            });
        }

        // Installed packages are closed: satisfied means nothing to
        // plan and no recursion into their deps.
        if let Some(installed) = self.installed.get(name) {
            if constraint.satisfied_by(installed.version()) {
                return Ok(());
            }
            return Err(ResolveError::InstalledMismatch {
                name: name.to_string(),
                required: constraint.requirement(),
                installed: installed.version().to_string(),
            });
        }

        let mut pool: Vec<Package> = self
            .index
            .candidates(name)
            .iter()
            .filter(|candidate| candidate.supports(&self.options.platform_tags))
            .filter(|candidate| constraint.satisfied_by(candidate.version()))
            .cloned()
            .collect();
        // Manifest rank dominates; within a rank, newest first. The
        // sort is stable, so equal versions keep insertion order.
        pool.sort_by(|a, b| {
            a.manifest_rank()
                .cmp(&b.manifest_rank())
                .then_with(|| b.version().cmp(a.version()))
        });

        if pool.is_empty() {
            return Err(ResolveError::NoCandidate {
                name: name.to_string(),
            });
        }

        let mut last_failure: Option<ResolveError> = None;
        for candidate in pool {
            let snapshot = self.order.len();
            let deps = candidate.deps_for(&self.options.platform_tags);
            let declared = deps.len();
            self.path.push(name.to_string());
            let mut failure = None;
            for dep in deps {
                if let Err(e) = self.resolve_one(dep) {
                    failure = Some(e);
                    break;
                }
            }
            self.path.pop();

            if let Some(e) = failure {
                self.rollback(snapshot);
                last_failure = Some(e);
                continue;
            }

            if candidate.is_binary() {
                let resolved: Vec<String> =
                    self.order[snapshot..].iter().map(Package::ident).collect();
                if !self.options.verifier.verify(&candidate, declared, &resolved) {
                    self.rollback(snapshot);
                    continue;
                }
            }

            self.placed
                .insert(name.to_string(), candidate.version().clone());
            self.order.push(candidate);
            return Ok(());
        }

        Err(last_failure.unwrap_or(ResolveError::NoCandidate {
            name: name.to_string(),
        }))
    }

    /// Undo every placement made after `snapshot`, restoring the state
    /// from before the current candidate attempt.
    fn rollback(&mut self, snapshot: usize) {
        for package in self.order.drain(snapshot..) {
            self.placed.remove(package.name());
        }
    }
}
