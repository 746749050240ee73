//! Binary package fingerprint validation.
//!
//! A binary package's `_HEX` version suffix encodes a fingerprint of
//! the dependency closure it was built against. During resolution the
//! suffix is checked against the closure actually placed; a stale
//! binary falls through to the next candidate (usually the source
//! build of the same release).

use brig_core::package::Package;
use brig_util::hash::hex_digest;

/// Validation hook for binary candidates. The builder that produced a
/// binary may use a different fingerprint scheme; callers inject a
/// matching verifier through
/// [`ResolveOptions`](crate::resolver::ResolveOptions).
pub trait BinaryVerifier {
    /// Whether `candidate`'s encoded fingerprint agrees with the dep
    /// closure the resolver placed for it.
    ///
    /// `declared_deps` counts the dependency constraints the candidate
    /// declares on the current platform. `resolved_deps` holds the
    /// `name-version` identities freshly placed for this candidate;
    /// deps satisfied by the installed set or an earlier placement
    /// contribute nothing to it, so it can be empty while
    /// `declared_deps` is not.
    fn verify(&self, candidate: &Package, declared_deps: usize, resolved_deps: &[String]) -> bool;
}

/// Default verifier: recomputes [`closure_fingerprint`] and compares
/// it with the candidate's `_HEX` suffix.
///
/// A binary that declares no dependencies has nothing to disagree
/// with and passes. A binary whose declared deps were all satisfied
/// without fresh placement is still checked, against the empty
/// closure, so a stale suffix rejects it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintVerifier;

impl BinaryVerifier for FingerprintVerifier {
    fn verify(&self, candidate: &Package, declared_deps: usize, resolved_deps: &[String]) -> bool {
        let Some(suffix) = candidate.version().binary_hash() else {
            return true;
        };
        if declared_deps == 0 {
            return true;
        }
        closure_fingerprint(resolved_deps, suffix.len()) == suffix
    }
}

/// The fingerprint a builder encodes into a binary's version suffix:
/// lowercase-hex SHA-256 over the newline-joined, sorted `name-version`
/// identities of the dependency closure, truncated to `len` characters.
pub fn closure_fingerprint(dep_idents: &[String], len: usize) -> String {
    let mut sorted = dep_idents.to_vec();
    sorted.sort();
    hex_digest(sorted.join("\n").as_bytes(), len)
}
