//! Core data types for the brig package manager.
//!
//! This crate defines the data model consumed by the resolver: version
//! parsing and ordering, dependency constraints, platform specifications,
//! packages, manifest indexes, and the installed-package set.
//!
//! This crate is intentionally free of resolution logic and I/O; manifests
//! arrive as already-materialized documents.

pub mod constraint;
pub mod manifest;
pub mod package;
pub mod platform;
pub mod version;
