//! # Semigroup Homology
//!
//! Computes the integral homology groups H_0(S;Z), ..., H_d(S;Z) of a finite
//! semigroup S given as a multiplication table, by incrementally building a
//! projective resolution of the trivial module Z over the integral semigroup
//! ring Z[S], tensoring with a right S-set module, and extracting invariant
//! factors of the resulting abelian groups.
//!
//! ## Overview
//!
//! The pipeline is: **multiplication table → preprocessing (adjoin an
//! identity, pass to an equivalent submonoid) → projective resolution (a
//! memoized DAG of free-module nodes, extended dimension by dimension) →
//! tensor with a right S-set → invariant factors**.
//!
//! All integer arithmetic is arbitrary precision; resolutions with
//! exponentially growing chain groups stay tractable through node caching and
//! shift-memoized homology accumulation.

/// Arbitrary-precision integer vectors and index-shuffle actions.
pub mod math;
/// Row-reduced integer lattices: incremental insertion, Smith normal form,
/// relation kernels, block decomposition.
pub mod lattice;
/// Minimum-cost generating-subset selection for Z[S]-submodules.
pub mod cover;
/// Projective resolutions, homology extraction, invariant factors, and the
/// outer strategy driver.
pub mod homology;
/// Error type shared across the crate.
pub mod error;
/// Base-36 multiplication-table codec used by the command-line front-end.
pub mod table;

pub use error::HomologyError;
pub use homology::strategy::integral_semigroup_homology;
