/// Invariant-factor normalization of finitely generated abelian groups.
pub mod invariants;
/// The projective-resolution engine.
pub mod resolution;
/// Preprocessing and the outer try-easy-then-try-hard driver.
pub mod strategy;

pub use invariants::{invariant_factors, AbelianGroup, DivisorCounter};
pub use resolution::{
    ExtendParams, HomologyParams, NodeId, ProjectiveResolution, ResolutionNode, ResolutionOptions,
};
pub use strategy::{
    integral_monoid_homology, integral_semigroup_homology, SemigroupHomologyOptions,
    StrategyOptions,
};
