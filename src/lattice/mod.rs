/// Relation kernels and the pluggable kernel oracle.
pub mod kernel;
/// Row-reduced integer sublattices with incremental insertion.
pub mod lattice;
/// Smith normal form over Z.
pub mod smith;

pub use kernel::{bounded_kernel, default_kernel, relations_among, KernelBounds, KernelFn};
pub use lattice::Lattice;
