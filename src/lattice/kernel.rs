use crate::error::HomologyError;
use crate::lattice::Lattice;
use crate::math::ZVector;
use num_bigint::BigInt;
use num_traits::One;
use std::rc::Rc;

/// A kernel oracle: given R column vectors over Z, return a basis for their
/// Z-relations (vectors of length R), or fail. The second argument is a
/// verbose flag. Resolutions accept any implementation, so an outer driver
/// can bound the work a single kernel job is allowed to do.
pub type KernelFn = Rc<dyn Fn(&[ZVector], bool) -> Result<Vec<ZVector>, HomologyError>>;

/// Basis for {(c_1, ..., c_R) : sum c_i * v_i = 0}, as a lattice in Z^R.
///
/// Each v_i is inserted with a standard-basis suffix in an extra Z^R block;
/// after reduction, the rows whose pivot lies in the suffix have a zero
/// prefix, so their suffix is a relation.
pub fn relations_among(vectors: &[ZVector]) -> Lattice {
    let r = vectors.len();
    if r == 0 {
        return Lattice::new(0);
    }
    let n = vectors[0].len();
    let mut augmented = Lattice::new(n + r);
    for (i, v) in vectors.iter().enumerate() {
        assert_eq!(v.len(), n, "relation input vectors must share a length");
        let mut suffix = ZVector::zero(r);
        suffix.set(i, BigInt::one());
        augmented.add_vector(&v.concat(&suffix));
    }
    let mut relations = Lattice::new(r);
    for (row, &pivot) in augmented
        .get_basis()
        .iter()
        .zip(augmented.pivot_columns())
    {
        if pivot >= n {
            let tail = ZVector::from_data(row.entries()[n..].to_vec());
            relations.add_vector(&tail);
        }
    }
    relations
}

/// The stock kernel oracle.
pub fn default_kernel(vectors: &[ZVector], verbose: bool) -> Result<Vec<ZVector>, HomologyError> {
    if vectors.is_empty() {
        return Ok(Vec::new());
    }
    let r = vectors.len();
    let n = vectors[0].len();
    let verbose = verbose || r > 1000;
    if verbose {
        eprintln!("[kernel] computing kernel of R={} x N={}", r, n);
    }
    let relations = relations_among(vectors);
    if verbose {
        eprintln!(
            "[kernel] {}x{} kernel found {} relations",
            r,
            n,
            relations.rank()
        );
    }
    Ok(relations.get_basis().to_vec())
}

/// Caps on the size of a single kernel job.
#[derive(Clone, Copy, Debug)]
pub struct KernelBounds {
    pub max_r: usize,
    pub max_n: usize,
    pub max_bits: u64,
}

/// A kernel oracle that refuses jobs over the given bounds with
/// `KernelJobTooBig`, so a catalogue driver can record the semigroup as
/// unresolved and move on.
pub fn bounded_kernel(bounds: KernelBounds) -> KernelFn {
    Rc::new(move |vectors: &[ZVector], verbose: bool| {
        if vectors.is_empty() {
            return Ok(Vec::new());
        }
        let r = vectors.len();
        let n = vectors[0].len();
        let bits = vectors.iter().map(|v| v.max_bits()).max().unwrap_or(0);
        if r > bounds.max_r || n > bounds.max_n || bits > bounds.max_bits {
            return Err(HomologyError::KernelJobTooBig {
                r,
                n,
                bits,
                max_r: bounds.max_r,
                max_n: bounds.max_n,
                max_bits: bounds.max_bits,
            });
        }
        default_kernel(vectors, verbose)
    })
}
