use crate::lattice::smith;
use crate::math::ZVector;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use std::ops::{Add, AddAssign};

/// A sublattice of Z^width kept in row-echelon form.
///
/// Stored rows have strictly increasing pivot columns, the pivot entry of
/// each row is positive, and the entries of other rows in a pivot column are
/// reduced modulo the pivot. `maxrank`, when set, turns `add_vector` into a
/// no-op once the rank reaches it; callers only use it with a proven bound
/// on the final rank, so the skipped work cannot change the result.
#[derive(Clone, Debug)]
pub struct Lattice {
    width: usize,
    rows: Vec<ZVector>,
    pivots: Vec<usize>,
    maxrank: Option<usize>,
}

impl Lattice {
    pub fn new(width: usize) -> Self {
        Lattice {
            width,
            rows: Vec::new(),
            pivots: Vec::new(),
            maxrank: None,
        }
    }

    pub fn with_maxrank(width: usize, maxrank: usize) -> Self {
        Lattice {
            width,
            rows: Vec::new(),
            pivots: Vec::new(),
            maxrank: Some(maxrank),
        }
    }

    pub fn from_vectors(width: usize, vectors: &[ZVector]) -> Self {
        let mut lattice = Lattice::new(width);
        for v in vectors {
            lattice.add_vector(v);
        }
        lattice
    }

    /// All of Z^width.
    pub fn full(width: usize) -> Self {
        let mut lattice = Lattice::new(width);
        for i in 0..width {
            let mut row = ZVector::zero(width);
            row.set(i, BigInt::from(1));
            lattice.rows.push(row);
            lattice.pivots.push(i);
        }
        lattice
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    pub fn maxrank(&self) -> Option<usize> {
        self.maxrank
    }

    pub fn get_basis(&self) -> &[ZVector] {
        &self.rows
    }

    pub fn pivot_columns(&self) -> &[usize] {
        &self.pivots
    }

    /// Reduce v against the stored rows by floor division at each pivot
    /// column, in increasing pivot order.
    fn reduce_vector(&self, v: &mut ZVector) {
        for (row, &p) in self.rows.iter().zip(self.pivots.iter()) {
            let vp = v.get(p);
            if !vp.is_zero() {
                let q = vp.div_floor(row.get(p));
                if !q.is_zero() {
                    v.subtract_scaled_assign(row, &q);
                }
            }
        }
    }

    /// Reduce the other rows' entries at the pivot column of rows[pos].
    fn reduce_rows_against(&mut self, pos: usize) {
        let p = self.pivots[pos];
        let pivot_row = self.rows[pos].clone();
        let pivot_val = pivot_row.get(p).clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == pos {
                continue;
            }
            let rp = row.get(p);
            if !rp.is_zero() {
                let q = rp.div_floor(&pivot_val);
                if !q.is_zero() {
                    row.subtract_scaled_assign(&pivot_row, &q);
                }
            }
        }
    }

    /// Add v to the lattice. Returns true iff the rank grew.
    pub fn add_vector(&mut self, v: &ZVector) -> bool {
        assert_eq!(v.len(), self.width, "vector length mismatches lattice width");
        let initial_rank = self.rows.len();
        let mut work: Vec<ZVector> = vec![v.clone()];
        while let Some(mut v) = work.pop() {
            loop {
                self.reduce_vector(&mut v);
                let q = match v.first_nonzero() {
                    None => break,
                    Some(q) => q,
                };
                match self.pivots.binary_search(&q) {
                    Err(pos) => {
                        // New pivot column.
                        if let Some(maxrank) = self.maxrank {
                            if self.rows.len() >= maxrank {
                                break;
                            }
                        }
                        if v.get(q).is_negative() {
                            v.negate_assign();
                        }
                        self.rows.insert(pos, v);
                        self.pivots.insert(pos, q);
                        self.reduce_rows_against(pos);
                        break;
                    }
                    Ok(pos) => {
                        // The column is occupied and the occupant's pivot
                        // does not divide v[q] (reduction left a remainder):
                        // replace the pair by a unimodular combination whose
                        // leading entry is the gcd, and re-insert the carry.
                        let pivot_val = self.rows[pos].get(q).clone();
                        let vq = v.get(q).clone();
                        let ext = pivot_val.extended_gcd(&vq);
                        let old = self.rows.remove(pos);
                        self.pivots.remove(pos);
                        let mut combined = old.multiply_bigint(&ext.x);
                        let scaled = v.multiply_bigint(&ext.y);
                        combined.add_assign(&scaled);
                        let mut carry = v.multiply_bigint(&(&pivot_val / &ext.gcd));
                        carry.subtract_scaled_assign(&old, &(&vq / &ext.gcd));
                        debug_assert!(carry.get(q).is_zero());
                        work.push(carry);
                        v = combined;
                    }
                }
            }
        }
        self.rows.len() > initial_rank
    }

    pub fn contains(&self, v: &ZVector) -> bool {
        assert_eq!(v.len(), self.width, "vector length mismatches lattice width");
        let mut v = v.clone();
        self.reduce_vector(&mut v);
        v.is_zero()
    }

    /// Coefficients of v in the stored basis, or None when v is outside the
    /// lattice. The result has length `rank`.
    pub fn coefficients_of(&self, v: &ZVector) -> Option<ZVector> {
        assert_eq!(v.len(), self.width, "vector length mismatches lattice width");
        let mut v = v.clone();
        let mut coefficients = ZVector::zero(self.rank());
        for (k, (row, &p)) in self.rows.iter().zip(self.pivots.iter()).enumerate() {
            let vp = v.get(p);
            if !vp.is_zero() {
                let q = vp.div_floor(row.get(p));
                if !q.is_zero() {
                    v.subtract_scaled_assign(row, &q);
                    coefficients.set(k, q);
                }
            }
        }
        if v.is_zero() {
            Some(coefficients)
        } else {
            None
        }
    }

    /// The nonzero diagonal of the Smith normal form of the current basis,
    /// as a divisibility chain d1 | d2 | ... of length `rank`. Divisor-1
    /// entries are included; their count carries the rank information the
    /// homology accounting needs.
    pub fn nonzero_invariants(&self) -> Vec<BigInt> {
        smith::smith_invariants(&self.rows, self.width)
    }

    /// Partition the columns into the given groups, merge groups
    /// transitively whenever a basis row touches more than one, and return
    /// each non-trivially-hit merged component as its flat column list plus
    /// the sublattice restricted to those columns.
    pub fn decompose(&self, groups: &[Vec<usize>]) -> Vec<(Vec<usize>, Lattice)> {
        let mut col_to_group = vec![usize::MAX; self.width];
        for (g, cols) in groups.iter().enumerate() {
            for &c in cols {
                assert!(c < self.width, "group column {} out of range", c);
                assert_eq!(col_to_group[c], usize::MAX, "column {} listed twice", c);
                col_to_group[c] = g;
            }
        }
        for (c, &g) in col_to_group.iter().enumerate() {
            assert_ne!(g, usize::MAX, "column {} missing from the partition", c);
        }

        let mut parent: Vec<usize> = (0..groups.len()).collect();
        fn find(parent: &mut Vec<usize>, mut g: usize) -> usize {
            while parent[g] != g {
                parent[g] = parent[parent[g]];
                g = parent[g];
            }
            g
        }
        for row in &self.rows {
            let mut first: Option<usize> = None;
            for (c, entry) in row.entries().iter().enumerate() {
                if entry.is_zero() {
                    continue;
                }
                let g = find(&mut parent, col_to_group[c]);
                match first {
                    None => first = Some(g),
                    Some(f) => {
                        let f = find(&mut parent, f);
                        parent[g.max(f)] = g.min(f);
                        first = Some(g.min(f));
                    }
                }
            }
        }

        // Component = the sorted groups sharing a root, ordered by their
        // smallest member group.
        let mut root_to_groups: Vec<(usize, Vec<usize>)> = Vec::new();
        for g in 0..groups.len() {
            let root = find(&mut parent, g);
            match root_to_groups.iter_mut().find(|(r, _)| *r == root) {
                Some((_, members)) => members.push(g),
                None => root_to_groups.push((root, vec![g])),
            }
        }
        root_to_groups.sort_by_key(|(_, members)| members[0]);

        let mut result = Vec::new();
        for (root, members) in root_to_groups {
            let mut columns: Vec<usize> = Vec::new();
            for &g in &members {
                columns.extend_from_slice(&groups[g]);
            }
            let mut col_pos = vec![usize::MAX; self.width];
            for (pos, &c) in columns.iter().enumerate() {
                col_pos[c] = pos;
            }
            let mut sublattice = Lattice::new(columns.len());
            for (row, &p) in self.rows.iter().zip(self.pivots.iter()) {
                if find(&mut parent, col_to_group[p]) != root {
                    continue;
                }
                let mut restricted = ZVector::zero(columns.len());
                for (c, entry) in row.entries().iter().enumerate() {
                    if !entry.is_zero() {
                        restricted.set(col_pos[c], entry.clone());
                    }
                }
                sublattice.add_vector(&restricted);
            }
            if sublattice.rank() > 0 {
                result.push((columns, sublattice));
            }
        }
        result
    }
}

impl AddAssign<&Lattice> for Lattice {
    fn add_assign(&mut self, other: &Lattice) {
        assert_eq!(self.width, other.width, "lattice width mismatch in sum");
        self.maxrank = match (self.maxrank, other.maxrank) {
            (Some(a), Some(b)) => Some((a + b).min(self.width)),
            _ => None,
        };
        for row in &other.rows {
            self.add_vector(row);
        }
    }
}

impl Add<&Lattice> for &Lattice {
    type Output = Lattice;

    fn add(self, other: &Lattice) -> Lattice {
        let mut result = self.clone();
        result += other;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(entries: &[i64]) -> ZVector {
        ZVector::from_i64s(entries)
    }

    #[test]
    fn test_add_vector_and_contains() {
        let mut lattice = Lattice::new(3);
        assert!(lattice.add_vector(&v(&[2, 4, 6])));
        assert!(lattice.contains(&v(&[2, 4, 6])));
        assert!(lattice.contains(&v(&[-4, -8, -12])));
        assert!(!lattice.contains(&v(&[1, 2, 3])));
        assert!(!lattice.add_vector(&v(&[4, 8, 12])));
        assert_eq!(lattice.rank(), 1);
        assert!(lattice.add_vector(&v(&[0, 1, 0])));
        assert_eq!(lattice.rank(), 2);
        assert!(lattice.contains(&v(&[2, 7, 6])));
    }

    #[test]
    fn test_gcd_refinement_keeps_rank() {
        // (4) and (6) together span (2) without the rank growing.
        let mut lattice = Lattice::new(1);
        assert!(lattice.add_vector(&v(&[4])));
        assert!(!lattice.add_vector(&v(&[6])));
        assert_eq!(lattice.rank(), 1);
        assert_eq!(lattice.get_basis(), &[v(&[2])]);
        assert!(lattice.contains(&v(&[6])));
        assert!(lattice.contains(&v(&[4])));
    }

    #[test]
    fn test_pivot_invariants_after_insertion() {
        let mut lattice = Lattice::new(4);
        for row in [
            v(&[0, 3, 1, 5]),
            v(&[2, 1, 1, 1]),
            v(&[0, 0, 7, -2]),
            v(&[2, 4, 2, 6]),
        ] {
            lattice.add_vector(&row);
        }
        let pivots = lattice.pivot_columns();
        assert!(pivots.windows(2).all(|w| w[0] < w[1]));
        for (row, &p) in lattice.get_basis().iter().zip(pivots) {
            assert_eq!(row.first_nonzero(), Some(p));
            assert!(row.get(p) > &BigInt::from(0));
        }
        // Off-pivot entries in a pivot column are reduced modulo the pivot.
        for (k, &p) in pivots.iter().enumerate() {
            let pivot = lattice.get_basis()[k].get(p).clone();
            for (i, row) in lattice.get_basis().iter().enumerate() {
                if i != k {
                    let e = row.get(p);
                    assert!(e >= &BigInt::from(0) && e < &pivot);
                }
            }
        }
    }

    #[test]
    fn test_coefficients_of() {
        let mut lattice = Lattice::new(3);
        lattice.add_vector(&v(&[1, 0, 2]));
        lattice.add_vector(&v(&[0, 3, 1]));
        let target = v(&[2, 9, 7]);
        let coefficients = lattice.coefficients_of(&target).unwrap();
        let mut recombined = ZVector::zero(3);
        for (c, row) in coefficients.entries().iter().zip(lattice.get_basis()) {
            recombined.add_assign(&row.multiply_bigint(c));
        }
        assert_eq!(recombined, target);
        assert!(lattice.coefficients_of(&v(&[0, 0, 1])).is_none());
    }

    #[test]
    fn test_maxrank_short_circuit() {
        let mut lattice = Lattice::with_maxrank(3, 1);
        assert!(lattice.add_vector(&v(&[1, 0, 0])));
        assert!(!lattice.add_vector(&v(&[0, 1, 0])));
        assert_eq!(lattice.rank(), 1);
    }

    #[test]
    fn test_sum() {
        let a = Lattice::from_vectors(2, &[v(&[2, 0])]);
        let b = Lattice::from_vectors(2, &[v(&[0, 3])]);
        let sum = &a + &b;
        assert_eq!(sum.rank(), 2);
        assert!(sum.contains(&v(&[2, 3])));
        assert!(!sum.contains(&v(&[1, 0])));
    }

    #[test]
    fn test_nonzero_invariants() {
        let lattice = Lattice::from_vectors(2, &[v(&[2, 0]), v(&[0, 2])]);
        assert_eq!(
            lattice.nonzero_invariants(),
            vec![BigInt::from(2), BigInt::from(2)]
        );
        let saturated = Lattice::from_vectors(3, &[v(&[1, 2, 3]), v(&[0, 1, 7])]);
        assert_eq!(
            saturated.nonzero_invariants(),
            vec![BigInt::from(1), BigInt::from(1)]
        );
        assert!(Lattice::new(4).nonzero_invariants().is_empty());
    }

    #[test]
    fn test_full() {
        let lattice = Lattice::full(3);
        assert_eq!(lattice.rank(), 3);
        assert!(lattice.contains(&v(&[5, -7, 11])));
    }

    #[test]
    fn test_decompose_splits_by_block() {
        // Rows living in columns {0,1} and {2,3} separately.
        let lattice = Lattice::from_vectors(4, &[v(&[1, 2, 0, 0]), v(&[0, 0, 3, 1])]);
        let groups = vec![vec![0, 1], vec![2, 3]];
        let parts = lattice.decompose(&groups);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0, vec![0, 1]);
        assert_eq!(parts[0].1.get_basis(), &[v(&[1, 2])]);
        assert_eq!(parts[1].0, vec![2, 3]);
        assert_eq!(parts[1].1.get_basis(), &[v(&[3, 1])]);
    }

    #[test]
    fn test_decompose_merges_crossing_groups() {
        // The middle row crosses both groups, so they merge into one
        // component covering all columns.
        let lattice = Lattice::from_vectors(
            4,
            &[v(&[1, 2, 0, 0]), v(&[0, 1, 1, 0]), v(&[0, 0, 3, 1])],
        );
        let groups = vec![vec![0, 1], vec![2, 3]];
        let parts = lattice.decompose(&groups);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].0, vec![0, 1, 2, 3]);
        assert_eq!(parts[0].1.rank(), 3);
    }

    #[test]
    fn test_decompose_skips_untouched_groups() {
        let lattice = Lattice::from_vectors(4, &[v(&[0, 0, 5, 0])]);
        let groups = vec![vec![0, 1], vec![2, 3]];
        let parts = lattice.decompose(&groups);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].0, vec![2, 3]);
    }
}
