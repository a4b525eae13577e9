use crate::error::HomologyError;
use crate::lattice::Lattice;
use crate::math::{Action, ZVector};
use std::collections::BTreeSet;

/// Knobs for the generating-subset search. `extra_greedy` runs the greedy
/// selection phase before the shrinking passes; `ensure_minimal` verifies
/// inclusion-minimality of the result.
#[derive(Clone, Copy, Debug)]
pub struct CoverParams {
    pub extra_greedy: bool,
    pub ensure_minimal: bool,
    pub verbose: bool,
}

/// Given a Z-basis of a rank-R sublattice K of Z^n that is closed under the
/// shuffle actions, pick a low-cost subset of the basis whose images under
/// the actions Z-span all of K. Returns indices into `zbasis`, ordered by
/// the internal work order (increasing cost when the greedy phase is off).
pub fn find_generating_subset(
    n: usize,
    zbasis: &[ZVector],
    actions: &[Action],
    costs: &[usize],
    params: &CoverParams,
) -> Result<Vec<usize>, HomologyError> {
    let r = zbasis.len();
    if r == 0 {
        return Ok(Vec::new());
    }
    for (index, v) in zbasis.iter().enumerate() {
        if v.len() != n {
            return Err(HomologyError::BasisWidthMismatch {
                index,
                len: v.len(),
                expected: n,
            });
        }
    }
    for action in actions {
        assert_eq!(action.len(), n, "action length mismatches basis width");
        assert!(
            action.targets().iter().all(|&t| t < n),
            "action target out of range"
        );
    }
    assert_eq!(costs.len(), r, "one cost per basis vector");

    if params.verbose {
        eprintln!("[cover] covering a rank-{} sublattice of Z^{}", r, n);
    }

    // Work order: stable by increasing cost, unless the greedy phase will
    // pick its own order anyway.
    let mut order: Vec<usize> = (0..r).collect();
    if !params.extra_greedy {
        order.sort_by_key(|&i| costs[i]);
        if params.verbose {
            eprintln!("[cover] sorted by increasing cost");
        }
    }
    let work: Vec<&ZVector> = order.iter().map(|&i| &zbasis[i]).collect();
    let work_costs: Vec<usize> = order.iter().map(|&i| costs[i]).collect();

    // Relativize: express everything in K-coordinates, so vectors are
    // shorter and fewer columns lack a pivot.
    let mut k = Lattice::new(n);
    for v in &work {
        k.add_vector(v);
    }
    assert_eq!(k.rank(), r, "generating-subset input must be a basis");
    let mut relative_vectors: Vec<ZVector> = Vec::with_capacity(r);
    let mut relative_lattices: Vec<Option<Lattice>> = Vec::with_capacity(r);
    for v in &work {
        relative_vectors.push(
            k.coefficients_of(v)
                .expect("basis vector escaped its own span"),
        );
        let mut action_lattice = Lattice::with_maxrank(r, actions.len());
        for action in actions {
            let image = v.shuffled_by_action(action, n);
            let coefficients = k
                .coefficients_of(&image)
                .expect("action image escaped the spanned sublattice");
            action_lattice.add_vector(&coefficients);
        }
        // Rebuild from the reduced basis to trim memory.
        let mut trimmed = Lattice::with_maxrank(r, action_lattice.rank());
        for row in action_lattice.get_basis() {
            trimmed.add_vector(row);
        }
        relative_lattices.push(Some(trimmed));
    }
    if params.verbose {
        eprintln!("[cover] relativized");
    }

    shuffle_columns(r, &mut relative_vectors, &mut relative_lattices);
    if params.verbose {
        eprintln!("[cover] shuffled columns");
    }

    let mut solution: Vec<usize> = if params.extra_greedy {
        greedy_cover(
            r,
            &relative_vectors,
            &relative_lattices,
            &work_costs,
            params.verbose,
        )
    } else {
        (0..r).collect()
    };
    solution = one_pass_cover(
        r,
        &solution,
        &relative_vectors,
        &mut relative_lattices,
        params.verbose,
    );
    let reversed: Vec<usize> = solution.iter().rev().copied().collect();
    solution = one_pass_cover(
        r,
        &reversed,
        &relative_vectors,
        &mut relative_lattices,
        params.verbose,
    );
    if params.ensure_minimal {
        solution = minimality_pass(
            r,
            &solution,
            &relative_vectors,
            &relative_lattices,
            params.verbose,
        );
    }
    solution.sort_unstable();
    Ok(solution.into_iter().map(|i| order[i]).collect())
}

/// Relabel columns so the least-used ones come first, biasing pivots toward
/// rare columns. One global permutation, applied identically to every
/// relative vector and every action-lattice basis row.
fn shuffle_columns(
    r: usize,
    relative_vectors: &mut [ZVector],
    relative_lattices: &mut [Option<Lattice>],
) {
    let mut scores: Vec<u64> = vec![0; r];
    for slot in relative_lattices.iter() {
        let lattice = slot.as_ref().unwrap();
        for row in lattice.get_basis() {
            for (j, entry) in row.entries().iter().enumerate() {
                if !num_traits::Zero::is_zero(entry) {
                    scores[j] += 10_000_000 + entry.magnitude().bits();
                }
            }
        }
    }
    let mut columns: Vec<usize> = (0..r).collect();
    columns.sort_by_key(|&j| scores[j]);
    let mut targets = vec![0usize; r];
    for (position, &column) in columns.iter().enumerate() {
        targets[column] = position;
    }
    let sort_action = Action::new(targets);
    for v in relative_vectors.iter_mut() {
        *v = v.shuffled_by_action(&sort_action, r);
    }
    for slot in relative_lattices.iter_mut() {
        let lattice = slot.take().unwrap();
        let mut relabeled = Lattice::with_maxrank(r, lattice.rank());
        for row in lattice.get_basis().iter().rev() {
            relabeled.add_vector(&row.shuffled_by_action(&sort_action, r));
        }
        *slot = Some(relabeled);
    }
}

/// Add the most efficient remaining vector at every step until everything
/// is covered. Efficiency is newly-covered-count / (0.001 + cost), compared
/// exactly by integer cross-multiplication; ties go to the lowest index.
fn greedy_cover(
    r: usize,
    relative_vectors: &[ZVector],
    relative_lattices: &[Option<Lattice>],
    costs: &[usize],
    verbose: bool,
) -> Vec<usize> {
    let mut solution = Vec::new();
    let mut uncovered: BTreeSet<usize> = (0..r).collect();
    let mut current = Lattice::new(r);
    while !uncovered.is_empty() {
        let mut best: Option<(usize, Vec<usize>, Lattice)> = None;
        for &i in &uncovered {
            let candidate = &current + relative_lattices[i].as_ref().unwrap();
            let newly_covered: Vec<usize> = uncovered
                .iter()
                .copied()
                .filter(|&j| candidate.contains(&relative_vectors[j]))
                .collect();
            let better = match &best {
                None => true,
                Some((best_index, best_covered, _)) => {
                    // n1/(0.001+c1) > n2/(0.001+c2), scaled by 1000.
                    (newly_covered.len() as u128) * (1000 * costs[*best_index] as u128 + 1)
                        > (best_covered.len() as u128) * (1000 * costs[i] as u128 + 1)
                }
            };
            if better {
                best = Some((i, newly_covered, candidate));
            }
        }
        let (index, newly_covered, merged) = best.expect("uncovered set was nonempty");
        solution.push(index);
        for j in &newly_covered {
            uncovered.remove(j);
        }
        current = merged;
    }
    if verbose {
        eprintln!("[cover] greedy solution has {} vectors", solution.len());
    }
    solution
}

/// Walk the candidate list, keeping only vectors not already covered by the
/// previously kept vectors' action lattices.
fn one_pass_cover(
    r: usize,
    existing: &[usize],
    relative_vectors: &[ZVector],
    relative_lattices: &mut [Option<Lattice>],
    verbose: bool,
) -> Vec<usize> {
    let mut kept = Vec::new();
    let mut covered = Lattice::new(r);
    for &i in existing {
        if covered.contains(&relative_vectors[i]) {
            relative_lattices[i] = None;
        } else {
            covered += relative_lattices[i].as_ref().unwrap();
            kept.push(i);
        }
    }
    if verbose {
        eprintln!("[cover] shrank solution {} --> {}", existing.len(), kept.len());
    }
    kept
}

/// Keep only those vectors not covered by all the others, using prefix and
/// suffix sums of the kept action lattices.
fn minimality_pass(
    r: usize,
    existing: &[usize],
    relative_vectors: &[ZVector],
    relative_lattices: &[Option<Lattice>],
    verbose: bool,
) -> Vec<usize> {
    let mut suffix_sums: Vec<Lattice> = vec![Lattice::with_maxrank(r, 0)];
    for &i in existing.iter().rev() {
        let next = suffix_sums.last().unwrap() + relative_lattices[i].as_ref().unwrap();
        suffix_sums.push(next);
    }
    let mut prefix = Lattice::new(r);
    let mut kept = Vec::new();
    for (position, &i) in existing.iter().enumerate() {
        let suffix = &suffix_sums[existing.len() - position - 1];
        let without_i = &prefix + suffix;
        if !without_i.contains(&relative_vectors[i]) {
            prefix += relative_lattices[i].as_ref().unwrap();
            kept.push(i);
        }
    }
    if verbose {
        eprintln!(
            "[cover] minimality pass: {} --> {}",
            existing.len(),
            kept.len()
        );
    }
    kept
}

/// Cover a submodule given the ambient actions: find each basis vector's
/// fixer idempotent (searched in ascending |Se| order), cost it by |Se|,
/// and return the chosen generator images with their idempotent list.
pub fn cover_submodule_with_actions(
    n: usize,
    zbasis: &[ZVector],
    actions: &[Action],
    idempotents: &[usize],
    se_len: &[usize],
    params: &CoverParams,
) -> Result<(Vec<ZVector>, Vec<usize>), HomologyError> {
    let mut fixers = Vec::with_capacity(zbasis.len());
    for v in zbasis {
        let fixer = idempotents
            .iter()
            .copied()
            .find(|&e| v.shuffled_by_action(&actions[e], n) == *v)
            .unwrap_or_else(|| panic!("no idempotent action fixes basis vector {}", v));
        fixers.push(fixer);
    }
    let costs: Vec<usize> = fixers.iter().map(|&e| se_len[e]).collect();
    let subset = find_generating_subset(n, zbasis, actions, &costs, params)?;
    let module: Vec<usize> = subset.iter().map(|&i| fixers[i]).collect();
    let e_images: Vec<ZVector> = subset.iter().map(|&i| zbasis[i].clone()).collect();
    Ok((e_images, module))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(entries: &[i64]) -> ZVector {
        ZVector::from_i64s(entries)
    }

    fn actions(tables: &[&[usize]]) -> Vec<Action> {
        tables.iter().map(|t| Action::new(t.to_vec())).collect()
    }

    #[test]
    fn test_cover_rectangular_band_augmentation_kernel() {
        // Kernel of the augmentation Z <-- ZM for M the 2x2 rectangular
        // band with a unit: two generators suffice, one per row class.
        let zbasis = vec![
            v(&[1, 0, 0, 0, -1]),
            v(&[0, 1, 0, 0, -1]),
            v(&[0, 0, 1, 0, -1]),
            v(&[0, 0, 0, 1, -1]),
        ];
        let acts = actions(&[
            &[0, 1, 0, 1, 0],
            &[0, 1, 0, 1, 1],
            &[2, 3, 2, 3, 2],
            &[2, 3, 2, 3, 3],
            &[0, 1, 2, 3, 4],
        ]);
        let subset = find_generating_subset(
            5,
            &zbasis,
            &acts,
            &[5, 5, 5, 5],
            &CoverParams {
                extra_greedy: true,
                ensure_minimal: true,
                verbose: false,
            },
        )
        .unwrap();
        assert_eq!(subset, vec![0, 2]);
    }

    #[test]
    fn test_cover_single_generator() {
        let subset = find_generating_subset(
            2,
            &[v(&[1, -1])],
            &actions(&[&[0, 0], &[0, 0], &[1, 1], &[1, 1], &[0, 1]]),
            &[5],
            &CoverParams {
                extra_greedy: true,
                ensure_minimal: false,
                verbose: false,
            },
        )
        .unwrap();
        assert_eq!(subset, vec![0]);
    }

    #[test]
    fn test_cover_trivial() {
        let subset = find_generating_subset(
            1,
            &[v(&[1])],
            &actions(&[&[0], &[0], &[0], &[0], &[0]]),
            &[1],
            &CoverParams {
                extra_greedy: false,
                ensure_minimal: false,
                verbose: false,
            },
        )
        .unwrap();
        assert_eq!(subset, vec![0]);
    }

    #[test]
    fn test_cover_empty_basis() {
        let subset = find_generating_subset(
            3,
            &[],
            &actions(&[&[0, 1, 2]]),
            &[],
            &CoverParams {
                extra_greedy: false,
                ensure_minimal: true,
                verbose: false,
            },
        )
        .unwrap();
        assert!(subset.is_empty());
    }

    #[test]
    fn test_cover_width_mismatch() {
        let err = find_generating_subset(
            3,
            &[v(&[1, 0])],
            &actions(&[&[0, 1, 2]]),
            &[1],
            &CoverParams {
                extra_greedy: false,
                ensure_minimal: false,
                verbose: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, HomologyError::BasisWidthMismatch { .. }));
    }
}
