use crate::error::HomologyError;
use crate::homology::invariants::AbelianGroup;
use crate::homology::resolution::{
    validate_table, ExtendParams, HomologyParams, ProjectiveResolution, ResolutionOptions,
};
use crate::lattice::kernel::KernelFn;
use std::collections::BTreeSet;

/// Options for the monoid-level driver.
pub struct StrategyOptions {
    /// How deep to extend candidate resolutions before judging their size;
    /// defaults to min(4, maxdim - 2), clamped at 0.
    pub peek_dimension: Option<usize>,
    /// Cost at the peek below which the first resolution is kept as-is.
    pub min_size_to_try_harder: usize,
    pub verbose: bool,
    pub kernel: Option<KernelFn>,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        StrategyOptions {
            peek_dimension: None,
            min_size_to_try_harder: 20,
            verbose: false,
            kernel: None,
        }
    }
}

/// Options for the semigroup-level entry point.
pub struct SemigroupHomologyOptions {
    pub left_action: Option<Vec<Vec<usize>>>,
    pub right_action: Option<Vec<Vec<usize>>>,
    pub verbose: bool,
    pub kernel: Option<KernelFn>,
}

impl Default for SemigroupHomologyOptions {
    fn default() -> Self {
        SemigroupHomologyOptions {
            left_action: None,
            right_action: None,
            verbose: false,
            kernel: None,
        }
    }
}

/// Relabel the table by the permutation g, optionally flipping the
/// multiplication order.
fn permute_op(op: &[Vec<usize>], g: &[usize], flip: bool) -> Vec<Vec<usize>> {
    let n = op.len();
    let mut g_inv = vec![0; n];
    for (i, &gi) in g.iter().enumerate() {
        g_inv[gi] = i;
    }
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    let (a, b) = if flip { (g[j], g[i]) } else { (g[i], g[j]) };
                    g_inv[op[a][b]]
                })
                .collect()
        })
        .collect()
}

/// Try a single resolution; keep it only if it still looks small at the
/// peek dimension.
fn easy_attempt(
    op: &[Vec<usize>],
    maxdim: usize,
    peek: usize,
    min_size_to_try_harder: usize,
    verbose: bool,
    kernel: Option<KernelFn>,
) -> Result<Option<Vec<AbelianGroup>>, HomologyError> {
    let mut resolution = ProjectiveResolution::with_options(
        op,
        ResolutionOptions {
            left_action: None,
            check: true,
            kernel,
        },
    )?;
    resolution.extend_to_dimension(
        peek,
        &ExtendParams {
            max_size_to_ensure_minimal: -1,
            verbose,
            ..ExtendParams::default()
        },
    )?;
    if resolution.total_cost(peek) >= min_size_to_try_harder {
        return Ok(None);
    }
    let homology = resolution.homology_list(
        maxdim,
        &HomologyParams {
            right_action: None,
            check: true,
            extend: ExtendParams {
                max_size_for_extra_greedy: -1,
                max_size_to_ensure_minimal: -1,
                verbose,
                ..ExtendParams::default()
            },
        },
    )?;
    Ok(Some(homology))
}

/// Build resolutions for the identity and reversed relabellings, with and
/// without a multiplication flip, and keep the cheapest at the peek.
fn hard_attempt(
    op: &[Vec<usize>],
    peek: usize,
    verbose: bool,
    kernel: Option<KernelFn>,
) -> Result<ProjectiveResolution, HomologyError> {
    let n = op.len();
    let forward: Vec<usize> = (0..n).collect();
    let backward: Vec<usize> = (0..n).rev().collect();
    let params = ExtendParams {
        max_size_for_extra_greedy: 100,
        max_size_to_ensure_minimal: 100,
        verbose,
        ..ExtendParams::default()
    };
    let mut resolutions = Vec::new();
    for g in [&forward, &backward] {
        for flip in [false, true] {
            let variant = permute_op(op, g, flip);
            let mut resolution = ProjectiveResolution::with_options(
                &variant,
                ResolutionOptions {
                    left_action: None,
                    check: true,
                    kernel: kernel.clone(),
                },
            )?;
            resolution.extend_to_dimension(peek, &params)?;
            resolutions.push(resolution);
        }
    }
    if verbose {
        let costs: Vec<usize> = resolutions.iter().map(|r| r.total_cost(peek)).collect();
        eprintln!("[strategy] variant costs at depth {}: {:?}", peek, costs);
    }
    Ok(resolutions
        .into_iter()
        .min_by_key(|r| r.total_cost(peek))
        .expect("four variants were built"))
}

/// Homology of a monoid: first try any resolution; if it starts looking too
/// big, pick the cheapest of a few relabelled variants before continuing.
pub fn integral_monoid_homology(
    op: &[Vec<usize>],
    maxdim: usize,
    options: StrategyOptions,
) -> Result<Vec<AbelianGroup>, HomologyError> {
    let peek = options
        .peek_dimension
        .unwrap_or_else(|| maxdim.saturating_sub(2).min(4));
    if let Some(homology) = easy_attempt(
        op,
        maxdim,
        peek,
        options.min_size_to_try_harder,
        options.verbose,
        options.kernel.clone(),
    )? {
        return Ok(homology);
    }
    let mut resolution = hard_attempt(op, peek, options.verbose, options.kernel)?;
    resolution.homology_list(
        maxdim,
        &HomologyParams {
            right_action: None,
            check: true,
            extend: ExtendParams {
                max_size_for_extra_greedy: 100,
                max_size_to_ensure_minimal: 100,
                verbose: options.verbose,
                ..ExtendParams::default()
            },
        },
    )
}

fn identity_of(op: &[Vec<usize>]) -> Option<usize> {
    let n = op.len();
    (0..n).find(|&e| (0..n).all(|x| op[e][x] == x && op[x][e] == x))
}

/// Append an identity element unless the table already has one.
pub fn maybe_adjoin_identity(op: &[Vec<usize>]) -> Vec<Vec<usize>> {
    if identity_of(op).is_some() {
        return op.to_vec();
    }
    let n = op.len();
    let mut extended: Vec<Vec<usize>> = op
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut row = row.clone();
            row.push(i);
            row
        })
        .collect();
    extended.push((0..=n).collect());
    extended
}

/// Repeatedly replace S by eSe for an idempotent e with eSe = eS or
/// eSe = Se and |eSe| < |S|, reindexing the table. Homology is unchanged by
/// this reduction.
pub fn equivalent_submonoid(mut op: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    loop {
        let n = op.len();
        let mut candidates: Vec<Vec<usize>> = Vec::new();
        for e in (0..n).filter(|&e| op[e][e] == e) {
            let left: BTreeSet<usize> = (0..n).map(|x| op[e][x]).collect();
            let right: BTreeSet<usize> = (0..n).map(|x| op[x][e]).collect();
            let both: BTreeSet<usize> = left.intersection(&right).copied().collect();
            if both == left || both == right {
                candidates.push(both.into_iter().collect());
            }
        }
        // An empty candidate set means no reduction is possible.
        let Some(subset) = candidates.into_iter().min_by_key(|s| s.len()) else {
            return op;
        };
        if subset.len() == n {
            return op;
        }
        let mut position = vec![usize::MAX; n];
        for (i, &t) in subset.iter().enumerate() {
            position[t] = i;
        }
        op = subset
            .iter()
            .map(|&ti| subset.iter().map(|&tj| position[op[ti][tj]]).collect())
            .collect();
    }
}

fn free_then_trivial(maxdim: usize) -> Vec<AbelianGroup> {
    let mut result = vec![AbelianGroup::free(1)];
    result.extend(std::iter::repeat(AbelianGroup::trivial()).take(maxdim));
    result
}

/// H of C_order: Z, then the cyclic group at every odd dimension.
fn periodic_cyclic(order: u64, maxdim: usize) -> Vec<AbelianGroup> {
    let mut result = vec![AbelianGroup::free(1)];
    for dim in 1..=maxdim {
        if dim % 2 == 1 {
            result.push(AbelianGroup::cyclic(order));
        } else {
            result.push(AbelianGroup::trivial());
        }
    }
    result
}

/// Resolve directly with the caller's S-set modules. The eSe and
/// closed-form reductions would invalidate the action tables, so only the
/// identity adjunction is applied, extending the actions alongside.
fn homology_with_modules(
    op: &[Vec<usize>],
    maxdim: usize,
    options: SemigroupHomologyOptions,
) -> Result<Vec<AbelianGroup>, HomologyError> {
    let (table, left_action, right_action) = if identity_of(op).is_some() {
        (op.to_vec(), options.left_action, options.right_action)
    } else {
        let extended = maybe_adjoin_identity(op);
        let left = options.left_action.map(|mut rows| {
            let states = rows.first().map(|row| row.len()).unwrap_or(0);
            rows.push((0..states).collect());
            rows
        });
        let right = options.right_action.map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(x, mut row)| {
                    row.push(x);
                    row
                })
                .collect()
        });
        (extended, left, right)
    };
    let mut resolution = ProjectiveResolution::with_options(
        &table,
        ResolutionOptions {
            left_action,
            check: true,
            kernel: options.kernel,
        },
    )?;
    resolution.homology_list(
        maxdim,
        &HomologyParams {
            right_action,
            check: true,
            extend: ExtendParams {
                verbose: options.verbose,
                ..ExtendParams::default()
            },
        },
    )
}

/// Integral homology of a finite semigroup given by its multiplication
/// table: H_0, ..., H_maxdim. Reductions to smaller semigroups and monoids
/// are applied first where they provably preserve homology.
pub fn integral_semigroup_homology(
    op: &[Vec<usize>],
    maxdim: usize,
    options: SemigroupHomologyOptions,
) -> Result<Vec<AbelianGroup>, HomologyError> {
    validate_table(op)?;
    if options.left_action.is_some() || options.right_action.is_some() {
        return homology_with_modules(op, maxdim, options);
    }
    if op[0].iter().all(|&x| x == 0) {
        // A left zero collapses everything above dimension 0. Extremely
        // common for semigroup tables.
        return Ok(free_then_trivial(maxdim));
    }
    let reduced = equivalent_submonoid(maybe_adjoin_identity(op));
    match reduced.len() {
        1 => Ok(free_then_trivial(maxdim)),
        2 | 3 => Ok(periodic_cyclic(reduced.len() as u64, maxdim)),
        _ => integral_monoid_homology(
            &reduced,
            maxdim,
            StrategyOptions {
                verbose: options.verbose,
                kernel: options.kernel,
                ..StrategyOptions::default()
            },
        ),
    }
}
