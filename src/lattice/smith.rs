use crate::math::ZVector;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

/// Diagonalize the given rows over Z with row and column operations and
/// return the nonzero diagonal as a divisibility chain d1 | d2 | ...
///
/// Pivots are chosen as the smallest-absolute-value entry of the active
/// submatrix, which keeps intermediate entries small (Kannan-Bachem style).
pub fn smith_invariants(rows: &[ZVector], width: usize) -> Vec<BigInt> {
    let mut m: Vec<Vec<BigInt>> = rows.iter().map(|r| r.entries().to_vec()).collect();
    let height = m.len();
    let mut diagonal: Vec<BigInt> = Vec::new();
    let mut t = 0;

    while t < height && t < width {
        // Move the smallest nonzero entry of the active submatrix to (t, t).
        let mut best: Option<(usize, usize)> = None;
        for i in t..height {
            for j in t..width {
                if m[i][j].is_zero() {
                    continue;
                }
                match &best {
                    Some((bi, bj)) if m[*bi][*bj].abs() <= m[i][j].abs() => {}
                    _ => best = Some((i, j)),
                }
            }
        }
        let (bi, bj) = match best {
            None => break,
            Some(found) => found,
        };
        m.swap(t, bi);
        for row in m.iter_mut() {
            row.swap(t, bj);
        }
        let pivot = m[t][t].clone();

        // Clear the pivot column with row operations; a leftover remainder
        // means a smaller entry appeared, so re-pick the pivot.
        let mut leftover = false;
        let pivot_row = m[t].clone();
        for i in t + 1..height {
            if m[i][t].is_zero() {
                continue;
            }
            let q = m[i][t].div_floor(&pivot);
            if !q.is_zero() {
                for j in t..width {
                    let delta = &q * &pivot_row[j];
                    m[i][j] -= delta;
                }
            }
            if !m[i][t].is_zero() {
                leftover = true;
            }
        }
        if leftover {
            continue;
        }
        // Clear the pivot row with column operations.
        for j in t + 1..width {
            if m[t][j].is_zero() {
                continue;
            }
            let q = m[t][j].div_floor(&pivot);
            if !q.is_zero() {
                for row in m.iter_mut().skip(t) {
                    let delta = &q * &row[t];
                    row[j] -= delta;
                }
            }
            if !m[t][j].is_zero() {
                leftover = true;
            }
        }
        if leftover {
            continue;
        }
        diagonal.push(m[t][t].abs());
        t += 1;
    }

    normalize_divisor_chain(diagonal)
}

/// Rewrite a multiset of positive divisors into the divisibility chain with
/// the same direct sum, by repeated adjacent gcd/lcm exchange.
fn normalize_divisor_chain(mut divisors: Vec<BigInt>) -> Vec<BigInt> {
    loop {
        divisors.sort();
        let mut changed = false;
        for i in 0..divisors.len().saturating_sub(1) {
            let a = divisors[i].clone();
            let b = divisors[i + 1].clone();
            if (&b % &a).is_zero() {
                continue;
            }
            let g = a.gcd(&b);
            let l = &a / &g * &b;
            divisors[i] = g;
            divisors[i + 1] = l;
            changed = true;
        }
        if !changed {
            return divisors;
        }
    }
}
