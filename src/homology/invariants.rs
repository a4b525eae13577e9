use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;
use std::collections::BTreeMap;
use std::fmt;

/// Multiset of cyclic summand orders: divisor -> multiplicity. Divisor 0
/// counts free summands. Multiplicities are BigInt because free ranks can
/// grow exponentially with the homological dimension.
pub type DivisorCounter = BTreeMap<BigInt, BigInt>;

/// Add `count` occurrences of `divisor` to the counter.
pub fn counter_add(counter: &mut DivisorCounter, divisor: BigInt, count: BigInt) {
    if count.is_zero() {
        return;
    }
    let entry = counter.entry(divisor).or_insert_with(BigInt::zero);
    *entry += count;
}

/// A finitely generated abelian group in invariant-factor form: the free
/// summand (divisor 0) first, then torsion divisors in decreasing order,
/// each with its multiplicity, satisfying d_{i+1} | d_i.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbelianGroup {
    summands: Vec<(BigInt, BigInt)>,
}

impl AbelianGroup {
    pub fn trivial() -> Self {
        AbelianGroup {
            summands: Vec::new(),
        }
    }

    pub fn free(rank: u64) -> Self {
        if rank == 0 {
            return Self::trivial();
        }
        AbelianGroup {
            summands: vec![(BigInt::zero(), BigInt::from(rank))],
        }
    }

    pub fn cyclic(order: u64) -> Self {
        assert!(order > 1, "cyclic summands need order > 1");
        AbelianGroup {
            summands: vec![(BigInt::from(order), BigInt::from(1))],
        }
    }

    pub fn summands(&self) -> &[(BigInt, BigInt)] {
        &self.summands
    }

    pub fn is_trivial(&self) -> bool {
        self.summands.is_empty()
    }

    /// Multiplicity of the divisor-0 summand.
    pub fn free_rank(&self) -> BigInt {
        self.summands
            .iter()
            .find(|(d, _)| d.is_zero())
            .map(|(_, count)| count.clone())
            .unwrap_or_else(BigInt::zero)
    }

    /// The group as a divisor multiset, for feeding back into
    /// `invariant_factors`.
    pub fn to_counter(&self) -> DivisorCounter {
        self.summands
            .iter()
            .map(|(d, count)| (d.clone(), count.clone()))
            .collect()
    }
}

impl fmt::Display for AbelianGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.summands.is_empty() {
            return write!(f, "trivial");
        }
        for (i, (divisor, count)) in self.summands.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            if divisor.is_zero() {
                write!(f, "Z")?;
            } else {
                write!(f, "C{}", divisor)?;
            }
            if count > &BigInt::from(1) {
                write!(f, "^{}", count)?;
            }
        }
        Ok(())
    }
}

/// Replace an adjacent pair of (divisor, count) runs by an equivalent run
/// list closer to a divisibility chain, carrying multiplicities through.
fn equivalent_pair(
    (d1, count1): (BigInt, BigInt),
    (d2, count2): (BigInt, BigInt),
) -> Vec<(BigInt, BigInt)> {
    assert!(d1 > BigInt::from(1) && d2 > BigInt::from(1));
    if d1 == d2 {
        return vec![(d1, count1 + count2)];
    }
    if (&d2 % &d1).is_zero() {
        return vec![(d1, count1), (d2, count2)];
    }
    if (&d1 % &d2).is_zero() {
        return vec![(d2, count2), (d1, count1)];
    }
    let g = d1.gcd(&d2);
    let lcm = &d1 / &g * &d2;
    let one = BigInt::from(1);
    if count1 < count2 {
        let remaining = &count2 - &count1;
        if g == one {
            vec![(d2, remaining), (lcm, count1)]
        } else {
            vec![(g, count1.clone()), (d2, remaining), (lcm, count1)]
        }
    } else if count1 == count2 {
        if g == one {
            vec![(lcm, count1)]
        } else {
            vec![(g, count1.clone()), (lcm, count1)]
        }
    } else {
        let remaining = &count1 - &count2;
        if g == one {
            vec![(d1, remaining), (lcm, count2)]
        } else {
            vec![(g, count2.clone()), (d1, remaining), (lcm, count2)]
        }
    }
}

fn is_divisibility_chain(data: &[(BigInt, BigInt)]) -> bool {
    data.windows(2)
        .all(|w| w[0].0 < w[1].0 && (&w[1].0 % &w[0].0).is_zero())
}

/// Normalize a divisor multiset into invariant-factor form. Never expands
/// multiplicities; all rewriting happens on (divisor, count) pairs.
pub fn invariant_factors(counter: &DivisorCounter) -> AbelianGroup {
    let zero = BigInt::zero();
    let one = BigInt::from(1);
    let free_rank = counter.get(&zero).cloned().unwrap_or_else(BigInt::zero);
    let mut data: Vec<(BigInt, BigInt)> = Vec::new();
    for (divisor, count) in counter {
        assert!(divisor != &one, "divisor 1 is not a torsion order");
        if divisor > &one && !count.is_zero() {
            data.push((divisor.clone(), count.clone()));
        }
    }
    data.sort();
    while !is_divisibility_chain(&data) {
        let mut i = 0;
        while i + 1 < data.len() {
            let first = data[i].clone();
            let second = data[i + 1].clone();
            let replacement = equivalent_pair(first, second);
            data.splice(i..i + 2, replacement);
            i += 1;
        }
        data.sort();
    }
    if !free_rank.is_zero() {
        data.push((zero, free_rank));
    }
    data.reverse();
    AbelianGroup { summands: data }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(pairs: &[(u64, u64)]) -> DivisorCounter {
        pairs
            .iter()
            .map(|&(d, count)| (BigInt::from(d), BigInt::from(count)))
            .collect()
    }

    fn summand_pairs(group: &AbelianGroup) -> Vec<(u64, u64)> {
        group
            .summands()
            .iter()
            .map(|(d, count)| {
                (
                    u64::try_from(d).unwrap(),
                    u64::try_from(count).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_invariant_factors_fixtures() {
        // (input multiset, expected ordered summands)
        let cases: Vec<(Vec<(u64, u64)>, Vec<(u64, u64)>)> = vec![
            (vec![], vec![]),
            (vec![(0, 1)], vec![(0, 1)]),
            (vec![(2, 7), (3, 10)], vec![(6, 7), (3, 3)]),
            (vec![(4, 7), (10, 10)], vec![(20, 7), (10, 3), (2, 7)]),
            (vec![(2, 10), (3, 10)], vec![(6, 10)]),
            (vec![(4, 10), (10, 10)], vec![(20, 10), (2, 10)]),
            (vec![(2, 10), (3, 7)], vec![(6, 7), (2, 3)]),
            (vec![(4, 10), (10, 7)], vec![(20, 7), (4, 3), (2, 7)]),
            (
                vec![(2, 3), (4, 1), (3, 10), (0, 50)],
                vec![(0, 50), (12, 1), (6, 3), (3, 6)],
            ),
        ];
        for (input, expected) in cases {
            let result = invariant_factors(&counter(&input));
            assert_eq!(summand_pairs(&result), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_huge_multiplicities() {
        // Scaling every multiplicity must scale the output, with no
        // slowdown from expanding the multiset.
        let n = 1_000_000u64;
        let input = counter(&[(2, 3 * n), (4, n), (3, 10 * n), (0, 50 * n)]);
        let result = invariant_factors(&input);
        assert_eq!(
            summand_pairs(&result),
            vec![(0, 50 * n), (12, n), (6, 3 * n), (3, 6 * n)]
        );
    }

    #[test]
    fn test_idempotent() {
        let input = counter(&[(2, 7), (3, 10), (0, 2)]);
        let once = invariant_factors(&input);
        let twice = invariant_factors(&once.to_counter());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_display() {
        assert_eq!(AbelianGroup::trivial().to_string(), "trivial");
        assert_eq!(AbelianGroup::free(2).to_string(), "Z^2");
        let mixed = invariant_factors(&counter(&[(0, 1), (2, 2), (8, 1)]));
        assert_eq!(mixed.to_string(), "Z x C8 x C2^2");
    }
}
