use super::action::Action;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt;

/// A vector of BigInt values of fixed length.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ZVector {
    data: Vec<BigInt>,
}

impl ZVector {
    pub fn zero(dimension: usize) -> Self {
        ZVector {
            data: vec![BigInt::zero(); dimension],
        }
    }

    pub fn from_data(data: Vec<BigInt>) -> Self {
        ZVector { data }
    }

    pub fn from_i64s(entries: &[i64]) -> Self {
        ZVector {
            data: entries.iter().map(|&x| BigInt::from(x)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, i: usize) -> &BigInt {
        &self.data[i]
    }

    pub fn set(&mut self, i: usize, value: BigInt) {
        self.data[i] = value;
    }

    pub fn entries(&self) -> &[BigInt] {
        &self.data
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(Zero::is_zero)
    }

    /// Index of the lowest nonzero entry, or None for the zero vector.
    pub fn first_nonzero(&self) -> Option<usize> {
        self.data.iter().position(|x| !x.is_zero())
    }

    /// Bit length of the largest entry by absolute value.
    pub fn max_bits(&self) -> u64 {
        self.data.iter().map(|x| x.abs().bits()).max().unwrap_or(0)
    }

    pub fn add(&self, other: &ZVector) -> ZVector {
        assert_eq!(self.len(), other.len());
        ZVector {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a + b)
                .collect(),
        }
    }

    pub fn subtract(&self, other: &ZVector) -> ZVector {
        assert_eq!(self.len(), other.len());
        ZVector {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a - b)
                .collect(),
        }
    }

    pub fn add_assign(&mut self, other: &ZVector) {
        assert_eq!(self.len(), other.len());
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
    }

    pub fn subtract_assign(&mut self, other: &ZVector) {
        assert_eq!(self.len(), other.len());
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a -= b;
        }
    }

    /// self -= scale * other, without materializing the scaled vector.
    pub fn subtract_scaled_assign(&mut self, other: &ZVector, scale: &BigInt) {
        assert_eq!(self.len(), other.len());
        if scale.is_zero() {
            return;
        }
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a -= b * scale;
        }
    }

    pub fn negate(&self) -> ZVector {
        ZVector {
            data: self.data.iter().map(|x| -x).collect(),
        }
    }

    pub fn negate_assign(&mut self) {
        for a in self.data.iter_mut() {
            *a = -(a.clone());
        }
    }

    pub fn multiply_bigint(&self, scalar: &BigInt) -> ZVector {
        ZVector {
            data: self.data.iter().map(|x| x * scalar).collect(),
        }
    }

    pub fn concat(&self, other: &ZVector) -> ZVector {
        let mut data = self.data.clone();
        data.extend_from_slice(&other.data);
        ZVector { data }
    }

    /// Redistribute entries through an index action: the result w satisfies
    /// w[action[i]] += self[i] for every i, with targets outside
    /// [0, out_len) dropped. Requires self.len() == action.len().
    pub fn shuffled_by_action(&self, action: &Action, out_len: usize) -> ZVector {
        assert_eq!(
            self.len(),
            action.len(),
            "vector length mismatches action length"
        );
        let mut out = ZVector::zero(out_len);
        for (value, &target) in self.data.iter().zip(action.targets()) {
            if target < out_len && !value.is_zero() {
                out.data[target] += value;
            }
        }
        out
    }
}

impl fmt::Display for ZVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = ZVector::from_i64s(&[1, -2, 3]);
        let b = ZVector::from_i64s(&[4, 5, -6]);
        assert_eq!(a.add(&b), ZVector::from_i64s(&[5, 3, -3]));
        assert_eq!(a.subtract(&b), ZVector::from_i64s(&[-3, -7, 9]));
        assert_eq!(a.negate(), ZVector::from_i64s(&[-1, 2, -3]));
        assert_eq!(
            a.multiply_bigint(&BigInt::from(-2)),
            ZVector::from_i64s(&[-2, 4, -6])
        );
        let mut c = a.clone();
        c.subtract_scaled_assign(&b, &BigInt::from(2));
        assert_eq!(c, ZVector::from_i64s(&[-7, -12, 15]));
    }

    #[test]
    fn test_first_nonzero() {
        assert_eq!(ZVector::from_i64s(&[0, 0, 5, 1]).first_nonzero(), Some(2));
        assert_eq!(ZVector::zero(4).first_nonzero(), None);
    }

    #[test]
    fn test_shuffle_accumulates_and_drops() {
        let v = ZVector::from_i64s(&[1, 2, 3, 4]);
        // Two entries land on index 0, one is dropped (target 5 >= out_len).
        let a = Action::new(vec![0, 0, 2, 5]);
        assert_eq!(
            v.shuffled_by_action(&a, 3),
            ZVector::from_i64s(&[3, 0, 3])
        );
    }

    #[test]
    fn test_shuffle_identity() {
        let v = ZVector::from_i64s(&[7, -1, 0]);
        let a = Action::new(vec![0, 1, 2]);
        assert_eq!(v.shuffled_by_action(&a, 3), v);
    }
}
