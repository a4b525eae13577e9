use std::fmt;

/// An index-shuffle table i -> targets[i].
///
/// Actions are how semigroup elements act on the Z-basis of a module: the
/// basis element at index i is sent to the basis element at targets[i].
/// The same primitive drives column permutations and tensoring with a right
/// S-set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    targets: Vec<usize>,
}

impl Action {
    pub fn new(targets: Vec<usize>) -> Self {
        Action { targets }
    }

    /// The identity shuffle on n indices.
    pub fn identity(n: usize) -> Self {
        Action {
            targets: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, i: usize) -> usize {
        self.targets[i]
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, t) in self.targets.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", t)?;
        }
        write!(f, "]")
    }
}
