use thiserror::Error;

/// Everything that can go wrong while validating inputs or computing
/// homology. Internal invariant violations are programmer errors and panic
/// instead of returning one of these.
#[derive(Debug, Clone, Error)]
pub enum HomologyError {
    #[error("multiplication table is not square: row {row} has {len} entries, expected {expected}")]
    TableNotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("table entry out of range: op[{i}][{j}] = {value}, but the order is {order}")]
    TableEntryOutOfRange {
        i: usize,
        j: usize,
        value: usize,
        order: usize,
    },

    #[error("operation is not associative: op[op[{i}][{j}]][{k}] = {left}, but op[{i}][op[{j}][{k}]] = {right}")]
    NotAssociative {
        i: usize,
        j: usize,
        k: usize,
        left: usize,
        right: usize,
    },

    #[error("the table has no two-sided identity element")]
    NoIdentity,

    #[error("{side} action has {rows} rows, expected {expected}")]
    ActionRowCountMismatch {
        side: &'static str,
        rows: usize,
        expected: usize,
    },

    #[error("{side} action row {row} has {len} entries, expected {expected}")]
    ActionRowLengthMismatch {
        side: &'static str,
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("{side} action entry out of range: act[{row}][{col}] = {value}, but the state count is {states}")]
    ActionEntryOutOfRange {
        side: &'static str,
        row: usize,
        col: usize,
        value: usize,
        states: usize,
    },

    #[error("left action is incompatible: act[op[{i}][{j}]][{y}] = {left}, but act[{i}][act[{j}][{y}]] = {right}")]
    LeftActionIncompatible {
        i: usize,
        j: usize,
        y: usize,
        left: usize,
        right: usize,
    },

    #[error("right action is incompatible: act[act[{x}][{i}]][{j}] = {left}, but act[{x}][op[{i}][{j}]] = {right}")]
    RightActionIncompatible {
        x: usize,
        i: usize,
        j: usize,
        left: usize,
        right: usize,
    },

    #[error("left action row for the identity element {identity} does not fix state {y}")]
    ActionIdentityNotFixed { identity: usize, y: usize },

    #[error("basis width mismatch: vector {index} has length {len}, expected {expected}")]
    BasisWidthMismatch {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("kernel job too big: R={r} (max {max_r}), N={n} (max {max_n}), bits={bits} (max {max_bits})")]
    KernelJobTooBig {
        r: usize,
        n: usize,
        bits: u64,
        max_r: usize,
        max_n: usize,
        max_bits: u64,
    },

    #[error("invalid table digit {digit:?} in row {row}")]
    BadTableDigit { digit: char, row: usize },

    #[error("empty multiplication table")]
    EmptyTable,
}

impl HomologyError {
    /// True for the resource-exceeded failure that an outer catalogue driver
    /// treats as "record this unit as unresolved and continue".
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self, HomologyError::KernelJobTooBig { .. })
    }
}
