//! Error types: construction failures and structural invariant reports.

use core::fmt;

/// Failure to build a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The bucket array could not be allocated.
    OutOfMemory { buckets: usize },
    /// Demotion threshold is not strictly below the promotion threshold,
    /// which would let a bucket flap between representations.
    InvalidThresholds {
        promote_above: usize,
        demote_below: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfMemory { buckets } => {
                write!(f, "out of memory allocating {buckets} buckets")
            }
            Error::InvalidThresholds {
                promote_above,
                demote_below,
            } => write!(
                f,
                "demote threshold {demote_below} must be below promote threshold {promote_above}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A broken structural invariant found by a full traversal.
///
/// Produced by `RbTree::check_invariants` and `HybridTable::validate`;
/// a correct implementation never returns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The tree root is RED.
    RedRoot,
    /// A RED node has a RED child.
    RedRed { key: i64 },
    /// The two subtrees of a node disagree on black-height.
    BlackHeight { key: i64 },
    /// In-order keys are not strictly ascending at this node.
    Order { key: i64 },
    /// A child's parent link does not point back at its parent.
    ParentLink { key: i64 },
    /// A structure's recorded length disagrees with what a traversal counts.
    Length { recorded: usize, counted: usize },
    /// An entry sits in a bucket its key does not hash to.
    Misplaced { key: i64, bucket: usize },
    /// A bucket's representation does not match its size
    /// (an oversized chain, or an undersized tree).
    Representation { bucket: usize },
    /// The table's element count disagrees with the sum over buckets.
    TableLength { recorded: usize, counted: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::RedRoot => f.write_str("root is red"),
            InvariantViolation::RedRed { key } => write!(f, "red node {key} has a red child"),
            InvariantViolation::BlackHeight { key } => {
                write!(f, "black-height differs below node {key}")
            }
            InvariantViolation::Order { key } => write!(f, "key {key} is out of order"),
            InvariantViolation::ParentLink { key } => {
                write!(f, "node {key} has a stale parent link")
            }
            InvariantViolation::Length { recorded, counted } => {
                write!(f, "recorded length {recorded}, counted {counted}")
            }
            InvariantViolation::Misplaced { key, bucket } => {
                write!(f, "key {key} stored in bucket {bucket}")
            }
            InvariantViolation::Representation { bucket } => {
                write!(f, "bucket {bucket} has the wrong representation for its size")
            }
            InvariantViolation::TableLength { recorded, counted } => {
                write!(f, "table length {recorded}, buckets hold {counted}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_values() {
        let e = Error::InvalidThresholds {
            promote_above: 4,
            demote_below: 6,
        };
        let s = e.to_string();
        assert!(s.contains('4') && s.contains('6'), "{s}");

        let v = InvariantViolation::RedRed { key: -17 };
        assert!(v.to_string().contains("-17"));
    }
}
