//! Construction-time configuration: capacity and representation thresholds.

use crate::error::Error;

/// Chains grow into trees once they hold more than this many entries.
pub const DEFAULT_PROMOTE_ABOVE: usize = 8;
/// Trees shrink back into chains once they hold fewer than this many entries.
pub const DEFAULT_DEMOTE_BELOW: usize = 4;
/// Bucket count used when the caller asks for zero buckets.
pub const DEFAULT_CAPACITY: usize = 16;

/// Bucket size limits that drive promotion and demotion.
///
/// `demote_below < promote_above` always holds, so a bucket that was just
/// promoted needs several removals before it is demoted again.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Thresholds {
    promote_above: usize,
    demote_below: usize,
}

impl Thresholds {
    /// Validated thresholds. `demote_below == 0` disables demotion.
    pub fn new(promote_above: usize, demote_below: usize) -> Result<Self, Error> {
        if demote_below >= promote_above {
            return Err(Error::InvalidThresholds {
                promote_above,
                demote_below,
            });
        }
        Ok(Self {
            promote_above,
            demote_below,
        })
    }

    pub fn promote_above(&self) -> usize {
        self.promote_above
    }

    pub fn demote_below(&self) -> usize {
        self.demote_below
    }

    #[inline]
    pub(crate) fn should_promote(&self, len: usize) -> bool {
        len > self.promote_above
    }

    #[inline]
    pub(crate) fn should_demote(&self, len: usize) -> bool {
        len < self.demote_below
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            promote_above: DEFAULT_PROMOTE_ABOVE,
            demote_below: DEFAULT_DEMOTE_BELOW,
        }
    }
}

/// Everything `HybridTable::with_config` needs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableConfig {
    /// Number of buckets; 0 selects `DEFAULT_CAPACITY`.
    pub capacity: usize,
    pub thresholds: Thresholds,
}

impl TableConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Capacity after substituting the default for 0.
    pub(crate) fn effective_capacity(&self) -> usize {
        if self.capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            self.capacity
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            thresholds: Thresholds::default(),
        }
    }
}
