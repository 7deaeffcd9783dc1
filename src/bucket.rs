//! Bucket: one table slot, stored as a chain while small and as a
//! red-black tree once it outgrows the promotion threshold.

use crate::chain::{self, Chain};
use crate::config::Thresholds;
use crate::error::InvariantViolation;
use crate::hash::bucket_index;
use crate::rbtree::{self, RbTree};
use core::mem;

/// Current representation of a bucket.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BucketKind {
    Chain,
    Tree,
}

#[derive(Debug)]
pub enum Bucket<V> {
    Chain(Chain<V>),
    Tree(RbTree<V>),
}

impl<V> Bucket<V> {
    pub const fn new() -> Self {
        Bucket::Chain(Chain::new())
    }

    pub fn kind(&self) -> BucketKind {
        match self {
            Bucket::Chain(_) => BucketKind::Chain,
            Bucket::Tree(_) => BucketKind::Tree,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Bucket::Chain(c) => c.len(),
            Bucket::Tree(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or overwrite; may promote the bucket to a tree.
    /// Returns the previous value on overwrite.
    pub fn insert(&mut self, key: i64, value: V, thresholds: &Thresholds) -> Option<V> {
        match self {
            Bucket::Chain(chain) => {
                let old = chain.insert(key, value);
                if old.is_none() && thresholds.should_promote(chain.len()) {
                    self.promote();
                }
                old
            }
            Bucket::Tree(tree) => tree.insert(key, value),
        }
    }

    pub fn get(&self, key: i64) -> Option<&V> {
        match self {
            Bucket::Chain(c) => c.get(key),
            Bucket::Tree(t) => t.get(key),
        }
    }

    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        match self {
            Bucket::Chain(c) => c.get_mut(key),
            Bucket::Tree(t) => t.get_mut(key),
        }
    }

    /// Remove `key`; may demote the bucket back to a chain.
    pub fn remove(&mut self, key: i64, thresholds: &Thresholds) -> Option<V> {
        match self {
            Bucket::Chain(c) => c.remove(key),
            Bucket::Tree(tree) => {
                let removed = tree.remove(key)?;
                if thresholds.should_demote(tree.len()) {
                    self.demote();
                }
                Some(removed)
            }
        }
    }

    /// Replace the chain with a tree holding the same entries. The tree is
    /// built completely before it is swapped in.
    fn promote(&mut self) {
        let Bucket::Chain(chain) = self else {
            return;
        };
        let chain = mem::take(chain);
        let mut tree = RbTree::with_capacity(chain.len());
        for (key, value) in chain {
            tree.insert(key, value);
        }
        *self = Bucket::Tree(tree);
    }

    /// Replace the tree with a chain in ascending key order.
    fn demote(&mut self) {
        let Bucket::Tree(tree) = self else {
            return;
        };
        let tree = mem::take(tree);
        let chain: Chain<V> = tree.into_sorted_entries().into_iter().collect();
        *self = Bucket::Chain(chain);
    }

    /// Entries in chain order, or ascending key order for a tree.
    pub fn iter(&self) -> Iter<'_, V> {
        match self {
            Bucket::Chain(c) => Iter::Chain(c.iter()),
            Bucket::Tree(t) => Iter::Tree(t.iter()),
        }
    }

    /// Full structural check of bucket `index` in a table of `capacity`
    /// buckets: tree invariants, key placement, and representation size.
    pub fn check(
        &self,
        index: usize,
        capacity: usize,
        thresholds: &Thresholds,
    ) -> Result<(), InvariantViolation> {
        match self {
            Bucket::Chain(c) => {
                if thresholds.should_promote(c.len()) {
                    return Err(InvariantViolation::Representation { bucket: index });
                }
                let counted = c.iter().count();
                if counted != c.len() {
                    return Err(InvariantViolation::Length {
                        recorded: c.len(),
                        counted,
                    });
                }
            }
            Bucket::Tree(t) => {
                if thresholds.should_demote(t.len()) {
                    return Err(InvariantViolation::Representation { bucket: index });
                }
                t.check_invariants()?;
            }
        }
        for (key, _) in self.iter() {
            if bucket_index(key, capacity) != index {
                return Err(InvariantViolation::Misplaced { key, bucket: index });
            }
        }
        Ok(())
    }
}

impl<V> Default for Bucket<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over one bucket's entries.
pub enum Iter<'a, V> {
    Chain(chain::Iter<'a, V>),
    Tree(rbtree::Iter<'a, V>),
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Chain(it) => it.next(),
            Iter::Tree(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Chain(it) => it.size_hint(),
            Iter::Tree(it) => it.size_hint(),
        }
    }
}
