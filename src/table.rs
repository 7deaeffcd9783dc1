//! HybridTable: fixed-capacity array of adaptive buckets.

use crate::bucket::{self, Bucket, BucketKind};
use crate::config::{self, TableConfig, Thresholds};
use crate::error::{Error, InvariantViolation};
use crate::hash::bucket_index;
use core::iter::FusedIterator;

/// Integer-keyed hash table with chain-or-tree buckets.
///
/// The bucket count is fixed at construction; there is no rehashing.
/// Each bucket is a chain until it holds more than
/// `thresholds.promote_above()` entries, then a red-black tree until it
/// falls below `thresholds.demote_below()`.
#[derive(Debug)]
pub struct HybridTable<V> {
    buckets: Box<[Bucket<V>]>,
    len: usize,
    thresholds: Thresholds,
}

impl<V> HybridTable<V> {
    pub const DEFAULT_CAPACITY: usize = config::DEFAULT_CAPACITY;

    /// Table with `DEFAULT_CAPACITY` buckets and default thresholds.
    pub fn new() -> Self {
        Self::from_parts(Self::DEFAULT_CAPACITY, Thresholds::default())
    }

    /// Table with `capacity` buckets; 0 selects `DEFAULT_CAPACITY`.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_config(TableConfig::with_capacity(capacity))
    }

    pub fn with_config(config: TableConfig) -> Result<Self, Error> {
        let capacity = config.effective_capacity();
        let mut buckets: Vec<Bucket<V>> = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory { buckets: capacity })?;
        buckets.resize_with(capacity, Bucket::new);
        log::trace!(
            "table created: {} buckets, promote above {}, demote below {}",
            capacity,
            config.thresholds.promote_above(),
            config.thresholds.demote_below()
        );
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            len: 0,
            thresholds: config.thresholds,
        })
    }

    fn from_parts(capacity: usize, thresholds: Thresholds) -> Self {
        let buckets = (0..capacity).map(|_| Bucket::new()).collect();
        Self {
            buckets,
            len: 0,
            thresholds,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Bucket a key routes to.
    #[inline]
    pub fn bucket_index(&self, key: i64) -> usize {
        bucket_index(key, self.buckets.len())
    }

    /// Representation of bucket `index`, or `None` when out of range.
    pub fn bucket_kind(&self, index: usize) -> Option<BucketKind> {
        self.buckets.get(index).map(Bucket::kind)
    }

    /// Entry count of bucket `index`, or `None` when out of range.
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(Bucket::len)
    }

    #[inline]
    fn bucket(&self, key: i64) -> &Bucket<V> {
        &self.buckets[self.bucket_index(key)]
    }

    #[inline]
    fn bucket_mut(&mut self, key: i64) -> (usize, &mut Bucket<V>) {
        let index = self.bucket_index(key);
        (index, &mut self.buckets[index])
    }

    /// Insert or overwrite. Returns the previous value when `key` was
    /// present; the length only grows for new keys.
    pub fn insert(&mut self, key: i64, value: V) -> Option<V> {
        let thresholds = self.thresholds;
        let (index, bucket) = self.bucket_mut(key);
        let was = bucket.kind();
        let old = bucket.insert(key, value, &thresholds);
        if was != bucket.kind() {
            log::debug!("bucket {} promoted at {} entries", index, bucket.len());
        }
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    pub fn find(&self, key: i64) -> Option<&V> {
        self.bucket(key).get(key)
    }

    pub fn find_mut(&mut self, key: i64) -> Option<&mut V> {
        self.bucket_mut(key).1.get_mut(key)
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.find(key).is_some()
    }

    /// Remove `key`, handing its value back. `None` means the key was absent.
    pub fn remove(&mut self, key: i64) -> Option<V> {
        let thresholds = self.thresholds;
        let (index, bucket) = self.bucket_mut(key);
        let was = bucket.kind();
        let removed = bucket.remove(key, &thresholds)?;
        if was != bucket.kind() {
            log::debug!("bucket {} demoted at {} entries", index, bucket.len());
        }
        self.len -= 1;
        Some(removed)
    }

    /// Drop every entry, leaving `capacity` empty chain buckets.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            *bucket = Bucket::new();
        }
        self.len = 0;
    }

    /// All entries, bucket by bucket.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// Full structural check: every bucket's invariants, key placement,
    /// representation sizes, and the table length.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let capacity = self.capacity();
        let mut counted = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            bucket.check(index, capacity, &self.thresholds)?;
            counted += bucket.len();
        }
        if counted != self.len {
            return Err(InvariantViolation::TableLength {
                recorded: self.len,
                counted,
            });
        }
        Ok(())
    }
}

impl<V> Default for HybridTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Extend<(i64, V)> for HybridTable<V> {
    fn extend<T: IntoIterator<Item = (i64, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V> FromIterator<(i64, V)> for HybridTable<V> {
    fn from_iter<T: IntoIterator<Item = (i64, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

/// Iterator over all table entries, bucket by bucket.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Bucket<V>>,
    current: Option<bucket::Iter<'a, V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(item);
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a HybridTable<V> {
    type Item = (i64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}
