//! hybrid-table: an integer-keyed hash table whose buckets are chains
//! while small and red-black trees once they grow, bounding the cost of
//! lookups under skewed or adversarial key sets.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the common case (a handful of keys per bucket) as cheap as
//!   plain separate chaining, while capping a hot bucket's lookup cost at
//!   O(log n) instead of O(n).
//! - Layers:
//!   - `hash`: golden-ratio multiplicative hashing of `i64` keys onto
//!     `[0, capacity)`.
//!   - `RbTree<V>`: red-black tree stored in a per-tree `SlotMap` arena;
//!     insert, find, and delete with rotation/recolor fixups.
//!   - `Chain<V>`: singly-linked list, newest entry first.
//!   - `Bucket<V>`: either representation; owns promotion (chain to
//!     tree) and demotion (tree to chain).
//!   - `HybridTable<V>`: fixed array of buckets plus the total count.
//!
//! Constraints
//! - Fixed capacity: no rehashing; capacity 0 selects a default.
//! - Unique keys: inserting an existing key overwrites its value in place
//!   and hands the old value back.
//! - Values are moved in and out, never cloned or inspected. For
//!   reference semantics, store `&T`, `Rc<T>`, or a handle.
//! - Single-threaded: no internal locking. The table is `Send`/`Sync`
//!   whenever `V` is, so it can sit behind a `Mutex`.
//!
//! Promotion and demotion
//! - A chain becomes a tree on the insert that takes it above
//!   `promote_above` (default 8); a tree becomes a chain on the removal
//!   that takes it below `demote_below` (default 4). The gap between the
//!   two keeps a bucket from flapping under insert/remove pairs.
//! - Conversions build the new representation completely and then swap
//!   it in with one assignment, so a bucket is never observed half
//!   converted.
//!
//! Tree representation
//! - Missing children are `None` links, read as BLACK; there is no shared
//!   sentinel node. Parent links are arena keys, not ownership.
//! - Deleting a node with two children moves its in-order successor's
//!   entry into it and unlinks the successor instead.
//!
//! Hashing negative keys
//! - The key's two's-complement bits are multiplied in 64-bit fixed
//!   point, which equals the floor-based fractional part of `key * A`.
//!   Every `i64` maps into range.
//!
//! Errors
//! - Not-found is `None`. Construction reports `Error` (bucket array
//!   allocation, bad thresholds). Node allocation failure aborts, as
//!   everywhere in `std`. `validate` reports `InvariantViolation`.
//!
//! ```
//! use hybrid_table::{BucketKind, HybridTable};
//!
//! let mut table = HybridTable::with_capacity(1).unwrap();
//! for k in 0..20 {
//!     table.insert(k, k * 10);
//! }
//! assert_eq!(table.find(7), Some(&70));
//! assert_eq!(table.bucket_kind(0), Some(BucketKind::Tree));
//!
//! for k in 3..20 {
//!     assert_eq!(table.remove(k), Some(k * 10));
//! }
//! assert_eq!(table.bucket_kind(0), Some(BucketKind::Chain));
//! assert_eq!(table.len(), 3);
//! ```

pub mod bucket;
pub mod chain;
mod config;
mod error;
pub mod hash;
pub mod rbtree;
mod rbtree_proptest;
pub mod table;

// Public surface
pub use bucket::{Bucket, BucketKind};
pub use chain::Chain;
pub use config::{
    TableConfig, Thresholds, DEFAULT_CAPACITY, DEFAULT_DEMOTE_BELOW, DEFAULT_PROMOTE_ABOVE,
};
pub use error::{Error, InvariantViolation};
pub use hash::{bucket_index, GOLDEN_RATIO_RECIPROCAL};
pub use rbtree::RbTree;
pub use table::HybridTable;
