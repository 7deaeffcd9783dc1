//! RbTree: red-black tree over `i64` keys, stored in a per-tree arena.
//!
//! Nodes live in a `SlotMap` and refer to each other by `NodeKey`. A link
//! is `Option<NodeKey>`; `None` plays the role of the classic sentinel
//! leaf and is always read as BLACK. Parent links are plain keys used for
//! walking upward during fixups; ownership is the arena's alone.
//!
//! Invariants after every public call returns:
//! 1. every node is RED or BLACK, and missing children count as BLACK;
//! 2. the root is BLACK;
//! 3. no RED node has a RED child;
//! 4. all paths from a node down to a missing child cross the same number
//!    of BLACK nodes;
//! 5. in-order keys are strictly ascending.

use crate::error::InvariantViolation;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    struct NodeKey;
}

type Link = Option<NodeKey>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Color {
    Red,
    Black,
}

/// Which child slot. Rotations and fixups are written once per side.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug)]
struct Node<V> {
    key: i64,
    value: V,
    color: Color,
    left: Link,
    right: Link,
    parent: Link,
}

impl<V> Node<V> {
    #[inline]
    fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

pub struct RbTree<V> {
    nodes: SlotMap<NodeKey, Node<V>>,
    root: Link,
}

impl<V> RbTree<V> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // ---- link helpers ----

    #[inline]
    fn color(&self, link: Link) -> Color {
        link.map_or(Color::Black, |k| self.nodes[k].color)
    }

    #[inline]
    fn set_color(&mut self, link: Link, color: Color) {
        if let Some(k) = link {
            self.nodes[k].color = color;
        }
    }

    #[inline]
    fn child(&self, k: NodeKey, side: Side) -> Link {
        self.nodes[k].child(side)
    }

    #[inline]
    fn parent(&self, k: NodeKey) -> Link {
        self.nodes[k].parent
    }

    /// Which side of its parent `k` hangs on. `None` for the root.
    #[inline]
    fn side_of(&self, k: NodeKey) -> Option<Side> {
        let p = self.parent(k)?;
        if self.nodes[p].left == Some(k) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// Point whatever referenced `old` (parent slot or root) at `new`.
    fn replace_in_parent(&mut self, old: NodeKey, new: Link) {
        let parent = self.parent(old);
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = if self.nodes[p].left == Some(old) {
                    Side::Left
                } else {
                    Side::Right
                };
                *self.nodes[p].child_mut(side) = new;
            }
        }
        if let Some(n) = new {
            self.nodes[n].parent = parent;
        }
    }

    /// Rotate `x` down towards `side`; its child on the opposite side rises
    /// into its place. In-order key order is preserved and no colors change.
    ///
    /// `rotate(x, Side::Left)` is the classic left rotation.
    fn rotate(&mut self, x: NodeKey, side: Side) {
        let rising = side.opposite();
        let Some(y) = self.child(x, rising) else {
            return;
        };
        let inner = self.child(y, side);
        *self.nodes[x].child_mut(rising) = inner;
        if let Some(b) = inner {
            self.nodes[b].parent = Some(x);
        }
        self.replace_in_parent(x, Some(y));
        *self.nodes[y].child_mut(side) = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn minimum(&self, mut k: NodeKey) -> NodeKey {
        while let Some(l) = self.nodes[k].left {
            k = l;
        }
        k
    }

    fn maximum(&self, mut k: NodeKey) -> NodeKey {
        while let Some(r) = self.nodes[k].right {
            k = r;
        }
        k
    }

    fn find_node(&self, key: i64) -> Link {
        let mut cur = self.root;
        while let Some(k) = cur {
            let node = &self.nodes[k];
            cur = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(k),
            };
        }
        None
    }

    // ---- lookup ----

    pub fn get(&self, key: i64) -> Option<&V> {
        let k = self.find_node(key)?;
        Some(&self.nodes[k].value)
    }

    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        let k = self.find_node(key)?;
        Some(&mut self.nodes[k].value)
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.find_node(key).is_some()
    }

    pub fn min_key(&self) -> Option<i64> {
        self.root.map(|r| self.nodes[self.minimum(r)].key)
    }

    pub fn max_key(&self) -> Option<i64> {
        self.root.map(|r| self.nodes[self.maximum(r)].key)
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn height(&self) -> usize {
        let mut best = 0;
        let mut stack: Vec<(NodeKey, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((k, depth)) = stack.pop() {
            best = best.max(depth);
            let node = &self.nodes[k];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        best
    }

    // ---- insert ----

    /// Insert or overwrite. Returns the previous value when `key` was present;
    /// an overwrite leaves the tree shape untouched.
    pub fn insert(&mut self, key: i64, value: V) -> Option<V> {
        let mut parent: Link = None;
        let mut side = Side::Left;
        let mut cur = self.root;
        while let Some(k) = cur {
            let node = &mut self.nodes[k];
            side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
            };
            parent = Some(k);
            cur = node.child(side);
        }

        // The node is fully built before any existing link changes.
        let z = self.nodes.insert(Node {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        });
        match parent {
            None => self.root = Some(z),
            Some(p) => *self.nodes[p].child_mut(side) = Some(z),
        }
        self.insert_fixup(z);
        None
    }

    fn insert_fixup(&mut self, mut z: NodeKey) {
        while let Some(p) = self.parent(z) {
            if self.nodes[p].color == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(g) = self.parent(p) else {
                break;
            };
            let Some(p_side) = self.side_of(p) else {
                break;
            };
            let uncle = self.child(g, p_side.opposite());

            if self.color(uncle) == Color::Red {
                self.nodes[p].color = Color::Black;
                self.set_color(uncle, Color::Black);
                self.nodes[g].color = Color::Red;
                z = g;
                continue;
            }

            let mut p = p;
            if self.child(p, p_side.opposite()) == Some(z) {
                // Inner grandchild: turn it into the outer case.
                self.rotate(p, p_side);
                z = p;
                p = match self.parent(z) {
                    Some(p) => p,
                    None => break,
                };
            }
            self.nodes[p].color = Color::Black;
            self.nodes[g].color = Color::Red;
            self.rotate(g, p_side.opposite());
            break;
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    // ---- remove ----

    /// Remove `key` and return its value.
    ///
    /// A node with two children takes over its in-order successor's entry,
    /// and the successor (which has at most one child) is unlinked instead.
    pub fn remove(&mut self, key: i64) -> Option<V> {
        let z = self.find_node(key)?;
        let target = match (self.nodes[z].left, self.nodes[z].right) {
            (Some(_), Some(r)) => self.minimum(r),
            _ => z,
        };

        let child = self.nodes[target].left.or(self.nodes[target].right);
        let child_parent = self.parent(target);
        self.replace_in_parent(target, child);
        let removed = self.nodes.remove(target)?;
        if removed.color == Color::Black {
            self.remove_fixup(child, child_parent);
        }

        if target == z {
            Some(removed.value)
        } else {
            let node = &mut self.nodes[z];
            node.key = removed.key;
            Some(mem::replace(&mut node.value, removed.value))
        }
    }

    /// Restore black-height after a BLACK node was unlinked. `x` carries the
    /// extra black; it may be a missing child, so its parent is tracked
    /// separately.
    fn remove_fixup(&mut self, mut x: Link, mut parent: Link) {
        while x != self.root && self.color(x) == Color::Black {
            let Some(p) = parent else {
                break;
            };
            let side = if self.nodes[p].left == x {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.opposite();

            // The sibling of a doubly-black position always exists.
            let Some(mut w) = self.child(p, far) else {
                break;
            };

            if self.nodes[w].color == Color::Red {
                self.nodes[w].color = Color::Black;
                self.nodes[p].color = Color::Red;
                self.rotate(p, side);
                w = match self.child(p, far) {
                    Some(w) => w,
                    None => break,
                };
            }

            let near_nephew = self.child(w, side);
            let far_nephew = self.child(w, far);
            if self.color(near_nephew) == Color::Black && self.color(far_nephew) == Color::Black {
                self.nodes[w].color = Color::Red;
                x = Some(p);
                parent = self.parent(p);
                continue;
            }

            if self.color(far_nephew) == Color::Black {
                self.set_color(near_nephew, Color::Black);
                self.nodes[w].color = Color::Red;
                self.rotate(w, far);
                w = match self.child(p, far) {
                    Some(w) => w,
                    None => break,
                };
            }

            self.nodes[w].color = self.nodes[p].color;
            self.nodes[p].color = Color::Black;
            let far_nephew = self.child(w, far);
            self.set_color(far_nephew, Color::Black);
            self.rotate(p, side);
            x = self.root;
            break;
        }
        self.set_color(x, Color::Black);
    }

    // ---- traversal ----

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut it = Iter {
            tree: self,
            stack: Vec::new(),
            remaining: self.len(),
        };
        it.push_left_spine(self.root);
        it
    }

    /// Consume the tree, yielding its entries in ascending key order.
    pub fn into_sorted_entries(mut self) -> Vec<(i64, V)> {
        let order: Vec<NodeKey> = {
            let mut order = Vec::with_capacity(self.len());
            let mut stack = Vec::new();
            let mut cur = self.root;
            loop {
                while let Some(k) = cur {
                    stack.push(k);
                    cur = self.nodes[k].left;
                }
                let Some(k) = stack.pop() else {
                    break;
                };
                order.push(k);
                cur = self.nodes[k].right;
            }
            order
        };
        self.root = None;
        order
            .into_iter()
            .filter_map(|k| self.nodes.remove(k))
            .map(|n| (n.key, n.value))
            .collect()
    }

    /// Verify invariants 1-5 plus parent links and the length by a full
    /// traversal. Returns the root's black-height.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        let Some(root) = self.root else {
            return if self.nodes.is_empty() {
                Ok(0)
            } else {
                Err(InvariantViolation::Length {
                    recorded: self.nodes.len(),
                    counted: 0,
                })
            };
        };
        if self.nodes[root].color != Color::Black {
            return Err(InvariantViolation::RedRoot);
        }
        if self.nodes[root].parent.is_some() {
            return Err(InvariantViolation::ParentLink {
                key: self.nodes[root].key,
            });
        }
        let mut counted = 0;
        let mut last: Option<i64> = None;
        let black_height = self.check_subtree(root, &mut counted, &mut last)?;
        if counted != self.nodes.len() {
            return Err(InvariantViolation::Length {
                recorded: self.nodes.len(),
                counted,
            });
        }
        Ok(black_height)
    }

    /// Recursive in-order check; depth is bounded by the tree height,
    /// which the red-black rules keep logarithmic when they hold.
    fn check_subtree(
        &self,
        k: NodeKey,
        counted: &mut usize,
        last: &mut Option<i64>,
    ) -> Result<usize, InvariantViolation> {
        let node = &self.nodes[k];
        for child in [node.left, node.right].into_iter().flatten() {
            let c = self
                .nodes
                .get(child)
                .ok_or(InvariantViolation::ParentLink { key: node.key })?;
            if c.parent != Some(k) {
                return Err(InvariantViolation::ParentLink { key: c.key });
            }
            if node.color == Color::Red && c.color == Color::Red {
                return Err(InvariantViolation::RedRed { key: node.key });
            }
        }

        let left_height = match node.left {
            Some(l) => self.check_subtree(l, counted, last)?,
            None => 0,
        };
        if last.is_some_and(|prev| prev >= node.key) {
            return Err(InvariantViolation::Order { key: node.key });
        }
        *last = Some(node.key);
        *counted += 1;
        let right_height = match node.right {
            Some(r) => self.check_subtree(r, counted, last)?,
            None => 0,
        };

        if left_height != right_height {
            return Err(InvariantViolation::BlackHeight { key: node.key });
        }
        Ok(left_height + usize::from(node.color == Color::Black))
    }
}

impl<V> Default for RbTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for RbTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// In-order iterator over an `RbTree`.
pub struct Iter<'a, V> {
    tree: &'a RbTree<V>,
    stack: Vec<NodeKey>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    fn push_left_spine(&mut self, mut cur: Link) {
        while let Some(k) = cur {
            self.stack.push(k);
            cur = self.tree.nodes[k].left;
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let k = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.nodes[k];
        self.push_left_spine(node.right);
        self.remaining -= 1;
        Some((node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}
