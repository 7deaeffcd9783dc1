//! Chain: the singly-linked representation of a small bucket.

use core::fmt;
use core::iter::FusedIterator;

struct ChainNode<V> {
    key: i64,
    value: V,
    next: Link<V>,
}

type Link<V> = Option<Box<ChainNode<V>>>;

/// Singly-linked list of unique keys, newest first.
pub struct Chain<V> {
    head: Link<V>,
    len: usize,
}

impl<V> Chain<V> {
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Overwrite the value for an existing key, or prepend a new node.
    /// Returns the previous value on overwrite.
    pub fn insert(&mut self, key: i64, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(key) {
            return Some(core::mem::replace(slot, value));
        }
        self.push_front(key, value);
        None
    }

    /// Prepend without a duplicate check; callers guarantee `key` is absent.
    fn push_front(&mut self, key: i64, value: V) {
        let node = Box::new(ChainNode {
            key,
            value,
            next: self.head.take(),
        });
        self.head = Some(node);
        self.len += 1;
    }

    pub fn get(&self, key: i64) -> Option<&V> {
        self.iter().find(|&(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        let mut cur = self.head.as_deref_mut();
        while let Some(node) = cur {
            if node.key == key {
                return Some(&mut node.value);
            }
            cur = node.next.as_deref_mut();
        }
        None
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.get(key).is_some()
    }

    /// Unlink the node holding `key` and hand back its value.
    pub fn remove(&mut self, key: i64) -> Option<V> {
        let mut link = &mut self.head;
        loop {
            match link {
                None => return None,
                Some(node) if node.key == key => {
                    let next = node.next.take();
                    let removed = core::mem::replace(link, next)?;
                    self.len -= 1;
                    return Some(removed.value);
                }
                Some(node) => link = &mut node.next,
            }
        }
    }

    /// Entries from head to tail.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            cur: self.head.as_deref(),
            remaining: self.len,
        }
    }

    fn pop_front(&mut self) -> Option<(i64, V)> {
        let node = self.head.take()?;
        let ChainNode { key, value, next } = *node;
        self.head = next;
        self.len -= 1;
        Some((key, value))
    }
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for Chain<V> {
    fn drop(&mut self) {
        // Unlink one node at a time so dropping never recurses down the list.
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Builds a chain whose head-to-tail order equals the input order.
/// Keys must be unique; no duplicate check is performed.
impl<V> FromIterator<(i64, V)> for Chain<V> {
    fn from_iter<I: IntoIterator<Item = (i64, V)>>(iter: I) -> Self {
        let entries: Vec<(i64, V)> = iter.into_iter().collect();
        let mut chain = Chain::new();
        for (key, value) in entries.into_iter().rev() {
            chain.push_front(key, value);
        }
        chain
    }
}

/// Iterator over chain entries, head to tail.
pub struct Iter<'a, V> {
    cur: Option<&'a ChainNode<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = node.next.as_deref();
        self.remaining -= 1;
        Some((node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Consuming iterator, head to tail.
pub struct IntoIter<V> {
    chain: Chain<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (i64, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.chain.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for Chain<V> {
    type Item = (i64, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter { chain: self }
    }
}
