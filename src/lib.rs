//! A prefix trie over string keys, built to answer autocomplete queries.
//!
//! Every node counts how many stored keys pass through it. Removing a key
//! walks back up its path and prunes exactly the nodes no other key needs,
//! so keys that share a prefix never disturb one another.
//!
//! ```
//! use rankcomplete::Trie;
//!
//! let mut trie = Trie::new();
//! trie.put("cat", 5);
//! trie.put("catnap", 9);
//! trie.put("dog", 2);
//!
//! let ranked = trie.ranked_completions("ca", None);
//! assert_eq!(ranked[0], ("catnap".to_string(), &9));
//! assert_eq!(ranked[1], ("cat".to_string(), &5));
//! ```

use std::{collections::HashMap, mem, ops::Index};

use list::{NodeIndex, Slots};
use tracing::trace;

mod error;
mod iter;
mod list;
mod node;
mod rank;
pub mod records;

pub use crate::error::{ImportError, TrieError};
pub use crate::iter::PrefixIter;
pub use crate::rank::rank_entries;

/// A map from non-empty string keys to values, with prefix retrieval.
///
/// Keys are split into characters; keys sharing a prefix share the nodes
/// along it. The structure is single-threaded. Wrap it in a lock to share
/// it, as every mutation may touch an entire prefix path.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
pub struct Trie<V> {
    /// The node pool, this is where the internal nodes are actually stored. This
    /// improves cache locality and ease of access while limiting weird lifetime errors.
    node: Slots<V>,
    /// The amount of keys in the Trie.
    size: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    /// Creates a new [Trie] with no keys.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let tree = Trie::<i64>::new();
    /// assert_eq!(tree.size(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    /// Creates a new [Trie] with room for a certain number of nodes.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let tree = Trie::<usize>::with_capacity(20);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 20);
    /// ```
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            node: Slots::with_capacity(nodes),
            size: 0,
        }
    }
    /// How many nodes the arena holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.node.capacity()
    }
    /// The number of live nodes below the root.
    pub fn node_count(&self) -> usize {
        self.node.live() - 1
    }
    /// Follows `path` from the root. The empty path lands on the root.
    fn walk(&self, path: &str) -> Option<NodeIndex> {
        let mut current = NodeIndex::ROOT;
        for fragment in path.chars() {
            current = self.node[current].child(fragment, &self.node)?;
        }
        Some(current)
    }
    /// Finds the node where `key` ends, if `key` is stored.
    fn lookup_key(&self, key: &str) -> Option<NodeIndex> {
        if key.is_empty() || self.is_empty() {
            return None;
        }
        self.walk(key)
            .filter(|index| self.node[*index].is_terminal())
    }
    /// Gets the value stored for exactly `key`. Nodes that merely lie on the
    /// path of longer keys hold no value.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let mut tree = Trie::new();
    /// tree.put("hello", "world");
    /// assert_eq!(tree.get("hello"), Some(&"world"));
    /// assert_eq!(tree.get("hell"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&V> {
        self.node[self.lookup_key(key)?].value()
    }
    /// Gets a mutable reference to the value stored for exactly `key`.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let mut tree = Trie::new();
    /// tree.put("hello", 1);
    /// *tree.get_mut("hello").unwrap() += 1;
    /// assert_eq!(tree.get("hello"), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.lookup_key(key)?;
        self.node[index].value_mut()
    }
    /// Checks if the [Trie] stores `key`. This occurs in the same time as
    /// [Trie::get].
    pub fn contains(&self, key: &str) -> bool {
        self.lookup_key(key).is_some()
    }
    /// Stores a new key. Unlike a map insert this never replaces the value of
    /// a key that is already stored; use [Trie::try_update] for that.
    ///
    /// # Errors
    /// [TrieError::InvalidKey] for the empty key and
    /// [TrieError::DuplicateKey] if `key` is already stored. Either way
    /// nothing is touched.
    pub fn try_put(&mut self, key: &str, value: V) -> Result<(), TrieError> {
        if key.is_empty() {
            return Err(TrieError::InvalidKey);
        }
        if self.contains(key) {
            return Err(TrieError::DuplicateKey(key.to_string()));
        }

        let mut current = NodeIndex::ROOT;
        for fragment in key.chars() {
            current = self.node.child_or_insert(current, fragment);
            self.node[current].increment();
        }
        self.node[current].set_value(value);
        self.size += 1;
        Ok(())
    }
    /// Stores a new key, returning false if the key is empty or already
    /// stored. The stored value is kept in the latter case.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let mut tree = Trie::new();
    /// assert!(tree.put("cat", 5));
    /// assert!(!tree.put("cat", 7));
    /// assert!(!tree.put("", 1));
    /// assert_eq!(tree.get("cat"), Some(&5));
    /// ```
    pub fn put(&mut self, key: &str, value: V) -> bool {
        self.try_put(key, value).is_ok()
    }
    /// Replaces the value of a stored key, returning the old value.
    ///
    /// # Errors
    /// [TrieError::InvalidKey] for the empty key and
    /// [TrieError::KeyNotFound] if `key` is not stored, including when it
    /// only exists as a prefix of longer keys.
    pub fn try_update(&mut self, key: &str, value: V) -> Result<V, TrieError> {
        if key.is_empty() {
            return Err(TrieError::InvalidKey);
        }
        let not_found = || TrieError::KeyNotFound(key.to_string());
        let index = self.lookup_key(key).ok_or_else(not_found)?;
        let slot = self.node[index].value_mut().ok_or_else(not_found)?;
        Ok(mem::replace(slot, value))
    }
    /// Replaces the value of a stored key. Returns false, changing nothing,
    /// when the key is not stored.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let mut tree = Trie::new();
    /// tree.put("cat", 5);
    /// assert!(tree.update("cat", 1));
    /// assert!(!tree.update("ca", 1));
    /// assert_eq!(tree.get("cat"), Some(&1));
    /// ```
    pub fn update(&mut self, key: &str, value: V) -> bool {
        self.try_update(key, value).is_ok()
    }
    /// Removes a stored key and returns its value.
    ///
    /// Every node on the key's path loses one reference, deepest first. A
    /// node left with none is detached from its parent and its slot freed;
    /// nodes still used by other keys stay where they are.
    ///
    /// # Errors
    /// [TrieError::InvalidKey] for the empty key and
    /// [TrieError::KeyNotFound] if `key` is not stored.
    pub fn try_remove(&mut self, key: &str) -> Result<V, TrieError> {
        if key.is_empty() {
            return Err(TrieError::InvalidKey);
        }
        let not_found = || TrieError::KeyNotFound(key.to_string());
        if self.is_empty() {
            return Err(not_found());
        }

        // Record every (parent, child) edge taken.
        let mut path = Vec::with_capacity(key.len());
        let mut current = NodeIndex::ROOT;
        for fragment in key.chars() {
            let child = self.node[current]
                .child(fragment, &self.node)
                .ok_or_else(not_found)?;
            path.push((current, child));
            current = child;
        }
        let value = self.node[current].take_value().ok_or_else(not_found)?;

        for (parent, child) in path.into_iter().rev() {
            if self.node[child].decrement() > 0 {
                continue;
            }
            // Anything below went through this node, so it is already gone.
            debug_assert_eq!(self.node[child].child_len(), 0);
            self.node[parent].remove_child(child);
            self.node.remove(child);
            trace!(slot = child.position(), "pruned node");
        }

        self.size -= 1;
        Ok(value)
    }
    /// Removes a stored key. Returns false, changing nothing, when the key
    /// is not stored.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let mut tree = Trie::new();
    /// tree.put("cat", 5);
    /// tree.put("c", 5);
    ///
    /// assert!(tree.remove("c"));
    /// assert!(!tree.remove("ca"));
    /// assert_eq!(tree.get("cat"), Some(&5));
    /// ```
    pub fn remove(&mut self, key: &str) -> bool {
        self.try_remove(key).is_ok()
    }
    /// Drops every key at once. The arena is reset to a lone root.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let mut tree = Trie::from([("cat", 1), ("dog", 2)]);
    /// tree.remove_all();
    /// assert!(tree.is_empty());
    /// assert!(tree.all_entries().is_empty());
    /// ```
    pub fn remove_all(&mut self) {
        self.node.clear();
        self.size = 0;
    }
    /// Returns the amount of keys within the [Trie].
    pub fn size(&self) -> usize {
        self.size
    }
    /// Returns true if the [Trie] stores no keys.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
    /// Lazily walks every key starting with `prefix`. The empty prefix walks
    /// the whole [Trie].
    pub fn prefix_iter(&self, prefix: &str) -> PrefixIter<'_, V> {
        match self.walk(prefix) {
            Some(start) => PrefixIter::starting_at(&self.node, start, prefix),
            None => PrefixIter::empty(&self.node),
        }
    }
    /// Walks every stored key.
    pub fn iter(&self) -> PrefixIter<'_, V> {
        self.prefix_iter("")
    }
    /// Collects every key starting with `prefix`, the prefix itself included
    /// when it is stored. The result carries no order.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let tree = Trie::from([("cat", 1), ("cats", 3), ("dog", 8)]);
    ///
    /// let found = tree.entries_with_prefix("cat");
    /// assert_eq!(found.len(), 2);
    /// assert_eq!(found["cats"], &3);
    /// assert!(tree.entries_with_prefix("z").is_empty());
    /// ```
    pub fn entries_with_prefix(&self, prefix: &str) -> HashMap<String, &V> {
        self.prefix_iter(prefix).collect()
    }
    /// Collects every stored entry.
    pub fn all_entries(&self) -> HashMap<String, &V> {
        self.entries_with_prefix("")
    }
    /// The entries starting with `prefix`, highest value first, keeping at
    /// most `limit` of them.
    pub fn ranked_completions(&self, prefix: &str, limit: Option<usize>) -> Vec<(String, &V)>
    where
        V: Ord,
    {
        let mut ranked = rank_entries(self.entries_with_prefix(prefix));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }
    /// Closes the gaps pruning leaves in the node arena and releases spare
    /// capacity. Stored entries are unaffected.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let mut tree = Trie::from([("apple", 1), ("banana", 2)]);
    /// tree.remove("apple");
    /// tree.shrink_to_fit();
    /// assert_eq!(tree.get("banana"), Some(&2));
    /// ```
    pub fn shrink_to_fit(&mut self) {
        let moved = self.node.shrink_to_fit();
        trace!(moved, nodes = self.node_count(), "compacted node arena");
    }
}

impl<V> Index<&str> for Trie<V> {
    type Output = V;

    /// Indexes into the [Trie] by key.
    ///
    /// # Panics
    /// If the key is not stored.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let tree = Trie::from([("apple", 4)]);
    /// assert_eq!(tree["apple"], 4);
    /// ```
    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).expect("key not found in Trie")
    }
}

impl<V> PartialEq for Trie<V>
where
    V: PartialEq,
{
    /// Two tries are equal when they store the same entries, regardless of
    /// how their arenas are laid out.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().all(|(key, value)| other.get(&key) == Some(value))
    }
}

impl<V: Eq> Eq for Trie<V> {}

impl<'a, V> IntoIterator for &'a Trie<V> {
    type Item = (String, &'a V);
    type IntoIter = PrefixIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S, V> Extend<(S, V)> for Trie<V>
where
    S: AsRef<str>,
{
    /// Puts every pair into the [Trie]. Keys that are already stored keep
    /// their value.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let mut tree = Trie::from([("hello", 1)]);
    /// tree.extend([("hello", 2), ("world", 3)]);
    ///
    /// assert_eq!(tree.get("hello"), Some(&1));
    /// assert_eq!(tree.get("world"), Some(&3));
    /// ```
    #[inline]
    fn extend<T: IntoIterator<Item = (S, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key.as_ref(), value);
        }
    }
}

impl<S, V> FromIterator<(S, V)> for Trie<V>
where
    S: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}

impl<S, V, const N: usize> From<[(S, V); N]> for Trie<V>
where
    S: AsRef<str>,
{
    /// Creates a [Trie] from an array of key/value tuples.
    ///
    /// ```
    /// use rankcomplete::Trie;
    ///
    /// let trie = Trie::from([("hello", 4)]);
    ///
    /// assert_eq!(trie.size(), 1);
    /// assert_eq!(trie.get("hello"), Some(&4));
    /// ```
    fn from(arr: [(S, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, V> arbitrary::Arbitrary<'a> for Trie<V>
where
    V: arbitrary::Arbitrary<'a>,
{
    /// Builds a [Trie] through [Trie::put], so the result always holds its
    /// structural invariants.
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut trie = Trie::new();
        for entry in u.arbitrary_iter::<(String, V)>()? {
            let (key, value) = entry?;
            trie.put(&key, value);
        }
        Ok(trie)
    }
}
