use std::{cmp::Ordering, slice::Iter};

use crate::list::{NodeIndex, Slots};

/// A Trie node that holds a single key character, the indices of its children
/// and, when some stored key ends exactly here, that key's value.
///
/// The root node is the only node whose character is [Option::None]. For the
/// sake of efficient serialization, if the `value` field is [Option::None] then
/// it will not serialize at all instead of just serializing as `null`.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "V: serde::Deserialize<'de>"))
)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
pub(crate) struct Node<V> {
    /// The character this node stands for.
    fragment: Option<char>,
    /// The children, sorted by their character.
    children: Vec<NodeIndex>,
    /// Present iff a stored key terminates at this node.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    value: Option<V>,
    /// How many stored keys pass through this node. Unused on the root.
    ref_count: usize,
}

impl<V> Node<V> {
    /// Creates a new root node. This just consists
    /// of a normal node with a `null` character.
    pub const fn root() -> Self {
        Node {
            fragment: None,
            children: Vec::new(),
            value: None,
            ref_count: 0,
        }
    }
    /// Creates a node for a single key character. It starts out
    /// unreferenced; the caller bumps the count as keys pass through.
    pub fn keyed(fragment: char) -> Self {
        Self {
            fragment: Some(fragment),
            children: Vec::new(),
            value: None,
            ref_count: 0,
        }
    }
}

impl<V> Node<V> {
    /// Gets the node character. This will be [Option::None] in the case
    /// that we are dealing with a root node.
    pub fn fragment(&self) -> Option<char> {
        self.fragment
    }
    pub fn is_root(&self) -> bool {
        self.fragment.is_none()
    }
    /// Whether a stored key ends at this node.
    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }
    pub fn ref_count(&self) -> usize {
        self.ref_count
    }
    pub fn increment(&mut self) {
        self.ref_count += 1;
    }
    /// Drops one reference and returns the remaining count. The count
    /// saturates at zero.
    pub fn decrement(&mut self) -> usize {
        debug_assert!(self.ref_count > 0, "reference count underflow");
        self.ref_count = self.ref_count.saturating_sub(1);
        self.ref_count
    }
    /// Performs a binary search over the children with a function that provides
    /// an ordering for each child character.
    fn search_with<F>(&self, buffer: &Slots<V>, mut functor: F) -> Result<usize, usize>
    where
        F: FnMut(char) -> Ordering,
    {
        self.children.binary_search_by(|k| {
            // UNWRAP: This is okay, because no node can point to the root node.
            // The root node is the only node that has a null character.
            let sub = buffer[*k].fragment.expect("Child node was the root.");
            functor(sub)
        })
    }
    /// Finds the child standing for `fragment`.
    pub fn child(&self, fragment: char, buffer: &Slots<V>) -> Option<NodeIndex> {
        let position = self.search_with(buffer, |c| c.cmp(&fragment)).ok()?;
        Some(self.children[position])
    }
    /// Where a child standing for `fragment` belongs in the sorted child list.
    pub fn child_slot(&self, fragment: char, buffer: &Slots<V>) -> Result<usize, usize> {
        self.search_with(buffer, |c| c.cmp(&fragment))
    }
    pub fn insert_child_at(&mut self, position: usize, child: NodeIndex) {
        self.children.insert(position, child);
    }
    /// Removes a child index from the node.
    pub fn remove_child(&mut self, child: NodeIndex) -> Option<NodeIndex> {
        let position = self.children.iter().position(|s| *s == child)?;
        Some(self.children.remove(position))
    }
    /// Gets an iterator of all the children as [NodeIndex] values.
    pub fn children(&self) -> Iter<'_, NodeIndex> {
        self.children.iter()
    }
    pub fn children_mut(&mut self) -> &mut Vec<NodeIndex> {
        &mut self.children
    }
    pub fn child_len(&self) -> usize {
        self.children.len()
    }
    /// Returns an immutable reference to the inner value.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }
    /// Returns a mutable reference to the inner value.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }
    /// Marks the node terminal, returning the previous value if it was already.
    pub fn set_value(&mut self, value: V) -> Option<V> {
        self.value.replace(value)
    }
    /// Clears the terminal mark, returning the value it carried.
    pub fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }
}

#[cfg(test)]
mod tests {
    use super::Node;

    #[test]
    pub fn root_has_no_fragment() {
        let root = Node::<()>::root();
        assert!(root.is_root());
        assert!(!root.is_terminal());
        assert_eq!(root.fragment(), None);
    }

    #[test]
    pub fn terminal_follows_value() {
        let mut node = Node::keyed('c');
        assert!(!node.is_terminal());
        assert_eq!(node.set_value(5), None);
        assert!(node.is_terminal());
        assert_eq!(node.set_value(6), Some(5));
        assert_eq!(node.take_value(), Some(6));
        assert!(!node.is_terminal());
    }

    #[test]
    pub fn reference_counting() {
        let mut node = Node::<u8>::keyed('a');
        node.increment();
        node.increment();
        assert_eq!(node.ref_count(), 2);
        assert_eq!(node.decrement(), 1);
        assert_eq!(node.decrement(), 0);
    }
}
