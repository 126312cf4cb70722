use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

use crate::node::Node;

/// The array that holds all the underlying node data. It works
/// by holding a freelist for filling tombstone slots, and by maintaining
/// a simple vector. Defragmentation happens when called manually.
///
/// The slots will always have a root at position zero. In practice, this means
/// that indexing the root never fails. Great care is put into maintaining the
/// root within the list.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
pub(crate) struct Slots<V> {
    /// A list of optional slots containing nodes. These may be
    /// [Option::None] in the case of a tombstone, i.e., a node
    /// that once was but has since been pruned.
    slots: Vec<Option<Node<V>>>,
    /// A freelist of all the available space within the array.
    free_list: Vec<usize>,
}

/// Represents the index of a node within the [Slots]. Requires caution, as
/// defragmenting will cause indices to be invalidated. This is why the
/// struct is invisible to the end-developer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize),
    rkyv(derive(PartialEq, Debug))
)]
pub(crate) struct NodeIndex(u64);

impl NodeIndex {
    /// The root node, which always has an internal index of 0.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Gets the internal position of the node as a [usize].
    pub fn position(&self) -> usize {
        self.0 as usize
    }
}

impl<V> Slots<V> {
    /// Creates a new [Slots] with a certain amount of capacity, holding
    /// only the root.
    pub fn with_capacity(cap: usize) -> Self {
        let mut slots = Vec::with_capacity(cap.max(1));
        slots.push(Some(Node::root()));
        Self {
            slots,
            free_list: vec![],
        }
    }
    /// Gets the capacity of the [Slots].
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
    /// The number of live nodes, root included.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }
    /// Inserts a [Node] into the underlying [Vec], returning
    /// the new [NodeIndex]. Tombstones are reused first.
    pub fn insert(&mut self, item: Node<V>) -> NodeIndex {
        match self.free_list.pop() {
            Some(avail) => {
                self.slots[avail] = Some(item);
                NodeIndex(avail as u64)
            }
            None => {
                self.slots.push(Some(item));
                NodeIndex((self.slots.len() - 1) as u64)
            }
        }
    }
    /// Removes a node from the underlying [Vec], leaving a tombstone. The
    /// root can never be removed; asking for it returns [Option::None].
    pub fn remove(&mut self, index: NodeIndex) -> Option<Node<V>> {
        if index == NodeIndex::ROOT {
            return None;
        }
        let node = self.slots.get_mut(index.position())?.take()?;
        self.free_list.push(index.position());
        Some(node)
    }
    /// Returns an iterator of node indices alongside the [Node] objects themselves.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node<V>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, f)| Some((NodeIndex(i as u64), f.as_ref()?)))
    }
    /// Finds the child of `parent` standing for `fragment`, creating it
    /// if it does not exist yet.
    pub fn child_or_insert(&mut self, parent: NodeIndex, fragment: char) -> NodeIndex {
        match self[parent].child_slot(fragment, self) {
            Ok(found) => *self[parent]
                .children()
                .nth(found)
                .expect("Binary search returned an out of bounds child."),
            Err(position) => {
                let child = self.insert(Node::keyed(fragment));
                self[parent].insert_child_at(position, child);
                child
            }
        }
    }
    /// Clears the underlying vector, reinserting the root node into
    /// the [Slots]. The whole structure is dropped at once.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.slots.push(Some(Node::root()));
    }
    /// Moves every live node to the front of the vector, closing the gaps
    /// left by tombstones, and returns the old-to-new index mapping.
    fn get_defrag_map(&mut self) -> HashMap<NodeIndex, NodeIndex> {
        let mut remapper = HashMap::<NodeIndex, NodeIndex>::new();

        // The drag trails behind the scan, pointing at the next slot to fill.
        let mut drag = 0;
        for index in 0..self.slots.len() {
            if self.slots[index].is_none() {
                continue;
            }
            if drag != index {
                remapper.insert(NodeIndex(index as u64), NodeIndex(drag as u64));
                self.slots.swap(index, drag);
            }
            drag += 1;
        }
        remapper
    }
    /// Defragments the slots. This corrects all INTERNAL node indices, but
    /// any index held outside of the [Slots] becomes invalid. Returns how many
    /// nodes moved.
    pub fn defragment(&mut self) -> usize {
        let remapper = self.get_defrag_map();

        // Every tombstone now sits at the tail, so the free-list goes with them.
        self.free_list.clear();
        while self.slots.last().is_some_and(Option::is_none) {
            self.slots.pop();
        }

        if remapper.is_empty() {
            return 0;
        }

        for node in self.slots.iter_mut().filter_map(Option::as_mut) {
            for key in node.children_mut() {
                if let Some(new_k) = remapper.get(key) {
                    *key = *new_k;
                }
            }
        }
        remapper.len()
    }
    /// Defragments and then reduces the internal vector to the minimum
    /// possible capacity.
    pub fn shrink_to_fit(&mut self) -> usize {
        let moved = self.defragment();
        self.slots.shrink_to_fit();
        self.free_list.shrink_to_fit();
        moved
    }
}

impl<V> Index<NodeIndex> for Slots<V> {
    type Output = Node<V>;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        self.slots[index.position()]
            .as_ref()
            .expect("Could not find node at requested index.")
    }
}

impl<V> IndexMut<NodeIndex> for Slots<V> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        self.slots[index.position()]
            .as_mut()
            .expect("Could not find node at requested index.")
    }
}
