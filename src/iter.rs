use std::iter::FusedIterator;

use crate::list::{NodeIndex, Slots};

/// A lazy walk over every stored key below some prefix, yielding
/// the rebuilt key alongside a reference to its value.
///
/// The walk is depth-first over an explicit stack, so long keys never
/// deepen the call stack. Keys happen to come out in character order,
/// but callers should not rely on any ordering.
///
/// ```
/// use rankcomplete::Trie;
///
/// let trie = Trie::from([("hello", 1), ("help", 2), ("world", 3)]);
///
/// let mut words = trie.prefix_iter("hel").map(|(k, _)| k).collect::<Vec<_>>();
/// words.sort();
///
/// assert_eq!(words, ["hello", "help"]);
/// ```
#[derive(Debug, Clone)]
pub struct PrefixIter<'a, V> {
    slots: &'a Slots<V>,
    /// Nodes left to visit, each with the length the path had before it.
    stack: Vec<(NodeIndex, usize)>,
    /// Characters from the root down to the node last visited.
    path: Vec<char>,
}

impl<'a, V> PrefixIter<'a, V> {
    /// An iterator that yields nothing.
    pub(crate) fn empty(slots: &'a Slots<V>) -> Self {
        Self {
            slots,
            stack: Vec::new(),
            path: Vec::new(),
        }
    }
    /// Starts a walk at `start`, the node reached by following `prefix`.
    pub(crate) fn starting_at(slots: &'a Slots<V>, start: NodeIndex, prefix: &str) -> Self {
        let mut path: Vec<char> = prefix.chars().collect();
        // The start node pushes its own character back on when visited.
        if slots[start].fragment().is_some() {
            path.pop();
        }
        Self {
            slots,
            stack: vec![(start, path.len())],
            path,
        }
    }
}

impl<'a, V> Iterator for PrefixIter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        loop {
            let (index, depth) = self.stack.pop()?;
            let node = &slots[index];

            self.path.truncate(depth);
            if let Some(fragment) = node.fragment() {
                self.path.push(fragment);
            }

            // Reversed so the smallest character is visited first.
            let depth = self.path.len();
            self.stack
                .extend(node.children().rev().map(|child| (*child, depth)));

            if let Some(value) = node.value() {
                return Some((self.path.iter().collect(), value));
            }
        }
    }
}

impl<V> FusedIterator for PrefixIter<'_, V> {}

#[cfg(test)]
mod tests {
    use crate::Trie;

    #[test]
    pub fn walks_in_character_order() {
        let trie = Trie::from([("b", 1), ("ab", 2), ("a", 3), ("abc", 4)]);
        let keys = trie.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, ["a", "ab", "abc", "b"]);
    }

    #[test]
    pub fn start_node_is_yielded_when_terminal() {
        let trie = Trie::from([("ca", 6), ("cat", 1)]);
        let found = trie.prefix_iter("ca").collect::<Vec<_>>();
        assert_eq!(found, [("ca".to_string(), &6), ("cat".to_string(), &1)]);
    }

    #[test]
    pub fn missing_prefix_is_empty() {
        let trie = Trie::from([("cat", 1)]);
        assert!(trie.prefix_iter("dog").next().is_none());
        assert!(trie.prefix_iter("cats").next().is_none());
    }

    #[test]
    pub fn multibyte_keys_rebuild() {
        let trie = Trie::from([("naïve", 1), ("naïveté", 2), ("日本", 3)]);
        let mut found = trie.prefix_iter("naï").map(|(k, v)| (k, *v)).collect::<Vec<_>>();
        found.sort();
        assert_eq!(found, [("naïve".to_string(), 1), ("naïveté".to_string(), 2)]);
        assert_eq!(trie.prefix_iter("日").count(), 1);
    }
}
