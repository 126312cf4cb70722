//! Ordering of prefix matches for display. The trie itself answers
//! prefix queries in no particular order; ranking happens here.

use std::{cmp::Reverse, collections::HashMap};

/// Sorts entries by value, highest first. Equal values fall back to the
/// key in ascending order so the output is deterministic.
///
/// ```
/// use std::collections::HashMap;
/// use rankcomplete::rank_entries;
///
/// let entries = HashMap::from([
///     ("cat".to_string(), &1),
///     ("cats".to_string(), &3),
///     ("catnap".to_string(), &3),
/// ]);
///
/// let ranked = rank_entries(entries);
/// assert_eq!(ranked[0].0, "catnap");
/// assert_eq!(ranked[1].0, "cats");
/// assert_eq!(ranked[2].0, "cat");
/// ```
pub fn rank_entries<V: Ord>(entries: HashMap<String, &V>) -> Vec<(String, &V)> {
    let mut ranked = entries.into_iter().collect::<Vec<_>>();
    ranked.sort_unstable_by(|(ka, va), (kb, vb)| {
        (Reverse(*va), ka).cmp(&(Reverse(*vb), kb))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::rank_entries;

    #[test]
    pub fn empty_stays_empty() {
        assert!(rank_entries(HashMap::<String, &i64>::new()).is_empty());
    }

    #[test]
    pub fn descending_with_key_ties() {
        let entries = HashMap::from([
            ("b".to_string(), &-9),
            ("a".to_string(), &0),
            ("d".to_string(), &7),
            ("c".to_string(), &7),
        ]);
        let ranked = rank_entries(entries)
            .into_iter()
            .map(|(k, v)| (k, *v))
            .collect::<Vec<_>>();
        assert_eq!(
            ranked,
            [
                ("c".to_string(), 7),
                ("d".to_string(), 7),
                ("a".to_string(), 0),
                ("b".to_string(), -9),
            ]
        );
    }
}
