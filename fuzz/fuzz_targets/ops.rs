#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rankcomplete::Trie;
use std::collections::HashMap;

#[derive(Arbitrary, Debug)]
pub enum Ops {
    Put(String, u8),
    Update(String, u8),
    Remove(String),
    Get(String),
    Prefix(String),
    RemoveAll,
    Shrink,
}

fuzz_target!(|data: Vec<Ops>| {
    let mut trie = Trie::<u8>::new();

    let mut twin = HashMap::<String, u8>::new();

    for datum in data {
        match datum {
            Ops::Put(key, value) => {
                let fresh = !key.is_empty() && !twin.contains_key(&key);
                assert_eq!(trie.put(&key, value), fresh);
                if fresh {
                    twin.insert(key, value);
                }
            }
            Ops::Update(key, value) => {
                let stored = twin.contains_key(&key);
                assert_eq!(trie.update(&key, value), stored);
                if stored {
                    twin.insert(key, value);
                }
            }
            Ops::Remove(key) => {
                assert_eq!(trie.try_remove(&key).ok(), twin.remove(&key));
            }
            Ops::Get(key) => {
                assert_eq!(trie.get(&key), twin.get(&key));
            }
            Ops::Prefix(prefix) => {
                let found = trie.entries_with_prefix(&prefix);
                let wanted = twin.iter().filter(|(k, _)| k.starts_with(&prefix)).count();
                assert_eq!(found.len(), wanted);
                for (key, value) in found {
                    assert_eq!(twin.get(&key), Some(value));
                }
            }
            Ops::RemoveAll => {
                trie.remove_all();
                twin.clear();
            }
            Ops::Shrink => {
                trie.shrink_to_fit();
            }
        }

        assert_eq!(trie.size(), twin.len());
    }
});
