#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use rankcomplete::{
    Trie,
    records::{DELIMITER, ImportMode, export_records, import_records},
};

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let Ok(mut trie) = Trie::<i64>::arbitrary(&mut unstructured) else {
        return;
    };
    let before = trie.clone();

    // A rejected batch must leave the trie exactly as it was.
    let input = unstructured.take_rest();
    if import_records(&mut trie, input, ImportMode::Overwrite).is_err() {
        assert_eq!(trie, before);
        return;
    }

    // Keys holding a delimiter or line break cannot be written back out.
    if trie
        .iter()
        .any(|(key, _)| key.contains(DELIMITER) || key.contains(['\n', '\r']))
    {
        return;
    }

    let mut buffer = Vec::new();
    export_records(&trie, &mut buffer).unwrap();

    let mut copy = Trie::new();
    import_records(&mut copy, buffer.as_slice(), ImportMode::SkipExisting).unwrap();
    assert_eq!(copy, trie);
});
