use rankcomplete::{
    Trie,
    records::{ImportMode, import_records},
};

const RECORDS: &str = "cat\\,5\r\ncatnap\\,9\r\ncatalog\\,7\r\ncattle\\,2\r\ndog\\,8\r\n";

pub fn main() {
    let mut trie = Trie::new();
    let summary = import_records(&mut trie, RECORDS.as_bytes(), ImportMode::SkipExisting).unwrap();
    println!("Loaded {} keys", summary.inserted);

    for (key, rank) in trie.ranked_completions("cat", Some(3)) {
        println!("{key}: {rank}");
    }
}
