//! The plain text form of a ranked trie: one `key\,rank` record per line.
//!
//! Imports are all-or-nothing. Every line is parsed and buffered before the
//! first record touches the trie, so a single bad line leaves the trie as it
//! was.

use std::{
    collections::HashMap,
    fmt::Display,
    io::{self, BufRead, Write},
};

use tracing::{debug, warn};

use crate::{Trie, error::ImportError};

/// The field delimiter, a literal backslash followed by a comma.
pub const DELIMITER: &str = "\\,";

/// The rank attached to every imported key.
pub type Rank = i64;

/// One parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub rank: Rank,
}

/// What to do with a record whose key is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Keep the stored rank.
    #[default]
    SkipExisting,
    /// Replace the stored rank.
    Overwrite,
}

/// How an import batch landed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

fn parse_line(number: usize, line: &str) -> Result<Record, ImportError> {
    let fields = line.split(DELIMITER).collect::<Vec<_>>();
    let [key, rank] = fields.as_slice() else {
        return Err(ImportError::MalformedLine { line: number });
    };
    if key.is_empty() {
        return Err(ImportError::EmptyKey { line: number });
    }
    let digits = rank.split_whitespace().collect::<String>();
    let rank = digits.parse::<Rank>().map_err(|_| ImportError::InvalidRank {
        line: number,
        value: rank.to_string(),
    })?;
    Ok(Record {
        key: key.to_string(),
        rank,
    })
}

/// Parses a whole batch of records. Every line must hold a record, so a
/// blank line rejects the batch like any other malformed one. Within a
/// batch the last rank given for a key wins. Line numbers in errors start
/// at one.
///
/// ```
/// use rankcomplete::records::parse_records;
///
/// let records = parse_records("cat\\,5\r\ndog\\, -9\n".as_bytes()).unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].rank, -9);
/// ```
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<Record>, ImportError> {
    let mut records: Vec<Record> = Vec::new();
    let mut seen = HashMap::<String, usize>::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let record = parse_line(index + 1, &line)?;
        match seen.get(&record.key) {
            Some(&position) => records[position].rank = record.rank,
            None => {
                seen.insert(record.key.clone(), records.len());
                records.push(record);
            }
        }
    }

    debug!(records = records.len(), "parsed record batch");
    Ok(records)
}

/// Applies already-parsed records to the trie.
pub fn apply_records<I>(trie: &mut Trie<Rank>, records: I, mode: ImportMode) -> ImportSummary
where
    I: IntoIterator<Item = Record>,
{
    let mut summary = ImportSummary::default();
    for Record { key, rank } in records {
        if trie.put(&key, rank) {
            summary.inserted += 1;
        } else if mode == ImportMode::Overwrite && trie.update(&key, rank) {
            summary.updated += 1;
        } else {
            summary.skipped += 1;
        }
    }
    debug!(
        inserted = summary.inserted,
        updated = summary.updated,
        skipped = summary.skipped,
        "applied record batch"
    );
    summary
}

/// Parses the entire input and, only if every line is valid, applies it.
///
/// ```
/// use rankcomplete::{Trie, records::{import_records, ImportMode}};
///
/// let mut trie = Trie::new();
/// trie.put("cat", 1);
///
/// let summary = import_records(&mut trie, "cat\\,5\ndog\\,2".as_bytes(), ImportMode::Overwrite).unwrap();
/// assert_eq!(summary.inserted, 1);
/// assert_eq!(summary.updated, 1);
/// assert_eq!(trie.get("cat"), Some(&5));
/// ```
pub fn import_records<R: BufRead>(
    trie: &mut Trie<Rank>,
    reader: R,
    mode: ImportMode,
) -> Result<ImportSummary, ImportError> {
    let records = parse_records(reader).inspect_err(|error| {
        warn!(%error, "rejected record batch");
    })?;
    Ok(apply_records(trie, records, mode))
}

/// Writes every entry as a `key\,value` line ended by `\r\n`, returning how
/// many lines were written. No row order is promised.
pub fn export_records<V, W>(trie: &Trie<V>, mut writer: W) -> io::Result<usize>
where
    V: Display,
    W: Write,
{
    let mut written = 0;
    for (key, value) in trie.iter() {
        write!(writer, "{key}{DELIMITER}{value}\r\n")?;
        written += 1;
    }
    writer.flush()?;
    debug!(written, "exported records");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use crate::{Trie, error::ImportError};

    use super::{ImportMode, ImportSummary, export_records, import_records, parse_records};

    #[test]
    pub fn rank_whitespace_is_ignored() {
        let records = parse_records("big cat\\, 1 2 \n".as_bytes()).unwrap();
        assert_eq!(records[0].key, "big cat");
        assert_eq!(records[0].rank, 12);
    }

    #[test]
    pub fn blank_lines_reject_the_batch() {
        assert!(matches!(
            parse_records("a\\,1\n\nb\\,2\n".as_bytes()),
            Err(ImportError::MalformedLine { line: 2 })
        ));
        assert!(matches!(
            parse_records("a\\,1\r\n   \r\n".as_bytes()),
            Err(ImportError::MalformedLine { line: 2 })
        ));

        let mut trie = Trie::from([("cat", 5)]);
        let result = import_records(
            &mut trie,
            "a\\,1\n\n   \nb\\,2\n".as_bytes(),
            ImportMode::Overwrite,
        );
        assert!(matches!(result, Err(ImportError::MalformedLine { line: 2 })));
        assert_eq!(trie, Trie::from([("cat", 5)]));
    }

    #[test]
    pub fn trailing_line_ending_is_not_a_record() {
        let records = parse_records("a\\,1\r\nb\\,2\r\n".as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    pub fn last_duplicate_wins() {
        let records = parse_records("a\\,1\nb\\,2\na\\,3\n".as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "a");
        assert_eq!(records[0].rank, 3);
    }

    #[test]
    pub fn bad_lines_are_reported() {
        assert!(matches!(
            parse_records("a,1\n".as_bytes()),
            Err(ImportError::MalformedLine { line: 1 })
        ));
        assert!(matches!(
            parse_records("a\\,1\nb\\,2\\,3\n".as_bytes()),
            Err(ImportError::MalformedLine { line: 2 })
        ));
        assert!(matches!(
            parse_records("ok\\,1\n\\,2\n".as_bytes()),
            Err(ImportError::EmptyKey { line: 2 })
        ));
        assert!(matches!(
            parse_records("a\\,one\n".as_bytes()),
            Err(ImportError::InvalidRank { line: 1, .. })
        ));
        assert!(matches!(
            parse_records("a\\,\n".as_bytes()),
            Err(ImportError::InvalidRank { line: 1, .. })
        ));
    }

    #[test]
    pub fn failed_batch_leaves_trie_untouched() {
        let mut trie = Trie::from([("cat", 5)]);
        let result = import_records(
            &mut trie,
            "dog\\,1\ncat\\,9\nmouse\\,oops\n".as_bytes(),
            ImportMode::Overwrite,
        );
        assert!(result.is_err());
        assert_eq!(trie.size(), 1);
        assert_eq!(trie.get("cat"), Some(&5));
        assert!(!trie.contains("dog"));
    }

    #[test]
    pub fn skip_existing_keeps_ranks() {
        let mut trie = Trie::from([("cat", 5)]);
        let summary = import_records(
            &mut trie,
            "cat\\,9\ndog\\,1\n".as_bytes(),
            ImportMode::SkipExisting,
        )
        .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                inserted: 1,
                updated: 0,
                skipped: 1
            }
        );
        assert_eq!(trie.get("cat"), Some(&5));
        assert_eq!(trie.get("dog"), Some(&1));
    }

    #[test]
    pub fn export_then_import() {
        let trie = Trie::from([("cat", 5), ("c", 5), ("dog", -9), ("mouse", 0)]);

        let mut buffer = Vec::new();
        assert_eq!(export_records(&trie, &mut buffer).unwrap(), 4);

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.contains("dog\\,-9\r\n"));

        let mut copy = Trie::new();
        import_records(&mut copy, buffer.as_slice(), ImportMode::SkipExisting).unwrap();
        assert_eq!(copy, trie);
        assert_eq!(copy.all_entries(), trie.all_entries());
    }
}
