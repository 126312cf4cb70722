use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use rankcomplete::{
    Trie,
    records::{self, ImportMode, Rank},
};
use tracing::{Level, info};

/// Ranked autocomplete over `key\,rank` record files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Record files to load, in order.
    #[arg(short, long = "data", value_name = "FILE", required = true)]
    data: Vec<PathBuf>,
    /// Let later records replace the rank of keys already loaded.
    #[arg(long)]
    overwrite: bool,
    /// Log more; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the keys starting with PREFIX, highest rank first.
    Query {
        prefix: String,
        /// Print at most this many keys.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Write every loaded record to OUT.
    Export { out: PathBuf },
    /// Print how many keys and nodes were loaded.
    Stats,
}

fn load(paths: &[PathBuf], mode: ImportMode) -> anyhow::Result<Trie<Rank>> {
    let mut trie = Trie::new();
    for path in paths {
        let file = File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let summary = records::import_records(&mut trie, BufReader::new(file), mode)
            .with_context(|| format!("failed to import {}", path.display()))?;
        info!(
            path = %path.display(),
            inserted = summary.inserted,
            updated = summary.updated,
            skipped = summary.skipped,
            "loaded records"
        );
    }
    Ok(trie)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mode = if cli.overwrite {
        ImportMode::Overwrite
    } else {
        ImportMode::SkipExisting
    };
    let trie = load(&cli.data, mode)?;

    match cli.command {
        Command::Query { prefix, limit } => {
            let mut out = io::stdout().lock();
            for (key, rank) in trie.ranked_completions(&prefix, limit) {
                writeln!(out, "{key}\t{rank}")?;
            }
        }
        Command::Export { out } => {
            let file = File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            let written = records::export_records(&trie, BufWriter::new(file))?;
            info!(written, path = %out.display(), "exported records");
        }
        Command::Stats => {
            println!("keys: {}", trie.size());
            println!("nodes: {}", trie.node_count());
        }
    }
    Ok(())
}
