//! Benchmarks over a seeded pseudo-random vocabulary. Lookups mix stored
//! and unseen words at a fixed hit rate.

use std::collections::HashSet;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rankcomplete::Trie;

fn vocabulary(words: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(words);
    let mut vocabulary = Vec::with_capacity(words);
    while vocabulary.len() < words {
        let len = rng.random_range(2..12);
        let word = (0..len)
            .map(|_| rng.random_range(b'a'..=b'z') as char)
            .collect::<String>();
        if seen.insert(word.clone()) {
            vocabulary.push(word);
        }
    }
    vocabulary
}

fn make_trie(words: &[String]) -> Trie<usize> {
    words
        .iter()
        .enumerate()
        .map(|(rank, word)| (word.as_str(), rank))
        .collect()
}

/// Mixes `hit_percent` stored words into a stream of unseen ones.
fn generate_samples(hits: &[String], misses: &[String], hit_percent: u32) -> Vec<String> {
    let roulette_inc = f64::from(hit_percent) / 100.;
    let mut roulette = 0.;
    let mut hit_iter = hits.iter().cycle();

    misses
        .iter()
        .map(|miss| {
            roulette += roulette_inc;
            if roulette >= 1. {
                roulette -= 1.;
                hit_iter.next().unwrap_or(miss).clone()
            } else {
                miss.clone()
            }
        })
        .collect()
}

fn trie_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("rankcomplete put");
    for size in [1_000, 20_000] {
        let words = vocabulary(size, 7);
        group.bench_with_input(BenchmarkId::from_parameter(size), &words, |b, words| {
            b.iter(|| make_trie(black_box(words)))
        });
    }
    group.finish();
}

fn trie_get(c: &mut Criterion) {
    let words = vocabulary(20_000, 7);
    let misses = vocabulary(20_000, 11);
    let trie = make_trie(&words);

    let mut group = c.benchmark_group("rankcomplete get");
    for percent in [100, 50, 10, 1] {
        let samples = generate_samples(&words, &misses, percent);
        group.bench_with_input(BenchmarkId::from_parameter(percent), &samples, |b, samples| {
            b.iter(|| {
                samples
                    .iter()
                    .filter_map(|w| trie.get(black_box(w)))
                    .count()
            })
        });
    }
    group.finish();
}

fn trie_prefix(c: &mut Criterion) {
    let words = vocabulary(20_000, 7);
    let trie = make_trie(&words);

    let mut group = c.benchmark_group("rankcomplete prefix");
    for prefix in ["a", "ab", "abc"] {
        group.bench_with_input(BenchmarkId::new("entries", prefix), prefix, |b, prefix| {
            b.iter(|| trie.entries_with_prefix(black_box(prefix)).len())
        });
        group.bench_with_input(BenchmarkId::new("ranked", prefix), prefix, |b, prefix| {
            b.iter(|| trie.ranked_completions(black_box(prefix), Some(10)).len())
        });
    }
    group.finish();
}

fn trie_remove(c: &mut Criterion) {
    let words = vocabulary(5_000, 7);
    let trie = make_trie(&words);
    c.bench_function("rankcomplete remove all keys", |b| {
        b.iter_batched(
            || trie.clone(),
            |mut trie| {
                for word in &words {
                    trie.remove(word);
                }
                trie
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, trie_put, trie_get, trie_prefix, trie_remove);

criterion_main!(benches);
