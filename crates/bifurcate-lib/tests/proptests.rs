use bifurcate_lib::*;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Brute-force bifurcation set over strings, one fragment per record
fn naive_bifurcations(records: &[Vec<u8>], l: usize) -> BTreeSet<String> {
    let fragments: Vec<&[u8]> = records
        .iter()
        .flat_map(|r| r.split(|b| !b"ACGT".contains(b)))
        .filter(|f| !f.is_empty())
        .collect();

    let mut edges = HashSet::new();
    for f in &fragments {
        for w in f.windows(l + 1) {
            edges.insert(w.to_vec());
        }
    }

    let mut out = BTreeSet::new();
    for f in &fragments {
        if f.len() < l {
            continue;
        }
        let last = f.len() - l;
        for (start, v) in f.windows(l).enumerate() {
            let ins = b"ACGT"
                .iter()
                .filter(|&&c| edges.contains(&[&[c][..], v].concat()))
                .count();
            let outs = b"ACGT"
                .iter()
                .filter(|&&c| edges.contains(&[v, &[c][..]].concat()))
                .count();
            if start == 0 || start == last || ins > 1 || outs > 1 {
                out.insert(String::from_utf8(v.to_vec()).unwrap());
            }
        }
    }
    out
}

fn records_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(b"ACGTACGTACGTN".to_vec()), 0..80),
        1..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_exact_enumeration_matches_brute_force(
        l in 1usize..=6,
        records in records_strategy(),
    ) {
        let config = EnumeratorConfig { num_threads: 1, ..EnumeratorConfig::new(l, 64).unwrap() };
        let enumerator = VertexEnumerator::new(config).unwrap();
        let (index, _) = enumerator.enumerate_exact(&[InMemorySequences::new(&records)]).unwrap();

        let found: BTreeSet<String> = index.iter().map(|v| v.to_string()).collect();
        prop_assert_eq!(found, naive_bifurcations(&records, l));
    }

    #[test]
    fn prop_bloom_enumeration_is_sound(
        l in 1usize..=8,
        filter_size in 1u64..2048,
        hash_functions in 1usize..=4,
        rounds in 1usize..=3,
        records in records_strategy(),
    ) {
        let config = EnumeratorConfig {
            hash_functions,
            rounds,
            num_threads: 1,
            ..EnumeratorConfig::new(l, filter_size).unwrap()
        };
        let enumerator = VertexEnumerator::new(config).unwrap();
        let sources = [InMemorySequences::new(&records)];
        let bloom = enumerator.enumerate(&sources).unwrap();

        for vertex in naive_bifurcations(&records, l) {
            prop_assert!(bloom.lookup_str(&vertex).is_some(), "missed {}", vertex);
        }
    }

    #[test]
    fn prop_index_is_sorted_and_consistent(
        l in 1usize..=8,
        filter_size in 1u64..512,
        records in records_strategy(),
    ) {
        let config = EnumeratorConfig { num_threads: 1, ..EnumeratorConfig::new(l, filter_size).unwrap() };
        let index = VertexEnumerator::new(config).unwrap().enumerate_sequences(&records).unwrap();

        prop_assert!(index.bodies().windows(2).all(|w| w[0] < w[1]));
        for id in 0..index.len() {
            let vertex = index.get(id).unwrap();
            prop_assert_eq!(vertex.len(), l);
            prop_assert_eq!(index.lookup_id(&vertex), Some(id));
        }
    }

    #[test]
    fn prop_bloom_filter_has_no_false_negatives(
        num_bits in 1u64..10_000,
        q in 1usize..=5,
        seed in any::<u64>(),
        bodies in prop::collection::vec(any::<u64>(), 0..200),
    ) {
        let builder = BloomFilterBuilder::new(num_bits, hasher::HashFamily::new(q, seed)).unwrap();
        for &body in &bodies {
            builder.insert_body(body);
        }
        let filter = builder.freeze();
        for &body in &bodies {
            prop_assert!(filter.contains_body(body));
        }
    }
}
