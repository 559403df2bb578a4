//! Property-based tests for netdist-core invariants:
//! - Range partitioning contiguity and coverage
//! - Pair row parse/format roundtrips
//! - Sampler determinism under a fixed seed

use proptest::prelude::*;

mod partition_props {
    use super::*;
    use netdist_core::{chunks_until, fixed_chunks};

    proptest! {
        #[test]
        fn fixed_chunks_are_contiguous_and_exact(
            start in 0usize..100_000,
            chunk_size in 1usize..1_000,
            count in 1usize..50,
        ) {
            let ranges = fixed_chunks(start, chunk_size, count).unwrap();

            prop_assert_eq!(ranges.len(), count);
            prop_assert_eq!(ranges[0].start, start);
            for range in &ranges {
                prop_assert_eq!(range.len(), chunk_size);
            }
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
        }

        #[test]
        fn chunks_until_cover_the_requested_interval(
            start in 0usize..100_000,
            chunk_size in 1usize..1_000,
            extent in 1usize..10_000,
        ) {
            let end = start + extent;
            let ranges = chunks_until(start, chunk_size, end).unwrap();

            prop_assert!(!ranges.is_empty());
            prop_assert_eq!(ranges[0].start, start);
            for range in &ranges {
                prop_assert_eq!(range.len(), chunk_size);
            }
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }

            // Union covers [start, end); overshoot stays under one chunk.
            let last = ranges.last().unwrap();
            prop_assert!(last.end >= end);
            prop_assert!(last.end - end < chunk_size);
        }
    }
}

mod pair_props {
    use super::*;
    use netdist_core::Pair;

    fn arb_field() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9._-]{1,16}"
    }

    proptest! {
        #[test]
        fn pair_roundtrips_through_row_format(
            a in arb_field(),
            b in arb_field(),
            c in arb_field(),
            d in arb_field(),
        ) {
            let line = format!("{a}\t{b}\t{c}\t{d}");
            let pair = Pair::parse(&line).unwrap();

            prop_assert_eq!(pair.source_cite_id, a);
            prop_assert_eq!(pair.source_catalog_id, b);
            prop_assert_eq!(pair.target_cite_id, c);
            prop_assert_eq!(pair.target_catalog_id, d);
        }
    }
}

mod sampler_props {
    use super::*;
    use netdist_core::{write_sample_pairs, EntityRecord, PairSampleConfig};

    fn table() -> Vec<EntityRecord> {
        let mut records = Vec::new();
        for category in ["astro", "math", "bio"] {
            for i in 0..8 {
                records.push(EntityRecord {
                    cite_id: format!("{category}-p{i}"),
                    catalog_id: format!("{category}-m{i}"),
                    category: category.to_string(),
                });
            }
        }
        records
    }

    proptest! {
        #[test]
        fn sampling_is_deterministic_for_any_seed(seed in any::<u64>()) {
            let config = PairSampleConfig {
                min_members: 2,
                sample_size: 10,
                seed,
            };
            let records = table();

            let mut first = Vec::new();
            let mut second = Vec::new();
            write_sample_pairs(&records, &config, &mut first).unwrap();
            write_sample_pairs(&records, &config, &mut second).unwrap();

            prop_assert_eq!(first, second);
        }

        #[test]
        fn every_block_has_exactly_sample_size_rows(
            seed in any::<u64>(),
            sample_size in 1usize..30,
        ) {
            let config = PairSampleConfig {
                min_members: 2,
                sample_size,
                seed,
            };
            let mut out = Vec::new();
            let summary = write_sample_pairs(&table(), &config, &mut out).unwrap();

            prop_assert_eq!(summary.blocks, 9);
            prop_assert_eq!(summary.rows, 9 * sample_size);

            let text = String::from_utf8(out).unwrap();
            for block in text.split('#').skip(1) {
                let rows: Vec<&str> = block.lines().skip(1).collect();
                prop_assert_eq!(rows.len(), sample_size);
            }
        }
    }
}
