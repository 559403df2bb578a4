//! Stratified pair sampling.
//!
//! For every ordered pair of retained categories, draws entity indices with
//! replacement from the source and target groups with a seeded RNG until
//! the configured number of distinct (source, target) combinations has been
//! written. Self-pairs of categories are included, and a source entity may
//! equal its target.

use crate::record::{category_groups, EntityRecord};
use crate::{Error, Result};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

/// Configuration for stratified pair sampling.
#[derive(Debug, Clone, Copy)]
pub struct PairSampleConfig {
    /// Categories with at most this many members are dropped entirely.
    pub min_members: usize,
    /// Number of distinct pairs per ordered category pair.
    pub sample_size: usize,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for PairSampleConfig {
    fn default() -> Self {
        Self {
            min_members: 500,
            sample_size: 500,
            seed: 99,
        }
    }
}

/// Counts reported by a sampling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleSummary {
    /// Categories retained after the membership threshold.
    pub categories: usize,
    /// Ordered category pairs written (`categories` squared).
    pub blocks: usize,
    /// Total pair rows written.
    pub rows: usize,
}

/// Sample pairs for every ordered pair of retained categories and write
/// them to `out`.
///
/// Each block is one `# <source category>\t<target category>` header line
/// followed by exactly `sample_size` distinct tab-separated rows of
/// `source cite id, source catalog id, target cite id, target catalog id`.
/// Duplicate draws are rejected and redrawn.
///
/// For a fixed seed and a fixed table the output is byte-identical across
/// runs.
pub fn write_sample_pairs<W: Write>(
    records: &[EntityRecord],
    config: &PairSampleConfig,
    out: &mut W,
) -> Result<SampleSummary> {
    let groups = category_groups(records, config.min_members);
    let mut rng = XorShiftRng::seed_from_u64(config.seed);
    let mut summary = SampleSummary {
        categories: groups.len(),
        ..SampleSummary::default()
    };

    for (source_category, source_members) in &groups {
        for (target_category, target_members) in &groups {
            let combinations = source_members.len().checked_mul(target_members.len());
            if combinations.is_some_and(|c| c < config.sample_size) {
                return Err(Error::Configuration(format!(
                    "category pair '{}'/'{}' has only {} distinct combinations, cannot sample {}",
                    source_category,
                    target_category,
                    combinations.unwrap_or(usize::MAX),
                    config.sample_size,
                )));
            }

            debug!(
                %source_category,
                %target_category,
                sample_size = config.sample_size,
                "sampling category pair"
            );
            writeln!(out, "# {}\t{}", source_category, target_category)?;

            let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(config.sample_size);
            while seen.len() < config.sample_size {
                // Retained groups always exceed the threshold, so they are
                // non-empty and choose() cannot fail.
                let source = *source_members
                    .choose(&mut rng)
                    .unwrap_or_else(|| unreachable!("retained groups are non-empty"));
                let target = *target_members
                    .choose(&mut rng)
                    .unwrap_or_else(|| unreachable!("retained groups are non-empty"));
                if !seen.insert((source, target)) {
                    continue;
                }

                let s = &records[source];
                let t = &records[target];
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    s.cite_id, s.catalog_id, t.cite_id, t.catalog_id
                )?;
                summary.rows += 1;
            }
            summary.blocks += 1;
        }
    }

    Ok(summary)
}
