//! Per-partition computation driver.
//!
//! A partition is one contiguous range of pair indices with one dedicated
//! output file. The graph is loaded by the caller (once per process) and
//! only borrowed here; each partition streams its result rows and reports
//! a summary.

use crate::graph::{CitationGraph, PathOutcome};
use crate::pair::read_pair_range;
use crate::partition::Range;
use crate::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Counts reported by one partition run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeSummary {
    /// Result rows written.
    pub computed: usize,
    /// Rows where an identifier was absent from the graph.
    pub unresolved: usize,
    /// Rows where both identifiers resolved but no path exists.
    pub unreachable: usize,
}

/// Output filename for a partition, derived from its bounds.
///
/// The task-list writer derives log filenames the same way, so a task line
/// and the file its runner produces always agree.
pub fn partition_output_name(range: Range) -> String {
    format!("path_lengths_{}.tsv", range)
}

/// Log filename for a partition.
pub fn partition_log_name(range: Range) -> String {
    format!("path_lengths_{}.log", range)
}

/// Compute shortest-path lengths for the pairs in `range` and stream one
/// `source cite id \t target cite id \t outcome` row per pair to `out`.
///
/// Resolution failures and unreachable pairs are recorded in-band and never
/// abort the partition; a malformed pair row does.
pub fn compute_range<W: Write>(
    graph: &CitationGraph,
    pairs_path: &Path,
    range: Range,
    out: &mut W,
) -> Result<RangeSummary> {
    let pairs = read_pair_range(pairs_path, range)?;
    debug!(
        %range,
        count = pairs.len(),
        "starting shortest path length calculations"
    );

    let mut summary = RangeSummary::default();
    for pair in &pairs {
        let outcome = graph.path_length(&pair.source_catalog_id, &pair.target_catalog_id);
        match outcome {
            PathOutcome::Unresolved => summary.unresolved += 1,
            PathOutcome::Unreachable => summary.unreachable += 1,
            PathOutcome::Length(_) => {}
        }
        writeln!(
            out,
            "{}\t{}\t{}",
            pair.source_cite_id, pair.target_cite_id, outcome
        )?;
        summary.computed += 1;
        debug!(
            source_id = %pair.source_cite_id,
            target_id = %pair.target_cite_id,
            %outcome,
            "pair done"
        );
    }

    info!(
        %range,
        computed = summary.computed,
        unresolved = summary.unresolved,
        unreachable = summary.unreachable,
        "partition complete"
    );
    Ok(summary)
}

/// Run [`compute_range`] into the partition's dedicated output file under
/// `outdir`, creating the directory if needed. The file is flushed and
/// closed before returning.
pub fn compute_range_to_file(
    graph: &CitationGraph,
    pairs_path: &Path,
    range: Range,
    outdir: &Path,
) -> Result<(PathBuf, RangeSummary)> {
    fs::create_dir_all(outdir)?;
    let out_path = outdir.join(partition_output_name(range));
    debug!(path = %out_path.display(), "opening partition output file");

    let mut out = BufWriter::new(File::create(&out_path)?);
    let summary = compute_range(graph, pairs_path, range, &mut out)?;
    out.flush()?;
    Ok((out_path, summary))
}
