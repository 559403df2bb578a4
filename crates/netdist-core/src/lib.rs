#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

//! Core types for computing shortest-path distances between sampled node
//! pairs in large citation/collaboration networks.
//!
//! - [`record`] - entity table loading and category grouping
//! - [`sampler`] - stratified pair sampling with a seeded RNG
//! - [`partition`] - contiguous range partitioning of the pair list
//! - [`graph`] - network loading, key resolution, and path-length lookup
//! - [`runner`] - per-partition computation driver
//! - [`tasklist`] - shell task-list generation for batch clusters
//!
//! The shortest-path primitive itself is petgraph's; this crate only
//! resolves external identifiers to node indices and delegates.
//!
//! # Example
//!
//! ```rust
//! use netdist_core::{CitationGraph, PathOutcome};
//!
//! let mut net = CitationGraph::new();
//! net.add_edge("A", "B");
//! net.add_edge("B", "C");
//!
//! assert_eq!(net.path_length("A", "C"), PathOutcome::Length(2));
//! assert_eq!(net.path_length("A", "Z"), PathOutcome::Unresolved);
//! ```

mod error;
pub mod graph;
pub mod pair;
pub mod partition;
pub mod record;
pub mod runner;
pub mod sampler;
pub mod tasklist;

pub use error::{Error, Result};
pub use graph::{CitationGraph, GraphStats, PathOutcome};
pub use pair::{read_pair_range, Pair};
pub use partition::{chunks_until, fixed_chunks, Range};
pub use record::{category_groups, load_entity_table, EntityRecord, TableSchema};
pub use runner::{
    compute_range, compute_range_to_file, partition_log_name, partition_output_name, RangeSummary,
};
pub use sampler::{write_sample_pairs, PairSampleConfig, SampleSummary};
pub use tasklist::{task_line, write_tasklist, TaskSpec};
