//! netdist - shortest-path distances between sampled node pairs in
//! citation/collaboration networks.
//!
//! # Usage
//!
//! ```bash
//! # Sample pairs for every ordered pair of categories
//! netdist sample-pairs papers.tsv pairs.tsv --min-members 500 --seed 99
//!
//! # Compute path lengths for pairs 0..80 of the sample
//! netdist distances network.net pairs.tsv -o output --start 0 --num 80
//!
//! # Same range fanned out over 4 worker processes (4 x 80 pairs)
//! netdist distances network.net pairs.tsv -o output --num 80 --workers 4
//!
//! # Write a task list for an array-job scheduler
//! netdist tasklist /opt/netdist/bin/netdist network.net pairs.tsv \
//!     -o output -l logs --num 80 --end 153800
//!
//! # Ad-hoc distance between two catalog ids
//! netdist distance network.net 2402851 107539161
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{HumanDuration, ProgressBar};
use netdist_core::{
    compute_range_to_file, fixed_chunks, load_entity_table, write_sample_pairs, write_tasklist,
    CitationGraph, PairSampleConfig, PathOutcome, Range, TableSchema, TaskSpec,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "netdist")]
#[command(about = "Shortest-path distances between sampled node pairs in citation networks")]
struct Cli {
    /// Output debugging info
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample entity pairs for every ordered pair of categories
    SamplePairs {
        /// Entity table (delimited, with a header row)
        input: PathBuf,

        /// Output pairs file (TSV)
        output: PathBuf,

        /// Field delimiter for the input table
        #[arg(long, default_value = "\t")]
        sep: String,

        /// Column name for the citation-index id
        #[arg(long, default_value = "cite_id")]
        cite_col: String,

        /// Column name for the catalog id (graph node key)
        #[arg(long, default_value = "catalog_id")]
        catalog_col: String,

        /// Column name for the category
        #[arg(long, default_value = "category")]
        category_col: String,

        /// Categories with at most this many members are dropped
        #[arg(long, default_value = "500")]
        min_members: usize,

        /// Random seed
        #[arg(long, default_value = "99")]
        seed: u64,

        /// Number of sample pairs for each pair of categories
        #[arg(long, default_value = "500")]
        sample_size: usize,
    },

    /// Compute shortest path lengths for a range of sampled pairs
    Distances {
        /// Network graph (Pajek .net file or edge list)
        graph: PathBuf,

        /// Pairs file produced by sample-pairs
        pairs: PathBuf,

        /// Output directory; one TSV per partition with 3 columns:
        /// source cite id, target cite id, path length
        #[arg(short, long, default_value = "output")]
        outdir: PathBuf,

        /// Index of the sample pair to start at
        #[arg(long, default_value = "0")]
        start: usize,

        /// Number of pairs per worker (starting from --start)
        #[arg(long, default_value = "80")]
        num: usize,

        /// Number of worker processes; each handles --num pairs
        #[arg(long, default_value = "1")]
        workers: usize,
    },

    /// Write a task list for distributing the computation over a batch cluster
    Tasklist {
        /// Executable each task invokes
        runner: PathBuf,

        /// Network graph (Pajek .net file or edge list)
        graph: PathBuf,

        /// Pairs file produced by sample-pairs
        pairs: PathBuf,

        /// Output directory for per-task result files
        #[arg(short, long, default_value = "output")]
        outdir: PathBuf,

        /// Directory for per-task log files
        #[arg(short, long, default_value = "logs")]
        logdir: PathBuf,

        /// Path of the task-list file written by this command
        #[arg(long)]
        taskfile: Option<PathBuf>,

        /// Index of the sample pair to start at for the first task
        #[arg(long, default_value = "0")]
        start: usize,

        /// Number of pairs per task
        #[arg(long, default_value = "80")]
        num: usize,

        /// Pair index to end at (the last task may extend past it)
        #[arg(long)]
        end: usize,
    },

    /// Shortest path length between two catalog ids
    Distance {
        /// Network graph (Pajek .net file or edge list)
        graph: PathBuf,

        /// First catalog id
        source: String,

        /// Second catalog id
        target: String,
    },

    /// Show statistics about a network graph
    Stats {
        /// Network graph (Pajek .net file or edge list)
        graph: PathBuf,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let total = Instant::now();
    let result = match cli.command {
        Commands::SamplePairs {
            input,
            output,
            sep,
            cite_col,
            catalog_col,
            category_col,
            min_members,
            seed,
            sample_size,
        } => cmd_sample_pairs(
            &input,
            &output,
            &sep,
            cite_col,
            catalog_col,
            category_col,
            min_members,
            seed,
            sample_size,
        ),
        Commands::Distances {
            graph,
            pairs,
            outdir,
            start,
            num,
            workers,
        } => cmd_distances(&graph, &pairs, &outdir, start, num, workers, cli.debug),
        Commands::Tasklist {
            runner,
            graph,
            pairs,
            outdir,
            logdir,
            taskfile,
            start,
            num,
            end,
        } => cmd_tasklist(runner, graph, pairs, outdir, logdir, taskfile, start, num, end),
        Commands::Distance {
            graph,
            source,
            target,
        } => cmd_distance(&graph, &source, &target),
        Commands::Stats { graph, json } => cmd_stats(&graph, json),
    };

    info!("all finished. total time: {}", HumanDuration(total.elapsed()));
    result
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    if debug {
        debug!("debug mode is on");
    }
}

/// Load a network with a spinner; loading is the dominant one-time cost,
/// so every command funnels through here exactly once per process.
fn load_graph(path: &Path) -> Result<CitationGraph> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {}...", path.display()));

    let net = CitationGraph::load(path)
        .with_context(|| format!("failed to load graph {}", path.display()))?;

    pb.finish_with_message(format!(
        "Loaded {} nodes / {} edges in {}",
        net.node_count(),
        net.edge_count(),
        HumanDuration(start.elapsed())
    ));
    Ok(net)
}

#[allow(clippy::too_many_arguments)]
fn cmd_sample_pairs(
    input: &Path,
    output: &Path,
    sep: &str,
    cite_col: String,
    catalog_col: String,
    category_col: String,
    min_members: usize,
    seed: u64,
    sample_size: usize,
) -> Result<()> {
    let schema = TableSchema {
        delimiter: parse_delimiter(sep)?,
        cite_column: cite_col,
        catalog_column: catalog_col,
        category_column: category_col,
    };
    let records = load_entity_table(input, &schema)
        .with_context(|| format!("failed to load entity table {}", input.display()))?;
    info!("loaded {} records from {}", records.len(), input.display());

    let config = PairSampleConfig {
        min_members,
        sample_size,
        seed,
    };
    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut out = BufWriter::new(file);
    let summary = write_sample_pairs(&records, &config, &mut out)?;
    out.flush()?;

    println!(
        "Sampled {} pairs over {} category pairs ({} categories retained) -> {}",
        summary.rows,
        summary.blocks,
        summary.categories,
        output.display()
    );
    Ok(())
}

fn cmd_distances(
    graph_path: &Path,
    pairs: &Path,
    outdir: &Path,
    start: usize,
    num: usize,
    workers: usize,
    debug: bool,
) -> Result<()> {
    if num == 0 {
        bail!("--num must be positive");
    }
    if workers == 0 {
        bail!("--workers must be positive");
    }
    if workers > 1 {
        return dispatch_workers(graph_path, pairs, outdir, start, num, workers, debug);
    }

    let net = load_graph(graph_path)?;
    let range = Range::new(start, start + num);
    let started = Instant::now();
    let (out_path, summary) = compute_range_to_file(&net, pairs, range, outdir)?;

    println!(
        "Wrote {} rows ({} unresolved, {} unreachable) to {} in {}",
        summary.computed,
        summary.unresolved,
        summary.unreachable,
        out_path.display(),
        HumanDuration(started.elapsed())
    );
    Ok(())
}

/// Fan the requested range out over independent worker processes.
///
/// Each worker re-invokes this executable with `--workers 1` and its own
/// contiguous chunk of `num` pairs, loads its own copy of the graph, and
/// owns its own output file. The dispatching process never loads the
/// graph. A failed worker does not stop the others.
fn dispatch_workers(
    graph_path: &Path,
    pairs: &Path,
    outdir: &Path,
    start: usize,
    num: usize,
    workers: usize,
    debug: bool,
) -> Result<()> {
    let ranges = fixed_chunks(start, num, workers)?;
    let exe = std::env::current_exe().context("cannot determine current executable")?;
    info!("dispatching {} worker processes", ranges.len());

    let mut children = Vec::with_capacity(ranges.len());
    for range in &ranges {
        let mut cmd = std::process::Command::new(&exe);
        cmd.arg("distances")
            .arg(graph_path)
            .arg(pairs)
            .arg("-o")
            .arg(outdir)
            .arg("--start")
            .arg(range.start.to_string())
            .arg("--num")
            .arg(range.len().to_string())
            .arg("--workers")
            .arg("1");
        if debug {
            cmd.arg("--debug");
        }
        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn worker for pairs {}", range))?;
        debug!(%range, pid = child.id(), "worker spawned");
        children.push((*range, child));
    }

    let mut failed = Vec::new();
    for (range, mut child) in children {
        let status = child
            .wait()
            .with_context(|| format!("failed to wait for worker {}", range))?;
        if status.success() {
            info!(%range, "worker finished");
        } else {
            warn!(%range, %status, "worker failed");
            failed.push(range);
        }
    }

    if !failed.is_empty() {
        let failed: Vec<String> = failed.iter().map(ToString::to_string).collect();
        bail!(
            "{} of {} workers failed (pair ranges: {})",
            failed.len(),
            workers,
            failed.join(", ")
        );
    }
    println!("All {} workers finished.", workers);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_tasklist(
    runner: PathBuf,
    graph: PathBuf,
    pairs: PathBuf,
    outdir: PathBuf,
    logdir: PathBuf,
    taskfile: Option<PathBuf>,
    start: usize,
    num: usize,
    end: usize,
) -> Result<()> {
    let taskfile = taskfile.unwrap_or_else(|| default_taskfile(&runner));
    let spec = TaskSpec {
        runner,
        graph,
        pairs,
        outdir,
        logdir,
        start,
        end,
        chunk_size: num,
    }
    .absolute()?;

    let written = write_tasklist(&spec, &taskfile)?;
    println!("Wrote {} task lines to {}", written, taskfile.display());
    Ok(())
}

/// Default task-list location: next to the runner executable.
fn default_taskfile(runner: &Path) -> PathBuf {
    let dir = runner
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    dir.join("tasklist_path_lengths.txt")
}

fn cmd_distance(graph_path: &Path, source: &str, target: &str) -> Result<()> {
    let net = load_graph(graph_path)?;
    debug!(
        source_index = ?net.resolve(source),
        target_index = ?net.resolve(target),
        "resolved node indices"
    );

    match net.path_length(source, target) {
        PathOutcome::Length(n) => {
            println!("Shortest path length between {} and {}: {}", source, target, n);
        }
        PathOutcome::Unreachable => {
            println!("No path between {} and {}", source, target);
        }
        PathOutcome::Unresolved => {
            println!("Not found in graph: {} and/or {}", source, target);
        }
    }
    Ok(())
}

fn cmd_stats(graph_path: &Path, json: bool) -> Result<()> {
    let net = load_graph(graph_path)?;
    let stats = net.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Network Statistics");
        println!("==================");
        println!("Nodes:      {}", stats.node_count);
        println!("Edges:      {}", stats.edge_count);
        println!("Avg degree: {:.2}", stats.avg_degree);
    }
    Ok(())
}

fn parse_delimiter(sep: &str) -> Result<u8> {
    match sep {
        "\t" | "\\t" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => bail!("--sep must be a single ASCII character, got '{}'", other),
    }
}
