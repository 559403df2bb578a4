//! Task-list generation for batch-cluster distribution.
//!
//! Emits one shell-invocable command line per chunk of the pair-index
//! space. Nothing is executed here; the resulting file is meant for an
//! external array-job scheduler that runs one line per task.

use crate::partition::{chunks_until, Range};
use crate::runner::partition_log_name;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a task line needs to be fully qualified.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    /// Executable each task invokes (typically the installed `netdist`).
    pub runner: PathBuf,
    /// Network graph file.
    pub graph: PathBuf,
    /// Sampled pairs file.
    pub pairs: PathBuf,
    /// Directory for per-task result files.
    pub outdir: PathBuf,
    /// Directory for per-task log files.
    pub logdir: PathBuf,
    /// First pair index of the first task.
    pub start: usize,
    /// Pair-index ceiling; the last task may extend past it.
    pub end: usize,
    /// Pairs per task.
    pub chunk_size: usize,
}

impl TaskSpec {
    /// Make all paths absolute so task lines run from any working
    /// directory. Paths need not exist yet (output and log directories
    /// usually don't).
    pub fn absolute(mut self) -> Result<Self> {
        self.runner = std::path::absolute(&self.runner)?;
        self.graph = std::path::absolute(&self.graph)?;
        self.pairs = std::path::absolute(&self.pairs)?;
        self.outdir = std::path::absolute(&self.outdir)?;
        self.logdir = std::path::absolute(&self.logdir)?;
        Ok(self)
    }
}

/// Build the command line for one chunk.
///
/// The `>&` redirect sends the task's stdout and stderr to its log file.
pub fn task_line(spec: &TaskSpec, range: Range) -> String {
    let log = spec.logdir.join(partition_log_name(range));
    format!(
        "{} distances {} {} -o {} --start {} --num {} --debug >& {}",
        spec.runner.display(),
        spec.graph.display(),
        spec.pairs.display(),
        spec.outdir.display(),
        range.start,
        range.len(),
        log.display()
    )
}

/// Write one task line per chunk of `[spec.start, spec.end)` to
/// `taskfile`. Refuses to overwrite an existing file.
///
/// Returns the number of lines written. Re-running with identical inputs
/// reproduces the file byte for byte.
pub fn write_tasklist(spec: &TaskSpec, taskfile: &Path) -> Result<usize> {
    if taskfile.exists() {
        return Err(Error::AlreadyExists(taskfile.to_path_buf()));
    }

    let ranges = chunks_until(spec.start, spec.chunk_size, spec.end)?;
    let mut out = BufWriter::new(File::create(taskfile)?);
    for range in &ranges {
        writeln!(out, "{}", task_line(spec, *range))?;
    }
    out.flush()?;

    info!(
        path = %taskfile.display(),
        tasks = ranges.len(),
        "wrote task list"
    );
    Ok(ranges.len())
}
