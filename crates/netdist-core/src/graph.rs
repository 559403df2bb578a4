//! Citation network storage, node-key resolution, and shortest-path length
//! lookup.
//!
//! The graph is stored undirected regardless of how the network file
//! declares its links: distance computation ignores edge direction, so
//! direction is dropped at load time. Pathfinding itself is delegated to
//! petgraph.

use crate::{Error, Result};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Outcome of a shortest-path length lookup between two node keys.
///
/// The three cases stay distinguishable all the way into the output format:
/// a length renders as the bare integer, the other two as lowercase
/// sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// Unweighted shortest-path length between the two nodes.
    Length(usize),
    /// Both keys resolved but no path connects them.
    Unreachable,
    /// At least one key is absent from the graph's node index.
    Unresolved,
}

impl PathOutcome {
    /// The length, if one was computed.
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Length(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for PathOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(n) => write!(f, "{}", n),
            Self::Unreachable => write!(f, "unreachable"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Statistics about a loaded network.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Average (undirected) degree.
    pub avg_degree: f64,
}

/// An undirected citation/collaboration network keyed by external catalog
/// identifiers.
///
/// Node weights are the external keys; `node_index` maps each key to its
/// petgraph index for O(1) resolution. The graph is loaded once per
/// process and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CitationGraph {
    graph: UnGraph<String, ()>,
    node_index: HashMap<String, NodeIndex>,
}

impl Default for CitationGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationGraph {
    /// Create an empty network.
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            node_index: HashMap::new(),
        }
    }

    /// Load a network file, dispatching on extension: `.net` is parsed as
    /// Pajek, anything else as a whitespace-separated edge list.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("net") => Self::from_pajek_file(path),
            _ => Self::from_edgelist_file(path),
        }
    }

    /// Load from a Pajek `.net` file.
    ///
    /// Supports `*Vertices` with quoted or bare labels (label defaults to
    /// the vertex number when omitted, per Pajek's implicit-vertex form)
    /// and both `*Edges` and `*Arcs` link sections. Link endpoints are
    /// 1-based vertex numbers; trailing fields such as weights are ignored.
    pub fn from_pajek_file(path: impl AsRef<Path>) -> Result<Self> {
        enum Section {
            Preamble,
            Vertices,
            Links,
        }

        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut net = Self::new();
        let mut section = Section::Preamble;
        let mut declared = 0usize;
        // Pajek vertex number (1-based) -> node index, in declaration order.
        let mut positions: Vec<NodeIndex> = Vec::new();

        for (lineno, line) in reader.lines().enumerate() {
            let lineno = lineno + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('*') {
                let mut parts = rest.split_whitespace();
                let keyword = parts.next().unwrap_or("").to_ascii_lowercase();
                section = match keyword.as_str() {
                    "vertices" => {
                        declared = parts
                            .next()
                            .and_then(|n| n.parse().ok())
                            .ok_or_else(|| {
                                Error::GraphParse(format!(
                                    "line {}: *Vertices requires a count",
                                    lineno
                                ))
                            })?;
                        positions.reserve(declared);
                        Section::Vertices
                    }
                    "edges" | "arcs" => {
                        // Vertices without an explicit line get their
                        // number as key (Pajek implicit form).
                        while positions.len() < declared {
                            let key = (positions.len() + 1).to_string();
                            let idx = net.add_node(key);
                            positions.push(idx);
                        }
                        Section::Links
                    }
                    other => {
                        return Err(Error::GraphParse(format!(
                            "line {}: unsupported pajek section '*{}'",
                            lineno, other
                        )))
                    }
                };
                continue;
            }

            match section {
                Section::Preamble => {
                    return Err(Error::GraphParse(format!(
                        "line {}: data before *Vertices section",
                        lineno
                    )))
                }
                Section::Vertices => {
                    let (number, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                    let number: usize = number.parse().map_err(|_| {
                        Error::GraphParse(format!("line {}: bad vertex number '{}'", lineno, number))
                    })?;
                    if number != positions.len() + 1 {
                        return Err(Error::GraphParse(format!(
                            "line {}: vertex {} out of order (expected {})",
                            lineno,
                            number,
                            positions.len() + 1
                        )));
                    }
                    let key = vertex_label(rest).unwrap_or_else(|| number.to_string());
                    let idx = net.add_node(key);
                    positions.push(idx);
                }
                Section::Links => {
                    let mut parts = line.split_whitespace();
                    let endpoint = |field: Option<&str>| -> Result<NodeIndex> {
                        let number: usize = field
                            .and_then(|f| f.parse().ok())
                            .ok_or_else(|| {
                                Error::GraphParse(format!("line {}: bad link '{}'", lineno, line))
                            })?;
                        positions
                            .get(number.checked_sub(1).ok_or_else(|| {
                                Error::GraphParse(format!(
                                    "line {}: vertex numbers are 1-based",
                                    lineno
                                ))
                            })?)
                            .copied()
                            .ok_or_else(|| {
                                Error::GraphParse(format!(
                                    "line {}: vertex {} not declared",
                                    lineno, number
                                ))
                            })
                    };
                    let a = endpoint(parts.next())?;
                    let b = endpoint(parts.next())?;
                    net.graph.add_edge(a, b, ());
                }
            }
        }

        debug!(
            path = %path.display(),
            nodes = net.node_count(),
            edges = net.edge_count(),
            "loaded pajek network"
        );
        Ok(net)
    }

    /// Load from a whitespace-separated edge list: one link per line, two
    /// node keys per link, `#`-prefixed comment lines skipped.
    pub fn from_edgelist_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut net = Self::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(a), Some(b)) => net.add_edge(a, b),
                _ => {
                    return Err(Error::GraphParse(format!(
                        "line {}: expected two node keys, got '{}'",
                        lineno + 1,
                        line
                    )))
                }
            }
        }

        debug!(
            path = %path.display(),
            nodes = net.node_count(),
            edges = net.edge_count(),
            "loaded edge list"
        );
        Ok(net)
    }

    /// Get or create the node for a key.
    pub fn add_node(&mut self, key: impl Into<String>) -> NodeIndex {
        let key = key.into();
        if let Some(&idx) = self.node_index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.node_index.insert(key, idx);
        idx
    }

    /// Add an undirected edge between two keys, creating nodes as needed.
    pub fn add_edge(&mut self, a: &str, b: &str) {
        let a = self.add_node(a);
        let b = self.add_node(b);
        self.graph.add_edge(a, b, ());
    }

    /// Resolve an external key to its internal node index.
    pub fn resolve(&self, key: &str) -> Option<NodeIndex> {
        self.node_index.get(key).copied()
    }

    /// Unweighted shortest-path length between two node keys.
    ///
    /// Returns [`PathOutcome::Unresolved`] without touching the path
    /// primitive when either key is absent from the node index; otherwise
    /// delegates to petgraph with unit edge cost.
    pub fn path_length(&self, source: &str, target: &str) -> PathOutcome {
        let (Some(s), Some(t)) = (self.resolve(source), self.resolve(target)) else {
            return PathOutcome::Unresolved;
        };

        match astar(&self.graph, s, |n| n == t, |_| 1usize, |_| 0) {
            Some((length, _)) => PathOutcome::Length(length),
            None => PathOutcome::Unreachable,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Compute statistics about the network.
    pub fn stats(&self) -> GraphStats {
        let node_count = self.node_count();
        let edge_count = self.edge_count();
        let avg_degree = if node_count > 0 {
            2.0 * edge_count as f64 / node_count as f64
        } else {
            0.0
        };
        GraphStats {
            node_count,
            edge_count,
            avg_degree,
        }
    }
}

/// Extract a vertex label: quoted labels run to the closing quote, bare
/// labels to the next whitespace.
fn vertex_label(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    if rest.is_empty() {
        None
    } else if let Some(quoted) = rest.strip_prefix('"') {
        quoted.split('"').next().map(str::to_string)
    } else {
        rest.split_whitespace().next().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAJEK: &str = "\
*Vertices 4
1 \"A\"
2 \"B\"
3 \"C\"
4 \"D\"
*Edges
1 2
2 3
";

    fn write_net(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".net").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn chain_graph() -> CitationGraph {
        CitationGraph::from_pajek_file(write_net(PAJEK).path()).unwrap()
    }

    #[test]
    fn test_load_pajek() {
        let net = chain_graph();

        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 2);
        assert!(net.resolve("A").is_some());
        assert!(net.resolve("D").is_some());
        assert!(net.resolve("Z").is_none());
    }

    #[test]
    fn test_pajek_implicit_vertices_and_arcs() {
        let net =
            CitationGraph::from_pajek_file(write_net("*Vertices 3\n*Arcs\n1 2\n3 2\n").path())
                .unwrap();

        assert_eq!(net.node_count(), 3);
        // Arcs are undirected for distance purposes.
        assert_eq!(net.path_length("1", "3"), PathOutcome::Length(2));
    }

    #[test]
    fn test_pajek_weighted_links_ignored() {
        let net =
            CitationGraph::from_pajek_file(write_net("*Vertices 2\n1 \"A\"\n2 \"B\"\n*Edges\n1 2 0.5\n").path())
                .unwrap();

        assert_eq!(net.path_length("A", "B"), PathOutcome::Length(1));
    }

    #[test]
    fn test_pajek_bad_link_rejected() {
        let err =
            CitationGraph::from_pajek_file(write_net("*Vertices 2\n1 \"A\"\n2 \"B\"\n*Edges\n1 9\n").path())
                .unwrap_err();

        assert!(matches!(err, Error::GraphParse(_)));
    }

    #[test]
    fn test_load_edgelist() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"# a comment\nA B\nB C\n").unwrap();
        let net = CitationGraph::load(file.path()).unwrap();

        assert_eq!(net.node_count(), 3);
        assert_eq!(net.path_length("A", "C"), PathOutcome::Length(2));
    }

    #[test]
    fn test_path_length_outcomes() {
        let net = chain_graph();

        assert_eq!(net.path_length("A", "B"), PathOutcome::Length(1));
        assert_eq!(net.path_length("A", "C"), PathOutcome::Length(2));
        assert_eq!(net.path_length("C", "A"), PathOutcome::Length(2));
        assert_eq!(net.path_length("A", "A"), PathOutcome::Length(0));
        assert_eq!(net.path_length("A", "D"), PathOutcome::Unreachable);
        assert_eq!(net.path_length("A", "Z"), PathOutcome::Unresolved);
        assert_eq!(net.path_length("Z", "D"), PathOutcome::Unresolved);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(PathOutcome::Length(3).to_string(), "3");
        assert_eq!(PathOutcome::Unreachable.to_string(), "unreachable");
        assert_eq!(PathOutcome::Unresolved.to_string(), "unresolved");
        assert_eq!(PathOutcome::Length(3).length(), Some(3));
        assert_eq!(PathOutcome::Unreachable.length(), None);
    }

    #[test]
    fn test_stats() {
        let stats = chain_graph().stats();

        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 2);
        assert!((stats.avg_degree - 1.0).abs() < 1e-9);
    }
}
