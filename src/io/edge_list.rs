//! The plain-text edge-list format.
//!
//! General graphs: first line `N M`, then `M` lines of `u v`.
//! Bipartite graphs: first line `L R M`, then `M` lines of `u v` with
//! `u` a left index and `v` a right index.
//!
//! Endpoints outside range or self-loops are silently dropped, matching
//! `Graph::new`'s own construction rules; a short file (fewer data lines
//! than the header promises) is a [`GraphIoError::EdgeCountMismatch`].

use std::fs;
use std::path::Path;

use crate::error::GraphIoError;
use crate::graph::{BipartiteGraph, Graph};

/// Parsed general-graph edge list, before it is handed to [`Graph::new`]
/// (which performs the actual endpoint-range/self-loop filtering).
pub struct EdgeListFile {
    pub n: usize,
    pub edges: Vec<(u32, u32)>,
}

/// Parsed bipartite edge list.
pub struct BipartiteEdgeListFile {
    pub l: usize,
    pub r: usize,
    pub edges: Vec<(u32, u32)>,
}

fn read_lines(path: &Path) -> Result<Vec<String>, GraphIoError> {
    let text = fs::read_to_string(path).map_err(|source| GraphIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(|l| l.to_string()).collect())
}

fn parse_ints(line: &str) -> Option<Vec<i64>> {
    line.split_whitespace()
        .map(|tok| tok.parse::<i64>().ok())
        .collect()
}

/// Reads a general-graph edge-list file: `N M` header then `M` `u v` lines.
pub fn read_edge_list(path: impl AsRef<Path>) -> Result<EdgeListFile, GraphIoError> {
    let path = path.as_ref();
    let lines = read_lines(path)?;
    let mut iter = lines.iter();

    let header = iter.next().ok_or_else(|| GraphIoError::MalformedHeader {
        path: path.to_path_buf(),
        line: String::new(),
    })?;
    let header_nums = parse_ints(header).ok_or_else(|| GraphIoError::MalformedHeader {
        path: path.to_path_buf(),
        line: header.clone(),
    })?;
    if header_nums.len() != 2 || header_nums.iter().any(|&x| x < 0) {
        return Err(GraphIoError::MalformedHeader {
            path: path.to_path_buf(),
            line: header.clone(),
        });
    }
    let n = header_nums[0] as usize;
    let m = header_nums[1] as usize;

    let mut edges = Vec::with_capacity(m);
    for (i, line) in iter.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let nums = parse_ints(line).ok_or_else(|| GraphIoError::MalformedEdge {
            path: path.to_path_buf(),
            line_no: i + 2,
            line: line.clone(),
        })?;
        if nums.len() != 2 {
            return Err(GraphIoError::MalformedEdge {
                path: path.to_path_buf(),
                line_no: i + 2,
                line: line.clone(),
            });
        }
        edges.push((nums[0], nums[1]));
    }

    if edges.len() != m {
        return Err(GraphIoError::EdgeCountMismatch {
            path: path.to_path_buf(),
            expected: m,
            found: edges.len(),
        });
    }

    let edges = edges
        .into_iter()
        .filter_map(|(u, v)| {
            if u < 0 || v < 0 {
                None
            } else {
                Some((u as u32, v as u32))
            }
        })
        .collect();

    Ok(EdgeListFile { n, edges })
}

/// Reads a bipartite edge-list file: `L R M` header then `M` `u v` lines.
pub fn read_bipartite_edge_list(
    path: impl AsRef<Path>,
) -> Result<BipartiteEdgeListFile, GraphIoError> {
    let path = path.as_ref();
    let lines = read_lines(path)?;
    let mut iter = lines.iter();

    let header = iter.next().ok_or_else(|| GraphIoError::MalformedHeader {
        path: path.to_path_buf(),
        line: String::new(),
    })?;
    let header_nums = parse_ints(header).ok_or_else(|| GraphIoError::MalformedHeader {
        path: path.to_path_buf(),
        line: header.clone(),
    })?;
    if header_nums.len() != 3 || header_nums.iter().any(|&x| x < 0) {
        return Err(GraphIoError::MalformedHeader {
            path: path.to_path_buf(),
            line: header.clone(),
        });
    }
    let l = header_nums[0] as usize;
    let r = header_nums[1] as usize;
    let m = header_nums[2] as usize;

    let mut edges = Vec::with_capacity(m);
    for (i, line) in iter.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let nums = parse_ints(line).ok_or_else(|| GraphIoError::MalformedEdge {
            path: path.to_path_buf(),
            line_no: i + 2,
            line: line.clone(),
        })?;
        if nums.len() != 2 {
            return Err(GraphIoError::MalformedEdge {
                path: path.to_path_buf(),
                line_no: i + 2,
                line: line.clone(),
            });
        }
        edges.push((nums[0], nums[1]));
    }

    if edges.len() != m {
        return Err(GraphIoError::EdgeCountMismatch {
            path: path.to_path_buf(),
            expected: m,
            found: edges.len(),
        });
    }

    let edges = edges
        .into_iter()
        .filter_map(|(u, v)| {
            if u < 0 || v < 0 {
                None
            } else {
                Some((u as u32, v as u32))
            }
        })
        .collect();

    Ok(BipartiteEdgeListFile { l, r, edges })
}

impl EdgeListFile {
    pub fn into_graph(self) -> Graph {
        Graph::new(self.n, self.edges)
    }
}

impl BipartiteEdgeListFile {
    pub fn into_graph(self) -> BipartiteGraph {
        BipartiteGraph::new(self.l, self.r, self.edges)
    }
}

/// Writes a general-graph edge list in the same format `read_edge_list`
/// accepts.
pub fn write_edge_list(graph: &Graph) -> String {
    let mut out = format!("{} {}\n", graph.n(), graph.m());
    for (u, v) in graph.edges() {
        out.push_str(&format!("{u} {v}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_simple_edge_list() {
        let f = write_tmp("4 3\n0 1\n1 2\n2 3\n");
        let parsed = read_edge_list(f.path()).unwrap();
        assert_eq!(parsed.n, 4);
        assert_eq!(parsed.edges, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn short_file_is_edge_count_mismatch() {
        let f = write_tmp("4 3\n0 1\n");
        let err = read_edge_list(f.path()).unwrap_err();
        assert!(matches!(err, GraphIoError::EdgeCountMismatch { .. }));
    }

    #[test]
    fn reads_bipartite_edge_list() {
        let f = write_tmp("2 2 2\n0 0\n1 1\n");
        let parsed = read_bipartite_edge_list(f.path()).unwrap();
        assert_eq!(parsed.l, 2);
        assert_eq!(parsed.r, 2);
        assert_eq!(parsed.edges, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn out_of_range_endpoints_are_dropped_by_graph_construction() {
        let f = write_tmp("3 2\n0 1\n0 9\n");
        let parsed = read_edge_list(f.path()).unwrap();
        let g = parsed.into_graph();
        assert_eq!(g.m(), 1);
    }
}
