//! SuiteSparse Matrix Market (`.mtx`) reader.
//!
//! Comment lines (`%...`) are skipped; the first remaining line is the
//! `rows cols nnz` header; each data line is `i j [value]` in 1-indexed
//! coordinates. Self-loops are dropped, duplicates are merged, and the
//! output is canonicalized to a 0-indexed edge list with `u < v`.

use std::fs;
use std::path::Path;

use crate::error::GraphIoError;

/// A canonicalized, 0-indexed edge list read from a Matrix Market file.
pub struct MatrixMarketGraph {
    pub n: usize,
    pub edges: Vec<(u32, u32)>,
}

/// Reads and canonicalizes a `.mtx` file into a 0-indexed simple edge list.
pub fn read_matrix_market(path: impl AsRef<Path>) -> Result<MatrixMarketGraph, GraphIoError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| GraphIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = text.lines().filter(|l| !l.trim_start().starts_with('%'));

    let header = lines.next().ok_or_else(|| GraphIoError::MalformedHeader {
        path: path.to_path_buf(),
        line: String::new(),
    })?;
    let header_nums: Vec<i64> = header
        .split_whitespace()
        .map(|t| t.parse::<i64>())
        .collect::<Result<_, _>>()
        .map_err(|_| GraphIoError::MalformedHeader {
            path: path.to_path_buf(),
            line: header.to_string(),
        })?;
    if header_nums.len() < 2 {
        return Err(GraphIoError::MalformedHeader {
            path: path.to_path_buf(),
            line: header.to_string(),
        });
    }
    let rows = header_nums[0] as usize;
    let cols = header_nums[1] as usize;
    let n = rows.max(cols);

    let mut seen = std::collections::BTreeSet::new();
    for (i, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let toks: Vec<&str> = line.split_whitespace().collect();
        if toks.len() < 2 {
            return Err(GraphIoError::MalformedEdge {
                path: path.to_path_buf(),
                line_no: i + 2,
                line: line.to_string(),
            });
        }
        let i1: i64 = toks[0]
            .parse()
            .map_err(|_| GraphIoError::MalformedEdge {
                path: path.to_path_buf(),
                line_no: i + 2,
                line: line.to_string(),
            })?;
        let j1: i64 = toks[1]
            .parse()
            .map_err(|_| GraphIoError::MalformedEdge {
                path: path.to_path_buf(),
                line_no: i + 2,
                line: line.to_string(),
            })?;
        if i1 == j1 {
            continue;
        }
        let i0 = (i1 - 1) as u32;
        let j0 = (j1 - 1) as u32;
        let (u, v) = if i0 < j0 { (i0, j0) } else { (j0, i0) };
        seen.insert((u, v));
    }

    Ok(MatrixMarketGraph {
        n,
        edges: seen.into_iter().collect(),
    })
}

/// Renders a [`MatrixMarketGraph`] in the plain edge-list format
/// (`N E` header, then sorted `u v` lines), matching the original
/// `mtx_to_edgelist.py` converter's output.
pub fn to_edge_list_text(g: &MatrixMarketGraph) -> String {
    let mut out = format!("{} {}\n", g.n, g.edges.len());
    for (u, v) in &g.edges {
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
    fn skips_comments_and_converts_to_zero_indexed() {
        let f = write_tmp("%%MatrixMarket matrix coordinate pattern symmetric\n% comment\n4 4 3\n2 1\n3 2\n4 3\n");
        let parsed = read_matrix_market(f.path()).unwrap();
        assert_eq!(parsed.n, 4);
        assert_eq!(parsed.edges, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn drops_self_loops_and_dedups() {
        let f = write_tmp("3 3 3\n1 1\n1 2\n2 1\n");
        let parsed = read_matrix_market(f.path()).unwrap();
        assert_eq!(parsed.edges, vec![(0, 1)]);
    }
}
