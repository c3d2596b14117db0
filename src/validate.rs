//! Post-hoc validation of a claimed matching, shared by every CLI binary and
//! the test suite.

use crate::graph::Graph;

/// The outcome of validating a claimed matching against its graph.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub claimed_size: usize,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates that every edge in `matching` exists in `graph` and that no
/// vertex appears more than once.
pub fn validate(graph: &Graph, matching: &[(u32, u32)]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut degree = vec![0u32; graph.n()];

    for &(u, v) in matching {
        if !graph.has_edge(u, v) {
            errors.push(format!(
                "edge ({u}, {v}) is in the matching but not in the graph"
            ));
        }
        if (u as usize) < degree.len() {
            degree[u as usize] += 1;
        }
        if (v as usize) < degree.len() {
            degree[v as usize] += 1;
        }
    }

    for (v, &d) in degree.iter().enumerate() {
        if d > 1 {
            errors.push(format!("vertex {v} appears in {d} matched edges"));
        }
    }

    ValidationReport {
        claimed_size: matching.len(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_matching_has_no_errors() {
        let g = Graph::new(4, vec![(0, 1), (2, 3)]);
        let report = validate(&g, &[(0, 1), (2, 3)]);
        assert!(report.is_valid());
        assert_eq!(report.claimed_size, 2);
    }

    #[test]
    fn edge_not_in_graph_is_an_error() {
        let g = Graph::new(3, vec![(0, 1)]);
        let report = validate(&g, &[(0, 2)]);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn vertex_reused_is_an_error() {
        let g = Graph::new(3, vec![(0, 1), (0, 2)]);
        let report = validate(&g, &[(0, 1), (0, 2)]);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
    }
}
