//! The graph substrate shared by every matching engine.
//!
//! A [`Graph`] is an immutable, simple (no self-loops, no parallel edges),
//! 0-indexed adjacency structure. Neighbor lists are kept sorted so that
//! every engine iterates in a deterministic order and validation can use
//! binary search.

/// An immutable undirected simple graph over vertices `0..n`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    adjacency: Vec<Vec<u32>>,
    num_edges: usize,
}

impl Graph {
    /// Builds a graph from `n` vertices and a raw edge list.
    ///
    /// Self-loops and endpoints outside `0..n` are dropped; duplicate edges
    /// are merged. Neighbor lists are sorted ascending.
    pub fn new(n: usize, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut adjacency = vec![Vec::new(); n];
        for (u, v) in edges {
            if u == v {
                continue;
            }
            if (u as usize) >= n || (v as usize) >= n {
                continue;
            }
            adjacency[u as usize].push(v);
            adjacency[v as usize].push(u);
        }

        let mut num_edges = 0;
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }
        for (u, list) in adjacency.iter().enumerate() {
            for &v in list {
                if (v as usize) > u {
                    num_edges += 1;
                }
            }
        }

        Graph {
            adjacency,
            num_edges,
        }
    }

    /// Number of vertices.
    pub fn n(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct undirected edges.
    pub fn m(&self) -> usize {
        self.num_edges
    }

    /// Sorted, deduplicated neighbor list of `v`.
    pub fn neighbors(&self, v: u32) -> &[u32] {
        &self.adjacency[v as usize]
    }

    /// Degree of `v`.
    pub fn degree(&self, v: u32) -> usize {
        self.adjacency[v as usize].len()
    }

    /// `true` if `(u, v)` is an edge, via binary search on the sorted
    /// neighbor list.
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        if u as usize >= self.adjacency.len() {
            return false;
        }
        self.adjacency[u as usize].binary_search(&v).is_ok()
    }

    /// Iterates over all undirected edges `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, list)| {
            let u = u as u32;
            list.iter()
                .copied()
                .filter(move |&v| v > u)
                .map(move |v| (u, v))
        })
    }
}

/// A bipartite graph: `left` vertices `0..l`, `right` vertices `0..r`, edges
/// only between the two sides. Used by the Hopcroft-Karp engine.
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    left_adj: Vec<Vec<u32>>,
    right_adj: Vec<Vec<u32>>,
    num_edges: usize,
}

impl BipartiteGraph {
    /// Builds a bipartite graph from `l` left vertices, `r` right vertices,
    /// and edges `(left, right)`. Out-of-range endpoints are dropped;
    /// duplicates are merged.
    pub fn new(l: usize, r: usize, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut left_adj = vec![Vec::new(); l];
        let mut right_adj = vec![Vec::new(); r];
        for (u, v) in edges {
            if (u as usize) >= l || (v as usize) >= r {
                continue;
            }
            left_adj[u as usize].push(v);
            right_adj[v as usize].push(u);
        }
        let mut num_edges = 0;
        for list in &mut left_adj {
            list.sort_unstable();
            list.dedup();
            num_edges += list.len();
        }
        for list in &mut right_adj {
            list.sort_unstable();
            list.dedup();
        }
        BipartiteGraph {
            left_adj,
            right_adj,
            num_edges,
        }
    }

    pub fn l(&self) -> usize {
        self.left_adj.len()
    }

    pub fn r(&self) -> usize {
        self.right_adj.len()
    }

    pub fn m(&self) -> usize {
        self.num_edges
    }

    pub fn left_neighbors(&self, u: u32) -> &[u32] {
        &self.left_adj[u as usize]
    }

    pub fn right_neighbors(&self, v: u32) -> &[u32] {
        &self.right_adj[v as usize]
    }

    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        if u as usize >= self.left_adj.len() {
            return false;
        }
        self.left_adj[u as usize].binary_search(&v).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_self_loops_and_out_of_range() {
        let g = Graph::new(3, vec![(0, 0), (0, 1), (1, 2), (5, 1)]);
        assert_eq!(g.n(), 3);
        assert_eq!(g.m(), 2);
        assert_eq!(g.neighbors(0), &[1]);
    }

    #[test]
    fn dedups_parallel_edges() {
        let g = Graph::new(2, vec![(0, 1), (1, 0), (0, 1)]);
        assert_eq!(g.m(), 1);
        assert_eq!(g.neighbors(0), &[1]);
        assert_eq!(g.neighbors(1), &[0]);
    }

    #[test]
    fn has_edge_binary_search() {
        let g = Graph::new(4, vec![(0, 1), (0, 3)]);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(3, 0));
        assert!(!g.has_edge(0, 2));
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn graph_round_trips_through_json() {
        let g = Graph::new(4, vec![(0, 1), (1, 2), (2, 3)]);
        let json = serde_json::to_string(&g).unwrap();
        let restored: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.n(), g.n());
        assert_eq!(restored.m(), g.m());
        for v in 0..g.n() as u32 {
            assert_eq!(restored.neighbors(v), g.neighbors(v));
        }
    }
}
