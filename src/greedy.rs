//! Greedy matching initializers.
//!
//! Two strategies, both non-backtracking: a first pass picks an arbitrary
//! unmatched neighbor (first-fit), the other biases towards low-degree
//! vertices first so high-degree "hub" vertices stay available longer
//! (min-degree). Neither strategy can make the eventual maximum matching
//! smaller; they only reduce the number of augmentations a search engine
//! has to perform afterwards.

use crate::graph::Graph;
use crate::mate::Mate;

/// Which greedy strategy to seed a matching with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreedyStrategy {
    /// Iterate vertices in index order; pair each unmatched vertex with its
    /// first unmatched neighbor.
    FirstFit,
    /// Iterate vertices ordered by ascending `(degree, index)`; pair each
    /// unmatched vertex with the unmatched neighbor of smallest
    /// `(degree, index)`.
    MinDegree,
}

/// Seeds `mate` with a greedy matching of `graph` using `strategy`.
pub fn greedy_matching(graph: &Graph, strategy: GreedyStrategy) -> Mate {
    let n = graph.n();
    let mut mate = Mate::new(n);
    match strategy {
        GreedyStrategy::FirstFit => first_fit(graph, &mut mate),
        GreedyStrategy::MinDegree => min_degree(graph, &mut mate),
    }
    mate
}

fn first_fit(graph: &Graph, mate: &mut Mate) {
    for u in 0..graph.n() as u32 {
        if mate.is_matched(u) {
            continue;
        }
        if let Some(&v) = graph.neighbors(u).iter().find(|&&v| mate.is_unmatched(v)) {
            mate.set_pair(u, v);
        }
    }
}

fn min_degree(graph: &Graph, mate: &mut Mate) {
    let n = graph.n();
    let mut order: Vec<u32> = (0..n as u32).collect();
    order.sort_by_key(|&v| (graph.degree(v), v));

    for &u in &order {
        if mate.is_matched(u) {
            continue;
        }
        let best = graph
            .neighbors(u)
            .iter()
            .copied()
            .filter(|&v| mate.is_unmatched(v))
            .min_by_key(|&v| (graph.degree(v), v));
        if let Some(v) = best {
            mate.set_pair(u, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fit_matches_disjoint_edges() {
        let g = Graph::new(4, vec![(0, 1), (2, 3)]);
        let m = greedy_matching(&g, GreedyStrategy::FirstFit);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn first_fit_on_path_leaves_one_vertex() {
        let g = Graph::new(4, vec![(0, 1), (1, 2), (2, 3)]);
        let m = greedy_matching(&g, GreedyStrategy::FirstFit);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn min_degree_prefers_low_degree_first() {
        // Star centered at 0 plus a pendant edge (2,3). Min-degree greedy
        // should leave the star's leaves free for (2,3) and one spoke.
        let g = Graph::new(4, vec![(0, 1), (0, 2), (0, 3)]);
        let m = greedy_matching(&g, GreedyStrategy::MinDegree);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn empty_graph_yields_empty_matching() {
        let g = Graph::new(0, vec![]);
        let m = greedy_matching(&g, GreedyStrategy::FirstFit);
        assert!(m.is_empty());
    }
}
