//! Top-level integration tests: boundary scenarios, the concrete literal
//! scenarios, and cross-engine equivalence over a seeded random suite.

use maxmatch::generators::{bipartite_gnp, gnp, ring_with_chords};
use maxmatch::graph::{BipartiteGraph, Graph};
use maxmatch::mate::Matching;
use maxmatch::matching::blossom_full::BlossomFull;
use maxmatch::matching::blossom_simple::BlossomSimple;
use maxmatch::matching::gabow_scaling::GabowScaling;
use maxmatch::matching::gabow_simple::GabowSimple;
use maxmatch::matching::hopcroft_karp::HopcroftKarp;
use maxmatch::matching::micali_vazirani::MicaliVazirani;
use maxmatch::matching::MatchingEngine;
use maxmatch::validate::validate;

fn engines() -> Vec<Box<dyn MatchingEngine>> {
    vec![
        Box::new(BlossomSimple::new()),
        Box::new(GabowSimple::new()),
        Box::new(GabowScaling::new()),
        Box::new(BlossomFull::new()),
        Box::new(MicaliVazirani::new()),
    ]
}

fn assert_valid_and_sized(graph: &Graph, matching: &Matching, expected: usize) {
    let edges: Vec<(u32, u32)> = matching.edges().collect();
    let report = validate(graph, &edges);
    assert!(report.is_valid(), "invalid matching: {:?}", report.errors);
    assert_eq!(matching.len(), expected);
}

#[test]
fn empty_graph_every_engine() {
    let g = Graph::new(0, vec![]);
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert!(m.is_empty(), "{} failed on empty graph", engine.name());
    }
}

#[test]
fn single_edge_every_engine() {
    let g = Graph::new(2, vec![(0, 1)]);
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_eq!(
            m.edges().collect::<Vec<_>>(),
            vec![(0, 1)],
            "{} failed on single edge",
            engine.name()
        );
    }
}

#[test]
fn odd_triangle_every_engine() {
    let g = Graph::new(3, vec![(0, 1), (1, 2), (2, 0)]);
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_valid_and_sized(&g, &m, 1);
    }
}

#[test]
fn c5_every_engine() {
    let g = Graph::new(5, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_valid_and_sized(&g, &m, 2);
    }
}

#[test]
fn petersen_graph_every_engine() {
    let edges = vec![
        (0, 1), (1, 2), (2, 3), (3, 4), (4, 0),
        (5, 7), (7, 9), (9, 6), (6, 8), (8, 5),
        (0, 5), (1, 6), (2, 7), (3, 8), (4, 9),
    ];
    let g = Graph::new(10, edges);
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_valid_and_sized(&g, &m, 5);
    }
}

#[test]
fn disconnected_graph_is_union_of_components() {
    // A triangle (max matching 1) disjoint from a 4-path (max matching 2).
    let g = Graph::new(
        7,
        vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 6)],
    );
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_valid_and_sized(&g, &m, 3);
    }
}

// Concrete literal scenarios from the testable-properties catalogue.

#[test]
fn scenario_path_of_four() {
    let g = Graph::new(4, vec![(0, 1), (1, 2), (2, 3)]);
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_valid_and_sized(&g, &m, 2);
    }
}

#[test]
fn scenario_blossom_with_tail() {
    let g = Graph::new(5, vec![(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_valid_and_sized(&g, &m, 2);
    }
}

#[test]
fn scenario_c6_with_chord() {
    let g = Graph::new(
        6,
        vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)],
    );
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_valid_and_sized(&g, &m, 3);
    }
}

#[test]
fn scenario_bipartite_hopcroft_karp() {
    let g = BipartiteGraph::new(
        3,
        3,
        vec![(0, 0), (0, 1), (1, 1), (1, 2), (2, 0), (2, 2)],
    );
    let m = HopcroftKarp::new().maximum_matching(&g);
    assert_eq!(m.len(), 3);
}

#[test]
fn scenario_bipartite_c8() {
    let g = BipartiteGraph::new(
        4,
        4,
        vec![(0, 0), (0, 1), (1, 1), (1, 2), (2, 2), (2, 3), (3, 3), (3, 0)],
    );
    let m = HopcroftKarp::new().maximum_matching(&g);
    assert_eq!(m.len(), 4);
}

#[test]
fn scenario_two_triangles_joined_by_bridge_with_pendant() {
    let g = Graph::new(
        7,
        vec![(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 5), (5, 3), (5, 6)],
    );
    for engine in engines() {
        let m = engine.maximum_matching(&g, None);
        assert_valid_and_sized(&g, &m, 3);
    }
}

// Cross-engine equivalence on a seeded random suite: every engine must
// agree on the matching *size* (not necessarily the exact edge set, since
// ties are broken differently across search orders).

#[test]
fn cross_engine_equivalence_on_random_graphs() {
    for seed in 0..8u64 {
        let g = gnp(14, 0.25, seed);
        let sizes: Vec<usize> = engines()
            .iter()
            .map(|e| {
                let m = e.maximum_matching(&g, None);
                assert!(validate(&g, &m.edges().collect::<Vec<_>>()).is_valid());
                m.len()
            })
            .collect();
        assert!(
            sizes.iter().all(|&s| s == sizes[0]),
            "engines disagree on seed {seed}: {sizes:?}"
        );
    }
}

#[test]
fn cross_engine_equivalence_on_ring_with_chords() {
    for seed in 0..4u64 {
        let g = ring_with_chords(13, 5, seed);
        let sizes: Vec<usize> = engines()
            .iter()
            .map(|e| e.maximum_matching(&g, None).len())
            .collect();
        assert!(
            sizes.iter().all(|&s| s == sizes[0]),
            "engines disagree on seed {seed}: {sizes:?}"
        );
    }
}

#[test]
fn bipartite_gnp_respects_cross_side_degree() {
    let g = bipartite_gnp(6, 6, 0.4, 3);
    let m = HopcroftKarp::new().maximum_matching(&g);
    assert!(m.len() <= 6);
}

#[test]
fn greedy_seed_never_exceeds_final_matching_size() {
    use maxmatch::greedy::{greedy_matching, GreedyStrategy};

    let g = gnp(16, 0.2, 99);
    for strategy in [GreedyStrategy::FirstFit, GreedyStrategy::MinDegree] {
        let seeded = greedy_matching(&g, strategy);
        let initial = Matching::from_mate(&seeded);
        let greedy_size = initial.len();
        for engine in engines() {
            let m = engine.maximum_matching(&g, Some(Matching::from_pairs(initial.edges().collect())));
            assert!(greedy_size <= m.len());
        }
    }
}

// Property tests over arbitrary small graphs, rather than a fixed seeded
// suite: every engine must return a valid matching, and every engine must
// agree with every other on the matching's size.

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_graph(max_n: u32) -> impl Strategy<Value = Graph> {
        (2..=max_n).prop_flat_map(|n| {
            prop::collection::vec((0..n, 0..n), 0..(n * n) as usize).prop_map(move |raw_edges| {
                let edges: Vec<(u32, u32)> = raw_edges
                    .into_iter()
                    .filter(|&(u, v)| u != v)
                    .map(|(u, v)| if u < v { (u, v) } else { (v, u) })
                    .collect();
                Graph::new(n as usize, edges)
            })
        })
    }

    proptest! {
        #[test]
        fn every_engine_returns_a_valid_matching(g in arb_graph(10)) {
            for engine in engines() {
                let m = engine.maximum_matching(&g, None);
                let edges: Vec<(u32, u32)> = m.edges().collect();
                let report = validate(&g, &edges);
                prop_assert!(report.is_valid(), "{} produced an invalid matching: {:?}", engine.name(), report.errors);
            }
        }

        #[test]
        fn every_engine_agrees_on_matching_size(g in arb_graph(10)) {
            let sizes: Vec<(String, usize)> = engines()
                .iter()
                .map(|e| (e.name().to_string(), e.maximum_matching(&g, None).len()))
                .collect();
            let first = sizes[0].1;
            prop_assert!(
                sizes.iter().all(|(_, s)| *s == first),
                "engines disagree: {sizes:?}"
            );
        }
    }
}
