//! General-graph maximum matching via Edmonds' Blossom algorithm with
//! virtual (union-find) blossom contraction. O(V^2 E).
//!
//! Each outer loop iteration grows a single BFS tree from one unmatched
//! root. Same-tree edges between two outer vertices are blossoms: the two
//! tree paths up to their lowest common ancestor are unioned into one
//! virtual blossom (`base[]`), and any inner vertex absorbed along the way
//! is promoted to outer and re-enqueued. An edge from an outer vertex to an
//! unlabeled, unmatched vertex completes an augmenting path.

use std::collections::VecDeque;

use crate::graph::Graph;
use crate::mate::{Mate, Matching};
use crate::matching::MatchingEngine;
use crate::unionfind::UnionFind;

const NONE: u32 = u32::MAX;
const UNLABELED: u8 = 0;
const OUTER: u8 = 1;
const INNER: u8 = 2;

/// The virtual-contraction Blossom engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlossomSimple;

impl BlossomSimple {
    pub fn new() -> Self {
        BlossomSimple
    }
}

impl MatchingEngine for BlossomSimple {
    fn name(&self) -> &'static str {
        "blossom_simple"
    }

    fn maximum_matching(&self, graph: &Graph, initial: Option<Matching>) -> Matching {
        let n = graph.n();
        let mut mate = Mate::new(n);
        if let Some(m) = initial {
            for (u, v) in m.edges() {
                mate.set_pair(u, v);
            }
        }
        log::debug!("blossom_simple: starting on {n} vertices, {} edges", graph.m());

        let mut search = Search::new(n);
        loop {
            let mut improved = false;
            for root in 0..n as u32 {
                if mate.is_matched(root) {
                    continue;
                }
                if let Some(path) = search.find_augmenting_path(graph, &mate, root) {
                    log::trace!("blossom_simple: augmenting path of length {} from root {root}", path.len());
                    augment(&mut mate, &path);
                    improved = true;
                    break;
                }
            }
            if !improved {
                break;
            }
        }

        log::debug!("blossom_simple: done, matching size {}", mate.len());
        Matching::from_mate(&mate)
    }
}

struct Search {
    parent: Vec<u32>,
    base: UnionFind,
    label: Vec<u8>,
    in_queue: Vec<bool>,
    queue: VecDeque<u32>,
}

impl Search {
    fn new(n: usize) -> Self {
        Search {
            parent: vec![NONE; n],
            base: UnionFind::new(n),
            label: vec![UNLABELED; n],
            in_queue: vec![false; n],
            queue: VecDeque::new(),
        }
    }

    fn reset(&mut self) {
        self.parent.iter_mut().for_each(|p| *p = NONE);
        self.base.reset();
        self.label.iter_mut().for_each(|l| *l = UNLABELED);
        self.in_queue.iter_mut().for_each(|b| *b = false);
        self.queue.clear();
    }

    fn find_blossom_base(&mut self, v: u32, w: u32) -> u32 {
        let mut path_v = Vec::new();
        let mut cur = v;
        loop {
            path_v.push(self.base.find(cur));
            if self.parent[cur as usize] == NONE {
                break;
            }
            cur = self.parent[cur as usize];
        }

        let mut cur = w;
        loop {
            let b = self.base.find(cur);
            if path_v.contains(&b) {
                return b;
            }
            if self.parent[cur as usize] == NONE {
                break;
            }
            cur = self.parent[cur as usize];
        }
        self.base.find(v)
    }

    fn trace_and_update(&mut self, start: u32, blossom_base: u32, mate: &Mate) {
        let mut cur = start;
        loop {
            if self.base.find(cur) == blossom_base {
                break;
            }
            self.base.union_to(cur, cur, blossom_base);
            if self.label[cur as usize] == INNER {
                self.label[cur as usize] = OUTER;
                if !self.in_queue[cur as usize] {
                    self.queue.push_back(cur);
                    self.in_queue[cur as usize] = true;
                }
            }
            match mate.mate(cur) {
                Some(m) => {
                    self.base.union_to(m, m, blossom_base);
                    if self.parent[m as usize] != NONE {
                        cur = self.parent[m as usize];
                    } else {
                        break;
                    }
                }
                None => break,
            }
        }
    }

    fn build_path(&self, v: u32, w: u32) -> Vec<u32> {
        let mut path = vec![w, v];
        let mut cur = v;
        while self.parent[cur as usize] != NONE {
            path.push(self.parent[cur as usize]);
            cur = self.parent[cur as usize];
        }
        path
    }

    fn find_augmenting_path(&mut self, graph: &Graph, mate: &Mate, root: u32) -> Option<Vec<u32>> {
        self.reset();
        self.label[root as usize] = OUTER;
        self.queue.push_back(root);
        self.in_queue[root as usize] = true;

        while let Some(v) = self.queue.pop_front() {
            let v_base = self.base.find(v);
            let neighbors: Vec<u32> = graph.neighbors(v).to_vec();
            for w in neighbors {
                let w_base = self.base.find(w);
                if v_base == w_base {
                    continue;
                }
                if self.label[w as usize] == UNLABELED {
                    match mate.mate(w) {
                        Some(m) => {
                            self.label[w as usize] = INNER;
                            self.label[m as usize] = OUTER;
                            self.parent[w as usize] = v;
                            self.parent[m as usize] = w;
                            if !self.in_queue[m as usize] {
                                self.queue.push_back(m);
                                self.in_queue[m as usize] = true;
                            }
                        }
                        None => return Some(self.build_path(v, w)),
                    }
                } else if self.label[w as usize] == OUTER {
                    let blossom_base = self.find_blossom_base(v, w);
                    log::trace!("blossom_simple: contracting blossom at base {blossom_base}");
                    self.trace_and_update(v, blossom_base, mate);
                    self.trace_and_update(w, blossom_base, mate);
                }
            }
        }
        None
    }
}

fn augment(mate: &mut Mate, path: &[u32]) {
    let mut i = 0;
    while i + 1 < path.len() {
        mate.set_pair(path[i], path[i + 1]);
        i += 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let g = Graph::new(0, vec![]);
        let m = BlossomSimple::new().maximum_matching(&g, None);
        assert!(m.is_empty());
    }

    #[test]
    fn single_edge() {
        let g = Graph::new(2, vec![(0, 1)]);
        let m = BlossomSimple::new().maximum_matching(&g, None);
        assert_eq!(m.edges().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn odd_triangle_matches_one_edge() {
        let g = Graph::new(3, vec![(0, 1), (1, 2), (2, 0)]);
        let m = BlossomSimple::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn c5_matches_two_edges() {
        let g = Graph::new(5, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let m = BlossomSimple::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn blossom_with_tail() {
        let g = Graph::new(5, vec![(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
        let m = BlossomSimple::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn petersen_graph_has_perfect_matching() {
        let edges = vec![
            (0, 1), (1, 2), (2, 3), (3, 4), (4, 0), // outer cycle
            (5, 7), (7, 9), (9, 6), (6, 8), (8, 5), // inner pentagram
            (0, 5), (1, 6), (2, 7), (3, 8), (4, 9), // spokes
        ];
        let g = Graph::new(10, edges);
        let m = BlossomSimple::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 5);
    }
}
