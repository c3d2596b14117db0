//! General-graph maximum matching via Gabow's algorithm, single-phase
//! delta-bucketed variant. O(V E).
//!
//! Every unmatched vertex starts an EVEN tree simultaneously (a forest, not
//! one tree at a time). Candidate edges are queued by a delta level so that
//! all edges incident to the current frontier are drained before the next
//! level opens. An edge between two EVEN vertices either closes a blossom
//! (shrunk via a virtual union-find base) or, when its lowest common
//! ancestor search fails to find one (the two ends lie in different trees),
//! signals that a shortest augmenting path exists; that path is then
//! recovered in a second BFS pass that walks the now-contracted graph.

use crate::graph::Graph;
use crate::mate::{Mate, Matching};
use crate::matching::MatchingEngine;

const NONE: u32 = u32::MAX;
const UNLABELED: u8 = 0;
const EVEN: u8 = 1;
const ODD: u8 = 2;

/// The single-phase, delta-bucketed Gabow matching engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct GabowSimple;

impl GabowSimple {
    pub fn new() -> Self {
        GabowSimple
    }
}

impl MatchingEngine for GabowSimple {
    fn name(&self) -> &'static str {
        "gabow_simple"
    }

    fn maximum_matching(&self, graph: &Graph, initial: Option<Matching>) -> Matching {
        let n = graph.n();
        let mut mate = Mate::new(n);
        if let Some(m) = initial {
            for (u, v) in m.edges() {
                mate.set_pair(u, v);
            }
        }

        log::debug!("gabow_simple: starting on {n} vertices, {} edges", graph.m());
        let mut state = Gabow::new(n);
        while state.phase_1(graph, &mate) {
            log::trace!("gabow_simple: augmenting path found, running phase 2");
            state.phase_2(graph, &mut mate);
        }

        log::debug!("gabow_simple: done, matching size {}", mate.len());
        Matching::from_mate(&mate)
    }
}

struct Gabow {
    n: usize,
    label: Vec<u8>,
    base: Vec<u32>,
    parent: Vec<u32>,
    source_bridge: Vec<u32>,
    target_bridge: Vec<u32>,
    edge_queue: Vec<Vec<(u32, u32)>>,
    delta: usize,
}

impl Gabow {
    fn new(n: usize) -> Self {
        Gabow {
            n,
            label: vec![UNLABELED; n],
            base: (0..n as u32).collect(),
            parent: vec![NONE; n],
            source_bridge: vec![NONE; n],
            target_bridge: vec![NONE; n],
            edge_queue: vec![Vec::new(); n + 1],
            delta: 0,
        }
    }

    fn find_base(&mut self, v: u32) -> u32 {
        if self.base[v as usize] != v {
            let root = self.find_base(self.base[v as usize]);
            self.base[v as usize] = root;
        }
        self.base[v as usize]
    }

    fn find_lca(&mut self, u: u32, v: u32, mate: &Mate) -> Option<u32> {
        let mut marked = vec![false; self.n];

        let mut x = self.find_base(u);
        loop {
            marked[x as usize] = true;
            match mate.mate(x) {
                None => break,
                Some(mx) => {
                    if self.parent[mx as usize] == NONE {
                        break;
                    }
                    x = self.find_base(self.parent[mx as usize]);
                }
            }
        }

        let mut y = self.find_base(v);
        loop {
            match mate.mate(y) {
                None => break,
                Some(my) => {
                    if marked[y as usize] {
                        return Some(y);
                    }
                    if self.parent[my as usize] == NONE {
                        break;
                    }
                    y = self.find_base(self.parent[my as usize]);
                }
            }
        }

        if marked[y as usize] {
            Some(y)
        } else {
            None
        }
    }

    fn shrink_path(&mut self, lca: u32, x: u32, y: u32, mate: &Mate) {
        let mut v = self.find_base(x);
        while v != lca {
            self.base[v as usize] = lca;
            let mv = match mate.mate(v) {
                Some(mv) => mv,
                None => break,
            };
            self.base[mv as usize] = lca;
            self.source_bridge[mv as usize] = x;
            self.target_bridge[mv as usize] = y;
            if self.parent[mv as usize] == NONE {
                break;
            }
            v = self.find_base(self.parent[mv as usize]);
        }
    }

    fn scan_edge(&mut self, u: u32, v: u32) {
        if self.delta < self.edge_queue.len() {
            self.edge_queue[self.delta].push((u, v));
        }
    }

    fn phase_1(&mut self, graph: &Graph, mate: &Mate) -> bool {
        self.delta = 0;
        for q in &mut self.edge_queue {
            q.clear();
        }

        for i in 0..self.n as u32 {
            self.base[i as usize] = i;
            self.label[i as usize] = if mate.is_unmatched(i) { EVEN } else { UNLABELED };
            self.parent[i as usize] = NONE;
            self.source_bridge[i as usize] = NONE;
            self.target_bridge[i as usize] = NONE;
        }

        for v in 0..self.n as u32 {
            if mate.is_unmatched(v) {
                for &u in graph.neighbors(v) {
                    self.scan_edge(v, u);
                }
            }
        }

        while self.delta <= self.n {
            while let Some((mut x, mut y)) = self.edge_queue[self.delta].pop() {
                let mut bx = self.find_base(x);
                let mut by = self.find_base(y);

                if self.label[bx as usize] != EVEN {
                    std::mem::swap(&mut x, &mut y);
                    std::mem::swap(&mut bx, &mut by);
                }

                if bx == by || self.label[bx as usize] != EVEN {
                    continue;
                }
                if Some(y) == mate.mate(x) || self.label[by as usize] == ODD {
                    continue;
                }

                if self.label[by as usize] == UNLABELED {
                    if let Some(z) = mate.mate(y) {
                        self.label[y as usize] = ODD;
                        self.label[z as usize] = EVEN;
                        self.parent[y as usize] = x;
                        self.parent[z as usize] = y;
                        for &w in graph.neighbors(z) {
                            self.scan_edge(z, w);
                        }
                    }
                } else if self.label[by as usize] == EVEN {
                    match self.find_lca(x, y, mate) {
                        Some(lca) => {
                            log::trace!("gabow_simple: contracting blossom at base {lca}");
                            self.shrink_path(lca, x, y, mate);
                            self.shrink_path(lca, y, x, mate);
                        }
                        None => return true,
                    }
                }
            }
            self.delta += 1;
        }
        false
    }

    fn phase_2(&mut self, graph: &Graph, mate: &mut Mate) {
        for start in 0..self.n as u32 {
            if mate.is_matched(start) || self.label[start as usize] != EVEN {
                continue;
            }

            let mut queue = vec![start];
            let mut pred = vec![NONE; self.n];
            let mut vis = vec![false; self.n];
            let sb = self.find_base(start);
            vis[sb as usize] = true;
            let mut qi = 0;
            let mut endpoint = None;

            while qi < queue.len() && endpoint.is_none() {
                let u = queue[qi];
                qi += 1;

                let neighbors: Vec<u32> = graph.neighbors(u).to_vec();
                for v in neighbors {
                    let bu = self.find_base(u);
                    let bv = self.find_base(v);
                    if bu == bv || vis[bv as usize] {
                        continue;
                    }

                    if mate.is_unmatched(v) && v != start {
                        pred[v as usize] = u;
                        endpoint = Some(v);
                        break;
                    }

                    if self.label[bv as usize] != ODD {
                        pred[v as usize] = u;
                        vis[bv as usize] = true;
                        if let Some(mv) = mate.mate(v) {
                            let bmv = self.find_base(mv);
                            if !vis[bmv as usize] {
                                pred[mv as usize] = v;
                                vis[bmv as usize] = true;
                                queue.push(mv);
                            }
                        }
                    }
                }
            }

            if let Some(endpoint) = endpoint {
                let mut path = Vec::new();
                let mut cur = endpoint;
                loop {
                    path.push(cur);
                    if pred[cur as usize] == NONE {
                        break;
                    }
                    cur = pred[cur as usize];
                }
                path.reverse();

                let mut i = 0;
                while i + 1 < path.len() {
                    mate.set_pair(path[i], path[i + 1]);
                    i += 2;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let g = Graph::new(0, vec![]);
        let m = GabowSimple::new().maximum_matching(&g, None);
        assert!(m.is_empty());
    }

    #[test]
    fn single_edge() {
        let g = Graph::new(2, vec![(0, 1)]);
        let m = GabowSimple::new().maximum_matching(&g, None);
        assert_eq!(m.edges().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn odd_triangle_matches_one_edge() {
        let g = Graph::new(3, vec![(0, 1), (1, 2), (2, 0)]);
        let m = GabowSimple::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn c5_matches_two_edges() {
        let g = Graph::new(5, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let m = GabowSimple::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn two_triangles_joined_by_bridge_with_pendant() {
        let edges = vec![
            (0, 1),
            (1, 2),
            (2, 0),
            (0, 3),
            (3, 4),
            (4, 5),
            (5, 3),
            (5, 6),
        ];
        let g = Graph::new(7, edges);
        let m = GabowSimple::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn petersen_graph_has_perfect_matching() {
        let edges = vec![
            (0, 1), (1, 2), (2, 3), (3, 4), (4, 0),
            (5, 7), (7, 9), (9, 6), (6, 8), (8, 5),
            (0, 5), (1, 6), (2, 7), (3, 8), (4, 9),
        ];
        let g = Graph::new(10, edges);
        let m = GabowSimple::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 5);
    }
}
