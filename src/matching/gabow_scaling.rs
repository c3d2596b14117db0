//! General-graph maximum matching via Gabow's two-phase scaling algorithm.
//! O(E sqrt V).
//!
//! Phase 1 (MIN) runs a delta-level BFS exactly like [`super::gabow_simple`],
//! but defers the union-find merges driving blossom contraction into a
//! second union-find (`dbase`) that is only updated once an entire delta
//! level has finished, so the base array used *during* a level stays stable.
//! When phase 1 finds that no more shortest augmenting paths exist at the
//! current delta, it builds a small contracted graph H over the dbase
//! components (`h_adj`, `mate_h`). Phase 2 (MAX) then finds a maximal set of
//! vertex-disjoint shortest augmenting paths *in H* with a second union-find
//! layer (`db2`) to contract H-blossoms, and unfolds each H-path back to a
//! concrete path in G using the bridge endpoints recorded during phase 1's
//! shrink step.

use crate::graph::Graph;
use crate::mate::{Mate, Matching};
use crate::matching::MatchingEngine;

const NONE: u32 = u32::MAX;
const UNLABELED: u8 = 0;
const EVEN: u8 = 1;
const ODD: u8 = 2;

/// The two-phase scaling Gabow matching engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct GabowScaling;

impl GabowScaling {
    pub fn new() -> Self {
        GabowScaling
    }
}

impl MatchingEngine for GabowScaling {
    fn name(&self) -> &'static str {
        "gabow_scaling"
    }

    fn maximum_matching(&self, graph: &Graph, initial: Option<Matching>) -> Matching {
        let n = graph.n();
        let mut mate = Mate::new(n);
        if let Some(m) = initial {
            for (u, v) in m.edges() {
                mate.set_pair(u, v);
            }
        }

        log::debug!("gabow_scaling: starting on {n} vertices, {} edges", graph.m());
        let mut state = Scaling::new(n);
        while state.phase_1(graph, &mate) {
            log::trace!("gabow_scaling: phase 1 built an H-graph, running phase 2");
            state.phase_2(&mut mate);
        }

        log::debug!("gabow_scaling: done, matching size {}", mate.len());
        Matching::from_mate(&mate)
    }
}

struct Scaling {
    n: usize,
    label: Vec<u8>,
    parent: Vec<u32>,
    source_bridge: Vec<u32>,
    target_bridge: Vec<u32>,
    base_par: Vec<u32>,
    dbase_par: Vec<u32>,
    level_queue: Vec<Vec<(u32, u32)>>,
    lca_tag1: Vec<u32>,
    lca_tag2: Vec<u32>,
    lca_epoch: u32,
    in_tree: Vec<bool>,
    tree_nodes: Vec<u32>,
    delta: usize,

    h_adj: Vec<Vec<(u32, u32)>>,
    rep: Vec<u32>,
    mate_h: Vec<u32>,
    label_h: Vec<u8>,
    parent_h_src: Vec<u32>,
    parent_h_tgt: Vec<u32>,
    bridge_h_src: Vec<u32>,
    bridge_h_tgt: Vec<u32>,
    dir_h: Vec<i8>,
    even_time_h: Vec<u32>,
    t_h: u32,
    db2_par: Vec<u32>,
}

impl Scaling {
    fn new(n: usize) -> Self {
        Scaling {
            n,
            label: vec![UNLABELED; n],
            parent: vec![NONE; n],
            source_bridge: vec![NONE; n],
            target_bridge: vec![NONE; n],
            base_par: (0..n as u32).collect(),
            dbase_par: (0..n as u32).collect(),
            level_queue: vec![Vec::new(); n + 2],
            lca_tag1: vec![0; n],
            lca_tag2: vec![0; n],
            lca_epoch: 0,
            in_tree: vec![false; n],
            tree_nodes: Vec::new(),
            delta: 0,
            h_adj: vec![Vec::new(); n],
            rep: vec![0; n],
            mate_h: vec![NONE; n],
            label_h: vec![UNLABELED; n],
            parent_h_src: vec![NONE; n],
            parent_h_tgt: vec![NONE; n],
            bridge_h_src: vec![NONE; n],
            bridge_h_tgt: vec![NONE; n],
            dir_h: vec![0; n],
            even_time_h: vec![0; n],
            t_h: 0,
            db2_par: (0..n as u32).collect(),
        }
    }

    fn find_base(&mut self, v: u32) -> u32 {
        let mut v = v;
        while self.base_par[v as usize] != v {
            let gp = self.base_par[self.base_par[v as usize] as usize];
            self.base_par[v as usize] = gp;
            v = self.base_par[v as usize];
        }
        v
    }

    fn union_base(&mut self, a: u32, b: u32, r: u32) {
        let a = self.find_base(a);
        let b = self.find_base(b);
        self.base_par[a as usize] = r;
        self.base_par[b as usize] = r;
    }

    fn find_dbase(&mut self, v: u32) -> u32 {
        let mut v = v;
        while self.dbase_par[v as usize] != v {
            let gp = self.dbase_par[self.dbase_par[v as usize] as usize];
            self.dbase_par[v as usize] = gp;
            v = self.dbase_par[v as usize];
        }
        v
    }

    fn union_dbase(&mut self, a: u32, b: u32) {
        let a = self.find_dbase(a);
        let b = self.find_dbase(b);
        if a != b {
            self.dbase_par[a as usize] = b;
        }
    }

    fn make_rep_dbase(&mut self, v: u32) {
        let r = self.find_dbase(v);
        if r != v {
            self.dbase_par[r as usize] = v;
            self.dbase_par[v as usize] = v;
        }
    }

    fn find_db2(&mut self, v: u32) -> u32 {
        let mut v = v;
        while self.db2_par[v as usize] != v {
            let gp = self.db2_par[self.db2_par[v as usize] as usize];
            self.db2_par[v as usize] = gp;
            v = self.db2_par[v as usize];
        }
        v
    }

    fn union_db2(&mut self, a: u32, b: u32) {
        let a = self.find_db2(a);
        let b = self.find_db2(b);
        if a != b {
            self.db2_par[a as usize] = b;
        }
    }

    fn make_rep_db2(&mut self, v: u32) {
        let r = self.find_db2(v);
        if r != v {
            self.db2_par[r as usize] = v;
            self.db2_par[v as usize] = v;
        }
    }

    fn find_lca(&mut self, u: u32, v: u32, mate: &Mate) -> Option<u32> {
        self.lca_epoch += 1;
        let ep = self.lca_epoch;
        let mut hx = self.find_base(u);
        let mut hy = self.find_base(v);
        self.lca_tag1[hx as usize] = ep;
        self.lca_tag2[hy as usize] = ep;
        loop {
            if self.lca_tag1[hy as usize] == ep {
                return Some(hy);
            }
            if self.lca_tag2[hx as usize] == ep {
                return Some(hx);
            }
            let hx_is_root = match mate.mate(hx) {
                None => true,
                Some(mx) => self.parent[mx as usize] == NONE,
            };
            let hy_is_root = match mate.mate(hy) {
                None => true,
                Some(my) => self.parent[my as usize] == NONE,
            };
            if hx_is_root && hy_is_root {
                return None;
            }
            if !hx_is_root {
                let mx = mate.mate(hx).unwrap();
                hx = self.find_base(self.parent[mx as usize]);
                self.lca_tag1[hx as usize] = ep;
            }
            if !hy_is_root {
                let my = mate.mate(hy).unwrap();
                hy = self.find_base(self.parent[my as usize]);
                self.lca_tag2[hy as usize] = ep;
            }
        }
    }

    fn shrink_path(
        &mut self,
        graph: &Graph,
        b: u32,
        x: u32,
        y: u32,
        mate: &Mate,
        dunions: &mut Vec<(u32, u32)>,
    ) {
        let mut v = self.find_base(x);
        while v != b {
            self.union_base(v, b, b);
            dunions.push((v, b));
            let mv = match mate.mate(v) {
                Some(mv) => mv,
                None => break,
            };
            self.union_base(mv, b, b);
            dunions.push((mv, b));
            self.base_par[b as usize] = b;
            self.source_bridge[mv as usize] = x;
            self.target_bridge[mv as usize] = y;
            let d = self.delta;
            let neighbors: Vec<u32> = graph.neighbors(mv).to_vec();
            for w in neighbors {
                if Some(w) == mate.mate(mv) {
                    continue;
                }
                let bw = self.find_base(w);
                if self.label[bw as usize] == ODD {
                    continue;
                }
                if self.label[bw as usize] == UNLABELED {
                    self.level_queue[d + 1].push((mv, w));
                } else if self.label[bw as usize] == EVEN {
                    self.level_queue[d].push((mv, w));
                }
            }
            if self.parent[mv as usize] == NONE {
                break;
            }
            v = self.find_base(self.parent[mv as usize]);
        }
        dunions.push((b, b));
    }

    fn phase_1(&mut self, graph: &Graph, mate: &Mate) -> bool {
        self.delta = 0;
        self.tree_nodes.clear();
        for q in &mut self.level_queue {
            q.clear();
        }
        let mut dunions: Vec<(u32, u32)> = Vec::new();

        for i in 0..self.n as u32 {
            self.base_par[i as usize] = i;
            self.dbase_par[i as usize] = i;
            self.label[i as usize] = UNLABELED;
            self.parent[i as usize] = NONE;
            self.source_bridge[i as usize] = NONE;
            self.target_bridge[i as usize] = NONE;
            self.in_tree[i as usize] = false;
        }

        for v in 0..self.n as u32 {
            if mate.is_unmatched(v) {
                self.label[v as usize] = EVEN;
                self.in_tree[v as usize] = true;
                self.tree_nodes.push(v);
                for &u in graph.neighbors(v) {
                    if Some(u) == mate.mate(v) {
                        continue;
                    }
                    let bu = self.find_base(u);
                    if self.label[bu as usize] == ODD {
                        continue;
                    }
                    if self.label[bu as usize] == UNLABELED {
                        self.level_queue[1].push((v, u));
                    } else if self.label[bu as usize] == EVEN {
                        self.level_queue[0].push((v, u));
                    }
                }
            }
        }

        let mut found_sap = false;

        while self.delta <= self.n {
            let d = self.delta;
            while let Some((mut z, mut u)) = self.level_queue[d].pop() {
                let mut bz = self.find_base(z);
                let mut bu = self.find_base(u);
                if self.label[bz as usize] != EVEN {
                    std::mem::swap(&mut z, &mut u);
                    std::mem::swap(&mut bz, &mut bu);
                }
                if bz == bu || self.label[bz as usize] != EVEN {
                    continue;
                }
                if Some(u) == mate.mate(z) || self.label[bu as usize] == ODD {
                    continue;
                }

                if self.label[bu as usize] == UNLABELED {
                    let mv = match mate.mate(u) {
                        Some(mv) => mv,
                        None => continue,
                    };
                    self.parent[u as usize] = z;
                    self.parent[mv as usize] = u;
                    self.label[u as usize] = ODD;
                    self.label[mv as usize] = EVEN;
                    self.in_tree[u as usize] = true;
                    self.in_tree[mv as usize] = true;
                    self.tree_nodes.push(u);
                    self.tree_nodes.push(mv);
                    let neighbors: Vec<u32> = graph.neighbors(mv).to_vec();
                    for w in neighbors {
                        if Some(w) == mate.mate(mv) {
                            continue;
                        }
                        let bw = self.find_base(w);
                        if self.label[bw as usize] == ODD {
                            continue;
                        }
                        if self.label[bw as usize] == UNLABELED {
                            self.level_queue[d + 1].push((mv, w));
                        } else if self.label[bw as usize] == EVEN {
                            self.level_queue[d].push((mv, w));
                        }
                    }
                } else if self.label[bu as usize] == EVEN {
                    match self.find_lca(z, u, mate) {
                        Some(lca) => {
                            self.shrink_path(graph, lca, z, u, mate, &mut dunions);
                            self.shrink_path(graph, lca, u, z, mate, &mut dunions);
                        }
                        None => found_sap = true,
                    }
                }
            }

            if found_sap {
                for &u in &self.tree_nodes.clone() {
                    self.mate_h[u as usize] = NONE;
                    let uh = self.find_dbase(u);
                    if let Some(mv) = mate.mate(u) {
                        if self.in_tree[mv as usize] {
                            let vh = self.find_dbase(mv);
                            if uh != vh {
                                self.mate_h[uh as usize] = vh;
                                self.mate_h[vh as usize] = uh;
                            }
                        }
                    }
                }
                for &u in &self.tree_nodes.clone() {
                    let uh = self.find_dbase(u);
                    let neighbors: Vec<u32> = graph.neighbors(u).to_vec();
                    for w in neighbors {
                        if !self.in_tree[w as usize] {
                            continue;
                        }
                        if mate.mate(u) == Some(w) {
                            continue;
                        }
                        let wh = self.find_dbase(w);
                        if uh == wh {
                            continue;
                        }
                        self.h_adj[uh as usize].push((u, w));
                    }
                }
                return true;
            }

            for (a, bb) in dunions.drain(..) {
                if a == bb {
                    self.make_rep_dbase(a);
                } else {
                    self.union_dbase(a, bb);
                }
            }
            self.delta += 1;
        }

        false
    }

    fn find_ap_hg(&mut self, root_vh: u32) -> Option<u32> {
        let mut stk: Vec<(u32, usize)> = vec![(root_vh, 0)];

        while let Some(&(vh, mut idx)) = stk.last() {
            let adj = self.h_adj[vh as usize].clone();
            let mut found_next = false;

            while idx < adj.len() {
                let (v, w) = adj[idx];
                idx += 1;

                let rep_w = self.rep[w as usize];
                let uh = self.find_db2(rep_w);
                let find_vh = self.find_db2(vh);
                if uh == find_vh {
                    continue;
                }
                if self.mate_h[vh as usize] == uh {
                    continue;
                }
                if self.label_h[uh as usize] == ODD {
                    continue;
                }

                if self.label_h[uh as usize] == UNLABELED {
                    let muh = self.mate_h[uh as usize];
                    if muh == NONE {
                        self.label_h[uh as usize] = ODD;
                        self.parent_h_src[uh as usize] = w;
                        self.parent_h_tgt[uh as usize] = v;
                        stk.last_mut().unwrap().1 = idx;
                        return Some(uh);
                    }
                    self.label_h[uh as usize] = ODD;
                    self.parent_h_src[uh as usize] = w;
                    self.parent_h_tgt[uh as usize] = v;
                    self.label_h[muh as usize] = EVEN;
                    self.even_time_h[muh as usize] = self.t_h;
                    self.t_h += 1;
                    stk.last_mut().unwrap().1 = idx;
                    stk.push((muh, 0));
                    found_next = true;
                    break;
                } else if self.label_h[uh as usize] == EVEN {
                    let bh = self.find_db2(vh);
                    let zh = self.find_db2(uh);
                    if self.even_time_h[bh as usize] < self.even_time_h[zh as usize] {
                        let mut endpoints = Vec::new();
                        let mut tmp = Vec::new();
                        let mut cur = zh;
                        while cur != bh {
                            endpoints.push(cur);
                            let mc = self.mate_h[cur as usize];
                            endpoints.push(mc);
                            tmp.push(mc);
                            let ps = self.parent_h_src[mc as usize];
                            let pt = self.parent_h_tgt[mc as usize];
                            let nxt = if self.rep[ps as usize] == mc {
                                self.rep[pt as usize]
                            } else {
                                self.rep[ps as usize]
                            };
                            cur = self.find_db2(nxt);
                        }
                        for nd in endpoints {
                            self.union_db2(nd, bh);
                        }
                        self.make_rep_db2(bh);
                        for &mc in &tmp {
                            self.bridge_h_src[mc as usize] = v;
                            self.bridge_h_tgt[mc as usize] = w;
                            self.dir_h[mc as usize] = -1;
                        }
                        stk.last_mut().unwrap().1 = idx;
                        for &t in tmp.iter().rev() {
                            stk.push((t, 0));
                        }
                        found_next = true;
                        break;
                    }
                }
            }

            if !found_next {
                stk.last_mut().unwrap().1 = idx;
                stk.pop();
            }
        }

        None
    }

    fn trace_h_path(&mut self, vh: u32, uh: u32, edges_out: &mut Vec<(u32, u32)>) {
        // frame: (cur, target, phase, src, tgt, left, right)
        let mut stk: Vec<[u32; 7]> = vec![[vh, uh, 0, 0, 0, 0, 0]];
        while let Some(&f) = stk.last() {
            let [cur, target, phase, src, tgt, left, right] = f;
            if cur == target {
                stk.pop();
                continue;
            }
            if self.label_h[cur as usize] == EVEN {
                let mvh = self.mate_h[cur as usize];
                let ps = self.parent_h_src[mvh as usize];
                let pt = self.parent_h_tgt[mvh as usize];
                edges_out.push((ps, pt));
                let nxt = if self.rep[ps as usize] == mvh {
                    self.rep[pt as usize]
                } else {
                    self.rep[ps as usize]
                };
                let top = stk.last_mut().unwrap();
                top[0] = nxt;
                continue;
            }
            if phase == 0 {
                let bs = self.bridge_h_src[cur as usize];
                let bt = self.bridge_h_tgt[cur as usize];
                let (l, r) = if self.dir_h[cur as usize] == 1 {
                    (self.rep[bs as usize], self.rep[bt as usize])
                } else {
                    (self.rep[bt as usize], self.rep[bs as usize])
                };
                let mt = if self.mate_h[cur as usize] != NONE {
                    self.rep[self.mate_h[cur as usize] as usize]
                } else {
                    cur
                };
                {
                    let top = stk.last_mut().unwrap();
                    top[2] = 1;
                    top[3] = bs;
                    top[4] = bt;
                    top[5] = l;
                    top[6] = r;
                }
                stk.push([l, mt, 0, 0, 0, 0, 0]);
                continue;
            }
            if phase == 1 {
                edges_out.push((src, tgt));
                let top = stk.last_mut().unwrap();
                top[2] = 2;
                stk.push([right, target, 0, 0, 0, 0, 0]);
                let _ = left;
                continue;
            }
            stk.pop();
        }
    }

    fn find_path_in_g(&mut self, v: u32, u: u32, pairs: &mut Vec<(u32, u32)>, mate: &Mate) {
        // frame: (cur, target, phase, src, tgt)
        let mut stk: Vec<[u32; 5]> = vec![[v, u, 0, 0, 0]];
        while let Some(&f) = stk.last() {
            let [cur, target, phase, src, tgt] = f;
            if cur == target {
                stk.pop();
                continue;
            }
            if phase == 0 {
                if self.label[cur as usize] == EVEN {
                    let mv = mate.mate(cur).unwrap_or(NONE);
                    let pmv = self.parent[mv as usize];
                    pairs.push((mv, pmv));
                    let top = stk.last_mut().unwrap();
                    top[0] = pmv;
                    continue;
                }
                let s = self.source_bridge[cur as usize];
                let t = self.target_bridge[cur as usize];
                let mcur = mate.mate(cur).unwrap_or(NONE);
                {
                    let top = stk.last_mut().unwrap();
                    top[2] = 1;
                    top[3] = s;
                    top[4] = t;
                }
                stk.push([s, mcur, 0, 0, 0]);
                continue;
            }
            if phase == 1 {
                pairs.push((src, tgt));
                let top = stk.last_mut().unwrap();
                top[2] = 2;
                stk.push([tgt, target, 0, 0, 0]);
                continue;
            }
            stk.pop();
        }
    }

    fn augment_g(&mut self, h_edges: &[(u32, u32)], mate: &mut Mate) {
        let mut pairs = Vec::new();
        for &(u, v) in h_edges {
            pairs.push((u, v));
            let ru = self.rep[u as usize];
            let rv = self.rep[v as usize];
            self.find_path_in_g(u, ru, &mut pairs, mate);
            self.find_path_in_g(v, rv, &mut pairs, mate);
        }
        for (a, b) in pairs {
            mate.set_pair(a, b);
        }
    }

    fn phase_2(&mut self, mate: &mut Mate) {
        for &v in &self.tree_nodes.clone() {
            self.rep[v as usize] = self.find_dbase(v);
            self.label_h[v as usize] = UNLABELED;
            self.parent_h_src[v as usize] = NONE;
            self.parent_h_tgt[v as usize] = NONE;
            self.bridge_h_src[v as usize] = NONE;
            self.bridge_h_tgt[v as usize] = NONE;
            self.dir_h[v as usize] = 0;
            self.even_time_h[v as usize] = 0;
            self.db2_par[v as usize] = v;
        }
        self.t_h = 0;

        let mut all_paths: Vec<Vec<(u32, u32)>> = Vec::new();
        for &vh in &self.tree_nodes.clone() {
            if vh != self.rep[vh as usize] {
                continue;
            }
            if self.label_h[vh as usize] != UNLABELED || self.mate_h[vh as usize] != NONE {
                continue;
            }
            self.label_h[vh as usize] = EVEN;
            self.even_time_h[vh as usize] = self.t_h;
            self.t_h += 1;

            if let Some(free_node) = self.find_ap_hg(vh) {
                let mut h_nm = Vec::new();
                let ps = self.parent_h_src[free_node as usize];
                let pt = self.parent_h_tgt[free_node as usize];
                h_nm.push((ps, pt));
                let nxt = if self.rep[ps as usize] == free_node {
                    self.rep[pt as usize]
                } else {
                    self.rep[ps as usize]
                };
                self.trace_h_path(nxt, vh, &mut h_nm);
                all_paths.push(h_nm);
            }
        }

        for he in &all_paths {
            self.augment_g(he, mate);
        }

        for &v in &self.tree_nodes.clone() {
            let db = self.find_dbase(v);
            self.h_adj[db as usize].clear();
            self.h_adj[v as usize].clear();
            self.mate_h[v as usize] = NONE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let g = Graph::new(0, vec![]);
        let m = GabowScaling::new().maximum_matching(&g, None);
        assert!(m.is_empty());
    }

    #[test]
    fn single_edge() {
        let g = Graph::new(2, vec![(0, 1)]);
        let m = GabowScaling::new().maximum_matching(&g, None);
        assert_eq!(m.edges().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn odd_triangle_matches_one_edge() {
        let g = Graph::new(3, vec![(0, 1), (1, 2), (2, 0)]);
        let m = GabowScaling::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn c5_matches_two_edges() {
        let g = Graph::new(5, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let m = GabowScaling::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn c6_with_chord_matches_three_edges() {
        let g = Graph::new(6, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)]);
        let m = GabowScaling::new().maximum_matching(&g, None);
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
        let m = GabowScaling::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 5);
    }
}
