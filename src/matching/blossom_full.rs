//! General-graph maximum matching via Edmonds' Blossom algorithm with
//! explicit nested blossom records (the NetworkX-style formulation).
//! O(V^2 E).
//!
//! Unlike [`super::blossom_simple`]'s virtual union-find contraction, every
//! non-trivial blossom here gets its own id (`>= n`) and record: an
//! ordered cycle of child sub-blossom ids (`childs`) and the G-edges that
//! connect consecutive children (`edges`, with `edges[0]` the discovery
//! bridge). This lets path reconstruction walk *through* a contracted
//! blossom correctly (`augment_blossom`), and lets a blossom be re-expanded
//! mid-search when it turns out to sit on the augmenting path
//! (`expand_blossom`'s mid-stage branch), not just torn down wholesale
//! between searches (its end-stage branch).

use crate::graph::Graph;
use crate::mate::{Mate, Matching};
use crate::matching::MatchingEngine;

const NONE: u32 = u32::MAX;
const UNLABELED: u8 = 0;
const S: u8 = 1;
const T: u8 = 2;
const BREADCRUMB: u8 = 5;

fn pymod(a: i64, k: i64) -> usize {
    (((a % k) + k) % k) as usize
}

#[derive(Debug, Default, Clone)]
struct Blos {
    childs: Vec<u32>,
    edges: Vec<(u32, u32)>,
}

/// The nested-blossom-record engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlossomFull;

impl BlossomFull {
    pub fn new() -> Self {
        BlossomFull
    }
}

impl MatchingEngine for BlossomFull {
    fn name(&self) -> &'static str {
        "blossom_full"
    }

    fn maximum_matching(&self, graph: &Graph, initial: Option<Matching>) -> Matching {
        let n = graph.n();
        let mut mate = Mate::new(n);
        if let Some(m) = initial {
            for (u, v) in m.edges() {
                mate.set_pair(u, v);
            }
        }

        log::debug!("blossom_full: starting on {n} vertices, {} edges", graph.m());
        let mut solver = Solver::new(n);
        solver.solve(graph, &mut mate);

        log::debug!("blossom_full: done, matching size {}", mate.len());
        Matching::from_mate(&mate)
    }
}

struct Solver {
    n: usize,
    blos: Vec<Blos>,
    nblos: u32,
    inblossom: Vec<u32>,
    blossomparent: Vec<u32>,
    blossombase: Vec<u32>,
    label: Vec<u8>,
    labeledge: Vec<(u32, u32)>,
    queue: Vec<u32>,
}

impl Solver {
    fn new(n: usize) -> Self {
        Solver {
            n,
            blos: vec![Blos::default(); n],
            nblos: n as u32,
            inblossom: (0..n as u32).collect(),
            blossomparent: vec![NONE; n],
            blossombase: (0..n as u32).collect(),
            label: vec![UNLABELED; n],
            labeledge: vec![(NONE, NONE); n],
            queue: Vec::new(),
        }
    }

    fn is_blossom(&self, b: u32) -> bool {
        b as usize >= self.n
    }

    fn ensure(&mut self, b: u32) {
        let need = b as usize + 1;
        if need > self.label.len() {
            self.label.resize(need, UNLABELED);
            self.labeledge.resize(need, (NONE, NONE));
        }
        if need > self.blossomparent.len() {
            self.blossomparent.resize(need, NONE);
        }
        if need > self.blossombase.len() {
            self.blossombase.resize(need, NONE);
        }
    }

    fn leaves(&self, b: u32) -> Vec<u32> {
        if !self.is_blossom(b) {
            return vec![b];
        }
        let mut result = Vec::new();
        let mut stack = vec![b];
        while let Some(x) = stack.pop() {
            if !self.is_blossom(x) {
                result.push(x);
            } else {
                for &c in &self.blos[x as usize].childs {
                    stack.push(c);
                }
            }
        }
        result
    }

    fn reset_blossoms(&mut self) {
        let n = self.n;
        self.nblos = n as u32;
        self.blos.truncate(n);
        for i in 0..n {
            self.inblossom[i] = i as u32;
            self.blossombase[i] = i as u32;
            self.blossomparent[i] = NONE;
        }
        self.label = vec![UNLABELED; n];
        self.labeledge = vec![(NONE, NONE); n];
        self.queue.clear();
    }

    fn assign_label(&mut self, w: u32, t: u8, v: u32, mate: &Mate) {
        let b = self.inblossom[w as usize];
        self.ensure(b);
        self.label[b as usize] = t;
        self.label[w as usize] = t;
        if v != NONE {
            self.labeledge[w as usize] = (v, w);
            self.labeledge[b as usize] = (v, w);
        } else {
            self.labeledge[w as usize] = (NONE, NONE);
            self.labeledge[b as usize] = (NONE, NONE);
        }
        if t == S {
            for u in self.leaves(b) {
                self.queue.push(u);
            }
        } else if t == T {
            let base = self.blossombase[b as usize];
            let mate_base = mate.mate(base).expect("T-blossom base must be matched");
            self.assign_label(mate_base, S, base, mate);
        }
    }

    fn scan_blossom(&mut self, v: u32, w: u32) -> Option<u32> {
        // v/w here are "vertex or NIL(-1)" sentinels distinct from the
        // blossom-id NONE sentinel (u32::MAX) used elsewhere: -1 mirrors
        // the Python algorithm's NIL exactly, including its root-reached
        // termination check.
        const NIL: i64 = -1;
        const DONE: i64 = -2;

        let to_nil = |x: u32| -> i64 {
            if x == NONE {
                NIL
            } else {
                x as i64
            }
        };

        let mut path = Vec::new();
        let mut base = None;
        let mut v: i64 = v as i64;
        let mut w: i64 = w as i64;
        while v != DONE || w != DONE {
            if v != DONE {
                let b = self.inblossom[v as usize];
                if self.label[b as usize] == BREADCRUMB {
                    base = Some(self.blossombase[b as usize]);
                    break;
                }
                path.push(b);
                self.label[b as usize] = BREADCRUMB;
                let le = self.labeledge[b as usize];
                if le.0 == NONE {
                    v = DONE;
                } else {
                    let bt = self.inblossom[le.0 as usize];
                    v = to_nil(self.labeledge[bt as usize].0);
                    // bt is reached by construction only when it still has
                    // a live tree edge; guard the (never-hit in practice)
                    // case where it's actually the root to avoid indexing
                    // with a negative sentinel.
                    if v == NIL {
                        v = DONE;
                    }
                }
                if w != DONE {
                    std::mem::swap(&mut v, &mut w);
                }
            } else {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b as usize] = S;
        }
        base
    }

    fn add_blossom(&mut self, base: u32, v: u32, w: u32) {
        let bb = self.inblossom[base as usize];
        let bv = self.inblossom[v as usize];
        let bw = self.inblossom[w as usize];

        let bid = self.nblos;
        self.nblos += 1;
        if (bid as usize) >= self.blos.len() {
            self.blos.push(Blos::default());
        } else {
            self.blos[bid as usize] = Blos::default();
        }
        self.ensure(bid);
        self.blossombase[bid as usize] = base;
        self.blossomparent[bid as usize] = NONE;
        self.blossomparent[bb as usize] = bid;

        self.blos[bid as usize].edges.push((v, w));

        let mut cv = v;
        let mut bcv = bv;
        while bcv != bb {
            self.blossomparent[bcv as usize] = bid;
            self.blos[bid as usize].childs.push(bcv);
            self.blos[bid as usize]
                .edges
                .push(self.labeledge[bcv as usize]);
            cv = self.labeledge[bcv as usize].0;
            bcv = self.inblossom[cv as usize];
        }
        let _ = cv;
        self.blos[bid as usize].childs.push(bb);
        self.blos[bid as usize].childs.reverse();
        self.blos[bid as usize].edges.reverse();

        let mut cw = w;
        let mut bcw = bw;
        while bcw != bb {
            self.blossomparent[bcw as usize] = bid;
            self.blos[bid as usize].childs.push(bcw);
            let le = self.labeledge[bcw as usize];
            self.blos[bid as usize].edges.push((le.1, le.0));
            cw = self.labeledge[bcw as usize].0;
            bcw = self.inblossom[cw as usize];
        }
        let _ = cw;

        self.label[bid as usize] = S;
        self.labeledge[bid as usize] = self.labeledge[bb as usize];

        for u in self.leaves(bid) {
            if self.label[self.inblossom[u as usize] as usize] == T {
                self.queue.push(u);
            }
            self.inblossom[u as usize] = bid;
        }
    }

    fn expand_blossom(&mut self, b: u32, endstage: bool, mate: &Mate) {
        let mut stack: Vec<(u32, bool, usize)> = vec![(b, endstage, 0)];

        while let Some(&(fb, fend, fidx)) = stack.last() {
            let childs_len = self.blos[fb as usize].childs.len();

            if fidx < childs_len {
                let s = self.blos[fb as usize].childs[fidx];
                let top = stack.last_mut().unwrap();
                top.2 = fidx + 1;
                self.blossomparent[s as usize] = NONE;
                if self.is_blossom(s) {
                    if fend {
                        stack.push((s, true, 0));
                        continue;
                    } else {
                        for u in self.leaves(s) {
                            self.inblossom[u as usize] = s;
                        }
                    }
                } else {
                    self.inblossom[s as usize] = s;
                }
            } else {
                if !fend && self.label[fb as usize] == T {
                    self.expand_blossom_midstage(fb, mate);
                }
                self.label[fb as usize] = UNLABELED;
                self.blos[fb as usize].childs.clear();
                self.blos[fb as usize].edges.clear();
                stack.pop();
            }
        }
    }

    fn expand_blossom_midstage(&mut self, fb: u32, mate: &Mate) {
        let k = self.blos[fb as usize].childs.len() as i64;
        if k == 0 {
            return;
        }
        let entrychild = self.inblossom[self.labeledge[fb as usize].1 as usize];
        let mut j_raw: i64 = 0;
        while j_raw < k {
            if self.blos[fb as usize].childs[j_raw as usize] == entrychild {
                break;
            }
            j_raw += 1;
        }
        let mut j: i64;
        let jstep: i64;
        if j_raw & 1 == 1 {
            j = j_raw - k;
            jstep = 1;
        } else {
            j = j_raw;
            jstep = -1;
        }

        let mut lv = self.labeledge[fb as usize].0;
        let mut lw = self.labeledge[fb as usize].1;

        while j != 0 {
            let (pp, qq);
            if jstep == 1 {
                let e = self.blos[fb as usize].edges[pymod(j, k)];
                pp = e.0;
                qq = e.1;
            } else {
                let e = self.blos[fb as usize].edges[pymod(j - 1, k)];
                qq = e.0;
                pp = e.1;
            }
            let _ = pp;
            self.label[lw as usize] = UNLABELED;
            self.label[qq as usize] = UNLABELED;
            self.assign_label(lw, T, lv, mate);
            j += jstep;
            if jstep == 1 {
                let e = self.blos[fb as usize].edges[pymod(j, k)];
                lv = e.0;
                lw = e.1;
            } else {
                let e = self.blos[fb as usize].edges[pymod(j - 1, k)];
                lw = e.0;
                lv = e.1;
            }
            j += jstep;
        }

        let bwi = self.blos[fb as usize].childs[pymod(j, k)];
        self.ensure(bwi);
        self.label[lw as usize] = T;
        self.label[bwi as usize] = T;
        self.labeledge[lw as usize] = (lv, lw);
        self.labeledge[bwi as usize] = (lv, lw);
        j += jstep;

        while self.blos[fb as usize].childs[pymod(j, k)] != entrychild {
            let bvi = self.blos[fb as usize].childs[pymod(j, k)];
            self.ensure(bvi);
            if self.label[bvi as usize] == S {
                j += jstep;
                continue;
            }
            let mut found_v = NONE;
            if self.is_blossom(bvi) {
                for u in self.leaves(bvi) {
                    if self.label[u as usize] != UNLABELED {
                        found_v = u;
                        break;
                    }
                }
            } else {
                found_v = bvi;
            }
            if found_v != NONE && self.label[found_v as usize] != UNLABELED {
                self.label[found_v as usize] = UNLABELED;
                let base = self.blossombase[bvi as usize];
                if let Some(m) = mate.mate(base) {
                    self.label[m as usize] = UNLABELED;
                }
                let src = self.labeledge[found_v as usize].0;
                self.assign_label(found_v, T, src, mate);
            }
            j += jstep;
        }
    }

    fn augment_blossom(&mut self, b: u32, v: u32, mate: &mut Mate) {
        // Frame: (b, v, phase, i, j, jstep)
        let mut stack: Vec<[i64; 6]> = vec![[b as i64, v as i64, 0, 0, 0, 0]];

        while let Some(&f) = stack.last() {
            let [fb, fv, fphase, fi, fj, fjstep] = f;
            let fb_u = fb as u32;
            let k = self.blos[fb_u as usize].childs.len() as i64;

            match fphase {
                0 => {
                    let mut t = fv as u32;
                    while self.blossomparent[t as usize] != fb_u {
                        t = self.blossomparent[t as usize];
                    }
                    let mut i: i64 = 0;
                    while i < k {
                        if self.blos[fb_u as usize].childs[i as usize] == t {
                            break;
                        }
                        i += 1;
                    }
                    if self.is_blossom(t) {
                        let top = stack.last_mut().unwrap();
                        top[2] = 1;
                        top[3] = i;
                        stack.push([t as i64, fv, 0, 0, 0, 0]);
                    } else {
                        let (j, jstep) = if i & 1 == 1 {
                            (i - k, 1)
                        } else {
                            (i, -1)
                        };
                        let top = stack.last_mut().unwrap();
                        *top = [fb, fv, 2, i, j, jstep];
                    }
                }
                1 => {
                    let (j, jstep) = if fi & 1 == 1 {
                        (fi - k, 1)
                    } else {
                        (fi, -1)
                    };
                    let top = stack.last_mut().unwrap();
                    *top = [fb, fv, 2, fi, j, jstep];
                }
                2 => {
                    if fj == 0 {
                        if fi > 0 {
                            let i = fi as usize;
                            let bl = &mut self.blos[fb_u as usize];
                            bl.childs.rotate_left(i);
                            bl.edges.rotate_left(i);
                        }
                        self.blossombase[fb_u as usize] = fv as u32;
                        stack.pop();
                        continue;
                    }
                    let j = fj + fjstep;
                    let idx1 = pymod(j, k);
                    let c1 = self.blos[fb_u as usize].childs[idx1];
                    let ww;
                    if fjstep == 1 {
                        let e = self.blos[fb_u as usize].edges[idx1];
                        ww = e.0;
                    } else {
                        let e = self.blos[fb_u as usize].edges[pymod(j - 1, k)];
                        ww = e.1;
                    }
                    if self.is_blossom(c1) {
                        let top = stack.last_mut().unwrap();
                        *top = [fb, fv, 3, fi, j, fjstep];
                        stack.push([c1 as i64, ww as i64, 0, 0, 0, 0]);
                    } else {
                        let top = stack.last_mut().unwrap();
                        *top = [fb, fv, 3, fi, j, fjstep];
                    }
                }
                3 => {
                    let idx1 = pymod(fj, k);
                    let xx;
                    if fjstep == 1 {
                        let e = self.blos[fb_u as usize].edges[idx1];
                        xx = e.1;
                    } else {
                        let e = self.blos[fb_u as usize].edges[pymod(fj - 1, k)];
                        xx = e.0;
                    }
                    let j2 = fj + fjstep;
                    let idx2 = pymod(j2, k);
                    let c2 = self.blos[fb_u as usize].childs[idx2];
                    if self.is_blossom(c2) {
                        let top = stack.last_mut().unwrap();
                        *top = [fb, fv, 4, fi, j2, fjstep];
                        stack.push([c2 as i64, xx as i64, 0, 0, 0, 0]);
                    } else {
                        let top = stack.last_mut().unwrap();
                        *top = [fb, fv, 4, fi, j2, fjstep];
                    }
                }
                4 => {
                    let prev_j = fj - fjstep;
                    let idx1 = pymod(prev_j, k);
                    let (ww, xx);
                    if fjstep == 1 {
                        let e = self.blos[fb_u as usize].edges[idx1];
                        ww = e.0;
                        xx = e.1;
                    } else {
                        let e = self.blos[fb_u as usize].edges[pymod(prev_j - 1, k)];
                        xx = e.0;
                        ww = e.1;
                    }
                    mate.set_pair(ww, xx);
                    let top = stack.last_mut().unwrap();
                    *top = [fb, fv, 2, fi, fj, fjstep];
                }
                _ => unreachable!(),
            }
        }
    }

    fn augment_path(&mut self, v: u32, w: u32, mate: &mut Mate) {
        let mut s = v;
        let mut j = w;
        loop {
            let bs = self.inblossom[s as usize];
            if self.is_blossom(bs) {
                self.augment_blossom(bs, s, mate);
            }
            mate.set_pair(s, j);
            let le = self.labeledge[bs as usize];
            if le.0 == NONE {
                break;
            }
            let t = le.0;
            let bt = self.inblossom[t as usize];
            let le2 = self.labeledge[bt as usize];
            s = le2.0;
            j = le2.1;
            if self.is_blossom(bt) {
                self.augment_blossom(bt, j, mate);
            }
            mate.set_pair(j, s);
        }
        mate.set_pair(w, v);
    }

    fn solve(&mut self, graph: &Graph, mate: &mut Mate) {
        let n = self.n;
        let mut improved = true;
        while improved {
            improved = false;
            for root in 0..n as u32 {
                if mate.is_matched(root) {
                    continue;
                }

                self.reset_blossoms();
                self.assign_label(root, S, NONE, mate);

                let mut augmented = false;
                while !self.queue.is_empty() && !augmented {
                    let v = self.queue.pop().unwrap();
                    if self.label[self.inblossom[v as usize] as usize] != S {
                        continue;
                    }
                    let neighbors: Vec<u32> = graph.neighbors(v).to_vec();
                    for w in neighbors {
                        let bv = self.inblossom[v as usize];
                        let bw = self.inblossom[w as usize];
                        if bv == bw {
                            continue;
                        }
                        self.ensure(bw);
                        if self.label[bw as usize] == UNLABELED {
                            if mate.is_unmatched(w) {
                                self.augment_path(v, w, mate);
                                augmented = true;
                                break;
                            }
                            self.assign_label(w, T, v, mate);
                        } else if self.label[bw as usize] == S {
                            if let Some(base) = self.scan_blossom(v, w) {
                                log::trace!("blossom_full: contracting blossom at base {base}");
                                self.add_blossom(base, v, w);
                            }
                        }
                    }
                }

                for b in n as u32..self.nblos {
                    if (b as usize) < self.blos.len()
                        && !self.blos[b as usize].childs.is_empty()
                        && self.blossomparent[b as usize] == NONE
                    {
                        self.expand_blossom(b, true, mate);
                    }
                }

                if augmented {
                    improved = true;
                    break;
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
        let m = BlossomFull::new().maximum_matching(&g, None);
        assert!(m.is_empty());
    }

    #[test]
    fn single_edge() {
        let g = Graph::new(2, vec![(0, 1)]);
        let m = BlossomFull::new().maximum_matching(&g, None);
        assert_eq!(m.edges().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn odd_triangle_matches_one_edge() {
        let g = Graph::new(3, vec![(0, 1), (1, 2), (2, 0)]);
        let m = BlossomFull::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn c5_matches_two_edges() {
        let g = Graph::new(5, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let m = BlossomFull::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn nested_blossom_case() {
        // Two triangles sharing structure via a bridge, forcing a blossom
        // whose expansion relabels interior T-vertices mid-search.
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
        let m = BlossomFull::new().maximum_matching(&g, None);
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
        let m = BlossomFull::new().maximum_matching(&g, None);
        assert_eq!(m.len(), 5);
    }
}
