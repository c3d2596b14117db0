//! Union-by-rank, path-compressing disjoint-set structure.
//!
//! Used by the virtual-contraction engines (`blossom_simple`) and as the two
//! nested union-find layers in `gabow_scaling` (`dbase`/`db2`).

/// A disjoint-set forest over `0..n`, reset by overwriting rather than
/// reallocating between searches.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
        }
    }

    /// Resets every element to its own singleton set, in place.
    pub fn reset(&mut self) {
        for (i, p) in self.parent.iter_mut().enumerate() {
            *p = i as u32;
        }
        self.rank.iter_mut().for_each(|r| *r = 0);
    }

    /// Finds the representative of `x`'s set, compressing the path walked.
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Finds the representative of `x`'s set without mutating `self`.
    pub fn find_immutable(&self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        root
    }

    /// Unions the sets containing `a` and `b`; returns the new
    /// representative.
    pub fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => {
                self.parent[ra as usize] = rb;
                rb
            }
            std::cmp::Ordering::Greater => {
                self.parent[rb as usize] = ra;
                ra
            }
            std::cmp::Ordering::Equal => {
                self.parent[rb as usize] = ra;
                self.rank[ra as usize] += 1;
                ra
            }
        }
    }

    /// Unions the sets containing `a` and `b`, forcing `base` to be the
    /// resulting representative regardless of rank. Used by the matching
    /// engines, where the blossom base must remain the representative.
    pub fn union_to(&mut self, a: u32, b: u32, base: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != base {
            self.parent[ra as usize] = base;
        }
        if rb != base {
            self.parent[rb as usize] = base;
        }
        self.parent[base as usize] = base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_sets_initially() {
        let mut uf = UnionFind::new(5);
        for i in 0..5 {
            assert_eq!(uf.find(i), i);
        }
    }

    #[test]
    fn union_merges_sets() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        uf.union(1, 2);
        assert_eq!(uf.find(0), uf.find(2));
        assert_ne!(uf.find(0), uf.find(3));
    }

    #[test]
    fn union_to_forces_representative() {
        let mut uf = UnionFind::new(4);
        uf.union_to(0, 1, 2);
        assert_eq!(uf.find(0), 2);
        assert_eq!(uf.find(1), 2);
        assert_eq!(uf.find(2), 2);
    }

    #[test]
    fn reset_restores_singletons() {
        let mut uf = UnionFind::new(3);
        uf.union(0, 1);
        uf.reset();
        assert_eq!(uf.find(0), 0);
        assert_eq!(uf.find(1), 1);
    }
}
