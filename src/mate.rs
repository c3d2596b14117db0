//! The mate store: the only mutable state that persists across searches.

/// Sentinel meaning "unmatched".
const NONE: u32 = u32::MAX;

/// A mutable vertex-to-vertex mate mapping, kept symmetric.
#[derive(Debug, Clone)]
pub struct Mate {
    mate: Vec<u32>,
}

impl Mate {
    /// Creates an all-unmatched mate store over `n` vertices.
    pub fn new(n: usize) -> Self {
        Mate {
            mate: vec![NONE; n],
        }
    }

    pub fn n(&self) -> usize {
        self.mate.len()
    }

    /// The current mate of `v`, or `None` if unmatched.
    pub fn mate(&self, v: u32) -> Option<u32> {
        let m = self.mate[v as usize];
        if m == NONE {
            None
        } else {
            Some(m)
        }
    }

    pub fn is_matched(&self, v: u32) -> bool {
        self.mate[v as usize] != NONE
    }

    pub fn is_unmatched(&self, v: u32) -> bool {
        !self.is_matched(v)
    }

    /// Matches `u` and `v` to each other, symmetrically.
    pub fn set_pair(&mut self, u: u32, v: u32) {
        self.mate[u as usize] = v;
        self.mate[v as usize] = u;
    }

    /// Unmatches `v` and whatever it was paired with.
    pub fn clear(&mut self, v: u32) {
        if let Some(w) = self.mate(v) {
            self.mate[w as usize] = NONE;
        }
        self.mate[v as usize] = NONE;
    }

    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        self.mate.iter().filter(|&&m| m != NONE).count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emits the matching as a sorted list of `(u, v)` with `u < v`.
    pub fn emit(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::with_capacity(self.len());
        for (u, &m) in self.mate.iter().enumerate() {
            if m == NONE {
                continue;
            }
            let u = u as u32;
            if u < m {
                out.push((u, m));
            }
        }
        out.sort_unstable();
        out
    }
}

/// The final result of a matching engine: a graph-agnostic view over the
/// matched edges and matched vertices, mirroring the teacher's
/// `MatchedEdges`/`MatchedNodes` iterator pair.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Matching {
    pairs: Vec<(u32, u32)>,
}

impl Matching {
    pub fn from_mate(mate: &Mate) -> Self {
        Matching {
            pairs: mate.emit(),
        }
    }

    pub fn from_pairs(mut pairs: Vec<(u32, u32)>) -> Self {
        pairs.sort_unstable();
        Matching { pairs }
    }

    /// Number of matched edges.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The matched edges, as `(u, v)` with `u < v`, in sorted order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.pairs.iter().copied()
    }

    /// The matched vertices, each appearing once.
    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.pairs.iter().flat_map(|&(u, v)| [u, v])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pair_is_symmetric() {
        let mut m = Mate::new(4);
        m.set_pair(0, 1);
        assert_eq!(m.mate(0), Some(1));
        assert_eq!(m.mate(1), Some(0));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn clear_unmatches_both_sides() {
        let mut m = Mate::new(2);
        m.set_pair(0, 1);
        m.clear(0);
        assert_eq!(m.mate(0), None);
        assert_eq!(m.mate(1), None);
    }

    #[test]
    fn emit_sorted_with_u_lt_v() {
        let mut m = Mate::new(4);
        m.set_pair(3, 1);
        m.set_pair(0, 2);
        assert_eq!(m.emit(), vec![(0, 2), (1, 3)]);
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn matching_round_trips_through_json() {
        let mut mate = Mate::new(4);
        mate.set_pair(0, 2);
        mate.set_pair(1, 3);
        let original = Matching::from_mate(&mate);

        let json = serde_json::to_string(&original).unwrap();
        let restored: Matching = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.edges().collect::<Vec<_>>(), original.edges().collect::<Vec<_>>());
    }
}
