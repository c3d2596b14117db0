//! The five matching engines, plus the shared [`MatchingEngine`] trait that
//! lets CLI and benchmark code be generic over "which engine".

pub mod blossom_full;
pub mod blossom_simple;
pub mod gabow_scaling;
pub mod gabow_simple;
pub mod hopcroft_karp;
pub mod micali_vazirani;

use crate::graph::Graph;
use crate::mate::Matching;

/// A general-graph maximum-cardinality matching algorithm.
pub trait MatchingEngine {
    /// Human-readable engine name, used by the CLI banners.
    fn name(&self) -> &'static str;

    /// Computes a maximum matching of `graph`, optionally starting from a
    /// pre-seeded `initial` matching (e.g. from [`crate::greedy`]).
    fn maximum_matching(&self, graph: &Graph, initial: Option<Matching>) -> Matching;
}
