//! Shared argument parsing and report formatting for the per-engine
//! binaries under `src/bin/`, so all seven stay textually consistent.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use crate::error::GraphIoError;
use crate::graph::Graph;
use crate::greedy::{greedy_matching, GreedyStrategy};
use crate::io::edge_list::read_edge_list;
use crate::mate::Matching;
use crate::validate::validate;

/// Common CLI surface: `<engine> <filename> [--greedy | --greedy-md]`.
#[derive(Debug, Parser)]
pub struct Args {
    /// Path to an edge-list file (see `io::edge_list`).
    pub filename: PathBuf,

    /// Seed the search with a first-fit greedy matching.
    #[arg(long, conflicts_with = "greedy_md")]
    pub greedy: bool,

    /// Seed the search with a min-degree greedy matching.
    #[arg(long = "greedy-md")]
    pub greedy_md: bool,
}

impl Args {
    /// The greedy strategy requested, if any.
    pub fn greedy_strategy(&self) -> Option<GreedyStrategy> {
        if self.greedy_md {
            Some(GreedyStrategy::MinDegree)
        } else if self.greedy {
            Some(GreedyStrategy::FirstFit)
        } else {
            None
        }
    }
}

/// Loads the graph named by `args.filename`, printing a single stderr line
/// and exiting with status 1 on any I/O or parse error.
pub fn load_graph(args: &Args) -> Graph {
    match read_edge_list(&args.filename) {
        Ok(file) => file.into_graph(),
        Err(err) => fail(&err),
    }
}

fn fail(err: &GraphIoError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}

/// Runs `engine_name`'s banner/report lifecycle around `search`: prints the
/// graph size banner, optionally seeds a greedy matching, times `search`,
/// validates its output, and prints the final report lines required by
/// every binary.
pub fn run(engine_name: &str, args: &Args, search: impl FnOnce(&Graph, Option<Matching>) -> Matching) {
    let graph = load_graph(args);
    println!("{engine_name}");
    println!("Graph: {} vertices, {} edges", graph.n(), graph.m());

    let initial = args.greedy_strategy().map(|strategy| {
        let seeded = greedy_matching(&graph, strategy);
        Matching::from_mate(&seeded)
    });

    let start = Instant::now();
    let matching = search(&graph, initial);
    let elapsed = start.elapsed();

    let edges: Vec<(u32, u32)> = matching.edges().collect();
    let report = validate(&graph, &edges);
    if report.is_valid() {
        println!("Validation: OK");
    } else {
        println!("Validation: FAILED");
        for err in &report.errors {
            println!("  {err}");
        }
    }

    println!("Matching size: {}", matching.len());
    println!("Elapsed: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
}
