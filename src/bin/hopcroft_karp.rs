//! Hopcroft-Karp is the only bipartite engine, so it reads the `L R M`
//! edge-list header and validates/reports over a [`BipartiteGraph`] instead
//! of sharing `cli::run`, which is wired for the general-graph engines.

use std::time::Instant;

use clap::Parser;
use maxmatch::cli::Args;
use maxmatch::graph::BipartiteGraph;
use maxmatch::io::edge_list::read_bipartite_edge_list;
use maxmatch::matching::hopcroft_karp::HopcroftKarp;

fn main() {
    env_logger::init();
    let args = Args::parse();
    let file = match read_bipartite_edge_list(&args.filename) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let graph = file.into_graph();

    println!("hopcroft_karp");
    println!(
        "Graph: {} left, {} right vertices, {} edges",
        graph.l(),
        graph.r(),
        graph.m()
    );

    let engine = HopcroftKarp::new();
    let start = Instant::now();
    let matching = engine.maximum_matching(&graph);
    let elapsed = start.elapsed();

    let report = validate_bipartite(&graph, &matching);
    if report.is_empty() {
        println!("Validation: OK");
    } else {
        println!("Validation: FAILED");
        for err in &report {
            println!("  {err}");
        }
    }

    println!("Matching size: {}", matching.len());
    println!("Elapsed: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
}

/// Same checks as `validate::validate`, adapted to bipartite (left, right)
/// index spaces instead of a single shared vertex space.
fn validate_bipartite(graph: &BipartiteGraph, matching: &[(u32, u32)]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut left_degree = vec![0u32; graph.l()];
    let mut right_degree = vec![0u32; graph.r()];

    for &(u, v) in matching {
        if !graph.has_edge(u, v) {
            errors.push(format!(
                "edge ({u}, {v}) is in the matching but not in the graph"
            ));
        }
        if (u as usize) < left_degree.len() {
            left_degree[u as usize] += 1;
        }
        if (v as usize) < right_degree.len() {
            right_degree[v as usize] += 1;
        }
    }

    for (v, &d) in left_degree.iter().enumerate() {
        if d > 1 {
            errors.push(format!("left vertex {v} appears in {d} matched edges"));
        }
    }
    for (v, &d) in right_degree.iter().enumerate() {
        if d > 1 {
            errors.push(format!("right vertex {v} appears in {d} matched edges"));
        }
    }

    errors
}
