use clap::Parser;
use maxmatch::cli::{self, Args};
use maxmatch::matching::gabow_scaling::GabowScaling;
use maxmatch::matching::MatchingEngine;

fn main() {
    env_logger::init();
    let args = Args::parse();
    let engine = GabowScaling::new();
    cli::run(engine.name(), &args, |graph, initial| {
        engine.maximum_matching(graph, initial)
    });
}
