//! Converts a SuiteSparse Matrix Market file to the plain edge-list format
//! the other binaries read, optionally writing to a file instead of stdout.

use std::path::PathBuf;

use clap::Parser;
use maxmatch::io::matrix_market::{read_matrix_market, to_edge_list_text};

/// `mtx_to_edgelist <input.mtx> [output.txt]`
#[derive(Debug, Parser)]
struct Args {
    /// Path to the `.mtx` input file.
    input: PathBuf,

    /// Path to write the edge-list text to; stdout if omitted.
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    let graph = match read_matrix_market(&args.input) {
        Ok(g) => g,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let text = to_edge_list_text(&graph);
    match args.output {
        Some(path) => {
            if let Err(err) = std::fs::write(&path, text) {
                eprintln!("error: could not write {}: {err}", path.display());
                std::process::exit(1);
            }
        }
        None => print!("{text}"),
    }
}
