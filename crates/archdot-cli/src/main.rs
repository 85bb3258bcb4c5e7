//! Archdot CLI - Generate architecture diagrams and render them via Graphviz

mod cli;
mod gallery;

use archdot::core::logging::init_logging;
use clap::Parser;

fn main() {
    // Parse CLI args first to get logging configuration
    let cli_args = cli::Cli::parse();

    // Early logging with defaults; run() reinitializes from flags/env
    if let Err(e) = init_logging(None, None) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::ArchdotApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
