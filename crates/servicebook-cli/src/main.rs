//! Servicebook - vehicle service record keeping
//!
//! A CLI tool for registering, reviewing, editing, printing and exporting
//! vehicle service/inspection records.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
