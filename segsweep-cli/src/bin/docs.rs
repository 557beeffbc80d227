#![allow(clippy::all)]
use clap::{Parser, Subcommand};
use clap_markdown;

use segsweep_cli::{run, status};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Run(run::RunArgs),
    Status(status::StatusArgs),
}

fn main() {
    clap_markdown::print_help_markdown::<Cli>();
}
