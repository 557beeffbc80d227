// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use clap::{Parser, Subcommand};
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
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Run(run_args)) => run::run(run_args),
        Some(Commands::Status(status_args)) => status::status(status_args),
        None => {}
    }
}
