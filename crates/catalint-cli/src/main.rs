//! Catalint CLI: the `catalint` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use commands::lint::Stages;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lint => {
            let ctx = support::build_context(&cli.root, cli.out.as_deref(), cli.config.as_deref());
            commands::lint::run("lint", &ctx, Stages::default(), cli.json)
        }

        Commands::Derive => {
            let ctx = support::build_context(&cli.root, cli.out.as_deref(), cli.config.as_deref());
            commands::lint::run(
                "derive",
                &ctx,
                Stages {
                    derive: true,
                    ..Stages::default()
                },
                cli.json,
            )
        }

        Commands::All => {
            let ctx = support::build_context(&cli.root, cli.out.as_deref(), cli.config.as_deref());
            commands::lint::run(
                "all",
                &ctx,
                Stages {
                    derive: true,
                    ..Stages::default()
                },
                cli.json,
            )
        }

        Commands::Fix => {
            let ctx = support::build_context(&cli.root, cli.out.as_deref(), cli.config.as_deref());
            commands::lint::run(
                "fix",
                &ctx,
                Stages {
                    fix: true,
                    ..Stages::default()
                },
                cli.json,
            )
        }

        Commands::Smoke => commands::smoke::run(&cli.root, cli.json),
    }
}
