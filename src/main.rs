mod cli;
mod columns;
mod error;
mod export;
mod fmt;
mod history;
mod merge;
mod models;
mod prepare;
mod settings;
mod tenure;
mod workbook;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { config, force } => cli::init::run(config, force),
        Commands::Evaluate {
            input,
            output,
            as_of,
            config,
            show,
        } => cli::evaluate::run(&input, output, as_of.as_deref(), config.as_deref(), show),
        Commands::Columns { input, config } => cli::columns::run(&input, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
