mod builder;
mod cli;
mod error;
mod fmt;
mod grid;
mod importer;
mod index;
mod loader;
mod models;
mod recurrence;
mod render;
mod session;
mod settings;
mod statements;
mod tui;
mod viewer;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            csv,
            output,
            threshold,
            no_forward_weekends,
        } => cli::build::run(&csv, output, threshold, no_forward_weekends),
        Commands::View { file, year } => cli::view::run(file, year),
        Commands::Show { date, file } => cli::show::run(&date, file),
        Commands::Years { file } => cli::years::run(file),
        Commands::Html {
            file,
            output,
            template,
            target,
        } => cli::html::run(file, output, template, target),
        Commands::Config {
            calendar_path,
            threshold,
            forward_weekends,
            html_target,
        } => cli::config::run(calendar_path, threshold, forward_weekends, html_target),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
