use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use update_toml::{Cli, Config, commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = Config::load(cli.config.as_deref()).and_then(|config| {
        let mut stdout = std::io::stdout().lock();
        commands::run(&cli, &config, &mut stdout)
    });

    match result {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
