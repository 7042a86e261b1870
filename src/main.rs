//! texnav - A command-driven text editor with an integrated file manager
//!
//! This is the main entry point. It parses CLI arguments, installs logging
//! and hands control to the line front end.

use texnav::{cli, config, run, user_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the editor's output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("texnav=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let cli = cli::Cli::parse()?;

    // Load configuration
    let mut config = config::Config::default();
    user_config::configure(&mut config);

    // Apply CLI overrides
    cli.apply_to_config(&mut config);

    let start_dir = cli.start_dir(&std::env::current_dir()?);

    run::run_line_mode(&cli.files, config, start_dir)?;
    Ok(())
}
