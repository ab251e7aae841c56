use clap::Parser;
use console_nav::cli::commands::{cmd_destinations, cmd_navigate, cmd_rpm, cmd_run};
use console_nav::cli::config::{Cli, Commands, resolve_config};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = resolve_config(cli.config.as_deref());

    let outcome = match cli.command {
        Commands::Run { spec, format, output } => {
            let format = format.unwrap_or_else(|| config.run.format.clone());
            let output = output.or_else(|| config.run.output.clone());
            cmd_run(&spec, &format, output.as_deref(), &config)
        }
        Commands::Navigate { subject, destination } => {
            cmd_navigate(&subject, &destination, &config).map(|()| true)
        }
        Commands::Destinations => cmd_destinations(&config).map(|()| true),
        Commands::Rpm { check } => cmd_rpm(&check, &config),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// RUST_LOG wins; otherwise each -v raises the level one step from warn.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
