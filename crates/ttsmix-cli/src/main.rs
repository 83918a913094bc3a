//! CLI entry point - the composition root.
//!
//! Infrastructure is wired together once via `bootstrap`; commands are
//! dispatched to handlers that use the resulting `CliContext`.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use ttsmix_cli::handlers::archive::ArchiveSource;
use ttsmix_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(&CliConfig::from_cli(&cli))?;

    match command {
        Commands::Synthesize(args) => {
            handlers::synthesize::execute(&ctx, args.clone()).await?;
        }
        Commands::Archive {
            manifest,
            artifacts,
            output,
        } => {
            let source = if *artifacts {
                ArchiveSource::Artifacts
            } else {
                ArchiveSource::OutputDir
            };
            handlers::archive::execute(&ctx, manifest, source, output.clone()).await?;
        }
        Commands::FetchAudio { path, output } => {
            handlers::fetch_audio::execute(&ctx, path, output.clone()).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        // Cancellation was already reported as a status line
        if !matches!(e.downcast_ref::<CliError>(), Some(CliError::Cancelled)) {
            eprintln!("Error: {e}");
        }
        std::process::exit(code);
    }
}
