use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use lexis_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Explicit flags win over RUST_LOG; logs go to stderr so stdout stays parseable
    let env_filter = match (cli.log_level, cli.verbose) {
        (Some(level), _) => EnvFilter::default().add_directive(LevelFilter::from(level).into()),
        (None, true) => EnvFilter::default().add_directive(LevelFilter::DEBUG.into()),
        (None, false) => EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(cli.config.as_deref(), &cli.overrides).await?;
    let format = cli.format;

    match cli.command {
        Commands::Ingest { skip_load } => commands::ingest::execute(config, format, skip_load).await?,

        Commands::LoadNodes => commands::load_nodes::execute(config, format).await?,

        Commands::Wire { policy } => commands::wire::execute(config, format, policy).await?,

        Commands::Aggregate => commands::aggregate::execute(config, format).await?,

        Commands::Classify => commands::classify::execute(config, format).await?,

        Commands::Similarity {
            top_k,
            resume,
            vectors,
        } => commands::similarity::execute(config, format, top_k, resume, vectors).await?,

        Commands::Relations {
            templates,
            top_k,
            targets,
            no_resume,
            retry_failed,
        } => {
            commands::relations::execute(
                config,
                format,
                commands::relations::RelationArgs {
                    templates,
                    top_k,
                    targets,
                    no_resume,
                    retry_failed,
                },
            )
            .await?
        }

        Commands::Stats => commands::stats::execute(config, format).await?,
    }

    Ok(())
}
