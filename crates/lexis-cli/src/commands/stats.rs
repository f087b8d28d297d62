use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use lexis_config::LexisConfig;

pub async fn execute(config: LexisConfig, format: OutputFormat) -> Result<()> {
    let pipeline = super::open_pipeline(config).await?;
    let stats = pipeline.stats().await?;
    output::print_stats(&stats, format)?;

    if format == OutputFormat::Table {
        let config = pipeline.context().config();
        println!("\nStore: {:?} at {}", config.store.backend, config.store.path);
    }
    pipeline.shutdown().await
}
