use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use lexis_config::LexisConfig;
use lexis_pipeline::{LoadReport, Pipeline};

pub async fn run(pipeline: &Pipeline) -> Result<LoadReport> {
    pipeline.load_nodes().await
}

pub async fn execute(config: LexisConfig, format: OutputFormat) -> Result<()> {
    let pipeline = super::open_pipeline(config).await?;
    let report = run(&pipeline).await?;
    output::print_report("Node loading", &report, format)?;
    pipeline.shutdown().await
}
