use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use lexis_config::LexisConfig;
use lexis_pipeline::{IngestOptions, IngestReport, Pipeline};

pub async fn run(pipeline: &Pipeline, skip_load: bool) -> Result<IngestReport> {
    pipeline.ingest(IngestOptions { skip_load }).await
}

pub async fn execute(config: LexisConfig, format: OutputFormat, skip_load: bool) -> Result<()> {
    let pipeline = super::open_pipeline(config).await?;
    let report = run(&pipeline, skip_load).await?;
    output::print_report("Ingestion", &report, format)?;
    pipeline.shutdown().await
}
