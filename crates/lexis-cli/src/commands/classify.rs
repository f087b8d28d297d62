use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use lexis_config::LexisConfig;
use lexis_pipeline::{ClassifyReport, Pipeline};

pub async fn run(pipeline: &Pipeline) -> Result<ClassifyReport> {
    pipeline.classify().await
}

pub async fn execute(config: LexisConfig, format: OutputFormat) -> Result<()> {
    let pipeline = super::open_pipeline(config).await?;
    let report = run(&pipeline).await?;
    output::print_report("Reclassification", &report, format)?;
    pipeline.shutdown().await
}
