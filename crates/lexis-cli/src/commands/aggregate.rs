use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use lexis_config::LexisConfig;
use lexis_pipeline::{AggregateReport, Pipeline};

pub async fn run(pipeline: &Pipeline) -> Result<AggregateReport> {
    pipeline.aggregate().await
}

pub async fn execute(config: LexisConfig, format: OutputFormat) -> Result<()> {
    let pipeline = super::open_pipeline(config).await?;
    let report = run(&pipeline).await?;
    output::print_report("Root word aggregation", &report, format)?;
    pipeline.shutdown().await
}
