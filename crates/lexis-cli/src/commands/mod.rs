pub mod aggregate;
pub mod classify;
pub mod ingest;
pub mod load_nodes;
pub mod relations;
pub mod similarity;
pub mod stats;
pub mod wire;

use anyhow::Result;
use lexis_config::LexisConfig;
use lexis_pipeline::{Pipeline, PipelineContext};

/// Build the pipeline every command runs against
pub async fn open_pipeline(config: LexisConfig) -> Result<Pipeline> {
    Ok(Pipeline::new(PipelineContext::initialize(config).await?))
}
