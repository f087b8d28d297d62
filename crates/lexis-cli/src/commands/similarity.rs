use crate::cli::OutputFormat;
use crate::output;
use anyhow::Result;
use lexis_config::{EmbeddingProviderType, LexisConfig};
use lexis_enrichment::SimilarityOptions;
use std::path::PathBuf;

pub async fn execute(
    mut config: LexisConfig,
    format: OutputFormat,
    top_k: Option<usize>,
    resume: bool,
    vectors: Option<PathBuf>,
) -> Result<()> {
    if let Some(top_k) = top_k {
        config.similarity.top_k = top_k;
    }
    if resume {
        config.similarity.resume = true;
    }
    if let Some(vectors) = vectors {
        config.similarity.embeddings.provider = EmbeddingProviderType::Vectors;
        config.similarity.embeddings.vectors_path = Some(vectors);
    }
    let options = SimilarityOptions::from(&config.similarity);

    let pipeline = super::open_pipeline(config).await?;
    let report = pipeline.similarity(options).await?;
    output::print_report("Similarity enrichment", &report, format)?;
    pipeline.shutdown().await
}
