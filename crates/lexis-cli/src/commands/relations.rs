use crate::cli::OutputFormat;
use crate::output;
use anyhow::{Context, Result};
use lexis_config::LexisConfig;
use lexis_enrichment::{RelationOptions, RelationTemplates};
use std::path::PathBuf;
use tracing::info;

pub struct RelationArgs {
    pub templates: Option<PathBuf>,
    pub top_k: Option<usize>,
    pub targets: Vec<String>,
    pub no_resume: bool,
    pub retry_failed: bool,
}

pub async fn execute(mut config: LexisConfig, format: OutputFormat, args: RelationArgs) -> Result<()> {
    if let Some(top_k) = args.top_k {
        config.relations.top_k = top_k;
    }
    if !args.targets.is_empty() {
        config.relations.targets = args.targets;
    }
    if args.no_resume {
        config.relations.resume = false;
    }
    if args.retry_failed {
        config.relations.retry_failed = true;
    }

    let path = args
        .templates
        .or_else(|| config.relations.template_path.clone())
        .context("No template table given; pass --templates or set relations.template_path")?;
    let templates = RelationTemplates::load(&path)
        .await
        .with_context(|| format!("Failed to load templates from {}", path.display()))?;
    info!(
        templates = templates.len(),
        categories = templates.relation_kinds().len(),
        "Loaded relation templates"
    );
    let options = RelationOptions::from(&config.relations);

    let pipeline = super::open_pipeline(config).await?;
    let report = pipeline.relations(templates, options).await?;
    output::print_report("Relation extraction", &report, format)?;
    pipeline.shutdown().await
}
