use crate::cli::{OutputFormat, PolicyArg};
use crate::output;
use anyhow::Result;
use lexis_config::LexisConfig;
use lexis_pipeline::{Pipeline, WiringPolicy, WiringReport};

/// Standalone wiring assumes `load-nodes` already ran
pub async fn run(pipeline: &Pipeline, policy: Option<PolicyArg>) -> Result<WiringReport> {
    let policy = match policy {
        Some(PolicyArg::Permissive) => WiringPolicy::Permissive,
        Some(PolicyArg::Defensive) => WiringPolicy::Defensive,
        None => WiringPolicy::resolve(pipeline.context().config().ingest.wiring_policy, true),
    };
    pipeline.wire(policy).await
}

pub async fn execute(
    config: LexisConfig,
    format: OutputFormat,
    policy: Option<PolicyArg>,
) -> Result<()> {
    let pipeline = super::open_pipeline(config).await?;
    let report = run(&pipeline, policy).await?;
    output::print_report("Relationship wiring", &report, format)?;
    pipeline.shutdown().await
}
