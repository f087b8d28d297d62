//! # Lexis Pipeline
//!
//! Ingestion phases over a [`LexicalCorpus`](lexis_core::LexicalCorpus) and
//! a [`GraphStore`](lexis_core::GraphStore), plus the orchestrator that runs
//! them in order and hands the enriched graph to the enrichment passes.
//!
//! ```no_run
//! use lexis_config::LexisConfig;
//! use lexis_pipeline::{IngestOptions, Pipeline, PipelineContext};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let context = PipelineContext::initialize(LexisConfig::default()).await?;
//! let pipeline = Pipeline::new(context);
//! let report = pipeline.ingest(IngestOptions::default()).await?;
//! println!("{} edges", report.wiring.edges_connected);
//! pipeline.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod context;
pub mod loader;
pub mod pipeline;
pub mod reclassify;
pub mod resolver;
pub mod wiring;

pub use aggregate::{AggregateReport, RootWordAggregator};
pub use context::{create_store, load_corpus, PipelineContext};
pub use loader::{BatchNodeLoader, LoadReport};
pub use pipeline::{IngestOptions, IngestReport, Pipeline};
pub use reclassify::{ClassifyReport, ReclassificationEngine};
pub use resolver::{EntityResolver, Resolution};
pub use wiring::{RelationshipWiring, WiringPolicy, WiringReport};
