//! Per-phase configuration components

pub mod corpus;
pub mod enrichment;
pub mod ingest;
pub mod store;

pub use corpus::CorpusConfig;
pub use enrichment::{EmbeddingBackendConfig, EmbeddingProviderType, RelationsConfig, SimilarityConfig};
pub use ingest::{IngestConfig, WiringPolicyConfig};
pub use store::{StoreBackend, StoreConfig};
