//! Schema initialization
//!
//! Applied once per client. A `_schema_version` row lets a reopened RocksDB
//! database skip the definitions entirely.

use crate::surreal_client::SurrealClient;
use crate::types::{DbError, DbResult};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace};

const SCHEMA_VERSION: &str = "lexis-graph-1";

#[derive(Deserialize)]
struct VersionRow {
    #[allow(dead_code)]
    version: String,
}

/// Apply the graph schema to the client's database
///
/// Every statement uses `IF NOT EXISTS`, so reapplying is harmless.
pub async fn apply_graph_schema(client: &SurrealClient) -> DbResult<()> {
    if client.schema_applied() {
        trace!("Schema already applied for this client, skipping");
        return Ok(());
    }

    if check_schema_version(client).await {
        debug!("Schema version {} already present", SCHEMA_VERSION);
        client.mark_schema_applied();
        return Ok(());
    }

    let schema = include_str!("schema_lexis_graph.surql");
    let statements: Vec<&str> = schema
        .split(';')
        .map(strip_comments)
        .filter(|s| !s.is_empty())
        .collect();
    debug!("Applying {} schema statements", statements.len());

    client
        .execute(&statements.join(";\n"), &[])
        .await
        .map_err(|e| DbError::Schema(format!("Failed to apply graph schema: {}", e)))?;

    client
        .execute(
            "DEFINE TABLE IF NOT EXISTS _schema_version SCHEMALESS;
             DELETE _schema_version;
             CREATE _schema_version SET version = $version, applied_at = time::now();",
            &[json!({ "version": SCHEMA_VERSION })],
        )
        .await
        .map_err(|e| DbError::Schema(format!("Failed to record schema version: {}", e)))?;

    client.mark_schema_applied();
    debug!("Schema {} applied", SCHEMA_VERSION);
    Ok(())
}

/// A missing version table just means a fresh database
async fn check_schema_version(client: &SurrealClient) -> bool {
    client
        .query::<VersionRow>(
            "SELECT version FROM _schema_version WHERE version = $version LIMIT 1",
            &[json!({ "version": SCHEMA_VERSION })],
        )
        .await
        .map(|rows| !rows.is_empty())
        .unwrap_or(false)
}

fn strip_comments(statement: &str) -> &str {
    let trimmed = statement.trim();
    let code_start = trimmed
        .lines()
        .take_while(|line| line.trim_start().starts_with("--") || line.trim().is_empty())
        .map(|line| line.len() + 1)
        .sum::<usize>();
    trimmed.get(code_start.min(trimmed.len())..).unwrap_or("").trim()
}
