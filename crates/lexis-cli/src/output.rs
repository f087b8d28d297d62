//! Result rendering for stdout
//!
//! Reports are serializable structs. `table` flattens them into
//! field/value rows; `json` prints them as-is. Logs go to stderr, so JSON
//! output stays machine readable.

use crate::cli::OutputFormat;
use anyhow::Result;
use comfy_table::{Cell, Table};
use lexis_core::GraphStats;
use serde::Serialize;
use serde_json::Value;

pub fn print_report<T: Serialize>(title: &str, report: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            println!("{}\n", title);
            println!("{}", report_table(report)?);
        }
    }
    Ok(())
}

pub fn report_table<T: Serialize>(report: &T) -> Result<Table> {
    let mut rows = Vec::new();
    flatten("", &serde_json::to_value(report)?, &mut rows);

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }
    Ok(table)
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let field = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&field, child, rows);
            }
        }
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            rows.push((prefix.to_string(), format!("[{}] {}", items.len(), joined)));
        }
        Value::Null => rows.push((prefix.to_string(), "-".to_string())),
        Value::String(s) => rows.push((prefix.to_string(), s.clone())),
        other => rows.push((prefix.to_string(), other.to_string())),
    }
}

pub fn print_stats(stats: &GraphStats, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("Graph Statistics\n");
    println!("{}", stats_table(stats));
    Ok(())
}

pub fn stats_table(stats: &GraphStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Section", "Name", "Count"]);
    for (kind, count) in &stats.entities {
        table.add_row(vec![
            Cell::new("entity"),
            Cell::new(kind.to_string()),
            Cell::new(count),
        ]);
    }
    for (label, count) in &stats.edges {
        table.add_row(vec![Cell::new("edge"), Cell::new(label), Cell::new(count)]);
    }
    for (tag, count) in &stats.tags {
        table.add_row(vec![
            Cell::new("tag"),
            Cell::new(tag.to_string()),
            Cell::new(count),
        ]);
    }
    table.add_row(vec![
        Cell::new("unresolved"),
        Cell::new("-"),
        Cell::new(stats.unresolved),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_core::{EntityKind, NodeTag};

    #[derive(Serialize)]
    struct Nested {
        count: usize,
        names: Vec<String>,
    }

    #[derive(Serialize)]
    struct Sample {
        phase: Nested,
        skipped: Option<usize>,
    }

    #[test]
    fn test_nested_reports_flatten_to_dotted_fields() {
        let sample = Sample {
            phase: Nested {
                count: 3,
                names: vec!["dog".to_string(), "cat".to_string()],
            },
            skipped: None,
        };
        let mut rows = Vec::new();
        flatten("", &serde_json::to_value(&sample).unwrap(), &mut rows);

        assert!(rows.contains(&("phase.count".to_string(), "3".to_string())));
        assert!(rows.contains(&("phase.names".to_string(), "[2] dog, cat".to_string())));
        assert!(rows.contains(&("skipped".to_string(), "-".to_string())));
    }

    #[test]
    fn test_stats_table_lists_every_section() {
        let mut stats = GraphStats::default();
        stats.entities.insert(EntityKind::Concept, 2);
        stats.edges.insert("hypernym".to_string(), 1);
        stats.tags.insert(NodeTag::Object, 2);
        stats.unresolved = 1;

        let rendered = stats_table(&stats).to_string();
        assert!(rendered.contains("hypernym"));
        assert!(rendered.contains("unresolved"));
        assert!(rendered.contains(&EntityKind::Concept.to_string()));
        assert!(rendered.contains(&NodeTag::Object.to_string()));
    }
}
