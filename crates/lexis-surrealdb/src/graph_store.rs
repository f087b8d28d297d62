//! `GraphStore` implementation over SurrealDB
//!
//! Entity tables are named after [`EntityKind::as_str`] and keyed by entity
//! name. Edges live in a single `edge` table keyed by `[label, from, to]`,
//! which makes `connect` an upsert by construction.

use crate::schema::apply_graph_schema;
use crate::surreal_client::SurrealClient;
use async_trait::async_trait;
use lexis_core::storage::check_endpoints;
use lexis_core::{
    Edge, Entity, EntityAttrs, EntityKind, GraphStats, GraphStore, NodeTag, ProcessingStatus,
    RelationKind, StorageError, StorageResult, TagQuery, UnresolvedRef,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct EntityRow {
    name: String,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    extraction_status: Option<String>,
}

impl EntityRow {
    fn into_entity(self, kind: EntityKind) -> Entity {
        let tags = self
            .tags
            .unwrap_or_default()
            .iter()
            .filter_map(|t| {
                let tag = NodeTag::parse(t);
                if tag.is_none() {
                    warn!("Ignoring unknown tag '{}' on {} '{}'", t, kind, self.name);
                }
                tag
            })
            .collect();
        Entity {
            kind,
            extraction_status: self
                .extraction_status
                .as_deref()
                .and_then(ProcessingStatus::parse),
            name: self.name,
            definition: self.definition,
            tags,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EdgeRow {
    kind: String,
    from_key: String,
    to_key: String,
    #[serde(default)]
    weight: Option<f64>,
}

impl EdgeRow {
    fn into_edge(self) -> StorageResult<Edge> {
        let kind = RelationKind::from_label(&self.kind).ok_or_else(|| {
            StorageError::serialization(format!("unknown edge label '{}'", self.kind))
        })?;
        Ok(Edge {
            kind,
            from: self.from_key,
            to: self.to_key,
            weight: self.weight,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FromRow {
    from_key: String,
}

#[derive(Debug, Deserialize)]
struct ToRow {
    to_key: String,
}

#[derive(Debug, Deserialize)]
struct NameRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: usize,
}

#[derive(Debug, Deserialize)]
struct LabelCountRow {
    kind: String,
    count: usize,
}

#[derive(Debug, Deserialize)]
struct TagsRow {
    #[serde(default)]
    tags: Option<Vec<String>>,
}

const ENTITY_FIELDS: &str = "name, definition, tags, extraction_status";

/// Graph store persisted in SurrealDB
#[derive(Clone, Debug)]
pub struct SurrealGraphStore {
    client: SurrealClient,
}

impl SurrealGraphStore {
    /// Wrap a client, applying the graph schema first
    pub async fn open(client: SurrealClient) -> StorageResult<Self> {
        apply_graph_schema(&client).await?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &SurrealClient {
        &self.client
    }

    /// Unresolved references recorded so far
    pub async fn unresolved(&self) -> StorageResult<Vec<UnresolvedRef>> {
        #[derive(Deserialize)]
        struct Row {
            kind: String,
            from_key: String,
            missing: String,
        }
        let rows: Vec<Row> = self
            .client
            .query(
                "SELECT kind, from_key, missing FROM unresolved ORDER BY kind, from_key, missing",
                &[],
            )
            .await?;
        rows.into_iter()
            .map(|row| {
                let kind = RelationKind::from_label(&row.kind).ok_or_else(|| {
                    StorageError::serialization(format!("unknown edge label '{}'", row.kind))
                })?;
                Ok(UnresolvedRef {
                    kind,
                    from: row.from_key,
                    missing: row.missing,
                })
            })
            .collect()
    }

    async fn exists(&self, kind: EntityKind, name: &str) -> StorageResult<bool> {
        Ok(self.get(kind, name).await?.is_some())
    }

    /// Names with a hypernym edge (or unresolved hypernym reference) into `target`
    async fn hypernym_children(&self, target: &str) -> StorageResult<Vec<String>> {
        let label = RelationKind::Hypernym.label();
        let params = [json!({ "kind": label, "target": target })];
        let mut children: Vec<String> = self
            .client
            .query::<FromRow>(
                "SELECT from_key FROM edge WHERE kind = $kind AND to_key = $target",
                &params,
            )
            .await?
            .into_iter()
            .map(|row| row.from_key)
            .collect();
        children.extend(
            self.client
                .query::<FromRow>(
                    "SELECT from_key FROM unresolved WHERE kind = $kind AND missing = $target",
                    &params,
                )
                .await?
                .into_iter()
                .map(|row| row.from_key),
        );
        Ok(children)
    }

    /// Iterative BFS over reverse hypernym links, so deep taxonomies and
    /// cycles cannot overflow the stack
    async fn hypernym_ancestors(&self, root: &str) -> StorageResult<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([root.to_string()]);
        while let Some(current) = queue.pop_front() {
            for child in self.hypernym_children(&current).await? {
                if found.insert(child.clone()) {
                    queue.push_back(child);
                }
            }
        }

        let mut existing = BTreeSet::new();
        for name in found {
            if self.exists(EntityKind::Concept, &name).await? {
                existing.insert(name);
            }
        }
        Ok(existing)
    }

    async fn targets(&self, kind: &RelationKind, from: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .client
            .query::<ToRow>(
                "SELECT to_key FROM edge WHERE kind = $kind AND from_key = $from",
                &[json!({ "kind": kind.label(), "from": from })],
            )
            .await?
            .into_iter()
            .map(|row| row.to_key)
            .collect())
    }

    async fn root_words_of_tagged_concepts(
        &self,
        concept_tag: NodeTag,
    ) -> StorageResult<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        for concept in self.tagged(EntityKind::Concept, concept_tag).await? {
            for lemma in self.targets(&RelationKind::HasLemma, &concept.name).await? {
                for root in self.targets(&RelationKind::SubsetOf, &lemma).await? {
                    if self.exists(EntityKind::RootWord, &root).await? {
                        found.insert(root);
                    }
                }
            }
        }
        Ok(found)
    }

    async fn count(&self, kind: EntityKind) -> StorageResult<usize> {
        let rows: Vec<CountRow> = self
            .client
            .query(
                "SELECT count() AS count FROM type::table($table) GROUP ALL",
                &[json!({ "table": kind.as_str() })],
            )
            .await?;
        Ok(rows.first().map(|row| row.count).unwrap_or(0))
    }
}

#[async_trait]
impl GraphStore for SurrealGraphStore {
    async fn upsert(&self, kind: EntityKind, attrs: EntityAttrs) -> StorageResult<Entity> {
        let sql = format!(
            "UPSERT type::thing($table, $name) SET name = $name, \
             definition = $definition ?? definition, tags = tags ?? [] \
             RETURN {}",
            ENTITY_FIELDS
        );
        let rows: Vec<EntityRow> = self
            .client
            .query(
                &sql,
                &[json!({
                    "table": kind.as_str(),
                    "name": attrs.name,
                    "definition": attrs.definition,
                })],
            )
            .await?;
        rows.into_iter()
            .next()
            .map(|row| row.into_entity(kind))
            .ok_or_else(|| StorageError::backend(format!("upsert of {} '{}' returned no row", kind, attrs.name)))
    }

    async fn get(&self, kind: EntityKind, name: &str) -> StorageResult<Option<Entity>> {
        let sql = format!("SELECT {} FROM type::thing($table, $name)", ENTITY_FIELDS);
        let rows: Vec<EntityRow> = self
            .client
            .query(&sql, &[json!({ "table": kind.as_str(), "name": name })])
            .await?;
        Ok(rows.into_iter().next().map(|row| row.into_entity(kind)))
    }

    async fn bulk_upsert(&self, kind: EntityKind, rows: Vec<EntityAttrs>) -> StorageResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let written = rows.len();
        let rows = serde_json::to_value(&rows)?;
        self.client
            .execute(
                "FOR $row IN $rows {
                    UPSERT type::thing($table, $row.name) SET name = $row.name,
                        definition = $row.definition ?? definition, tags = tags ?? [];
                };",
                &[json!({ "table": kind.as_str(), "rows": rows })],
            )
            .await?;
        debug!("Bulk upserted {} {} rows", written, kind);
        Ok(written)
    }

    async fn entities(&self, kind: EntityKind) -> StorageResult<Vec<Entity>> {
        let sql = format!(
            "SELECT {} FROM type::table($table) ORDER BY name",
            ENTITY_FIELDS
        );
        let rows: Vec<EntityRow> = self
            .client
            .query(&sql, &[json!({ "table": kind.as_str() })])
            .await?;
        Ok(rows.into_iter().map(|row| row.into_entity(kind)).collect())
    }

    async fn tagged(&self, kind: EntityKind, tag: NodeTag) -> StorageResult<Vec<Entity>> {
        let sql = format!(
            "SELECT {} FROM type::table($table) WHERE tags CONTAINS $tag ORDER BY name",
            ENTITY_FIELDS
        );
        let rows: Vec<EntityRow> = self
            .client
            .query(&sql, &[json!({ "table": kind.as_str(), "tag": tag.as_str() })])
            .await?;
        Ok(rows.into_iter().map(|row| row.into_entity(kind)).collect())
    }

    async fn connect(
        &self,
        kind: &RelationKind,
        from: &Entity,
        to: &Entity,
        weight: Option<f64>,
    ) -> StorageResult<Edge> {
        check_endpoints(kind, from, to)?;
        if !self.exists(from.kind, &from.name).await? {
            return Err(StorageError::not_found(from.kind, from.name.clone()));
        }
        if !self.exists(to.kind, &to.name).await? {
            return Err(StorageError::not_found(to.kind, to.name.clone()));
        }

        let rows: Vec<EdgeRow> = self
            .client
            .query(
                "UPSERT type::thing('edge', [$kind, $from, $to]) SET kind = $kind, \
                 from_key = $from, to_key = $to, weight = $weight ?? weight \
                 RETURN kind, from_key, to_key, weight",
                &[json!({
                    "kind": kind.label(),
                    "from": from.name,
                    "to": to.name,
                    "weight": weight,
                })],
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StorageError::backend(format!("connect {} returned no row", kind)))?
            .into_edge()
    }

    async fn edges_from(&self, kind: &RelationKind, from: &str) -> StorageResult<Vec<Edge>> {
        let rows: Vec<EdgeRow> = self
            .client
            .query(
                "SELECT kind, from_key, to_key, weight FROM edge \
                 WHERE kind = $kind AND from_key = $from ORDER BY to_key",
                &[json!({ "kind": kind.label(), "from": from })],
            )
            .await?;
        rows.into_iter().map(EdgeRow::into_edge).collect()
    }

    async fn has_any_edge_from(&self, kinds: &[RelationKind], from: &str) -> StorageResult<bool> {
        if kinds.is_empty() {
            return Ok(false);
        }
        let labels: Vec<String> = kinds.iter().map(RelationKind::label).collect();
        let rows: Vec<ToRow> = self
            .client
            .query(
                "SELECT to_key FROM edge WHERE kind IN $kinds AND from_key = $from LIMIT 1",
                &[json!({ "kinds": labels, "from": from })],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn record_unresolved(&self, reference: UnresolvedRef) -> StorageResult<()> {
        self.client
            .execute(
                "UPSERT type::thing('unresolved', [$kind, $from, $missing]) \
                 SET kind = $kind, from_key = $from, missing = $missing",
                &[json!({
                    "kind": reference.kind.label(),
                    "from": reference.from,
                    "missing": reference.missing,
                })],
            )
            .await?;
        Ok(())
    }

    async fn tag(&self, tag: NodeTag, query: &TagQuery) -> StorageResult<BTreeSet<String>> {
        let matched = match query {
            TagQuery::HypernymAncestorsOf { root } => self.hypernym_ancestors(root).await?,
            TagQuery::RootWordsOfTaggedConcepts { concept_tag } => {
                self.root_words_of_tagged_concepts(*concept_tag).await?
            }
        };
        if matched.is_empty() {
            return Ok(matched);
        }

        let names: Vec<&String> = matched.iter().collect();
        self.client
            .execute(
                "FOR $name IN $names {
                    UPDATE type::thing($table, $name) SET tags = array::union(tags ?? [], [$tag]);
                };",
                &[json!({
                    "table": query.target_kind().as_str(),
                    "names": names,
                    "tag": tag.as_str(),
                })],
            )
            .await?;
        debug!("Tagged {} {} entities as {}", matched.len(), query.target_kind(), tag);
        Ok(matched)
    }

    async fn set_extraction_status(
        &self,
        name: &str,
        status: ProcessingStatus,
    ) -> StorageResult<()> {
        let rows: Vec<NameRow> = self
            .client
            .query(
                "UPDATE type::thing('root_word', $name) SET extraction_status = $status RETURN name",
                &[json!({ "name": name, "status": status.as_str() })],
            )
            .await?;
        let Some(row) = rows.into_iter().next() else {
            return Err(StorageError::not_found(EntityKind::RootWord, name));
        };
        debug!(root = %row.name, status = status.as_str(), "Updated extraction status");
        Ok(())
    }

    async fn stats(&self) -> StorageResult<GraphStats> {
        let mut stats = GraphStats::default();
        for kind in EntityKind::ALL {
            stats.entities.insert(kind, self.count(kind).await?);

            let rows: Vec<TagsRow> = self
                .client
                .query(
                    "SELECT tags FROM type::table($table) WHERE array::len(tags ?? []) > 0",
                    &[json!({ "table": kind.as_str() })],
                )
                .await?;
            for tag in rows
                .into_iter()
                .flat_map(|row| row.tags.unwrap_or_default())
                .filter_map(|t| NodeTag::parse(&t))
            {
                *stats.tags.entry(tag).or_default() += 1;
            }
        }

        let rows: Vec<LabelCountRow> = self
            .client
            .query("SELECT kind, count() AS count FROM edge GROUP BY kind", &[])
            .await?;
        for row in rows {
            stats.edges.insert(row.kind, row.count);
        }

        let rows: Vec<CountRow> = self
            .client
            .query("SELECT count() AS count FROM unresolved GROUP ALL", &[])
            .await?;
        stats.unresolved = rows.first().map(|row| row.count).unwrap_or(0);
        Ok(stats)
    }
}
