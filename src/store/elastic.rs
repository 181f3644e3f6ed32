//! Elasticsearch-backed [`SearchIndex`] implementation.
//!
//! Talks to any Elasticsearch-compatible HTTP API via `reqwest`. This is
//! where engine-agnostic [`QueryPlan`]s become the engine's wire format:
//! must clauses and filters map onto a `bool` query, the sort spec onto a
//! `sort` array, and the window onto `from`/`size`. Plan encoding is a pure
//! function ([`plan_body`]) so it can be tested without a live cluster.

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::models::{Item, SortField};
use crate::query::{FilterClause, MustClause, QueryPlan, SortSpec};

use super::SearchIndex;

/// Elasticsearch implementation of the [`SearchIndex`] trait.
pub struct ElasticIndex {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

impl ElasticIndex {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
        })
    }

    /// Create the items index with its field mapping if it does not exist.
    /// Idempotent; called once at startup.
    pub async fn ensure_index(&self) -> Result<()> {
        let index_url = format!("{}/{}", self.base_url, self.index);

        let head = self
            .client
            .head(&index_url)
            .send()
            .await
            .context("checking whether the search index exists")?;

        if head.status().is_success() {
            return Ok(());
        }
        if head.status().as_u16() != 404 {
            bail!("search index existence check failed: {}", head.status());
        }

        let mapping = json!({
            "mappings": {
                "properties": {
                    "id": { "type": "keyword" },
                    "name": {
                        "type": "text",
                        "analyzer": "standard",
                        "fields": { "keyword": { "type": "keyword" } }
                    },
                    "description": { "type": "text" },
                    "price": { "type": "float" },
                    "stock": { "type": "integer" },
                    "category": { "type": "keyword" },
                    "subcategory": { "type": "keyword" },
                    "location": { "type": "keyword" },
                    "created_at": { "type": "date" },
                    "updated_at": { "type": "date" }
                }
            }
        });

        let resp = self
            .client
            .put(&index_url)
            .json(&mapping)
            .send()
            .await
            .context("creating the search index")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("search index creation failed {}: {}", status, body);
        }

        println!("Search index '{}' created", self.index);
        Ok(())
    }

    async fn execute(&self, plan: &QueryPlan) -> Result<Vec<Value>> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let body = plan_body(plan);

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("executing search request")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("search request failed {}: {}", status, body);
        }

        let response: Value = resp.json().await.context("decoding search response")?;
        let hits = response["hits"]["hits"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        Ok(hits)
    }
}

/// Encode a [`QueryPlan`] as an Elasticsearch `_search` request body.
pub fn plan_body(plan: &QueryPlan) -> Value {
    let must: Vec<Value> = plan.must.iter().map(must_clause).collect();
    let filter: Vec<Value> = plan.filters.iter().map(filter_clause).collect();

    let mut body = json!({
        "query": {
            "bool": {
                "must": must,
                "filter": filter
            }
        },
        "sort": sort_spec(&plan.sort)
    });

    if let Some(offset) = plan.window.offset {
        body["from"] = json!(offset);
    }
    if let Some(size) = plan.window.size {
        body["size"] = json!(size);
    }
    body
}

fn must_clause(clause: &MustClause) -> Value {
    match clause {
        MustClause::MatchAll => json!({ "match_all": {} }),
        MustClause::MultiMatch { query } => json!({
            "multi_match": {
                "query": query,
                "fields": ["name^2", "description"],
                "fuzziness": "AUTO"
            }
        }),
        MustClause::PrefixName { text } => json!({
            "match_phrase_prefix": { "name": text }
        }),
    }
}

fn filter_clause(clause: &FilterClause) -> Value {
    match clause {
        FilterClause::Term { field, value } => {
            let mut term = serde_json::Map::new();
            term.insert((*field).to_string(), json!(value));
            json!({ "term": term })
        }
        FilterClause::Range { field, gte, lte } => {
            let mut bounds = serde_json::Map::new();
            if let Some(min) = gte {
                bounds.insert("gte".to_string(), json!(min));
            }
            if let Some(max) = lte {
                bounds.insert("lte".to_string(), json!(max));
            }
            let mut range = serde_json::Map::new();
            range.insert((*field).to_string(), Value::Object(bounds));
            json!({ "range": range })
        }
    }
}

fn sort_spec(sort: &SortSpec) -> Value {
    match sort {
        SortSpec::Score => json!(["_score"]),
        SortSpec::Field { field, order } => {
            // Sort name on its keyword sub-field so ordering is
            // lexicographic rather than token-order.
            let field_name = match field {
                SortField::Name => "name.keyword",
                other => other.as_str(),
            };
            let mut spec = serde_json::Map::new();
            spec.insert(field_name.to_string(), json!({ "order": order.as_str() }));
            json!([spec])
        }
    }
}

#[async_trait]
impl SearchIndex for ElasticIndex {
    async fn index_item(&self, item: &Item) -> Result<()> {
        let url = format!("{}/{}/_doc/{}", self.base_url, self.index, item.id);

        let resp = self
            .client
            .put(&url)
            .json(item)
            .send()
            .await
            .with_context(|| format!("indexing item \"{}\"", item.name))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("index write failed {}: {}", status, body);
        }
        Ok(())
    }

    async fn search(&self, plan: &QueryPlan) -> Result<Vec<Item>> {
        let hits = self.execute(plan).await?;
        let mut items = Vec::with_capacity(hits.len());
        for hit in hits {
            let item: Item = serde_json::from_value(hit["_source"].clone())
                .context("decoding item from search hit")?;
            items.push(item);
        }
        Ok(items)
    }

    async fn autocomplete(&self, plan: &QueryPlan) -> Result<Vec<String>> {
        let hits = self.execute(plan).await?;
        let names = hits
            .iter()
            .filter_map(|hit| hit["_source"]["name"].as_str().map(String::from))
            .collect();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchQuery, SortOrder};
    use crate::query::{autocomplete_plan, translate, Window};

    #[test]
    fn test_match_all_body() {
        let body = plan_body(&translate(&SearchQuery::default()));
        assert_eq!(body["query"]["bool"]["must"], json!([{ "match_all": {} }]));
        assert_eq!(body["query"]["bool"]["filter"], json!([]));
        assert_eq!(body["sort"], json!(["_score"]));
        assert!(body.get("from").is_none());
        assert!(body.get("size").is_none());
    }

    #[test]
    fn test_multi_match_body() {
        let query = SearchQuery {
            q: Some("laptop".to_string()),
            ..Default::default()
        };
        let body = plan_body(&translate(&query));
        assert_eq!(
            body["query"]["bool"]["must"][0],
            json!({
                "multi_match": {
                    "query": "laptop",
                    "fields": ["name^2", "description"],
                    "fuzziness": "AUTO"
                }
            })
        );
    }

    #[test]
    fn test_filters_and_range_body() {
        let query = SearchQuery {
            category: Some("Electronics".to_string()),
            min_price: Some(100.0),
            ..Default::default()
        };
        let body = plan_body(&translate(&query));
        assert_eq!(
            body["query"]["bool"]["filter"],
            json!([
                { "term": { "category": "Electronics" } },
                { "range": { "price": { "gte": 100.0 } } }
            ])
        );
    }

    #[test]
    fn test_name_sort_uses_keyword_field() {
        let query = SearchQuery {
            sort: Some(SortField::Name),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let body = plan_body(&translate(&query));
        assert_eq!(
            body["sort"],
            json!([{ "name.keyword": { "order": "desc" } }])
        );
    }

    #[test]
    fn test_window_maps_to_from_and_size() {
        let mut plan = translate(&SearchQuery::default());
        plan.window = Window {
            offset: Some(20),
            size: Some(10),
        };
        let body = plan_body(&plan);
        assert_eq!(body["from"], json!(20));
        assert_eq!(body["size"], json!(10));
    }

    #[test]
    fn test_autocomplete_body() {
        let body = plan_body(&autocomplete_plan("wid"));
        assert_eq!(
            body["query"]["bool"]["must"],
            json!([{ "match_phrase_prefix": { "name": "wid" } }])
        );
        assert_eq!(body["size"], json!(5));
    }
}
