use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `GET /indexes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexList {
    #[serde(default)]
    pub indexes: Vec<IndexModel>,
}

impl IndexList {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.indexes.iter().map(|index| index.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexModel {
    pub name: String,
    /// Data plane host, without scheme.
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub dimension: Option<u32>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: Option<String>,
}

/// Body of `POST /indexes/create-for-model`, an index with integrated embedding.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIndexForModelRequest {
    pub name: String,
    pub cloud: String,
    pub region: String,
    pub embed: EmbedConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedConfig {
    pub model: String,
    pub field_map: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

impl EmbedConfig {
    /// Embeds the record field `field` with `model`, cosine metric.
    pub fn for_text_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            model: model.into(),
            field_map: HashMap::from([("text".to_string(), field)]),
            metric: Some("cosine".to_string()),
        }
    }
}

/// A record for an integrated-embedding index. `fields` must contain the mapped text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRecordsRequest {
    pub query: SearchQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub inputs: SearchInputs,
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchInputs {
    pub text: String,
}

impl SearchRecordsRequest {
    pub fn text(text: impl Into<String>, top_k: usize) -> Self {
        Self {
            query: SearchQuery {
                inputs: SearchInputs { text: text.into() },
                top_k,
            },
            fields: None,
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRecordsResponse {
    #[serde(default)]
    pub result: SearchRecordsResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRecordsResult {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One scored record from a search, ordered by descending similarity.
#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: f64,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Hit {
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}
