//! Resource-oriented response shaping.
//!
//! Raw records (flat attribute maps with epoch-millisecond timestamps) are
//! converted into [`Resource`]s: the id moves out of the attributes,
//! timestamps become `YYYY-MM-DD` / `YYYY-MM-DD HH:MM:SS` strings, foreign
//! keys become relationships, and every resource gets a self link.
//!
//! # Response envelopes
//!
//! ```json
//! {
//!   "apiVersion": "0.1",
//!   "method": "subs.get",
//!   "params": { "ticker": "AAPL", "form": "10-K" },
//!   "data": { "items": [ ... ], "totalItems": 2 }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Output format for a timestamp attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DD HH:MM:SS` (UTC)
    DateTime,
}

/// Format epoch milliseconds as a UTC date or date-time string.
///
/// Values outside the representable range are rendered as the raw number.
pub fn format_epoch_millis(epoch_ms: i64, format: TimestampFormat) -> String {
    let pattern = match format {
        TimestampFormat::Date => "%Y-%m-%d",
        TimestampFormat::DateTime => "%Y-%m-%d %H:%M:%S",
    };
    chrono::DateTime::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

/// A foreign-key attribute rendered as a relationship.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipSpec {
    /// Key in the `relationships` map, e.g. `SUB`.
    pub name: &'static str,
    /// Attribute holding the referenced id; removed from attributes.
    pub field: &'static str,
    /// Resource type of the referenced record.
    pub target_type: &'static str,
    /// Route prefix of the referenced record, e.g. `/subs`.
    pub target_path: &'static str,
}

/// Static description of one resource type.
#[derive(Debug, Clone, Copy)]
pub struct ResourceKind {
    /// Value of the `type` member.
    pub type_name: &'static str,
    /// Attribute extracted as `Resource.id`; removed from attributes.
    pub id_field: &'static str,
    /// Route prefix for self links, e.g. `/subs`.
    pub path: &'static str,
    /// Attribute used in the self link; `None` uses the id.
    pub link_field: Option<&'static str>,
    /// Whether item routes end with `/`.
    pub trailing_slash: bool,
    pub timestamp_fields: &'static [(&'static str, TimestampFormat)],
    pub relationships: &'static [RelationshipSpec],
}

pub const TICKER: ResourceKind = ResourceKind {
    type_name: "cik",
    id_field: "id",
    path: "/tickers",
    link_field: Some("ticker"),
    trailing_slash: true,
    timestamp_fields: &[],
    relationships: &[],
};

pub const SUBMISSION: ResourceKind = ResourceKind {
    type_name: "subs",
    id_field: "id",
    path: "/subs",
    link_field: Some("adsh"),
    trailing_slash: true,
    timestamp_fields: &[
        ("filed", TimestampFormat::Date),
        ("period", TimestampFormat::Date),
        ("accepted", TimestampFormat::DateTime),
    ],
    relationships: &[],
};

pub const FACT: ResourceKind = ResourceKind {
    type_name: "nums",
    id_field: "id",
    path: "/nums",
    link_field: None,
    trailing_slash: false,
    timestamp_fields: &[("ddate", TimestampFormat::Date)],
    relationships: &[RelationshipSpec {
        name: "SUB",
        field: "adsh",
        target_type: "subs",
        target_path: "/subs",
    }],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub type_name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub data: ResourceIdentifier,
    pub links: Links,
}

/// A single API resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub attributes: Map<String, Value>,
    pub links: Links,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

/// Builds [`Resource`]s with self links relative to a base path.
#[derive(Debug, Clone, Default)]
pub struct ResourceFormatter {
    base_path: String,
}

impl ResourceFormatter {
    /// `base_path` is prepended to every link, e.g. `/sec`. Use `""` for none.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into().trim_end_matches('/').to_string(),
        }
    }

    /// Link to one item under `path`, e.g. `/sec/subs/0000320193-23-000106/`.
    pub fn link(&self, path: &str, key: &str, trailing_slash: bool) -> String {
        let slash = if trailing_slash { "/" } else { "" };
        format!("{}{}/{}{}", self.base_path, path, key, slash)
    }

    /// Shape a flat record into a resource of the given kind.
    pub fn format(&self, mut record: Map<String, Value>, kind: &ResourceKind) -> Resource {
        let id = record
            .remove(kind.id_field)
            .map(|v| value_to_key(&v))
            .unwrap_or_default();

        for (field, format) in kind.timestamp_fields {
            if let Some(value) = record.get_mut(*field) {
                if let Some(epoch_ms) = value.as_i64() {
                    *value = Value::String(format_epoch_millis(epoch_ms, *format));
                }
            }
        }

        let mut relationships = BTreeMap::new();
        for rel in kind.relationships {
            if let Some(value) = record.remove(rel.field) {
                let target_id = value_to_key(&value);
                relationships.insert(
                    rel.name.to_string(),
                    Relationship {
                        links: Links {
                            self_link: self.link(rel.target_path, &target_id, true),
                        },
                        data: ResourceIdentifier {
                            type_name: rel.target_type.to_string(),
                            id: target_id,
                        },
                    },
                );
            }
        }

        let link_key = kind
            .link_field
            .and_then(|f| record.get(f))
            .map(value_to_key)
            .unwrap_or_else(|| id.clone());

        Resource {
            links: Links {
                self_link: self.link(kind.path, &link_key, kind.trailing_slash),
            },
            id,
            type_name: kind.type_name.to_string(),
            attributes: record,
            relationships,
        }
    }

    /// Serialize a typed record and shape it.
    ///
    /// Records that do not serialize to a JSON object yield an empty
    /// attribute map.
    pub fn format_record<T: Serialize>(&self, record: &T, kind: &ResourceKind) -> Resource {
        let map = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        self.format(map, kind)
    }
}

fn value_to_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Effective request parameters echoed back in responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adsh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qtr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A list of resources with its size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub items: Vec<Resource>,
    pub total_items: usize,
}

impl From<Vec<Resource>> for Collection {
    fn from(items: Vec<Resource>) -> Self {
        Self {
            total_items: items.len(),
            items,
        }
    }
}

/// `data` member that is either a resource or an empty object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MaybeResource {
    Found(Resource),
    Empty {},
}

impl From<Option<Resource>> for MaybeResource {
    fn from(value: Option<Resource>) -> Self {
        value.map_or(Self::Empty {}, Self::Found)
    }
}

/// Versioned response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub api_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
    pub data: T,
}
