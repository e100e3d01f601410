//! Marketplace listing produced by the listing generation call
//!
//! Text models answer with JSON, JSON inside a code fence, or prose. JSON
//! forms become `Listing::Structured`; anything else is kept verbatim as
//! `Listing::Raw` instead of failing the stage.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

/// Fenced block tagged as JSON (compiled once)
static JSON_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```json[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```").expect("json fence regex is valid")
});

/// Untagged fenced block (compiled once)
static PLAIN_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```").expect("plain fence regex is valid")
});

/// Structured listing fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// Unique, in the order the model produced them
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
}

/// Generated listing: structured fields or the raw model text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing {
    Raw {
        #[serde(rename = "rawContent")]
        raw_content: String,
    },
    Structured(ListingDetails),
}

/// Lenient wire shape of the model's JSON answer
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingWire {
    title: Option<Value>,
    description: Option<Value>,
    features: Option<Value>,
    tags: Option<Value>,
    price_range: Option<Value>,
}

impl Listing {
    /// Interpret the model's text answer
    pub fn from_model_text(content: &str) -> Listing {
        let candidate = JSON_FENCE_REGEX
            .captures(content)
            .or_else(|| PLAIN_FENCE_REGEX.captures(content))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(content)
            .trim();

        match serde_json::from_str::<ListingWire>(candidate) {
            Ok(wire) if wire.has_known_field() => Listing::Structured(wire.into_details()),
            Ok(_) => {
                tracing::debug!("Listing JSON carried no listing fields, keeping raw text");
                Listing::raw(content)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Listing response is not JSON, keeping raw text");
                Listing::raw(content)
            }
        }
    }

    pub fn raw(content: &str) -> Listing {
        Listing::Raw {
            raw_content: content.to_string(),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Listing::Raw { .. })
    }

    pub fn details(&self) -> Option<&ListingDetails> {
        match self {
            Listing::Structured(details) => Some(details),
            Listing::Raw { .. } => None,
        }
    }

    pub fn raw_content(&self) -> Option<&str> {
        match self {
            Listing::Raw { raw_content } => Some(raw_content),
            Listing::Structured(_) => None,
        }
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}

fn value_to_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(value_to_text).collect(),
        Value::String(s) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        other => value_to_text(other).into_iter().collect(),
    }
}

impl ListingWire {
    fn has_known_field(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.features.is_some()
            || self.tags.is_some()
            || self.price_range.is_some()
    }

    fn into_details(self) -> ListingDetails {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags.map(value_to_list).unwrap_or_default() {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        ListingDetails {
            title: self.title.and_then(value_to_text).unwrap_or_default(),
            description: self.description.and_then(value_to_text).unwrap_or_default(),
            features: self.features.map(value_to_list).unwrap_or_default(),
            tags,
            price_range: self.price_range.and_then(value_to_text),
        }
    }
}
