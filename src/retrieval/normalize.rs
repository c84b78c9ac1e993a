// src/retrieval/normalize.rs
//! Response-shape normalization shared by every provider.
//!
//! Providers answer with either an array of records or a single object
//! (company profile). Both become a `Vec<OpportunityRecord>` here, so nothing
//! downstream branches on "is this a sequence".

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::types::{CompanyProfile, OpportunityRecord, RecordVariant};
use super::RetrievalError;
use crate::dates::parse_timestamp;

/// Wire record. Every field is optional and tolerant of type drift.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    source: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    link: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    founded: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    product_range: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    website: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    address: Option<String>,
}

fn text_of(v: Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(d)?.and_then(text_of))
}

fn lenient_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(text_of).collect(),
        Some(other) => text_of(other).into_iter().collect(),
        None => Vec::new(),
    })
}

impl RawRecord {
    fn into_record(self) -> OpportunityRecord {
        if self.title.is_none() {
            if let Some(company_name) = self.company_name {
                return OpportunityRecord {
                    variant: RecordVariant::Profile,
                    id: self.id,
                    title: company_name.clone(),
                    summary: self.summary.or(self.description),
                    source: self.source,
                    date: self.date.or(self.pub_date).as_deref().and_then(parse_timestamp),
                    link: self.website.clone().or(self.link),
                    profile: Some(CompanyProfile {
                        company_name,
                        founded: self.founded,
                        product_range: self.product_range,
                        website: self.website,
                        address: self.address,
                    }),
                };
            }
        }

        let summary = self.summary.or(self.description);
        let raw_date = self.date.or(self.pub_date);
        let variant = if summary.is_none() && self.source.is_none() && raw_date.is_none() {
            RecordVariant::LinkOnly
        } else {
            RecordVariant::Standard
        };

        OpportunityRecord {
            variant,
            id: self.id,
            title: self.title.unwrap_or_default(),
            summary,
            source: self.source,
            date: raw_date.as_deref().and_then(parse_timestamp),
            link: self.link,
            profile: None,
        }
    }
}

fn record_from_object(map: Map<String, Value>) -> OpportunityRecord {
    // Lenient field decoders accept any JSON value, so this only falls back
    // on pathological input.
    serde_json::from_value::<RawRecord>(Value::Object(map))
        .unwrap_or_default()
        .into_record()
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Array → records in order; object → one record; `null` → empty.
pub fn normalize_value(value: Value) -> Result<Vec<OpportunityRecord>, RetrievalError> {
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                Value::Object(map) => Some(record_from_object(map)),
                other => {
                    tracing::debug!(index, kind = kind_of(&other), "skipping non-object element");
                    None
                }
            })
            .collect()),
        Value::Object(map) => Ok(vec![record_from_object(map)]),
        Value::Null => Ok(Vec::new()),
        other => Err(RetrievalError::Shape(kind_of(&other))),
    }
}

pub fn normalize_body(body: &str) -> Result<Vec<OpportunityRecord>, RetrievalError> {
    let value: Value = serde_json::from_str(body)?;
    normalize_value(value)
}
