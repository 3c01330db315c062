//! Normalization of raw upstream records into [`ApiEntry`] values.
//!
//! Upstream payloads are loosely typed, so every field is read leniently:
//! strings accept numbers, ids accept numeric strings, lists drop elements of
//! the wrong shape, and anything absent becomes an empty value. A record is
//! never rejected; the worst case is an entry with empty fields.
//!
//! # Type classification
//!
//! | Source | Signal | `type` |
//! |--------|--------|--------|
//! | remote | `display` tag | tag name |
//! | remote | `display` tag is `iframe-documentation` | `html` |
//! | remote | no `display` tag, doc URL ends in `.html` | `html` |
//! | remote | nothing | `swagger` |
//! | local | explicit non-empty `type` | as given |
//! | local | URL ends in `.json` | `swagger` |
//! | local | URL ends in `.raml` | `raml` |
//! | local | anything else | `html` |

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::{ApiEntry, ApiId, ApiSourceKind, Tag, LOCAL_ID_BASE};

pub const TYPE_SWAGGER: &str = "swagger";
pub const TYPE_RAML: &str = "raml";
pub const TYPE_HTML: &str = "html";

const TAG_DISPLAY: &str = "display";
const TAG_PRODUCT: &str = "product";
const TAG_LANGUAGE: &str = "programming-language";
const TYPE_IFRAME: &str = "iframe-documentation";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RemoteApiRecord {
    #[serde(deserialize_with = "lenient::id")]
    id: Option<ApiId>,
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    version: String,
    #[serde(deserialize_with = "lenient::string")]
    api_uid: String,
    #[serde(deserialize_with = "lenient::string")]
    description: String,
    #[serde(deserialize_with = "lenient::string")]
    api_ref_doc_url: String,
    #[serde(deserialize_with = "lenient::tags")]
    tags: Vec<Tag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocalApiRecord {
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    version: String,
    #[serde(deserialize_with = "lenient::string")]
    api_uid: String,
    #[serde(deserialize_with = "lenient::string")]
    description: String,
    #[serde(deserialize_with = "lenient::string")]
    url: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    api_type: String,
    #[serde(deserialize_with = "lenient::string_list")]
    products: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    languages: Vec<String>,
}

fn decode_record<T>(value: Value, source: ApiSourceKind) -> T
where
    T: Default + DeserializeOwned,
{
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(source = %source, error = %e, "Malformed record, using empty fields");
        T::default()
    })
}

/// Normalize one record from the remote registry.
pub fn normalize_remote(value: Value) -> ApiEntry {
    let record: RemoteApiRecord = decode_record(value, ApiSourceKind::Remote);

    let display = record
        .tags
        .iter()
        .find(|t| t.category == TAG_DISPLAY)
        .map(|t| t.name.as_str());
    let api_type = classify_remote_type(display, &record.api_ref_doc_url);

    let products = tag_names(&record.tags, TAG_PRODUCT);
    let languages = tag_names(&record.tags, TAG_LANGUAGE);

    ApiEntry {
        id: record.id.and_then(checked_remote_id),
        name: record.name,
        version: record.version,
        api_uid: record.api_uid,
        description: record.description,
        url: record.api_ref_doc_url,
        api_type,
        products,
        languages,
        source: ApiSourceKind::Remote,
    }
}

/// Normalize one record from the local manifest.
///
/// `index` is the record's position in the manifest; the entry id is
/// `LOCAL_ID_BASE + index`.
pub fn normalize_local(value: Value, index: usize) -> ApiEntry {
    let record: LocalApiRecord = decode_record(value, ApiSourceKind::Local);

    let api_type = if record.api_type.is_empty() {
        infer_local_type(&record.url).to_string()
    } else {
        record.api_type
    };

    ApiEntry {
        id: Some(local_id(index)),
        name: record.name,
        version: record.version,
        api_uid: record.api_uid,
        description: record.description,
        url: record.url,
        api_type,
        products: record.products,
        languages: record.languages,
        source: ApiSourceKind::Local,
    }
}

/// Synthetic id for the local record at `index`.
pub fn local_id(index: usize) -> ApiId {
    LOCAL_ID_BASE + index as ApiId
}

/// Remote ids must stay below [`LOCAL_ID_BASE`]; anything else would collide
/// with the local id space and is dropped.
fn checked_remote_id(id: ApiId) -> Option<ApiId> {
    if id < LOCAL_ID_BASE {
        Some(id)
    } else {
        warn!(
            id,
            boundary = LOCAL_ID_BASE,
            "Remote API id falls inside the local id space, dropping id"
        );
        None
    }
}

fn classify_remote_type(display: Option<&str>, doc_url: &str) -> String {
    match display {
        Some(TYPE_IFRAME) => TYPE_HTML.to_string(),
        // A blank display name counts as no display tag.
        Some(name) if !name.is_empty() => name.to_string(),
        _ if doc_url.ends_with(".html") => TYPE_HTML.to_string(),
        _ => TYPE_SWAGGER.to_string(),
    }
}

/// Infer the documentation type of a local record from its URL suffix.
pub fn infer_local_type(url: &str) -> &'static str {
    if url.ends_with(".json") {
        TYPE_SWAGGER
    } else if url.ends_with(".raml") {
        TYPE_RAML
    } else {
        TYPE_HTML
    }
}

fn tag_names(tags: &[Tag], category: &str) -> Vec<String> {
    tags.iter()
        .filter(|t| t.category == category)
        .map(|t| t.name.clone())
        .collect()
}

/// Field deserializers that never fail on a wrongly-typed value.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::models::Tag;

    pub fn value_to_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Integer parse with `parseInt` leniency: numbers, or strings whose
    /// leading digits form the id (`"42"`, `" 42abc"`).
    pub fn value_to_id(value: &Value) -> Option<u64> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
            Value::String(s) => {
                let digits: String = s
                    .trim_start()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            }
            _ => None,
        }
    }

    pub fn value_to_string_list(value: &Value) -> Vec<String> {
        match value {
            Value::Array(items) => items
                .iter()
                .filter(|v| v.is_string() || v.is_number())
                .map(value_to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn value_to_tags(value: &Value) -> Vec<Tag> {
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_object())
                .map(|obj| Tag {
                    category: obj.get("category").map(value_to_string).unwrap_or_default(),
                    name: obj.get("name").map(value_to_string).unwrap_or_default(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(value_to_string(&Value::deserialize(d)?))
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(value_to_id(&Value::deserialize(d)?))
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(value_to_string_list(&Value::deserialize(d)?))
    }

    pub fn tags<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Tag>, D::Error> {
        Ok(value_to_tags(&Value::deserialize(d)?))
    }
}
