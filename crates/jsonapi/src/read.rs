//! Reading documents back from JSON trees.
//!
//! The polymorphic seams of the format (`data` that is null, an object,
//! or an array; links that are null, a string, or an object; numeric or
//! textual error statuses) are handled here with hand-written
//! deserializers; everything shaped like a plain struct stays on derive.
//!
//! Parsing also un-flattens the document: entries of a top-level
//! `included` array are matched to relationship linkage by
//! (type, id, slug) and spliced back in as full resources, so a parsed
//! document serializes back to the same flattened shape.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::types::{
    Data, Document, ErrorObject, JsonApiInfo, Link, Resource, ResourceIdentifier, ResourceRef,
};

/// Errors from reading JSON:API documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl Document {
    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Parse a document from an already-decoded JSON tree.
    ///
    /// Unknown keys are ignored; structurally impossible shapes (a
    /// non-object document, a scalar where a resource belongs, a
    /// non-string `type`) are errors.
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let Value::Object(map) = value else {
            return Err(DocumentError::NotAnObject(json_kind(value)));
        };

        let data = map.get("data").map(data_from_value).transpose()?;
        let errors: Vec<ErrorObject> = match map.get("errors") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Vec::new(),
        };
        let meta: IndexMap<String, Value> = match map.get("meta") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => IndexMap::new(),
        };
        let links: IndexMap<String, Link> = match map.get("links") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => IndexMap::new(),
        };
        let jsonapi: Option<JsonApiInfo> = match map.get("jsonapi") {
            Some(value) => Some(serde_json::from_value(value.clone())?),
            None => None,
        };
        let included: Vec<Resource> = match map.get("included") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Vec::new(),
        };

        Ok(Document {
            data: data.map(|data| splice_included(data, &included)),
            errors,
            meta,
            links,
            jsonapi,
        })
    }
}

// ── polymorphic seams ────────────────────────────────────────────────

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(Link::Null),
            Value::String(uri) => Ok(Link::Uri(uri)),
            Value::Object(_) => serde_json::from_value(value)
                .map(Link::Object)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "link must be null, a string, or an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Deserializer for relationship `data`: a present `null` becomes the
/// explicit-null linkage rather than an absent field.
pub(crate) fn nullable_data<'de, D>(deserializer: D) -> Result<Option<Data>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    data_from_value(&value)
        .map(Some)
        .map_err(de::Error::custom)
}

/// Deserializer for error `status`: the wire carries decimal text, but a
/// JSON number is accepted and normalized to its text form.
pub(crate) fn lenient_status<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(status) => Ok(Some(status)),
        Value::Number(status) => Ok(Some(status.to_string())),
        other => Err(de::Error::custom(format!(
            "error status must be a string or a number, got {}",
            json_kind(&other)
        ))),
    }
}

fn data_from_value(value: &Value) -> Result<Data, DocumentError> {
    match value {
        Value::Null => Ok(Data::null()),
        Value::Array(entries) => entries
            .iter()
            .map(resource_ref_from_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Data::Many),
        Value::Object(_) => resource_ref_from_value(value).map(Data::One),
        other => Err(DocumentError::InvalidField {
            field: "data",
            reason: format!("expected null, an object, or an array, got {}", json_kind(other)),
        }),
    }
}

/// An object with any body field parses as a full resource; one carrying
/// only identity stays a bare identifier.
fn resource_ref_from_value(value: &Value) -> Result<ResourceRef, DocumentError> {
    match value {
        Value::Null => Ok(ResourceRef::Null),
        Value::Object(map) => {
            let has_body = ["attributes", "relationships", "links", "meta"]
                .iter()
                .any(|key| map.contains_key(*key));
            if has_body {
                let resource: Resource = serde_json::from_value(value.clone())?;
                Ok(ResourceRef::Resource(Box::new(resource)))
            } else {
                let identity: ResourceIdentifier = serde_json::from_value(value.clone())?;
                Ok(ResourceRef::Identifier(identity))
            }
        }
        other => Err(DocumentError::InvalidField {
            field: "data",
            reason: format!("resource must be null or an object, got {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── un-flattening ────────────────────────────────────────────────────

type IdentityKey = (Option<String>, Option<String>, Option<String>);

fn identity_key(identity: &ResourceIdentifier) -> IdentityKey {
    (
        identity.resource_type.clone(),
        identity.id.clone(),
        identity.slug.clone(),
    )
}

fn splice_included(data: Data, included: &[Resource]) -> Data {
    if included.is_empty() {
        return data;
    }
    let mut pool: HashMap<IdentityKey, &Resource> = HashMap::new();
    for resource in included {
        pool.entry(identity_key(&resource.identity)).or_insert(resource);
    }
    let mut in_flight = HashSet::new();
    splice_data(data, &pool, &mut in_flight)
}

fn splice_data(
    data: Data,
    pool: &HashMap<IdentityKey, &Resource>,
    in_flight: &mut HashSet<IdentityKey>,
) -> Data {
    match data {
        Data::One(entry) => Data::One(splice_ref(entry, pool, in_flight)),
        Data::Many(entries) => Data::Many(
            entries
                .into_iter()
                .map(|entry| splice_ref(entry, pool, in_flight))
                .collect(),
        ),
    }
}

fn splice_ref(
    entry: ResourceRef,
    pool: &HashMap<IdentityKey, &Resource>,
    in_flight: &mut HashSet<IdentityKey>,
) -> ResourceRef {
    match entry {
        ResourceRef::Null => ResourceRef::Null,
        ResourceRef::Identifier(identity) => {
            let key = identity_key(&identity);
            match pool.get(&key) {
                Some(body) if !in_flight.contains(&key) => {
                    in_flight.insert(key.clone());
                    let expanded = splice_resource((*body).clone(), pool, in_flight);
                    in_flight.remove(&key);
                    ResourceRef::Resource(Box::new(expanded))
                }
                // Re-entry onto a body already being expanded stays a
                // bare identifier; the model is a tree.
                _ => ResourceRef::Identifier(identity),
            }
        }
        ResourceRef::Resource(resource) => {
            let key = identity_key(&resource.identity);
            in_flight.insert(key.clone());
            let expanded = splice_resource(*resource, pool, in_flight);
            in_flight.remove(&key);
            ResourceRef::Resource(Box::new(expanded))
        }
    }
}

fn splice_resource(
    mut resource: Resource,
    pool: &HashMap<IdentityKey, &Resource>,
    in_flight: &mut HashSet<IdentityKey>,
) -> Resource {
    for relationship in resource.relationships.values_mut() {
        if let Some(data) = relationship.data.take() {
            relationship.data = Some(splice_data(data, pool, in_flight));
        }
    }
    resource
}
