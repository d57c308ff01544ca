//! Serialization of [`Document`] graphs into ordered JSON trees.
//!
//! [`Serializer::serialize`] walks a document and produces a
//! `serde_json::Value` in the JSON:API document shape. Optional fields
//! whose serialized value comes out empty are dropped rather than emitted
//! as `{}` or `[]`, resources reached through relationship linkage are
//! collected once each into the top-level `included` array, and explicit
//! null markers survive as JSON `null`.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::types::{
    Data, Document, ErrorObject, ErrorSource, Hreflang, JsonApiInfo, Link, LinkObject,
    Relationship, Resource, ResourceIdentifier, ResourceRef,
};

/// Walks [`Document`] graphs and produces ordered JSON trees.
///
/// One serializer drives one serialization pass at a time: linked
/// resources accumulate in an internal map during the walk and are taken
/// out as the `included` array when the pass completes. An instance can be
/// reused for the next document but must not be shared across concurrent
/// passes.
///
/// # Example
///
/// ```
/// use jsonapi::v1::{Document, Relationship, Resource, Serializer};
///
/// let author = Resource::new("9", "people").with_attribute("name", "Kate");
/// let article = Resource::new("1", "articles")
///     .with_attribute("title", "Rust without fear")
///     .with_relationship("author", Relationship::to_one(author));
///
/// let tree = Serializer::new()
///     .serialize(&Document::from_data(article))
///     .unwrap();
///
/// assert_eq!(tree["data"]["relationships"]["author"]["data"]["id"], "9");
/// assert_eq!(tree["included"][0]["attributes"]["name"], "Kate");
/// ```
#[derive(Debug, Default)]
pub struct Serializer {
    /// Linked resource bodies keyed by `"{id}:{slug}"`, in first-encounter
    /// order. `None` marks a body still being serialized, which is what
    /// stops a cyclic walk from re-entering it.
    included: IndexMap<String, Option<Value>>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a document.
    ///
    /// Returns `None` when the document has no content: none of `data`,
    /// `errors`, or `meta` survived serialization. Top-level `links` and
    /// `jsonapi` alone do not make a document.
    pub fn serialize(&mut self, document: &Document) -> Option<Value> {
        let mut out = Map::new();
        if let Some(data) = &document.data
            && let Some(value) = self.serialize_data(data)
        {
            out.insert("data".to_string(), value);
        }
        if let Some(errors) = serialize_errors(&document.errors) {
            out.insert("errors".to_string(), errors);
        }
        if let Some(meta) = serialize_map(&document.meta) {
            out.insert("meta".to_string(), meta);
        }
        if let Some(links) = serialize_links(&document.links) {
            out.insert("links".to_string(), links);
        }
        if let Some(jsonapi) = document.jsonapi.as_ref().and_then(serialize_jsonapi) {
            out.insert("jsonapi".to_string(), jsonapi);
        }

        // The accumulator is drained even when the document turns out
        // empty, so the serializer is clean for the next pass.
        let included: Vec<Value> = std::mem::take(&mut self.included)
            .into_values()
            .flatten()
            .collect();

        if !out.contains_key("data") && !out.contains_key("errors") && !out.contains_key("meta") {
            return None;
        }
        if !included.is_empty() {
            out.insert("included".to_string(), Value::Array(included));
        }
        Some(Value::Object(out))
    }

    /// Primary data: full resource objects. Entries that serialize to
    /// absent are dropped; an emptied sequence drops the field entirely.
    fn serialize_data(&mut self, data: &Data) -> Option<Value> {
        match data {
            Data::One(entry) => self.serialize_resource(entry),
            Data::Many(entries) => {
                let items: Vec<Value> = entries
                    .iter()
                    .filter_map(|entry| self.serialize_resource(entry))
                    .collect();
                if items.is_empty() {
                    None
                } else {
                    Some(Value::Array(items))
                }
            }
        }
    }

    /// Relationship linkage: identifier objects only, same shape handling
    /// as [`Self::serialize_data`].
    fn serialize_linkage(&mut self, data: &Data) -> Option<Value> {
        match data {
            Data::One(entry) => self.serialize_resource_identifier(entry),
            Data::Many(entries) => {
                let items: Vec<Value> = entries
                    .iter()
                    .filter_map(|entry| self.serialize_resource_identifier(entry))
                    .collect();
                if items.is_empty() {
                    None
                } else {
                    Some(Value::Array(items))
                }
            }
        }
    }

    fn serialize_resource(&mut self, entry: &ResourceRef) -> Option<Value> {
        match entry {
            ResourceRef::Null => Some(Value::Null),
            ResourceRef::Identifier(identity) => identifier_object(identity),
            ResourceRef::Resource(resource) => self.resource_object(resource),
        }
    }

    /// Linkage to a full resource emits its identifier here and pulls the
    /// body into `included`; linkage to a bare identifier emits only the
    /// identifier.
    fn serialize_resource_identifier(&mut self, entry: &ResourceRef) -> Option<Value> {
        match entry {
            ResourceRef::Null => Some(Value::Null),
            ResourceRef::Identifier(identity) => identifier_object(identity),
            ResourceRef::Resource(resource) => {
                let value = identifier_object(&resource.identity)?;
                self.include(resource);
                Some(value)
            }
        }
    }

    /// Full resource body. Validity is checked after the build, so
    /// relationship traversal reaches linked resources even when the
    /// resource itself ends up dropped.
    fn resource_object(&mut self, resource: &Resource) -> Option<Value> {
        let mut out = Map::new();
        insert_identity(&mut out, &resource.identity);
        if let Some(attributes) = serialize_map(&resource.attributes) {
            out.insert("attributes".to_string(), attributes);
        }
        if let Some(relationships) = self.serialize_relationships(&resource.relationships) {
            out.insert("relationships".to_string(), relationships);
        }
        if let Some(links) = serialize_links(&resource.links) {
            out.insert("links".to_string(), links);
        }
        if let Some(meta) = serialize_map(&resource.meta) {
            out.insert("meta".to_string(), meta);
        }
        if out.contains_key("id") && out.contains_key("type") {
            Some(Value::Object(out))
        } else {
            None
        }
    }

    fn serialize_relationships(
        &mut self,
        relationships: &IndexMap<String, Relationship>,
    ) -> Option<Value> {
        let mut out = Map::new();
        for (name, relationship) in relationships {
            if let Some(value) = self.serialize_relationship(relationship) {
                out.insert(name.clone(), value);
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(Value::Object(out))
        }
    }

    fn serialize_relationship(&mut self, relationship: &Relationship) -> Option<Value> {
        let mut out = Map::new();
        if let Some(data) = &relationship.data
            && let Some(value) = self.serialize_linkage(data)
        {
            out.insert("data".to_string(), value);
        }
        if let Some(links) = serialize_links(&relationship.links) {
            out.insert("links".to_string(), links);
        }
        if let Some(meta) = serialize_map(&relationship.meta) {
            out.insert("meta".to_string(), meta);
        }
        if out.is_empty() {
            None
        } else {
            Some(Value::Object(out))
        }
    }

    /// Record a linked resource for the `included` array.
    ///
    /// First write wins: a key already present is never overwritten or
    /// re-serialized. The slot is reserved before the body is walked, so a
    /// cycle through this resource's relationships stops here instead of
    /// recursing. Bodies that carry nothing beyond their identity are not
    /// kept; the identifier is already inlined at the linkage site.
    fn include(&mut self, resource: &Resource) {
        let key = format!(
            "{}:{}",
            resource.identity.id.as_deref().unwrap_or_default(),
            resource.identity.slug.as_deref().unwrap_or_default()
        );
        if self.included.contains_key(&key) {
            return;
        }
        self.included.insert(key.clone(), None);
        match self.resource_object(resource) {
            Some(body) if has_body_content(&body) => {
                self.included.insert(key, Some(body));
            }
            _ => {
                self.included.shift_remove(&key);
            }
        }
    }
}

impl Document {
    /// Serialize with a fresh [`Serializer`].
    ///
    /// `None` means the document has no content; see
    /// [`Serializer::serialize`].
    pub fn to_value(&self) -> Option<Value> {
        Serializer::new().serialize(self)
    }
}

fn identifier_object(identity: &ResourceIdentifier) -> Option<Value> {
    let mut out = Map::new();
    insert_identity(&mut out, identity);
    if out.contains_key("id") && out.contains_key("type") {
        Some(Value::Object(out))
    } else {
        None
    }
}

fn insert_identity(out: &mut Map<String, Value>, identity: &ResourceIdentifier) {
    if let Some(id) = &identity.id {
        out.insert("id".to_string(), Value::String(id.clone()));
    }
    if let Some(resource_type) = &identity.resource_type {
        out.insert("type".to_string(), Value::String(resource_type.clone()));
    }
    if let Some(slug) = &identity.slug {
        out.insert("slug".to_string(), Value::String(slug.clone()));
    }
}

fn has_body_content(body: &Value) -> bool {
    body.as_object().is_some_and(|map| {
        ["attributes", "relationships", "links", "meta"]
            .iter()
            .any(|key| map.contains_key(*key))
    })
}

fn serialize_map(map: &IndexMap<String, Value>) -> Option<Value> {
    if map.is_empty() {
        return None;
    }
    Some(Value::Object(
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
    ))
}

fn serialize_links(links: &IndexMap<String, Link>) -> Option<Value> {
    let mut out = Map::new();
    for (name, link) in links {
        if let Some(value) = serialize_link(link) {
            out.insert(name.clone(), value);
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(Value::Object(out))
    }
}

fn serialize_link(link: &Link) -> Option<Value> {
    match link {
        Link::Null => Some(Value::Null),
        Link::Uri(uri) => Some(Value::String(uri.clone())),
        Link::Object(object) => serialize_link_object(object),
    }
}

/// A link without an `href` is meaningless and drops entirely, however
/// populated its other fields are.
fn serialize_link_object(object: &LinkObject) -> Option<Value> {
    let mut out = Map::new();
    if let Some(href) = &object.href {
        out.insert("href".to_string(), Value::String(href.clone()));
    }
    if let Some(rel) = &object.rel {
        out.insert("rel".to_string(), Value::String(rel.clone()));
    }
    if let Some(describedby) = &object.describedby
        && let Some(value) = serialize_link(describedby)
    {
        out.insert("describedby".to_string(), value);
    }
    if let Some(title) = &object.title {
        out.insert("title".to_string(), Value::String(title.clone()));
    }
    if let Some(media_type) = &object.media_type {
        out.insert("type".to_string(), Value::String(media_type.clone()));
    }
    if let Some(hreflang) = object.hreflang.as_ref().and_then(serialize_hreflang) {
        out.insert("hreflang".to_string(), hreflang);
    }
    if let Some(meta) = serialize_map(&object.meta) {
        out.insert("meta".to_string(), meta);
    }
    if out.contains_key("href") {
        Some(Value::Object(out))
    } else {
        None
    }
}

fn serialize_hreflang(hreflang: &Hreflang) -> Option<Value> {
    match hreflang {
        Hreflang::One(tag) => Some(Value::String(tag.clone())),
        Hreflang::Many(tags) if tags.is_empty() => None,
        Hreflang::Many(tags) => Some(Value::Array(
            tags.iter().cloned().map(Value::String).collect(),
        )),
    }
}

fn serialize_errors(errors: &[ErrorObject]) -> Option<Value> {
    let items: Vec<Value> = errors.iter().filter_map(serialize_error).collect();
    if items.is_empty() {
        None
    } else {
        Some(Value::Array(items))
    }
}

fn serialize_error(error: &ErrorObject) -> Option<Value> {
    let mut out = Map::new();
    if let Some(id) = &error.id {
        out.insert("id".to_string(), Value::String(id.clone()));
    }
    if let Some(links) = serialize_links(&error.links) {
        out.insert("links".to_string(), links);
    }
    if let Some(status) = &error.status {
        out.insert("status".to_string(), Value::String(status.clone()));
    }
    if let Some(code) = &error.code {
        out.insert("code".to_string(), Value::String(code.clone()));
    }
    if let Some(title) = &error.title {
        out.insert("title".to_string(), Value::String(title.clone()));
    }
    if let Some(detail) = &error.detail {
        out.insert("detail".to_string(), Value::String(detail.clone()));
    }
    if let Some(source) = error.source.as_ref().and_then(serialize_source) {
        out.insert("source".to_string(), source);
    }
    if let Some(meta) = serialize_map(&error.meta) {
        out.insert("meta".to_string(), meta);
    }
    if out.is_empty() {
        None
    } else {
        Some(Value::Object(out))
    }
}

fn serialize_source(source: &ErrorSource) -> Option<Value> {
    let mut out = Map::new();
    if let Some(pointer) = &source.pointer {
        out.insert("pointer".to_string(), Value::String(pointer.clone()));
    }
    if let Some(parameter) = &source.parameter {
        out.insert("parameter".to_string(), Value::String(parameter.clone()));
    }
    if let Some(header) = &source.header {
        out.insert("header".to_string(), Value::String(header.clone()));
    }
    if out.is_empty() {
        None
    } else {
        Some(Value::Object(out))
    }
}

fn serialize_jsonapi(info: &JsonApiInfo) -> Option<Value> {
    let mut out = Map::new();
    if let Some(version) = &info.version {
        out.insert("version".to_string(), Value::String(version.clone()));
    }
    if !info.ext.is_empty() {
        out.insert(
            "ext".to_string(),
            Value::Array(info.ext.iter().cloned().map(Value::String).collect()),
        );
    }
    if !info.profile.is_empty() {
        out.insert(
            "profile".to_string(),
            Value::Array(info.profile.iter().cloned().map(Value::String).collect()),
        );
    }
    if let Some(meta) = serialize_map(&info.meta) {
        out.insert("meta".to_string(), meta);
    }
    if out.is_empty() {
        None
    } else {
        Some(Value::Object(out))
    }
}
