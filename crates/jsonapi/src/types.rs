use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// A JSON:API document, the top-level envelope of every request and
/// response body.
///
/// A document carries primary data, errors, or metadata (at least one of
/// the three for the document to serialize at all), plus optional
/// top-level links and a `jsonapi` implementation-info block.
///
/// # Minimal JSON for each flavor
///
/// **Resource document**:
/// ```json
/// {
///   "data": { "id": "1", "type": "articles", "attributes": { "title": "…" } }
/// }
/// ```
///
/// **Error document**:
/// ```json
/// {
///   "errors": [ { "status": "404", "title": "Not Found" } ]
/// }
/// ```
///
/// **Meta document**:
/// ```json
/// {
///   "meta": { "copyright": "…" }
/// }
/// ```
///
/// # Builder API
///
/// ```
/// use jsonapi::v1::{Document, Resource};
///
/// let doc = Document::from_data(
///     Resource::new("1", "articles").with_attribute("title", "Hello"),
/// )
/// .with_link("self", "https://example.com/articles/1");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub data: Option<Data>,
    pub errors: Vec<ErrorObject>,
    pub meta: IndexMap<String, Value>,
    pub links: IndexMap<String, Link>,
    pub jsonapi: Option<JsonApiInfo>,
}

// ============================================================================
// Resources
// ============================================================================

/// Identifies a resource without carrying its body.
///
/// An identifier serializes only when both `id` and `resource_type` are
/// present. `slug` is a non-standard extension field carried alongside the
/// standard pair; two resources sharing an `id` but differing in `slug` are
/// treated as distinct during de-duplication.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(default)]
    pub id: Option<String>,
    /// Serialized as `"type"`.
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A full resource object: identity plus attributes, relationships, links,
/// and meta.
///
/// All four maps are independently optional; an empty map is treated as
/// absent when the resource is serialized.
///
/// # Builder API
///
/// ```
/// use jsonapi::v1::{Relationship, Resource};
///
/// let author = Resource::new("9", "people").with_attribute("name", "Kate");
/// let article = Resource::new("1", "articles")
///     .with_attribute("title", "Rust without fear")
///     .with_relationship("author", Relationship::to_one(author))
///     .with_link("self", "https://example.com/articles/1");
/// ```
///
/// # JSON shape
///
/// ```json
/// {
///   "id": "1",
///   "type": "articles",
///   "attributes": { "title": "Rust without fear" },
///   "relationships": { "author": { "data": { "id": "9", "type": "people" } } },
///   "links": { "self": "https://example.com/articles/1" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Resource {
    #[serde(flatten)]
    pub identity: ResourceIdentifier,
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
    #[serde(default)]
    pub relationships: IndexMap<String, Relationship>,
    #[serde(default)]
    pub links: IndexMap<String, Link>,
    #[serde(default)]
    pub meta: IndexMap<String, Value>,
}

/// One entry of primary data or relationship linkage.
///
/// `Null` is the explicit-null marker: it survives serialization as a JSON
/// `null` rather than being omitted, which is how an empty to-one
/// relationship is expressed on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRef {
    Null,
    Identifier(ResourceIdentifier),
    Resource(Box<Resource>),
}

/// Primary data of a document, or the linkage of a relationship: a single
/// resource reference or an ordered sequence of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    One(ResourceRef),
    Many(Vec<ResourceRef>),
}

impl Data {
    /// Explicit `"data": null`.
    pub fn null() -> Self {
        Data::One(ResourceRef::Null)
    }
}

// ============================================================================
// Relationships
// ============================================================================

/// A named connection from one resource to others: linkage plus its own
/// links and meta.
///
/// A relationship whose three parts all serialize to absent is dropped
/// entirely. Linkage to a full [`Resource`] pulls that resource's body into
/// the document's `included` collection during serialization; linkage to a
/// bare [`ResourceIdentifier`] does not.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Relationship {
    #[serde(default, deserialize_with = "crate::read::nullable_data")]
    pub data: Option<Data>,
    #[serde(default)]
    pub links: IndexMap<String, Link>,
    #[serde(default)]
    pub meta: IndexMap<String, Value>,
}

impl Relationship {
    /// To-one linkage.
    pub fn to_one(target: impl Into<ResourceRef>) -> Self {
        Self {
            data: Some(Data::One(target.into())),
            ..Self::default()
        }
    }

    /// To-many linkage, in the given order.
    pub fn to_many<T: Into<ResourceRef>>(targets: impl IntoIterator<Item = T>) -> Self {
        Self {
            data: Some(Data::Many(targets.into_iter().map(Into::into).collect())),
            ..Self::default()
        }
    }

    /// Empty to-one linkage (`"data": null`).
    pub fn empty() -> Self {
        Self {
            data: Some(Data::null()),
            ..Self::default()
        }
    }

    pub fn with_link(mut self, name: impl Into<String>, link: impl Into<Link>) -> Self {
        self.links.insert(name.into(), link.into());
        self
    }

    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }
}

// ============================================================================
// Links
// ============================================================================

/// A link value: a bare URI string, a full link object, or an explicit
/// `null` marker.
///
/// `Null` serializes to JSON `null` (an encoder that distinguishes absent
/// keys from explicit nulls sees the difference). A [`LinkObject`] without
/// an `href` serializes to absent regardless of its other fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    Null,
    Uri(String),
    Object(LinkObject),
}

/// The object form of a [`Link`].
///
/// # JSON shape
///
/// ```json
/// {
///   "href": "https://example.com/articles/1/comments",
///   "title": "Comments",
///   "type": "application/vnd.api+json",
///   "hreflang": ["en", "de"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LinkObject {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub describedby: Option<Box<Link>>,
    #[serde(default)]
    pub title: Option<String>,
    /// Serialized as `"type"`.
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub hreflang: Option<Hreflang>,
    #[serde(default)]
    pub meta: IndexMap<String, Value>,
}

impl LinkObject {
    /// Start a link object from its target.
    pub fn href(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    pub fn with_describedby(mut self, link: impl Into<Link>) -> Self {
        self.describedby = Some(Box::new(link.into()));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_hreflang(mut self, hreflang: Hreflang) -> Self {
        self.hreflang = Some(hreflang);
        self
    }

    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }
}

/// One language tag or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Hreflang {
    One(String),
    Many(Vec<String>),
}

// ============================================================================
// Errors
// ============================================================================

/// One failure, in the wire shape of a JSON:API error object.
///
/// `status` is the HTTP status as decimal text; [`detect_status`] folds the
/// statuses of all serialized errors into a single response code.
///
/// [`detect_status`]: crate::v1::detect_status
///
/// # Builder API
///
/// ```
/// use jsonapi::v1::{ErrorObject, ErrorSource};
///
/// let error = ErrorObject::new()
///     .with_status("422")
///     .with_title("Invalid attribute")
///     .with_source(ErrorSource::pointer("/data/attributes/title"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub links: IndexMap<String, Link>,
    #[serde(default, deserialize_with = "crate::read::lenient_status")]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub source: Option<ErrorSource>,
    #[serde(default)]
    pub meta: IndexMap<String, Value>,
}

impl ErrorObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_source(mut self, source: ErrorSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_link(mut self, name: impl Into<String>, link: impl Into<Link>) -> Self {
        self.links.insert(name.into(), link.into());
        self
    }

    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }
}

/// Where in the request an error originated.
///
/// At most one of the three fields is meaningful per the format, but all
/// that are present are serialized.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorSource {
    #[serde(default)]
    pub pointer: Option<String>,
    #[serde(default)]
    pub parameter: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
}

impl ErrorSource {
    /// A JSON pointer into the request document.
    pub fn pointer(pointer: impl Into<String>) -> Self {
        Self {
            pointer: Some(pointer.into()),
            ..Self::default()
        }
    }

    /// A query parameter name.
    pub fn parameter(parameter: impl Into<String>) -> Self {
        Self {
            parameter: Some(parameter.into()),
            ..Self::default()
        }
    }

    /// A request header name.
    pub fn header(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            ..Self::default()
        }
    }
}

// ============================================================================
// Implementation info
// ============================================================================

/// The top-level `jsonapi` object: format version plus applied extensions
/// and profiles.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JsonApiInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub ext: Vec<String>,
    #[serde(default)]
    pub profile: Vec<String>,
    #[serde(default)]
    pub meta: IndexMap<String, Value>,
}

impl JsonApiInfo {
    pub fn version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::default()
        }
    }

    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext.push(ext.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile.push(profile.into());
        self
    }

    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }
}

// ============================================================================
// Convenience methods
// ============================================================================

impl ResourceIdentifier {
    /// Create an identifier with the required pair.
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            resource_type: Some(resource_type.into()),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

impl Resource {
    /// Create a resource with the required identity pair and empty body.
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            identity: ResourceIdentifier::new(id, resource_type),
            ..Self::default()
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.identity.slug = Some(slug.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_relationship(mut self, name: impl Into<String>, relationship: Relationship) -> Self {
        self.relationships.insert(name.into(), relationship);
        self
    }

    pub fn with_link(mut self, name: impl Into<String>, link: impl Into<Link>) -> Self {
        self.links.insert(name.into(), link.into());
        self
    }

    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }
}

impl Document {
    /// Create a document around primary data.
    pub fn from_data(data: impl Into<Data>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    /// Create an error document.
    pub fn from_errors(errors: Vec<ErrorObject>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }

    pub fn with_link(mut self, name: impl Into<String>, link: impl Into<Link>) -> Self {
        self.links.insert(name.into(), link.into());
        self
    }

    pub fn with_jsonapi(mut self, info: JsonApiInfo) -> Self {
        self.jsonapi = Some(info);
        self
    }
}

impl From<Resource> for ResourceRef {
    fn from(resource: Resource) -> Self {
        ResourceRef::Resource(Box::new(resource))
    }
}

impl From<ResourceIdentifier> for ResourceRef {
    fn from(identity: ResourceIdentifier) -> Self {
        ResourceRef::Identifier(identity)
    }
}

impl From<Resource> for Data {
    fn from(resource: Resource) -> Self {
        Data::One(resource.into())
    }
}

impl From<ResourceIdentifier> for Data {
    fn from(identity: ResourceIdentifier) -> Self {
        Data::One(identity.into())
    }
}

impl From<ResourceRef> for Data {
    fn from(entry: ResourceRef) -> Self {
        Data::One(entry)
    }
}

impl From<Vec<Resource>> for Data {
    fn from(resources: Vec<Resource>) -> Self {
        Data::Many(resources.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<ResourceRef>> for Data {
    fn from(entries: Vec<ResourceRef>) -> Self {
        Data::Many(entries)
    }
}

impl From<&str> for Link {
    fn from(uri: &str) -> Self {
        Link::Uri(uri.to_string())
    }
}

impl From<String> for Link {
    fn from(uri: String) -> Self {
        Link::Uri(uri)
    }
}

impl From<LinkObject> for Link {
    fn from(object: LinkObject) -> Self {
        Link::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let resource = Resource::new("1", "articles")
            .with_slug("rust-without-fear")
            .with_attribute("title", "Rust without fear")
            .with_link("self", "https://example.com/articles/1")
            .with_meta("revision", 3);

        assert_eq!(resource.identity.id.as_deref(), Some("1"));
        assert_eq!(resource.identity.resource_type.as_deref(), Some("articles"));
        assert_eq!(resource.identity.slug.as_deref(), Some("rust-without-fear"));
        assert_eq!(resource.attributes["title"], "Rust without fear");
        assert_eq!(
            resource.links["self"],
            Link::Uri("https://example.com/articles/1".to_string())
        );
        assert_eq!(resource.meta["revision"], 3);
    }

    #[test]
    fn test_relationship_to_one() {
        let rel = Relationship::to_one(ResourceIdentifier::new("9", "people"));
        match rel.data {
            Some(Data::One(ResourceRef::Identifier(identity))) => {
                assert_eq!(identity.id.as_deref(), Some("9"));
            }
            other => panic!("Expected identifier linkage, got {:?}", other),
        }
    }

    #[test]
    fn test_relationship_to_many_preserves_order() {
        let rel = Relationship::to_many(vec![
            ResourceIdentifier::new("2", "comments"),
            ResourceIdentifier::new("1", "comments"),
        ]);
        match rel.data {
            Some(Data::Many(entries)) => {
                assert_eq!(entries.len(), 2);
                match &entries[0] {
                    ResourceRef::Identifier(identity) => {
                        assert_eq!(identity.id.as_deref(), Some("2"))
                    }
                    other => panic!("Expected identifier, got {:?}", other),
                }
            }
            other => panic!("Expected to-many linkage, got {:?}", other),
        }
    }

    #[test]
    fn test_relationship_empty_is_explicit_null() {
        let rel = Relationship::empty();
        assert_eq!(rel.data, Some(Data::One(ResourceRef::Null)));
    }

    #[test]
    fn test_full_resource_linkage_boxes() {
        let rel = Relationship::to_one(Resource::new("9", "people").with_attribute("name", "Kate"));
        match rel.data {
            Some(Data::One(ResourceRef::Resource(resource))) => {
                assert_eq!(resource.attributes["name"], "Kate");
            }
            other => panic!("Expected full resource linkage, got {:?}", other),
        }
    }

    #[test]
    fn test_link_object_builder() {
        let link = LinkObject::href("https://example.com/docs")
            .with_rel("describedby")
            .with_title("Docs")
            .with_media_type("text/html")
            .with_hreflang(Hreflang::Many(vec!["en".into(), "de".into()]));

        assert_eq!(link.href.as_deref(), Some("https://example.com/docs"));
        assert_eq!(link.rel.as_deref(), Some("describedby"));
        assert_eq!(link.media_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn test_error_builder() {
        let error = ErrorObject::new()
            .with_id("e-1")
            .with_status("422")
            .with_code("invalid")
            .with_title("Invalid attribute")
            .with_detail("Title must not be blank")
            .with_source(ErrorSource::pointer("/data/attributes/title"));

        assert_eq!(error.status.as_deref(), Some("422"));
        assert_eq!(
            error.source.unwrap().pointer.as_deref(),
            Some("/data/attributes/title")
        );
    }

    #[test]
    fn test_error_source_constructors() {
        assert_eq!(
            ErrorSource::parameter("page").parameter.as_deref(),
            Some("page")
        );
        assert_eq!(
            ErrorSource::header("Accept").header.as_deref(),
            Some("Accept")
        );
        assert!(ErrorSource::header("Accept").pointer.is_none());
    }

    #[test]
    fn test_jsonapi_info_builder() {
        let info = JsonApiInfo::version("1.1")
            .with_ext("https://jsonapi.org/ext/atomic")
            .with_profile("https://example.com/profiles/timestamps");

        assert_eq!(info.version.as_deref(), Some("1.1"));
        assert_eq!(info.ext.len(), 1);
        assert_eq!(info.profile.len(), 1);
    }

    #[test]
    fn test_document_builder() {
        let doc = Document::from_data(Resource::new("1", "articles"))
            .with_meta("count", 1)
            .with_link("self", "https://example.com/articles")
            .with_jsonapi(JsonApiInfo::version("1.1"));

        assert!(doc.data.is_some());
        assert!(doc.errors.is_empty());
        assert_eq!(doc.meta["count"], 1);
        assert!(doc.jsonapi.is_some());
    }

    #[test]
    fn test_data_conversions() {
        let one: Data = Resource::new("1", "articles").into();
        assert!(matches!(one, Data::One(ResourceRef::Resource(_))));

        let many: Data = vec![Resource::new("1", "articles"), Resource::new("2", "articles")].into();
        match many {
            Data::Many(entries) => assert_eq!(entries.len(), 2),
            other => panic!("Expected to-many data, got {:?}", other),
        }

        assert_eq!(Data::null(), Data::One(ResourceRef::Null));
    }

    #[test]
    fn test_link_conversions() {
        let uri: Link = "https://example.com".into();
        assert_eq!(uri, Link::Uri("https://example.com".to_string()));

        let object: Link = LinkObject::href("https://example.com").into();
        assert!(matches!(object, Link::Object(_)));
    }
}
