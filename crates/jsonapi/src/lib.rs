#![doc = include_str!("../README.md")]

mod read;
mod ser;
mod status;
mod types;

pub mod v1 {
    //! Versioned public API for JSON:API documents.
    //!
    //! Everything you need is re-exported from this module. Types are
    //! organized into four groups:
    //!
    //! # Documents
    //!
    //! The top-level envelope and its primary data:
    //!
    //! - [`Document`] — data, errors, meta, links, and the `jsonapi` block
    //! - [`Data`] — a single resource reference or an ordered sequence
    //! - [`ResourceRef`] — explicit null, bare identifier, or full resource
    //!
    //! # Resources
    //!
    //! - [`Resource`] — identity plus attributes, relationships, links, meta
    //! - [`ResourceIdentifier`] — the (id, type, slug) triple on its own
    //! - [`Relationship`] — linkage plus its own links and meta
    //!
    //! # Links and errors
    //!
    //! - [`Link`] — bare URI, full [`LinkObject`], or explicit null
    //! - [`Hreflang`] — one language tag or an ordered list
    //! - [`ErrorObject`], [`ErrorSource`] — one failure and where it came from
    //! - [`JsonApiInfo`] — format version, extensions, profiles
    //!
    //! # Serialization
    //!
    //! - [`Serializer`] — walks a document into an ordered JSON tree,
    //!   de-duplicating linked resources into `included`
    //! - [`detect_status`] — folds serialized error statuses into one HTTP
    //!   response code
    //! - [`DocumentError`] — failures from [`Document::from_json`]
    //!
    //! # Example — serialize a document with a linked resource
    //!
    //! ```
    //! use jsonapi::v1::*;
    //!
    //! let author = Resource::new("9", "people").with_attribute("name", "Kate");
    //! let article = Resource::new("1", "articles")
    //!     .with_attribute("title", "Rust without fear")
    //!     .with_relationship("author", Relationship::to_one(author))
    //!     .with_link("self", "https://example.com/articles/1");
    //!
    //! let tree = Document::from_data(article).to_value().unwrap();
    //!
    //! assert_eq!(tree["data"]["attributes"]["title"], "Rust without fear");
    //! assert_eq!(tree["included"][0]["attributes"]["name"], "Kate");
    //! assert_eq!(detect_status(Some(&tree)), 200);
    //! ```

    pub use crate::read::DocumentError;
    pub use crate::ser::Serializer;
    pub use crate::status::detect_status;
    pub use crate::types::{
        Data, Document, ErrorObject, ErrorSource, Hreflang, JsonApiInfo, Link, LinkObject,
        Relationship, Resource, ResourceIdentifier, ResourceRef,
    };
}
