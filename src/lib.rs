//! Section Store Library
//!
//! A hierarchical configuration store: a nested, dot-path addressed tree of
//! sections loaded from a text document, typed accessors that fall back to
//! caller defaults, and a registry that lets application types round-trip
//! through the tree as tagged sections.
//!
//! # Modules
//!
//! - `section`: The section tree, path resolution and typed accessors
//! - `serialization`: Type descriptors, named registries and object accessors
//! - `store`: Text codecs, load/save, config discovery and env overrides
//! - `servlets`: Servlet binding reader built on the typed accessors
//!
//! # Example
//!
//! ```rust
//! use section_store::{Store, TomlCodec};
//!
//! let mut store = Store::parse(
//!     r#"
//!     [server]
//!     port = "8080"
//!     "#,
//!     TomlCodec,
//! )
//! .unwrap();
//!
//! assert_eq!(store.get_int("server.port", 80).unwrap(), 8080);
//! assert!(store.get_boolean("server.tls", false).is_ok());
//!
//! store.set("server.tls.enabled", true).unwrap();
//! assert!(store.contains_section("server.tls").unwrap());
//! ```

pub mod section;
pub mod serialization;
pub mod servlets;
pub mod store;

// Re-export commonly used types for convenience
pub use section::{split_path, PathError, PathResult, Section, Value};
pub use serialization::{
    default_registry, registry, registry_names, registry_with_marker, AnyObject, ConfigObject,
    ConfigSerializable, DeserializationError, SerializationError, SerializationRegistry,
    SerializationResult, TypeDescriptor, DEFAULT_MARKER, DEFAULT_REGISTRY,
};
pub use servlets::{servlet_bindings, ServletBinding};
pub use store::{
    codec_by_name, codec_for_path, CodecError, JsonCodec, Store, StoreError, StoreResult,
    TextCodec, TomlCodec, YamlCodec,
};
