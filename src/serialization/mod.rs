//! Object serialization through tagged sections.
//!
//! Application types implement [`ConfigSerializable`] and are registered in a
//! [`SerializationRegistry`]. Serializing an instance produces a section whose
//! marker key (`"=="` unless the registry says otherwise) names the type, next
//! to the fields returned by `to_map`:
//!
//! ```toml
//! [listener]
//! "==" = "endpoint"
//! host = "0.0.0.0"
//! port = 8443
//! ```
//!
//! Reading it back resolves the identifier to a descriptor (see
//! [`SerializationRegistry::resolve`] for the exact order) and hands the
//! remaining keys to `from_map`.
//!
//! Registries are named. `"DEFAULT"` always exists, and [`registry`] creates
//! any other name on first use. Registries never share descriptors.

mod descriptor;
mod error;
mod object;
mod registry;

pub use descriptor::{AnyObject, ConfigSerializable, TypeDescriptor};
pub use error::{DeserializationError, SerializationError, SerializationResult};
pub use object::ConfigObject;
pub use registry::{
    default_registry, registry, registry_names, registry_with_marker, SerializationRegistry,
    DEFAULT_MARKER, DEFAULT_REGISTRY,
};
