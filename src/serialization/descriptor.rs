//! Serializable types and their type-erased descriptors.

use super::error::DeserializationError;
use crate::section::Section;
use std::any::{Any, TypeId};
use std::fmt;

/// A deserialized instance whose concrete type is known only to its descriptor.
pub type AnyObject = Box<dyn Any + Send + Sync>;

type ToMapFn = dyn Fn(&(dyn Any + Send + Sync)) -> Option<Section> + Send + Sync;
type FromMapFn = dyn Fn(&Section) -> Result<AnyObject, DeserializationError> + Send + Sync;

/// A type that can round-trip through a tagged section.
///
/// `from_map` must accept anything `to_map` produced for the same type. It may
/// reject hand-edited payloads with a [`DeserializationError`].
///
/// # Example
///
/// ```rust
/// use section_store::{ConfigSerializable, DeserializationError, Section};
///
/// #[derive(Debug, PartialEq)]
/// struct Endpoint {
///     host: String,
///     port: i64,
/// }
///
/// impl ConfigSerializable for Endpoint {
///     fn alias() -> Option<&'static str> {
///         Some("endpoint")
///     }
///
///     fn to_map(&self) -> Section {
///         let mut map = Section::new();
///         map.insert("host", self.host.as_str());
///         map.insert("port", self.port);
///         map
///     }
///
///     fn from_map(map: &Section) -> Result<Self, DeserializationError> {
///         Ok(Self {
///             host: map
///                 .get_string_opt("host")?
///                 .ok_or_else(|| DeserializationError::missing_field("host"))?,
///             port: map.get_int("port", 80)?,
///         })
///     }
/// }
/// ```
pub trait ConfigSerializable: Any + Send + Sync + Sized {
    /// Identifier written into tagged sections when no alias is declared.
    fn canonical_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Optional short identifier, preferred over the canonical name on write.
    fn alias() -> Option<&'static str> {
        None
    }

    fn to_map(&self) -> Section;

    fn from_map(map: &Section) -> Result<Self, DeserializationError>;
}

/// Registered `{to_map, from_map}` pair for one Rust type.
pub struct TypeDescriptor {
    canonical_name: String,
    alias: Option<String>,
    type_id: TypeId,
    to_map: Box<ToMapFn>,
    from_map: Box<FromMapFn>,
}

impl TypeDescriptor {
    /// Descriptor using the names declared by `T`.
    pub fn of<T: ConfigSerializable>() -> Self {
        Self {
            canonical_name: T::canonical_name().to_string(),
            alias: T::alias().map(str::to_string),
            type_id: TypeId::of::<T>(),
            to_map: Box::new(|obj: &(dyn Any + Send + Sync)| {
                obj.downcast_ref::<T>().map(T::to_map)
            }),
            from_map: Box::new(|map: &Section| {
                T::from_map(map).map(|v| Box::new(v) as AnyObject)
            }),
        }
    }

    /// Override the canonical name, e.g. to read documents written under a
    /// legacy identifier.
    pub fn named(mut self, canonical_name: impl Into<String>) -> Self {
        self.canonical_name = canonical_name.into();
        self
    }

    /// Override (or set) the alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Identifier written on serialize: the alias if declared, else the
    /// canonical name.
    pub fn write_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.canonical_name)
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// `None` when `obj` is not of this descriptor's type.
    pub fn to_map(&self, obj: &(dyn Any + Send + Sync)) -> Option<Section> {
        (self.to_map)(obj)
    }

    pub fn from_map(&self, map: &Section) -> Result<AnyObject, DeserializationError> {
        (self.from_map)(map)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("canonical_name", &self.canonical_name)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}
