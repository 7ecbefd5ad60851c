//! Object accessors on sections.

use super::descriptor::{AnyObject, ConfigSerializable};
use super::error::SerializationResult;
use super::registry::SerializationRegistry;
use crate::section::{PathResult, Section, Value};
use tracing::warn;

/// Result of [`Section::get_object_dyn`].
#[derive(Debug)]
pub enum ConfigObject {
    /// A tagged section rebuilt by its registered descriptor.
    Instance(AnyObject),
    /// A plain, untagged section.
    Section(Section),
    /// Any other value.
    Value(Value),
}

impl ConfigObject {
    /// Borrow the instance as `T`, if this is an instance of `T`.
    pub fn downcast_ref<T: ConfigSerializable>(&self) -> Option<&T> {
        match self {
            Self::Instance(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl Section {
    /// Rebuild a `T` from the tagged section at `path`, or return `default`.
    ///
    /// Unknown types and rejected payloads are logged and treated as absent.
    pub fn get_object<T: ConfigSerializable>(
        &self,
        path: &str,
        registry: &SerializationRegistry,
        default: T,
    ) -> PathResult<T> {
        Ok(self.get_object_opt(path, registry)?.unwrap_or(default))
    }

    /// Like [`Section::get_object`] but `None` instead of a default.
    pub fn get_object_opt<T: ConfigSerializable>(
        &self,
        path: &str,
        registry: &SerializationRegistry,
    ) -> PathResult<Option<T>> {
        let Some(section) = self.get_section(path)? else {
            return Ok(None);
        };
        if !registry.is_tagged(section) {
            return Ok(None);
        }

        match registry.deserialize_as::<T>(section) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Ignoring object at '{}': {}", path, e);
                Ok(None)
            }
        }
    }

    /// Read whatever is at `path` as an object.
    ///
    /// Tagged sections are deserialized; plain sections and other values are
    /// returned as they are. A tagged section that fails to deserialize reads
    /// as absent.
    pub fn get_object_dyn(
        &self,
        path: &str,
        registry: &SerializationRegistry,
    ) -> PathResult<Option<ConfigObject>> {
        let object = match self.get(path)? {
            None => None,
            Some(Value::Section(section)) if registry.is_tagged(section) => {
                match registry.deserialize(section) {
                    Ok(obj) => Some(ConfigObject::Instance(obj)),
                    Err(e) => {
                        warn!("Ignoring object at '{}': {}", path, e);
                        None
                    }
                }
            }
            Some(Value::Section(section)) => Some(ConfigObject::Section(section.clone())),
            Some(other) => Some(ConfigObject::Value(other.clone())),
        };
        Ok(object)
    }

    /// Serialize `value` and store the tagged section at `path`.
    pub fn set_object<T: ConfigSerializable>(
        &mut self,
        path: &str,
        value: &T,
        registry: &SerializationRegistry,
    ) -> SerializationResult<()> {
        let tagged = registry.serialize(value)?;
        self.set(path, tagged)?;
        Ok(())
    }
}
