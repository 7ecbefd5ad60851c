//! Named serialization registries and the type resolution algorithm.

use super::descriptor::{AnyObject, ConfigSerializable, TypeDescriptor};
use super::error::{SerializationError, SerializationResult};
use crate::section::{Section, Value};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the registry that always exists.
pub const DEFAULT_REGISTRY: &str = "DEFAULT";

/// Marker key used by registries created without an explicit marker.
pub const DEFAULT_MARKER: &str = "==";

type Catalog = Arc<Vec<Arc<TypeDescriptor>>>;

/// Catalog of serializable types for one document family.
///
/// Mutations copy the catalog and swap it in under a write lock; lookups
/// clone the current snapshot and then scan it without holding any lock.
#[derive(Debug)]
pub struct SerializationRegistry {
    name: String,
    marker: String,
    catalog: RwLock<Catalog>,
}

impl SerializationRegistry {
    /// Create a standalone registry that is not part of the global table.
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
            catalog: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key that carries the type identifier in a tagged section.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Register `T` under the names it declares.
    pub fn register<T: ConfigSerializable>(&self) -> SerializationResult<()> {
        self.register_descriptor(TypeDescriptor::of::<T>())
    }

    /// Register a descriptor.
    ///
    /// Registering the same type under the same canonical name again is a
    /// no-op. A different type claiming a taken canonical name is rejected.
    /// Duplicate aliases are accepted; resolution order decides between them.
    pub fn register_descriptor(&self, descriptor: TypeDescriptor) -> SerializationResult<()> {
        let mut catalog = self.catalog.write();

        if let Some(existing) = catalog
            .iter()
            .find(|d| d.canonical_name() == descriptor.canonical_name())
        {
            if existing.type_id() == descriptor.type_id() {
                debug!(
                    "Type '{}' already registered in '{}'",
                    descriptor.canonical_name(),
                    self.name
                );
                return Ok(());
            }
            return Err(SerializationError::DuplicateType(
                descriptor.canonical_name().to_string(),
            ));
        }

        if let Some(alias) = descriptor.alias() {
            if catalog.iter().any(|d| d.alias() == Some(alias)) {
                warn!(
                    "Alias '{}' is already used in registry '{}'; earlier registration wins",
                    alias, self.name
                );
            }
        }

        info!(
            "Registered serializable type '{}' in '{}'",
            descriptor.canonical_name(),
            self.name
        );
        let mut next = Vec::clone(&catalog);
        next.push(Arc::new(descriptor));
        *catalog = Arc::new(next);
        Ok(())
    }

    /// Remove the descriptor with the given canonical name.
    pub fn unregister(&self, canonical_name: &str) -> Option<Arc<TypeDescriptor>> {
        let mut catalog = self.catalog.write();
        let index = catalog
            .iter()
            .position(|d| d.canonical_name() == canonical_name)?;

        let mut next = Vec::clone(&catalog);
        let removed = next.remove(index);
        *catalog = Arc::new(next);
        info!(
            "Removed serializable type '{}' from '{}'",
            canonical_name, self.name
        );
        Some(removed)
    }

    /// Remove the descriptor registered for `T`.
    pub fn unregister_type<T: ConfigSerializable>(&self) -> Option<Arc<TypeDescriptor>> {
        let descriptor = self.descriptor_for(TypeId::of::<T>())?;
        self.unregister(descriptor.canonical_name())
    }

    /// Current snapshot of the catalog, in registration order.
    pub fn descriptors(&self) -> Arc<Vec<Arc<TypeDescriptor>>> {
        Arc::clone(&self.catalog.read())
    }

    pub fn is_registered<T: ConfigSerializable>(&self) -> bool {
        self.descriptor_for(TypeId::of::<T>()).is_some()
    }

    fn descriptor_for(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.descriptors()
            .iter()
            .find(|d| d.type_id() == type_id)
            .cloned()
    }

    /// Map a type identifier found in a tagged section to a descriptor.
    ///
    /// Each rule is tried against every descriptor, in registration order,
    /// before the next rule is considered:
    ///
    /// 1. canonical name equals the identifier
    /// 2. marker + canonical name equals the identifier
    /// 3. canonical name with a leading marker removed equals the identifier
    /// 4. alias equals the identifier
    /// 5. canonical name equals the identifier minus its first `marker.len()`
    ///    bytes, when the identifier is longer than the marker
    pub fn resolve(&self, identifier: &str) -> SerializationResult<Arc<TypeDescriptor>> {
        let catalog = self.descriptors();
        let marker = self.marker.as_str();

        let rules: [&dyn Fn(&TypeDescriptor) -> bool; 5] = [
            &|d: &TypeDescriptor| d.canonical_name() == identifier,
            &|d: &TypeDescriptor| {
                identifier
                    .strip_prefix(marker)
                    .is_some_and(|rest| rest == d.canonical_name())
            },
            &|d: &TypeDescriptor| {
                d.canonical_name().strip_prefix(marker) == Some(identifier)
            },
            &|d: &TypeDescriptor| d.alias() == Some(identifier),
            &|d: &TypeDescriptor| {
                identifier.len() > marker.len()
                    && identifier.get(marker.len()..) == Some(d.canonical_name())
            },
        ];

        for rule in rules {
            if let Some(found) = catalog.iter().find(|d| rule(d)) {
                return Ok(Arc::clone(found));
            }
        }

        Err(SerializationError::UnknownType(identifier.to_string()))
    }

    /// True when `section` carries this registry's marker with a string value.
    pub fn is_tagged(&self, section: &Section) -> bool {
        matches!(section.get_key(&self.marker), Some(Value::String(_)))
    }

    /// Serialize `value` into a tagged section.
    ///
    /// The marker key comes first, followed by the `to_map` entries. An entry
    /// that collides with the marker key is dropped.
    pub fn serialize<T: ConfigSerializable>(&self, value: &T) -> SerializationResult<Section> {
        let descriptor = self.descriptor_for(TypeId::of::<T>()).ok_or_else(|| {
            SerializationError::NotRegistered {
                type_name: T::canonical_name().to_string(),
                registry: self.name.clone(),
            }
        })?;

        let mut tagged = Section::new();
        tagged.insert(self.marker.as_str(), descriptor.write_name());
        for (key, entry) in value.to_map().iter() {
            if key == self.marker {
                warn!(
                    "Dropping key '{}' from '{}': it collides with the marker",
                    key,
                    descriptor.canonical_name()
                );
                continue;
            }
            tagged.insert(key, entry.clone());
        }
        Ok(tagged)
    }

    /// Rebuild an instance from a tagged section.
    pub fn deserialize(&self, section: &Section) -> SerializationResult<AnyObject> {
        let (descriptor, payload) = self.split_tagged(section)?;
        build(&descriptor, &payload)
    }

    /// Rebuild an instance of `T` from a tagged section.
    pub fn deserialize_as<T: ConfigSerializable>(
        &self,
        section: &Section,
    ) -> SerializationResult<T> {
        let (descriptor, payload) = self.split_tagged(section)?;

        build(&descriptor, &payload)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| SerializationError::TypeMismatch {
                expected: T::canonical_name().to_string(),
                found: descriptor.canonical_name().to_string(),
            })
    }

    fn split_tagged(
        &self,
        section: &Section,
    ) -> SerializationResult<(Arc<TypeDescriptor>, Section)> {
        let identifier = match section.get_key(&self.marker) {
            Some(Value::String(id)) => id.as_str(),
            _ => return Err(SerializationError::NotTagged(self.marker.clone())),
        };
        let descriptor = self.resolve(identifier)?;

        let mut payload = section.clone();
        payload.remove_key(&self.marker);
        Ok((descriptor, payload))
    }
}

fn build(descriptor: &TypeDescriptor, payload: &Section) -> SerializationResult<AnyObject> {
    descriptor
        .from_map(payload)
        .map_err(|source| SerializationError::Deserialization {
            type_name: descriptor.canonical_name().to_string(),
            source,
        })
}

static REGISTRIES: Lazy<RwLock<HashMap<String, Arc<SerializationRegistry>>>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        DEFAULT_REGISTRY.to_string(),
        Arc::new(SerializationRegistry::new(DEFAULT_REGISTRY, DEFAULT_MARKER)),
    );
    RwLock::new(table)
});

/// The always-present `"DEFAULT"` registry.
pub fn default_registry() -> Arc<SerializationRegistry> {
    registry(DEFAULT_REGISTRY)
}

/// Look up a registry by name, creating it with [`DEFAULT_MARKER`] if needed.
pub fn registry(name: &str) -> Arc<SerializationRegistry> {
    registry_with_marker(name, DEFAULT_MARKER)
}

/// Look up a registry by name, creating it with `marker` if needed.
///
/// Creation is idempotent: an existing registry is returned as is, even when
/// it was created with a different marker.
pub fn registry_with_marker(name: &str, marker: &str) -> Arc<SerializationRegistry> {
    if let Some(existing) = REGISTRIES.read().get(name) {
        if existing.marker() != marker {
            debug!(
                "Registry '{}' exists with marker '{}'; ignoring requested '{}'",
                name,
                existing.marker(),
                marker
            );
        }
        return Arc::clone(existing);
    }

    let mut table = REGISTRIES.write();
    let entry = table.entry(name.to_string()).or_insert_with(|| {
        info!("Created serialization registry '{}'", name);
        Arc::new(SerializationRegistry::new(name, marker))
    });
    Arc::clone(entry)
}

/// Names of every registry in the global table, sorted.
pub fn registry_names() -> Vec<String> {
    let mut names: Vec<String> = REGISTRIES.read().keys().cloned().collect();
    names.sort();
    names
}
