//! Document-backed section trees.
//!
//! A [`Store`] owns a root [`Section`], the [`TextCodec`] used to read and
//! write it, an optional backing file, and the [`SerializationRegistry`] used
//! by the object accessors. It dereferences to its root section, so every
//! typed accessor is available directly on the store.
//!
//! # Example
//!
//! ```rust
//! use section_store::{Store, YamlCodec};
//!
//! let store = Store::parse(
//!     "app: { servlets: { Home: { class: com.example.Home, url-patterns: [/, /home] } } }",
//!     YamlCodec,
//! )
//! .unwrap();
//!
//! assert!(store.contains_section("app.servlets.Home").unwrap());
//! assert_eq!(
//!     store.get_string_opt("app.servlets.Home.class").unwrap().as_deref(),
//!     Some("com.example.Home")
//! );
//! ```

mod codec;
mod error;
mod loader;

pub use codec::{codec_by_name, codec_for_path, JsonCodec, TextCodec, TomlCodec, YamlCodec};
pub use error::{CodecError, StoreError, StoreResult};
pub use loader::{env_prefix, get_default_config_dir, get_default_config_path, resolve_config_path};

use crate::section::{PathResult, Section};
use crate::serialization::{
    default_registry, ConfigObject, ConfigSerializable, SerializationRegistry, SerializationResult,
};
use serde_json::Value as J;
use std::fmt;
use std::io::{Read, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// A section tree tied to a text codec and, optionally, a file.
pub struct Store {
    root: Section,
    path: Option<PathBuf>,
    codec: Box<dyn TextCodec>,
    registry: Arc<SerializationRegistry>,
}

impl Store {
    /// Empty TOML store using the default registry, with no backing file.
    pub fn new() -> Self {
        Self::with_codec(TomlCodec)
    }

    /// Empty store using `codec` and the default registry.
    pub fn with_codec(codec: impl TextCodec + 'static) -> Self {
        Self::with_boxed_codec(Box::new(codec))
    }

    pub fn with_boxed_codec(codec: Box<dyn TextCodec>) -> Self {
        Self {
            root: Section::new(),
            path: None,
            codec,
            registry: default_registry(),
        }
    }

    /// Use `registry` for the object accessors.
    pub fn with_registry(mut self, registry: Arc<SerializationRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Load a file, choosing the codec from its extension.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        Self::open_with(path, codec_for_path(path))
    }

    /// Load a file with an explicit codec.
    pub fn open_with(path: impl AsRef<Path>, codec: Box<dyn TextCodec>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let text = read_file(&path)?;
        let root = decode(codec.as_ref(), &text)?;
        info!("Loaded {} configuration from {}", codec.name(), path.display());

        Ok(Self {
            root,
            path: Some(path),
            codec,
            registry: default_registry(),
        })
    }

    /// Load a document from a string.
    pub fn parse(text: &str, codec: impl TextCodec + 'static) -> StoreResult<Self> {
        let mut store = Self::with_codec(codec);
        store.load_str(text)?;
        Ok(store)
    }

    /// Load a document from a stream.
    pub fn from_reader(
        mut reader: impl Read,
        codec: impl TextCodec + 'static,
    ) -> StoreResult<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text, codec)
    }

    /// Replace the whole tree with the parsed contents of `text`.
    ///
    /// On failure the current tree is left untouched.
    pub fn load_str(&mut self, text: &str) -> StoreResult<()> {
        self.root = decode(self.codec.as_ref(), text)?;
        Ok(())
    }

    /// Re-read the backing file.
    pub fn reload(&mut self) -> StoreResult<()> {
        let path = self.path.as_ref().ok_or(StoreError::MissingPath)?;
        let text = read_file(path)?;
        self.root = decode(self.codec.as_ref(), &text)?;
        debug!("Reloaded configuration from {}", path.display());
        Ok(())
    }

    /// Render the tree with the store's codec.
    pub fn render(&self) -> StoreResult<String> {
        self.render_with(self.codec.as_ref())
    }

    /// Render the tree with another codec, e.g. to convert between formats.
    pub fn render_with(&self, codec: &dyn TextCodec) -> StoreResult<String> {
        Ok(codec.render(&J::Object(self.root.to_json_map()))?)
    }

    /// Write the tree back to the backing file.
    pub fn save(&self) -> StoreResult<()> {
        let path = self.path.as_ref().ok_or(StoreError::MissingPath)?;
        self.save_to(path)
    }

    /// Write the tree to `path`, creating parent directories.
    ///
    /// The write is not atomic; a failure may leave `path` partially written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let content = self.render()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("Saved {} configuration to {}", self.codec.name(), path.display());
        Ok(())
    }

    /// Write the rendered tree to a stream.
    pub fn save_to_writer(&self, mut writer: impl Write) -> StoreResult<()> {
        writer.write_all(self.render()?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    pub fn into_root(self) -> Section {
        self.root
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the file used by [`Store::save`] and [`Store::reload`].
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }

    pub fn registry(&self) -> &Arc<SerializationRegistry> {
        &self.registry
    }

    /// [`Section::get_object`] against the store's registry.
    pub fn get_object<T: ConfigSerializable>(&self, path: &str, default: T) -> PathResult<T> {
        self.root.get_object(path, &self.registry, default)
    }

    /// [`Section::get_object_opt`] against the store's registry.
    pub fn get_object_opt<T: ConfigSerializable>(&self, path: &str) -> PathResult<Option<T>> {
        self.root.get_object_opt(path, &self.registry)
    }

    /// [`Section::get_object_dyn`] against the store's registry.
    pub fn get_object_dyn(&self, path: &str) -> PathResult<Option<ConfigObject>> {
        self.root.get_object_dyn(path, &self.registry)
    }

    /// [`Section::set_object`] against the store's registry.
    pub fn set_object<T: ConfigSerializable>(
        &mut self,
        path: &str,
        value: &T,
    ) -> SerializationResult<()> {
        self.root.set_object(path, value, &self.registry)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Store {
    type Target = Section;

    fn deref(&self) -> &Section {
        &self.root
    }
}

impl DerefMut for Store {
    fn deref_mut(&mut self) -> &mut Section {
        &mut self.root
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("codec", &self.codec.name())
            .field("registry", &self.registry.name())
            .field("root", &self.root)
            .finish()
    }
}

fn read_file(path: &Path) -> StoreResult<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Parse `text` and wrap the generic tree as a root section.
fn decode(codec: &dyn TextCodec, text: &str) -> StoreResult<Section> {
    match codec.parse(text)? {
        J::Object(map) => Ok(Section::from_json_map(map)),
        J::Null => Ok(Section::new()),
        other => Err(CodecError::NotAMapping {
            format: codec.name(),
            found: codec::json_kind(&other),
        }
        .into()),
    }
}
