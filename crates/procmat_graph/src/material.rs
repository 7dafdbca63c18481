// SPDX-License-Identifier: MIT OR Apache-2.0
//! Materials and the registry that owns them.
//!
//! Builders never touch global state: they receive a [`MaterialRegistry`]
//! and ask it for a material by name. [`MaterialLibrary`] is the in-memory
//! implementation, persisted as RON.

use crate::graph::Graph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Current material library format version
pub const LIBRARY_FORMAT_VERSION: u32 = 1;

/// Stable identifier of a named material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialHandle(pub Uuid);

impl MaterialHandle {
    /// Create a new random handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MaterialHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A named material owning one shading graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Handle, unchanged for the lifetime of the material
    pub handle: MaterialHandle,
    /// Unique material name
    pub name: String,
    /// The material's shading graph
    pub graph: Graph,
}

impl Material {
    /// Create an empty material
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            handle: MaterialHandle::new(),
            graph: Graph::new(name.clone()),
            name,
        }
    }
}

/// Store of named materials with get-or-create semantics
pub trait MaterialRegistry {
    /// Look a material up by name, creating it if absent.
    ///
    /// Repeated calls with the same name return the same handle.
    fn get_or_create(&mut self, name: &str) -> Result<MaterialHandle, RegistryError>;

    /// Discard every node and connection of the material's graph
    fn clear_graph(&mut self, handle: MaterialHandle) -> Result<(), RegistryError>;

    /// Mutable access to the material's graph
    fn graph_mut(&mut self, handle: MaterialHandle) -> Result<&mut Graph, RegistryError>;

    /// Look a material up by handle
    fn material(&self, handle: MaterialHandle) -> Option<&Material>;
}

/// In-memory material registry keyed by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLibrary {
    /// Format version for compatibility
    pub version: u32,
    materials: IndexMap<String, Material>,
}

impl MaterialLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            version: LIBRARY_FORMAT_VERSION,
            materials: IndexMap::new(),
        }
    }

    /// Look a material up by name
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library holds no materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    fn material_mut(&mut self, handle: MaterialHandle) -> Result<&mut Material, RegistryError> {
        self.materials
            .values_mut()
            .find(|m| m.handle == handle)
            .ok_or(RegistryError::UnknownMaterial(handle))
    }

    /// Serialize to a RON string
    pub fn to_ron(&self) -> Result<String, RegistryError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Parse a RON string, rejecting newer format versions
    pub fn from_ron(s: &str) -> Result<Self, RegistryError> {
        let library: MaterialLibrary = ron::from_str(s)?;
        if library.version > LIBRARY_FORMAT_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                found: library.version,
                supported: LIBRARY_FORMAT_VERSION,
            });
        }
        Ok(library)
    }

    /// Load a library file
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let library = Self::from_ron(&content)?;
        tracing::debug!("Loaded {} materials from {:?}", library.len(), path);
        Ok(library)
    }

    /// Save the library to a file
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::debug!("Saved {} materials to {:?}", self.len(), path);
        Ok(())
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialRegistry for MaterialLibrary {
    fn get_or_create(&mut self, name: &str) -> Result<MaterialHandle, RegistryError> {
        if let Some(material) = self.materials.get(name) {
            return Ok(material.handle);
        }
        let material = Material::new(name);
        let handle = material.handle;
        self.materials.insert(name.to_string(), material);
        tracing::debug!("Created material '{}'", name);
        Ok(handle)
    }

    fn clear_graph(&mut self, handle: MaterialHandle) -> Result<(), RegistryError> {
        self.material_mut(handle)?.graph.clear();
        Ok(())
    }

    fn graph_mut(&mut self, handle: MaterialHandle) -> Result<&mut Graph, RegistryError> {
        Ok(&mut self.material_mut(handle)?.graph)
    }

    fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.values().find(|m| m.handle == handle)
    }
}

/// Error raised by a material registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Handle does not belong to this registry
    #[error("Unknown material: {0:?}")]
    UnknownMaterial(MaterialHandle),

    /// Reading or writing the library file failed
    #[error("Library I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The library file is not valid RON
    #[error("Malformed library: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The library could not be serialized
    #[error("Failed to serialize library: {0}")]
    Serialize(#[from] ron::Error),

    /// The library was written by a newer version
    #[error("Library version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}
