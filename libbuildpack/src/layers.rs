use crate::data::launch::Launch;
use crate::data::store::Store;
use crate::layer::Layer;
use libbuildpack_common::{read_optional_toml_file, write_toml_file, TomlFileError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The layers directory handed to the buildpack by the platform during the build phase.
///
/// ```
/// use libbuildpack::data::launch::{LaunchBuilder, ProcessBuilder};
/// use libbuildpack::Layers;
///
/// let temp_dir = tempfile::tempdir().unwrap();
/// let layers = Layers::new(temp_dir.path());
///
/// let layer = layers.layer("node");
/// assert_eq!(layer.root(), temp_dir.path().join("node"));
///
/// layers
///     .write_application_metadata(
///         &LaunchBuilder::new()
///             .process(ProcessBuilder::new("web".parse().unwrap(), "npm start").build())
///             .build(),
///     )
///     .unwrap();
///
/// assert!(temp_dir.path().join("launch.toml").is_file());
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Layers {
    root: PathBuf,
}

impl Layers {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Derives the layer with the given name. Does not touch the file system.
    #[must_use]
    pub fn layer(&self, name: impl AsRef<str>) -> Layer {
        Layer::new(&self.root, name)
    }

    #[must_use]
    pub fn launch_path(&self) -> PathBuf {
        self.root.join("launch.toml")
    }

    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.root.join("store.toml")
    }

    /// Writes `launch.toml`, replacing any previous content.
    pub fn write_application_metadata(&self, launch: &Launch) -> Result<(), TomlFileError> {
        write_toml_file(launch, self.launch_path())
    }

    /// Alias for [`write_application_metadata`](Self::write_application_metadata).
    pub fn write_metadata(&self, launch: &Launch) -> Result<(), TomlFileError> {
        self.write_application_metadata(launch)
    }

    /// Writes `store.toml` with the given value as its `[metadata]` table, replacing any previous
    /// content.
    pub fn write_persistent_metadata<M: Serialize>(
        &self,
        metadata: &M,
    ) -> Result<(), TomlFileError> {
        write_toml_file(&Store { metadata }, self.store_path())
    }

    /// Reads the `[metadata]` table of `store.toml`.
    ///
    /// Returns `Ok(None)` if the file does not exist or has no `[metadata]` table.
    pub fn read_persistent_metadata<M: DeserializeOwned>(
        &self,
    ) -> Result<Option<M>, TomlFileError> {
        read_optional_toml_file::<toml::Table>(self.store_path())?
            .and_then(|mut document| document.remove("metadata"))
            .map(|metadata| metadata.try_into::<M>())
            .transpose()
            .map_err(TomlFileError::TomlDeserializationError)
    }
}
