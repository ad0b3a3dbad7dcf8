//! A single named layer and the files it consists of.

use crate::data::layer_content_metadata::{LayerContentMetadata, LayerTypes};
use crate::layer_env::{env_file_path, LayerEnv, ModificationBehavior, Scope};
use crate::util::{default_on_not_found, write_os_str};
use libbuildpack_common::{read_optional_toml_file, write_toml_file, TomlFileError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// A named contribution directory inside the layers directory, together with its
/// `<layers>/<name>.toml` metadata file.
///
/// Values are created with [`Layers::layer`](crate::Layers::layer). No I/O happens until one of the
/// read or write functions is called.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Layer {
    name: String,
    root: PathBuf,
    metadata_path: PathBuf,
}

#[derive(thiserror::Error, Debug)]
pub enum LayerError {
    #[error("I/O error while accessing layer: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Layer metadata file error: {0}")]
    MetadataFileError(#[from] TomlFileError),
}

macro_rules! env_writer {
    ($(#[$attributes:meta])* $name:ident, $scope:expr, $modification_behavior:expr) => {
        $(#[$attributes])*
        pub fn $name(
            &self,
            name: impl AsRef<OsStr>,
            value: impl AsRef<OsStr>,
        ) -> Result<(), LayerError> {
            self.write_env($scope, $modification_behavior, name, value)
        }
    };
}

impl Layer {
    pub(crate) fn new(layers_dir: &Path, name: impl AsRef<str>) -> Self {
        let name = name.as_ref();

        Self {
            name: String::from(name),
            root: layers_dir.join(name),
            metadata_path: layers_dir.join(format!("{name}.toml")),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The contribution directory, `<layers>/<name>`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The metadata file, `<layers>/<name>.toml`. It is a sibling of [`root`](Self::root), never
    /// inside it.
    #[must_use]
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Reads the `[metadata]` table of the layer metadata file into `M`.
    ///
    /// Returns `Ok(None)` if the metadata file does not exist or has no `[metadata]` table.
    pub fn read_metadata<M: DeserializeOwned>(&self) -> Result<Option<M>, LayerError> {
        let Some(mut document) = read_optional_toml_file::<toml::Table>(&self.metadata_path)?
        else {
            tracing::debug!(path = %self.metadata_path.display(), "Layer metadata does not exist");
            return Ok(None);
        };

        let metadata = document
            .remove("metadata")
            .map(|metadata| metadata.try_into::<M>())
            .transpose()
            .map_err(TomlFileError::TomlDeserializationError)?;

        tracing::debug!(path = %self.metadata_path.display(), "Read layer metadata");
        Ok(metadata)
    }

    /// Reads the `build`, `cache` and `launch` flags of the layer metadata file.
    ///
    /// All flags are `false` if the metadata file does not exist.
    pub fn read_types(&self) -> Result<LayerTypes, LayerError> {
        Ok(read_optional_toml_file::<LayerTypes>(&self.metadata_path)?.unwrap_or_default())
    }

    /// Deletes the layer metadata file. A missing file is not an error.
    pub fn remove_metadata(&self) -> Result<(), LayerError> {
        tracing::debug!(path = %self.metadata_path.display(), "Removing layer metadata");
        default_on_not_found(fs::remove_file(&self.metadata_path)).map_err(LayerError::from)
    }

    /// Writes the layer metadata file, replacing any previous content.
    ///
    /// ```
    /// use libbuildpack::data::layer_content_metadata::LayerTypes;
    /// use libbuildpack::Layers;
    ///
    /// let temp_dir = tempfile::tempdir().unwrap();
    /// let layer = Layers::new(temp_dir.path()).layer("jdk");
    ///
    /// layer
    ///     .write_metadata(
    ///         &toml::toml! { version = "11.0.2" },
    ///         LayerTypes {
    ///             build: true,
    ///             cache: true,
    ///             launch: false,
    ///         },
    ///     )
    ///     .unwrap();
    ///
    /// let metadata = layer.read_metadata::<toml::Table>().unwrap().unwrap();
    /// assert_eq!(metadata["version"].as_str(), Some("11.0.2"));
    /// ```
    pub fn write_metadata<M: Serialize>(
        &self,
        metadata: &M,
        types: LayerTypes,
    ) -> Result<(), LayerError> {
        write_toml_file(
            &LayerContentMetadata { types, metadata },
            &self.metadata_path,
        )
        .map_err(LayerError::from)
    }

    /// Writes `<root>/profile.d/<file_name>` with the given shell snippet.
    pub fn write_profile(
        &self,
        file_name: impl AsRef<Path>,
        value: impl AsRef<OsStr>,
    ) -> Result<(), LayerError> {
        let path = self.root.join("profile.d").join(file_name);

        tracing::debug!(path = %path.display(), value = ?value.as_ref(), "Writing profile");
        write_os_str(&path, value.as_ref()).map_err(LayerError::from)
    }

    /// Writes a single environment variable file for the given scope and behavior.
    ///
    /// The value is written as-is, without a trailing newline. An existing file is replaced.
    pub fn write_env(
        &self,
        scope: Scope,
        modification_behavior: ModificationBehavior,
        name: impl AsRef<OsStr>,
        value: impl AsRef<OsStr>,
    ) -> Result<(), LayerError> {
        let path = self
            .root
            .join(env_file_path(scope, modification_behavior, name));

        tracing::debug!(path = %path.display(), value = ?value.as_ref(), "Writing environment variable");
        write_os_str(&path, value.as_ref()).map_err(LayerError::from)
    }

    /// Writes every entry of the given [`LayerEnv`] into this layer.
    pub fn write_env_entries(&self, layer_env: &LayerEnv) -> Result<(), LayerError> {
        layer_env
            .write_to_layer_dir(&self.root)
            .map_err(LayerError::from)
    }

    /// Whether `<root>/<relative_path>` exists.
    ///
    /// I/O errors other than a missing file are returned.
    pub fn file_exists(&self, relative_path: impl AsRef<Path>) -> std::io::Result<bool> {
        default_on_not_found(fs::metadata(self.root.join(relative_path)).map(|_| true))
    }

    env_writer!(
        /// Appends the value to previous values of the variable during build, without a delimiter.
        append_build_env,
        Scope::Build,
        ModificationBehavior::Append
    );

    env_writer!(
        /// Appends the value to previous values of the variable at launch, without a delimiter.
        append_launch_env,
        Scope::Launch,
        ModificationBehavior::Append
    );

    env_writer!(
        /// Appends the value to previous values of the variable during build and at launch,
        /// without a delimiter.
        append_shared_env,
        Scope::Shared,
        ModificationBehavior::Append
    );

    env_writer!(
        /// Appends the value during build, using the OS path list separator.
        append_path_build_env,
        Scope::Build,
        ModificationBehavior::AppendPath
    );

    env_writer!(
        append_path_launch_env,
        Scope::Launch,
        ModificationBehavior::AppendPath
    );

    env_writer!(
        append_path_shared_env,
        Scope::Shared,
        ModificationBehavior::AppendPath
    );

    env_writer!(
        /// Replaces any previous value of the variable during build.
        override_build_env,
        Scope::Build,
        ModificationBehavior::Override
    );

    env_writer!(
        override_launch_env,
        Scope::Launch,
        ModificationBehavior::Override
    );

    env_writer!(
        override_shared_env,
        Scope::Shared,
        ModificationBehavior::Override
    );

    env_writer!(
        /// Prepends the value to previous values of the variable during build, without a
        /// delimiter.
        prepend_build_env,
        Scope::Build,
        ModificationBehavior::Prepend
    );

    env_writer!(
        prepend_launch_env,
        Scope::Launch,
        ModificationBehavior::Prepend
    );

    env_writer!(
        prepend_shared_env,
        Scope::Shared,
        ModificationBehavior::Prepend
    );

    env_writer!(
        /// Prepends the value during build, using the OS path list separator. Shares its file
        /// with [`append_path_build_env`](Self::append_path_build_env).
        prepend_path_build_env,
        Scope::Build,
        ModificationBehavior::PrependPath
    );

    env_writer!(
        prepend_path_launch_env,
        Scope::Launch,
        ModificationBehavior::PrependPath
    );

    env_writer!(
        prepend_path_shared_env,
        Scope::Shared,
        ModificationBehavior::PrependPath
    );

    env_writer!(
        /// Sets the variable during build only if it has no value yet.
        default_build_env,
        Scope::Build,
        ModificationBehavior::Default
    );

    env_writer!(
        default_launch_env,
        Scope::Launch,
        ModificationBehavior::Default
    );

    env_writer!(
        default_shared_env,
        Scope::Shared,
        ModificationBehavior::Default
    );

    env_writer!(
        /// Sets the delimiter used when appending or prepending to the variable during build.
        delimiter_build_env,
        Scope::Build,
        ModificationBehavior::Delimiter
    );

    env_writer!(
        delimiter_launch_env,
        Scope::Launch,
        ModificationBehavior::Delimiter
    );

    env_writer!(
        delimiter_shared_env,
        Scope::Shared,
        ModificationBehavior::Delimiter
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
    #[serde(rename_all = "PascalCase")]
    struct TestMetadata {
        alpha: String,
        bravo: i64,
    }

    fn test_layer() -> (TempDir, Layer) {
        let temp_dir = tempfile::tempdir().unwrap();
        let layer = Layer::new(temp_dir.path(), "test-layer");
        (temp_dir, layer)
    }

    #[test]
    fn paths_are_derived_from_layers_dir() {
        let layer = Layer::new(Path::new("/layers"), "jdk");

        assert_eq!(layer.name(), "jdk");
        assert_eq!(layer.root(), Path::new("/layers/jdk"));
        assert_eq!(layer.metadata_path(), Path::new("/layers/jdk.toml"));
    }

    #[test]
    fn write_metadata_with_all_types() {
        let (temp_dir, layer) = test_layer();

        layer
            .write_metadata(
                &TestMetadata {
                    alpha: String::from("v"),
                    bravo: 1,
                },
                LayerTypes {
                    build: true,
                    cache: true,
                    launch: true,
                },
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("test-layer.toml")).unwrap(),
            indoc! {r#"
                build = true
                cache = true
                launch = true

                [metadata]
                Alpha = "v"
                Bravo = 1
            "#}
        );
        assert!(!layer.root().exists());
    }

    #[test]
    fn write_metadata_types_are_independent() {
        let (_temp_dir, layer) = test_layer();

        for types in [
            LayerTypes::default(),
            LayerTypes {
                build: true,
                ..LayerTypes::default()
            },
            LayerTypes {
                cache: true,
                ..LayerTypes::default()
            },
            LayerTypes {
                launch: true,
                ..LayerTypes::default()
            },
            LayerTypes {
                build: true,
                cache: false,
                launch: true,
            },
        ] {
            let metadata = TestMetadata {
                alpha: String::from("test-value"),
                bravo: 2,
            };

            layer.write_metadata(&metadata, types).unwrap();

            assert_eq!(layer.read_types().unwrap(), types);
            assert_eq!(
                layer.read_metadata::<TestMetadata>().unwrap(),
                Some(metadata)
            );
        }
    }

    #[test]
    fn read_metadata_without_file() {
        let (_temp_dir, layer) = test_layer();

        assert_eq!(layer.read_metadata::<TestMetadata>().unwrap(), None);
        assert_eq!(layer.read_types().unwrap(), LayerTypes::default());
    }

    #[test]
    fn read_metadata_without_metadata_table() {
        let (_temp_dir, layer) = test_layer();
        fs::write(layer.metadata_path(), "launch = true\n").unwrap();

        assert_eq!(layer.read_metadata::<TestMetadata>().unwrap(), None);
        assert!(layer.read_types().unwrap().launch);
    }

    #[test]
    fn read_metadata_with_invalid_toml() {
        let (_temp_dir, layer) = test_layer();
        fs::write(layer.metadata_path(), "[metadata\n").unwrap();

        assert!(matches!(
            layer.read_metadata::<TestMetadata>(),
            Err(LayerError::MetadataFileError(
                TomlFileError::TomlDeserializationError(_)
            ))
        ));
    }

    #[test]
    fn read_metadata_with_mismatching_shape() {
        let (_temp_dir, layer) = test_layer();
        fs::write(
            layer.metadata_path(),
            indoc! {r#"
                [metadata]
                Alpha = 1
                Bravo = "one"
            "#},
        )
        .unwrap();

        assert!(matches!(
            layer.read_metadata::<TestMetadata>(),
            Err(LayerError::MetadataFileError(
                TomlFileError::TomlDeserializationError(_)
            ))
        ));
    }

    #[test]
    fn remove_metadata_is_idempotent() {
        let (_temp_dir, layer) = test_layer();
        layer
            .write_metadata(&TestMetadata::default(), LayerTypes::default())
            .unwrap();

        layer.remove_metadata().unwrap();
        assert!(!layer.metadata_path().exists());

        layer.remove_metadata().unwrap();
        assert_eq!(layer.read_metadata::<TestMetadata>().unwrap(), None);
    }

    #[test]
    fn write_metadata_to_unwritable_path_fails() {
        let (temp_dir, _) = test_layer();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let layer = Layer::new(&blocker, "test-layer");

        assert!(matches!(
            layer.write_metadata(&TestMetadata::default(), LayerTypes::default()),
            Err(LayerError::MetadataFileError(TomlFileError::IoError(_)))
        ));
    }

    #[test]
    fn env_and_profile_writes_fail_when_layer_root_is_a_file() {
        let (_temp_dir, layer) = test_layer();
        fs::write(layer.root(), "").unwrap();

        assert!(matches!(
            layer.append_build_env("NAME", "value"),
            Err(LayerError::IoError(_))
        ));
        assert!(matches!(
            layer.write_profile("script.sh", "export NAME=value"),
            Err(LayerError::IoError(_))
        ));
        assert!(matches!(
            layer.write_env_entries(&LayerEnv::new().chainable_insert(
                Scope::Launch,
                ModificationBehavior::Override,
                "NAME",
                "value"
            )),
            Err(LayerError::IoError(_))
        ));
    }

    #[test]
    fn append_build_env_writes_formatted_value() {
        let (_temp_dir, layer) = test_layer();

        layer
            .append_build_env("NAME", format!("{}-{}", "x", 1))
            .unwrap();

        assert_eq!(
            fs::read_to_string(layer.root().join("env.build").join("NAME.append")).unwrap(),
            "x-1"
        );
    }

    #[test]
    fn named_env_writers_use_derived_paths() {
        type Writer = fn(&Layer, &str, &str) -> Result<(), LayerError>;

        let writers: [(Writer, &str); 21] = [
            (|l, n, v| l.append_build_env(n, v), "env.build/NAME.append"),
            (|l, n, v| l.append_launch_env(n, v), "env.launch/NAME.append"),
            (|l, n, v| l.append_shared_env(n, v), "env/NAME.append"),
            (|l, n, v| l.append_path_build_env(n, v), "env.build/NAME"),
            (|l, n, v| l.append_path_launch_env(n, v), "env.launch/NAME"),
            (|l, n, v| l.append_path_shared_env(n, v), "env/NAME"),
            (|l, n, v| l.override_build_env(n, v), "env.build/NAME.override"),
            (|l, n, v| l.override_launch_env(n, v), "env.launch/NAME.override"),
            (|l, n, v| l.override_shared_env(n, v), "env/NAME.override"),
            (|l, n, v| l.prepend_build_env(n, v), "env.build/NAME.prepend"),
            (|l, n, v| l.prepend_launch_env(n, v), "env.launch/NAME.prepend"),
            (|l, n, v| l.prepend_shared_env(n, v), "env/NAME.prepend"),
            (|l, n, v| l.prepend_path_build_env(n, v), "env.build/NAME"),
            (|l, n, v| l.prepend_path_launch_env(n, v), "env.launch/NAME"),
            (|l, n, v| l.prepend_path_shared_env(n, v), "env/NAME"),
            (|l, n, v| l.default_build_env(n, v), "env.build/NAME.default"),
            (|l, n, v| l.default_launch_env(n, v), "env.launch/NAME.default"),
            (|l, n, v| l.default_shared_env(n, v), "env/NAME.default"),
            (|l, n, v| l.delimiter_build_env(n, v), "env.build/NAME.delim"),
            (|l, n, v| l.delimiter_launch_env(n, v), "env.launch/NAME.delim"),
            (|l, n, v| l.delimiter_shared_env(n, v), "env/NAME.delim"),
        ];

        for (index, (writer, relative_path)) in writers.into_iter().enumerate() {
            let (_temp_dir, layer) = test_layer();
            let value = format!("value-{index}");

            writer(&layer, "NAME", &value).unwrap();

            assert_eq!(
                fs::read_to_string(layer.root().join(relative_path)).unwrap(),
                value
            );
        }
    }

    #[test]
    fn env_writers_overwrite_existing_file() {
        let (_temp_dir, layer) = test_layer();

        layer
            .override_launch_env("JAVA_OPTS", "a much longer previous value")
            .unwrap();
        layer.override_launch_env("JAVA_OPTS", "-Xmx1G").unwrap();

        assert_eq!(
            fs::read_to_string(layer.root().join("env.launch").join("JAVA_OPTS.override"))
                .unwrap(),
            "-Xmx1G"
        );
    }

    #[test]
    fn write_profile_creates_directories() {
        let (_temp_dir, layer) = test_layer();

        layer
            .write_profile("jvm.sh", "export JAVA_HOME=/layers/jdk\n")
            .unwrap();

        assert_eq!(
            fs::read_to_string(layer.root().join("profile.d").join("jvm.sh")).unwrap(),
            "export JAVA_HOME=/layers/jdk\n"
        );
    }

    #[test]
    fn write_env_entries_writes_all_entries() {
        let (_temp_dir, layer) = test_layer();

        layer
            .write_env_entries(
                &LayerEnv::new()
                    .chainable_insert(Scope::Build, ModificationBehavior::Override, "A", "1")
                    .chainable_insert(Scope::Launch, ModificationBehavior::Default, "B", "2"),
            )
            .unwrap();

        assert!(layer.file_exists("env.build/A.override").unwrap());
        assert!(layer.file_exists("env.launch/B.default").unwrap());
        assert!(!layer.file_exists("env/A.override").unwrap());
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn file_exists_surfaces_other_errors() {
        let (_temp_dir, layer) = test_layer();
        fs::create_dir_all(layer.root()).unwrap();
        fs::write(layer.root().join("file"), "").unwrap();

        // A path component that is a regular file yields ENOTDIR, not NotFound.
        let result = layer.file_exists("file/child");
        assert!(result.is_err());
    }
}
