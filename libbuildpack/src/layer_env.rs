//! Environment variable contributions of a layer.

use crate::util::write_os_str;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// The phase in which an environment variable contribution is visible.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum Scope {
    /// Visible to subsequent buildpacks during the build phase (`env.build/`).
    Build,
    /// Visible to the application at launch (`env.launch/`).
    Launch,
    /// Visible in both phases (`env/`).
    Shared,
}

impl Scope {
    /// Name of the directory inside the layer that holds files for this scope.
    #[must_use]
    pub fn directory_name(self) -> &'static str {
        match self {
            Scope::Build => "env.build",
            Scope::Launch => "env.launch",
            Scope::Shared => "env",
        }
    }
}

/// How the platform combines a contributed value with previous values of the same variable.
///
/// ([CNB spec: Environment Variable Modification Rules](https://github.com/buildpacks/spec/blob/main/buildpack.md#environment-variable-modification-rules))
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum ModificationBehavior {
    /// Appended to previous values without a delimiter.
    Append,
    /// Appended to previous values, joined with the OS path list separator.
    AppendPath,
    /// Only used if no previous value exists.
    Default,
    /// The delimiter used when appending or prepending.
    Delimiter,
    /// Replaces any previous value.
    Override,
    /// Prepended to previous values without a delimiter.
    Prepend,
    /// Prepended to previous values, joined with the OS path list separator.
    PrependPath,
}

impl ModificationBehavior {
    /// The file name suffix for this behavior.
    ///
    /// `AppendPath` and `PrependPath` both use the bare variable name, so a contribution of one
    /// replaces a contribution of the other for the same scope and name.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            ModificationBehavior::Append => ".append",
            ModificationBehavior::Default => ".default",
            ModificationBehavior::Delimiter => ".delim",
            ModificationBehavior::Override => ".override",
            ModificationBehavior::Prepend => ".prepend",
            ModificationBehavior::AppendPath | ModificationBehavior::PrependPath => "",
        }
    }
}

/// Path of the file holding the contribution for `name`, relative to the layer directory.
///
/// ```
/// use libbuildpack::layer_env::{env_file_path, ModificationBehavior, Scope};
/// use std::path::Path;
///
/// assert_eq!(
///     env_file_path(Scope::Build, ModificationBehavior::Append, "JAVA_OPTS"),
///     Path::new("env.build/JAVA_OPTS.append")
/// );
/// assert_eq!(
///     env_file_path(Scope::Shared, ModificationBehavior::AppendPath, "PATH"),
///     Path::new("env/PATH")
/// );
/// ```
#[must_use]
pub fn env_file_path(
    scope: Scope,
    modification_behavior: ModificationBehavior,
    name: impl AsRef<OsStr>,
) -> PathBuf {
    let mut file_name = name.as_ref().to_os_string();
    file_name.push(modification_behavior.suffix());

    Path::new(scope.directory_name()).join(file_name)
}

/// In-memory collection of environment variable contributions for a single layer.
///
/// Entries are keyed by scope, modification behavior and variable name. Inserting an entry for an
/// existing key replaces its value.
///
/// ```
/// use libbuildpack::layer_env::{LayerEnv, ModificationBehavior, Scope};
/// use std::fs;
///
/// let layer_env = LayerEnv::new()
///     .chainable_insert(Scope::Build, ModificationBehavior::Default, "FOO", "bar")
///     .chainable_insert(Scope::Shared, ModificationBehavior::Append, "PATH", "some-path");
///
/// let temp_dir = tempfile::tempdir().unwrap();
/// layer_env.write_to_layer_dir(temp_dir.path()).unwrap();
///
/// assert_eq!(
///     fs::read_to_string(temp_dir.path().join("env.build").join("FOO.default")).unwrap(),
///     "bar"
/// );
/// assert_eq!(
///     fs::read_to_string(temp_dir.path().join("env").join("PATH.append")).unwrap(),
///     "some-path"
/// );
/// ```
#[derive(Eq, PartialEq, Debug, Default, Clone)]
pub struct LayerEnv {
    entries: BTreeMap<(Scope, ModificationBehavior, OsString), OsString>,
}

impl LayerEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new entry, replacing the value of an existing entry with the same scope,
    /// modification behavior and name.
    pub fn insert(
        &mut self,
        scope: Scope,
        modification_behavior: ModificationBehavior,
        name: impl Into<OsString>,
        value: impl Into<OsString>,
    ) {
        self.entries
            .insert((scope, modification_behavior, name.into()), value.into());
    }

    /// Chainable version of [`LayerEnv::insert`].
    #[must_use]
    pub fn chainable_insert(
        mut self,
        scope: Scope,
        modification_behavior: ModificationBehavior,
        name: impl Into<OsString>,
        value: impl Into<OsString>,
    ) -> Self {
        self.insert(scope, modification_behavior, name, value);
        self
    }

    #[must_use]
    pub fn get(
        &self,
        scope: Scope,
        modification_behavior: ModificationBehavior,
        name: impl Into<OsString>,
    ) -> Option<&OsString> {
        self.entries
            .get(&(scope, modification_behavior, name.into()))
    }

    /// Iterates over all entries, ordered by scope, modification behavior and name.
    pub fn iter(&self) -> impl Iterator<Item = (Scope, ModificationBehavior, &OsStr, &OsStr)> {
        self.entries
            .iter()
            .map(|((scope, modification_behavior, name), value)| {
                (*scope, *modification_behavior, name.as_os_str(), value.as_os_str())
            })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every entry to its file inside the given layer directory.
    ///
    /// Files of other variables already present in the layer directory are left untouched, files
    /// for the same scope, behavior and name are overwritten.
    pub fn write_to_layer_dir(&self, layer_dir: impl AsRef<Path>) -> std::io::Result<()> {
        for (scope, modification_behavior, name, value) in self.iter() {
            let path = layer_dir
                .as_ref()
                .join(env_file_path(scope, modification_behavior, name));

            tracing::debug!(path = %path.display(), value = ?value, "Writing environment variable");
            write_os_str(&path, value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ALL_BEHAVIORS: [ModificationBehavior; 7] = [
        ModificationBehavior::Append,
        ModificationBehavior::AppendPath,
        ModificationBehavior::Default,
        ModificationBehavior::Delimiter,
        ModificationBehavior::Override,
        ModificationBehavior::Prepend,
        ModificationBehavior::PrependPath,
    ];

    #[test]
    fn env_file_path_for_every_scope_and_behavior() {
        let expected_suffixes = [
            ".append",
            "",
            ".default",
            ".delim",
            ".override",
            ".prepend",
            "",
        ];

        for (scope, directory) in [
            (Scope::Build, "env.build"),
            (Scope::Launch, "env.launch"),
            (Scope::Shared, "env"),
        ] {
            for (behavior, suffix) in ALL_BEHAVIORS.iter().zip(expected_suffixes) {
                assert_eq!(
                    env_file_path(scope, *behavior, "NAME"),
                    Path::new(directory).join(format!("NAME{suffix}"))
                );
            }
        }
    }

    #[test]
    fn insert_replaces_value_for_same_key() {
        let mut layer_env = LayerEnv::new();
        layer_env.insert(Scope::Build, ModificationBehavior::Append, "VAR", "foo");
        layer_env.insert(Scope::Build, ModificationBehavior::Append, "VAR", "bar");
        layer_env.insert(Scope::Launch, ModificationBehavior::Append, "VAR", "baz");

        assert_eq!(
            layer_env.get(Scope::Build, ModificationBehavior::Append, "VAR"),
            Some(&OsString::from("bar"))
        );
        assert_eq!(
            layer_env.get(Scope::Launch, ModificationBehavior::Append, "VAR"),
            Some(&OsString::from("baz"))
        );
        assert_eq!(layer_env.iter().count(), 2);
    }

    #[test]
    fn write_to_layer_dir_keeps_unrelated_files() {
        let temp_dir = tempdir().unwrap();
        let layer_dir = temp_dir.path();
        fs::create_dir_all(layer_dir.join("env.launch")).unwrap();
        fs::write(layer_dir.join("env.launch").join("OTHER.override"), "kept").unwrap();
        fs::write(layer_dir.join("env.launch").join("JAVA_OPTS.append"), "stale").unwrap();

        LayerEnv::new()
            .chainable_insert(
                Scope::Launch,
                ModificationBehavior::Append,
                "JAVA_OPTS",
                "-Xmx1G",
            )
            .chainable_insert(Scope::Launch, ModificationBehavior::Delimiter, "JAVA_OPTS", " ")
            .chainable_insert(Scope::Shared, ModificationBehavior::PrependPath, "PATH", "/bin")
            .write_to_layer_dir(layer_dir)
            .unwrap();

        let read = |relative: &str| fs::read_to_string(layer_dir.join(relative)).unwrap();

        assert_eq!(read("env.launch/OTHER.override"), "kept");
        assert_eq!(read("env.launch/JAVA_OPTS.append"), "-Xmx1G");
        assert_eq!(read("env.launch/JAVA_OPTS.delim"), " ");
        assert_eq!(read("env/PATH"), "/bin");
    }

    #[test]
    fn path_behaviors_share_a_file() {
        let temp_dir = tempdir().unwrap();

        LayerEnv::new()
            .chainable_insert(Scope::Build, ModificationBehavior::AppendPath, "PATH", "a")
            .chainable_insert(Scope::Build, ModificationBehavior::PrependPath, "PATH", "b")
            .write_to_layer_dir(temp_dir.path())
            .unwrap();

        // PrependPath sorts after AppendPath, so its value is written last.
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("env.build").join("PATH")).unwrap(),
            "b"
        );
    }
}
