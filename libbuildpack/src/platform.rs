use crate::util::read_os_string;
use crate::Env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// The platform directory handed to the buildpack by the platform.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Platform {
    pub root: PathBuf,
    /// User-provided environment variables from `<platform>/env/`, ordered by name.
    pub envs: EnvironmentVariables,
}

impl Platform {
    /// Initializes the platform from the given platform directory.
    ///
    /// A missing `env` directory yields no environment variables.
    ///
    /// # Examples
    /// ```no_run
    /// use libbuildpack::Platform;
    ///
    /// let platform = Platform::from_path("/platform").unwrap();
    /// ```
    pub fn from_path(platform_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = platform_dir.as_ref().to_path_buf();
        let env_path = root.join("env");
        let mut environment_variables = Vec::new();

        match fs::read_dir(&env_path) {
            Ok(entries) => {
                for entry in entries {
                    let path = entry?.path();

                    // k8s volume mounts will mount a directory symlink in, so we need to check
                    // that it's actually a file
                    if !path.is_file() {
                        continue;
                    }

                    if let Some(file_name) = path.file_name() {
                        environment_variables.push(EnvironmentVariable {
                            name: file_name.to_os_string(),
                            file: path.clone(),
                        });
                    }
                }
            }
            Err(io_error) if io_error.kind() == std::io::ErrorKind::NotFound => {}
            Err(io_error) => return Err(io_error),
        }

        environment_variables.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            path = %env_path.display(),
            names = ?environment_variables.iter().map(|variable| &variable.name).collect::<Vec<_>>(),
            "Platform environment variables"
        );

        Ok(Self {
            root,
            envs: EnvironmentVariables(environment_variables),
        })
    }
}

/// An environment variable provided by the platform as a file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EnvironmentVariable {
    pub name: OsString,
    /// The file holding the value.
    pub file: PathBuf,
}

impl EnvironmentVariable {
    /// Reads the value from [`file`](Self::file). The contents are not trimmed or otherwise
    /// modified.
    pub fn value(&self) -> std::io::Result<OsString> {
        read_os_string(&self.file)
    }

    /// Inserts this variable into `env`.
    pub fn set(&self, env: &mut Env) -> std::io::Result<()> {
        let value = self.value()?;

        tracing::debug!(name = ?self.name, value = ?value, "Setting environment variable");
        env.insert(&self.name, value);

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EnvironmentVariables(Vec<EnvironmentVariable>);

impl EnvironmentVariables {
    /// Whether a variable with exactly this name exists. Names are case-sensitive.
    #[must_use]
    pub fn contains(&self, name: impl AsRef<OsStr>) -> bool {
        self.0
            .iter()
            .any(|variable| variable.name == name.as_ref())
    }

    #[must_use]
    pub fn get(&self, name: impl AsRef<OsStr>) -> Option<&EnvironmentVariable> {
        self.0
            .iter()
            .find(|variable| variable.name == name.as_ref())
    }

    /// Sets all variables into `env`, in order.
    ///
    /// Stops at the first variable whose value cannot be read. Variables set before that remain
    /// in `env`.
    pub fn set_all(&self, env: &mut Env) -> std::io::Result<()> {
        self.0.iter().try_for_each(|variable| variable.set(env))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnvironmentVariable> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<EnvironmentVariable>> for EnvironmentVariables {
    fn from(value: Vec<EnvironmentVariable>) -> Self {
        Self(value)
    }
}

impl<'a> IntoIterator for &'a EnvironmentVariables {
    type Item = &'a EnvironmentVariable;
    type IntoIter = std::slice::Iter<'a, EnvironmentVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
