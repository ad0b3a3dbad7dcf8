use crate::newtypes::libbuildpack_newtype;
use serde::{Deserialize, Serialize};

/// Data structure for the `launch.toml` file.
///
/// Describes the processes the platform can start from the final image and how the
/// application directory is sliced into image layers. Order matters: processes and slices are
/// written in the order they were added.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Launch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<Process>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slices: Vec<Slice>,
}

/// A non-consuming builder for [`Launch`] values.
///
/// # Examples
/// ```
/// use libbuildpack_data::launch::{LaunchBuilder, ProcessBuilder};
///
/// let launch_toml = LaunchBuilder::new()
///     .process(
///         ProcessBuilder::new("web".parse().unwrap(), "bundle")
///             .args(vec!["exec", "ruby", "app.rb"])
///             .build(),
///     )
///     .slice(vec!["public/**"])
///     .build();
///
/// assert!(toml::to_string(&launch_toml).is_ok());
/// ```
#[derive(Default)]
pub struct LaunchBuilder {
    launch: Launch,
}

impl LaunchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a process to the launch configuration.
    pub fn process<P: Into<Process>>(&mut self, process: P) -> &mut Self {
        self.launch.processes.push(process.into());
        self
    }

    /// Adds multiple processes to the launch configuration.
    pub fn processes<I: IntoIterator<Item = P>, P: Into<Process>>(
        &mut self,
        processes: I,
    ) -> &mut Self {
        for process in processes {
            self.process(process);
        }

        self
    }

    /// Adds a label to the launch configuration.
    pub fn label<L: Into<Label>>(&mut self, label: L) -> &mut Self {
        self.launch.labels.push(label.into());
        self
    }

    /// Adds a slice to the launch configuration.
    pub fn slice<S: Into<Slice>>(&mut self, slice: S) -> &mut Self {
        self.launch.slices.push(slice.into());
        self
    }

    /// Adds multiple slices to the launch configuration.
    pub fn slices<I: IntoIterator<Item = S>, S: Into<Slice>>(&mut self, slices: I) -> &mut Self {
        for slice in slices {
            self.slice(slice);
        }

        self
    }

    /// Builds the `Launch` based on the configuration of this builder.
    #[must_use]
    pub fn build(&self) -> Launch {
        self.launch.clone()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Label {
    fn from((key, value): (K, V)) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A process the platform can start from the final image.
///
/// `direct` is always written to `launch.toml`, even when `false`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Process {
    pub r#type: ProcessType,
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default)]
    pub direct: bool,
}

impl Process {
    pub fn new(r#type: ProcessType, command: impl Into<String>, direct: bool) -> Self {
        Self {
            r#type,
            command: command.into(),
            args: Vec::new(),
            direct,
        }
    }
}

/// A non-consuming builder for [`Process`] values.
///
/// # Examples
/// ```
/// # use libbuildpack_data::launch::ProcessBuilder;
/// ProcessBuilder::new("web".parse().unwrap(), "java")
///     .arg("-jar")
///     .arg("target/application-1.0.0.jar")
///     .direct(true)
///     .build();
/// ```
pub struct ProcessBuilder {
    process: Process,
}

impl ProcessBuilder {
    /// Constructs a new `ProcessBuilder` with no arguments and `direct` set to `false`.
    pub fn new(r#type: ProcessType, command: impl Into<String>) -> Self {
        Self {
            process: Process::new(r#type, command, false),
        }
    }

    /// Adds an argument to the process.
    ///
    /// Only one argument can be passed per use. To pass multiple arguments see [`args`](Self::args).
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.process.args.push(arg.into());
        self
    }

    /// Adds multiple arguments to pass to the process.
    pub fn args(&mut self, args: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        for arg in args {
            self.arg(arg);
        }

        self
    }

    /// Sets the `direct` flag on the process.
    ///
    /// If this is true, the lifecycle will launch the command directly, rather than via a shell.
    pub fn direct(&mut self, value: bool) -> &mut Self {
        self.process.direct = value;
        self
    }

    /// Builds the `Process` based on the configuration of this builder.
    #[must_use]
    pub fn build(&self) -> Process {
        self.process.clone()
    }
}

/// A set of paths in the application directory that the platform exports as a separate layer.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Slice {
    /// Paths (or path globs) for this slice, written verbatim in the given order.
    pub paths: Vec<String>,
}

impl<S: Into<String>> From<Vec<S>> for Slice {
    fn from(paths: Vec<S>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

libbuildpack_newtype!(
    /// The type of a process.
    ///
    /// It MUST only contain numbers, letters, and the characters `.`, `_`, and `-`.
    ///
    /// # Examples
    /// ```
    /// use libbuildpack_data::launch::ProcessType;
    ///
    /// let valid: Result<ProcessType, _> = "web".parse();
    /// assert!(valid.is_ok());
    ///
    /// let invalid: Result<ProcessType, _> = "!nv4lid".parse();
    /// assert!(invalid.is_err());
    /// ```
    ProcessType,
    ProcessTypeError,
    r"^[[:alnum:]._-]+$"
);
