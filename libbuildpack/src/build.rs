//! Provides build phase specific types and helpers.

use crate::application::Application;
use crate::buildpack::Buildpack;
use crate::data::{buildpack::BuildpackDescriptor, buildpack_plan::BuildpackPlan, launch::Launch};
use crate::exit_code;
use crate::layers::Layers;
use crate::platform::Platform;
use crate::services::Services;
use std::path::PathBuf;

/// Context for the build phase execution.
pub struct BuildContext<B: Buildpack + ?Sized> {
    pub layers: Layers,
    pub app: Application,
    pub buildpack_dir: PathBuf,
    pub buildpack_descriptor: BuildpackDescriptor<B::Metadata>,
    pub buildpack_plan: BuildpackPlan,
    pub platform: Platform,
    pub services: Services,
    pub stack_id: String,
}

/// Describes the result of the build phase.
///
/// To construct values of this type, use a [`BuildResultBuilder`].
#[derive(Debug)]
#[must_use]
pub struct BuildResult(pub(crate) InnerBuildResult);

#[derive(Debug)]
pub(crate) enum InnerBuildResult {
    Success {
        launch: Option<Launch>,
        store: Option<toml::Table>,
    },
    Failure(i32),
}

impl BuildResult {
    /// The exit code of the build executable for this result.
    pub fn exit_code(&self) -> i32 {
        match self.0 {
            InnerBuildResult::Success { .. } => exit_code::GENERIC_SUCCESS,
            InnerBuildResult::Failure(code) => code,
        }
    }
}

/// Constructs [`BuildResult`] values.
///
/// # Examples:
/// ```
/// use libbuildpack::build::BuildResultBuilder;
/// use libbuildpack::data::launch::{LaunchBuilder, ProcessBuilder};
///
/// let simple = BuildResultBuilder::success().build_unwrapped();
/// assert_eq!(simple.exit_code(), 0);
///
/// let with_launch = BuildResultBuilder::success()
///     .launch(
///         LaunchBuilder::new()
///             .process(ProcessBuilder::new("web".parse().unwrap(), "bundle exec rails s").build())
///             .build(),
///     )
///     .build_unwrapped();
///
/// let failure = BuildResultBuilder::failure(7).build_unwrapped();
/// assert_eq!(failure.exit_code(), 7);
/// ```
pub struct BuildResultBuilder;

impl BuildResultBuilder {
    pub fn success() -> SuccessBuildResultBuilder {
        SuccessBuildResultBuilder {
            launch: None,
            store: None,
        }
    }

    /// Signals an unsuccessful build. The build executable exits with `code`, which should be
    /// positive.
    ///
    /// A code of `0` is passed through unchanged, which the platform reads as success. A warning
    /// is logged in that case.
    pub fn failure(code: i32) -> FailureBuildResultBuilder {
        if code == exit_code::GENERIC_SUCCESS {
            tracing::warn!(code, "Build failure code collides with the success exit code");
        }

        FailureBuildResultBuilder { code }
    }
}

/// Constructs [`BuildResult`] values for a successful build. Can't be used directly, use
/// a [`BuildResultBuilder`] to create an instance.
#[must_use]
pub struct SuccessBuildResultBuilder {
    launch: Option<Launch>,
    store: Option<toml::Table>,
}

impl SuccessBuildResultBuilder {
    /// Builds the final [`BuildResult`].
    ///
    /// This method returns the [`BuildResult`] wrapped in a [`Result`] even though its
    /// technically not fallible. This is done to simplify using this method in the context it's
    /// most often used in: a buildpack's [build method](crate::Buildpack::build).
    pub fn build<E>(self) -> crate::Result<BuildResult, E> {
        Ok(self.build_unwrapped())
    }

    pub fn build_unwrapped(self) -> BuildResult {
        BuildResult(InnerBuildResult::Success {
            launch: self.launch,
            store: self.store,
        })
    }

    /// Sets the content of `launch.toml`.
    pub fn launch(mut self, launch: Launch) -> Self {
        self.launch = Some(launch);
        self
    }

    /// Sets the `[metadata]` table of `store.toml`.
    pub fn store(mut self, metadata: toml::Table) -> Self {
        self.store = Some(metadata);
        self
    }
}

/// Constructs [`BuildResult`] values for a failed build. Can't be used directly, use
/// a [`BuildResultBuilder`] to create an instance.
#[must_use]
pub struct FailureBuildResultBuilder {
    code: i32,
}

impl FailureBuildResultBuilder {
    pub fn build<E>(self) -> crate::Result<BuildResult, E> {
        Ok(self.build_unwrapped())
    }

    pub fn build_unwrapped(self) -> BuildResult {
        BuildResult(InnerBuildResult::Failure(self.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::launch::LaunchBuilder;

    #[test]
    fn exit_codes() {
        assert_eq!(BuildResultBuilder::success().build_unwrapped().exit_code(), 0);
        assert_eq!(BuildResultBuilder::failure(5).build_unwrapped().exit_code(), 5);
        assert_eq!(BuildResultBuilder::failure(0).build_unwrapped().exit_code(), 0);
    }

    #[test]
    fn success_keeps_launch_and_store() {
        let mut store = toml::Table::new();
        store.insert(String::from("key"), toml::Value::from("value"));

        let result = BuildResultBuilder::success()
            .launch(LaunchBuilder::new().build())
            .store(store.clone())
            .build_unwrapped();

        assert!(matches!(
            result.0,
            InnerBuildResult::Success { launch: Some(_), store: Some(ref written) } if *written == store
        ));
    }
}
