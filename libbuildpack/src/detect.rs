//! Provides detect phase specific types and helpers.

use crate::application::Application;
use crate::buildpack::Buildpack;
use crate::data::{build_plan::BuildPlan, buildpack::BuildpackDescriptor};
use crate::exit_code;
use crate::platform::Platform;
use crate::services::Services;
use std::path::PathBuf;

/// Context for the detect phase execution.
pub struct DetectContext<B: Buildpack + ?Sized> {
    pub app: Application,
    pub buildpack_dir: PathBuf,
    pub buildpack_descriptor: BuildpackDescriptor<B::Metadata>,
    pub platform: Platform,
    pub services: Services,
    pub stack_id: String,
}

/// Describes the result of the detect phase.
///
/// To construct values of this type, use a [`DetectResultBuilder`].
#[derive(Debug)]
#[must_use]
pub struct DetectResult(pub(crate) InnerDetectResult);

#[derive(Debug)]
pub(crate) enum InnerDetectResult {
    Pass { build_plan: Option<BuildPlan> },
    Fail,
    Error(i32),
}

impl DetectResult {
    /// The exit code of the detect executable for this result.
    pub fn exit_code(&self) -> i32 {
        match self.0 {
            InnerDetectResult::Pass { .. } => exit_code::DETECT_DETECTION_PASSED,
            InnerDetectResult::Fail => exit_code::DETECT_DETECTION_FAILED,
            InnerDetectResult::Error(code) => code,
        }
    }
}

/// Constructs [`DetectResult`] values.
///
/// # Examples:
/// ```
/// use libbuildpack::detect::DetectResultBuilder;
/// use libbuildpack::data::build_plan::{BuildPlan, Dependency};
///
/// let simple_pass = DetectResultBuilder::pass().build_unwrapped();
/// let simple_fail = DetectResultBuilder::fail().build_unwrapped();
/// let error = DetectResultBuilder::error(3).build_unwrapped();
///
/// let mut build_plan = BuildPlan::new();
/// build_plan.insert("node", Dependency::new("18.x"));
///
/// let with_build_plan = DetectResultBuilder::pass()
///     .build_plan(build_plan)
///     .build_unwrapped();
///
/// assert_eq!(simple_pass.exit_code(), 0);
///
/// assert_eq!(with_build_plan.exit_code(), 0);
/// assert_eq!(simple_fail.exit_code(), 100);
/// assert_eq!(error.exit_code(), 3);
/// ```
pub struct DetectResultBuilder;

impl DetectResultBuilder {
    pub fn pass() -> PassDetectResultBuilder {
        PassDetectResultBuilder { build_plan: None }
    }

    pub fn fail() -> FailDetectResultBuilder {
        FailDetectResultBuilder {}
    }

    /// Signals an error during detection. The detect executable exits with `code`, which should
    /// be neither `0` nor `100`.
    ///
    /// Those two codes are passed through unchanged, but the platform will read them as a pass
    /// or a fail respectively. A warning is logged when either is used.
    pub fn error(code: i32) -> ErrorDetectResultBuilder {
        if code == exit_code::DETECT_DETECTION_PASSED || code == exit_code::DETECT_DETECTION_FAILED {
            tracing::warn!(code, "Detect error code collides with a pass or fail exit code");
        }

        ErrorDetectResultBuilder { code }
    }
}

/// Constructs [`DetectResult`] values for a passed detection. Can't be used directly, use
/// a [`DetectResultBuilder`] to create an instance.
#[must_use]
pub struct PassDetectResultBuilder {
    build_plan: Option<BuildPlan>,
}

impl PassDetectResultBuilder {
    /// Builds the final [`DetectResult`].
    ///
    /// This method returns the [`DetectResult`] wrapped in a [`Result`] even though its
    /// technically not fallible. This is done to simplify using this method in the context it's
    /// most often used in: a buildpack's [detect method](crate::Buildpack::detect).
    ///
    /// See [`build_unwrapped`](Self::build_unwrapped) for an unwrapped version of this method.
    pub fn build<E>(self) -> crate::Result<DetectResult, E> {
        Ok(self.build_unwrapped())
    }

    pub fn build_unwrapped(self) -> DetectResult {
        DetectResult(InnerDetectResult::Pass {
            build_plan: self.build_plan,
        })
    }

    pub fn build_plan(mut self, build_plan: BuildPlan) -> Self {
        self.build_plan = Some(build_plan);
        self
    }
}

/// Constructs [`DetectResult`] values for a failed detection. Can't be used directly, use
/// a [`DetectResultBuilder`] to create an instance.
#[must_use]
pub struct FailDetectResultBuilder;

impl FailDetectResultBuilder {
    #[allow(clippy::unused_self)]
    pub fn build<E>(self) -> crate::Result<DetectResult, E> {
        Ok(self.build_unwrapped())
    }

    #[allow(clippy::unused_self)]
    pub fn build_unwrapped(self) -> DetectResult {
        DetectResult(InnerDetectResult::Fail)
    }
}

/// Constructs [`DetectResult`] values for an erroneous detection. Can't be used directly, use
/// a [`DetectResultBuilder`] to create an instance.
#[must_use]
pub struct ErrorDetectResultBuilder {
    code: i32,
}

impl ErrorDetectResultBuilder {
    pub fn build<E>(self) -> crate::Result<DetectResult, E> {
        Ok(self.build_unwrapped())
    }

    pub fn build_unwrapped(self) -> DetectResult {
        DetectResult(InnerDetectResult::Error(self.code))
    }
}
