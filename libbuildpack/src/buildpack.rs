use crate::build::{BuildContext, BuildResult};
use crate::detect::{DetectContext, DetectResult};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A buildpack written with libbuildpack.
///
/// Besides the detect and build entry points, it holds associated types for the type of its
/// `buildpack.toml` metadata and its own error type.
pub trait Buildpack {
    /// The type of the `[metadata]` table in the buildpack's `buildpack.toml`. Use
    /// [`GenericMetadata`](crate::generic::GenericMetadata) for raw, untyped TOML.
    type Metadata: DeserializeOwned;

    /// The error type for buildpack specific errors, usually an enum. The library's own errors
    /// are reported through [`Error`](crate::Error), which wraps this type.
    type Error: Debug;

    /// Detect logic for this buildpack.
    fn detect(&self, context: DetectContext<Self>) -> crate::Result<DetectResult, Self::Error>;

    /// Build logic for this buildpack.
    fn build(&self, context: BuildContext<Self>) -> crate::Result<BuildResult, Self::Error>;

    /// Called with any unhandled error before the buildpack exits.
    ///
    /// The default implementation prints the error (using its [`Debug`] implementation) to
    /// stderr.
    fn on_error(&self, error: crate::Error<Self::Error>) {
        eprintln!("Unhandled error:");
        eprintln!("> {error:?}");
        eprintln!("Buildpack will exit!");
    }
}
