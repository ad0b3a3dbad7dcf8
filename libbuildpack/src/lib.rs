#![doc = include_str!("../README.md")]
// This lint is too noisy and enforces a style that reduces readability in many cases.
#![allow(clippy::module_name_repetitions)]
// This lint triggers when both layer_dir and layers_dir are present which are quite common.
#![allow(clippy::similar_names)]

pub mod build;
pub mod detect;
pub mod generic;
pub mod layer;
pub mod layer_env;

mod application;
mod buildpack;
mod env;
mod error;
mod exit_code;
mod layers;
mod logging;
mod platform;
mod runtime;
mod services;
mod util;

#[doc(inline)]
pub use libbuildpack_data as data;

pub use application::Application;
pub use buildpack::Buildpack;
pub use env::Env;
pub use error::{Error, Result};
pub use layer::{Layer, LayerError};
pub use layers::Layers;
pub use platform::{EnvironmentVariable, EnvironmentVariables, Platform};
pub use runtime::{
    libbuildpack_runtime, libbuildpack_runtime_build, libbuildpack_runtime_detect, BuildArgs,
    DetectArgs,
};
pub use services::{Credentials, Service, Services, ServicesError, SERVICES_ENV_VAR};

/// Generates a main function for the given buildpack.
///
/// It will create the main function and wires up the buildpack to the framework.
///
/// # Example:
/// ```
/// use libbuildpack::build::{BuildContext, BuildResult, BuildResultBuilder};
/// use libbuildpack::detect::{DetectContext, DetectResult, DetectResultBuilder};
/// use libbuildpack::generic::{GenericError, GenericMetadata};
/// use libbuildpack::{buildpack_main, Buildpack};
///
/// struct MyBuildpack;
///
/// impl Buildpack for MyBuildpack {
///     type Metadata = GenericMetadata;
///     type Error = GenericError;
///
///     fn detect(&self, context: DetectContext<Self>) -> libbuildpack::Result<DetectResult, Self::Error> {
///         DetectResultBuilder::pass().build()
///     }
///
///     fn build(&self, context: BuildContext<Self>) -> libbuildpack::Result<BuildResult, Self::Error> {
///         BuildResultBuilder::success().build()
///     }
/// }
///
/// buildpack_main!(MyBuildpack);
/// ```
#[macro_export]
macro_rules! buildpack_main {
    ($buildpack:expr) => {
        fn main() {
            ::libbuildpack::libbuildpack_runtime(&$buildpack);
        }
    };
}
