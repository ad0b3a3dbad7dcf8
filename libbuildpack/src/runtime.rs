use crate::application::Application;
use crate::build::{BuildContext, InnerBuildResult};
use crate::buildpack::Buildpack;
use crate::data::buildpack::BuildpackDescriptor;
use crate::detect::{DetectContext, InnerDetectResult};
use crate::error::Error;
use crate::exit_code;
use crate::layers::Layers;
use crate::logging::init_logging;
use crate::platform::Platform;
use crate::services::Services;
use crate::{Env, Result};
use libbuildpack_common::{read_toml_file, write_toml_file};
use serde::de::DeserializeOwned;
use std::env::VarError;
use std::ffi::OsStr;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::exit;

const STACK_ID_ENV_VAR: &str = "CNB_STACK_ID";
const BUILDPACK_DIR_ENV_VAR: &str = "CNB_BUILDPACK_DIR";

/// Main entry point for this library.
///
/// A single binary serves as both `bin/detect` and `bin/build`: the file name by which it is
/// invoked determines the phase. The desired file names are usually created as symlinks to this
/// binary.
///
/// This function never returns, it exits the process with the exit code of the phase.
pub fn libbuildpack_runtime<B: Buildpack>(buildpack: &B) {
    let env = Env::from_current();
    init_logging(&env);

    // Using `std::env::args()` instead of `std::env::current_exe()` since the latter resolves
    // symlinks to their target on some platforms, whereas we need the original filename.
    let args: Vec<String> = std::env::args().collect();
    let current_exe_file_name = args
        .first()
        .map(Path::new)
        .and_then(Path::file_name)
        .and_then(OsStr::to_str);

    let result = match current_exe_file_name {
        Some("detect") => {
            let Some(detect_args) = DetectArgs::parse(&args) else {
                eprintln!("Usage: detect <platform_dir> <buildplan>");
                eprintln!("https://github.com/buildpacks/spec/blob/main/buildpack.md#detection");
                exit(exit_code::GENERIC_UNSPECIFIED_ERROR);
            };

            libbuildpack_runtime_detect(buildpack, detect_args, &env)
        }
        Some("build") => {
            let Some(build_args) = BuildArgs::parse(&args) else {
                eprintln!("Usage: build <layers> <platform> <plan>");
                eprintln!("https://github.com/buildpacks/spec/blob/main/buildpack.md#build");
                exit(exit_code::GENERIC_UNSPECIFIED_ERROR);
            };

            libbuildpack_runtime_build(buildpack, build_args, &env)
        }
        other => {
            eprintln!(
                "Error: Expected the name of this executable to be 'detect' or 'build', but it was '{}'",
                other.unwrap_or("<unknown>")
            );
            eprintln!("The executable name is used to determine the current buildpack phase.");
            eprintln!("You might want to create 'detect' and 'build' links to this executable and run those instead.");
            exit(exit_code::GENERIC_UNEXPECTED_EXECUTABLE_NAME_ERROR)
        }
    };

    match result {
        Ok(code) => exit(code),
        Err(error) => {
            tracing::debug!(error = ?error, "Buildpack failed");
            buildpack.on_error(error);
            exit(exit_code::GENERIC_UNSPECIFIED_ERROR);
        }
    }
}

/// Detect entry point for this library.
///
/// Exposed only to allow for advanced use-cases where detect is programmatically invoked.
/// `env` is used in place of the environment of the current process. Returns the exit code of
/// the phase.
pub fn libbuildpack_runtime_detect<B: Buildpack>(
    buildpack: &B,
    args: DetectArgs,
    env: &Env,
) -> Result<i32, B::Error> {
    let app = Application::from_current_dir().map_err(Error::CannotDetermineAppDirectory)?;
    let stack_id = read_stack_id::<B::Error>(env)?;
    let buildpack_dir = read_buildpack_dir::<B::Error>(env)?;
    let buildpack_descriptor =
        read_buildpack_descriptor::<B::Metadata, B::Error>(&buildpack_dir)?;

    let platform =
        Platform::from_path(&args.platform_dir_path).map_err(Error::CannotCreatePlatformFromPath)?;
    let services = Services::from_env(env).map_err(Error::CannotReadServices)?;

    let detect_result = buildpack.detect(DetectContext {
        app,
        buildpack_dir,
        buildpack_descriptor,
        platform,
        services,
        stack_id,
    })?;

    if let InnerDetectResult::Pass {
        build_plan: Some(build_plan),
    } = &detect_result.0
    {
        write_toml_file(build_plan, &args.build_plan_path).map_err(Error::CannotWriteBuildPlan)?;
    }

    let code = detect_result.exit_code();
    tracing::debug!(exit_code = code, "Detection finished");

    Ok(code)
}

/// Build entry point for this library.
///
/// Exposed only to allow for advanced use-cases where build is programmatically invoked.
/// `env` is used in place of the environment of the current process. Returns the exit code of
/// the phase.
pub fn libbuildpack_runtime_build<B: Buildpack>(
    buildpack: &B,
    args: BuildArgs,
    env: &Env,
) -> Result<i32, B::Error> {
    let layers = Layers::new(args.layers_dir_path);
    let app = Application::from_current_dir().map_err(Error::CannotDetermineAppDirectory)?;
    let stack_id = read_stack_id::<B::Error>(env)?;
    let buildpack_dir = read_buildpack_dir::<B::Error>(env)?;
    let buildpack_descriptor =
        read_buildpack_descriptor::<B::Metadata, B::Error>(&buildpack_dir)?;

    let platform =
        Platform::from_path(&args.platform_dir_path).map_err(Error::CannotCreatePlatformFromPath)?;
    let services = Services::from_env(env).map_err(Error::CannotReadServices)?;
    let buildpack_plan =
        read_toml_file(&args.buildpack_plan_path).map_err(Error::CannotReadBuildpackPlan)?;

    let build_result = buildpack.build(BuildContext {
        layers: layers.clone(),
        app,
        buildpack_dir,
        buildpack_descriptor,
        buildpack_plan,
        platform,
        services,
        stack_id,
    })?;

    if let InnerBuildResult::Success { launch, store } = &build_result.0 {
        if let Some(launch) = launch {
            layers
                .write_application_metadata(launch)
                .map_err(Error::CannotWriteLaunch)?;
        }

        if let Some(store) = store {
            layers
                .write_persistent_metadata(store)
                .map_err(Error::CannotWriteStore)?;
        }
    }

    let code = build_result.exit_code();
    tracing::debug!(exit_code = code, "Build finished");

    Ok(code)
}

/// Positional arguments of the detect executable.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DetectArgs {
    pub platform_dir_path: PathBuf,
    pub build_plan_path: PathBuf,
}

impl DetectArgs {
    /// Parses the full argument list, including the executable name at position zero.
    #[must_use]
    pub fn parse(args: &[String]) -> Option<Self> {
        if let [_, platform_dir_path, build_plan_path] = args {
            Some(Self {
                platform_dir_path: PathBuf::from(platform_dir_path),
                build_plan_path: PathBuf::from(build_plan_path),
            })
        } else {
            None
        }
    }
}

/// Positional arguments of the build executable.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BuildArgs {
    pub layers_dir_path: PathBuf,
    pub platform_dir_path: PathBuf,
    pub buildpack_plan_path: PathBuf,
}

impl BuildArgs {
    /// Parses the full argument list, including the executable name at position zero.
    #[must_use]
    pub fn parse(args: &[String]) -> Option<Self> {
        if let [_, layers_dir_path, platform_dir_path, buildpack_plan_path] = args {
            Some(Self {
                layers_dir_path: PathBuf::from(layers_dir_path),
                platform_dir_path: PathBuf::from(platform_dir_path),
                buildpack_plan_path: PathBuf::from(buildpack_plan_path),
            })
        } else {
            None
        }
    }
}

fn read_stack_id<E: Debug>(env: &Env) -> Result<String, E> {
    env.get(STACK_ID_ENV_VAR)
        .ok_or(VarError::NotPresent)
        .and_then(|value| {
            value
                .to_str()
                .map(String::from)
                .ok_or_else(|| VarError::NotUnicode(value.clone()))
        })
        .map_err(Error::CannotDetermineStackId)
}

fn read_buildpack_dir<E: Debug>(env: &Env) -> Result<PathBuf, E> {
    env.get(BUILDPACK_DIR_ENV_VAR)
        .map(PathBuf::from)
        .or_else(|| {
            std::env::args_os()
                .next()
                .and_then(|executable| buildpack_dir_from_executable(Path::new(&executable)))
        })
        .ok_or(Error::CannotDetermineBuildpackDirectory)
}

/// Executables live in `<buildpack>/bin/`, so the buildpack directory is their grandparent.
fn buildpack_dir_from_executable(executable: &Path) -> Option<PathBuf> {
    executable
        .parent()
        .and_then(Path::parent)
        .filter(|path| !path.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn read_buildpack_descriptor<BM: DeserializeOwned, E: Debug>(
    buildpack_dir: &Path,
) -> Result<BuildpackDescriptor<BM>, E> {
    read_toml_file(buildpack_dir.join("buildpack.toml"))
        .map_err(Error::CannotReadBuildpackDescriptor)
}
