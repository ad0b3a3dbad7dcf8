use libbuildpack::build::{BuildContext, BuildResult, BuildResultBuilder};
use libbuildpack::data::build_plan::{BuildPlan, Dependency};
use libbuildpack::data::launch::{LaunchBuilder, ProcessBuilder, ProcessType, ProcessTypeError};
use libbuildpack::data::layer_content_metadata::LayerTypes;
use libbuildpack::detect::{DetectContext, DetectResult, DetectResultBuilder};
use libbuildpack::{buildpack_main, Buildpack, Env, LayerError};
use serde::{Deserialize, Serialize};

pub(crate) struct BasicBuildpack;

#[derive(Deserialize, Debug)]
pub(crate) struct BasicBuildpackMetadata {
    greeting: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct GreetingLayerMetadata {
    greeting: String,
}

#[derive(Debug)]
pub(crate) enum BasicBuildpackError {
    ApplicationDirectory(std::io::Error),
    PlatformEnvironment(std::io::Error),
    GreetingLayer(LayerError),
    ProcessType(ProcessTypeError),
}

impl From<BasicBuildpackError> for libbuildpack::Error<BasicBuildpackError> {
    fn from(error: BasicBuildpackError) -> Self {
        Self::BuildpackError(error)
    }
}

impl Buildpack for BasicBuildpack {
    type Metadata = BasicBuildpackMetadata;
    type Error = BasicBuildpackError;

    fn detect(
        &self,
        context: DetectContext<Self>,
    ) -> libbuildpack::Result<DetectResult, Self::Error> {
        let has_greeting = context
            .app
            .file_exists("greeting.txt")
            .map_err(BasicBuildpackError::ApplicationDirectory)?;

        if has_greeting {
            let mut build_plan = BuildPlan::new();
            build_plan.insert("greeting", Dependency::new("1"));

            DetectResultBuilder::pass().build_plan(build_plan).build()
        } else {
            DetectResultBuilder::fail().build()
        }
    }

    fn build(&self, context: BuildContext<Self>) -> libbuildpack::Result<BuildResult, Self::Error> {
        println!(
            "The build is running on stack {} with {} bound service(s)!",
            context.stack_id,
            context.services.len()
        );

        let mut env = Env::from_current();
        context
            .platform
            .envs
            .set_all(&mut env)
            .map_err(BasicBuildpackError::PlatformEnvironment)?;

        let greeting = env
            .get_string_lossy("GREETING")
            .unwrap_or_else(|| context.buildpack_descriptor.metadata.greeting.clone());

        let layer = context.layers.layer("greeting");
        let cached = layer
            .read_metadata::<GreetingLayerMetadata>()
            .map_err(BasicBuildpackError::GreetingLayer)?;

        if cached.is_some_and(|metadata| metadata.greeting == greeting) {
            println!("Reusing cached greeting layer");
        } else {
            layer
                .write_metadata(
                    &GreetingLayerMetadata {
                        greeting: greeting.clone(),
                    },
                    LayerTypes {
                        build: false,
                        cache: true,
                        launch: true,
                    },
                )
                .and_then(|()| layer.override_launch_env("GREETING", &greeting))
                .map_err(BasicBuildpackError::GreetingLayer)?;
        }

        let web = "web"
            .parse::<ProcessType>()
            .map_err(BasicBuildpackError::ProcessType)?;

        BuildResultBuilder::success()
            .launch(
                LaunchBuilder::new()
                    .process(ProcessBuilder::new(web, "echo").arg("$GREETING").build())
                    .build(),
            )
            .build()
    }
}

buildpack_main!(BasicBuildpack);
