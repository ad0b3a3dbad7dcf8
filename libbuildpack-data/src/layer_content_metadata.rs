use serde::{Deserialize, Serialize};

/// Describes in which phases a layer is available and whether it is cached.
///
/// No flag implies another, all combinations (including none) are valid.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, Eq, PartialEq)]
pub struct LayerTypes {
    /// Whether the layer is available to subsequent buildpacks during the build phase.
    #[serde(default)]
    pub build: bool,

    /// Whether the layer is restored from the cache on the next build.
    #[serde(default)]
    pub cache: bool,

    /// Whether the layer is exported into the final image.
    #[serde(default)]
    pub launch: bool,
}

/// Describes the content of a `<layers>/<layer>.toml` file.
///
/// The three [`LayerTypes`] flags are written at the top level of the document, the metadata
/// goes into the `[metadata]` table.
///
/// ```
/// use libbuildpack_data::layer_content_metadata::{LayerContentMetadata, LayerTypes};
///
/// let content = LayerContentMetadata {
///     types: LayerTypes {
///         build: true,
///         cache: true,
///         launch: false,
///     },
///     metadata: toml::toml! {
///         version = "2.5"
///     },
/// };
///
/// let serialized = toml::to_string(&content).unwrap();
/// assert!(serialized.starts_with("build = true\ncache = true\nlaunch = false\n"));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LayerContentMetadata<M> {
    #[serde(flatten)]
    pub types: LayerTypes,

    pub metadata: M,
}
