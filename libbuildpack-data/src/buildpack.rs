use crate::newtypes::libbuildpack_newtype;
use serde::Deserialize;

/// Data structure for the buildpack descriptor (`buildpack.toml`).
///
/// `BM` is the type of the free-form `[metadata]` table.
///
/// # Examples
/// ```
/// use libbuildpack_data::buildpack::BuildpackDescriptor;
///
/// let toml_str = r#"
/// api = "0.2"
///
/// [buildpack]
/// id = "org.example.jvm"
/// name = "JVM Buildpack"
/// version = "1.0.0"
///
/// [[stacks]]
/// id = "io.buildpacks.stacks.bionic"
/// build-images = ["cnbs/build:bionic"]
/// run-images = ["cnbs/run:bionic"]
///
/// [metadata]
/// checksum = "awesome"
/// "#;
///
/// let result = toml::from_str::<BuildpackDescriptor<toml::Table>>(toml_str);
/// assert!(result.is_ok());
/// ```
#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct BuildpackDescriptor<BM> {
    pub api: Option<String>,
    pub buildpack: BuildpackInfo,
    #[serde(default)]
    pub stacks: Vec<Stack>,
    pub metadata: BM,
}

#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildpackInfo {
    pub id: BuildpackId,
    pub name: String,
    pub version: String,
    pub homepage: Option<String>,
}

/// A stack the buildpack is compatible with, optionally narrowed to specific images.
#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Stack {
    pub id: String,
    #[serde(default)]
    pub build_images: Vec<String>,
    #[serde(default)]
    pub run_images: Vec<String>,
}

libbuildpack_newtype!(
    /// The ID of a buildpack.
    ///
    /// It MUST only contain numbers, letters, and the characters `.`, `/`, and `-`.
    /// It also MUST NOT be `app`, `config` or `sbom`.
    ///
    /// # Examples
    /// ```
    /// use libbuildpack_data::buildpack::BuildpackId;
    ///
    /// let valid: Result<BuildpackId, _> = "org.example/jvm".parse();
    /// assert!(valid.is_ok());
    ///
    /// let invalid: Result<BuildpackId, _> = "app".parse();
    /// assert!(invalid.is_err());
    /// ```
    BuildpackId,
    BuildpackIdError,
    r"^(?!app$|config$|sbom$)[[:alnum:]./-]+$"
);

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn deserialize_full_descriptor() {
        let descriptor = toml::from_str::<BuildpackDescriptor<toml::Table>>(indoc! {r#"
            [buildpack]
            id = "buildpack-id"
            name = "buildpack-name"
            version = "buildpack-version"

            [[stacks]]
            id = 'stack-id'
            build-images = ["build-image-tag"]
            run-images = ["run-image-tag"]

            [metadata]
            test-key = "test-value"
        "#})
        .unwrap();

        assert_eq!(descriptor.api, None);
        assert_eq!(descriptor.buildpack.id.as_str(), "buildpack-id");
        assert_eq!(descriptor.buildpack.name, "buildpack-name");
        assert_eq!(descriptor.buildpack.version, "buildpack-version");
        assert_eq!(descriptor.buildpack.homepage, None);
        assert_eq!(
            descriptor.stacks,
            vec![Stack {
                id: String::from("stack-id"),
                build_images: vec![String::from("build-image-tag")],
                run_images: vec![String::from("run-image-tag")],
            }]
        );
        assert_eq!(
            descriptor.metadata.get("test-key").and_then(toml::Value::as_str),
            Some("test-value")
        );
    }

    #[test]
    fn deserialize_with_typed_metadata() {
        #[derive(Deserialize, Debug, Eq, PartialEq)]
        #[serde(rename_all = "kebab-case")]
        struct Metadata {
            default_version: String,
        }

        let descriptor = toml::from_str::<BuildpackDescriptor<Metadata>>(indoc! {r#"
            api = "0.2"

            [buildpack]
            id = "org.example/jvm"
            name = "JVM"
            version = "1.0.0"
            homepage = "https://example.org/jvm"

            [[stacks]]
            id = "io.buildpacks.stacks.bionic"

            [metadata]
            default-version = "11"
        "#})
        .unwrap();

        assert_eq!(descriptor.api.as_deref(), Some("0.2"));
        assert_eq!(
            descriptor.buildpack.homepage.as_deref(),
            Some("https://example.org/jvm")
        );
        assert!(descriptor.stacks[0].build_images.is_empty());
        assert_eq!(
            descriptor.metadata,
            Metadata {
                default_version: String::from("11")
            }
        );
    }

    #[test]
    fn reject_invalid_buildpack_id() {
        let result = toml::from_str::<BuildpackDescriptor<Option<toml::Table>>>(indoc! {r#"
            [buildpack]
            id = "config"
            name = "Config"
            version = "1.0.0"
        "#});

        assert!(result.is_err());
    }

    #[test]
    fn buildpack_id_validation() {
        assert!("heroku/jvm".parse::<BuildpackId>().is_ok());
        assert!("org.example.v1-2".parse::<BuildpackId>().is_ok());
        assert!("apps".parse::<BuildpackId>().is_ok());

        for invalid in ["app", "config", "sbom", "", "heroku jvm", "heroku_jvm"] {
            assert_eq!(
                invalid.parse::<BuildpackId>(),
                Err(BuildpackIdError::InvalidValue(String::from(invalid)))
            );
        }
    }
}
