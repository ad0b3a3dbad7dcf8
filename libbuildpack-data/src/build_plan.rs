use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use toml::Table;

/// The dependencies a buildpack contributes during detection, keyed by dependency name.
///
/// Written as a single TOML document with one table per dependency:
///
/// ```
/// use libbuildpack_data::build_plan::{BuildPlan, Dependency};
///
/// let mut build_plan = BuildPlan::new();
/// build_plan.insert("openjdk-jre", Dependency::new("11.0.2"));
///
/// assert_eq!(
///     toml::to_string(&build_plan).unwrap(),
///     "[openjdk-jre]\nversion = \"11.0.2\"\n"
/// );
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
#[must_use]
pub struct BuildPlan {
    dependencies: BTreeMap<String, Dependency>,
}

impl BuildPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dependency, replacing any dependency previously added under the same name.
    pub fn insert(&mut self, name: impl Into<String>, dependency: Dependency) -> Option<Dependency> {
        self.dependencies.insert(name.into(), dependency)
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    /// Iterates over all dependencies, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Dependency)> {
        self.dependencies.iter()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Dependency)> for BuildPlan {
    fn from_iter<T: IntoIterator<Item = (N, Dependency)>>(iter: T) -> Self {
        Self {
            dependencies: iter
                .into_iter()
                .map(|(name, dependency)| (name.into(), dependency))
                .collect(),
        }
    }
}

/// A single dependency of a [`BuildPlan`].
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
#[must_use]
pub struct Dependency {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Table::is_empty")]
    pub metadata: Table,
}

impl Dependency {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            metadata: Table::new(),
        }
    }

    /// Replaces the metadata with the given value, which must serialize to a TOML table.
    pub fn metadata<T: Serialize>(mut self, metadata: T) -> Result<Self, toml::ser::Error> {
        if let toml::Value::Table(table) = toml::Value::try_from(metadata)? {
            self.metadata = table;
            Ok(self)
        } else {
            Err(serde::ser::Error::custom(
                "Dependency metadata must serialize to a TOML table",
            ))
        }
    }
}
