use serde::{Deserialize, Serialize};
use toml::Table;

/// The buildpack plan handed to a buildpack during the build phase.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildpackPlan {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl BuildpackPlan {
    /// Returns the first entry with the given name.
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default)]
    pub metadata: Table,
}

impl Entry {
    /// Deserializes the metadata table into `T`.
    pub fn metadata<T>(&self) -> Result<T, toml::de::Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        // Table has no Deserializer of its own, so it goes through Value.
        toml::Value::Table(self.metadata.clone()).try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn parses_empty_plan() {
        let plan = toml::from_str::<BuildpackPlan>("").unwrap();
        assert!(plan.entries.is_empty());
    }

    #[test]
    fn parses_entries_with_metadata() {
        let plan = toml::from_str::<BuildpackPlan>(indoc! {r#"
            [[entries]]
            name = "rust"
            version = "1.39"

            [entries.metadata]
            toolchain = "stable"

            [[entries]]
            name = "cargo"
        "#})
        .unwrap();

        assert_eq!(plan.entries.len(), 2);

        let rust = plan.entry("rust").unwrap();
        assert_eq!(rust.version, "1.39");
        assert_eq!(
            rust.metadata.get("toolchain").and_then(toml::Value::as_str),
            Some("stable")
        );

        assert!(plan.entry("cargo").unwrap().metadata.is_empty());
        assert!(plan.entry("python").is_none());
    }

    #[test]
    fn deserializes_typed_metadata() {
        #[derive(Deserialize)]
        struct Metadata {
            foo: String,
        }

        let mut metadata = Table::new();
        metadata.insert(String::from("foo"), toml::Value::String(String::from("bar")));
        let entry = Entry {
            name: String::from("foo"),
            version: String::new(),
            metadata,
        };

        assert_eq!(entry.metadata::<Metadata>().unwrap().foo, "bar");
    }
}
