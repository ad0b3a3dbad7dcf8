use crate::Env;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Name of the environment variable holding the JSON description of bound services.
pub const SERVICES_ENV_VAR: &str = "CNB_SERVICES";

/// Credentials of a service binding.
pub type Credentials = serde_json::Map<String, serde_json::Value>;

/// A single binding of a service to the application.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Service {
    #[serde(default)]
    pub binding_name: Option<String>,
    #[serde(default)]
    pub instance_name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub credentials: Credentials,
}

impl Service {
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|service_tag| service_tag == tag)
    }
}

/// Services bound to the application, keyed by service label.
///
/// ```
/// use libbuildpack::Services;
///
/// let services = Services::from_json(
///     r#"{"sendgrid": [{"instance_name": "mysendgrid", "label": "sendgrid", "plan": "free"}]}"#,
/// )
/// .unwrap();
///
/// assert_eq!(services.get("sendgrid").unwrap()[0].plan, "free");
/// assert!(services.get("elephantsql").is_none());
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Services {
    bindings: BTreeMap<String, Vec<Service>>,
}

#[derive(thiserror::Error, Debug)]
pub enum ServicesError {
    #[error("Could not deserialize services: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl Services {
    pub fn from_json(json: &str) -> Result<Self, ServicesError> {
        serde_json::from_str(json).map_err(ServicesError::from)
    }

    /// Reads services from the [`SERVICES_ENV_VAR`] variable of `env`.
    ///
    /// Returns empty `Services` when the variable is not set.
    pub fn from_env(env: &Env) -> Result<Self, ServicesError> {
        match env.get_string_lossy(SERVICES_ENV_VAR) {
            Some(json) => {
                let services = Self::from_json(&json)?;
                tracing::debug!(labels = ?services.labels().collect::<Vec<_>>(), "Read services");
                Ok(services)
            }
            None => Ok(Self::default()),
        }
    }

    /// The bindings of the service with the given label, in the order they were provided.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[Service]> {
        self.bindings.get(label).map(Vec::as_slice)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Iterates over all bindings, ordered by label and then by binding order.
    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.bindings.values().flatten()
    }

    /// The number of bindings across all labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
