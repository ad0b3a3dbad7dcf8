use serde::{Deserialize, Serialize};

/// Data structure for the `store.toml` file.
///
/// Holds metadata that outlives a single build: the platform hands it back on the next build
/// of the same application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Store<M> {
    pub metadata: M,
}
