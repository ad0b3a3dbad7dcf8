//! Generic implementations for some libbuildpack types.

use std::fmt::{Display, Formatter};

/// Generic TOML metadata.
pub type GenericMetadata = Option<toml::Table>;

/// Error type for buildpacks that never fail with an error of their own.
#[derive(Debug)]
pub enum GenericError {}

impl Display for GenericError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("GenericError")
    }
}
