use serde::{Serialize, de::DeserializeOwned};
use std::{fs, path::Path};

/// An error that occurred during reading or writing a TOML file.
#[derive(thiserror::Error, Debug)]
pub enum TomlFileError {
    #[error("I/O error while reading/writing TOML file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML deserialization error while reading TOML file: {0}")]
    TomlDeserializationError(#[from] toml::de::Error),

    #[error("TOML serialization error while writing TOML file: {0}")]
    TomlSerializationError(#[from] toml::ser::Error),
}

/// Serializes the given value as TOML and writes it to the given file path.
///
/// Missing parent directories are created. An existing file at `path` is replaced, its previous
/// contents are never merged with the new value.
///
/// # Errors
///
/// Will return `Err` if the file couldn't be written or the value couldn't be serialized as a TOML string.
pub fn write_toml_file(
    value: &impl Serialize,
    path: impl AsRef<Path>,
) -> Result<(), TomlFileError> {
    let path = path.as_ref();
    let contents = toml::to_string(value)?;

    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir)?;
    }

    tracing::debug!(path = %path.display(), contents = %contents, "Writing TOML file");
    fs::write(path, contents)?;

    Ok(())
}

/// Reads the file at the given path and parses it as `A`.
///
/// # Errors
///
/// Will return `Err` if the file couldn't be read or its contents couldn't be deserialized.
pub fn read_toml_file<A: DeserializeOwned>(path: impl AsRef<Path>) -> Result<A, TomlFileError> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Like [`read_toml_file`], but returns `Ok(None)` when the file does not exist.
///
/// Any other I/O error is still returned.
pub fn read_optional_toml_file<A: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<Option<A>, TomlFileError> {
    match fs::read_to_string(path.as_ref()) {
        Ok(contents) => Ok(Some(toml::from_str(&contents)?)),
        Err(io_error) if io_error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.as_ref().display(), "TOML file does not exist");
            Ok(None)
        }
        Err(io_error) => Err(TomlFileError::IoError(io_error)),
    }
}
