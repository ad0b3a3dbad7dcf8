#![doc = include_str!("../README.md")]
// This lint is too noisy and enforces a style that reduces readability in many cases.
#![allow(clippy::module_name_repetitions)]

pub mod toml_file;

pub use toml_file::{TomlFileError, read_optional_toml_file, read_toml_file, write_toml_file};
