use std::collections::BTreeMap;
use std::env;
use std::env::VarsOs;
use std::ffi::{OsStr, OsString};

/// A name to value mapping of environment variables, ordered by name.
///
/// Nothing in this crate modifies the environment of the current process. Platform provided
/// variables are collected here and handed to child processes explicitly, for example with
/// [`std::process::Command::envs`]:
///
/// ```
/// use libbuildpack::{Env, Platform};
///
/// let platform_dir = tempfile::tempdir().unwrap();
/// std::fs::create_dir(platform_dir.path().join("env")).unwrap();
/// std::fs::write(platform_dir.path().join("env").join("RAILS_ENV"), "staging").unwrap();
///
/// let mut env = Env::new();
/// env.insert("RAILS_ENV", "production");
/// env.insert("BUNDLE_WITHOUT", "development:test");
///
/// Platform::from_path(platform_dir.path())
///     .unwrap()
///     .envs
///     .set_all(&mut env)
///     .unwrap();
///
/// assert_eq!(env.get("RAILS_ENV").unwrap(), "staging");
/// assert_eq!(
///     env.iter()
///         .map(|(name, _)| name.to_str().unwrap())
///         .collect::<Vec<_>>(),
///     ["BUNDLE_WITHOUT", "RAILS_ENV"]
/// );
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Env {
    inner: BTreeMap<OsString, OsString>,
}

impl Env {
    /// Creates a snapshot of the environment variables of the current process.
    ///
    /// See [`std::env::vars_os`]
    #[must_use]
    pub fn from_current() -> Self {
        env::vars_os().into()
    }

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a variable, replacing the previous value if `key` was already present.
    pub fn insert(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> &mut Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsString> {
        self.inner.get(key.as_ref())
    }

    /// Returns the value for `key`, with any non-Unicode sequences replaced by
    /// [`U+FFFD REPLACEMENT CHARACTER`](std::char::REPLACEMENT_CHARACTER).
    #[must_use]
    pub fn get_string_lossy(&self, key: impl AsRef<OsStr>) -> Option<String> {
        self.get(key)
            .map(|value| value.to_string_lossy().into_owned())
    }

    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<OsStr>) -> bool {
        self.inner.contains_key(key.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, OsString, OsString> {
        self.inner.iter()
    }
}

impl From<VarsOs> for Env {
    fn from(vars_os: VarsOs) -> Self {
        Self {
            inner: vars_os.collect(),
        }
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Env {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Env {
    type Item = (&'a OsString, &'a OsString);
    type IntoIter = std::collections::btree_map::Iter<'a, OsString, OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
