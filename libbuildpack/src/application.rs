use crate::util::default_on_not_found;
use std::fs;
use std::path::{Path, PathBuf};

/// The application source directory the buildpack is working on.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Application {
    pub root: PathBuf,
}

impl Application {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses the working directory of the current process, which the platform sets to the
    /// application directory.
    pub fn from_current_dir() -> std::io::Result<Self> {
        let application = std::env::current_dir().map(Self::new)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            match application.contents() {
                Ok(contents) => tracing::debug!(
                    root = %application.root.display(),
                    contents = ?contents,
                    "Application contents"
                ),
                Err(io_error) => tracing::debug!(
                    root = %application.root.display(),
                    error = %io_error,
                    "Could not list application contents"
                ),
            }
        }

        Ok(application)
    }

    /// All files and directories below [`root`](Self::root), relative to it and sorted.
    pub fn contents(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut contents = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();

                if entry.file_type()?.is_dir() {
                    pending.push(path.clone());
                }

                if let Ok(relative) = path.strip_prefix(&self.root) {
                    contents.push(relative.to_path_buf());
                }
            }
        }

        contents.sort();
        Ok(contents)
    }

    /// Whether `<root>/<relative_path>` exists.
    ///
    /// ```
    /// use libbuildpack::Application;
    ///
    /// let temp_dir = tempfile::tempdir().unwrap();
    /// std::fs::write(temp_dir.path().join("package.json"), "{}").unwrap();
    ///
    /// let application = Application::new(temp_dir.path());
    /// assert!(application.file_exists("package.json").unwrap());
    /// assert!(!application.file_exists("Gemfile").unwrap());
    /// ```
    pub fn file_exists(&self, relative_path: impl AsRef<Path>) -> std::io::Result<bool> {
        default_on_not_found(fs::metadata(self.root.join(relative_path)).map(|_| true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_are_relative_and_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("src").join("main")).unwrap();
        fs::write(temp_dir.path().join("src").join("main").join("App.java"), "").unwrap();
        fs::write(temp_dir.path().join("pom.xml"), "").unwrap();

        assert_eq!(
            Application::new(temp_dir.path()).contents().unwrap(),
            vec![
                PathBuf::from("pom.xml"),
                PathBuf::from("src"),
                PathBuf::from("src/main"),
                PathBuf::from("src/main/App.java"),
            ]
        );
    }

    #[test]
    fn contents_of_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();

        assert!(Application::new(temp_dir.path().join("missing"))
            .contents()
            .is_err());
    }

    #[test]
    fn from_current_dir_uses_working_directory() {
        assert_eq!(
            Application::from_current_dir().unwrap().root,
            std::env::current_dir().unwrap()
        );
    }
}
