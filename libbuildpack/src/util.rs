use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Removes [`std::io::Error`] values from a [`Result`] that have the
/// [`std::io::ErrorKind::NotFound`] error kind by replacing them with the default value for `T`.
pub(crate) fn default_on_not_found<T: Default>(
    result: Result<T, std::io::Error>,
) -> Result<T, std::io::Error> {
    match result {
        Err(io_error) => match io_error.kind() {
            std::io::ErrorKind::NotFound => Ok(T::default()),
            _ => Err(io_error),
        },
        other => other,
    }
}

/// Writes `value` as raw bytes to `path`, replacing any existing file and creating missing parent
/// directories.
pub(crate) fn write_os_str(path: &Path, value: &OsStr) -> Result<(), std::io::Error> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir)?;
    }

    #[cfg(target_family = "unix")]
    {
        use std::os::unix::ffi::OsStrExt;
        fs::write(path, value.as_bytes())
    }

    #[cfg(not(target_family = "unix"))]
    fs::write(path, value.to_string_lossy().as_bytes())
}

/// Reads the file at `path` without assuming any particular encoding of its contents.
pub(crate) fn read_os_string(path: &Path) -> Result<std::ffi::OsString, std::io::Error> {
    #[cfg(target_family = "unix")]
    {
        use std::os::unix::ffi::OsStringExt;
        fs::read(path).map(std::ffi::OsString::from_vec)
    }

    #[cfg(not(target_family = "unix"))]
    fs::read_to_string(path).map(std::ffi::OsString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn default_on_not_found_with_notfound() {
        let not_found_io_error = std::io::Error::from(ErrorKind::NotFound);

        assert_eq!(
            default_on_not_found::<Option<String>>(Err(not_found_io_error)).unwrap(),
            None
        );
    }

    #[test]
    fn default_on_not_found_with_brokenpipe() {
        let broken_pipe_io_error = std::io::Error::from(ErrorKind::BrokenPipe);

        assert!(default_on_not_found::<Option<String>>(Err(broken_pipe_io_error)).is_err());
    }

    #[test]
    fn default_on_not_found_with_ok() {
        assert_eq!(default_on_not_found(Ok("Hello!")).unwrap(), "Hello!");
    }

    #[test]
    fn write_os_str_creates_parents_and_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("a").join("b").join("VALUE");

        write_os_str(&path, OsStr::new("first value")).unwrap();
        write_os_str(&path, OsStr::new("x")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
        assert_eq!(read_os_string(&path).unwrap(), "x");
    }
}
