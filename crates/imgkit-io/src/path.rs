use std::path::{Path, PathBuf};

/// The relative path of the current directory, `.`.
///
/// This is the path itself, not its resolved absolute form. Use
/// [`std::env::current_dir`] for the latter.
pub fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Join `filename` onto `base`, or onto [`current_dir`] when `base` is `None`.
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use imgkit_io::path::combine;
///
/// assert_eq!(combine("a.png", None), PathBuf::from("./a.png"));
/// assert_eq!(combine("a.png", Some(Path::new("images"))), PathBuf::from("images/a.png"));
/// ```
pub fn combine(filename: impl AsRef<Path>, base: Option<&Path>) -> PathBuf {
    match base {
        Some(base) => base.join(filename),
        None => current_dir().join(filename),
    }
}
