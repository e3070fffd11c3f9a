// Path helpers shared by config and settings file resolution.
use std::path::PathBuf;

/// Resolves a path that may start with a tilde `~` into an absolute one.
///
/// `~` is expanded to the user's home directory through `shellexpand`.
/// Paths without a leading tilde, or a tilde that cannot be expanded
/// because no home directory is known, come back unchanged.
///
/// # Arguments
/// * `path`: A string slice (`&str`) representing the path, which might start with `~`.
///
/// # Returns
/// * `PathBuf`: The expanded path.
pub fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
