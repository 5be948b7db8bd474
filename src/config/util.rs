//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/notes/drafts/     ← cwd
/// /home/user/notes/bionic.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd, config_name)
}

/// Walk up from `start` looking for `config_name`.
fn find_upward(start: &Path, config_name: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_upward() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a/bionic.toml"), "").unwrap();

        let found = find_upward(&nested, Path::new("bionic.toml")).unwrap();
        assert_eq!(found, dir.path().join("a/bionic.toml"));
        assert!(find_upward(&nested, Path::new("missing-config-name.toml")).is_none());
    }

    #[test]
    fn test_absolute_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bionic.toml");
        assert!(find_config_file(&path).is_none());
        std::fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path));
    }
}
