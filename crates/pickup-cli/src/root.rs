use std::path::{Path, PathBuf};

/// Resolve the schedule root directory.
///
/// Priority:
/// 1. `--root` flag / `PICKUP_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.pickup/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_pickup_dir(&cwd).unwrap_or(cwd)
}

fn find_pickup_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(pickup_core::paths::PICKUP_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_pickup_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".pickup")).unwrap();
        let subdir = dir.path().join("notes/2024");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_pickup_dir(&subdir).as_deref(), Some(dir.path()));
    }

    #[test]
    fn no_pickup_dir_found() {
        let dir = TempDir::new().unwrap();
        assert!(find_pickup_dir(dir.path()).is_none());
    }
}
