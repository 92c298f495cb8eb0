use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PICKUP_DIR: &str = ".pickup";
pub const CONFIG_FILE: &str = ".pickup/config.yaml";
pub const DATA_FILE: &str = ".pickup/schedule.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn pickup_dir(root: &Path) -> PathBuf {
    root.join(PICKUP_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve a configured data path. Relative paths are taken from `root`.
pub fn data_path(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/family");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/family/.pickup/config.yaml")
        );
        assert_eq!(
            data_path(root, Path::new(DATA_FILE)),
            PathBuf::from("/tmp/family/.pickup/schedule.json")
        );
        assert_eq!(
            data_path(root, Path::new("/var/lib/pickup.json")),
            PathBuf::from("/var/lib/pickup.json")
        );
    }
}
