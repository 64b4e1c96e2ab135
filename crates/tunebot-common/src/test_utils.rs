//! Test utilities and shared test helpers for Tunebot.
//!
//! Fixtures here build throwaway resource trees laid out the way plugins ship
//! their catalogs, so integration tests across the workspace share one layout.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_resource(root: &Path, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create resource directory");
    }
    fs::write(&path, contents).expect("Failed to write resource file");
    path
}

/// A resource tree with a root catalog and one plugin directory.
#[cfg(feature = "tempfile")]
pub struct ResourceTree {
    dir: tempfile::TempDir,
}

#[cfg(feature = "tempfile")]
impl ResourceTree {
    /// Create an empty tree with `system/` and `plugins/` directories.
    pub fn new() -> Self {
        let dir = create_temp_dir();
        fs::create_dir_all(dir.path().join("system")).expect("Failed to create system dir");
        fs::create_dir_all(dir.path().join("plugins")).expect("Failed to create plugins dir");
        Self { dir }
    }

    /// Resource root of the system scope.
    pub fn system_root(&self) -> PathBuf {
        self.dir.path().join("system")
    }

    /// Resource root of a plugin scope.
    pub fn plugin_root(&self, plugin_id: &str) -> PathBuf {
        self.dir.path().join("plugins").join(plugin_id)
    }

    /// Write a system resource, e.g. `translations/core/strings_en.properties`.
    pub fn system(&self, relative: &str, contents: impl AsRef<[u8]>) -> &Self {
        write_resource(&self.system_root(), relative, contents);
        self
    }

    /// Write a resource owned by `plugin_id`.
    pub fn plugin(&self, plugin_id: &str, relative: &str, contents: impl AsRef<[u8]>) -> &Self {
        write_resource(&self.plugin_root(plugin_id), relative, contents);
        self
    }

    /// Path of the whole tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(feature = "tempfile")]
impl Default for ResourceTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_resource_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_resource(dir.path(), "a/b/c.properties", "key = value");
        assert!(path.exists());
        assert_eq!(fs::read_to_string(path).unwrap(), "key = value");
    }

    #[test]
    fn test_init_test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
    }
}
