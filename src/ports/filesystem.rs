//! Filesystem port for script, data and directory access.

use std::path::Path;

/// Provides filesystem access for the checker and the supervisor.
///
/// Abstracting the filesystem lets the availability checks and the
/// patching logic be tested against an in-memory tree.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and all missing parents. Existing directories
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a component cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Removes a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
