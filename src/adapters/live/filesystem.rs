//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::create_dir_all(path)?)
    }

    fn remove_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::remove_file(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_remove_cycle() {
        let dir = std::env::temp_dir().join("gcm_correct_live_fs_cycle");
        let fs = LiveFileSystem;
        fs.create_dir_all(&dir).unwrap();
        let file = dir.join("script.py");

        fs.write(&file, "epochs=500\n").unwrap();
        assert!(fs.exists(&file));
        assert_eq!(fs.read_to_string(&file).unwrap(), "epochs=500\n");

        fs.remove_file(&file).unwrap();
        assert!(!fs.exists(&file));
        assert!(fs.remove_file(&file).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn create_dir_all_is_idempotent() {
        let dir = std::env::temp_dir().join("gcm_correct_live_fs_dirs").join("a").join("b");
        let fs = LiveFileSystem;

        fs.create_dir_all(&dir).unwrap();
        fs.create_dir_all(&dir).unwrap();
        assert!(dir.is_dir());

        let _ = std::fs::remove_dir_all(std::env::temp_dir().join("gcm_correct_live_fs_dirs"));
    }
}
