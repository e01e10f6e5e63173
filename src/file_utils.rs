use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

// @module: File and directory utilities for job artifacts

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .context(format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @reads: File content as a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .context(format!("Failed to read file: {}", path.as_ref().display()))
    }

    // @writes: Binary payload to a file, creating parent directories
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(path, content).context(format!("Failed to write file: {}", path.display()))
    }

    // @writes: Value as pretty-printed JSON artifact
    pub fn write_json_pretty<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize artifact")?;
        Self::write_bytes(path, json.as_bytes())
    }
}
