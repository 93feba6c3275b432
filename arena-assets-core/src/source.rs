//! Resource resolution. The decoders never touch the filesystem themselves;
//! they are handed raw bytes by whatever implements [`ResourceSource`].

use std::fs;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::{AssetError, Result};

/// Resolves a named game resource to its raw bytes.
pub trait ResourceSource {
    /// Opens a resource by exact name.
    fn open(&self, name: &str) -> Result<Vec<u8>>;

    /// Opens a resource by name, ignoring ASCII case. Needed for the one
    /// file whose casing differs between game distributions.
    fn open_case_insensitive(&self, name: &str) -> Result<Vec<u8>>;
}

/// A directory of extracted game data files.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectorySource { root: root.into() }
    }
}

impl ResourceSource for DirectorySource {
    fn open(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::ResourceNotFound(name.to_string()))
            }
            Err(e) => Err(AssetError::Io(e)),
        }
    }

    fn open_case_insensitive(&self, name: &str) -> Result<Vec<u8>> {
        // Fast path: the exact casing exists.
        let exact = self.root.join(name);
        if exact.is_file() {
            return fs::read(&exact).map_err(AssetError::Io);
        }

        for entry in WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }

            let matches = entry
                .file_name()
                .to_str()
                .map_or(false, |n| n.eq_ignore_ascii_case(name));
            if matches {
                return fs::read(entry.path()).map_err(AssetError::Io);
            }
        }

        Err(AssetError::ResourceNotFound(name.to_string()))
    }
}
