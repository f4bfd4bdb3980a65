//! File fetch
//!
//! Synchronous, same-origin file access used for the action-list file and
//! for page fragments.

use crate::error::{BlendError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Source of text files addressed by relative path
pub trait FileSource {
    fn load_file(&self, path: &str) -> Result<String>;
}

/// Files under a root directory
#[derive(Debug, Clone)]
pub struct FsFileSource {
    root: PathBuf,
}

impl FsFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSource for FsFileSource {
    fn load_file(&self, path: &str) -> Result<String> {
        let full = self.root.join(path.trim_start_matches('/'));
        tracing::trace!("Loading file {}", full.display());
        std::fs::read_to_string(&full).map_err(|source| BlendError::Io { path: full, source })
    }
}

/// In-memory files, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: HashMap<String, String>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, path: &str, contents: &str) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: &str, contents: &str) {
        self.files
            .insert(path.trim_start_matches('/').to_string(), contents.to_string());
    }
}

impl FileSource for MemoryFiles {
    fn load_file(&self, path: &str) -> Result<String> {
        self.files
            .get(path.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| BlendError::Io {
                path: PathBuf::from(path),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}
