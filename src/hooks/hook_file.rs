//! Hook scripts and the marker convention
//!
//! A hook is "managed" when its content contains the marker token anywhere.
//! Only managed hooks are ever deleted.

use regex::bytes::Regex;
use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{HookError, Result};

/// Matcher for the managed-hook marker
#[derive(Debug, Clone)]
pub struct Marker {
    token: String,
    pattern: Regex,
}

impl Marker {
    pub fn new(token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(HookError::Config("marker must not be empty".to_string()));
        }
        let pattern = Regex::new(&regex::escape(token))?;
        Ok(Self {
            token: token.to_string(),
            pattern,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_present(&self, content: &[u8]) -> bool {
        self.pattern.is_match(content)
    }
}

/// A hook file found in the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHook {
    pub file_name: OsString,
    pub path: PathBuf,
}

impl SourceHook {
    pub fn name(&self) -> Cow<'_, str> {
        self.file_name.to_string_lossy()
    }
}

/// A hook script with its content loaded
#[derive(Debug, Clone)]
pub struct HookFile {
    pub content: Vec<u8>,
    pub managed: bool,
}

impl HookFile {
    pub fn read(path: &Path, marker: &Marker) -> Result<Self> {
        let content = std::fs::read(path).map_err(|source| HookError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let managed = marker.is_present(&content);
        Ok(Self {
            content,
            managed,
        })
    }
}

/// List every file under `dir`, recursively, sorted by name
///
/// Files in nested directories are identified by their base name only.
pub fn list_hook_files(dir: &Path) -> Result<Vec<SourceHook>> {
    let mut hooks = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| HookError::ListSource {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        hooks.push(SourceHook {
            file_name: entry.file_name().to_os_string(),
            path: entry.into_path(),
        });
    }

    Ok(hooks)
}
