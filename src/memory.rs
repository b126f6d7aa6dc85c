//! Persistent record of media URLs that were already handled
//!
//! The memory file holds one URL per line. It is loaded once per run,
//! only ever grows during the run, and is rewritten after every commit so
//! an interrupted run loses at most the episode that was in flight.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::MemoryError;

type Result<T> = std::result::Result<T, MemoryError>;

/// Set of already downloaded (or dry-run skipped) media URLs
#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    urls: HashSet<String>,
    dirty: bool,
}

impl MemoryStore {
    /// Load the memory file, creating an empty one if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "File with previously downloaded links not found. Creating {}",
                    path.display()
                );
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|source| MemoryError::Write {
                        path: path.clone(),
                        source,
                    })?;
                }
                std::fs::File::create(&path).map_err(|source| MemoryError::Write {
                    path: path.clone(),
                    source,
                })?;
                String::new()
            }
            Err(source) => return Err(MemoryError::Read { path, source }),
        };

        let urls: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!("Loaded {} remembered links from {}", urls.len(), path.display());

        Ok(Self {
            path,
            urls,
            dirty: false,
        })
    }

    /// Create an empty store bound to `path` without touching the disk
    pub fn empty<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            urls: HashSet::new(),
            dirty: false,
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Remember `url`. Returns false if it was already known.
    pub fn add(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }
        let inserted = self.urls.insert(url.to_string());
        if inserted {
            self.dirty = true;
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// Write the whole set back to disk, one URL per line
    ///
    /// The content goes to a temporary file next to the memory file which
    /// then replaces it, so a crash mid-write never truncates the record.
    pub fn persist(&mut self) -> Result<()> {
        let mut sorted: Vec<&str> = self.iter().collect();
        sorted.sort_unstable();

        let mut content = sorted.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let write_err = |source| MemoryError::Write {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        self.dirty = false;
        Ok(())
    }

    /// Persist only if something was added since the last write
    pub fn persist_if_dirty(&mut self) -> Result<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }
}
