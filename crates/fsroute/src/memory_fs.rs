// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use crate::fs::{DirEntry, FileSystem};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Entries {
    files: BTreeSet<String>,
    directories: BTreeSet<String>,
    unreadable: BTreeSet<String>,
}

/// Memory-based filesystem that serves directory listings from a set of paths.
///
/// Directories are implied by the files added beneath them; empty
/// directories can be added explicitly. Listings are sorted by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    entries: Arc<Mutex<Entries>>,
}

impl MemoryFileSystem {
    /// Create an empty memory filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory filesystem holding the given files
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        for file in files {
            fs.add_file(file.as_ref());
        }
        fs
    }

    fn with_entries<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Entries) -> R,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut entries)
    }

    /// Add a file, creating its parent directories implicitly
    pub fn add_file(&self, path: &str) {
        let path = normalize(path);
        self.with_entries(|entries| {
            let mut parent = path.as_str();
            while let Some((dir, _)) = parent.rsplit_once('/') {
                entries.directories.insert(dir.to_string());
                parent = dir;
            }
            entries.files.insert(path.clone());
        });
    }

    /// Add an (possibly empty) directory
    pub fn add_directory(&self, path: &str) {
        let path = normalize(path);
        self.with_entries(|entries| {
            let mut current = path.as_str();
            entries.directories.insert(current.to_string());
            while let Some((dir, _)) = current.rsplit_once('/') {
                entries.directories.insert(dir.to_string());
                current = dir;
            }
        });
    }

    /// Remove a file
    pub fn remove_file(&self, path: &str) {
        let path = normalize(path);
        self.with_entries(|entries| {
            entries.files.remove(&path);
        });
    }

    /// Make listing `path` fail with a permission error
    pub fn deny(&self, path: &str) {
        let path = normalize(path);
        self.with_entries(|entries| {
            entries.unreadable.insert(path);
        });
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

impl FileSystem for MemoryFileSystem {
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let dir = normalize(path);

        self.with_entries(|entries| {
            if entries.unreadable.contains(&dir) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("permission denied: {}", dir),
                ));
            }
            if !dir.is_empty() && !entries.directories.contains(&dir) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such directory: {}", dir),
                ));
            }

            let prefix = if dir.is_empty() {
                String::new()
            } else {
                format!("{}/", dir)
            };

            // name -> is_directory; BTreeMap keeps the listing sorted
            let mut children: BTreeMap<&str, bool> = BTreeMap::new();
            for file in &entries.files {
                if let Some(rest) = file.strip_prefix(&prefix) {
                    if !rest.is_empty() && !rest.contains('/') {
                        children.insert(rest, false);
                    }
                }
            }
            for directory in &entries.directories {
                if let Some(rest) = directory.strip_prefix(&prefix) {
                    if !rest.is_empty() && !rest.contains('/') {
                        children.insert(rest, true);
                    }
                }
            }

            Ok(children
                .into_iter()
                .map(|(name, is_directory)| {
                    if is_directory {
                        DirEntry::directory(&dir, name)
                    } else {
                        DirEntry::file(&dir, name)
                    }
                })
                .collect())
        })
    }
}
