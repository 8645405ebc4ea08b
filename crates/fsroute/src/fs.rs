// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Directory listing capability.
//!
//! The builder never touches the disk directly. It asks a [`FileSystem`]
//! for directory listings, which keeps construction testable in memory.
//!
//! # Implementations
//!
//! - [`OsFileSystem`]: lists real directories (native builds)
//! - [`MemoryFileSystem`](crate::memory_fs::MemoryFileSystem): in-memory
//!   tree for tests and embedding
//!
//! # Ordering
//!
//! Implementations must return entries in a stable order across repeated
//! calls on an unchanged directory. Serialized output is only deterministic
//! if listings are.

use std::io;
use std::path::Path;

#[cfg(feature = "filesystem")]
use std::fs;

/// Converts a Path to a normalized string with forward slashes.
/// On Windows, uses path components to rebuild with `/` separators.
#[inline]
pub fn path_to_string<P: AsRef<Path>>(path: P) -> String {
    #[cfg(windows)]
    {
        use std::path::Component;
        let path = path.as_ref();
        let mut result = String::new();
        for (i, component) in path.components().enumerate() {
            if i > 0 {
                result.push('/');
            }
            match component {
                Component::Prefix(p) => result.push_str(&p.as_os_str().to_string_lossy()),
                Component::RootDir => result.push('/'),
                Component::CurDir => result.push('.'),
                Component::ParentDir => result.push_str(".."),
                Component::Normal(s) => result.push_str(&s.to_string_lossy()),
            }
        }
        result
    }
    #[cfg(not(windows))]
    {
        path.as_ref().to_string_lossy().to_string()
    }
}

/// Joins a directory and an entry name with a single `/`.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// The entry's file name (last path component).
    pub name: String,
    /// True for regular files.
    pub is_file: bool,
    /// True for directories.
    pub is_directory: bool,
    /// Full path of the entry, as passed back to [`FileSystem::list_directory`].
    pub path: String,
}

impl DirEntry {
    /// Creates a file entry inside `dir`.
    pub fn file(dir: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: join_path(dir, &name),
            name,
            is_file: true,
            is_directory: false,
        }
    }

    /// Creates a directory entry inside `dir`.
    pub fn directory(dir: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: join_path(dir, &name),
            name,
            is_file: false,
            is_directory: true,
        }
    }
}

/// Capability for listing directories.
///
/// Implement this trait to build route trees from sources other than the
/// local disk (archives, virtual filesystems, test fixtures).
pub trait FileSystem: Send + Sync {
    /// Lists the entries of `path` in a stable order.
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        (**self).list_directory(path)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for Box<T> {
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        (**self).list_directory(path)
    }
}

/// Filesystem capability backed by `std::fs`.
///
/// Entries are sorted by name so repeated listings of an unchanged
/// directory are identical regardless of the platform's `read_dir` order.
/// Entries whose metadata cannot be read are skipped with a warning.
#[cfg(feature = "filesystem")]
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

#[cfg(feature = "filesystem")]
impl OsFileSystem {
    /// Creates a new filesystem capability.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "filesystem")]
impl FileSystem for OsFileSystem {
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", path, e);
                    continue;
                }
            };

            // Follows symlinks, so a linked route folder behaves like a real one
            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(DirEntry {
                path: join_path(path, &name),
                name,
                is_file: metadata.is_file(),
                is_directory: metadata.is_dir(),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "page.tsx"), "page.tsx");
        assert_eq!(join_path("pages", "page.tsx"), "pages/page.tsx");
        assert_eq!(join_path("pages/", "users"), "pages/users");
    }

    #[test]
    fn test_dir_entry_constructors() {
        let file = DirEntry::file("pages/users", "page.tsx");
        assert_eq!(file.path, "pages/users/page.tsx");
        assert!(file.is_file && !file.is_directory);

        let dir = DirEntry::directory("pages", "[id]");
        assert_eq!(dir.path, "pages/[id]");
        assert!(dir.is_directory && !dir.is_file);
    }

    #[cfg(feature = "filesystem")]
    #[test]
    fn test_os_filesystem_sorted_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.tsx"), "").unwrap();
        std::fs::write(dir.path().join("layout.tsx"), "").unwrap();
        std::fs::create_dir(dir.path().join("users")).unwrap();

        let root = path_to_string(dir.path());
        let entries = OsFileSystem::new().list_directory(&root).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["layout.tsx", "page.tsx", "users"]);

        let users = entries.iter().find(|e| e.name == "users").unwrap();
        assert!(users.is_directory);
        assert_eq!(users.path, format!("{}/users", root));
    }

    #[cfg(feature = "filesystem")]
    #[test]
    fn test_os_filesystem_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = path_to_string(dir.path().join("nope"));
        assert!(OsFileSystem::new().list_directory(&missing).is_err());
    }
}
