// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # fsroute
//!
//! File-system-driven routing for pages and API handlers.
//!
//! A routes directory is turned into an immutable trie once per rebuild,
//! then URL paths are matched against it with "most specific wins"
//! precedence. Matching also aggregates per-route metadata: single-valued
//! `names` (the nearest `page`, `error`, ...) and root-first `stacks`
//! (every `layout`, `guard`, `middleware` on the way down).
//!
//! ## Directory Conventions
//!
//! - `users/` → literal segment `/users`
//! - `[id]/` → parameter `/:id`
//! - `[...path]/` → catch-all `/*path` (one or more segments)
//! - `[[...slug]]/` → optional catch-all `/*slug?` (zero or more segments)
//! - `(auth)/` → grouping folder, not part of the URL
//!
//! Which files count (`page.tsx`, `layout.tsx`, ...) is decided by a
//! [`RouteFileConfig`] table.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fsroute::{build_tree, OsFileSystem, RouteFileConfig};
//!
//! let root = build_tree(OsFileSystem::new(), "src/pages", &RouteFileConfig::page_defaults())?;
//!
//! let matched = root.match_path("/users/123").unwrap();
//! assert_eq!(matched.pattern, "/users/:id");
//! assert_eq!(matched.param("id"), Some("123"));
//! ```

/// Route tree construction.
pub mod builder;
/// Tree serialization for the bundler.
pub mod codegen;
/// Route file tables and `routes.toml` loading.
pub mod config;
/// Error types.
pub mod error;
/// Directory listing capability.
pub mod fs;
/// URL matching.
pub mod matcher;
/// In-memory filesystem for tests and embedding.
pub mod memory_fs;
/// Route tree nodes.
pub mod node;
/// Page/API route tables and the active-table handle.
pub mod table;

pub use builder::{build_tree, TreeBuilder};
pub use codegen::{generate_module, serialize_tree, ImportTable, ValueStyle};
pub use config::{FileRule, FileRules, RouteFileConfig, RoutingConfig, TreeConfig};
pub use error::{Result, RoutingError};
pub use fs::{DirEntry, FileSystem};
#[cfg(feature = "filesystem")]
pub use fs::OsFileSystem;
pub use matcher::{decode_segment, match_path, MatchResult};
pub use memory_fs::MemoryFileSystem;
pub use node::{ParamChild, RouteInfo, RouteNode, SegmentType, WildcardChild};
pub use table::{ActiveRoutes, RouteTable};
