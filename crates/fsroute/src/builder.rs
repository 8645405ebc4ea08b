// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Route tree construction.
//!
//! [`TreeBuilder`] walks a routes directory through a [`FileSystem`] and
//! produces a [`RouteNode`] trie:
//!
//! - files matching a [`RouteFileConfig`] row populate `names` / `stacks`
//!   and may mark the directory as an accepting route
//! - subdirectories become static, param, wildcard or grouping children
//!
//! # Ambiguity
//!
//! Grouping folders are transparent to URLs, so `(a)/login/page.tsx` and
//! `(b)/login/page.tsx` both claim `/login`. Every visited directory reports
//! the virtual (post-exclusion) paths of its accepting descendants, and each
//! parent compares the reports of its grouping children as it assembles
//! them. A collision aborts the build with both source directories. An
//! optional wildcard takes part as well: with an empty capture it serves its
//! parent's path, so `(a)/[[...slug]]/page.tsx` and `(b)/page.tsx` collide at
//! `/`. Two differently named `[param]` (or wildcard) siblings are rejected
//! the same way.

use crate::config::{FileRules, RouteFileConfig};
use crate::error::{Result, RoutingError};
use crate::fs::{DirEntry, FileSystem};
use crate::node::{ParamChild, RouteNode, SegmentType, WildcardChild};
use std::collections::HashMap;

/// A built subtree plus the accepting routes it exposes.
struct Visited {
    node: RouteNode,
    /// (virtual path, source directory) of every accepting descendant
    exposed: Vec<(String, String)>,
}

/// Builds route trees from a directory hierarchy.
#[derive(Debug, Clone)]
pub struct TreeBuilder<F: FileSystem> {
    fs: F,
    rules: FileRules,
}

impl<F: FileSystem> TreeBuilder<F> {
    /// Creates a builder, compiling the file table's patterns.
    pub fn new(fs: F, files: &[RouteFileConfig]) -> Result<Self> {
        Ok(Self {
            fs,
            rules: FileRules::compile(files)?,
        })
    }

    /// Builds the tree rooted at `root`.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::Io`] if `root` itself cannot be listed
    /// - [`RoutingError::AmbiguousRoute`] if two routes resolve to one URL
    ///
    /// Subdirectories that cannot be listed are skipped with a warning.
    pub fn build(&self, root: &str) -> Result<RouteNode> {
        let entries = self.fs.list_directory(root)?;
        let visited = self.visit(root, "", &entries)?;

        tracing::debug!(
            "Built route tree from {} ({} routes)",
            root,
            visited.exposed.len()
        );
        Ok(visited.node)
    }

    fn visit(&self, dir: &str, virtual_path: &str, entries: &[DirEntry]) -> Result<Visited> {
        let mut node = RouteNode::new(dir);
        self.apply_files(&mut node, entries);

        let mut exposed = Vec::new();
        if node.accept {
            exposed.push((display_path(virtual_path), dir.to_string()));
        }

        // virtual path -> source, over this directory's grouping children only
        let mut grouped: HashMap<String, String> = HashMap::new();

        for entry in entries.iter().filter(|e| e.is_directory) {
            let segment = SegmentType::parse(&entry.name);
            if segment == SegmentType::Static(entry.name.clone())
                && (entry.name.starts_with('[') || entry.name.starts_with('('))
            {
                tracing::warn!("Treating {} as a literal segment", entry.path);
            }

            let child_virtual = match &segment {
                SegmentType::Static(name) => format!("{}/{}", virtual_path, name),
                SegmentType::Group(_) => virtual_path.to_string(),
                SegmentType::Dynamic(_) => format!("{}/:", virtual_path),
                SegmentType::CatchAll(_) | SegmentType::OptionalCatchAll(_) => {
                    format!("{}/*", virtual_path)
                }
            };

            let listing = match self.fs.list_directory(&entry.path) {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!("Skipping unreadable route directory {}: {}", entry.path, e);
                    continue;
                }
            };

            tracing::trace!("Visiting {}", entry.path);
            let mut child = self.visit(&entry.path, &child_virtual, &listing)?;

            match segment {
                SegmentType::Static(name) => {
                    node.static_children.insert(name, child.node);
                }
                SegmentType::Group(_) => {
                    for (path, source) in &child.exposed {
                        claim(&mut grouped, path, source)?;
                    }
                    child.node.exclude_from_path = true;
                    node.static_children.insert(entry.name.clone(), child.node);
                }
                SegmentType::Dynamic(param_name) => {
                    if let Some(existing) = &node.param_child {
                        return Err(sibling_conflict(&child_virtual, &existing.node, &entry.path));
                    }
                    node.param_child = Some(Box::new(ParamChild {
                        param_name,
                        node: child.node,
                    }));
                }
                SegmentType::CatchAll(param_name) => {
                    if let Some(existing) = &node.wildcard_child {
                        return Err(sibling_conflict(&child_virtual, &existing.node, &entry.path));
                    }
                    node.wildcard_child = Some(Box::new(WildcardChild {
                        param_name,
                        optional: false,
                        node: child.node,
                    }));
                }
                SegmentType::OptionalCatchAll(param_name) => {
                    if let Some(existing) = &node.wildcard_child {
                        return Err(sibling_conflict(&child_virtual, &existing.node, &entry.path));
                    }

                    // An empty capture serves this directory's own path, like a group would
                    let here = display_path(virtual_path);
                    let empty: Vec<String> = child
                        .exposed
                        .iter()
                        .filter(|(path, _)| *path == child_virtual)
                        .map(|(_, source)| source.clone())
                        .collect();
                    for source in empty {
                        claim(&mut grouped, &here, &source)?;
                        if !node.accept {
                            child.exposed.push((here.clone(), source));
                        }
                    }

                    node.wildcard_child = Some(Box::new(WildcardChild {
                        param_name,
                        optional: true,
                        node: child.node,
                    }));
                }
            }

            exposed.append(&mut child.exposed);
        }

        Ok(Visited { node, exposed })
    }

    /// Applies the file table to the files of one directory.
    fn apply_files(&self, node: &mut RouteNode, entries: &[DirEntry]) {
        for rule in self.rules.iter() {
            for entry in entries.iter().filter(|e| e.is_file && rule.matches(&e.name)) {
                let config = &rule.config;
                if config.stacks {
                    node.stacks
                        .entry(config.property.clone())
                        .or_default()
                        .push(entry.path.clone());
                } else {
                    node.names.insert(config.property.clone(), entry.path.clone());
                }
                if config.accept {
                    node.accept = true;
                }
            }
        }
    }
}

/// Builds the tree rooted at `root` in one call.
pub fn build_tree<F: FileSystem>(
    fs: F,
    root: &str,
    files: &[RouteFileConfig],
) -> Result<RouteNode> {
    TreeBuilder::new(fs, files)?.build(root)
}

fn display_path(virtual_path: &str) -> String {
    if virtual_path.is_empty() {
        "/".to_string()
    } else {
        virtual_path.to_string()
    }
}

/// Records `source` as serving `virtual_path`, failing if another
/// zero-consumption sibling already does.
fn claim(grouped: &mut HashMap<String, String>, virtual_path: &str, source: &str) -> Result<()> {
    if let Some(first) = grouped.get(virtual_path) {
        return Err(RoutingError::AmbiguousRoute {
            virtual_path: virtual_path.to_string(),
            first: first.clone(),
            second: source.to_string(),
        });
    }
    grouped.insert(virtual_path.to_string(), source.to_string());
    Ok(())
}

fn sibling_conflict(virtual_path: &str, existing: &RouteNode, second: &str) -> RoutingError {
    RoutingError::AmbiguousRoute {
        virtual_path: virtual_path.to_string(),
        first: existing.source.clone(),
        second: second.to_string(),
    }
}
