// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The page and API trees of a project, and the handle that publishes them.
//!
//! A rebuild (startup, file change) produces a complete new [`RouteTable`]
//! and publishes it through [`ActiveRoutes`]. Readers take an `Arc` snapshot
//! and match against it without holding any lock, so a request always sees
//! either the old table or the new one in full.

use crate::builder::TreeBuilder;
use crate::config::{RoutingConfig, TreeConfig};
use crate::error::{Result, RoutingError};
use crate::fs::FileSystem;
use crate::matcher::MatchResult;
use crate::node::RouteNode;
use std::io;
use std::sync::{Arc, PoisonError, RwLock};

/// The route trees of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    /// Page routes.
    pub pages: RouteNode,
    /// API routes.
    pub api: RouteNode,
}

impl RouteTable {
    /// Builds both trees described by `config`.
    ///
    /// A missing routes directory yields an empty tree, since projects often
    /// have pages but no API (or the reverse).
    pub fn build<F: FileSystem>(fs: &F, config: &RoutingConfig) -> Result<Self> {
        Ok(Self {
            pages: build_section(fs, &config.pages)?,
            api: build_section(fs, &config.api)?,
        })
    }

    /// Matches a path against the page tree.
    pub fn match_page(&self, path: &str) -> Option<MatchResult> {
        self.pages.match_path(path)
    }

    /// Matches a path against the API tree.
    pub fn match_api(&self, path: &str) -> Option<MatchResult> {
        self.api.match_path(path)
    }
}

fn build_section<F: FileSystem>(fs: &F, section: &TreeConfig) -> Result<RouteNode> {
    match TreeBuilder::new(fs, &section.files)?.build(&section.dir) {
        Err(RoutingError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No routes directory at {}", section.dir);
            Ok(RouteNode::new(section.dir.clone()))
        }
        result => result,
    }
}

/// The currently active route table.
///
/// Single writer, many readers: [`publish`](Self::publish) swaps in a fully
/// built table, [`load`](Self::load) hands out the current one.
#[derive(Debug, Default)]
pub struct ActiveRoutes {
    current: RwLock<Arc<RouteTable>>,
}

impl ActiveRoutes {
    /// Creates a handle publishing `table`.
    pub fn new(table: RouteTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// The current table. The lock is only held to clone the `Arc`.
    pub fn load(&self) -> Arc<RouteTable> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current table, returning the previous one.
    pub fn publish(&self, table: RouteTable) -> Arc<RouteTable> {
        let table = Arc::new(table);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, table)
    }

    /// Rebuilds from `config` and publishes the result.
    ///
    /// On failure the current table stays active and the error is returned
    /// for the developer to fix.
    pub fn rebuild<F: FileSystem>(&self, fs: &F, config: &RoutingConfig) -> Result<()> {
        match RouteTable::build(fs, config) {
            Ok(table) => {
                self.publish(table);
                tracing::info!("Route table rebuilt");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Route rebuild failed, keeping previous routes: {}", e);
                Err(e)
            }
        }
    }

    /// Matches a path against the current page tree.
    pub fn match_page(&self, path: &str) -> Option<MatchResult> {
        self.load().match_page(path)
    }

    /// Matches a path against the current API tree.
    pub fn match_api(&self, path: &str) -> Option<MatchResult> {
        self.load().match_api(path)
    }
}
