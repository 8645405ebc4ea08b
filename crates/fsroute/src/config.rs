// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Route file configuration.
//!
//! A [`RouteFileConfig`] table decides which file names populate which route
//! properties and which files make a directory a complete route. Tables can be
//! written by hand, taken from the conventional presets, or loaded from a
//! `routes.toml` file at the project root.
//!
//! # Example Configuration
//!
//! ```toml
//! [pages]
//! dir = "src/pages"
//!
//! [[pages.files]]
//! pattern = "page.*"
//! property = "page"
//! accept = true
//!
//! [[pages.files]]
//! pattern = "layout.*"
//! property = "layout"
//! stacks = true
//!
//! [api]
//! dir = "src/api"
//! ```
//!
//! A section without `files` uses the preset for that section.

use crate::error::{Result, RoutingError};
use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One row of the route file table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFileConfig {
    /// Glob matched against file names (e.g. `page.*`).
    pub pattern: String,

    /// The property the file's path is stored under.
    pub property: String,

    /// Append to `stacks[property]` instead of overwriting `names[property]`.
    #[serde(default)]
    pub stacks: bool,

    /// A matching file makes its directory a complete route.
    #[serde(default)]
    pub accept: bool,
}

impl RouteFileConfig {
    /// A single-valued property; the deepest file wins.
    pub fn name(pattern: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            property: property.into(),
            stacks: false,
            accept: false,
        }
    }

    /// A multi-valued property accumulated root-first.
    pub fn stack(pattern: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            stacks: true,
            ..Self::name(pattern, property)
        }
    }

    /// Marks matching files as route-terminating.
    pub fn accepting(mut self) -> Self {
        self.accept = true;
        self
    }

    /// The conventional table for page routes.
    pub fn page_defaults() -> Vec<Self> {
        vec![
            Self::name("page.*", "page").accepting(),
            Self::stack("layout.*", "layout"),
            Self::stack("guard.*", "guards"),
            Self::stack("middleware.*", "middleware"),
            Self::name("error.*", "error"),
            Self::name("loading.*", "loading"),
        ]
    }

    /// The conventional table for API routes.
    pub fn api_defaults() -> Vec<Self> {
        vec![
            Self::name("route.*", "handler").accepting(),
            Self::stack("guard.*", "guards"),
            Self::stack("middleware.*", "middleware"),
        ]
    }
}

/// A compiled row of the route file table.
#[derive(Debug, Clone)]
pub struct FileRule {
    /// The row this rule was compiled from.
    pub config: RouteFileConfig,
    matcher: GlobMatcher,
}

impl FileRule {
    /// Returns true if `file_name` matches this rule's pattern.
    pub fn matches(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }
}

/// The route file table with every pattern compiled once.
#[derive(Debug, Clone)]
pub struct FileRules {
    rules: Vec<FileRule>,
}

impl FileRules {
    /// Compiles a table, failing on the first invalid glob.
    pub fn compile(configs: &[RouteFileConfig]) -> Result<Self> {
        let rules = configs
            .iter()
            .map(|config| {
                let glob = Glob::new(&config.pattern).map_err(|e| RoutingError::InvalidPattern {
                    pattern: config.pattern.clone(),
                    message: e.kind().to_string(),
                })?;
                Ok(FileRule {
                    config: config.clone(),
                    matcher: glob.compile_matcher(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Rules in table order.
    pub fn iter(&self) -> impl Iterator<Item = &FileRule> {
        self.rules.iter()
    }
}

/// Routing configuration for one tree (pages or api).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TreeConfig {
    /// Root directory of the tree.
    pub dir: String,

    /// Route file table. Empty means the section's preset.
    #[serde(default)]
    pub files: Vec<RouteFileConfig>,
}

impl TreeConfig {
    fn with_defaults(mut self, defaults: fn() -> Vec<RouteFileConfig>) -> Self {
        if self.files.is_empty() {
            self.files = defaults();
        }
        self
    }
}

/// Routing configuration loaded from `routes.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Page routes (default: `src/pages` with the page preset).
    #[serde(default = "default_pages")]
    pub pages: TreeConfig,

    /// API routes (default: `src/api` with the api preset).
    #[serde(default = "default_api")]
    pub api: TreeConfig,
}

fn default_pages() -> TreeConfig {
    TreeConfig {
        dir: "src/pages".to_string(),
        files: RouteFileConfig::page_defaults(),
    }
}

fn default_api() -> TreeConfig {
    TreeConfig {
        dir: "src/api".to_string(),
        files: RouteFileConfig::api_defaults(),
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            api: default_api(),
        }
    }
}

impl RoutingConfig {
    /// Parses a configuration from TOML source.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: RoutingConfig = toml::from_str(source)?;
        Ok(Self {
            pages: config.pages.with_defaults(RouteFileConfig::page_defaults),
            api: config.api.with_defaults(RouteFileConfig::api_defaults),
        })
    }

    /// Loads configuration from `routes.toml` in the given project directory.
    ///
    /// If no configuration file exists, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join("routes.toml");

        if !config_path.exists() {
            tracing::debug!("No routes.toml in {}, using defaults", project_dir.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_match_in_table_order() {
        let rules = FileRules::compile(&RouteFileConfig::page_defaults()).unwrap();
        let matched: Vec<&str> = rules
            .iter()
            .filter(|r| r.matches("page.tsx") || r.matches("layout.tsx"))
            .map(|r| r.config.property.as_str())
            .collect();
        assert_eq!(matched, vec!["page", "layout"]);

        let page = rules.iter().next().unwrap();
        assert!(page.config.accept);
        assert!(!page.matches("pages.tsx"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FileRules::compile(&[RouteFileConfig::name("page.{tsx", "page")]).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::InvalidPattern { ref pattern, .. } if pattern == "page.{tsx"
        ));
    }

    #[test]
    fn test_from_toml_with_presets() {
        let config = RoutingConfig::from_toml(
            r#"
[pages]
dir = "app/pages"

[[pages.files]]
pattern = "index.*"
property = "page"
accept = true

[api]
dir = "app/api"
"#,
        )
        .unwrap();

        assert_eq!(config.pages.dir, "app/pages");
        assert_eq!(config.pages.files, vec![RouteFileConfig::name("index.*", "page").accepting()]);
        assert_eq!(config.api.dir, "app/api");
        assert_eq!(config.api.files, RouteFileConfig::api_defaults());
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(RoutingConfig::from_toml("").unwrap(), RoutingConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(matches!(
            RoutingConfig::from_toml("[pages]\ndir = 3"),
            Err(RoutingError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(RoutingConfig::load(dir.path()).unwrap(), RoutingConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("routes.toml"), "[api]\ndir = \"server/api\"\n").unwrap();

        let config = RoutingConfig::load(dir.path()).unwrap();
        assert_eq!(config.api.dir, "server/api");
        assert_eq!(config.pages, default_pages());
    }
}
