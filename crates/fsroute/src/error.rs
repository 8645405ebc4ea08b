// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for route tree construction.
//!
//! This module defines [`RoutingError`], the error enum returned by the
//! builder and the configuration loader.
//!
//! # Error Categories
//!
//! - **Ambiguity errors**: two grouped folders expose the same URL
//! - **Pattern errors**: a file pattern in the configuration is not a valid glob
//! - **Config errors**: `routes.toml` could not be parsed
//! - **I/O errors**: the routes root (or the config file) could not be read
//!
//! Matching never fails with an error: an unmatched path is `None`, and a
//! malformed percent-encoded segment falls back to its raw text.

use thiserror::Error;

/// The main error type for routing operations.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// Two grouped `(name)` siblings expose accepting routes at the same URL.
    ///
    /// This is a structural defect of the route directory and aborts the
    /// whole build.
    #[error("Ambiguous route {virtual_path}: both {first} and {second} resolve to it")]
    AmbiguousRoute {
        /// The URL (post-exclusion) path both routes resolve to.
        virtual_path: String,
        /// Source directory of the route discovered first.
        first: String,
        /// Source directory of the conflicting route.
        second: String,
    },

    /// A file pattern in the route configuration is not a valid glob.
    #[error("Invalid file pattern {pattern:?}: {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why the pattern was rejected.
        message: String,
    },

    /// The routing configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with [`RoutingError`].
pub type Result<T> = std::result::Result<T, RoutingError>;
