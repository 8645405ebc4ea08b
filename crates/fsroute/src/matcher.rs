// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! URL matching against a built route tree.
//!
//! Matching is a depth-first walk with backtracking. At every node the
//! branches are tried in a fixed order:
//!
//! 1. static child equal to the current segment
//! 2. param child (`:name`), one segment
//! 3. wildcard child (`*name`), every remaining segment
//! 4. grouping children, without consuming a segment
//!
//! The first branch that reaches an accepting node wins, so a literal beats
//! a param, which beats a wildcard.
//!
//! While descending, `names` of every visited node overwrite earlier ones and
//! `stacks` are appended root-first. Each branch attempt takes a
//! [`Checkpoint`] and rolls back to it on failure, so bindings from an
//! abandoned branch never reach its siblings.

use crate::node::RouteNode;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of matching a URL path against a route tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The matched pattern (e.g. "/users/:id").
    pub pattern: String,

    /// Parameters captured by param and wildcard segments, decoded.
    pub params: BTreeMap<String, String>,

    /// Single-valued properties, nearest node wins.
    pub names: BTreeMap<String, String>,

    /// Multi-valued properties, root-first.
    pub stacks: BTreeMap<String, Vec<String>>,
}

impl MatchResult {
    /// Get a parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Get a single-valued property by name
    pub fn name(&self, property: &str) -> Option<&str> {
        self.names.get(property).map(String::as_str)
    }

    /// Get a stack by name; missing stacks are empty
    pub fn stack(&self, property: &str) -> &[String] {
        self.stacks.get(property).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Matches `path` against the tree rooted at `root`.
///
/// Returns `None` when no accepting route matches; producing a 404 is the
/// caller's business.
pub fn match_path(path: &str, root: &RouteNode) -> Option<MatchResult> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut walk = Walk::new(&segments);

    if walk.descend(root, 0) {
        let result = walk.finish();
        tracing::trace!("Matched {} as {}", path, result.pattern);
        Some(result)
    } else {
        tracing::trace!("No route for {}", path);
        None
    }
}

impl RouteNode {
    /// Matches a URL path against this tree. See [`match_path`].
    pub fn match_path(&self, path: &str) -> Option<MatchResult> {
        match_path(path, self)
    }
}

/// Percent-decodes one path segment.
///
/// Malformed escapes or invalid UTF-8 yield the raw segment unchanged.
pub fn decode_segment(raw: &str) -> String {
    if !has_valid_escapes(raw) {
        return raw.to_string();
    }
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Every `%` must start a two-digit hex escape.
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Accumulator lengths to roll back to.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pattern: usize,
    params: usize,
    names: usize,
    stacks: usize,
}

struct Walk<'a> {
    segments: &'a [&'a str],
    pattern: Vec<String>,
    params: Vec<(String, String)>,
    names: BTreeMap<String, String>,
    /// (key, value before overwrite)
    names_undo: Vec<(String, Option<String>)>,
    stacks: BTreeMap<String, Vec<String>>,
    /// (key, length before append)
    stacks_undo: Vec<(String, usize)>,
}

impl<'a> Walk<'a> {
    fn new(segments: &'a [&'a str]) -> Self {
        Self {
            segments,
            pattern: Vec::new(),
            params: Vec::new(),
            names: BTreeMap::new(),
            names_undo: Vec::new(),
            stacks: BTreeMap::new(),
            stacks_undo: Vec::new(),
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pattern: self.pattern.len(),
            params: self.params.len(),
            names: self.names_undo.len(),
            stacks: self.stacks_undo.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.pattern.truncate(checkpoint.pattern);
        self.params.truncate(checkpoint.params);

        while self.names_undo.len() > checkpoint.names {
            let Some((key, previous)) = self.names_undo.pop() else {
                break;
            };
            match previous {
                Some(value) => {
                    self.names.insert(key, value);
                }
                None => {
                    self.names.remove(&key);
                }
            }
        }

        while self.stacks_undo.len() > checkpoint.stacks {
            let Some((key, len)) = self.stacks_undo.pop() else {
                break;
            };
            if len == 0 {
                self.stacks.remove(&key);
            } else if let Some(stack) = self.stacks.get_mut(&key) {
                stack.truncate(len);
            }
        }
    }

    fn merge(&mut self, node: &RouteNode) {
        for (key, value) in &node.names {
            let previous = self.names.insert(key.clone(), value.clone());
            self.names_undo.push((key.clone(), previous));
        }
        for (key, values) in &node.stacks {
            let stack = self.stacks.entry(key.clone()).or_default();
            self.stacks_undo.push((key.clone(), stack.len()));
            stack.extend(values.iter().cloned());
        }
    }

    /// Tries one branch; on failure every accumulator is restored.
    fn attempt(
        &mut self,
        node: &RouteNode,
        index: usize,
        token: Option<String>,
        param: Option<(String, String)>,
    ) -> bool {
        let checkpoint = self.checkpoint();
        self.pattern.extend(token);
        self.params.extend(param);

        if self.descend(node, index) {
            return true;
        }
        self.rollback(checkpoint);
        false
    }

    fn descend(&mut self, node: &RouteNode, index: usize) -> bool {
        self.merge(node);

        let remaining = self.segments.len() - index;
        if remaining == 0 && node.accept {
            return true;
        }

        if let Some(&segment) = self.segments.get(index) {
            if let Some(child) = node.static_children.get(segment) {
                if !child.exclude_from_path
                    && self.attempt(child, index + 1, Some(format!("/{}", segment)), None)
                {
                    return true;
                }
            }

            if let Some(param) = &node.param_child {
                let value = decode_segment(segment);
                if self.attempt(
                    &param.node,
                    index + 1,
                    Some(param.pattern_token()),
                    Some((param.param_name.clone(), value)),
                ) {
                    return true;
                }
            }
        }

        if let Some(wildcard) = &node.wildcard_child {
            if remaining > 0 || wildcard.optional {
                let value = self.segments[index..]
                    .iter()
                    .map(|s| decode_segment(s))
                    .collect::<Vec<_>>()
                    .join("/");
                let token = wildcard.pattern_token();
                let param = (wildcard.param_name.clone(), value);
                if self.attempt(&wildcard.node, self.segments.len(), Some(token), Some(param)) {
                    return true;
                }
            }
        }

        for child in node.excluded_children() {
            if self.attempt(child, index, None, None) {
                return true;
            }
        }

        false
    }

    fn finish(self) -> MatchResult {
        let pattern = if self.pattern.is_empty() {
            "/".to_string()
        } else {
            self.pattern.concat()
        };

        MatchResult {
            pattern,
            params: self.params.into_iter().collect(),
            names: self.names,
            stacks: self.stacks,
        }
    }
}
