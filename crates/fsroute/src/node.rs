// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Route tree nodes.
//!
//! A [`RouteNode`] is one directory level of the route tree. Directory names
//! decide the tree shape:
//! - `users` → static child
//! - `[id]` → param child
//! - `[...path]` → wildcard child
//! - `[[...slug]]` → optional wildcard child
//! - `(auth)` → grouping child, transparent to URLs
//!
//! Trees are built once by the [`TreeBuilder`](crate::builder::TreeBuilder)
//! and never mutated afterwards.

use indexmap::IndexMap;

/// Segment type of a directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentType {
    /// Literal segment (e.g., "blog")
    Static(String),

    /// Grouping folder (e.g., "(auth)"), never part of the URL
    Group(String),

    /// Dynamic parameter (e.g., "[id]" -> ":id")
    Dynamic(String),

    /// Catch-all parameter (e.g., "[...path]" -> "*path")
    CatchAll(String),

    /// Optional catch-all parameter (e.g., "[[...slug]]" -> "*slug?")
    OptionalCatchAll(String),
}

impl SegmentType {
    /// Parse a directory name into a SegmentType.
    ///
    /// Bracketed names with an empty parameter name fall back to static.
    pub fn parse(segment: &str) -> Self {
        let parsed = if let Some(name) = segment
            .strip_prefix("[[...")
            .and_then(|s| s.strip_suffix("]]"))
        {
            SegmentType::OptionalCatchAll(name.to_string())
        } else if let Some(name) = segment.strip_prefix("[...").and_then(|s| s.strip_suffix(']')) {
            SegmentType::CatchAll(name.to_string())
        } else if let Some(name) = segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            SegmentType::Dynamic(name.to_string())
        } else if let Some(name) = segment.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            SegmentType::Group(name.to_string())
        } else {
            return SegmentType::Static(segment.to_string());
        };

        if parsed.name().is_empty() || parsed.name().contains(['[', ']']) {
            SegmentType::Static(segment.to_string())
        } else {
            parsed
        }
    }

    /// The literal, group or parameter name.
    pub fn name(&self) -> &str {
        match self {
            SegmentType::Static(name)
            | SegmentType::Group(name)
            | SegmentType::Dynamic(name)
            | SegmentType::CatchAll(name)
            | SegmentType::OptionalCatchAll(name) => name,
        }
    }
}

/// A `[name]` child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamChild {
    /// Name the captured segment is bound to.
    pub param_name: String,
    /// The child node.
    pub node: RouteNode,
}

impl ParamChild {
    /// The pattern token this child contributes (`/:name`).
    pub fn pattern_token(&self) -> String {
        format!("/:{}", self.param_name)
    }
}

/// A `[...name]` or `[[...name]]` child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardChild {
    /// Name the captured remainder is bound to.
    pub param_name: String,
    /// Whether an empty remainder may be captured.
    pub optional: bool,
    /// The child node.
    pub node: RouteNode,
}

impl WildcardChild {
    /// The pattern token this child contributes (`/*name` or `/*name?`).
    pub fn pattern_token(&self) -> String {
        if self.optional {
            format!("/*{}?", self.param_name)
        } else {
            format!("/*{}", self.param_name)
        }
    }
}

/// One directory level of the route tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteNode {
    /// Directory this node was built from.
    pub source: String,

    /// Literal children in directory listing order. Grouping children live
    /// here too, keyed by their full `(name)` folder name.
    pub static_children: IndexMap<String, RouteNode>,

    /// The `[name]` child, if any.
    pub param_child: Option<Box<ParamChild>>,

    /// The `[...name]` / `[[...name]]` child, if any.
    pub wildcard_child: Option<Box<WildcardChild>>,

    /// Grouping node: never consumes or emits a path segment.
    pub exclude_from_path: bool,

    /// A path ending at this node is a complete route.
    pub accept: bool,

    /// Single-valued properties (e.g. `page`); deeper nodes overwrite.
    pub names: IndexMap<String, String>,

    /// Multi-valued properties (e.g. `guards`); accumulated root-first.
    pub stacks: IndexMap<String, Vec<String>>,
}

/// An accepting route found in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// The URL pattern (e.g. "/users/:id").
    pub pattern: String,
    /// The directory that defines the route.
    pub source: String,
}

impl RouteNode {
    /// Creates an empty node for the given directory.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Iterates the grouping children.
    pub fn excluded_children(&self) -> impl Iterator<Item = &RouteNode> {
        self.static_children.values().filter(|child| child.exclude_from_path)
    }

    /// Lists every accepting route in the tree (for debugging/listing).
    ///
    /// Routes are listed depth-first: the node itself, static and grouping
    /// children in listing order, then the param child, then the wildcard.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut routes = Vec::new();
        self.collect_routes(&mut String::new(), &mut routes);
        routes
    }

    fn collect_routes(&self, prefix: &mut String, routes: &mut Vec<RouteInfo>) {
        if self.accept {
            routes.push(RouteInfo {
                pattern: if prefix.is_empty() { "/".to_string() } else { prefix.clone() },
                source: self.source.clone(),
            });
        }

        let len = prefix.len();
        for (segment, child) in &self.static_children {
            if !child.exclude_from_path {
                prefix.push('/');
                prefix.push_str(segment);
            }
            child.collect_routes(prefix, routes);
            prefix.truncate(len);
        }

        if let Some(param) = &self.param_child {
            prefix.push_str(&param.pattern_token());
            param.node.collect_routes(prefix, routes);
            prefix.truncate(len);
        }

        if let Some(wildcard) = &self.wildcard_child {
            prefix.push_str(&wildcard.pattern_token());
            wildcard.node.collect_routes(prefix, routes);
            prefix.truncate(len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_parse() {
        assert_eq!(SegmentType::parse("blog"), SegmentType::Static("blog".to_string()));
        assert_eq!(SegmentType::parse("[id]"), SegmentType::Dynamic("id".to_string()));
        assert_eq!(SegmentType::parse("[...path]"), SegmentType::CatchAll("path".to_string()));
        assert_eq!(
            SegmentType::parse("[[...slug]]"),
            SegmentType::OptionalCatchAll("slug".to_string())
        );
        assert_eq!(SegmentType::parse("(auth)"), SegmentType::Group("auth".to_string()));
    }

    #[test]
    fn test_segment_parse_malformed_is_static() {
        assert_eq!(SegmentType::parse("[]"), SegmentType::Static("[]".to_string()));
        assert_eq!(SegmentType::parse("[...]"), SegmentType::Static("[...]".to_string()));
        assert_eq!(SegmentType::parse("()"), SegmentType::Static("()".to_string()));
        assert_eq!(SegmentType::parse("[[tab]]"), SegmentType::Static("[[tab]]".to_string()));
        assert_eq!(SegmentType::parse("[id"), SegmentType::Static("[id".to_string()));
    }

    #[test]
    fn test_pattern_tokens() {
        let param = ParamChild {
            param_name: "id".to_string(),
            node: RouteNode::default(),
        };
        assert_eq!(param.pattern_token(), "/:id");

        let mut wildcard = WildcardChild {
            param_name: "rest".to_string(),
            optional: false,
            node: RouteNode::default(),
        };
        assert_eq!(wildcard.pattern_token(), "/*rest");
        wildcard.optional = true;
        assert_eq!(wildcard.pattern_token(), "/*rest?");
    }

    #[test]
    fn test_routes_listing() {
        let mut root = RouteNode::new("pages");
        root.accept = true;

        let mut users = RouteNode::new("pages/users");
        let mut user = RouteNode::new("pages/users/[id]");
        user.accept = true;
        users.param_child = Some(Box::new(ParamChild {
            param_name: "id".to_string(),
            node: user,
        }));
        root.static_children.insert("users".to_string(), users);

        let mut group = RouteNode::new("pages/(auth)");
        group.exclude_from_path = true;
        let mut login = RouteNode::new("pages/(auth)/login");
        login.accept = true;
        group.static_children.insert("login".to_string(), login);
        root.static_children.insert("(auth)".to_string(), group);

        let mut docs = RouteNode::new("pages/[[...slug]]");
        docs.accept = true;
        root.wildcard_child = Some(Box::new(WildcardChild {
            param_name: "slug".to_string(),
            optional: true,
            node: docs,
        }));

        let patterns: Vec<String> = root.routes().into_iter().map(|r| r.pattern).collect();
        assert_eq!(patterns, vec!["/", "/users/:id", "/login", "/*slug?"]);
        assert_eq!(root.excluded_children().count(), 1);
    }
}
