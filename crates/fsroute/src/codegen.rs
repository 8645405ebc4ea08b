// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Source generation from a built route tree.
//!
//! The bundler embeds the route tree as a JavaScript object literal. Each
//! node is rendered as:
//!
//! ```js
//! {
//!   accept: true,
//!   excludeFromPath: false,
//!   names: { "page": __route_0 },
//!   stacks: { "guards": [__route_1, __route_2] },
//!   staticChildren: { "users": { ... } },
//!   paramChild: { paramName: "id", node: { ... } },
//!   wildcardChild: null,
//! }
//! ```
//!
//! # Determinism
//!
//! Output depends only on the tree: static children, names and stacks are
//! emitted in insertion order, which the builder takes from the (stable)
//! directory listing. Rebuilding an unchanged directory produces
//! byte-identical source, so the bundler can diff or cache it.

use crate::node::RouteNode;
use indexmap::IndexMap;

/// How `names` / `stacks` values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStyle<'a> {
    /// Values are emitted as the identifiers the table binds them to, for
    /// source that imports every file first (see [`generate_module`]).
    /// Paths missing from the table fall back to quoted literals.
    Identifier(&'a ImportTable),
    /// Values are emitted as quoted string literals.
    Literal,
}

/// Serializes a route tree into an object-literal source string.
///
/// # Examples
///
/// ```rust,ignore
/// let source = serialize_tree(&root, ValueStyle::Literal);
/// std::fs::write("routes.meta.js", format!("export default {};\n", source))?;
/// ```
pub fn serialize_tree(root: &RouteNode, style: ValueStyle<'_>) -> String {
    let mut generator = TreeGenerator::new();
    match style {
        ValueStyle::Identifier(imports) => {
            generator.write_node(root, &|path: &str| imports.reference(path))
        }
        ValueStyle::Literal => generator.write_node(root, &quote),
    }
    generator.output
}

/// Stable identifiers for every file referenced by a tree.
///
/// Identifiers are assigned in traversal order (`names`, then `stacks`, then
/// children in serialization order), so they are as deterministic as the
/// serialized tree itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    identifiers: IndexMap<String, String>,
}

impl ImportTable {
    /// Collects every path referenced by `root`.
    pub fn collect(root: &RouteNode) -> Self {
        let mut table = Self::default();
        table.visit(root);
        table
    }

    fn visit(&mut self, node: &RouteNode) {
        for path in node.names.values().chain(node.stacks.values().flatten()) {
            if !self.identifiers.contains_key(path) {
                let identifier = format!("__route_{}", self.identifiers.len());
                self.identifiers.insert(path.clone(), identifier);
            }
        }
        for child in node.static_children.values() {
            self.visit(child);
        }
        if let Some(param) = &node.param_child {
            self.visit(&param.node);
        }
        if let Some(wildcard) = &node.wildcard_child {
            self.visit(&wildcard.node);
        }
    }

    /// The identifier bound to `path`.
    pub fn identifier(&self, path: &str) -> Option<&str> {
        self.identifiers.get(path).map(String::as_str)
    }

    /// The identifier for `path`, or a quoted literal if it has none.
    fn reference(&self, path: &str) -> String {
        self.identifier(path).map(str::to_string).unwrap_or_else(|| quote(path))
    }

    /// (path, identifier) pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.identifiers.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Returns true if the tree references no files.
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// Generates a complete module: one namespace import per referenced file,
/// then the tree as the default export with values bound to those imports.
pub fn generate_module(root: &RouteNode) -> String {
    let imports = ImportTable::collect(root);
    let mut output = String::new();

    for (path, identifier) in imports.iter() {
        output.push_str(&format!("import * as {} from {};\n", identifier, quote(path)));
    }
    if !imports.is_empty() {
        output.push('\n');
    }

    output.push_str("export default ");
    output.push_str(&serialize_tree(root, ValueStyle::Identifier(&imports)));
    output.push_str(";\n");
    output
}

/// Quotes a string as a JavaScript string literal.
fn quote(value: &str) -> String {
    // JSON strings are valid JS string literals
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.escape_default()))
}

struct TreeGenerator {
    output: String,
    indent_level: usize,
}

impl TreeGenerator {
    fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.indent_level)
    }

    fn write_line(&mut self, line: &str) {
        self.output.push_str(&self.indent());
        self.output.push_str(line);
        self.output.push('\n');
    }

    /// Writes a node starting at the current position; the closing brace
    /// carries no trailing newline so callers can append `,` or `;`.
    fn write_node(&mut self, node: &RouteNode, value: &dyn Fn(&str) -> String) {
        self.output.push_str("{\n");
        self.indent_level += 1;

        self.write_line(&format!("accept: {},", node.accept));
        self.write_line(&format!("excludeFromPath: {},", node.exclude_from_path));

        let names: Vec<String> = node
            .names
            .iter()
            .map(|(key, path)| format!("{}: {}", quote(key), value(path)))
            .collect();
        self.write_line(&format!("names: {},", inline_object(&names)));

        let stacks: Vec<String> = node
            .stacks
            .iter()
            .map(|(key, paths)| {
                let items: Vec<String> = paths.iter().map(|p| value(p)).collect();
                format!("{}: [{}]", quote(key), items.join(", "))
            })
            .collect();
        self.write_line(&format!("stacks: {},", inline_object(&stacks)));

        if node.static_children.is_empty() {
            self.write_line("staticChildren: {},");
        } else {
            self.write_line("staticChildren: {");
            self.indent_level += 1;
            for (segment, child) in &node.static_children {
                self.output.push_str(&format!("{}{}: ", self.indent(), quote(segment)));
                self.write_node(child, value);
                self.output.push_str(",\n");
            }
            self.indent_level -= 1;
            self.write_line("},");
        }

        match &node.param_child {
            Some(param) => {
                self.write_line("paramChild: {");
                self.indent_level += 1;
                self.write_line(&format!("paramName: {},", quote(&param.param_name)));
                self.output.push_str(&format!("{}node: ", self.indent()));
                self.write_node(&param.node, value);
                self.output.push_str(",\n");
                self.indent_level -= 1;
                self.write_line("},");
            }
            None => self.write_line("paramChild: null,"),
        }

        match &node.wildcard_child {
            Some(wildcard) => {
                self.write_line("wildcardChild: {");
                self.indent_level += 1;
                self.write_line(&format!("paramName: {},", quote(&wildcard.param_name)));
                self.write_line(&format!("optional: {},", wildcard.optional));
                self.output.push_str(&format!("{}node: ", self.indent()));
                self.write_node(&wildcard.node, value);
                self.output.push_str(",\n");
                self.indent_level -= 1;
                self.write_line("},");
            }
            None => self.write_line("wildcardChild: null,"),
        }

        self.indent_level -= 1;
        self.output.push_str(&self.indent());
        self.output.push('}');
    }
}

fn inline_object(entries: &[String]) -> String {
    if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use crate::config::RouteFileConfig;
    use crate::memory_fs::MemoryFileSystem;

    fn tree(files: &[&str]) -> RouteNode {
        let fs = MemoryFileSystem::with_files(files.iter().copied());
        build_tree(&fs, "pages", &RouteFileConfig::page_defaults()).unwrap()
    }

    #[test]
    fn test_leaf_literal() {
        let root = tree(&["pages/page.tsx", "pages/layout.tsx"]);
        let expected = r#"{
  accept: true,
  excludeFromPath: false,
  names: { "page": "pages/page.tsx" },
  stacks: { "layout": ["pages/layout.tsx"] },
  staticChildren: {},
  paramChild: null,
  wildcardChild: null,
}"#;
        assert_eq!(serialize_tree(&root, ValueStyle::Literal), expected);
    }

    #[test]
    fn test_identifier_style_uses_import_table() {
        let root = tree(&["pages/page.tsx", "pages/layout.tsx", "pages/users/[id]/page.tsx"]);
        let imports = ImportTable::collect(&root);
        let source = serialize_tree(&root, ValueStyle::Identifier(&imports));

        assert!(source.contains(r#"names: { "page": __route_0 },"#), "{source}");
        assert!(source.contains(r#"stacks: { "layout": [__route_1] },"#), "{source}");
        assert!(source.contains(r#"names: { "page": __route_2 },"#), "{source}");
        // No file path is ever written bare
        for (path, _) in imports.iter() {
            assert!(!source.contains(&format!(": {}", path)), "{source}");
        }
    }

    #[test]
    fn test_identifier_style_quotes_unknown_paths() {
        let mut root = RouteNode::new("pages");
        root.names.insert("page".to_string(), "pages/page.tsx".to_string());
        let source = serialize_tree(&root, ValueStyle::Identifier(&ImportTable::default()));
        assert!(source.contains(r#"names: { "page": "pages/page.tsx" },"#));
    }

    #[test]
    fn test_nested_children() {
        let root = tree(&[
            "pages/users/[id]/page.tsx",
            "pages/(auth)/login/page.tsx",
            "pages/[[...slug]]/page.tsx",
        ]);
        let source = serialize_tree(&root, ValueStyle::Literal);

        assert!(source.contains(concat!(
            "  staticChildren: {\n",
            "    \"(auth)\": {\n",
            "      accept: false,\n",
            "      excludeFromPath: true,"
        )));
        assert!(source.contains("paramName: \"id\",\n"));
        assert!(source.contains(
            "wildcardChild: {\n    paramName: \"slug\",\n    optional: true,\n    node: {"
        ));
        assert!(source.ends_with("}"));

        // "(auth)" sorts before "users" in the listing
        let auth = source.find("\"(auth)\"").unwrap();
        let users = source.find("\"users\"").unwrap();
        assert!(auth < users);
    }

    #[test]
    fn test_quotes_special_characters() {
        let root = tree(&["pages/say \"hi\"/page.tsx"]);
        let source = serialize_tree(&root, ValueStyle::Literal);
        assert!(source.contains(r#""say \"hi\"": {"#));
        assert!(source.contains(r#""page": "pages/say \"hi\"/page.tsx""#));
    }

    #[test]
    fn test_deterministic_output() {
        let files = [
            "pages/page.tsx",
            "pages/layout.tsx",
            "pages/users/guard.ts",
            "pages/users/[id]/page.tsx",
            "pages/files/[...path]/page.tsx",
        ];
        let first = generate_module(&tree(&files));
        let second = generate_module(&tree(&files));
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_module() {
        let root = tree(&[
            "pages/page.tsx",
            "pages/layout.tsx",
            "pages/users/page.tsx",
            "pages/users/layout.tsx",
        ]);
        let module = generate_module(&root);

        let expected_imports = "import * as __route_0 from \"pages/page.tsx\";\n\
import * as __route_1 from \"pages/layout.tsx\";\n\
import * as __route_2 from \"pages/users/page.tsx\";\n\
import * as __route_3 from \"pages/users/layout.tsx\";\n\n\
export default {\n";
        assert!(module.starts_with(expected_imports), "{module}");
        assert!(module.contains(r#"names: { "page": __route_0 },"#));
        assert!(module.contains(r#"stacks: { "layout": [__route_3] },"#));
        assert!(module.ends_with("};\n"));
    }

    #[test]
    fn test_import_table_deduplicates() {
        let fs = MemoryFileSystem::with_files(["pages/page.tsx"]);
        let files = vec![
            RouteFileConfig::name("page.*", "page").accepting(),
            RouteFileConfig::stack("page.*", "chain"),
        ];
        let root = build_tree(&fs, "pages", &files).unwrap();
        let table = ImportTable::collect(&root);

        assert_eq!(table.len(), 1);
        assert_eq!(table.identifier("pages/page.tsx"), Some("__route_0"));
    }

    #[test]
    fn test_empty_tree_module() {
        let module = generate_module(&RouteNode::new("pages"));
        assert!(module.starts_with("export default {\n"));
    }
}
