// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use fsroute::fs::path_to_string;
use fsroute::{
    build_tree, generate_module, serialize_tree, ActiveRoutes, MemoryFileSystem, OsFileSystem,
    RouteFileConfig, RouteTable, RoutingConfig, ValueStyle,
};
use std::error::Error;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG=fsroute=trace shows every match attempt
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // This example demonstrates two approaches:
    // 1. Building from an in-memory filesystem
    // 2. Building from a real directory on disk

    println!("=== Memory Filesystem Example ===");
    memory_example()?;

    println!("\n=== Filesystem Example ===");
    filesystem_example()?;

    Ok(())
}

fn memory_example() -> Result<(), Box<dyn Error>> {
    let fs = MemoryFileSystem::with_files([
        "src/pages/page.tsx",
        "src/pages/layout.tsx",
        "src/pages/users/page.tsx",
        "src/pages/users/new/page.tsx",
        "src/pages/users/guard.ts",
        "src/pages/users/[id]/page.tsx",
        "src/pages/(auth)/login/page.tsx",
        "src/pages/docs/[[...slug]]/page.tsx",
        "src/api/users/[id]/route.ts",
        "src/api/middleware.ts",
    ]);

    let config = RoutingConfig::default();
    let active = ActiveRoutes::new(RouteTable::build(&fs, &config)?);

    println!("Page routes:");
    for route in active.load().pages.routes() {
        println!("  {:<20} {}", route.pattern, route.source);
    }

    for path in ["/", "/users/new", "/users/123", "/login", "/docs/guide/intro", "/nope"] {
        match active.match_page(path) {
            Some(matched) => println!("{} -> {}", path, serde_json::to_string(&matched)?),
            None => println!("{} -> 404", path),
        }
    }

    if let Some(api) = active.match_api("/users/42") {
        println!("API /users/42 -> {}", serde_json::to_string_pretty(&api)?);
    }

    // A file change triggers a rebuild; the new table replaces the old one whole
    fs.add_file("src/pages/about/page.tsx");
    active.rebuild(&fs, &config)?;
    println!("/about after rebuild -> {:?}", active.match_page("/about").map(|m| m.pattern));

    // A conflicting group is reported and the previous table stays active
    fs.add_file("src/pages/(marketing)/login/page.tsx");
    if let Err(e) = active.rebuild(&fs, &config) {
        println!("Rebuild rejected: {}", e);
    }

    Ok(())
}

fn filesystem_example() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("pages");

    for file in ["page.tsx", "layout.tsx", "files/[...path]/page.tsx"] {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "export default function Page() {}\n")?;
    }

    let tree = build_tree(
        OsFileSystem::new(),
        &path_to_string(&root),
        &RouteFileConfig::page_defaults(),
    )?;

    if let Some(matched) = tree.match_path("/files/docs/readme.txt") {
        println!("Matched {} with {:?}", matched.pattern, matched.params);
    }

    println!("\nMetadata literal:\n{}", serialize_tree(&tree, ValueStyle::Literal));
    println!("\nGenerated module:\n{}", generate_module(&tree));

    Ok(())
}
