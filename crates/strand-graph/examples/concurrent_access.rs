//! Thread-safe concurrent access example.
//!
//! This example demonstrates:
//! - Sharing a DependencyGraph handle across threads
//! - Concurrent marks registering edges into the same module
//! - Invalidating a shared dependency and listing what must be re-served

use strand_graph::{DependencyGraph, ModulePatch};
use std::thread;

fn main() {
    let graph = DependencyGraph::new();
    graph.mark("/lib/util.ts", ModulePatch::new());

    // Each page registers its own edges concurrently
    let pages = ["/routes/index.tsx", "/routes/about.tsx", "/routes/blog.tsx"];
    let handles: Vec<_> = pages
        .iter()
        .map(|page| {
            let graph = graph.clone();
            let page = page.to_string();
            thread::spawn(move || {
                graph.mark(&page, ModulePatch::new().deps(["/lib/util.ts", "/app.css"]));
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("a worker thread panicked");
        }
    }

    println!("Graph has {} modules", graph.len());

    // util.ts changed on disk
    graph.update("/lib/util.ts");
    for dependent in graph.dependents_of("/lib/util.ts") {
        println!(
            "  re-serve {} (version {})",
            dependent,
            graph.version(&dependent).unwrap_or_default()
        );
    }
}
