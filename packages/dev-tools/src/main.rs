//! Canvas Summary
//!
//! Runs one grouping pass over a `.canvas` file and prints the result, the way
//! the canvas view would see it.
//!
//! ```text
//! canvas-summary <path/to/board.canvas> [--json]
//! ```
//!
//! # Environment
//!
//! - `OPENCANVAS_SETTINGS` - settings file to load (defaults are used otherwise)
//! - `OPENCANVAS_VAULT_ROOT` - root that file node paths and the link filter
//!   file are resolved against (defaults to the canvas file's directory)
//! - `RUST_LOG` - log filter, logs go to stderr

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use opencanvas_core::models::GroupedNodes;
use opencanvas_core::services::BroadcastDiagnostics;
use opencanvas_core::storage::{FsDocumentSource, JsonFilterStorage, VaultFileResolver};
use opencanvas_core::{CanvasGrouper, CanvasSettings, FilterRule, FilterService};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: canvas-summary <file.canvas> [--json]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays pipeable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("canvas_summary=info,opencanvas_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut canvas_path = None;
    let mut as_json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => as_json = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ if canvas_path.is_none() => canvas_path = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{}'\n{}", arg, USAGE),
        }
    }
    let canvas_path = canvas_path.context(USAGE)?;

    let (canvas_dir, document_id) = split_canvas_path(&canvas_path)?;
    let vault_root = std::env::var_os("OPENCANVAS_VAULT_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| canvas_dir.clone());

    let settings = match std::env::var_os("OPENCANVAS_SETTINGS") {
        Some(path) => CanvasSettings::load(Path::new(&path)).await,
        None => CanvasSettings::default(),
    };
    if let Err(e) = settings.validate() {
        tracing::warn!("Settings are inconsistent: {}", e);
    }

    let rules = load_rules(&settings, &vault_root).await;

    let diagnostics = Arc::new(BroadcastDiagnostics::new());
    let mut diagnostic_rx = diagnostics.subscribe();
    let grouper = CanvasGrouper::from_settings(
        &settings,
        Some(Arc::new(VaultFileResolver::new(&vault_root))),
    )
    .with_diagnostics(diagnostics.clone());

    let source = FsDocumentSource::new(canvas_dir);
    let grouped = grouper.group_from_source(&source, &document_id, &rules).await;

    let mut warnings = 0;
    while diagnostic_rx.try_recv().is_ok() {
        warnings += 1;
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&grouped)?);
    } else {
        print_summary(&canvas_path, &settings, &grouped, warnings);
    }
    Ok(())
}

/// Directory and file name of the canvas, in the shape `FsDocumentSource` wants
fn split_canvas_path(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("not a file path: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name.to_string()))
}

/// Filters inlined in the settings win; otherwise read the link filter file
async fn load_rules(settings: &CanvasSettings, vault_root: &Path) -> Vec<FilterRule> {
    if !settings.link_filters.is_empty() {
        return settings.link_filters.clone();
    }
    let storage = JsonFilterStorage::new(vault_root.join(&settings.link_filters_path));
    FilterService::new(Arc::new(storage)).load().await
}

fn print_summary(
    canvas_path: &Path,
    settings: &CanvasSettings,
    grouped: &GroupedNodes,
    warnings: usize,
) {
    println!("{} ({} nodes)", canvas_path.display(), grouped.len());
    for (label, count) in grouped.bucket_counts() {
        println!("  {:<24} {}", label, count);
    }

    for (title, nodes) in grouped.link.iter().filter(|(_, nodes)| !nodes.is_empty()) {
        println!("\n[{}]", title);
        for node in nodes {
            println!(
                "  {} {} ({})",
                node.id,
                node.url().unwrap_or("-"),
                settings.link_color(node)
            );
        }
    }

    if warnings > 0 {
        println!("\n{} warning(s), see log output", warnings);
    }
}
