use crate::{emit_success, OutputMode};
use doctree::config::{write_config, DoctreeConfig};
use doctree::server::{start_server, AppState};
use doctree::snapshot::{sample_document, DocumentSnapshot};
use doctree::ui::{self, render_outline, render_tabs, Icons};
use doctree::variant::bridge;
use doctree::{DocumentTree, Inspector, NodePath, TreeModel};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Resolve the snapshot to inspect: flag, then config, then the sample
fn open_document(config: &DoctreeConfig, file: Option<PathBuf>) -> anyhow::Result<(String, DocumentSnapshot)> {
    let file = file.or_else(|| config.document.as_ref().map(PathBuf::from));
    match file {
        Some(path) => {
            let snapshot = DocumentSnapshot::load(&path)?;
            Ok((path.display().to_string(), snapshot))
        }
        None => {
            tracing::debug!("No document given, using the built-in sample");
            Ok(("<sample>".to_string(), sample_document()))
        }
    }
}

fn report_skips(tree: &DocumentTree) {
    let report = tree.report();
    if !report.is_complete() {
        ui::warn(&format!(
            "{} absent host entries were skipped (run with --verbose for details)",
            report.skipped.len()
        ));
    }
}

pub fn run_tree(
    output_mode: OutputMode,
    config: &DoctreeConfig,
    file: Option<PathBuf>,
    path: &str,
    depth: Option<usize>,
) -> anyhow::Result<()> {
    let (source, snapshot) = open_document(config, file)?;
    let path: NodePath = path.parse()?;

    let mut tree = DocumentTree::build_root(&snapshot);
    let node = tree.resolve(&path)?;
    let outline = tree
        .outline(node, depth)
        .ok_or_else(|| anyhow::anyhow!("node {} vanished from the tree", path))?;

    if output_mode.is_human() {
        ui::header(&format!("Document Tree ({})", source));
        println!("{}", render_outline(&outline));
        report_skips(&tree);
    } else {
        emit_success(output_mode, "tree", serde_json::to_value(&outline)?)?;
    }
    Ok(())
}

pub fn run_pages(
    output_mode: OutputMode,
    config: &DoctreeConfig,
    file: Option<PathBuf>,
    path: &str,
) -> anyhow::Result<()> {
    let (_source, snapshot) = open_document(config, file)?;
    let path: NodePath = path.parse()?;

    let mut inspector = Inspector::open(&snapshot, config.expand_depth());
    let tabs = inspector.select_path(&path)?.to_vec();
    let current = inspector.current();
    let label = inspector
        .model()
        .data(&current, doctree::ItemRole::Display)
        .unwrap_or_else(|| "(root)".to_string());

    if output_mode.is_human() {
        ui::header(&format!("{} {}", label, ui::muted(&path.to_string())));
        if tabs.is_empty() {
            println!("{}", ui::dim("This node has no pages."));
        } else {
            println!("{}", render_tabs(&tabs));
        }
    } else {
        let data = serde_json::json!({
            "path": path.to_string(),
            "label": label,
            "tabs": tabs,
        });
        emit_success(output_mode, "pages", data)?;
    }
    Ok(())
}

pub fn run_stats(
    output_mode: OutputMode,
    config: &DoctreeConfig,
    file: Option<PathBuf>,
    load_all: bool,
) -> anyhow::Result<()> {
    let (source, snapshot) = open_document(config, file)?;
    let mut tree = DocumentTree::build_root(&snapshot);
    if load_all {
        tree.load_all();
    }
    let stats = tree.stats();

    if output_mode.is_human() {
        println!("{} Doctree Statistics ({})", Icons::STATS, source);
        println!("------------------------------------");
        println!("{}", stats);
        for skipped in &tree.report().skipped {
            ui::summary_row(
                "skipped:",
                &format!("{} #{} under {}", skipped.collection, skipped.index, tree.path_of(skipped.parent)),
            );
        }
    } else {
        let data = serde_json::json!({
            "source": source,
            "stats": stats,
            "report": tree.report(),
        });
        emit_success(output_mode, "stats", data)?;
    }
    Ok(())
}

pub fn run_init(
    output_mode: OutputMode,
    path: &Path,
    document: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let config = DoctreeConfig {
        document,
        ..Default::default()
    };
    write_config(path, &config, force)?;

    if output_mode.is_human() {
        ui::success(&format!("Wrote {}", path.display()));
    } else {
        emit_success(output_mode, "init", serde_json::json!({ "path": path.display().to_string() }))?;
    }
    Ok(())
}

pub fn run_sample(output_mode: OutputMode, output: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let json = sample_document().to_json()?;

    let Some(path) = output else {
        if output_mode.is_human() {
            println!("{}", json);
        } else {
            emit_success(output_mode, "sample", serde_json::from_str(&json)?)?;
        }
        return Ok(());
    };

    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(&path, &json)?;

    if output_mode.is_human() {
        ui::info("Sample written", &path.display().to_string());
    } else {
        emit_success(output_mode, "sample", serde_json::json!({ "path": path.display().to_string() }))?;
    }
    Ok(())
}

pub fn run_serve(config: &DoctreeConfig, file: Option<PathBuf>, port: u16) -> anyhow::Result<()> {
    let (source, snapshot) = open_document(config, file)?;
    let model = TreeModel::from_host(&snapshot);
    report_skips(model.tree());
    ui::info("Document", &source);

    let state = AppState::new(source, model);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(start_server(port, state))
}

pub fn run_bridge_check(output_mode: OutputMode) -> anyhow::Result<()> {
    let mut results = Vec::new();
    for value in bridge::acceptance_values() {
        let returned = bridge::round_trip(&value)?;
        results.push((value, returned));
    }
    let failures = results.iter().filter(|(sent, got)| sent != got).count();

    if output_mode.is_human() {
        ui::section("Bridge round trip");
        for (sent, got) in &results {
            let icon = if sent == got { Icons::CHECK } else { Icons::CROSS };
            println!("{} {:<7} {:?}", icon, sent.type_name().bold(), got);
        }
    } else {
        let data = serde_json::json!({
            "checked": results.len(),
            "failures": failures,
        });
        emit_success(output_mode, "bridge-check", data)?;
    }

    if failures > 0 {
        anyhow::bail!("{} values changed crossing the bridge", failures);
    }
    Ok(())
}
