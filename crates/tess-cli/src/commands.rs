// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations. Every command writes its report to `out`.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use comfy_table::Table;
use tess_app_core::config::ConfigService;
use tess_app_core::prefs::{EditorPrefs, PREFS_KEY};
use tess_app_core::prefs_port::PrefsPort;
use tess_config_fs::FsConfigStore;
use tess_geom::TileCanvas;
use tess_graph::codec;
use tess_graph::{Block, Category, DefaultBlocks, GraphStore, Point};
use tracing::{info, warn};

use crate::cli::{Cli, Commands};

/// Dispatches one parsed invocation.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config_dir = cli.config_dir.as_deref();
    match cli.command {
        Commands::Inspect { file } => inspect(&file, out),
        Commands::Check { file } => check(&file, out),
        Commands::Fmt { file, output } => {
            let graph = load(&file)?;
            emit(&graph, output.as_deref(), out)
        }
        Commands::New { root, output } => {
            let prefs = effective_prefs(prefs_service(config_dir).as_ref());
            let graph = fresh_graph(&prefs, root)?;
            emit(&graph, output.as_deref(), out)
        }
        Commands::Prefs { save } => {
            let service = prefs_service(config_dir);
            let prefs = effective_prefs(service.as_ref());
            if save {
                let service = service.context("no usable config directory")?;
                service
                    .save(PREFS_KEY, &prefs)
                    .context("failed to save editor prefs")?;
                info!(key = PREFS_KEY, "prefs saved");
            }
            writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
            Ok(())
        }
    }
}

fn prefs_service(dir: Option<&Path>) -> Option<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    match store {
        Ok(store) => Some(ConfigService::new(store)),
        Err(err) => {
            warn!(error = %err, "config directory unavailable, using default prefs");
            None
        }
    }
}

fn effective_prefs(service: Option<&ConfigService<FsConfigStore>>) -> EditorPrefs {
    service.and_then(PrefsPort::load_prefs).unwrap_or_default()
}

fn load(file: &Path) -> Result<GraphStore<TileCanvas>> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    codec::decode(&text, &DefaultBlocks)
        .with_context(|| format!("failed to decode {}", file.display()))
}

fn emit(graph: &GraphStore<TileCanvas>, output: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let text = codec::encode(graph)?;
    match output {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "graph written");
        }
        None => writeln!(out, "{text}")?,
    }
    Ok(())
}

fn fresh_graph(prefs: &EditorPrefs, root: Option<Category>) -> Result<GraphStore<TileCanvas>> {
    let category = root.unwrap_or_else(|| prefs.default_root.category());
    if !category.is_root() {
        bail!("{category} cannot be a root block");
    }
    let mut graph = GraphStore::with_renderer(TileCanvas::default());
    graph.set_settings(prefs.graph.settings());
    graph.create_block(category)?;
    Ok(graph)
}

fn check(file: &Path, out: &mut impl Write) -> Result<()> {
    let graph = load(file)?;
    graph
        .verify()
        .with_context(|| format!("{} violates a graph invariant", file.display()))?;
    let satisfied = graph.blocks().filter(|b| b.is_satisfied()).count();
    writeln!(
        out,
        "ok: {} blocks, {} edges, {} satisfied, {} drawn",
        graph.block_count(),
        graph.edge_count(),
        satisfied,
        graph.renderer().len()
    )?;
    Ok(())
}

fn inspect(file: &Path, out: &mut impl Write) -> Result<()> {
    let graph = load(file)?;
    let settings = graph.settings();
    writeln!(
        out,
        "zoom {}  line width {}  root {}",
        settings.display_scale,
        settings.line_width,
        graph
            .root()
            .map_or_else(|| "none".to_owned(), |id| id.to_string())
    )?;

    let mut table = Table::new();
    table.set_header(vec![
        "id",
        "category",
        "root",
        "satisfied",
        "position",
        "attributes",
        "inputs",
    ]);
    for block in graph.blocks() {
        table.add_row(vec![
            block.id().to_string(),
            block.category().to_string(),
            block.is_root().to_string(),
            block.is_satisfied().to_string(),
            format_point(block.position()),
            format_attributes(block),
            format_inputs(&graph, block),
        ]);
    }
    writeln!(out, "{table}")?;
    writeln!(
        out,
        "{} blocks, {} links",
        graph.block_count(),
        graph.edge_count()
    )?;
    Ok(())
}

fn format_point(p: Point) -> String {
    format!("({}, {})", p.x, p.y)
}

fn format_attributes(block: &Block) -> String {
    block
        .attributes()
        .iter()
        .map(|a| format!("{}={}", a.name(), a.value()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_inputs(graph: &GraphStore<TileCanvas>, block: &Block) -> String {
    if block.inputs().is_empty() {
        return String::new();
    }
    block
        .inputs()
        .iter()
        .map(|c| {
            c.edges()
                .first()
                .and_then(|e| graph.edge(*e))
                .map_or_else(|| "-".to_owned(), |e| e.output().to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
