use crate::config::load_config;
use crate::ir::{DiagramKind, Graph};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::templates;
use crate::tree::{MindMapTree, tree_to_graph};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "mflow",
    version,
    about = "Automatic layout for mind maps and flowcharts"
)]
pub struct Args {
    /// Input graph or mind-map tree (.json), or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout engine. Guessed from the input when omitted.
    #[arg(short = 'k', long = "kind", value_enum)]
    pub kind: Option<KindArg>,

    /// Config file (JSON5, camelCase keys)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Print a starter diagram instead of reading input
    #[arg(long = "template", value_parser = clap::builder::PossibleValuesParser::new(templates::NAMES))]
    pub template: Option<String>,

    /// Write levels, positions and warnings as JSON to this path
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum KindArg {
    Mindmap,
    Flowchart,
}

impl From<KindArg> for DiagramKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Mindmap => DiagramKind::Mindmap,
            KindArg::Flowchart => DiagramKind::Flowchart,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = load_config(args.config.as_deref())?;

    let (graph, kind) = match args.template.as_deref() {
        Some(name) => templates::by_name(name)
            .ok_or_else(|| anyhow::anyhow!("unknown template '{name}'"))?,
        None => {
            let input = read_input(args.input.as_deref())?;
            parse_document(&input)?
        }
    };
    let kind = args.kind.map(DiagramKind::from).unwrap_or(kind);

    let layout = compute_layout(&graph, kind, &config)?;
    log::info!(
        "laid out {} nodes and {} edges as {:?}",
        layout.graph.nodes.len(),
        layout.graph.edges.len(),
        kind
    );
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)
            .with_context(|| format!("writing layout dump to {}", path.display()))?;
    }
    write_output(&layout.graph.to_json_pretty()?, args.output.as_deref())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    // RUST_LOG, when set, refines the level chosen by -v.
    builder.parse_env("RUST_LOG");
    builder.init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(contents: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Accepts either a node/edge graph or a `rootId` mind-map tree, and guesses
/// which engine suits it.
fn parse_document(input: &str) -> Result<(Graph, DiagramKind)> {
    let value: serde_json::Value = serde_json::from_str(input).context("input is not JSON")?;
    if value.get("rootId").is_some() {
        let tree: MindMapTree = serde_json::from_value(value)?;
        return Ok((tree_to_graph(&tree), DiagramKind::Mindmap));
    }
    let graph = Graph::from_json(input)?;
    let kind = guess_kind(&graph);
    Ok((graph, kind))
}

fn guess_kind(graph: &Graph) -> DiagramKind {
    let mind_map = graph
        .nodes
        .iter()
        .any(|node| matches!(node.kind.as_str(), "mindMapNode" | "topic"));
    if mind_map {
        DiagramKind::Mindmap
    } else {
        DiagramKind::Flowchart
    }
}
