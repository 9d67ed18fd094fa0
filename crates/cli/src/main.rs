//! Member Graph CLI
//!
//! Builds the member dependency graph of one C# file and prints it, trimmed
//! to the members reachable from `--seed` selections when given.
//!
//! ```text
//! member-graph src/Account.cs --seed Deposit --stop Balance
//! member-graph src/Account.cs --interactive --format json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use member_graph::{CSharpModel, ExplorerSession, GraphConfig, Selection};

mod args;
mod command;
mod output;

use args::Args;
use output::Renderer;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the graph, logs go to stderr
    let env = env_logger::Env::default().default_filter_or(args.log_filter());
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GraphConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GraphConfig::default(),
    };
    if let Some(keying) = args.keying {
        config.keying = keying.into();
    }

    let source = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let model = CSharpModel::parse(args.file.display().to_string(), &source)
        .with_context(|| format!("Failed to analyse {}", args.file.display()))?;

    let session = ExplorerSession::build(&model, &config)?;
    let (nodes, edges) = session.full_graph().stats();
    log::info!("Full graph: {nodes} nodes, {edges} edges");

    let renderer = Renderer::new(args.format, config.palette.clone());

    if args.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        return command::run_interactive(&session, &renderer, stdin, &mut stdout).await;
    }

    let selection =
        Selection::new(args.seeds.iter().cloned()).with_stops(args.stops.iter().cloned());
    let graph = session.select(&selection).context("Failed to trim graph")?;

    let text = renderer.render(&graph)?;
    output::emit(&text, args.output.as_deref()).await
}
