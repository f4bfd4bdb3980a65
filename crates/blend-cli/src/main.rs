//! Blend CLI - run declarative behaviors against an HTML page
//!
//! Loads the page, performs the document-ready pass, replays scripted
//! clicks and action-tree invocations, advances the virtual clock and
//! prints the resulting markup.

use anyhow::{Context, bail};
use blend_dom::{Document, NodeId};
use blend_runtime::{Runtime, RuntimeConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "blend")]
#[command(about = "Run Blend behaviors against an HTML page and print the result", long_about = None)]
struct Cli {
    /// HTML page to load
    page: PathBuf,

    /// Base directory for the action-tree file and loaded pages
    /// (defaults to the page's directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Runtime configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dispatch a click on every element matching SELECTOR
    #[arg(long, value_name = "SELECTOR")]
    click: Vec<String>,

    /// Invoke a registered action tree by name
    #[arg(long, value_name = "NAME")]
    invoke: Vec<String>,

    /// Virtual milliseconds to advance after the scripted steps
    #[arg(long, default_value = "0")]
    advance_ms: u64,

    /// Animation frames to run after advancing
    #[arg(long, default_value = "0")]
    frames: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    match cli.root {
        Some(root) => config.root_dir = root,
        None if cli.config.is_none() => {
            if let Some(dir) = cli.page.parent().filter(|d| !d.as_os_str().is_empty()) {
                config.root_dir = dir.to_path_buf();
            }
        }
        None => {}
    }

    let html = std::fs::read_to_string(&cli.page)
        .with_context(|| format!("failed to read {}", cli.page.display()))?;
    info!("Loaded page {}", cli.page.display());
    debug!("Serving files from {}", config.root_dir.display());

    let mut rt = Runtime::new(Document::parse(&html), config);
    rt.document_ready();

    for selector in &cli.click {
        let targets = rt
            .document()
            .query_selector_all(NodeId::ROOT, selector)
            .with_context(|| format!("invalid --click selector {selector:?}"))?;
        if targets.is_empty() {
            warn!("--click {:?} matched nothing", selector);
        }
        for target in targets {
            rt.dispatch_event(target, "click");
        }
    }

    for name in &cli.invoke {
        if rt.invoke(name, &[]).is_none() {
            bail!("no action tree named {name:?} is registered");
        }
    }

    rt.advance(cli.advance_ms);
    rt.advance_frames(cli.frames);

    info!(
        "Finished at {} ms with {} pending timer(s)",
        rt.now_ms(),
        rt.scheduler().pending_timer_count()
    );
    println!("{}", rt.document().to_html());
    Ok(())
}
