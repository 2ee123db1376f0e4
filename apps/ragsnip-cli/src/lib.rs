//! Command-line surface of `ragsnip`: argument types and the command runner.
//!
//! `execute` takes resolved [`Settings`] and an output writer so the binary
//! stays a thin shell around config loading and tracing setup.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use ragsnip_core::config::{expand_path, Settings};
use ragsnip_core::loader::load_all_files;
use ragsnip_core::types::SourceMap;
use ragsnip_core::{Corpus, Snippet};
use ragsnip_retrieval::RetrievalEngine;

#[derive(Debug, Parser)]
#[command(name = "ragsnip", version, about = "Semantic snippet search over text and code")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find snippets related to a query
    Search(SearchArgs),
    /// List the files the loader would collect
    Files(LoadArgs),
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Directory to load (defaults to the current directory)
    #[arg(long)]
    pub dir: Option<String>,
    /// Directory levels to descend; 1 = only files directly in the directory
    #[arg(long)]
    pub depth: Option<usize>,
    /// Allowed extensions, e.g. `--ext .rs --ext md`
    #[arg(long = "ext")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,
    #[command(flatten)]
    pub load: LoadArgs,
    /// Search a single document split into sentences
    #[arg(long, conflicts_with_all = ["text", "dir"])]
    pub file: Option<PathBuf>,
    /// Search a literal text split into sentences
    #[arg(long, conflicts_with = "dir")]
    pub text: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: Option<f32>,
    /// Segments kept on each side of a match
    #[arg(long)]
    pub window: Option<usize>,
    /// Print snippets as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run one parsed command against `settings`, writing results to `out`.
pub fn execute(cli: Cli, mut settings: Settings, out: &mut dyn Write) -> anyhow::Result<()> {
    match cli.command {
        Command::Files(args) => {
            let sources = load_dir(&settings, &args);
            for (path, content) in &sources {
                writeln!(out, "{}\t{} lines", path, content.lines().count())?;
            }
            info!(files = sources.len(), "done");
        }
        Command::Search(args) => {
            if let Some(t) = args.threshold { settings.retrieval.threshold = t; }
            if let Some(w) = args.window { settings.retrieval.window = w; }
            settings.validate()?;
            let corpus = if let Some(text) = &args.text {
                Corpus::from(text.as_str())
            } else if let Some(file) = &args.file {
                Corpus::SingleText(std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?)
            } else {
                Corpus::MultiSource(load_dir(&settings, &args.load))
            };
            let engine = RetrievalEngine::from_settings(&settings)?;
            let snippets = engine.search(&args.query, &corpus, None)?;
            info!(snippets = snippets.len(), threshold = settings.retrieval.threshold, "search complete");
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&snippets)?)?;
            } else {
                print_snippets(&snippets, out)?;
            }
        }
    }
    Ok(())
}

fn load_dir(settings: &Settings, args: &LoadArgs) -> SourceMap {
    let root = expand_path(args.dir.as_deref().unwrap_or("."));
    let depth = args.depth.unwrap_or(settings.loader.depth);
    let extensions = if args.extensions.is_empty() { &settings.loader.extensions } else { &args.extensions };
    let extensions: Vec<&str> = extensions.iter().map(String::as_str).collect();
    info!(root = %root.display(), depth, "loading corpus");
    load_all_files(&root, Some(extensions.as_slice()), depth)
}

fn print_snippets(snippets: &[Snippet], out: &mut dyn Write) -> std::io::Result<()> {
    if snippets.is_empty() {
        return writeln!(out, "No matching snippets.");
    }
    for s in snippets {
        writeln!(out, "== {} (segment {}, score {:.3}) ==", s.source.as_deref().unwrap_or("text"), s.index, s.score)?;
        writeln!(out, "{}\n", s.text)?;
    }
    Ok(())
}
