use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use xmlpick::label::truncate;
use xmlpick::{EncodeOptions, EntryKind, OutlineEntry, OutlineOptions, Session};

#[derive(Debug, Parser)]
#[command(
    name = "xmlpick",
    version,
    about = "Browse an XML document by path and export the parts you pick"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the document outline with the path of every node
    Show {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Number of levels to list (0 means unlimited)
        #[arg(short, long, default_value_t = 0)]
        depth: usize,
    },
    /// Extract the selected paths into a new document
    Extract {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Path to select, e.g. catalog.book[1].title (repeatable)
        #[arg(short, long = "path", value_name = "PATH", required = true)]
        paths: Vec<String>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Drop the synthetic <root> wrapper when there is one top-level element
        #[arg(long)]
        unwrap_root: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Show { input, depth } => {
            let session = load(&input)?;
            let entries = session.outline(&OutlineOptions::with_max_depth(depth));
            let listing: String = entries.iter().map(render_entry).collect();
            write_output(&None, listing.as_bytes())
        }
        Command::Extract {
            input,
            paths,
            output,
            unwrap_root,
        } => {
            let mut session = load(&input)?;
            for path in &paths {
                session
                    .select(path)
                    .with_context(|| format!("invalid path {path:?}"))?;
            }

            if let Some(report) = session.extract() {
                for path in &report.skipped {
                    warn!(%path, "path did not resolve; skipped");
                }
            }

            let options = EncodeOptions::default().with_unwrap_single_root(unwrap_root);
            let filename = output.as_ref().and_then(|p| p.file_name()).and_then(|n| n.to_str());
            let Some(export) = session.export(filename, &options) else {
                bail!("nothing to export");
            };

            let mut content = export.into_content();
            if output.is_none() {
                content.push('\n');
            } else {
                info!(file = filename.unwrap_or_default(), "writing export");
            }
            write_output(&output, content.as_bytes())
        }
    }
}

fn load(path: &Option<PathBuf>) -> Result<Session> {
    let text = read_input(path)?;
    let mut session = Session::new();
    session.load(&text).context("failed to decode XML")?;
    Ok(session)
}

fn render_entry(entry: &OutlineEntry) -> String {
    let pad = "  ".repeat(entry.depth);
    let detail = match &entry.kind {
        EntryKind::Mapping { len } => format!(" {{{len}}}"),
        EntryKind::Sequence { len } => format!(" [{len}]"),
        EntryKind::Scalar { value } if value.trim().is_empty() => String::new(),
        EntryKind::Scalar { value } => format!(" = {}", truncate(value.trim())),
    };
    let path = entry
        .path
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    format!("{pad}{}{detail}\t{path}\n", entry.title)
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
