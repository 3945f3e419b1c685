//! pdflink binary
//!
//! Adds a URI link annotation to one page of a PDF, or lists a page's
//! annotations.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use pdflink_core::{LinkRequest, PdfRect};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pdflink")]
#[command(version, about = "Add clickable URI links to PDF pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a link annotation and write the result to a new file
    Add(AddArgs),
    /// Print the annotations of one page
    List {
        input: PathBuf,

        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Print JSON instead of one line per annotation
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    input: PathBuf,
    output: PathBuf,

    /// JSON file holding a full link request; replaces the flags below
    #[arg(long, conflicts_with_all = ["page", "x", "y", "width", "height", "uri"])]
    request: Option<PathBuf>,

    /// Zero-based page index
    #[arg(short, long, default_value = "0")]
    page: usize,

    /// Left edge of the clickable area
    #[arg(long, allow_negative_numbers = true)]
    x: Option<f64>,

    /// Bottom edge of the clickable area
    #[arg(long, allow_negative_numbers = true)]
    y: Option<f64>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    /// Link target
    #[arg(long)]
    uri: Option<String>,
}

impl AddArgs {
    fn to_request(&self) -> Result<LinkRequest> {
        if let Some(path) = &self.request {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading request file {}", path.display()))?;
            return LinkRequest::from_json(&json)
                .with_context(|| format!("parsing request file {}", path.display()));
        }

        let (Some(x), Some(y), Some(width), Some(height), Some(uri)) =
            (self.x, self.y, self.width, self.height, self.uri.clone())
        else {
            bail!("--x, --y, --width, --height and --uri are required without --request");
        };
        Ok(LinkRequest::new(
            self.page,
            PdfRect::new(x, y, width, height),
            uri,
        ))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries `list` output; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli, &mut std::io::stdout().lock())
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Command::Add(args) => {
            let request = args.to_request()?;
            tracing::debug!(?request, "Resolved link request");
            pdflink_core::add_link(&args.input, &args.output, &request).with_context(|| {
                format!(
                    "adding link to {} -> {}",
                    args.input.display(),
                    args.output.display()
                )
            })?;
        }
        Command::List { input, page, json } => {
            let bytes = pdflink_core::read_pdf(&input)?;
            let doc = pdflink_core::load_document(&bytes)
                .with_context(|| format!("loading {}", input.display()))?;
            let annotations = pdflink_core::page_annotations(&doc, page)?;

            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&annotations)?)?;
            } else {
                for (i, annot) in annotations.iter().enumerate() {
                    writeln!(
                        out,
                        "{}: {} {:?}{}",
                        i,
                        annot.subtype.as_deref().unwrap_or("?"),
                        annot.rect,
                        annot
                            .uri
                            .as_deref()
                            .map(|u| format!(" -> {}", u))
                            .unwrap_or_default()
                    )?;
                }
            }
        }
    }

    Ok(())
}
