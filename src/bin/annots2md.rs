//! CLI binary for pdf-annots2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `NoteConfig`, reads the inputs and reports where the note went.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_annots2md::note::open_or_reveal;
use pdf_annots2md::{
    convert, convert_to_file, Engine, LinePrompt, NoteConfig, Outcome, SurfaceKind,
};
use std::io::{self, BufReader, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"COMMENT MARKERS:
  +            continue the previous quote
  # / ## / ... turn the highlight into a heading
  ? text       question callout
  !key text    key-points callout
  !cite text   related-articles callout
  !type text   callout of any type, optional "Title"
  =a, b        add tags to the frontmatter
  _ text       task for the note surface

EXAMPLES:
  pdfannots2json doe2020.pdf | annots2md doe2020 --entry doe2020.bib
  annots2md doe2020 -a annots.json --engine pdfannots --surface none --stdout
"#;

/// Convert PDF annotation exports to Markdown literature notes.
#[derive(Parser, Debug)]
#[command(
    name = "annots2md",
    version,
    about = "Convert PDF annotation exports to Markdown literature notes",
    long_about = "Convert the JSON written by pdfannots or pdfannots2json into a Markdown \
note with frontmatter from a BibTeX entry. Comment markers turn annotations into headings, \
callouts, tags and tasks.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Base name of the note; also the citation key when --entry is given.
    filename: String,

    /// Annotation JSON file, or `-` for stdin.
    #[arg(short, long, env = "ANNOTS2MD_ANNOTATIONS", default_value = "-")]
    annotations: String,

    /// BibTeX file holding the library entry.
    #[arg(short, long, env = "ANNOTS2MD_ENTRY")]
    entry: Option<PathBuf>,

    /// Directory the note is written to.
    #[arg(short, long, env = "ANNOTS2MD_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Extractor that produced the annotation JSON.
    #[arg(long, env = "ANNOTS2MD_ENGINE", value_enum, default_value = "pdfannots2json")]
    engine: EngineArg,

    /// Where underlines and `_` comments go.
    #[arg(long, env = "ANNOTS2MD_SURFACE", value_enum, default_value = "sidenotes")]
    surface: SurfaceArg,

    /// SideNotes folder for routed underlines.
    #[arg(long, env = "ANNOTS2MD_SIDENOTES_FOLDER", default_value = "Annotations")]
    sidenotes_folder: String,

    /// Directory holding `<citekey>.pdf`, linked from the note.
    #[arg(long, env = "ANNOTS2MD_LIBRARY_DIR")]
    library_dir: Option<PathBuf>,

    /// True page number of the first PDF page when the entry has no pages.
    #[arg(long, env = "ANNOTS2MD_FIRST_PAGE", allow_negative_numbers = true)]
    first_page: Option<i64>,

    /// Do not open or reveal the written note.
    #[arg(long, env = "ANNOTS2MD_NO_OPEN")]
    no_open: bool,

    /// Print the note to stdout instead of writing it.
    #[arg(long)]
    stdout: bool,

    /// Print structured JSON (ConversionOutput) instead of writing the note.
    #[arg(long, env = "ANNOTS2MD_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ANNOTS2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "ANNOTS2MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum EngineArg {
    Pdfannots,
    Pdfannots2json,
}

impl From<EngineArg> for Engine {
    fn from(v: EngineArg) -> Self {
        match v {
            EngineArg::Pdfannots => Engine::Pdfannots,
            EngineArg::Pdfannots2json => Engine::Pdfannots2Json,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum SurfaceArg {
    Sidenotes,
    Tot,
    Reminders,
    None,
}

impl From<SurfaceArg> for Option<SurfaceKind> {
    fn from(v: SurfaceArg) -> Self {
        match v {
            SurfaceArg::Sidenotes => Some(SurfaceKind::SideNotes),
            SurfaceArg::Tot => Some(SurfaceKind::Tot),
            SurfaceArg::Reminders => Some(SurfaceKind::Reminders),
            SurfaceArg::None => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inputs ───────────────────────────────────────────────────────────
    let from_stdin = cli.annotations == "-";
    let raw_annotations = if from_stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read annotations from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&cli.annotations)
            .with_context(|| format!("Failed to read annotations from '{}'", cli.annotations))?
    };

    let raw_entry = match cli.entry {
        Some(ref path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read library entry '{}'", path.display()))?,
        None => String::new(),
    };

    // ── Config ───────────────────────────────────────────────────────────
    let mut builder = NoteConfig::builder()
        .engine(cli.engine.clone().into())
        .sidenotes_folder(cli.sidenotes_folder.clone());
    builder = match Option::<SurfaceKind>::from(cli.surface.clone()) {
        Some(kind) => builder.surface_kind(kind),
        None => builder.no_surface(),
    };
    if let Some(page) = cli.first_page {
        builder = builder.first_page(page);
    }
    if let Some(ref dir) = cli.library_dir {
        builder = builder.library_dir(dir.clone());
    }
    // the prompt needs a terminal on stdin that is not already the JSON pipe
    if !from_stdin && io::stdin().is_terminal() {
        builder = builder.page_prompt(Arc::new(LinePrompt::new(
            BufReader::new(io::stdin()),
            io::stderr(),
        )));
    }
    let config = builder.build()?;

    // ── Convert ──────────────────────────────────────────────────────────
    if cli.stdout || cli.json {
        let Outcome::Done(output) = convert(&cli.filename, &raw_annotations, &raw_entry, &config)?
        else {
            info!("Cancelled; nothing written");
            return Ok(());
        };
        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            print!("{}", output.markdown);
        }
        return Ok(());
    }

    let note = match convert_to_file(
        &cli.filename,
        &raw_annotations,
        &raw_entry,
        &cli.output_dir,
        &config,
    )? {
        Outcome::Done(note) => note,
        Outcome::Cancelled => {
            info!("Cancelled; nothing written");
            return Ok(());
        }
    };

    if !cli.quiet {
        let stats = &note.output.stats;
        eprintln!(
            "{} {}  {}",
            green("✓"),
            note.path.display(),
            dim(&format!(
                "({} annotations, {} in note, {} to surface)",
                stats.input_annotations, stats.rendered, stats.routed
            ))
        );
    }

    // only literature notes are opened
    if note.output.metadata.is_some() && !cli.no_open {
        if let Err(e) = open_or_reveal(&note.path) {
            warn!("Could not open {}: {e}", note.path.display());
        }
    }

    Ok(())
}
