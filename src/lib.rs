//! # pdf-annots2md
//!
//! Turn PDF annotation exports into Markdown literature notes.
//!
//! ## Why this crate?
//!
//! PDF readers let you highlight, underline and comment, but the result stays
//! locked inside the PDF. Extractors such as `pdfannots` and `pdfannots2json`
//! get the annotations out as JSON. This crate turns that JSON into a note for
//! a personal knowledge base, steered by short markers typed into the
//! annotation comments: `+` continues a quote, `#` makes a heading, `?` and
//! `!` make callouts, `=` adds tags and `_` files a task.
//!
//! ## Pipeline Overview
//!
//! ```text
//! annotation JSON + BibTeX entry
//!  │
//!  ├─ 1. Metadata   title, authors, first page (may prompt)
//!  ├─ 2. Adapter    pdfannots / pdfannots2json → Annotation
//!  ├─ 3. Clean      quote typography, page offset
//!  ├─ 4. Directives + merge, # headings, ?/! callouts, = tags, image refs
//!  ├─ 5. Surface    underlines and _ tasks to SideNotes / Tot / Reminders
//!  └─ 6. Output     Markdown body, frontmatter, atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_annots2md::{convert, NoteConfig, Outcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NoteConfig::builder().no_surface().first_page(1).build()?;
//!     let raw = std::fs::read_to_string("doe2020.json")?;
//!     let entry = std::fs::read_to_string("doe2020.bib")?;
//!     if let Outcome::Done(output) = convert("doe2020", &raw, &entry, &config)? {
//!         println!("{}", output.markdown);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `annots2md` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-annots2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod annotation;
pub mod config;
pub mod convert;
pub mod directive;
pub mod error;
pub mod metadata;
pub mod note;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod surface;
pub mod templates;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use annotation::{Annotation, AnnotationKind};
pub use config::{Engine, NoteConfig, NoteConfigBuilder};
pub use convert::{convert, convert_to_file};
pub use directive::Directive;
pub use error::{AnnotsError, SurfaceError};
pub use metadata::EntryMetadata;
pub use output::{ConversionOutput, ConversionStats, Outcome, WrittenNote};
pub use prompt::{LinePrompt, PageNumberPrompt, PromptReply};
pub use surface::{ExportSurface, SurfaceKind};
