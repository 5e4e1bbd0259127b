//! Note assembly, writing and opening.
//!
//! With a library entry the note gets a YAML frontmatter block, a title and a
//! callout linking the PDF; without one the note is the rendered body alone.
//! Notes are written atomically and then opened in Obsidian when they land in
//! a known vault, or revealed in the file browser otherwise.

use crate::config::NoteConfig;
use crate::error::AnnotsError;
use crate::metadata::{format_authors, EntryMetadata};
use crate::templates;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

// ── Frontmatter ──────────────────────────────────────────────────────────────

/// The frontmatter block, without its `---` fences.
///
/// `created` is written as `cdate`.
pub fn frontmatter(meta: &EntryMetadata, config: &NoteConfig, created: NaiveDate) -> String {
    let mut tags: Vec<&str> = config.base_tags.iter().map(String::as_str).collect();
    let extracted = meta.tags.trim_end().trim_end_matches(',');
    if !extracted.is_empty() {
        tags.push(extracted);
    }

    let mut keys = vec![
        format!("aliases: \"{}\"", meta.title),
        format!("tags: [{}]", tags.join(", ")),
        format!("cssclasses: {}", config.css_class),
        format!("citekey: {}", meta.citekey),
        format!("title: \"{}\"", meta.title),
    ];
    if let Some(year) = meta.year {
        keys.push(format!("year: {year}"));
    }
    keys.push(format!("author: {}", format_authors(&meta.author)));
    keys.push(format!("publicationType: {}", meta.publication_type));
    keys.push(format!("folder: {}", config.folder));
    keys.push(format!("fileClass: {}", config.file_class));
    if let Some(ref url) = meta.url {
        keys.push(format!("url: {url}"));
    }
    if let Some(ref doi) = meta.doi {
        keys.push(format!("doi: {doi}"));
    }
    keys.push(format!("cdate: {}", created.format("%Y-%m-%d")));
    keys.join("\n")
}

/// `file://` URL of the citation library, each path segment percent-encoded.
pub fn library_url(dir: &Path) -> String {
    let path = dir.to_string_lossy();
    let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
    format!("file://{}", encoded.join("/"))
}

/// The complete note text.
pub fn assemble_note(
    body: &str,
    meta: Option<&EntryMetadata>,
    config: &NoteConfig,
    created: NaiveDate,
) -> String {
    let Some(meta) = meta else {
        return body.to_string();
    };
    let file = templates::file_callout(&meta.citekey, &library_url(&config.library_dir));
    format!(
        "---\n{}\n---\n\n# {}\n\n{file}\n\n{body}\n",
        frontmatter(meta, config, created),
        meta.title
    )
}

// ── Writing ──────────────────────────────────────────────────────────────────

/// `<output_dir>/<filename>.md`
pub fn note_path(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(format!("{filename}.md"))
}

/// Atomically replace `path` with `content`.
///
/// The text goes to a temporary file in the same directory which is then
/// renamed over `path`, so readers never see a partial note.
pub fn write_note(path: &Path, content: &str) -> Result<(), AnnotsError> {
    let failed = |source: io::Error| AnnotsError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(failed)?;
    tmp.write_all(content.as_bytes()).map_err(failed)?;
    tmp.persist(path).map_err(|e| failed(e.error))?;

    info!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

// ── Opening ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ObsidianConfig {
    #[serde(default)]
    vaults: HashMap<String, Vault>,
}

#[derive(Debug, Deserialize)]
struct Vault {
    path: PathBuf,
}

/// Vault roots listed in an `obsidian.json` document.
pub fn parse_vaults(json: &str) -> Result<Vec<PathBuf>, serde_json::Error> {
    let config: ObsidianConfig = serde_json::from_str(json)?;
    Ok(config.vaults.into_values().map(|v| v.path).collect())
}

/// Vault roots known to the local Obsidian install; empty when there is none.
pub fn obsidian_vaults() -> Vec<PathBuf> {
    let Some(config) = dirs::config_dir().map(|d| d.join("obsidian").join("obsidian.json")) else {
        return Vec::new();
    };
    let vaults = std::fs::read_to_string(&config)
        .ok()
        .and_then(|json| parse_vaults(&json).ok())
        .unwrap_or_default();
    debug!("{} Obsidian vaults in {}", vaults.len(), config.display());
    vaults
}

/// What to do with a freshly written note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAction {
    /// Open this `obsidian://` URL.
    Obsidian(String),
    /// Show the file in the file browser.
    Reveal(PathBuf),
}

/// Pick how to open `path` given the known vault roots.
pub fn open_action(path: &Path, vaults: &[PathBuf]) -> OpenAction {
    if vaults.iter().any(|vault| path.starts_with(vault)) {
        let encoded = urlencoding::encode(&path.to_string_lossy()).into_owned();
        OpenAction::Obsidian(format!("obsidian://open?path={encoded}"))
    } else {
        OpenAction::Reveal(path.to_path_buf())
    }
}

/// Open `path` in Obsidian when it is inside a vault, else reveal it.
pub fn open_or_reveal(path: &Path) -> io::Result<()> {
    let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let action = open_action(&path, &obsidian_vaults());
    debug!("Opening note: {action:?}");

    let mut command = if cfg!(target_os = "macos") {
        let mut open = Command::new("open");
        match &action {
            OpenAction::Obsidian(url) => open.arg(url),
            OpenAction::Reveal(file) => open.arg("-R").arg(file),
        };
        open
    } else {
        let mut open = Command::new("xdg-open");
        match &action {
            OpenAction::Obsidian(url) => open.arg(url),
            OpenAction::Reveal(file) => open.arg(file.parent().unwrap_or(file)),
        };
        open
    };

    let status = command.status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("opener exited with {status}")))
    }
}
