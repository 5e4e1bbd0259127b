//! Conversion entry points.
//!
//! ## Why is metadata read first?
//!
//! Reading the library entry is the only step that can ask the user for
//! input. Doing it before touching the annotations means a cancelled prompt
//! leaves nothing half-done: no surface submission, no file.

use crate::annotation::{Annotation, AnnotationKind};
use crate::config::{Engine, NoteConfig};
use crate::error::AnnotsError;
use crate::metadata::{extract_metadata, FirstPageSource};
use crate::note;
use crate::output::{ConversionOutput, ConversionStats, Outcome, WrittenNote};
use crate::pipeline::{
    adapter, callout, heading, images, merge, normalize, pages, render, tags, underline,
};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert one annotation export into a Markdown note.
///
/// # Arguments
/// * `filename`: base name of the note and the PDF; doubles as the citation
///   key when a library entry is given
/// * `raw_annotations`: JSON array from the extractor selected by
///   `config.engine`
/// * `raw_entry`: BibTeX library entry, or an empty string for none
///
/// # Returns
/// `Ok(Outcome::Cancelled)` when the user dismissed the first-page prompt.
///
/// # Errors
/// Returns `Err(AnnotsError)` for malformed annotation JSON, an unknown
/// annotation type, or an unusable library entry.
pub fn convert(
    filename: &str,
    raw_annotations: &str,
    raw_entry: &str,
    config: &NoteConfig,
) -> Result<Outcome<ConversionOutput>, AnnotsError> {
    let start = Instant::now();
    info!("Converting annotations for '{}'", filename);

    // ── Step 1: Library metadata ─────────────────────────────────────────
    let mut metadata = if raw_entry.trim().is_empty() {
        debug!("No library entry; writing body only");
        None
    } else {
        match extract_metadata(filename, raw_entry, first_page_source(config))? {
            Some(meta) => Some(meta),
            None => return Ok(Outcome::Cancelled),
        }
    };
    let citekey = metadata.as_ref().map(|m| m.citekey.clone());
    let first_page = metadata.as_ref().map_or(1, |m| m.first_page);

    // ── Step 2: Parse and clean ──────────────────────────────────────────
    let annotations = adapter::adapt(raw_annotations, config.engine)?;
    let mut stats = ConversionStats {
        input_annotations: annotations.len(),
        ..Default::default()
    };
    let annotations = normalize::normalize_quotes(annotations);
    let annotations = pages::apply_page_offset(annotations, first_page);

    // ── Step 3: Comment directives ───────────────────────────────────────
    let before = annotations.len();
    let annotations = merge::merge_continuations(annotations);
    stats.merged = before - annotations.len();

    let annotations = heading::transform_headings(annotations);
    stats.headings = count(&annotations, |k| k == AnnotationKind::Heading);

    let annotations = callout::classify_questions(annotations);
    let annotations = callout::classify_key_callouts(annotations);
    stats.callouts = count(&annotations, AnnotationKind::is_callout);

    let keywords = metadata.as_ref().and_then(|m| m.keywords.as_deref());
    let before = annotations.len();
    let extraction = tags::extract_tags(annotations, keywords, &config.tag_prefix);
    stats.tag_annotations = before - extraction.annotations.len();
    let tags = extraction.tags;
    if let Some(ref mut meta) = metadata {
        meta.tags = tags.clone();
    }

    let mut annotations = extraction.annotations;
    if config.engine == Engine::Pdfannots2Json {
        annotations = images::name_images(annotations, filename);
    }

    // ── Step 4: Note surface ─────────────────────────────────────────────
    let surface = config.resolve_surface();
    let routed = underline::route_underlines(
        annotations,
        surface.as_deref(),
        filename,
        citekey.as_deref(),
    );
    stats.routed = routed.routed;
    let annotations = routed.annotations;

    // ── Step 5: Render ───────────────────────────────────────────────────
    let pre_entry = surface
        .as_ref()
        .map(|s| s.pre_entry(citekey.as_deref().unwrap_or_default()));
    let body = render::render_markdown(&annotations, citekey.as_deref(), pre_entry.as_deref());
    stats.rendered = annotations.iter().filter(|a| render::is_rendered(a)).count();

    let today = chrono::Local::now().date_naive();
    let markdown = note::assemble_note(&body, metadata.as_ref(), config, today);
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Conversion complete: {} annotations in, {} rendered, {} routed, {}ms",
        stats.input_annotations, stats.rendered, stats.routed, stats.duration_ms
    );

    Ok(Outcome::Done(ConversionOutput {
        markdown,
        body,
        metadata,
        annotations,
        tags,
        stats,
    }))
}

/// Convert and write the note to `<output_dir>/<filename>.md`.
///
/// Uses atomic write (temp file + rename) to prevent partial files. Nothing
/// is written when the run is cancelled.
pub fn convert_to_file(
    filename: &str,
    raw_annotations: &str,
    raw_entry: &str,
    output_dir: impl AsRef<Path>,
    config: &NoteConfig,
) -> Result<Outcome<WrittenNote>, AnnotsError> {
    let output = match convert(filename, raw_annotations, raw_entry, config)? {
        Outcome::Done(output) => output,
        Outcome::Cancelled => return Ok(Outcome::Cancelled),
    };

    let path = note::note_path(output_dir.as_ref(), filename);
    note::write_note(&path, &output.markdown)?;
    Ok(Outcome::Done(WrittenNote { path, output }))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Where a missing first page comes from: a fixed value, the prompt, or nowhere.
fn first_page_source(config: &NoteConfig) -> FirstPageSource<'_> {
    match (config.first_page, config.page_prompt.as_deref()) {
        (Some(page), _) => FirstPageSource::Fixed(page),
        (None, Some(prompt)) => FirstPageSource::Prompt(prompt),
        (None, None) => FirstPageSource::Unavailable,
    }
}

fn count(annotations: &[Annotation], pred: impl Fn(AnnotationKind) -> bool) -> usize {
    annotations.iter().filter(|a| pred(a.kind)).count()
}
