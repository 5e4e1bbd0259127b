//! Error types for the pdf-annots2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AnnotsError`]: **Fatal**, the note cannot be produced at all
//!   (malformed annotation JSON, unknown annotation type, unwritable output).
//!   Returned as `Err(AnnotsError)` from the top-level `convert*` functions.
//!
//! * [`SurfaceError`]: **Non-fatal**, the external note surface (SideNotes,
//!   Tot, Reminders) could not be reached or refused the text. The underline
//!   router logs it and keeps the affected annotations in the main note.
//!
//! User cancellation of the first-page prompt is not an error at all; it is
//! reported as [`crate::output::Outcome::Cancelled`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-annots2md library.
#[derive(Debug, Error)]
pub enum AnnotsError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The annotation export is not a JSON array of records of the expected shape.
    #[error("Annotation input is not valid {engine} JSON: {source}")]
    InvalidJson {
        engine: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A record carried a `type` tag with no known annotation kind.
    #[error("Annotation #{index} has unknown type '{kind}'\nExpected one of: text, strike, highlight, underline, image.")]
    UnknownKind { index: usize, kind: String },

    /// The library entry string is non-empty but holds no `@type{key,` header.
    #[error("Library entry is not a BibTeX entry: {reason}")]
    InvalidEntry { reason: String },

    /// The entry has no page numbers and there is no way to ask for them.
    #[error("Entry '{citekey}' has no page numbers.\nProvide the first page with --first-page <N>.")]
    MissingFirstPage { citekey: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write note '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error from an external note surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The application is not installed or the platform has no way to reach it.
    #[error("{surface} is not available on this system")]
    Unavailable { surface: &'static str },

    /// The helper process (`osascript`, `open`) could not be started.
    #[error("Could not launch helper for {surface}: {detail}")]
    LaunchFailed {
        surface: &'static str,
        detail: String,
    },

    /// The helper ran but reported failure.
    #[error("{surface} rejected the note: {detail}")]
    Rejected {
        surface: &'static str,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_display() {
        let e = AnnotsError::UnknownKind {
            index: 4,
            kind: "squiggly".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("#4"), "got: {msg}");
        assert!(msg.contains("squiggly"));
    }

    #[test]
    fn missing_first_page_mentions_flag() {
        let e = AnnotsError::MissingFirstPage {
            citekey: "doe2020".into(),
        };
        assert!(e.to_string().contains("doe2020"));
        assert!(e.to_string().contains("--first-page"));
    }

    #[test]
    fn invalid_json_keeps_source() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let e = AnnotsError::InvalidJson {
            engine: "pdfannots",
            source,
        };
        assert!(e.to_string().contains("pdfannots"));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn surface_error_display() {
        let e = SurfaceError::Rejected {
            surface: "Tot",
            detail: "exit status 1".into(),
        };
        assert!(e.to_string().contains("Tot"));
        assert!(e.to_string().contains("exit status 1"));
    }
}
