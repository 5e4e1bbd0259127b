//! Conversion results.

use crate::annotation::Annotation;
use crate::metadata::EntryMetadata;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of a run that the user may cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    /// The first-page prompt was dismissed; nothing was produced.
    Cancelled,
}

impl<T> Outcome<T> {
    /// The value, or `None` when cancelled.
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Everything one conversion produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The complete note: frontmatter, title and file callout (when a library
    /// entry was given) followed by the body.
    pub markdown: String,
    /// The rendered annotations alone.
    pub body: String,
    /// Library metadata, when an entry was given.
    pub metadata: Option<EntryMetadata>,
    /// The final sequence handed to the renderer.
    pub annotations: Vec<Annotation>,
    /// Frontmatter tag string (`article/a, article/b, `).
    pub tags: String,
    pub stats: ConversionStats,
}

/// A conversion that was written to disk.
#[derive(Debug, Clone)]
pub struct WrittenNote {
    pub path: PathBuf,
    pub output: ConversionOutput,
}

/// Counters collected along the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Records read from the extractor JSON.
    pub input_annotations: usize,
    /// Continuations folded into their predecessor.
    pub merged: usize,
    pub headings: usize,
    pub callouts: usize,
    /// Annotations consumed as tags.
    pub tag_annotations: usize,
    /// Annotations sent to the note surface.
    pub routed: usize,
    /// Annotations that produced output.
    pub rendered: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_done() {
        assert_eq!(Outcome::Done(2).done(), Some(2));
        let cancelled: Outcome<i32> = Outcome::Cancelled;
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.done(), None);
    }

    #[test]
    fn stats_serialize() {
        let stats = ConversionStats {
            rendered: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["rendered"], 3);
        assert_eq!(json["routed"], 0);
    }
}
