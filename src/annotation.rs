//! The unified annotation record threaded through every pipeline stage.
//!
//! Both upstream extractors are normalised into [`Annotation`] by
//! [`crate::pipeline::adapter`]. From then on a record's identity is simply its
//! position in the sequence: stages reorder, merge, reclassify and drop
//! records, but never invent new ones.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an annotation is, or what the pipeline has decided it should become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Highlighted source text, rendered as a block quote.
    Highlight,
    /// Underlined source text, routed to the note surface when one is reachable.
    Underline,
    /// A comment with a leading `_`, treated like an underline without a quote.
    Underscore,
    /// A free-standing text note.
    FreeComment,
    /// A rectangle/image selection.
    Image,
    /// Struck-out text. Kept through the pipeline, never rendered.
    Strikethrough,
    /// A document heading produced from a `#` directive.
    Heading,
    /// A `?` comment.
    QuestionCallout,
    /// A `!key` comment.
    KeyCallout,
    /// A `!cite` comment.
    CiteCallout,
    /// Any other `!` comment.
    OtherCallout,
    /// Consumed by the tag extractor; dropped before rendering.
    Removed,
}

impl AnnotationKind {
    /// Whether the kind is one of the four callouts.
    pub fn is_callout(self) -> bool {
        matches!(
            self,
            Self::QuestionCallout | Self::KeyCallout | Self::CiteCallout | Self::OtherCallout
        )
    }

    /// Whether the kind carries a quote from the source text.
    pub fn has_quote(self) -> bool {
        matches!(self, Self::Highlight | Self::Underline)
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Highlight => "Highlight",
            Self::Underline => "Underline",
            Self::Underscore => "Underscore",
            Self::FreeComment => "Free Comment",
            Self::Image => "Image",
            Self::Strikethrough => "Strikethrough",
            Self::Heading => "Heading",
            Self::QuestionCallout => "Question Callout",
            Self::KeyCallout => "Key Callout",
            Self::CiteCallout => "Cite Callout",
            Self::OtherCallout => "Other Callout",
            Self::Removed => "Removed",
        };
        f.write_str(name)
    }
}

/// One annotation, in the shape every stage consumes and produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// Absolute page number once the page offset has been applied.
    pub page: i64,
    /// Printable page, widened to a range (`12–14`) by the quote merger.
    pub page_label: String,
    /// User-written comment, possibly starting with a directive.
    pub comment: Option<String>,
    /// Marked source text (Highlight and Underline only).
    pub quote: Option<String>,
    /// Embedded image file name, with an optional `|alias`.
    pub image_ref: Option<String>,
}

impl Annotation {
    /// Create an annotation on `page` with no comment, quote or image.
    pub fn new(kind: AnnotationKind, page: i64) -> Self {
        Self {
            kind,
            page,
            page_label: page.to_string(),
            comment: None,
            quote: None,
            image_ref: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = Some(quote.into());
        self
    }

    /// The comment, treating an empty string like an absent one.
    pub fn comment_str(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }

    /// The quote, treating an empty string like an absent one.
    pub fn quote_str(&self) -> Option<&str> {
        self.quote.as_deref().filter(|q| !q.is_empty())
    }
}
