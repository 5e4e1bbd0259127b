//! Quote merger: folds `+` continuations into the preceding quote.
//!
//! A quote that runs over a column or page break takes several highlights.
//! Marking every part after the first with a bare `+` comment joins them
//! back into one annotation. Parts on different pages are joined with an
//! elision and the page label becomes a range.

use crate::annotation::{Annotation, AnnotationKind};
use crate::directive::Directive;
use tracing::debug;

/// Joins parts on the same page.
const SAME_PAGE: &str = " ";
/// Joins parts across a page break.
const ACROSS_PAGES: &str = " (…) ";

fn is_continuation(annotation: &Annotation) -> bool {
    annotation.kind != AnnotationKind::FreeComment
        && Directive::of(annotation.comment_str()) == Directive::Continuation
}

/// Merge every run of `+` annotations into the annotation before it.
pub fn merge_continuations(annotations: Vec<Annotation>) -> Vec<Annotation> {
    let mut merged: Vec<Annotation> = Vec::with_capacity(annotations.len());

    for annotation in annotations {
        if merged.is_empty() || !is_continuation(&annotation) {
            merged.push(annotation);
            continue;
        }
        let Some(pred) = merged.last_mut() else {
            continue;
        };

        let connector = if pred.page == annotation.page {
            SAME_PAGE
        } else {
            pred.page_label = format!("{}–{}", pred.page, annotation.page);
            ACROSS_PAGES
        };

        let mut quote = pred.quote.take().unwrap_or_default();
        quote.push_str(connector);
        quote.push_str(annotation.quote.as_deref().unwrap_or_default());
        pred.quote = Some(quote);
        debug!("Merged continuation into annotation on p. {}", pred.page_label);
    }

    merged
}
