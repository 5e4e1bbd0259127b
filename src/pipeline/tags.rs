//! Tag extractor: `=` comments become frontmatter tags.
//!
//! A comment such as `=method, case study` contributes the tags `method` and
//! `case-study`. On a highlight or underline the quote text is added to the
//! last tag before splitting, so `=` alone turns the quote into a tag.
//! Library keywords seed the list. Tag annotations are removed from the
//! sequence; they carry no reading content.

use crate::annotation::{Annotation, AnnotationKind};
use crate::directive::Directive;
use tracing::debug;

/// Result of tag extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagExtraction {
    /// The sequence without tag annotations.
    pub annotations: Vec<Annotation>,
    /// `prefix/tag, prefix/tag, ` or empty when there are no tags.
    pub tags: String,
}

/// Harvest tags from `keywords` and `=` comments.
///
/// `keywords` is the comma-separated keyword field of the library entry.
pub fn extract_tags(
    mut annotations: Vec<Annotation>,
    keywords: Option<&str>,
    prefix: &str,
) -> TagExtraction {
    let mut raw: Vec<String> = keywords
        .filter(|k| !k.is_empty())
        .map(|k| k.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    for annotation in &mut annotations {
        if !matches!(
            annotation.kind,
            AnnotationKind::Highlight | AnnotationKind::Underline | AnnotationKind::FreeComment
        ) {
            continue;
        }
        let Directive::Tags(payload) = Directive::of(annotation.comment_str()) else {
            continue;
        };

        let mut payload = payload.to_string();
        if annotation.kind.has_quote() {
            payload.push(' ');
            payload.push_str(annotation.quote.as_deref().unwrap_or_default());
        }
        raw.extend(payload.split(',').map(str::to_string));
        annotation.kind = AnnotationKind::Removed;
    }

    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.trim().replace(' ', "-");
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    debug!("Extracted {} tags", tags.len());

    let tags = if tags.is_empty() {
        String::new()
    } else {
        let joined: Vec<String> = tags.iter().map(|t| format!("{prefix}{t}")).collect();
        format!("{}, ", joined.join(", "))
    };

    annotations.retain(|a| a.kind != AnnotationKind::Removed);
    TagExtraction { annotations, tags }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_comment_tags() {
        let input = vec![
            Annotation::new(AnnotationKind::FreeComment, 1).with_comment("=baz"),
            Annotation::new(AnnotationKind::FreeComment, 1).with_comment("kept"),
        ];
        let out = extract_tags(input, Some("foo,bar"), "article/");
        assert_eq!(out.tags, "article/foo, article/bar, article/baz, ");
        assert_eq!(out.annotations.len(), 1);
        assert_eq!(out.annotations[0].comment.as_deref(), Some("kept"));
    }

    #[test]
    fn duplicates_are_dropped() {
        let input = vec![
            Annotation::new(AnnotationKind::FreeComment, 1).with_comment("=foo, new tag"),
            Annotation::new(AnnotationKind::FreeComment, 2).with_comment("=new tag"),
        ];
        let out = extract_tags(input, Some("foo"), "article/");
        assert_eq!(out.tags, "article/foo, article/new-tag, ");
    }

    #[test]
    fn quote_joins_the_payload() {
        let input = vec![Annotation::new(AnnotationKind::Highlight, 1)
            .with_quote("Machine Learning")
            .with_comment("=")];
        let out = extract_tags(input, None, "article/");
        assert_eq!(out.tags, "article/Machine-Learning, ");
        assert!(out.annotations.is_empty());
    }

    #[test]
    fn double_equals_is_not_a_tag() {
        let input = vec![Annotation::new(AnnotationKind::FreeComment, 1).with_comment("==x==")];
        let out = extract_tags(input.clone(), None, "article/");
        assert_eq!(out.tags, "");
        assert_eq!(out.annotations, input);
    }

    #[test]
    fn other_kinds_are_ignored() {
        let input = vec![Annotation::new(AnnotationKind::Image, 1).with_comment("=x")];
        let out = extract_tags(input.clone(), None, "article/");
        assert_eq!(out.annotations, input);
    }

    #[test]
    fn empty_tags_are_dropped() {
        let input = vec![
            Annotation::new(AnnotationKind::FreeComment, 1).with_comment("="),
            Annotation::new(AnnotationKind::FreeComment, 2).with_comment("=a, ,b"),
        ];
        let out = extract_tags(input, Some("foo,"), "article/");
        assert_eq!(out.tags, "article/foo, article/a, article/b, ");
        assert!(out.annotations.is_empty());
    }

    #[test]
    fn only_empty_tags_give_empty_string() {
        let input = vec![Annotation::new(AnnotationKind::FreeComment, 1).with_comment("= ,")];
        let out = extract_tags(input, Some(","), "article/");
        assert_eq!(out.tags, "");
    }
}
