//! Callout classifiers: `?`, `!key`, `!cite` and `!` free comments.
//!
//! Callouts summarise the whole article rather than one passage, so each
//! classifier moves its matches to the front of the sequence as a stable
//! group. The question stage runs first and the key-point stage second, which
//! leaves the groups ordered key points, related articles, other callouts,
//! questions, then everything else.

use crate::annotation::{Annotation, AnnotationKind};
use crate::directive::Directive;

/// Classify `?` free comments and move them to the front.
pub fn classify_questions(mut annotations: Vec<Annotation>) -> Vec<Annotation> {
    for annotation in &mut annotations {
        if annotation.kind != AnnotationKind::FreeComment {
            continue;
        }
        if let Directive::Question(body) = Directive::of(annotation.comment_str()) {
            let body = body.to_string();
            annotation.comment = Some(body);
            annotation.kind = AnnotationKind::QuestionCallout;
        }
    }
    to_front(annotations, &[AnnotationKind::QuestionCallout])
}

/// Classify `!key`, `!cite` and other `!` free comments and move them to the
/// front, key points first.
pub fn classify_key_callouts(mut annotations: Vec<Annotation>) -> Vec<Annotation> {
    for annotation in &mut annotations {
        if annotation.kind != AnnotationKind::FreeComment {
            continue;
        }
        let (kind, body) = match Directive::of(annotation.comment_str()) {
            Directive::KeyPoints(body) => (AnnotationKind::KeyCallout, body),
            Directive::Related(body) => (AnnotationKind::CiteCallout, body),
            Directive::Callout(body) => (AnnotationKind::OtherCallout, body),
            _ => continue,
        };
        let body = body.to_string();
        annotation.comment = Some(body);
        annotation.kind = kind;
    }
    to_front(
        annotations,
        &[
            AnnotationKind::KeyCallout,
            AnnotationKind::CiteCallout,
            AnnotationKind::OtherCallout,
        ],
    )
}

/// Stable partition: one group per kind in `groups` order, then the rest.
fn to_front(annotations: Vec<Annotation>, groups: &[AnnotationKind]) -> Vec<Annotation> {
    let mut buckets: Vec<Vec<Annotation>> = vec![Vec::new(); groups.len() + 1];
    for annotation in annotations {
        let slot = groups
            .iter()
            .position(|k| *k == annotation.kind)
            .unwrap_or(groups.len());
        buckets[slot].push(annotation);
    }
    buckets.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free(comment: &str) -> Annotation {
        Annotation::new(AnnotationKind::FreeComment, 1).with_comment(comment)
    }

    fn kinds(annotations: &[Annotation]) -> Vec<AnnotationKind> {
        annotations.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn fixed_group_order() {
        let input = vec![
            free("!note other"),
            free("!key points"),
            free("? question"),
            free("!cite smith"),
        ];
        let out = classify_key_callouts(classify_questions(input));
        assert_eq!(
            kinds(&out),
            vec![
                AnnotationKind::KeyCallout,
                AnnotationKind::CiteCallout,
                AnnotationKind::OtherCallout,
                AnnotationKind::QuestionCallout,
            ]
        );
        assert_eq!(out[0].comment.as_deref(), Some("points"));
        assert_eq!(out[1].comment.as_deref(), Some("smith"));
        assert_eq!(out[2].comment.as_deref(), Some("note other"));
        assert_eq!(out[3].comment.as_deref(), Some("question"));
    }

    #[test]
    fn groups_keep_relative_order() {
        let hl = Annotation::new(AnnotationKind::Highlight, 2).with_quote("q");
        let input = vec![hl.clone(), free("? first"), free("plain"), free("? second")];
        let out = classify_questions(input);
        assert_eq!(out[0].comment.as_deref(), Some("first"));
        assert_eq!(out[1].comment.as_deref(), Some("second"));
        assert_eq!(out[2], hl);
        assert_eq!(out[3].comment.as_deref(), Some("plain"));
    }

    #[test]
    fn only_free_comments_are_classified() {
        let input = vec![Annotation::new(AnnotationKind::Highlight, 1)
            .with_quote("q")
            .with_comment("? not a question")];
        let out = classify_key_callouts(classify_questions(input.clone()));
        assert_eq!(out, input);
    }

    #[test]
    fn absent_comment_keeps_kind() {
        let input = vec![Annotation::new(AnnotationKind::FreeComment, 1)];
        let out = classify_key_callouts(classify_questions(input.clone()));
        assert_eq!(out, input);
    }
}
