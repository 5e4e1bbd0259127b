//! Heading transformer: `#` comments become document headings.
//!
//! A highlight commented `##` turns its quote into a level-2 heading. Quotes
//! set in capitals (common for section titles) are title-cased first. Free
//! comments starting with `#` become headings with their own text.

use crate::annotation::{Annotation, AnnotationKind};
use crate::directive::Directive;
use once_cell::sync::Lazy;
use regex::Regex;

/// Turn every annotation with a heading directive into a [`AnnotationKind::Heading`].
pub fn transform_headings(mut annotations: Vec<Annotation>) -> Vec<Annotation> {
    for annotation in &mut annotations {
        let marker = match Directive::of(annotation.comment_str()) {
            Directive::Heading { marker } => marker.to_string(),
            _ => continue,
        };

        if annotation.kind.has_quote() {
            if let Some(quote) = annotation.quote.take().filter(|q| !q.is_empty()) {
                let text = if is_all_caps(&quote) {
                    title_case(&quote)
                } else {
                    quote
                };
                annotation.comment = Some(format!("{marker} {text}"));
            }
        }
        annotation.kind = AnnotationKind::Heading;
    }
    annotations
}

/// True when upper-casing would not change the text.
fn is_all_caps(text: &str) -> bool {
    text.to_uppercase() == text
}

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w\S*").unwrap());

static RE_SMALL_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(and|because|but|for|neither|nor|only|over|per|some|that|than|the|upon|vs?\.?|versus|via|when|with|without|yet)\b",
    )
    .unwrap()
});

/// Title-case `text`, then capitalize the very first letter.
///
/// A word runs from a word character to the next whitespace, so trailing
/// punctuation and hyphenated parts belong to it. Words containing a small
/// function word and words shorter than three characters are lower-cased, a
/// lone `i` becomes `I`, and everything else keeps only its first letter
/// upper-case.
pub fn title_case(text: &str) -> String {
    let titled = RE_WORD.replace_all(text, |caps: &regex::Captures<'_>| {
        let lower = caps[0].to_lowercase();
        if RE_SMALL_WORDS.is_match(&lower) || lower.chars().count() < 3 {
            if lower == "i" {
                "I".to_string()
            } else {
                lower
            }
        } else {
            capitalize(&lower)
        }
    });
    capitalize(&titled)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_quote_becomes_title_case_heading() {
        let out = transform_headings(vec![Annotation::new(AnnotationKind::Highlight, 1)
            .with_quote("THE QUICK BROWN FOX")
            .with_comment("##")]);
        assert_eq!(out[0].kind, AnnotationKind::Heading);
        assert_eq!(out[0].comment.as_deref(), Some("## The Quick Brown Fox"));
        assert_eq!(out[0].quote, None);
    }

    #[test]
    fn mixed_case_quote_is_kept() {
        let out = transform_headings(vec![Annotation::new(AnnotationKind::Underline, 1)
            .with_quote("Methods and Data")
            .with_comment("#")]);
        assert_eq!(out[0].comment.as_deref(), Some("# Methods and Data"));
    }

    #[test]
    fn free_comment_heading_keeps_text() {
        let out = transform_headings(vec![
            Annotation::new(AnnotationKind::FreeComment, 1).with_comment("### Part Two")
        ]);
        assert_eq!(out[0].kind, AnnotationKind::Heading);
        assert_eq!(out[0].comment.as_deref(), Some("### Part Two"));
    }

    #[test]
    fn hashtag_comment_is_not_a_heading() {
        let input = vec![Annotation::new(AnnotationKind::Highlight, 1)
            .with_quote("q")
            .with_comment("#todo check")];
        assert_eq!(transform_headings(input.clone()), input);
    }

    #[test]
    fn missing_comment_passes_through() {
        let input = vec![Annotation::new(AnnotationKind::Highlight, 1).with_quote("q")];
        assert_eq!(transform_headings(input.clone()), input);
    }

    #[test]
    fn title_case_rules() {
        assert_eq!(title_case("A HISTORY OF THE WORLD"), "A History of the World");
        assert_eq!(title_case("WHAT I SAW IN ROME"), "What I Saw in Rome");
        assert_eq!(title_case("WORK WITHOUT LIMITS VS. PLAY"), "Work without Limits vs. Play");
    }

    #[test]
    fn small_words_match_inside_punctuated_words() {
        assert_eq!(title_case("THE, WAR AND THE-PEACE"), "The, War and the-peace");
        assert_eq!(title_case("OTHER  THINGS"), "Other  Things");
    }
}
