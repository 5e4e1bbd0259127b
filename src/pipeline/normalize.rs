//! Quote normalizer: typographic cleanup of extracted quote text.
//!
//! ## Why is normalization necessary?
//!
//! PDF text extraction hands back the glyphs as laid out on the page, not the
//! sentence the author wrote. Line-wrapped words keep their hyphen, footnote
//! markers stick to the preceding punctuation, and every publisher has its
//! own idea of quotation marks. The rules below undo the common cases.
//!
//! ## Rule Order
//!
//! Dash and ellipsis rules run before quote unification and hyphen joining,
//! and trimming runs last so removed codepoints cannot leave stray spaces at
//! the ends. Only `quote` is touched; comments are the user's own text.

use crate::annotation::Annotation;
use once_cell::sync::Lazy;
use regex::Regex;

/// Normalize the quote of every annotation that has one.
pub fn normalize_quotes(mut annotations: Vec<Annotation>) -> Vec<Annotation> {
    for annotation in &mut annotations {
        if let Some(quote) = annotation.quote.as_deref().filter(|q| !q.is_empty()) {
            annotation.quote = Some(clean_quote(quote));
        }
    }
    annotations
}

/// Apply all quote rules, in order:
///
/// 1. Spaced hyphen → en dash
/// 2. `...` → ellipsis
/// 3. `. . . ` → ellipsis
/// 4. Strip soft hyphens
/// 5. Resolve `&amp;`
/// 6. Curly, low and angle quotation marks → `'`
/// 7. Strip a digit right after `.`/`,` (footnote markers)
/// 8. Join words hyphenated across a line break
/// 9. Strip replacement characters and broken `½` math glyphs
/// 10. Trim
pub fn clean_quote(input: &str) -> String {
    let s = input.replace(" - ", " – ");
    let s = s.replace("...", "…");
    let s = s.replace(". . . ", "…");
    let s = s.replace('\u{00AD}', "");
    let s = s.replace("&amp;", "&");
    let s = unify_quotation_marks(&s);
    let s = strip_footnote_markers(&s);
    let s = join_hyphenated_words(&s);
    let s = s.replace(['\u{FFFD}', '\u{00BD}'], "");
    s.trim().to_string()
}

// ── Rule 6: Quotation marks ──────────────────────────────────────────────────

static RE_QUOTATION_MARKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"’’|‘‘|["„“”«»‘’]"#).unwrap());

fn unify_quotation_marks(input: &str) -> String {
    RE_QUOTATION_MARKS.replace_all(input, "'").into_owned()
}

// ── Rule 7: Footnote markers ─────────────────────────────────────────────────

// Also eats the digit in "v.2"-style text.
static RE_FOOTNOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\D[.,])\d").unwrap());

fn strip_footnote_markers(input: &str) -> String {
    RE_FOOTNOTE.replace_all(input, "$1").into_owned()
}

// ── Rule 8: Hyphenated line breaks ───────────────────────────────────────────

static RE_WRAPPED_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)-\s(\w)").unwrap());

fn join_hyphenated_words(input: &str) -> String {
    RE_WRAPPED_HYPHEN.replace_all(input, "$1$2").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;

    #[test]
    fn dashes_and_ellipses() {
        assert_eq!(clean_quote("a - b"), "a – b");
        assert_eq!(clean_quote("wait... what"), "wait… what");
        assert_eq!(clean_quote("wait. . . what"), "wait…what");
    }

    #[test]
    fn quotation_marks_become_apostrophes() {
        assert_eq!(clean_quote("„so“ ‘‘called’’ «x»"), "'so' 'called' 'x'");
        assert_eq!(clean_quote("\"plain\""), "'plain'");
    }

    #[test]
    fn footnote_after_punctuation_is_stripped() {
        assert_eq!(clean_quote("as shown.3 Next"), "as shown. Next");
        assert_eq!(clean_quote("first,2 second"), "first, second");
        // digits before the punctuation keep what follows
        assert_eq!(clean_quote("pi is 3.14"), "pi is 3.14");
    }

    #[test]
    fn wrapped_words_are_joined() {
        assert_eq!(clean_quote("infor- mation"), "information");
        assert_eq!(clean_quote("well-known"), "well-known");
    }

    #[test]
    fn invisible_and_broken_glyphs_removed() {
        assert_eq!(clean_quote(" soft\u{00AD}hyphen\u{FFFD}\u{00BD} "), "softhyphen");
        assert_eq!(clean_quote("R&amp;D"), "R&D");
    }

    #[test]
    fn only_quotes_are_touched() {
        let input = vec![
            Annotation::new(AnnotationKind::Highlight, 1)
                .with_quote(" x... ")
                .with_comment(" y... "),
            Annotation::new(AnnotationKind::FreeComment, 1).with_comment("a - b"),
            Annotation::new(AnnotationKind::Highlight, 1).with_quote(""),
        ];
        let out = normalize_quotes(input);
        assert_eq!(out[0].quote.as_deref(), Some("x…"));
        assert_eq!(out[0].comment.as_deref(), Some(" y... "));
        assert_eq!(out[1].comment.as_deref(), Some("a - b"));
        assert_eq!(out[1].quote, None);
        assert_eq!(out[2].quote.as_deref(), Some(""));
    }
}
