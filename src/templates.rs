//! Fixed text fragments of the generated note.
//!
//! Centralising them here serves two purposes:
//!
//! 1. **Single source of truth**: renaming a section or a callout type means
//!    editing exactly one place.
//!
//! 2. **Testability**: tests assert against these constants instead of
//!    repeating literal Markdown.

/// Section heading inserted before the first non-callout annotation.
pub const ARTICLE_NOTES_HEADING: &str = "## Article Notes";

/// Section heading inserted before the first question callout.
pub const QUESTIONS_HEADING: &str = "## Questions";

/// Section heading inserted before the first other callout.
pub const ARTICLE_INFO_HEADING: &str = "## Article Information";

/// Key-points callout, anchored as `^<citekey>-key`.
pub fn key_points_callout(citekey: &str, body: &str) -> String {
    format!("> [!ABSTRACT] @{citekey} Key Points\n> - {body}\n\n^{citekey}-key\n")
}

/// Related-articles callout.
pub fn related_articles_callout(citekey: &str, body: &str) -> String {
    format!("> [!CITE] Related Articles\n> - {body}\n\n^{citekey}-cite\n")
}

/// Question callout, without its section heading.
pub fn question_callout(body: &str) -> String {
    format!("> [!QUESTION]\n> {body}\n")
}

/// Callout typed by the user, without its section heading.
pub fn typed_callout(kind: &str, title: &str, body: &str) -> String {
    format!("> [!{kind}] {title}\n> - {body}\n")
}

/// Pandoc citation when the key is known, a bare page reference otherwise.
///
/// Merged quotes cite the page they start on.
pub fn reference(citekey: Option<&str>, page: i64) -> String {
    match citekey {
        Some(key) => format!("[@{key}, p. {page}]"),
        None => format!("(p. {page})"),
    }
}

/// Callout linking the note to its PDF in the citation library.
pub fn file_callout(citekey: &str, library_url: &str) -> String {
    format!("> [!FILE] Article PDF\n> \n> [{citekey}.pdf]({library_url}/{citekey}.pdf)")
}
