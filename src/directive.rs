//! Inline comment directives.
//!
//! Users steer the pipeline by starting a comment with a marker:
//!
//! | Comment starts with | Directive | Effect |
//! |---------------------|-----------|--------|
//! | `+` (whole comment) | [`Directive::Continuation`] | quote joins the previous one |
//! | `#`, `##`, …        | [`Directive::Heading`] | annotation becomes a heading |
//! | `?`                 | [`Directive::Question`] | question callout |
//! | `!key`              | [`Directive::KeyPoints`] | key-points callout |
//! | `!cite`             | [`Directive::Related`] | related-articles callout |
//! | `!`                 | [`Directive::Callout`] | callout typed by its first word |
//! | `=` (not `==`)      | [`Directive::Tags`] | comma-separated tags for the frontmatter |
//! | `_`                 | [`Directive::Underscore`] | task for the note surface |
//!
//! [`Directive::parse`] is the only place that knows these markers; stages
//! match on the parsed value together with the annotation kind.

/// A parsed comment directive. Bodies borrow from the comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// The comment is exactly `+`.
    Continuation,
    /// A run of `#` not followed by a word character.
    Heading { marker: &'a str },
    /// `?` with the trimmed remainder.
    Question(&'a str),
    /// `!key` with the trimmed remainder.
    KeyPoints(&'a str),
    /// `!cite` with the trimmed remainder.
    Related(&'a str),
    /// `!` with the trimmed remainder.
    Callout(&'a str),
    /// `=` with the untrimmed remainder.
    Tags(&'a str),
    /// `_` with the trimmed remainder.
    Underscore(&'a str),
    /// No directive.
    None,
}

impl<'a> Directive<'a> {
    /// Parse the directive at the start of `comment`.
    pub fn parse(comment: &'a str) -> Self {
        if comment == "+" {
            return Self::Continuation;
        }
        if let Some(marker) = heading_marker(comment) {
            return Self::Heading { marker };
        }
        if let Some(rest) = comment.strip_prefix('?') {
            return Self::Question(rest.trim());
        }
        if let Some(rest) = comment.strip_prefix("!key") {
            return Self::KeyPoints(rest.trim());
        }
        if let Some(rest) = comment.strip_prefix("!cite") {
            return Self::Related(rest.trim());
        }
        if let Some(rest) = comment.strip_prefix('!') {
            return Self::Callout(rest.trim());
        }
        if let Some(rest) = comment.strip_prefix('=') {
            // `==text==` is highlight syntax, not a tag list
            if !rest.starts_with('=') {
                return Self::Tags(rest);
            }
        }
        if let Some(rest) = comment.strip_prefix('_') {
            return Self::Underscore(rest.trim());
        }
        Self::None
    }

    /// Parse an optional comment; absent comments carry no directive.
    pub fn of(comment: Option<&'a str>) -> Self {
        comment.map_or(Self::None, Self::parse)
    }
}

/// Word characters as understood by the directive markers.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn heading_marker(comment: &str) -> Option<&str> {
    let len = comment.len() - comment.trim_start_matches('#').len();
    if len == 0 {
        return None;
    }
    // `#tag` is an annotation tag, not a heading
    match comment[len..].chars().next() {
        Some(c) if is_word_char(c) => None,
        _ => Some(&comment[..len]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_must_be_exact() {
        assert_eq!(Directive::parse("+"), Directive::Continuation);
        assert_eq!(Directive::parse("+ more"), Directive::None);
        assert_eq!(Directive::parse(" +"), Directive::None);
    }

    #[test]
    fn heading_levels() {
        assert_eq!(Directive::parse("#"), Directive::Heading { marker: "#" });
        assert_eq!(
            Directive::parse("### Methods"),
            Directive::Heading { marker: "###" }
        );
    }

    #[test]
    fn hash_followed_by_word_is_not_a_heading() {
        assert_eq!(Directive::parse("#important note"), Directive::None);
        assert_eq!(Directive::parse("##tag"), Directive::None);
    }

    #[test]
    fn callout_markers_in_priority_order() {
        assert_eq!(Directive::parse("!key a - b"), Directive::KeyPoints("a - b"));
        assert_eq!(Directive::parse("!cite Smith 2020"), Directive::Related("Smith 2020"));
        assert_eq!(Directive::parse("! note \"T\" x"), Directive::Callout("note \"T\" x"));
        assert_eq!(Directive::parse("? why"), Directive::Question("why"));
    }

    #[test]
    fn tags_exclude_double_equals() {
        assert_eq!(Directive::parse("=foo, bar"), Directive::Tags("foo, bar"));
        assert_eq!(Directive::parse("==marked=="), Directive::None);
    }

    #[test]
    fn underscore_is_trimmed() {
        assert_eq!(Directive::parse("_  buy book "), Directive::Underscore("buy book"));
    }

    #[test]
    fn absent_comment_has_no_directive() {
        assert_eq!(Directive::of(None), Directive::None);
        assert_eq!(Directive::of(Some("plain text")), Directive::None);
    }
}
