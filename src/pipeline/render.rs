//! Markdown renderer: the final annotation sequence → note body.
//!
//! ## Output per kind
//!
//! | Kind | Output |
//! |------|--------|
//! | Highlight | `- > quote [@key, p. N]`, comment as a sub-bullet |
//! | Underline | `- [ ] quote`, comment as a sub-bullet |
//! | Underscore | `- [ ] comment`, sub-items as nested tasks |
//! | Free comment | `- comment` |
//! | Heading | the heading line, blank line before unless first |
//! | Question | `> [!QUESTION]` under a one-time `## Questions` |
//! | Key points | `> [!ABSTRACT]` with a `^key-key` block anchor |
//! | Related | `> [!CITE]` with a `^key-cite` block anchor |
//! | Other callout | `> [!TYPE] title` under a one-time `## Article Information` |
//! | Image | `![[file.png]]` between blank lines |
//!
//! Strikethroughs and images without a file are not rendered.
//!
//! ## Sub-lists in comments
//!
//! Comments are single-line in PDF viewers, so ` - ` inside a comment starts
//! a sub-item. Each kind re-indents those items to fit its own container:
//! tab-indented bullets under list items, quoted lines inside callouts,
//! nested checkboxes under tasks.
//!
//! ## Annotation tags
//!
//! A comment starting with `#word` (a tag, not a heading) keeps that tag in
//! front of the rendered text regardless of kind.

use crate::annotation::{Annotation, AnnotationKind};
use crate::templates::{self, ARTICLE_INFO_HEADING, ARTICLE_NOTES_HEADING, QUESTIONS_HEADING};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_ANNOTATION_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\w").unwrap());
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)] ?").unwrap());
static RE_SUB_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\t*- )").unwrap());
static RE_CALLOUT_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w*").unwrap());
static RE_CALLOUT_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s*["„“”«»’]([\w\s]*)["„“”«»’]"#).unwrap());

// Replacement patterns for sub-items, one per container.
const UNDER_BULLET: &str = "\n\t${1}";
const TOP_LEVEL: &str = "\n${1}";
const AS_TASK: &str = "\n${1}[ ] ";
const IN_CALLOUT: &str = "\n> ${1}";

/// Whether `annotation` produces any output.
pub fn is_rendered(annotation: &Annotation) -> bool {
    match annotation.kind {
        AnnotationKind::Strikethrough | AnnotationKind::Removed => false,
        AnnotationKind::Image => annotation.image_ref.is_some(),
        _ => true,
    }
}

/// Render `annotations` into one Markdown string.
///
/// `citekey` feeds the citations and the key/related callouts.
/// `surface_pre_entry` replaces the `## Article Notes` heading when an
/// underline or underscore is the first annotation that needs a section.
pub fn render_markdown(
    annotations: &[Annotation],
    citekey: Option<&str>,
    surface_pre_entry: Option<&str>,
) -> String {
    let mut renderer = Renderer::new(citekey, surface_pre_entry);
    annotations
        .iter()
        .filter(|a| {
            let rendered = is_rendered(a);
            if !rendered {
                debug!("Skipping {} on p. {}", a.kind, a.page_label);
            }
            rendered
        })
        .map(|a| renderer.render(a))
        .collect::<Vec<_>>()
        .join("\n")
}

struct Renderer<'a> {
    citekey: Option<&'a str>,
    pre_entry: Option<&'a str>,
    first_item: bool,
    first_question: bool,
    first_callout: bool,
    needs_heading: bool,
}

impl<'a> Renderer<'a> {
    fn new(citekey: Option<&'a str>, pre_entry: Option<&'a str>) -> Self {
        Self {
            citekey,
            pre_entry,
            first_item: true,
            first_question: true,
            first_callout: true,
            needs_heading: true,
        }
    }

    fn render(&mut self, a: &Annotation) -> String {
        let comment = a.comment.as_deref().map_or("", str::trim);
        let (tag, comment) = split_annotation_tag(comment);
        let quote = a.quote.as_deref().unwrap_or_default();
        let key = self.citekey.unwrap_or_default();

        let mut output = match a.kind {
            AnnotationKind::Highlight => {
                let reference = templates::reference(self.citekey, a.page);
                highlight(&tag, quote, comment, &reference)
            }
            AnnotationKind::Underline if comment.is_empty() => format!("- [ ] {tag}{quote}"),
            AnnotationKind::Underline => format!(
                "- [ ] {tag}{quote}\n\t- {}",
                nest_items(strip_bullet(comment), UNDER_BULLET)
            ),
            AnnotationKind::Underscore => {
                format!("- [ ] {tag}{}", nest_items(strip_bullet(comment), AS_TASK))
            }
            AnnotationKind::FreeComment => {
                format!("- {tag}{}", nest_items(strip_bullet(comment), TOP_LEVEL))
            }
            AnnotationKind::Heading => {
                self.needs_heading = false;
                if self.first_item {
                    comment.to_string()
                } else {
                    format!("\n{comment}")
                }
            }
            AnnotationKind::QuestionCallout => {
                let callout = templates::question_callout(&nest_items(comment, IN_CALLOUT));
                if std::mem::take(&mut self.first_question) {
                    format!("{QUESTIONS_HEADING}\n{callout}")
                } else {
                    callout
                }
            }
            AnnotationKind::KeyCallout => templates::key_points_callout(
                key,
                &nest_items(strip_bullet(comment), IN_CALLOUT),
            ),
            AnnotationKind::CiteCallout => templates::related_articles_callout(
                key,
                &nest_items(strip_bullet(comment), IN_CALLOUT),
            ),
            AnnotationKind::OtherCallout => {
                let callout = typed_callout(comment);
                if std::mem::take(&mut self.first_callout) {
                    format!("{ARTICLE_INFO_HEADING}\n{callout}")
                } else {
                    callout
                }
            }
            AnnotationKind::Image => {
                format!("\n![[{}]]\n", a.image_ref.as_deref().unwrap_or_default())
            }
            AnnotationKind::Strikethrough | AnnotationKind::Removed => String::new(),
        };

        if self.needs_heading {
            let section = match (a.kind, self.pre_entry) {
                (AnnotationKind::Underline | AnnotationKind::Underscore, Some(pre)) => {
                    Some(pre.to_string())
                }
                (kind, _) if !kind.is_callout() => Some(format!("{ARTICLE_NOTES_HEADING}\n")),
                _ => None,
            };
            if let Some(section) = section {
                output.insert_str(0, &section);
                self.needs_heading = false;
            }
        }
        self.first_item = false;
        output
    }
}

/// Split a leading `#tag` off the comment. The tag keeps a trailing space.
fn split_annotation_tag(comment: &str) -> (String, &str) {
    if !RE_ANNOTATION_TAG.is_match(comment) {
        return (String::new(), comment);
    }
    match comment.split_once(' ') {
        Some((tag, rest)) => (format!("{tag} "), rest),
        None => (format!("{comment} "), ""),
    }
}

fn strip_bullet(comment: &str) -> &str {
    comment.strip_prefix("- ").unwrap_or(comment)
}

/// Break inline ` - ` items onto their own lines using `replacement`.
fn nest_items(comment: &str, replacement: &str) -> String {
    let tabbed = comment.replace(" - ", "\t- ");
    RE_SUB_ITEM.replace_all(&tabbed, replacement).into_owned()
}

fn highlight(tag: &str, quote: &str, comment: &str, reference: &str) -> String {
    if comment.is_empty() {
        return format!("- > {tag}{quote} {reference}");
    }
    // "1)" or "1." in front of a comment continues an ordered list
    let (marker, comment) = match RE_NUMBERED.find(comment) {
        Some(m) => {
            let number = m.as_str().trim_end_matches([' ', '.', ')']);
            (format!("{number}. "), &comment[m.end()..])
        }
        None => ("- ".to_string(), comment),
    };
    let comment = nest_items(strip_bullet(comment), UNDER_BULLET);
    format!("{marker}> {tag}{quote} {reference}\n\t- {comment}")
}

/// `type "Title" rest`: type is the first word, the title is optional.
fn typed_callout(comment: &str) -> String {
    let type_end = RE_CALLOUT_TYPE.find(comment).map_or(0, |m| m.end());
    let kind = comment[..type_end].to_uppercase();
    let rest = &comment[type_end..];

    let title = RE_CALLOUT_TITLE
        .captures(rest)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    let rest = RE_CALLOUT_TITLE.replacen(rest, 1, "");
    let body = nest_items(strip_bullet(rest.trim()), IN_CALLOUT);

    templates::typed_callout(&kind, &title, &body)
}
