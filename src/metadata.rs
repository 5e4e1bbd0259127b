//! Bibliographic metadata from a raw BibTeX library entry.
//!
//! This is deliberately not a BibTeX parser. Reference managers export one
//! field per line, so a line-oriented extractor that recognises a handful of
//! field names covers the entries this tool sees, without pulling in a full
//! grammar for a format whose only consumer here is a YAML frontmatter block.

use crate::error::AnnotsError;
use crate::prompt::{PageNumberPrompt, PromptReply, FIRST_PAGE_QUESTION};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Metadata of one library entry, read-only once tags are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub title: String,
    /// Entry type from the `@type{` header, e.g. `article`.
    pub publication_type: String,
    /// Raw author field: `Last, First and Last, First`.
    pub author: String,
    /// Comma-separated keywords with spaces turned into `-`.
    pub keywords: Option<String>,
    pub url: Option<String>,
    pub doi: Option<String>,
    /// Frontmatter tag string produced by the tag extractor.
    pub tags: String,
    pub citekey: String,
    /// Printed page number of the first PDF page.
    pub first_page: i64,
    pub year: Option<i32>,
}

/// How the first page number was obtained when the entry lacks one.
pub enum FirstPageSource<'a> {
    /// Fixed value (CLI flag or library caller).
    Fixed(i64),
    /// Ask interactively.
    Prompt(&'a dyn PageNumberPrompt),
    /// No way to find out.
    Unavailable,
}

// ── TeX decoding ─────────────────────────────────────────────────────────────

/// Replacements applied to the entry before field extraction, in order.
/// Braced forms come first so `{\"u}` is not half-decoded by `\"u`.
const TEX_REPLACEMENTS: &[(&str, &str)] = &[
    (r#"{\"u}"#, "ü"),
    (r#"{\"a}"#, "ä"),
    (r#"{\"o}"#, "ö"),
    (r#"{\"U}"#, "Ü"),
    (r#"{\"A}"#, "Ä"),
    (r#"{\"O}"#, "Ö"),
    (r#"\"u"#, "ü"),
    (r#"\"a"#, "ä"),
    (r#"\"o"#, "ö"),
    (r#"\"U"#, "Ü"),
    (r#"\"A"#, "Ä"),
    (r#"\"O"#, "Ö"),
    (r"{\ss}", "ß"),
    (r"\ss", "ß"),
    (r"{\~n}", "n"),
    (r"{\'a}", "a"),
    (r"{\'e}", "e"),
    (r"{\v c}", "c"),
    (r"\c{c}", "c"),
    (r"\o{}", "ø"),
    (r"\^{i}", "i"),
    (r#"\"{i}"#, "i"),
    (r"{\'c}", "c"),
    (r#"\"e"#, "e"),
    (r"\&", "&"),
    ("``", "\""),
    ("`", "'"),
    (r"\textendash{}", "—"),
    ("---", "—"),
    ("--", "—"),
];

fn decode_tex(entry: &str) -> String {
    TEX_REPLACEMENTS
        .iter()
        .fold(entry.to_string(), |acc, (from, to)| acc.replace(from, to))
}

// ── Field extraction ─────────────────────────────────────────────────────────

static RE_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*title\s*=").unwrap());
static RE_PAGES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*pages\s*=").unwrap());
static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:year|date)\s*=").unwrap());
static RE_AUTHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*author\s*=").unwrap());
static RE_KEYWORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*keywords\s*=").unwrap());
static RE_DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*doi\s*=").unwrap());
static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*url\s*=").unwrap());
static RE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)\s*\{").unwrap());
static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static RE_FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
static RE_SIGNED_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());

/// Value of a `field = {value},` line without TeX braces or the trailing comma.
fn field_value(line: &str) -> String {
    let value = line.split_once('=').map_or("", |(_, v)| v).trim();
    let value = value.strip_suffix(',').unwrap_or(value);
    let value: String = value.chars().filter(|c| !matches!(c, '{' | '}')).collect();
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

/// The first entry of `raw`, from its `@` up to the next one.
fn first_entry(raw: &str) -> Option<&str> {
    let start = raw.find('@')?;
    let rest = &raw[start..];
    let end = rest[1..].find('@').map_or(rest.len(), |i| i + 1);
    Some(&rest[..end])
}

/// Parse `raw_entry` into metadata for `citekey`.
///
/// Returns `Ok(None)` when the first page had to be asked for and the user
/// cancelled.
///
/// # Errors
/// - [`AnnotsError::InvalidEntry`] when `raw_entry` has no `@type{` header
/// - [`AnnotsError::MissingFirstPage`] when the entry has no pages and
///   `first_page` is [`FirstPageSource::Unavailable`]
pub fn extract_metadata(
    citekey: &str,
    raw_entry: &str,
    first_page: FirstPageSource<'_>,
) -> Result<Option<EntryMetadata>, AnnotsError> {
    let entry = first_entry(raw_entry).ok_or_else(|| AnnotsError::InvalidEntry {
        reason: "no '@' found".to_string(),
    })?;
    let entry = decode_tex(entry);

    let mut data = EntryMetadata {
        citekey: citekey.to_string(),
        ..Default::default()
    };
    let mut pages: Option<i64> = None;
    let mut saw_header = false;

    for line in entry.lines() {
        if RE_TITLE.is_match(line) {
            // title is written into quoted YAML values
            data.title = field_value(line).replace('"', "'").replace(':', ".");
        } else if let Some(caps) = RE_HEADER.captures(line) {
            data.publication_type = caps[1].to_string();
            saw_header = true;
        } else if RE_PAGES.is_match(line) {
            pages = RE_NUMBER
                .find(line)
                .and_then(|m| m.as_str().parse().ok());
        } else if RE_YEAR.is_match(line) {
            if let Some(m) = RE_FOUR_DIGITS.find(line) {
                data.year = m.as_str().parse().ok();
            }
        } else if RE_AUTHOR.is_match(line) {
            data.author = field_value(line);
        } else if RE_KEYWORDS.is_match(line) {
            // tags cannot hold spaces
            let keywords = field_value(line).replace(", ", ",").replace(' ', "-");
            data.keywords = Some(keywords).filter(|k| !k.is_empty());
        } else if RE_DOI.is_match(line) {
            let doi = field_value(line);
            data.url = Some(format!("https://doi.org/{doi}"));
            data.doi = Some(doi);
        } else if RE_URL.is_match(line) {
            data.url = Some(field_value(line));
        }
    }

    if !saw_header {
        return Err(AnnotsError::InvalidEntry {
            reason: "missing '@type{' header".to_string(),
        });
    }

    data.first_page = match pages {
        Some(page) => page,
        None => match resolve_first_page(citekey, first_page)? {
            Some(page) => page,
            None => {
                info!("First-page prompt cancelled; aborting");
                return Ok(None);
            }
        },
    };

    debug!(
        "Entry '{}': type={}, first_page={}, year={:?}",
        data.citekey, data.publication_type, data.first_page, data.year
    );
    Ok(Some(data))
}

/// Find the first page when the entry has none. `Ok(None)` means cancelled.
fn resolve_first_page(
    citekey: &str,
    source: FirstPageSource<'_>,
) -> Result<Option<i64>, AnnotsError> {
    match source {
        FirstPageSource::Fixed(page) => Ok(Some(page)),
        FirstPageSource::Unavailable => Err(AnnotsError::MissingFirstPage {
            citekey: citekey.to_string(),
        }),
        FirstPageSource::Prompt(prompt) => loop {
            match prompt.ask(FIRST_PAGE_QUESTION) {
                PromptReply::Cancelled => return Ok(None),
                PromptReply::Answer(text) => {
                    let text = text.trim();
                    // the stored first page is one past the answer
                    let page = RE_SIGNED_INT
                        .is_match(text)
                        .then(|| text.parse::<i64>().ok())
                        .flatten()
                        .and_then(|page| page.checked_add(1));
                    if let Some(page) = page {
                        return Ok(Some(page));
                    }
                    warn!("Not a page number: {text:?}");
                }
            }
        },
    }
}

/// Authors as a YAML value: `"First Last"`, or a bracketed list when there
/// are several.
pub fn format_authors(author: &str) -> String {
    let names: Vec<String> = author
        .split(" and ")
        .map(|name| {
            let name = name.trim();
            match name.split_once(',') {
                Some((last, first)) => format!("\"{} {}\"", first.trim(), last.trim()),
                None => format!("\"{name}\""),
            }
        })
        .collect();

    if names.len() > 1 {
        format!("[{}]", names.join(", "))
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"@article{doe2020,
  author = {Doe, Jane and M{\"u}ller, Hans},
  title = {Reading: A {Study} of "Notes"},
  journal = {Journal of Notes},
  year = {2020},
  pages = {117--130},
  keywords = {note taking, reading},
  doi = {10.1000/xyz123},
}
"#;

    struct Scripted(Vec<PromptReply>, std::sync::Mutex<usize>);

    impl PageNumberPrompt for Scripted {
        fn ask(&self, _question: &str) -> PromptReply {
            let mut i = self.1.lock().unwrap();
            let reply = self.0[*i].clone();
            *i += 1;
            reply
        }
    }

    fn scripted(replies: &[PromptReply]) -> Scripted {
        Scripted(replies.to_vec(), std::sync::Mutex::new(0))
    }

    #[test]
    fn extracts_fields() {
        let m = extract_metadata("doe2020", ENTRY, FirstPageSource::Unavailable)
            .unwrap()
            .unwrap();
        assert_eq!(m.publication_type, "article");
        assert_eq!(m.title, "Reading. A Study of 'Notes'");
        assert_eq!(m.author, "Doe, Jane and Müller, Hans");
        assert_eq!(m.year, Some(2020));
        assert_eq!(m.first_page, 117);
        assert_eq!(m.keywords.as_deref(), Some("note-taking,reading"));
        assert_eq!(m.doi.as_deref(), Some("10.1000/xyz123"));
        assert_eq!(m.url.as_deref(), Some("https://doi.org/10.1000/xyz123"));
        assert_eq!(m.citekey, "doe2020");
    }

    #[test]
    fn only_first_entry_is_read() {
        let raw = "@book{a,\n  title = {First},\n  pages = {1}\n}\n@book{b,\n  title = {Second}\n}";
        let m = extract_metadata("a", raw, FirstPageSource::Unavailable)
            .unwrap()
            .unwrap();
        assert_eq!(m.title, "First");
    }

    #[test]
    fn booktitle_is_not_title() {
        let raw = "@inproceedings{a,\n  title = {Real},\n  booktitle = {Proceedings},\n  pages = {3}\n}";
        let m = extract_metadata("a", raw, FirstPageSource::Unavailable)
            .unwrap()
            .unwrap();
        assert_eq!(m.title, "Real");
    }

    #[test]
    fn url_without_doi() {
        let raw = "@online{a,\n  url = {https://example.org/x},\n  date = {2019-04-01},\n  pages = {1}\n}";
        let m = extract_metadata("a", raw, FirstPageSource::Unavailable)
            .unwrap()
            .unwrap();
        assert_eq!(m.url.as_deref(), Some("https://example.org/x"));
        assert_eq!(m.doi, None);
        assert_eq!(m.year, Some(2019));
    }

    #[test]
    fn missing_pages_without_source_is_fatal() {
        let raw = "@book{a,\n  title = {T}\n}";
        let err = extract_metadata("a", raw, FirstPageSource::Unavailable).unwrap_err();
        assert!(matches!(err, AnnotsError::MissingFirstPage { .. }));
    }

    #[test]
    fn fixed_first_page_is_used() {
        let raw = "@book{a,\n  title = {T}\n}";
        let m = extract_metadata("a", raw, FirstPageSource::Fixed(42))
            .unwrap()
            .unwrap();
        assert_eq!(m.first_page, 42);
    }

    #[test]
    fn prompt_loops_until_valid_integer() {
        let raw = "@book{a,\n  title = {T}\n}";
        let prompt = scripted(&[
            PromptReply::Answer("twelve".into()),
            PromptReply::Answer("1.5".into()),
            PromptReply::Answer("-3".into()),
        ]);
        let m = extract_metadata("a", raw, FirstPageSource::Prompt(&prompt))
            .unwrap()
            .unwrap();
        assert_eq!(m.first_page, -2);
        assert_eq!(*prompt.1.lock().unwrap(), 3);
    }

    #[test]
    fn prompt_answer_is_shifted_by_one() {
        let raw = "@book{a,\n  title = {T}\n}";
        let prompt = scripted(&[PromptReply::Answer(" 5 ".into())]);
        let m = extract_metadata("a", raw, FirstPageSource::Prompt(&prompt))
            .unwrap()
            .unwrap();
        assert_eq!(m.first_page, 6);
    }

    #[test]
    fn prompt_cancellation_returns_none() {
        let raw = "@book{a,\n  title = {T}\n}";
        let prompt = scripted(&[PromptReply::Answer("x".into()), PromptReply::Cancelled]);
        let result = extract_metadata("a", raw, FirstPageSource::Prompt(&prompt)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn entry_without_at_sign_is_rejected() {
        let err = extract_metadata("a", "title = {T}", FirstPageSource::Fixed(1)).unwrap_err();
        assert!(matches!(err, AnnotsError::InvalidEntry { .. }));
    }

    #[test]
    fn tex_dashes_and_ampersands() {
        assert_eq!(decode_tex(r"Pages 1--2 \& more"), "Pages 1—2 & more");
        assert_eq!(decode_tex(r#"Gr{\"o}{\ss}e"#), "Größe");
    }

    #[test]
    fn single_author_is_not_bracketed() {
        assert_eq!(format_authors("Doe, Jane"), "\"Jane Doe\"");
        assert_eq!(format_authors("Jane Doe"), "\"Jane Doe\"");
    }

    #[test]
    fn several_authors_are_bracketed() {
        assert_eq!(
            format_authors("Doe, Jane and Roe, Richard"),
            "[\"Jane Doe\", \"Richard Roe\"]"
        );
    }
}
