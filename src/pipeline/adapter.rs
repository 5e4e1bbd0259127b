//! Adapter: raw extractor JSON → unified [`Annotation`] records.
//!
//! Two upstream tools are supported and they disagree on field names:
//!
//! | Field    | pdfannots  | pdfannots2json  |
//! |----------|------------|-----------------|
//! | kind     | `type`     | `type`          |
//! | quote    | `text`     | `annotatedText` |
//! | comment  | `contents` | `comment`       |
//! | page     | `page`     | `page`          |
//!
//! Both may report `page` as an integer or as a label such as `"image 1"`.
//! Labels are reduced to their first digit run, or 0 when there is none. A
//! missing or `null` page is also 0.

use crate::annotation::{Annotation, AnnotationKind};
use crate::config::Engine;
use crate::error::AnnotsError;
use serde::Deserialize;
use tracing::debug;

/// Page field as either tool may emit it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPage {
    Number(i64),
    Text(String),
}

impl RawPage {
    fn number(&self) -> i64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => first_digit_run(s).unwrap_or(0),
        }
    }
}

fn first_digit_run(s: &str) -> Option<i64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[derive(Debug, Deserialize)]
struct PdfannotsRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    contents: Option<String>,
    #[serde(default)]
    page: Option<RawPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pdfannots2JsonRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    annotated_text: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    page: Option<RawPage>,
}

/// Map an extractor type tag to a kind.
fn map_kind(index: usize, tag: &str) -> Result<AnnotationKind, AnnotsError> {
    match tag {
        "text" => Ok(AnnotationKind::FreeComment),
        "strike" => Ok(AnnotationKind::Strikethrough),
        "highlight" => Ok(AnnotationKind::Highlight),
        "underline" => Ok(AnnotationKind::Underline),
        "image" => Ok(AnnotationKind::Image),
        other => Err(AnnotsError::UnknownKind {
            index,
            kind: other.to_string(),
        }),
    }
}

fn build(
    index: usize,
    tag: &str,
    page: Option<&RawPage>,
    quote: Option<String>,
    comment: Option<String>,
) -> Result<Annotation, AnnotsError> {
    let page = page.map_or(0, RawPage::number);
    let mut annotation = Annotation::new(map_kind(index, tag)?, page);
    annotation.quote = quote;
    annotation.comment = comment;
    Ok(annotation)
}

/// Parse `raw` as the JSON array produced by `engine`.
///
/// # Errors
/// - [`AnnotsError::InvalidJson`] when `raw` is not an array of records
/// - [`AnnotsError::UnknownKind`] for a type tag outside the known five
pub fn adapt(raw: &str, engine: Engine) -> Result<Vec<Annotation>, AnnotsError> {
    let invalid = |source| AnnotsError::InvalidJson {
        engine: engine.name(),
        source,
    };

    let annotations = match engine {
        Engine::Pdfannots => serde_json::from_str::<Vec<PdfannotsRecord>>(raw)
            .map_err(invalid)?
            .into_iter()
            .enumerate()
            .map(|(i, r)| build(i, &r.kind, r.page.as_ref(), r.text, r.contents))
            .collect::<Result<Vec<_>, _>>()?,
        Engine::Pdfannots2Json => serde_json::from_str::<Vec<Pdfannots2JsonRecord>>(raw)
            .map_err(invalid)?
            .into_iter()
            .enumerate()
            .map(|(i, r)| build(i, &r.kind, r.page.as_ref(), r.annotated_text, r.comment))
            .collect::<Result<Vec<_>, _>>()?,
    };

    debug!(
        "Adapted {} {} records",
        annotations.len(),
        engine.name()
    );
    Ok(annotations)
}
