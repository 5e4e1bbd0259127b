//! Pipeline stages for annotation-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step. Every stage
//! takes the annotation sequence by value and returns the new sequence, so
//! each one is tested on its own and [`crate::convert`] composes them.
//!
//! ## Data Flow
//!
//! ```text
//! adapter ──▶ normalize ──▶ pages ──▶ merge ──▶ heading ──▶ callout
//!  (JSON)      (quotes)    (offset)    (+)        (#)      (? !key !cite !)
//!
//!   ──▶ tags ──▶ images ──▶ underline ──▶ render
//!       (=)    (png refs)   (_ surface)   (Markdown)
//! ```
//!
//! 1. [`adapter`]: parse either extractor's JSON into [`crate::Annotation`]s
//! 2. [`normalize`]: typographic cleanup of quote text
//! 3. [`pages`]: map PDF page indices to printed page numbers
//! 4. [`merge`]: fold `+` continuations into the preceding quote
//! 5. [`heading`]: `#` comments become headings
//! 6. [`callout`]: question, key-point, related and typed callouts, moved
//!    to the front of the note
//! 7. [`tags`]: `=` comments and library keywords become frontmatter tags
//! 8. [`images`]: file references for pdfannots2json image selections
//! 9. [`underline`]: underlines and `_` comments go to the note surface
//! 10. [`render`]: the final Markdown body

pub mod adapter;
pub mod callout;
pub mod heading;
pub mod images;
pub mod merge;
pub mod normalize;
pub mod pages;
pub mod render;
pub mod tags;
pub mod underline;
