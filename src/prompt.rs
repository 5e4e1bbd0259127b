//! Asking the user for a missing first page number.
//!
//! Library entries without a `pages` field give no way to map PDF pages to
//! the page numbers printed in the article. The conversion then asks through
//! an injected [`PageNumberPrompt`], so the CLI can use the terminal while
//! tests substitute a scripted answer.

use std::io::{BufRead, Write};
use std::sync::Mutex;

/// Message shown when the first page is unknown.
pub const FIRST_PAGE_QUESTION: &str =
    "BibTeX entry has no page numbers.\nEnter true page number of FIRST pdf page:";

/// What the user did with the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    /// Raw text typed by the user; validated by the caller.
    Answer(String),
    /// The user dismissed the prompt.
    Cancelled,
}

/// Asks the user a question and blocks until they answer or cancel.
///
/// The trait is `Send + Sync` so a prompt can be stored in a shared
/// [`crate::NoteConfig`].
pub trait PageNumberPrompt: Send + Sync {
    fn ask(&self, question: &str) -> PromptReply;
}

/// Line-based prompt over any reader/writer pair (the CLI uses stdin/stderr).
///
/// End of input, `q` and `cancel` count as cancellation.
pub struct LinePrompt<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> LinePrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }
}

impl<R, W> PageNumberPrompt for LinePrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn ask(&self, question: &str) -> PromptReply {
        let mut guard = match self.io.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (reader, writer) = &mut *guard;

        // a prompt that cannot be shown cannot be answered
        if write!(writer, "{question} ").and_then(|_| writer.flush()).is_err() {
            return PromptReply::Cancelled;
        }

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => PromptReply::Cancelled,
            Ok(_) => {
                let answer = line.trim();
                if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("cancel") {
                    PromptReply::Cancelled
                } else {
                    PromptReply::Answer(answer.to_string())
                }
            }
        }
    }
}
