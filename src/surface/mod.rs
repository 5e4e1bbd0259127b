//! External note surfaces for underline annotations.
//!
//! Underlines and `_` comments are "do something about this later" items.
//! When a note surface is installed they are bundled into one text block and
//! handed to it instead of cluttering the literature note. Each surface wraps
//! one macOS application and knows how to reach it.

mod reminders;
mod sidenotes;
mod tot;

pub use reminders::Reminders;
pub use sidenotes::SideNotes;
pub use tot::Tot;

use crate::error::SurfaceError;
use serde::{Deserialize, Serialize};
use std::process::Command;
use std::sync::Arc;
use tracing::debug;

/// The supported note surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// SideNotes: one note per run in a configured folder. (default)
    #[default]
    SideNotes,
    /// Tot: text appended to the second dot.
    Tot,
    /// Reminders: one reminder due today in the default list.
    Reminders,
}

impl SurfaceKind {
    /// Application name, as used for probing and logging.
    pub fn name(self) -> &'static str {
        match self {
            Self::SideNotes => "SideNotes",
            Self::Tot => "Tot",
            Self::Reminders => "Reminders",
        }
    }

    /// Text placed before the first routed entry.
    pub fn pre_entry(self, citekey: &str) -> String {
        match self {
            Self::SideNotes => format!("# {citekey}\n"),
            Self::Tot => format!("--------------------\n{citekey}\n--------------------\n"),
            Self::Reminders => String::new(),
        }
    }

    /// Text appended after the routed entries.
    pub fn post_entry(self) -> &'static str {
        match self {
            Self::Tot => "\n\n",
            Self::SideNotes | Self::Reminders => "",
        }
    }
}

/// A place that accepts a block of formatted text.
///
/// Implementations must be `Send + Sync` so a pre-built surface can live in a
/// shared [`crate::NoteConfig`].
pub trait ExportSurface: Send + Sync {
    /// Which surface this is.
    fn kind(&self) -> SurfaceKind;

    /// Human-readable name for logs and errors.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check whether the surface can be reached at all.
    ///
    /// Should be fast; a failed probe simply means "not available".
    fn is_available(&self) -> bool;

    /// Text placed before the first routed entry.
    fn pre_entry(&self, citekey: &str) -> String {
        self.kind().pre_entry(citekey)
    }

    /// Text appended after the routed entries.
    fn post_entry(&self) -> &str {
        self.kind().post_entry()
    }

    /// Hand `text` to the surface. `target` names the source document.
    fn submit(&self, text: &str, target: &str) -> Result<(), SurfaceError>;
}

/// Build the surface for `kind`.
pub fn for_kind(kind: SurfaceKind, sidenotes_folder: &str) -> Arc<dyn ExportSurface> {
    match kind {
        SurfaceKind::SideNotes => Arc::new(SideNotes::new(sidenotes_folder)),
        SurfaceKind::Tot => Arc::new(Tot::new()),
        SurfaceKind::Reminders => Arc::new(Reminders::new()),
    }
}

/// Check that a scriptable application is installed.
fn application_exists(app: &str) -> bool {
    if !cfg!(target_os = "macos") {
        return false;
    }
    let probe = format!("Application({app:?}).id()");
    let found = Command::new("osascript")
        .args(["-l", "JavaScript", "-e", &probe])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    debug!("Probed {app}: {}", if found { "found" } else { "missing" });
    found
}

/// Run a JXA script whose `run(argv)` receives `args`.
fn run_jxa(surface: &'static str, script: &str, args: &[&str]) -> Result<(), SurfaceError> {
    let output = Command::new("osascript")
        .args(["-l", "JavaScript", "-e", script])
        .args(args)
        .output()
        .map_err(|e| SurfaceError::LaunchFailed {
            surface,
            detail: e.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(SurfaceError::Rejected {
            surface,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidenotes_entries() {
        assert_eq!(SurfaceKind::SideNotes.pre_entry("doe2020"), "# doe2020\n");
        assert_eq!(SurfaceKind::SideNotes.post_entry(), "");
    }

    #[test]
    fn tot_entries() {
        assert_eq!(
            SurfaceKind::Tot.pre_entry("doe2020"),
            "--------------------\ndoe2020\n--------------------\n"
        );
        assert_eq!(SurfaceKind::Tot.post_entry(), "\n\n");
    }

    #[test]
    fn reminders_entries_are_empty() {
        assert_eq!(SurfaceKind::Reminders.pre_entry("doe2020"), "");
        assert_eq!(SurfaceKind::Reminders.post_entry(), "");
    }

    #[test]
    fn for_kind_builds_matching_surface() {
        for kind in [SurfaceKind::SideNotes, SurfaceKind::Tot, SurfaceKind::Reminders] {
            let surface = for_kind(kind, "Annotations");
            assert_eq!(surface.kind(), kind);
            assert_eq!(surface.name(), kind.name());
        }
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn applications_are_never_found_off_macos() {
        assert!(!application_exists("SideNotes"));
    }
}
