//! SideNotes surface.

use super::{application_exists, run_jxa, ExportSurface, SurfaceKind};
use crate::error::SurfaceError;

const CREATE_NOTE: &str = r#"function run(argv) {
	const sn = Application("SideNotes");
	const folder = sn.folders.whose({ name: argv[0] })[0]();
	sn.createNote({ folder: folder, text: argv[1] });
}"#;

/// Creates one SideNotes note per run inside a named folder.
pub struct SideNotes {
    folder: String,
}

impl SideNotes {
    /// Create a surface writing into `folder`.
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

impl ExportSurface for SideNotes {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::SideNotes
    }

    fn is_available(&self) -> bool {
        application_exists("SideNotes")
    }

    fn submit(&self, text: &str, _target: &str) -> Result<(), SurfaceError> {
        run_jxa(self.name(), CREATE_NOTE, &[self.folder.as_str(), text])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_start_with_the_citekey() {
        let surface = SideNotes::new("Reading");
        assert_eq!(surface.kind(), SurfaceKind::SideNotes);
        assert_eq!(surface.pre_entry("doe2020"), "# doe2020\n");
        assert_eq!(surface.post_entry(), "");
    }
}
