//! Reminders surface.

use super::{application_exists, run_jxa, ExportSurface, SurfaceKind};
use crate::error::SurfaceError;

const CREATE_REMINDER: &str = r#"function run(argv) {
	const rem = Application("Reminders");
	const reminder = rem.Reminder({ name: argv[0], body: argv[1], alldayDueDate: new Date() });
	rem.defaultList().reminders.push(reminder);
	rem.quit();
}"#;

/// Files one reminder, due today, in the default list.
pub struct Reminders;

impl Reminders {
    pub fn new() -> Self {
        Self
    }

    /// Title of the reminder created for `target`.
    pub fn title(target: &str) -> String {
        format!("Underline Annotations for {target}")
    }
}

impl Default for Reminders {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportSurface for Reminders {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Reminders
    }

    fn is_available(&self) -> bool {
        application_exists("Reminders")
    }

    fn submit(&self, text: &str, target: &str) -> Result<(), SurfaceError> {
        let title = Self::title(target);
        run_jxa(self.name(), CREATE_REMINDER, &[title.as_str(), text])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_names_the_document() {
        assert_eq!(
            Reminders::title("doe2020"),
            "Underline Annotations for doe2020"
        );
    }
}
