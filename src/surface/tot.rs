//! Tot surface.

use super::{application_exists, ExportSurface, SurfaceKind};
use crate::error::SurfaceError;
use std::process::Command;

/// Tot dot that receives the text.
const DOT: u8 = 2;

/// Appends text to a Tot dot through its URL scheme.
pub struct Tot;

impl Tot {
    pub fn new() -> Self {
        Self
    }

    /// The `tot://` URL appending `text` to the dot.
    pub fn append_url(text: &str) -> String {
        format!("tot://{DOT}/append?text={}", urlencoding::encode(text))
    }
}

impl Default for Tot {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportSurface for Tot {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Tot
    }

    fn is_available(&self) -> bool {
        application_exists("Tot")
    }

    fn submit(&self, text: &str, _target: &str) -> Result<(), SurfaceError> {
        let status = Command::new("open")
            .arg(Self::append_url(text))
            .status()
            .map_err(|e| SurfaceError::LaunchFailed {
                surface: self.name(),
                detail: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SurfaceError::Rejected {
                surface: self.name(),
                detail: format!("open exited with {status}"),
            })
        }
    }
}
