//! Configuration types for annotation-to-note conversion.
//!
//! All conversion behaviour is controlled through [`NoteConfig`], built via
//! its [`NoteConfigBuilder`]. The defaults reproduce the literature-note
//! layout the tool was written for (tags, folder, file class, PDF library),
//! so most callers only pick an [`Engine`] and maybe a [`SurfaceKind`].

use crate::error::AnnotsError;
use crate::prompt::PageNumberPrompt;
use crate::surface::{ExportSurface, SurfaceKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one annotation-to-note conversion.
///
/// Built via [`NoteConfig::builder()`] or using [`NoteConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_annots2md::{Engine, NoteConfig, SurfaceKind};
///
/// let config = NoteConfig::builder()
///     .engine(Engine::Pdfannots)
///     .surface_kind(SurfaceKind::Tot)
///     .first_page(17)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct NoteConfig {
    /// Which extractor produced the annotation JSON. Default: [`Engine::Pdfannots2Json`].
    pub engine: Engine,

    /// Note surface that receives underlines and `_` comments. Default: SideNotes.
    ///
    /// `None` keeps every annotation in the main note and disables the
    /// surface pre-entry in the section-heading rule.
    pub surface_kind: Option<SurfaceKind>,

    /// Pre-constructed surface. Takes precedence over `surface_kind`.
    pub surface: Option<Arc<dyn ExportSurface>>,

    /// True page number of the first PDF page, used when the library entry
    /// has no `pages` field. Skips the prompt when set.
    pub first_page: Option<i64>,

    /// Asked for the first page when neither the entry nor `first_page` has it.
    pub page_prompt: Option<Arc<dyn PageNumberPrompt>>,

    /// Namespace put in front of every extracted tag. Default: `article/`.
    pub tag_prefix: String,

    /// Tags written before the extracted ones. Default: `literature-note`, `phd/reading`.
    pub base_tags: Vec<String>,

    /// Value of the `cssclasses` frontmatter key. Default: `pdf-annotations`.
    pub css_class: String,

    /// Value of the `folder` frontmatter key. Default: `30 Working/33 Reading`.
    pub folder: String,

    /// Value of the `fileClass` frontmatter key. Default: `literature-note`.
    pub file_class: String,

    /// Directory holding `<citekey>.pdf` files, linked from the note.
    /// Default: `~/Citation Library`.
    pub library_dir: PathBuf,

    /// SideNotes folder receiving routed underlines. Default: `Annotations`.
    pub sidenotes_folder: String,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            surface_kind: Some(SurfaceKind::default()),
            surface: None,
            first_page: None,
            page_prompt: None,
            tag_prefix: "article/".to_string(),
            base_tags: vec!["literature-note".to_string(), "phd/reading".to_string()],
            css_class: "pdf-annotations".to_string(),
            folder: "30 Working/33 Reading".to_string(),
            file_class: "literature-note".to_string(),
            library_dir: default_library_dir(),
            sidenotes_folder: "Annotations".to_string(),
        }
    }
}

fn default_library_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/"))
        .join("Citation Library")
}

impl fmt::Debug for NoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteConfig")
            .field("engine", &self.engine)
            .field("surface_kind", &self.surface_kind)
            .field("surface", &self.surface.as_ref().map(|s| s.name()))
            .field("first_page", &self.first_page)
            .field(
                "page_prompt",
                &self.page_prompt.as_ref().map(|_| "<dyn PageNumberPrompt>"),
            )
            .field("tag_prefix", &self.tag_prefix)
            .field("base_tags", &self.base_tags)
            .field("folder", &self.folder)
            .field("library_dir", &self.library_dir)
            .finish()
    }
}

impl NoteConfig {
    /// Create a new builder for `NoteConfig`.
    pub fn builder() -> NoteConfigBuilder {
        NoteConfigBuilder {
            config: Self::default(),
        }
    }

    /// The surface underlines are routed to, if any.
    ///
    /// A pre-built surface wins; otherwise one is constructed from `surface_kind`.
    pub fn resolve_surface(&self) -> Option<Arc<dyn ExportSurface>> {
        if let Some(ref surface) = self.surface {
            return Some(Arc::clone(surface));
        }
        self.surface_kind
            .map(|kind| crate::surface::for_kind(kind, &self.sidenotes_folder))
    }
}

/// Builder for [`NoteConfig`].
pub struct NoteConfigBuilder {
    config: NoteConfig,
}

impl fmt::Debug for NoteConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl NoteConfigBuilder {
    pub fn engine(mut self, engine: Engine) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn surface_kind(mut self, kind: SurfaceKind) -> Self {
        self.config.surface_kind = Some(kind);
        self
    }

    /// Keep underlines in the main note; never contact a note surface.
    pub fn no_surface(mut self) -> Self {
        self.config.surface_kind = None;
        self.config.surface = None;
        self
    }

    pub fn surface(mut self, surface: Arc<dyn ExportSurface>) -> Self {
        self.config.surface = Some(surface);
        self
    }

    pub fn first_page(mut self, page: i64) -> Self {
        self.config.first_page = Some(page);
        self
    }

    pub fn page_prompt(mut self, prompt: Arc<dyn PageNumberPrompt>) -> Self {
        self.config.page_prompt = Some(prompt);
        self
    }

    pub fn tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.tag_prefix = prefix.into();
        self
    }

    pub fn base_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.base_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.config.css_class = class.into();
        self
    }

    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.config.folder = folder.into();
        self
    }

    pub fn file_class(mut self, class: impl Into<String>) -> Self {
        self.config.file_class = class.into();
        self
    }

    pub fn library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.library_dir = dir.into();
        self
    }

    pub fn sidenotes_folder(mut self, folder: impl Into<String>) -> Self {
        self.config.sidenotes_folder = folder.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<NoteConfig, AnnotsError> {
        let c = &self.config;
        if c.tag_prefix.contains([',', ' ']) {
            return Err(AnnotsError::InvalidConfig(format!(
                "Tag prefix must not contain commas or spaces, got '{}'",
                c.tag_prefix
            )));
        }
        if let Some(tag) = c.base_tags.iter().find(|t| t.trim().is_empty()) {
            return Err(AnnotsError::InvalidConfig(format!(
                "Base tags must not be empty, got {tag:?}"
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// The upstream tool that extracted the annotations.
///
/// The two tools emit different JSON shapes; the engine picks the adapter and
/// decides whether image annotations get generated file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Engine {
    /// `pdfannots`: `text` / `contents` fields, no image export.
    Pdfannots,
    /// `pdfannots2json`: `annotatedText` / `comment` fields, images as PNG files. (default)
    #[default]
    Pdfannots2Json,
}

impl Engine {
    pub fn name(self) -> &'static str {
        match self {
            Engine::Pdfannots => "pdfannots",
            Engine::Pdfannots2Json => "pdfannots2json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_literature_note_layout() {
        let c = NoteConfig::default();
        assert_eq!(c.engine, Engine::Pdfannots2Json);
        assert_eq!(c.surface_kind, Some(SurfaceKind::SideNotes));
        assert_eq!(c.tag_prefix, "article/");
        assert_eq!(c.base_tags, vec!["literature-note", "phd/reading"]);
        assert!(c.library_dir.ends_with("Citation Library"));
    }

    #[test]
    fn builder_sets_fields() {
        let c = NoteConfig::builder()
            .engine(Engine::Pdfannots)
            .first_page(5)
            .tag_prefix("paper/")
            .base_tags(["reading"])
            .build()
            .unwrap();
        assert_eq!(c.engine, Engine::Pdfannots);
        assert_eq!(c.first_page, Some(5));
        assert_eq!(c.tag_prefix, "paper/");
        assert_eq!(c.base_tags, vec!["reading"]);
    }

    #[test]
    fn no_surface_disables_routing() {
        let c = NoteConfig::builder().no_surface().build().unwrap();
        assert!(c.resolve_surface().is_none());
    }

    #[test]
    fn surface_kind_resolves_to_matching_surface() {
        let c = NoteConfig::builder()
            .surface_kind(SurfaceKind::Reminders)
            .build()
            .unwrap();
        let surface = c.resolve_surface().expect("surface");
        assert_eq!(surface.kind(), SurfaceKind::Reminders);
    }

    #[test]
    fn tag_prefix_with_space_is_rejected() {
        let err = NoteConfig::builder().tag_prefix("my tags/").build();
        assert!(matches!(err, Err(AnnotsError::InvalidConfig(_))));
    }

    #[test]
    fn engine_names() {
        assert_eq!(Engine::Pdfannots.name(), "pdfannots");
        assert_eq!(Engine::Pdfannots2Json.name(), "pdfannots2json");
    }
}
