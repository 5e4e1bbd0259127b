//! Underline router: sends underlines and `_` comments to the note surface.
//!
//! `_` comments are always turned into [`AnnotationKind::Underscore`], even
//! when no surface is reachable, so the renderer shows them as tasks either
//! way. Routed annotations leave the sequence only after the surface has
//! accepted them. A failed submission keeps them in the note.

use crate::annotation::{Annotation, AnnotationKind};
use crate::directive::Directive;
use crate::error::SurfaceError;
use crate::pipeline::render::render_markdown;
use crate::surface::ExportSurface;
use tracing::{debug, info, warn};

/// Result of routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    /// Annotations that stay in the note.
    pub annotations: Vec<Annotation>,
    /// How many annotations the surface received.
    pub routed: usize,
}

/// Reclassify `_` comments and hand underlines to `surface` when it is reachable.
///
/// `target` names the source document for the surface; `citekey` feeds the
/// rendered text.
pub fn route_underlines(
    mut annotations: Vec<Annotation>,
    surface: Option<&dyn ExportSurface>,
    target: &str,
    citekey: Option<&str>,
) -> Routed {
    for annotation in &mut annotations {
        if let Directive::Underscore(body) = Directive::of(annotation.comment_str()) {
            let body = body.to_string();
            annotation.comment = Some(body);
            annotation.kind = AnnotationKind::Underscore;
        }
    }

    let surface = match surface {
        Some(s) if s.is_available() => s,
        Some(s) => {
            let e = SurfaceError::Unavailable { surface: s.name() };
            debug!("{e}; underlines stay in the note");
            return Routed {
                annotations,
                routed: 0,
            };
        }
        None => {
            debug!("No note surface configured; underlines stay in the note");
            return Routed {
                annotations,
                routed: 0,
            };
        }
    };

    let is_routed =
        |a: &Annotation| matches!(a.kind, AnnotationKind::Underline | AnnotationKind::Underscore);

    // underlines first, then underscores
    let ordered: Vec<Annotation> = annotations
        .iter()
        .filter(|a| a.kind == AnnotationKind::Underline)
        .chain(
            annotations
                .iter()
                .filter(|a| a.kind == AnnotationKind::Underscore),
        )
        .cloned()
        .collect();
    if ordered.is_empty() {
        return Routed {
            annotations,
            routed: 0,
        };
    }

    let pre_entry = surface.pre_entry(citekey.unwrap_or_default());
    let mut text = render_markdown(&ordered, citekey, Some(&pre_entry));
    text.push_str(surface.post_entry());

    match surface.submit(&text, target) {
        Ok(()) => {
            info!("Sent {} annotations to {}", ordered.len(), surface.name());
            annotations.retain(|a| !is_routed(a));
            Routed {
                annotations,
                routed: ordered.len(),
            }
        }
        Err(e) => {
            warn!("{e}; keeping underlines in the note");
            Routed {
                annotations,
                routed: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceKind;
    use std::sync::Mutex;

    struct FakeSurface {
        available: bool,
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl FakeSurface {
        fn new(available: bool, fail: bool) -> Self {
            Self {
                available,
                fail,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn as_dyn(&self) -> Option<&dyn ExportSurface> {
            Some(self)
        }
    }

    impl ExportSurface for FakeSurface {
        fn kind(&self) -> SurfaceKind {
            SurfaceKind::Tot
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn submit(&self, text: &str, target: &str) -> Result<(), SurfaceError> {
            if self.fail {
                return Err(SurfaceError::Rejected {
                    surface: "Tot",
                    detail: "boom".into(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((text.to_string(), target.to_string()));
            Ok(())
        }
    }

    fn sample() -> Vec<Annotation> {
        vec![
            Annotation::new(AnnotationKind::FreeComment, 1).with_comment("_ buy book"),
            Annotation::new(AnnotationKind::Highlight, 1).with_quote("h"),
            Annotation::new(AnnotationKind::Underline, 2).with_quote("u"),
        ]
    }

    #[test]
    fn routes_underlines_then_underscores() {
        let surface = FakeSurface::new(true, false);
        let out = route_underlines(sample(), surface.as_dyn(), "doe2020", Some("doe2020"));
        assert_eq!(out.routed, 2);
        assert_eq!(out.annotations.len(), 1);
        assert_eq!(out.annotations[0].kind, AnnotationKind::Highlight);

        let sent = surface.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].0,
            "--------------------\ndoe2020\n--------------------\n- [ ] u\n- [ ] buy book\n\n"
        );
        assert_eq!(sent[0].1, "doe2020");
    }

    #[test]
    fn unavailable_surface_still_reclassifies() {
        let surface = FakeSurface::new(false, false);
        let out = route_underlines(sample(), surface.as_dyn(), "doe2020", None);
        assert_eq!(out.routed, 0);
        assert_eq!(out.annotations.len(), 3);
        assert_eq!(out.annotations[0].kind, AnnotationKind::Underscore);
        assert_eq!(out.annotations[0].comment.as_deref(), Some("buy book"));
        assert!(surface.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn no_surface_is_pass_through() {
        let out = route_underlines(sample(), None, "x", None);
        assert_eq!(out.annotations.len(), 3);
        assert_eq!(out.annotations[2].kind, AnnotationKind::Underline);
    }

    #[test]
    fn nothing_to_route_sends_nothing() {
        let surface = FakeSurface::new(true, false);
        let input = vec![Annotation::new(AnnotationKind::Highlight, 1).with_quote("h")];
        let out = route_underlines(input.clone(), surface.as_dyn(), "x", None);
        assert_eq!(out.annotations, input);
        assert!(surface.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_submit_keeps_annotations() {
        let surface = FakeSurface::new(true, true);
        let out = route_underlines(sample(), surface.as_dyn(), "x", None);
        assert_eq!(out.routed, 0);
        let kinds: Vec<_> = out.annotations.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnnotationKind::Underscore,
                AnnotationKind::Highlight,
                AnnotationKind::Underline,
            ]
        );
    }
}
