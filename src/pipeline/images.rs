//! Image namer for pdfannots2json rectangle selections.
//!
//! pdfannots2json writes each image selection to `<base>_image<N>.png` with N
//! counting image annotations from 1, so the references are rebuilt here in
//! the same order. A comment on the image becomes its embed alias.

use crate::annotation::{Annotation, AnnotationKind};

/// Assign `image_ref` to every image annotation.
pub fn name_images(mut annotations: Vec<Annotation>, base_name: &str) -> Vec<Annotation> {
    let images = annotations
        .iter_mut()
        .filter(|a| a.kind == AnnotationKind::Image);

    for (n, annotation) in images.enumerate() {
        let mut image_ref = format!("{base_name}_image{}.png", n + 1);
        if let Some(alias) = annotation.comment_str() {
            image_ref.push('|');
            image_ref.push_str(alias);
        }
        annotation.image_ref = Some(image_ref);
    }
    annotations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_only_images() {
        let out = name_images(
            vec![
                Annotation::new(AnnotationKind::Image, 1),
                Annotation::new(AnnotationKind::Highlight, 1).with_quote("q"),
                Annotation::new(AnnotationKind::Image, 2).with_comment("Figure 2"),
            ],
            "doe2020",
        );
        assert_eq!(out[0].image_ref.as_deref(), Some("doe2020_image1.png"));
        assert_eq!(out[1].image_ref, None);
        assert_eq!(
            out[2].image_ref.as_deref(),
            Some("doe2020_image2.png|Figure 2")
        );
    }
}
