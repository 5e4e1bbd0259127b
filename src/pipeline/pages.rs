//! Page offset: PDF page index → page number printed in the article.

use crate::annotation::Annotation;

/// Shift every page so PDF page 1 becomes `first_page`, and reset the label.
pub fn apply_page_offset(mut annotations: Vec<Annotation>, first_page: i64) -> Vec<Annotation> {
    for annotation in &mut annotations {
        annotation.page += first_page - 1;
        annotation.page_label = annotation.page.to_string();
    }
    annotations
}
