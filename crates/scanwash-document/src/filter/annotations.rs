// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Annotation filter — drops link annotations that point at the scanning
// application's website.

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info};

use super::{Stage, WatermarkFilter, WatermarkMatcher};
use crate::pdf::content::{has_name, resolve, resolve_dict, resolve_text};

/// Removes `/Link` annotations whose URI (or contents) carries a watermark
/// signature. Other annotation types are never touched.
#[derive(Debug, Default)]
pub struct AnnotationFilter;

impl WatermarkFilter for AnnotationFilter {
    fn stage(&self) -> Stage {
        Stage::Annotations
    }

    fn apply(&self, document: &mut Document, matcher: &WatermarkMatcher) -> usize {
        let mut removed = 0;

        for (page_number, page_id) in document.get_pages() {
            let Some(entries) = page_annotations(document, page_id) else {
                continue;
            };

            let kept: Vec<Object> = entries
                .iter()
                .filter(|entry| !is_watermark_link(document, entry, matcher, page_number))
                .cloned()
                .collect();

            let dropped = entries.len() - kept.len();
            if dropped == 0 {
                continue;
            }

            if let Ok(page) = document.get_object_mut(page_id).and_then(Object::as_dict_mut) {
                if kept.is_empty() {
                    page.remove(b"Annots");
                } else {
                    page.set("Annots", Object::Array(kept));
                }
                removed += dropped;
            }
        }

        removed
    }
}

/// The page's `/Annots` entries, following an indirect array.
fn page_annotations(doc: &Document, page_id: ObjectId) -> Option<Vec<Object>> {
    let page = doc.get_object(page_id).and_then(Object::as_dict).ok()?;
    match resolve(doc, page.get(b"Annots").ok()?)? {
        Object::Array(entries) => Some(entries.clone()),
        _ => None,
    }
}

fn is_watermark_link(
    doc: &Document,
    entry: &Object,
    matcher: &WatermarkMatcher,
    page_number: u32,
) -> bool {
    let Some(Object::Dictionary(annotation)) = resolve(doc, entry) else {
        return false;
    };
    if !has_name(annotation, b"Subtype", b"Link") {
        return false;
    }

    if let Some(uri) = link_uri(doc, annotation) {
        if matcher.is_watermark_url(&uri) {
            info!(page = page_number, uri = %truncate(&uri, 50), "Removing annotation");
            return true;
        }
        debug!(page = page_number, uri = %uri, "Link kept");
    }

    if let Some(contents) = resolve_text(doc, annotation, b"Contents") {
        if matcher.contains_keyword(&contents) {
            info!(page = page_number, "Removing watermark annotation");
            return true;
        }
    }

    false
}

/// Target URI of a link's `/A` action, if it is a URI action.
fn link_uri(doc: &Document, annotation: &Dictionary) -> Option<String> {
    let action = resolve_dict(doc, annotation, b"A")?;
    resolve_text(doc, action, b"URI")
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
