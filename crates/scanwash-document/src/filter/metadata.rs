// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metadata filter — clears document-information fields that name the
// scanning application.

use lopdf::{Dictionary, Document, Object};
use scanwash_core::MetadataField;
use tracing::{debug, info};

use super::{Stage, WatermarkFilter, WatermarkMatcher};
use crate::pdf::content::resolve_text;

/// Empties the configured `/Info` fields whose value carries a watermark
/// keyword or domain. Fields are emptied rather than deleted.
#[derive(Debug)]
pub struct MetadataFilter {
    fields: Vec<MetadataField>,
}

impl MetadataFilter {
    pub fn new(fields: Vec<MetadataField>) -> Self {
        Self { fields }
    }
}

impl WatermarkFilter for MetadataFilter {
    fn stage(&self) -> Stage {
        Stage::Metadata
    }

    fn apply(&self, document: &mut Document, matcher: &WatermarkMatcher) -> usize {
        let matches: Vec<MetadataField> = {
            let Some(info) = info_dict(document) else {
                debug!("Document has no info dictionary");
                return 0;
            };
            self.fields
                .iter()
                .copied()
                .filter(|field| {
                    resolve_text(document, info, field.key().as_bytes())
                        .is_some_and(|value| !value.trim().is_empty() && matcher.contains_indicator(&value))
                })
                .collect()
        };

        if matches.is_empty() {
            return 0;
        }

        let Some(info) = info_dict_mut(document) else {
            return 0;
        };
        for field in &matches {
            info!(field = field.key(), "Clearing metadata field");
            info.set(field.key(), Object::string_literal(""));
        }
        matches.len()
    }
}

fn info_dict(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).and_then(Object::as_dict).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn info_dict_mut(doc: &mut Document) -> Option<&mut Dictionary> {
    let info_ref = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => Some(*id),
        _ => None,
    };
    match info_ref {
        Some(id) => doc.get_object_mut(id).and_then(Object::as_dict_mut).ok(),
        None => doc.trailer.get_mut(b"Info").and_then(Object::as_dict_mut).ok(),
    }
}
