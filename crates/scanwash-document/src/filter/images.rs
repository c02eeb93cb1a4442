// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image filter — removes small image XObjects (logos, badges) while keeping
// the large scanned page images.

use std::collections::{BTreeMap, BTreeSet};

use lopdf::content::Operation;
use lopdf::{Document, Object, ObjectId};
use scanwash_core::ImageThreshold;
use tracing::{debug, info, warn};

use super::{Stage, WatermarkFilter, WatermarkMatcher};
use crate::pdf::content::{
    XObjectLocation, has_name, locate_xobjects, prune_empty_state_blocks, read_page_operations,
    resolve, resolve_u32, write_page_operations, xobjects, xobjects_mut,
};

/// Removes image XObjects smaller than the threshold in both dimensions.
///
/// The paint operations are dropped from the page content and the resource
/// entries are deleted. Image objects nothing else references are pruned.
#[derive(Debug)]
pub struct ImageFilter {
    threshold: ImageThreshold,
}

impl ImageFilter {
    pub fn new(threshold: ImageThreshold) -> Self {
        Self { threshold }
    }
}

/// Small images found on one page.
struct PagePlan {
    page_number: u32,
    page_id: ObjectId,
    location: XObjectLocation,
    names: BTreeSet<Vec<u8>>,
}

impl WatermarkFilter for ImageFilter {
    fn stage(&self) -> Stage {
        Stage::Images
    }

    fn apply(&self, document: &mut Document, _matcher: &WatermarkMatcher) -> usize {
        let plans: Vec<PagePlan> = document
            .get_pages()
            .into_iter()
            .filter_map(|(page_number, page_id)| self.plan_page(document, page_number, page_id))
            .collect();

        let mut rewritten = BTreeSet::new();
        for plan in &plans {
            let operations = match read_page_operations(document, plan.page_id) {
                Ok(operations) => operations,
                Err(err) => {
                    debug!(page = plan.page_number, error = %err, "Skipping images on page");
                    continue;
                }
            };

            let before = operations.len();
            let kept: Vec<Operation> = operations
                .into_iter()
                .filter(|op| !paints_any(op, &plan.names))
                .collect();
            if kept.len() != before {
                let kept = prune_empty_state_blocks(kept);
                if let Err(err) = write_page_operations(document, plan.page_id, kept) {
                    warn!(page = plan.page_number, error = %err, "Could not rewrite page content");
                    continue;
                }
            }
            rewritten.insert(plan.page_id);
        }

        let mut removed = 0;
        for (location, names) in planned_deletions(&plans, &rewritten) {
            let Some(entries) = xobjects_mut(document, location) else {
                continue;
            };
            for name in names {
                if entries.remove(&name).is_some() {
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            let pruned = document.prune_objects();
            debug!(objects = pruned.len(), "Pruned unreferenced objects");
        }

        removed
    }
}

impl ImageFilter {
    fn plan_page(&self, doc: &Document, page_number: u32, page_id: ObjectId) -> Option<PagePlan> {
        let location = locate_xobjects(doc, page_id)?;
        let entries = xobjects(doc, location)?;

        let mut names = BTreeSet::new();
        for (name, value) in entries.iter() {
            let Some(Object::Stream(stream)) = resolve(doc, value) else {
                continue;
            };
            if !has_name(&stream.dict, b"Subtype", b"Image") {
                continue;
            }
            let (Some(width), Some(height)) = (
                resolve_u32(doc, &stream.dict, b"Width"),
                resolve_u32(doc, &stream.dict, b"Height"),
            ) else {
                continue;
            };

            if self.threshold.is_below(width, height) {
                info!(
                    page = page_number,
                    name = %String::from_utf8_lossy(name),
                    width,
                    height,
                    "Removing small image"
                );
                names.insert(name.clone());
            } else {
                debug!(page = page_number, width, height, "Image kept");
            }
        }

        if names.is_empty() {
            return None;
        }
        Some(PagePlan {
            page_number,
            page_id,
            location,
            names,
        })
    }
}

/// Resource entries that can be deleted once the pages in `rewritten` no
/// longer paint them.
///
/// Inherited resource dictionaries are shared between pages, so entries are
/// grouped by location and deleted once. A location stays untouched while any
/// page drawing from it still has its original content.
fn planned_deletions(
    plans: &[PagePlan],
    rewritten: &BTreeSet<ObjectId>,
) -> BTreeMap<XObjectLocation, BTreeSet<Vec<u8>>> {
    let mut deletions: BTreeMap<XObjectLocation, BTreeSet<Vec<u8>>> = BTreeMap::new();
    let mut blocked = BTreeSet::new();

    for plan in plans {
        if rewritten.contains(&plan.page_id) {
            deletions
                .entry(plan.location)
                .or_default()
                .extend(plan.names.iter().cloned());
        } else {
            blocked.insert(plan.location);
        }
    }

    for location in &blocked {
        if deletions.remove(location).is_some() {
            debug!(?location, "Keeping shared images still painted by a skipped page");
        }
    }
    deletions
}

/// Whether `op` is a `Do` painting one of `names`.
fn paints_any(op: &Operation, names: &BTreeSet<Vec<u8>>) -> bool {
    op.operator == "Do"
        && matches!(op.operands.first(), Some(Object::Name(name)) if names.contains(name))
}
