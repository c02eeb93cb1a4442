// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text filter — removes watermark text from page content streams.
//
// Whole BT … ET blocks whose text mentions a keyword are dropped and counted.
// Keyword occurrences left in other string operands are then scrubbed in
// place without being counted.

use lopdf::content::Operation;
use lopdf::{Document, Object};
use tracing::{debug, info, warn};

use super::{Stage, WatermarkFilter, WatermarkMatcher};
use crate::pdf::content::{decode_pdf_string, read_page_operations, write_page_operations};

/// Operators whose string operands are shown on the page.
const TEXT_SHOWING_OPERATORS: &[&str] = &["Tj", "TJ", "'", "\""];

#[derive(Debug, Default)]
pub struct TextFilter;

impl WatermarkFilter for TextFilter {
    fn stage(&self) -> Stage {
        Stage::TextBlocks
    }

    fn apply(&self, document: &mut Document, matcher: &WatermarkMatcher) -> usize {
        let mut removed = 0;

        for (page_number, page_id) in document.get_pages() {
            let operations = match read_page_operations(document, page_id) {
                Ok(operations) => operations,
                Err(err) => {
                    debug!(page = page_number, error = %err, "Skipping text on page");
                    continue;
                }
            };

            let (mut kept, dropped) = drop_watermark_blocks(operations, matcher);
            let scrubbed = scrub_operands(&mut kept, matcher);

            if dropped == 0 && scrubbed == 0 {
                continue;
            }
            if dropped > 0 {
                info!(page = page_number, blocks = dropped, "Removed watermark text");
            }
            if scrubbed > 0 {
                debug!(page = page_number, operands = scrubbed, "Scrubbed watermark fragments");
            }

            match write_page_operations(document, page_id, kept) {
                Ok(()) => removed += dropped,
                Err(err) => warn!(page = page_number, error = %err, "Could not rewrite page content"),
            }
        }

        removed
    }
}

/// Split `operations` into text blocks and drop the ones that match.
///
/// Returns the kept operations and the number of blocks dropped. A `BT`
/// without a closing `ET` is kept as-is.
fn drop_watermark_blocks(
    operations: Vec<Operation>,
    matcher: &WatermarkMatcher,
) -> (Vec<Operation>, usize) {
    let mut kept = Vec::with_capacity(operations.len());
    let mut block: Option<Vec<Operation>> = None;
    let mut dropped = 0;

    for operation in operations {
        match operation.operator.as_str() {
            "BT" => {
                if let Some(open) = block.take() {
                    kept.extend(open);
                }
                block = Some(vec![operation]);
            }
            "ET" => match block.take() {
                Some(mut open) => {
                    open.push(operation);
                    if matcher.contains_keyword(&block_text(&open)) {
                        dropped += 1;
                    } else {
                        kept.extend(open);
                    }
                }
                None => kept.push(operation),
            },
            _ => match block.as_mut() {
                Some(open) => open.push(operation),
                None => kept.push(operation),
            },
        }
    }

    if let Some(open) = block {
        kept.extend(open);
    }
    (kept, dropped)
}

/// Concatenated text shown by a block.
fn block_text(operations: &[Operation]) -> String {
    let mut text = String::new();
    for operation in operations {
        if !TEXT_SHOWING_OPERATORS.contains(&operation.operator.as_str()) {
            continue;
        }
        for operand in shown_operands(operation) {
            match operand {
                Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes)),
                Object::Array(items) => {
                    for item in items {
                        if let Object::String(bytes, _) = item {
                            text.push_str(&decode_pdf_string(bytes));
                        }
                    }
                }
                _ => {}
            }
        }
    }
    text
}

/// The operands of a text-showing operator that carry shown text.
///
/// `"` takes word and character spacing first; only its last operand is text.
fn shown_operands(operation: &Operation) -> &[Object] {
    if operation.operator == "\"" {
        let len = operation.operands.len();
        &operation.operands[len.saturating_sub(1)..]
    } else {
        &operation.operands
    }
}

/// Remove pattern occurrences from the string operands of text-showing
/// operators. Returns how many operands changed.
fn scrub_operands(operations: &mut [Operation], matcher: &WatermarkMatcher) -> usize {
    let mut changed = 0;
    for operation in operations.iter_mut() {
        if !TEXT_SHOWING_OPERATORS.contains(&operation.operator.as_str()) {
            continue;
        }
        for operand in operation.operands.iter_mut() {
            match operand {
                Object::String(bytes, _) => changed += scrub_bytes(bytes, matcher),
                Object::Array(items) => {
                    for item in items.iter_mut() {
                        if let Object::String(bytes, _) = item {
                            changed += scrub_bytes(bytes, matcher);
                        }
                    }
                }
                _ => {}
            }
        }
    }
    changed
}

fn scrub_bytes(bytes: &mut Vec<u8>, matcher: &WatermarkMatcher) -> usize {
    match matcher.scrub(bytes) {
        Some(cleaned) => {
            *bytes = cleaned;
            1
        }
        None => 0,
    }
}
