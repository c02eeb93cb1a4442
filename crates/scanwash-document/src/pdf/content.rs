// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content stream and object helpers shared by the filters: resolving indirect
// objects, decoding PDF text strings, reading/writing page operations, and
// locating a page's XObject resources (including inherited ones).

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Page-tree depth after which `/Parent` chains are assumed to be cyclic.
const MAX_TREE_DEPTH: usize = 32;

/// Operators that only change graphics state and paint nothing.
const STATE_ONLY_OPERATORS: &[&str] = &["cm", "gs", "w", "J", "j", "M", "d", "ri", "i"];

/// Follow a single level of indirection.
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Resolve `key` in `dict` to a dictionary, following one reference.
pub(crate) fn resolve_dict<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    let value = dict.get(key).ok()?;
    match resolve(doc, value)? {
        Object::Dictionary(inner) => Some(inner),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// Resolve a numeric entry to an unsigned integer.
pub(crate) fn resolve_u32(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<u32> {
    match resolve(doc, dict.get(key).ok()?)? {
        Object::Integer(value) => u32::try_from(*value).ok(),
        Object::Real(value) if *value >= 0.0 => Some(*value as u32),
        _ => None,
    }
}

/// Resolve a string entry and decode it as PDF text.
pub(crate) fn resolve_text(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match resolve(doc, dict.get(key).ok()?)? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Whether `dict` has `/key /expected`.
pub(crate) fn has_name(dict: &Dictionary, key: &[u8], expected: &[u8]) -> bool {
    matches!(dict.get(key), Ok(Object::Name(name)) if name.as_slice() == expected)
}

/// Decode a PDF text string.
///
/// UTF-16BE and UTF-8 are recognised by their byte-order marks; everything
/// else is treated as a single-byte encoding and mapped through Latin-1, which
/// keeps ASCII watermark text intact for standard and WinAnsi fonts.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&b| b as char).collect()
}

// -- Page content -------------------------------------------------------------

/// Decode every content stream of a page into one operation list.
pub(crate) fn read_page_operations(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Vec<Operation>, String> {
    let bytes = doc
        .get_page_content(page_id)
        .map_err(|err| format!("cannot read content stream: {}", err))?;
    let content =
        Content::decode(&bytes).map_err(|err| format!("cannot decode content stream: {}", err))?;
    Ok(content.operations)
}

/// Replace a page's content with `operations`, stored as one new stream.
///
/// The previous streams are left unreferenced; callers prune them.
pub(crate) fn write_page_operations(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<(), String> {
    let bytes = Content { operations }
        .encode()
        .map_err(|err| format!("cannot encode content stream: {}", err))?;
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), bytes));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| format!("cannot update page {:?}: {}", page_id, err))?;
    page.set("Contents", Object::Reference(stream_id));
    Ok(())
}

/// Drop `q … Q` blocks that are left holding only graphics-state operators.
///
/// Removing a `Do` typically leaves `q <matrix> cm Q` behind; such blocks paint
/// nothing. Nested empty blocks collapse from the inside out.
pub(crate) fn prune_empty_state_blocks(operations: Vec<Operation>) -> Vec<Operation> {
    let mut output: Vec<Operation> = Vec::with_capacity(operations.len());
    let mut open_blocks: Vec<usize> = Vec::new();

    for operation in operations {
        match operation.operator.as_str() {
            "q" => {
                open_blocks.push(output.len());
                output.push(operation);
            }
            "Q" => {
                if let Some(start) = open_blocks.pop() {
                    let paints_nothing = output[start + 1..]
                        .iter()
                        .all(|op| STATE_ONLY_OPERATORS.contains(&op.operator.as_str()));
                    if paints_nothing {
                        output.truncate(start);
                        continue;
                    }
                }
                output.push(operation);
            }
            _ => output.push(operation),
        }
    }

    output
}

// -- Resources ----------------------------------------------------------------

/// Where a page's `/XObject` dictionary is stored.
///
/// Resources may be inline in the page (or an ancestor page-tree node), an
/// indirect `/Resources` object, or an indirect `/XObject` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum XObjectLocation {
    /// `/XObject` is its own indirect object.
    Standalone(ObjectId),
    /// `/XObject` is inline in an indirect `/Resources` object.
    InResources(ObjectId),
    /// `/Resources` and `/XObject` are both inline in this page-tree node.
    InNode(ObjectId),
}

/// Find the `/XObject` dictionary in effect for a page.
pub(crate) fn locate_xobjects(doc: &Document, page_id: ObjectId) -> Option<XObjectLocation> {
    let mut node_id = page_id;

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_object(node_id).and_then(Object::as_dict).ok()?;

        if let Ok(resources) = node.get(b"Resources") {
            let (resources_dict, resources_id) = match resources {
                Object::Reference(id) => (doc.get_object(*id).and_then(Object::as_dict).ok()?, Some(*id)),
                Object::Dictionary(dict) => (dict, None),
                _ => return None,
            };
            return match resources_dict.get(b"XObject").ok()? {
                Object::Reference(id) => Some(XObjectLocation::Standalone(*id)),
                Object::Dictionary(_) => Some(match resources_id {
                    Some(id) => XObjectLocation::InResources(id),
                    None => XObjectLocation::InNode(node_id),
                }),
                _ => None,
            };
        }

        node_id = match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => *parent,
            _ => return None,
        };
    }

    None
}

/// Borrow the `/XObject` dictionary at `location`.
pub(crate) fn xobjects(doc: &Document, location: XObjectLocation) -> Option<&Dictionary> {
    match location {
        XObjectLocation::Standalone(id) => doc.get_object(id).and_then(Object::as_dict).ok(),
        XObjectLocation::InResources(id) => doc
            .get_object(id)
            .and_then(Object::as_dict)
            .and_then(|resources| resources.get(b"XObject"))
            .and_then(Object::as_dict)
            .ok(),
        XObjectLocation::InNode(id) => doc
            .get_object(id)
            .and_then(Object::as_dict)
            .and_then(|node| node.get(b"Resources"))
            .and_then(Object::as_dict)
            .and_then(|resources| resources.get(b"XObject"))
            .and_then(Object::as_dict)
            .ok(),
    }
}

/// Mutably borrow the `/XObject` dictionary at `location`.
pub(crate) fn xobjects_mut(doc: &mut Document, location: XObjectLocation) -> Option<&mut Dictionary> {
    match location {
        XObjectLocation::Standalone(id) => doc.get_object_mut(id).and_then(Object::as_dict_mut).ok(),
        XObjectLocation::InResources(id) => doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .and_then(|resources| resources.get_mut(b"XObject"))
            .and_then(Object::as_dict_mut)
            .ok(),
        XObjectLocation::InNode(id) => doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .and_then(|node| node.get_mut(b"Resources"))
            .and_then(Object::as_dict_mut)
            .and_then(|resources| resources.get_mut(b"XObject"))
            .and_then(Object::as_dict_mut)
            .ok(),
    }
}
