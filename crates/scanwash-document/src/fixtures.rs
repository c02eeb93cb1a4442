// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test fixtures — synthetic scanned PDFs built with lopdf, inspection helpers,
// and a rasterizer that needs no native library.

use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream,
    dictionary,
};
use scanwash_core::Dpi;
use scanwash_core::error::ScanwashError;

use crate::pdf::content::{decode_pdf_string, locate_xobjects, read_page_operations, xobjects};
use crate::raster::render::{PageRasterizer, RenderedPage};

/// Contents of one synthetic page.
#[derive(Debug, Clone)]
pub struct FixturePage {
    /// URIs of `/Link` annotations.
    pub links: Vec<String>,
    /// `/Contents` of `/Text` (sticky note) annotations.
    pub notes: Vec<String>,
    /// Image XObjects as (resource name, pixel width, pixel height).
    pub images: Vec<(String, u32, u32)>,
    /// One `BT … ET` block per entry.
    pub texts: Vec<String>,
    pub width: f32,
    pub height: f32,
}

impl Default for FixturePage {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            notes: Vec::new(),
            images: Vec::new(),
            texts: Vec::new(),
            width: 612.0,
            height: 792.0,
        }
    }
}

/// Build an in-memory document with the given pages and `/Info` entries.
pub fn build_document(pages: &[FixturePage], info: &[(&str, &str)]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for page in pages {
        let mut xobjects = Dictionary::new();
        let mut operations = Vec::new();

        for (name, width, height) in &page.images {
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => *width as i64,
                    "Height" => *height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                vec![0x80; 16],
            );
            let image_id = doc.add_object(image);
            xobjects.set(name.as_str(), image_id);

            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![100.into(), 0.into(), 0.into(), 100.into(), 72.into(), 72.into()],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
            operations.push(Operation::new("Q", vec![]));
        }

        for (index, text) in page.texts.iter().enumerate() {
            let y = 720 - 20 * index as i64;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![72.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text.as_str())]));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().unwrap_or_default(),
        ));

        let mut annotations = Vec::new();
        for uri in &page.links {
            let link = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => vec![0.into(), 0.into(), 100.into(), 20.into()],
                "A" => dictionary! {
                    "S" => "URI",
                    "URI" => Object::string_literal(uri.as_str()),
                },
            });
            annotations.push(Object::Reference(link));
        }
        for note in &page.notes {
            let text = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Text",
                "Rect" => vec![0.into(), 0.into(), 20.into(), 20.into()],
                "Contents" => Object::string_literal(note.as_str()),
            });
            annotations.push(Object::Reference(text));
        }

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => xobjects,
            },
        };
        if !annotations.is_empty() {
            page_dict.set("Annots", annotations);
        }
        kids.push(Object::Reference(doc.add_object(page_dict)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if !info.is_empty() {
        let mut info_dict = Dictionary::new();
        for (key, value) in info {
            info_dict.set(*key, Object::string_literal(*value));
        }
        let info_id = doc.add_object(info_dict);
        doc.trailer.set("Info", info_id);
    }

    doc
}

/// Serialise [`build_document`] to PDF bytes.
pub fn build_pdf(pages: &[FixturePage], info: &[(&str, &str)]) -> Vec<u8> {
    let mut doc = build_document(pages, info);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Serialise [`build_document`] encrypted with RC4-128 under `user_password`.
pub fn build_encrypted_pdf(pages: &[FixturePage], user_password: &str) -> Vec<u8> {
    let mut doc = build_document(pages, &[]);
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::string_literal("scanwash-fixture"),
            Object::string_literal("scanwash-fixture"),
        ]),
    );
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Move page 1's `/Resources` onto its parent `/Pages` node and strip
/// `/Resources` from every page, so all pages inherit one dictionary.
pub fn inherit_resources(doc: &mut Document) {
    let pages = doc.get_pages();
    let first = pages[&1];
    let (resources, parent) = {
        let page = doc.get_object(first).and_then(Object::as_dict).unwrap();
        (
            page.get(b"Resources").unwrap().clone(),
            page.get(b"Parent").and_then(Object::as_reference).unwrap(),
        )
    };
    for page_id in pages.values() {
        doc.get_object_mut(*page_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .remove(b"Resources");
    }
    doc.get_object_mut(parent)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Resources", resources);
}

/// Replace a page's inline `/Annots` array with a reference to it.
pub fn make_annots_indirect(doc: &mut Document, page: u32) {
    let page_id = doc.get_pages()[&page];
    let annots = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .remove(b"Annots")
        .unwrap();
    let annots_id = doc.add_object(annots);
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Annots", annots_id);
}

fn page_dict(doc: &Document, page: u32) -> &Dictionary {
    let page_id = doc.get_pages()[&page];
    doc.get_object(page_id).and_then(Object::as_dict).unwrap()
}

/// Number of annotations on a page (0 when `/Annots` is absent).
pub fn annotation_count(doc: &Document, page: u32) -> usize {
    match page_dict(doc, page).get(b"Annots") {
        Ok(Object::Array(entries)) => entries.len(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_array)
            .map(Vec::len)
            .unwrap_or(0),
        _ => 0,
    }
}

/// Sorted XObject resource names in effect for a page.
pub fn xobject_names(doc: &Document, page: u32) -> Vec<String> {
    let page_id = doc.get_pages()[&page];
    let Some(entries) = locate_xobjects(doc, page_id).and_then(|loc| xobjects(doc, loc)) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .iter()
        .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
        .collect();
    names.sort();
    names
}

/// Operators of a page's content, in order.
pub fn page_operators(doc: &Document, page: u32) -> Vec<String> {
    let page_id = doc.get_pages()[&page];
    read_page_operations(doc, page_id)
        .unwrap()
        .into_iter()
        .map(|op| op.operator)
        .collect()
}

/// Text shown by `Tj` operations on a page, concatenated.
pub fn page_text(doc: &Document, page: u32) -> String {
    let page_id = doc.get_pages()[&page];
    read_page_operations(doc, page_id)
        .unwrap()
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(decode_pdf_string(bytes)),
            _ => None,
        })
        .collect()
}

/// A decoded `/Info` entry.
pub fn info_value(doc: &Document, key: &str) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).and_then(Object::as_dict).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    match info.get(key.as_bytes()).ok()? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Renders each page as a blank bitmap sized from its `/MediaBox`.
#[derive(Debug, Default)]
pub struct FakeRasterizer {
    failing_page: Option<u32>,
}

impl FakeRasterizer {
    /// A rasterizer that reports a render failure for `page`.
    pub fn failing_on(page: u32) -> Self {
        Self {
            failing_page: Some(page),
        }
    }
}

impl PageRasterizer for FakeRasterizer {
    fn render_pages(
        &self,
        pdf: &[u8],
        dpi: Dpi,
        on_page: &mut dyn FnMut(RenderedPage),
    ) -> Result<(), ScanwashError> {
        let doc = Document::load_mem(pdf)
            .map_err(|err| ScanwashError::Export(format!("fake render: {}", err)))?;

        for (page, page_id) in doc.get_pages() {
            if self.failing_page == Some(page) {
                on_page(RenderedPage {
                    page,
                    image: Err("simulated render failure".into()),
                });
                continue;
            }

            let (width, height) = media_box_size(&doc, page_id).unwrap_or((612.0, 792.0));
            let bitmap = RgbImage::from_pixel(
                dpi.pixels_for(width),
                dpi.pixels_for(height),
                Rgb([255, 255, 255]),
            );
            on_page(RenderedPage {
                page,
                image: Ok(DynamicImage::ImageRgb8(bitmap)),
            });
        }
        Ok(())
    }
}

fn media_box_size(doc: &Document, page_id: lopdf::ObjectId) -> Option<(f32, f32)> {
    let page = doc.get_object(page_id).and_then(Object::as_dict).ok()?;
    let Ok(Object::Array(bounds)) = page.get(b"MediaBox") else {
        return None;
    };
    let number = |object: &Object| match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    };
    let values: Vec<f32> = bounds.iter().filter_map(number).collect();
    match values.as_slice() {
        [x0, y0, x1, y1] => Some(((x1 - x0).abs(), (y1 - y0).abs())),
        _ => None,
    }
}
