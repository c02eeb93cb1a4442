// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the scanwash-document crate.
// Benchmarks the full filter pipeline on a synthetic multi-page scan carrying
// every kind of watermark.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

use scanwash_core::WatermarkProfile;
use scanwash_document::{Pipeline, ScanDocument};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// Build a PDF of `pages` pages, each with a full-page scan image, a logo, a
/// watermark link, a watermark footer, and a line of body text.
fn watermarked_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let image = |width: i64, height: i64| {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0xff; 64],
        )
    };

    let mut kids = Vec::new();
    for _ in 0..pages {
        let scan_id = doc.add_object(image(2480, 3508));
        let logo_id = doc.add_object(image(240, 80));

        let mut operations = Vec::new();
        for (name, w, h) in [("Scan", 612, 792), ("Logo", 120, 40)] {
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
            operations.push(Operation::new("Q", vec![]));
        }
        for (text, y) in [("Quarterly statement", 700), ("Scanned with CamScanner", 20)] {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![72.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations }.encode().unwrap_or_default();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let link_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![0.into(), 0.into(), 200.into(), 20.into()],
            "A" => dictionary! {
                "S" => "URI",
                "URI" => Object::string_literal("https://www.camscanner.com/user/download"),
            },
        });

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Annots" => vec![Object::Reference(link_id)],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => dictionary! { "Scan" => scan_id, "Logo" => logo_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => count }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal("CamScanner"),
        "Title" => Object::string_literal("Statement"),
    });
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    if doc.save_to(&mut bytes).is_err() {
        bytes.clear();
    }
    bytes
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Load a 20-page watermarked scan and run all four filter stages.
fn bench_pipeline(c: &mut Criterion) {
    let pdf = watermarked_pdf(20);
    let pipeline = match Pipeline::new(&WatermarkProfile::default()) {
        Ok(pipeline) => pipeline,
        Err(err) => panic!("default profile rejected: {err}"),
    };

    c.bench_function("pipeline (20 pages)", |b| {
        b.iter(|| {
            let Ok(mut document) = ScanDocument::from_bytes(black_box(&pdf)) else {
                return;
            };
            black_box(pipeline.run(&mut document));
        });
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
