// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwash-document — Watermark removal for scanned PDFs.
//
// Provides PDF loading, the four watermark filters (annotations, images, text
// blocks, metadata), the fixed-order pipeline that runs them, and export of
// the cleaned document to PDF, PNG, or multi-page TIFF.

pub mod export;
pub mod filter;
pub mod pdf;
pub mod pipeline;
pub mod raster;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export the primary structs so callers can use `scanwash_document::Pipeline` etc.
pub use export::Exporter;
pub use filter::WatermarkMatcher;
pub use pdf::reader::ScanDocument;
pub use pipeline::Pipeline;
pub use raster::render::{PageRasterizer, PdfiumRasterizer, RenderedPage};
