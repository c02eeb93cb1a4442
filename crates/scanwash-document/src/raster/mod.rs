// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterisation — render cleaned pages to bitmaps and encode them as PNG or
// multi-page TIFF.

pub mod encode;
pub mod render;

pub use encode::{TiffWriter, encode_png, write_png};
pub use render::{PageRasterizer, PdfiumRasterizer, RenderedPage};
