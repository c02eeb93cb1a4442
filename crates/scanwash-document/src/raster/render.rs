// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rendering — turns PDF bytes into one bitmap per page using PDFium.

use image::DynamicImage;
use pdfium_render::prelude::*;
use scanwash_core::Dpi;
use scanwash_core::error::ScanwashError;
use tracing::{debug, info, instrument, warn};

/// One rendered page, delivered in page order.
pub struct RenderedPage {
    /// 1-based page number.
    pub page: u32,
    /// The bitmap, or why this page could not be rendered.
    pub image: Result<DynamicImage, String>,
}

/// Renders every page of a PDF at a given resolution.
///
/// Pages are handed to `on_page` one at a time so callers can encode and drop
/// each bitmap before the next one is rendered. An `Err` return means the
/// document as a whole could not be rendered; single-page failures are
/// reported through [`RenderedPage::image`] instead.
pub trait PageRasterizer {
    fn render_pages(
        &self,
        pdf: &[u8],
        dpi: Dpi,
        on_page: &mut dyn FnMut(RenderedPage),
    ) -> Result<(), ScanwashError>;
}

/// [`PageRasterizer`] backed by a dynamically loaded PDFium library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind to libpdfium.
    ///
    /// Looks in the current directory, then `./vendor/pdfium/lib/`, then the
    /// system library path.
    pub fn bind() -> Result<Self, ScanwashError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    "./vendor/pdfium/lib/",
                ))
            })
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|err| {
                ScanwashError::Export(format!(
                    "failed to load the PDFium library (install libpdfium or place it next to the binary): {:?}",
                    err
                ))
            })?;

        debug!("PDFium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    #[instrument(skip_all, fields(pdf_len = pdf.len(), dpi = dpi.get()))]
    fn render_pages(
        &self,
        pdf: &[u8],
        dpi: Dpi,
        on_page: &mut dyn FnMut(RenderedPage),
    ) -> Result<(), ScanwashError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|err| ScanwashError::Export(format!("failed to render PDF: {:?}", err)))?;

        let pages = document.pages();
        info!(pages = pages.len(), "Rendering pages");

        for (index, page) in pages.iter().enumerate() {
            let number = index as u32 + 1;
            let width = dpi.pixels_for(page.width().value);
            let height = dpi.pixels_for(page.height().value);

            let config = PdfRenderConfig::new()
                .set_target_width(width as i32)
                .set_maximum_height(height as i32);

            let image = page
                .render_with_config(&config)
                .map(|bitmap| bitmap.as_image())
                .map_err(|err| format!("{:?}", err));

            match &image {
                Ok(bitmap) => debug!(
                    page = number,
                    width = bitmap.width(),
                    height = bitmap.height(),
                    "Page rendered"
                ),
                Err(err) => warn!(page = number, error = %err, "Page render failed"),
            }

            on_page(RenderedPage {
                page: number,
                image,
            });
        }

        Ok(())
    }
}
