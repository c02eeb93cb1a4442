// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exporter — writes the cleaned document as PDF, one PNG per page, or a single
// multi-page TIFF.

pub mod paths;

use std::path::Path;

use scanwash_core::error::ScanwashError;
use scanwash_core::{Dpi, ExportFormat, ExportSummary, PageOutcome, PageStatus};
use tracing::{info, instrument, warn};

use crate::pdf::reader::ScanDocument;
use crate::raster::encode::{TiffWriter, write_png};
use crate::raster::render::{PageRasterizer, RenderedPage};

pub use paths::{check_output_target, derive_output_path, png_base, png_page_path};

/// Writes a cleaned document in one output format.
#[derive(Debug, Clone, Copy)]
pub struct Exporter {
    format: ExportFormat,
    dpi: Dpi,
}

impl Exporter {
    pub fn new(format: ExportFormat, dpi: Dpi) -> Self {
        Self { format, dpi }
    }

    /// Export `document` to `target`.
    ///
    /// For PNG, `target` is the base name pages are numbered from. Raster
    /// formats need a `rasterizer`. Per-page failures are recorded in the
    /// summary rather than returned as errors.
    #[instrument(skip(self, document, rasterizer), fields(format = %self.format, target = %target.display()))]
    pub fn export(
        &self,
        document: &mut ScanDocument,
        target: &Path,
        rasterizer: Option<&dyn PageRasterizer>,
    ) -> Result<ExportSummary, ScanwashError> {
        match self.format {
            ExportFormat::Pdf => {
                document.save(target)?;
                Ok(ExportSummary {
                    format: ExportFormat::Pdf,
                    files: vec![target.to_path_buf()],
                    pages: Vec::new(),
                })
            }
            ExportFormat::Png => self.export_png(document, target, require(rasterizer)?),
            ExportFormat::Tif => self.export_tiff(document, target, require(rasterizer)?),
        }
    }

    fn export_png(
        &self,
        document: &mut ScanDocument,
        target: &Path,
        rasterizer: &dyn PageRasterizer,
    ) -> Result<ExportSummary, ScanwashError> {
        let pdf = document.to_bytes()?;
        let base = png_base(target);
        info!("Exporting PNG pages at {} DPI", self.dpi);

        let mut files = Vec::new();
        let mut pages = Vec::new();

        rasterizer.render_pages(&pdf, self.dpi, &mut |rendered: RenderedPage| {
            let status = match rendered.image {
                Ok(image) => {
                    let path = png_page_path(&base, rendered.page);
                    match write_png(&image, self.dpi, &path) {
                        Ok(()) => {
                            info!("Saved page {}: {}", rendered.page, path.display());
                            files.push(path.clone());
                            PageStatus::Written(path)
                        }
                        Err(err) => PageStatus::Failed(err),
                    }
                }
                Err(err) => PageStatus::Failed(err),
            };
            if let PageStatus::Failed(err) = &status {
                warn!(page = rendered.page, error = %err, "Page export failed");
            }
            pages.push(PageOutcome {
                page: rendered.page,
                status,
            });
        })?;

        Ok(ExportSummary {
            format: ExportFormat::Png,
            files,
            pages,
        })
    }

    fn export_tiff(
        &self,
        document: &mut ScanDocument,
        target: &Path,
        rasterizer: &dyn PageRasterizer,
    ) -> Result<ExportSummary, ScanwashError> {
        let pdf = document.to_bytes()?;
        let mut writer = TiffWriter::create(target, self.dpi)?;
        info!("Exporting multi-page TIFF at {} DPI", self.dpi);

        let mut pages = Vec::new();
        let rendered = rasterizer.render_pages(&pdf, self.dpi, &mut |rendered: RenderedPage| {
            let status = match rendered.image.and_then(|image| writer.add_frame(&image)) {
                Ok(()) => PageStatus::Framed,
                Err(err) => {
                    warn!(page = rendered.page, error = %err, "Page skipped");
                    PageStatus::Failed(err)
                }
            };
            pages.push(PageOutcome {
                page: rendered.page,
                status,
            });
        });

        let path = writer.path().to_path_buf();
        let frames = writer.finish();
        if let Err(err) = rendered {
            discard(&path);
            return Err(err);
        }
        if frames == 0 {
            discard(&path);
            return Err(ScanwashError::Export(format!(
                "no page could be rendered into {}",
                path.display()
            )));
        }

        info!("Saved TIFF with {} pages: {}", frames, path.display());
        Ok(ExportSummary {
            format: ExportFormat::Tif,
            files: vec![path],
            pages,
        })
    }
}

fn require(rasterizer: Option<&dyn PageRasterizer>) -> Result<&dyn PageRasterizer, ScanwashError> {
    rasterizer.ok_or_else(|| {
        ScanwashError::Export("raster export requires a page rasterizer".into())
    })
}

/// Remove a partially written output file.
fn discard(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        warn!(path = %path.display(), error = %err, "Could not remove incomplete output");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FakeRasterizer, FixturePage, build_pdf};
    use std::fs::File;
    use std::io::BufReader;

    fn document(pages: usize) -> ScanDocument {
        let fixture: Vec<FixturePage> = (0..pages).map(|_| FixturePage::default()).collect();
        ScanDocument::from_bytes(&build_pdf(&fixture, &[])).unwrap()
    }

    fn dpi(value: u32) -> Dpi {
        Dpi::new(value).unwrap()
    }

    #[test]
    fn pdf_export_writes_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");
        let mut doc = document(2);

        let summary = Exporter::new(ExportFormat::Pdf, Dpi::default())
            .export(&mut doc, &target, None)
            .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.files, vec![target.clone()]);
        assert_eq!(ScanDocument::open(&target).unwrap().page_count(), 2);
    }

    #[test]
    fn png_export_writes_one_file_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("scan_cleaned.png");
        let mut doc = document(3);

        let summary = Exporter::new(ExportFormat::Png, dpi(150))
            .export(&mut doc, &target, Some(&FakeRasterizer::default()))
            .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.files.len(), 3);
        for page in 1..=3 {
            let path = dir.path().join(format!("scan_cleaned_page_{page}.png"));
            let image = image::open(&path).unwrap();
            // US Letter at 150 DPI.
            assert_eq!((image.width(), image.height()), (1275, 1650));
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn png_failed_page_does_not_stop_later_pages() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("scan");
        let mut doc = document(3);
        let rasterizer = FakeRasterizer::failing_on(2);

        let summary = Exporter::new(ExportFormat::Png, dpi(72))
            .export(&mut doc, &target, Some(&rasterizer))
            .unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.failed_pages(), vec![2]);
        assert_eq!(summary.files.len(), 2);
        assert!(dir.path().join("scan_page_3.png").is_file());
    }

    #[test]
    fn tiff_export_has_one_frame_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("scan_cleaned.tif");
        let mut doc = document(2);

        let summary = Exporter::new(ExportFormat::Tif, dpi(72))
            .export(&mut doc, &target, Some(&FakeRasterizer::default()))
            .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.files, vec![target.clone()]);

        let file = BufReader::new(File::open(&target).unwrap());
        let mut decoder = tiff::decoder::Decoder::new(file).unwrap();
        let mut frames = 1;
        while decoder.more_images() {
            decoder.next_image().unwrap();
            frames += 1;
        }
        assert_eq!(frames, 2);
    }

    #[test]
    fn tiff_with_no_frames_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("scan.tif");
        let mut doc = document(1);

        let err = Exporter::new(ExportFormat::Tif, dpi(72))
            .export(&mut doc, &target, Some(&FakeRasterizer::failing_on(1)))
            .unwrap_err();

        assert!(matches!(err, ScanwashError::Export(_)));
        assert!(!target.exists());
    }

    #[test]
    fn raster_without_rasterizer_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = document(1);
        let err = Exporter::new(ExportFormat::Png, Dpi::default())
            .export(&mut doc, &dir.path().join("scan"), None)
            .unwrap_err();
        assert!(matches!(err, ScanwashError::Export(_)));
    }
}
