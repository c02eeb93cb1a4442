// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwash watermark remover.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanwashError;

/// Output formats produced by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// The cleaned document saved as PDF.
    #[default]
    Pdf,
    /// One PNG per page.
    Png,
    /// A single multi-page TIFF.
    #[serde(alias = "tiff")]
    Tif,
}

impl ExportFormat {
    /// File extension (without the dot) used for derived output names.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Tif => "tif",
        }
    }

    /// Upper-case label used in the summary report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Png => "PNG",
            Self::Tif => "TIF",
        }
    }

    /// Whether pages are rasterised for this format.
    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Png | Self::Tif)
    }
}

impl FromStr for ExportFormat {
    type Err = ScanwashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            "tif" | "tiff" => Ok(Self::Tif),
            other => Err(ScanwashError::Config(format!(
                "unknown export format '{other}' (expected pdf, png, or tif)"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Document information fields inspected by the metadata sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataField {
    Title,
    Subject,
    Author,
    Keywords,
    Creator,
    Producer,
}

impl MetadataField {
    /// Every field, in the order they are sanitised.
    pub const ALL: [MetadataField; 6] = [
        Self::Title,
        Self::Subject,
        Self::Author,
        Self::Keywords,
        Self::Creator,
        Self::Producer,
    ];

    /// Key of the field in the PDF `/Info` dictionary.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Subject => "Subject",
            Self::Author => "Author",
            Self::Keywords => "Keywords",
            Self::Creator => "Creator",
            Self::Producer => "Producer",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-run removal counters, one per filter stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalStats {
    /// Pages in the loaded document.
    pub pages: usize,
    pub annotations: usize,
    pub images: usize,
    pub text_blocks: usize,
    /// Metadata fields cleared.
    pub metadata: usize,
}

impl RemovalStats {
    /// Sum of all removal counters (the page count is not a removal).
    pub fn total_removed(&self) -> usize {
        self.annotations + self.images + self.text_blocks + self.metadata
    }
}

/// What happened to a single page during a raster export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// The page was written to its own file.
    Written(PathBuf),
    /// The page was rendered and added as a frame of a multi-page file.
    Framed,
    /// Rendering or encoding failed; the message is the underlying cause.
    Failed(String),
}

/// Outcome of exporting one page (1-based page number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub page: u32,
    pub status: PageStatus,
}

impl PageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, PageStatus::Failed(_))
    }
}

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub format: ExportFormat,
    /// Files written to disk, in page order.
    pub files: Vec<PathBuf>,
    /// One entry per page for raster exports; empty for PDF.
    pub pages: Vec<PageOutcome>,
}

impl ExportSummary {
    /// Page numbers that failed to export.
    pub fn failed_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|outcome| outcome.is_failed())
            .map(|outcome| outcome.page)
            .collect()
    }

    /// True when at least one file was written and no page failed.
    pub fn is_success(&self) -> bool {
        !self.files.is_empty() && self.pages.iter().all(|outcome| !outcome.is_failed())
    }
}
