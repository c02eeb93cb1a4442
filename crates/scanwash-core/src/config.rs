// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration and the watermark signature profile.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanwashError};
use crate::types::{ExportFormat, MetadataField};

/// Pixel-dimension cutoff below which an embedded image is treated as a
/// watermark rather than scanned page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageThreshold {
    pub width: u32,
    pub height: u32,
}

impl ImageThreshold {
    /// An image is a watermark candidate only when both sides are strictly
    /// below the threshold.
    pub fn is_below(&self, width: u32, height: u32) -> bool {
        width < self.width && height < self.height
    }
}

impl Default for ImageThreshold {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
        }
    }
}

/// Known watermark signatures of the scanning application.
///
/// The defaults target CamScanner (Intsig) output. A profile can be loaded from
/// JSON to override any subset of the fields; omitted fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkProfile {
    /// Substrings matched (case-insensitively) against link annotation URIs.
    pub watermark_domains: Vec<String>,
    /// Substrings matched (case-insensitively) against text blocks,
    /// annotation contents, and metadata values.
    pub keywords: Vec<String>,
    pub image_threshold: ImageThreshold,
    /// Info dictionary fields the metadata sanitizer inspects.
    pub metadata_fields: Vec<MetadataField>,
}

impl Default for WatermarkProfile {
    fn default() -> Self {
        Self {
            watermark_domains: ["camscanner.com", "intsig.net", "intsig.com"]
                .into_iter()
                .map(String::from)
                .collect(),
            keywords: [
                "camscanner",
                "intsig",
                "www.camscanner.com",
                "camscanner.com",
                "intsig.net",
                "intsig.com",
                "Scanned with CamScanner",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            image_threshold: ImageThreshold::default(),
            metadata_fields: MetadataField::ALL.to_vec(),
        }
    }
}

impl WatermarkProfile {
    /// Load a profile from a JSON file and validate it.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ScanwashError::Config(format!("cannot read profile {}: {}", path.display(), err))
        })?;
        let profile: Self = serde_json::from_str(&raw).map_err(|err| {
            ScanwashError::Config(format!("invalid profile {}: {}", path.display(), err))
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reject patterns that would match everything.
    ///
    /// An empty or whitespace-only keyword is a substring of every string and
    /// would strip all text and metadata from the document.
    pub fn validate(&self) -> Result<()> {
        let blank = self
            .watermark_domains
            .iter()
            .chain(self.keywords.iter())
            .any(|pattern| pattern.trim().is_empty());
        if blank {
            return Err(ScanwashError::Config(
                "watermark patterns must not be empty".into(),
            ));
        }
        if self.image_threshold.width == 0 || self.image_threshold.height == 0 {
            return Err(ScanwashError::Config(
                "image threshold must be at least 1x1 pixels".into(),
            ));
        }
        Ok(())
    }
}

/// Rasterisation resolution in dots per inch, validated to 72..=1200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Dpi(u32);

impl Dpi {
    pub const MIN: u32 = 72;
    pub const MAX: u32 = 1200;
    pub const DEFAULT: u32 = 300;

    pub fn new(value: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScanwashError::Config(format!(
                "DPI must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Pixels per PDF point (1 pt = 1/72 inch).
    pub fn scale(&self) -> f32 {
        self.0 as f32 / 72.0
    }

    /// Pixel length of a span measured in PDF points, rounded up.
    pub fn pixels_for(&self, points: f32) -> u32 {
        (points * self.scale()).ceil().max(1.0) as u32
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for Dpi {
    type Error = ScanwashError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Dpi> for u32 {
    fn from(dpi: Dpi) -> Self {
        dpi.0
    }
}

impl FromStr for Dpi {
    type Err = ScanwashError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| ScanwashError::Config(format!("invalid DPI '{s}'")))?;
        Self::new(value)
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a single run needs, assembled by the CLI.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub input: PathBuf,
    pub format: ExportFormat,
    pub dpi: Dpi,
    /// Explicit output path; derived from the input name when absent.
    pub output: Option<PathBuf>,
    pub debug: bool,
    pub profile: WatermarkProfile,
}
