// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark filters — one stage per kind of watermark element, all sharing a
// single case-insensitive pattern matcher built from the profile.

pub mod annotations;
pub mod images;
pub mod metadata;
pub mod text;

use lopdf::Document;
use regex::bytes::Regex;
use scanwash_core::error::ScanwashError;
use scanwash_core::{RemovalStats, WatermarkProfile};

pub use annotations::AnnotationFilter;
pub use images::ImageFilter;
pub use metadata::MetadataFilter;
pub use text::TextFilter;

/// The four filter stages, in the order the pipeline runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Annotations,
    Images,
    TextBlocks,
    Metadata,
}

impl Stage {
    /// Short label used in progress logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Annotations => "Annotations",
            Self::Images => "Images",
            Self::TextBlocks => "Text",
            Self::Metadata => "Metadata",
        }
    }

    /// Store a stage's removal count in the matching counter.
    pub fn record(&self, stats: &mut RemovalStats, removed: usize) {
        match self {
            Self::Annotations => stats.annotations = removed,
            Self::Images => stats.images = removed,
            Self::TextBlocks => stats.text_blocks = removed,
            Self::Metadata => stats.metadata = removed,
        }
    }
}

/// A single pass over the document that removes one kind of watermark element.
///
/// Filters never fail: anything they cannot inspect is treated as "no match"
/// and left in place.
pub trait WatermarkFilter {
    fn stage(&self) -> Stage;

    /// Remove matching elements and return how many were removed.
    fn apply(&self, document: &mut Document, matcher: &WatermarkMatcher) -> usize;
}

/// Case-insensitive matcher over the profile's keywords and domains.
pub struct WatermarkMatcher {
    /// Lower-cased keywords.
    keywords: Vec<String>,
    /// Lower-cased domain fragments.
    domains: Vec<String>,
    /// Keywords and domains as one alternation, longest first, for scrubbing
    /// raw string operands. `None` when the profile has no patterns.
    scrub_pattern: Option<Regex>,
}

impl WatermarkMatcher {
    pub fn new(profile: &WatermarkProfile) -> Result<Self, ScanwashError> {
        profile.validate()?;

        let lower = |items: &[String]| -> Vec<String> {
            items.iter().map(|item| item.to_lowercase()).collect()
        };
        let keywords = lower(&profile.keywords);
        let domains = lower(&profile.watermark_domains);

        let mut patterns: Vec<&str> = profile
            .keywords
            .iter()
            .chain(profile.watermark_domains.iter())
            .map(String::as_str)
            .collect();
        patterns.sort_by_key(|pattern| std::cmp::Reverse(pattern.len()));

        let scrub_pattern = if patterns.is_empty() {
            None
        } else {
            let alternation: Vec<String> = patterns.iter().map(|p| regex::escape(p)).collect();
            let source = format!("(?i)(?:{})", alternation.join("|"));
            Some(Regex::new(&source).map_err(|err| {
                ScanwashError::Config(format!("cannot compile watermark patterns: {}", err))
            })?)
        };

        Ok(Self {
            keywords,
            domains,
            scrub_pattern,
        })
    }

    /// Whether `text` contains any watermark keyword.
    pub fn contains_keyword(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        self.keywords.iter().any(|keyword| lower.contains(keyword.as_str()))
    }

    /// Whether `uri` points at a watermark domain.
    pub fn is_watermark_url(&self, uri: &str) -> bool {
        if uri.is_empty() {
            return false;
        }
        let lower = uri.to_lowercase();
        self.domains.iter().any(|domain| lower.contains(domain.as_str()))
    }

    /// Whether `text` contains a keyword or a domain fragment.
    pub fn contains_indicator(&self, text: &str) -> bool {
        self.contains_keyword(text) || self.is_watermark_url(text)
    }

    /// Remove every literal pattern occurrence from `bytes`.
    ///
    /// Returns `None` when nothing matched.
    pub fn scrub(&self, bytes: &[u8]) -> Option<Vec<u8>> {
        let pattern = self.scrub_pattern.as_ref()?;
        if !pattern.is_match(bytes) {
            return None;
        }
        Some(pattern.replace_all(bytes, &b""[..]).into_owned())
    }
}
