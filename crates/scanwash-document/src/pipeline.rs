// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cleaning pipeline — runs the four watermark filters in fixed order over one
// loaded document and collects their counts.

use scanwash_core::error::ScanwashError;
use scanwash_core::{RemovalStats, WatermarkProfile};
use tracing::{debug, info, instrument};

use crate::filter::{
    AnnotationFilter, ImageFilter, MetadataFilter, TextFilter, WatermarkFilter, WatermarkMatcher,
};
use crate::pdf::reader::ScanDocument;

/// Ordered list of filter stages sharing one matcher.
///
/// Stages run annotations, images, text blocks, then metadata. Each mutates
/// the document in place; nothing is written to disk here.
pub struct Pipeline {
    matcher: WatermarkMatcher,
    stages: Vec<Box<dyn WatermarkFilter>>,
}

impl Pipeline {
    /// Build the pipeline for a watermark profile.
    ///
    /// Fails with [`ScanwashError::Config`] if the profile is invalid.
    pub fn new(profile: &WatermarkProfile) -> Result<Self, ScanwashError> {
        let matcher = WatermarkMatcher::new(profile)?;
        let stages: Vec<Box<dyn WatermarkFilter>> = vec![
            Box::new(AnnotationFilter),
            Box::new(ImageFilter::new(profile.image_threshold)),
            Box::new(TextFilter),
            Box::new(MetadataFilter::new(profile.metadata_fields.clone())),
        ];
        Ok(Self { matcher, stages })
    }

    /// Run every stage over `document` and return the per-stage counts.
    #[instrument(skip_all, fields(pages = document.page_count()))]
    pub fn run(&self, document: &mut ScanDocument) -> RemovalStats {
        let mut stats = RemovalStats {
            pages: document.page_count(),
            ..Default::default()
        };
        let total_steps = self.stages.len();

        for (index, stage) in self.stages.iter().enumerate() {
            let step = stage.stage();
            info!("Step {}/{}: {}...", index + 1, total_steps, step.label());
            let removed = stage.apply(document.document_mut(), &self.matcher);
            info!("{}: removed {}", step.label(), removed);
            step.record(&mut stats, removed);
        }

        // Rewritten pages leave their previous content streams unreferenced;
        // those still hold the watermark text.
        let pruned = document.document_mut().prune_objects();
        debug!(objects = pruned.len(), "Pruned orphaned objects");

        info!(total = stats.total_removed(), "Watermark removal finished");
        stats
    }
}
