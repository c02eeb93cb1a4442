// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwash.

use thiserror::Error;

/// Top-level error type for all Scanwash operations.
///
/// `Load` and `Config` are raised before the document is mutated. `Export`
/// covers save, rasterise, and encode failures; per-page export failures are
/// collected as [`crate::PageOutcome`]s instead of being returned.
#[derive(Debug, Error)]
pub enum ScanwashError {
    // -- Input --
    #[error("failed to load PDF: {0}")]
    Load(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Output --
    #[error("export failed: {0}")]
    Export(String),
}

impl ScanwashError {
    /// Whether the error was raised before any processing started.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwashError>;
