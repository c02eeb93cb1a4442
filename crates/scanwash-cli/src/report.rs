// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Console report — banner and the fixed-format summary block.

use std::fmt::Write;

use scanwash_core::{Dpi, ExportSummary, PageStatus, RemovalStats};

const RULE_WIDTH: usize = 70;
const BRAND: &str = "Scanwash — scanned PDF watermark remover";

fn rule() -> String {
    "═".repeat(RULE_WIDTH)
}

/// Heading printed before processing starts.
pub fn banner() -> String {
    format!("{}\n  {}\n{}", rule(), BRAND, rule())
}

/// Summary of removal counts and written files.
pub fn summary(stats: &RemovalStats, export: &ExportSummary, dpi: Dpi) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", rule());
    let _ = writeln!(out, "  SUMMARY");
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "  Pages processed:       {}", stats.pages);
    let _ = writeln!(out, "  Annotations removed:   {}", stats.annotations);
    let _ = writeln!(out, "  Images removed:        {}", stats.images);
    let _ = writeln!(out, "  Text blocks removed:   {}", stats.text_blocks);
    let _ = writeln!(out, "  Metadata cleaned:      {}", stats.metadata);
    let _ = writeln!(out, "  ───────────────────────");
    let _ = writeln!(out, "  TOTAL REMOVED:         {}", stats.total_removed());
    let _ = writeln!(out, "  Export format:         {}", export.format.label());
    if export.format.is_raster() {
        let _ = writeln!(out, "  Resolution:            {} DPI", dpi);
    }

    for file in &export.files {
        let _ = writeln!(out, "  Written:               {}", file.display());
    }
    for outcome in &export.pages {
        if let PageStatus::Failed(reason) = &outcome.status {
            let _ = writeln!(out, "  Page {} failed:        {}", outcome.page, reason);
        }
    }
    let _ = write!(out, "{}", rule());
    out
}
