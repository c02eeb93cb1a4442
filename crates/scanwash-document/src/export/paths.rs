// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output naming for cleaned documents.

use std::path::{Path, PathBuf};

use scanwash_core::ExportFormat;
use scanwash_core::error::ScanwashError;

const CLEANED_SUFFIX: &str = "_cleaned";

/// Default output path for `input`, next to it.
///
/// PDF and TIFF get `<stem>_cleaned.<ext>`; PNG gets the extension-less base
/// `<stem>_cleaned` that page numbers are appended to.
pub fn derive_output_path(input: &Path, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let name = match format {
        ExportFormat::Png => format!("{stem}{CLEANED_SUFFIX}"),
        other => format!("{stem}{CLEANED_SUFFIX}.{}", other.extension()),
    };
    input.with_file_name(name)
}

/// Base name for PNG pages; a trailing `.png` is dropped.
pub fn png_base(target: &Path) -> PathBuf {
    let is_png = target
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        target.with_extension("")
    } else {
        target.to_path_buf()
    }
}

/// `<base>_page_<n>.png`
pub fn png_page_path(base: &Path, page: u32) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!("_page_{page}.png"));
    PathBuf::from(name)
}

/// Reject a target whose parent directory does not exist.
///
/// Checked before any processing so a bad `--output` fails fast.
pub fn check_output_target(target: &Path) -> Result<(), ScanwashError> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(ScanwashError::Config(format!(
                "output directory does not exist: {}",
                parent.display()
            )))
        }
        _ => Ok(()),
    }
}
