// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::ScanwashError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change something (flag value, path, permissions).
    ActionRequired,
    /// Cannot be fixed by retrying — damaged or protected input, etc.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `ScanwashError` into a `HumanError`.
pub fn humanize_error(err: &ScanwashError) -> HumanError {
    match err {
        ScanwashError::Load(detail) => humanize_load_error(detail),

        ScanwashError::Config(detail) => HumanError {
            message: "One of the options isn't valid.".into(),
            suggestion: format!("Check the command line and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        ScanwashError::Export(detail) => HumanError {
            message: "The cleaned document couldn't be written.".into(),
            suggestion: format!(
                "Check that the output folder exists and is writable, or try --format pdf. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },
    }
}

fn humanize_load_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("not found") || lower.contains("no such file") {
        HumanError {
            message: "The input file couldn't be found.".into(),
            suggestion: "Check the path and try again.".into(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("encrypt") || lower.contains("password") {
        HumanError {
            message: "This PDF is password protected.".into(),
            suggestion: "Remove the password with the application that created it, then try again."
                .into(),
            severity: Severity::Permanent,
        }
    } else {
        HumanError {
            message: "This doesn't look like a readable PDF.".into(),
            suggestion: format!(
                "The file may be damaged. Try opening it in a PDF viewer first. ({detail})"
            ),
            severity: Severity::Permanent,
        }
    }
}
