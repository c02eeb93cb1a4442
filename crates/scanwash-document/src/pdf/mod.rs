// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — loading, serialising, and content-stream access.

pub mod content;
pub mod reader;

pub use reader::ScanDocument;
