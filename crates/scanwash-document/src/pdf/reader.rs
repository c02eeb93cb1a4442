// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document loader — open and validate a scanned PDF using the `lopdf` crate,
// and hand out mutable access to the filters.

use std::path::Path;

use lopdf::Document;
use scanwash_core::error::ScanwashError;
use tracing::{debug, info, instrument, warn};

/// A loaded PDF owned by a single cleaning run.
///
/// Wraps `lopdf::Document`. The filters mutate it in place through
/// [`ScanDocument::document_mut`]; the exporter serialises the final state.
/// Everything is released when the value is dropped.
pub struct ScanDocument {
    /// The underlying lopdf document.
    document: Document,
}

impl ScanDocument {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    ///
    /// Fails with [`ScanwashError::Load`] when the file is missing or
    /// unreadable, is not a PDF, has no pages, or is encrypted with a
    /// non-empty password.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanwashError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        if !path_ref.is_file() {
            return Err(ScanwashError::Load(format!(
                "input not found: {}",
                path_ref.display()
            )));
        }

        let document = Document::load(path_ref).map_err(|err| {
            ScanwashError::Load(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        let loaded = Self::validate(document)?;
        debug!(pages = loaded.page_count(), "PDF loaded");
        Ok(loaded)
    }

    /// Create a document from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ScanwashError> {
        let document = Document::load_mem(data).map_err(|err| {
            ScanwashError::Load(format!("failed to load PDF from memory: {}", err))
        })?;

        let loaded = Self::validate(document)?;
        debug!(pages = loaded.page_count(), "PDF loaded from bytes");
        Ok(loaded)
    }

    /// Reject documents lopdf could not decrypt, and documents with no pages.
    ///
    /// lopdf decrypts with the empty password while parsing and records the
    /// key in `encryption_state`. Such a document is already plaintext; the
    /// `/Encrypt` entry is dropped so it is written back unencrypted.
    fn validate(mut document: Document) -> Result<Self, ScanwashError> {
        if document.is_encrypted() {
            if document.encryption_state.is_none() {
                return Err(ScanwashError::Load(
                    "document is encrypted with a password".into(),
                ));
            }
            warn!("PDF was encrypted with an empty password, saving it unencrypted");
            if let Some(Ok(encrypt_id)) = document
                .trailer
                .remove(b"Encrypt")
                .map(|entry| entry.as_reference())
            {
                document.objects.remove(&encrypt_id);
            }
            document.encryption_state = None;
        }

        if document.get_pages().is_empty() {
            return Err(ScanwashError::Load("document has no pages".into()));
        }

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Borrow the underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for the filter stages.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    // -- Output ---------------------------------------------------------------

    /// Serialise the current in-memory state to PDF bytes.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, ScanwashError> {
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            ScanwashError::Export(format!("failed to serialise PDF: {}", err))
        })?;
        debug!(output_bytes = output.len(), "PDF serialised");
        Ok(output)
    }

    /// Compress streams and write the document to `path`.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), ScanwashError> {
        let path_ref = path.as_ref();
        self.document.compress();
        self.document.save(path_ref).map_err(|err| {
            ScanwashError::Export(format!("failed to save {}: {}", path_ref.display(), err))
        })?;
        info!("Saved PDF: {}", path_ref.display());
        Ok(())
    }
}
