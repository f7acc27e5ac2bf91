//! Error taxonomy: structural failures abort the whole generation, per-asset
//! failures degrade to in-document placeholders plus a [`RenderWarning`].

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Fatal errors. Anything here aborts generation with no partial output.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CFDI document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("invalid edits file: {0}")]
    Edits(#[from] serde_json::Error),
}

/// Recoverable failures that were rendered as in-document diagnostics.
///
/// The document is still produced; callers decide whether warnings matter.
#[derive(Debug, Clone, Error, Serialize)]
pub enum RenderWarning {
    #[error("logo unavailable: {0}")]
    Logo(String),

    #[error("signature unavailable: {0}")]
    Signature(String),
}

/// Outcome summary returned alongside the PDF bytes.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    /// Number of pages in the finished document.
    pub pages: usize,
    /// Asset failures that were drawn as placeholders instead of aborting.
    pub warnings: Vec<RenderWarning>,
}
