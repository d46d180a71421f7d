// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagesnap.

use thiserror::Error;

/// Top-level error type for all Pagesnap operations.
#[derive(Debug, Error)]
pub enum PagesnapError {
    // -- Capture errors --
    #[error("screen capture failed: {0}")]
    Capture(String),

    #[error("pointer control failed: {0}")]
    Pointer(String),

    #[error("invalid capture region: {0}")]
    InvalidRegion(String),

    // -- Document errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("no pages acquired — refusing to write an empty document")]
    EmptyDocument,

    // -- Run parameters --
    #[error("invalid run parameter: {0}")]
    InvalidParameter(String),

    // -- I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagesnapError>;
