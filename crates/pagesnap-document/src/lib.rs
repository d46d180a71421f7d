// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagesnap-document — Document processing for the Pagesnap capture tool.
//
// Provides the image quality heuristics (monochrome detection, sharpness
// estimation, duplicate detection, composite validation) that decide whether
// a captured frame is a usable page, and the PDF assembler that turns the
// accepted page sequence into the output document.

pub mod pdf;
pub mod quality;

pub use pdf::assembler::PdfAssembler;
pub use quality::{FailureKind, Verdict};
