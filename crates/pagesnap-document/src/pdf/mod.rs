// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — assembly of the accepted page sequence into the output file.

pub mod assembler;

pub use assembler::PdfAssembler;
