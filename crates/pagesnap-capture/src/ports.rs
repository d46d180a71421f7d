// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator contracts consumed by the acquisition engine.
//
// The engine only ever sees these traits; the platform backends live in
// `screen` and `pointer`, and tests substitute scripted implementations.

use image::DynamicImage;
use pagesnap_core::error::Result;
use pagesnap_core::types::CaptureRegion;

/// Grabs the pixels currently visible in a screen region.
pub trait ScreenCapture {
    /// Capture the region as an immutable raster image.
    ///
    /// Synchronous. Must reflect all physical displays when the region spans
    /// more than one of them.
    fn grab(&mut self, region: &CaptureRegion) -> Result<DynamicImage>;
}

/// Synthesises pointer clicks to advance the document viewer.
pub trait PointerController {
    /// Click the left button at the given global screen coordinates.
    ///
    /// Fire-and-forget from the engine's point of view: a failed click is
    /// logged, never acted upon.
    fn click(&mut self, x: i32, y: i32) -> Result<()>;
}
