// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PagesnapError, Result};
use crate::types::{AdvancePoint, CaptureRegion};

/// Parameters for one capture run.
///
/// Collected interactively (or from CLI flags) before any capture starts and
/// fixed for the process lifetime. There is no on-disk persistence: a fresh
/// run always starts cold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of pages to acquire in the initial batch.
    pub num_pages: u32,
    /// Settle time in seconds between a page change and the first capture
    /// attempt. Subsequent attempts for the same page wait a fixed second.
    pub min_delay_secs: f64,
    /// Screen rectangle captured for every page.
    pub region: CaptureRegion,
    /// Point clicked to advance the viewer to the next page.
    pub advance: AdvancePoint,
    /// Destination of the assembled PDF.
    pub output_path: PathBuf,
}

impl RunConfig {
    /// Validate the run parameters before they reach the acquisition engine.
    pub fn validate(&self) -> Result<()> {
        if self.num_pages < 1 {
            return Err(PagesnapError::InvalidParameter(
                "num_pages must be at least 1".into(),
            ));
        }
        if !self.min_delay_secs.is_finite() || self.min_delay_secs < 0.0 {
            return Err(PagesnapError::InvalidParameter(format!(
                "min_delay_secs must be a non-negative number, got {}",
                self.min_delay_secs
            )));
        }
        Ok(())
    }
}
