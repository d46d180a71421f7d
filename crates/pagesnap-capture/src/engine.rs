// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page acquisition engine.
//
// Runs the retry state machine for each requested page: wait for the viewer
// to settle, grab a frame, throw away duplicates of the previous page, and
// ask the quality heuristics whether the frame is usable. A page that
// exhausts its attempt budget is recorded as skipped and the batch moves on;
// nothing aborts a batch.

use std::thread;
use std::time::Duration;

use image::DynamicImage;
use pagesnap_core::types::{AdvancePoint, CaptureRegion, MAX_ATTEMPTS};
use pagesnap_document::quality::{self, FailureKind, Verdict};
use tracing::{debug, info, instrument, warn};

use crate::ports::{PointerController, ScreenCapture};

/// Engine parameters, fixed for the whole run.
pub struct EngineConfig {
    /// Screen rectangle captured for every page.
    pub region: CaptureRegion,
    /// Point clicked to advance the viewer.
    pub advance: AdvancePoint,
    /// Settle time before the first capture attempt of each page.
    pub min_delay: Duration,
    /// Settle time before every further attempt of the same page.
    pub retry_delay: Duration,
    /// Per-page attempt budget.
    pub max_attempts: u32,
}

impl EngineConfig {
    pub fn new(region: CaptureRegion, advance: AdvancePoint, min_delay: Duration) -> Self {
        Self {
            region,
            advance,
            min_delay,
            retry_delay: Duration::from_secs(1),
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// Mutable run state owned by the session and threaded through batch calls.
///
/// Persists across batches within one run; there is no on-disk state.
#[derive(Default)]
pub struct AcquisitionState {
    /// Accepted pages, insertion order = final document page order.
    pages: Vec<DynamicImage>,
    /// Sharpness score adopted from the first accepted page; read-only for
    /// the rest of the run once set.
    baseline: Option<f64>,
    /// 1-based numbers of pages abandoned after exhausting retries. The
    /// numbering is accepted-count at batch start plus position in batch, so
    /// treat the values as provisional labels, not authoritative indices.
    skipped: Vec<usize>,
}

impl AcquisitionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted pages in acquisition order.
    pub fn pages(&self) -> &[DynamicImage] {
        &self.pages
    }

    /// The most recently accepted page, used for duplicate comparison.
    pub fn previous(&self) -> Option<&DynamicImage> {
        self.pages.last()
    }

    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }
}

/// What one batch produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Pages accepted in this batch.
    pub accepted: usize,
    /// Page numbers skipped in this batch.
    pub skipped: Vec<usize>,
}

/// Drives the per-page retry loop against the capture and pointer
/// collaborators.
pub struct PageAcquisitionEngine<C, P> {
    capture: C,
    pointer: P,
    config: EngineConfig,
}

impl<C: ScreenCapture, P: PointerController> PageAcquisitionEngine<C, P> {
    pub fn new(capture: C, pointer: P, config: EngineConfig) -> Self {
        Self {
            capture,
            pointer,
            config,
        }
    }

    /// Acquire `num_pages` pages, mutating `state` in place.
    ///
    /// Pages resolve strictly in order: page `k+1` never starts before page
    /// `k` is accepted or skipped. After every page except the batch's last,
    /// the viewer is advanced by one click.
    #[instrument(skip(self, state))]
    pub fn acquire_batch(&mut self, num_pages: u32, state: &mut AcquisitionState) -> BatchReport {
        let saved_at_start = state.pages.len();
        let mut report = BatchReport::default();

        for page_idx in 1..=num_pages {
            let page_num = saved_at_start + page_idx as usize;
            info!(
                page = page_idx,
                of = num_pages,
                total_saved = state.pages.len(),
                "acquiring page"
            );

            // The override policy is tied to page position: the very first
            // page of the whole run and the last page of the requested batch
            // often cannot be re-triggered, so a merely-blurry frame is
            // accepted rather than stranding the run.
            let first_overall = state.pages.is_empty() && page_idx == 1;
            let last_in_batch = page_idx == num_pages;

            match self.acquire_page(state, first_overall, last_in_batch) {
                Some(frame) => {
                    state.pages.push(frame);
                    report.accepted += 1;
                    info!(total_saved = state.pages.len(), "page acquired");
                }
                None => {
                    warn!(
                        page_num,
                        attempts = self.config.max_attempts,
                        "page not validated within the attempt budget — skipping"
                    );
                    state.skipped.push(page_num);
                    report.skipped.push(page_num);
                }
            }

            if !last_in_batch {
                self.advance_viewer();
            }
        }

        report
    }

    /// Run the attempt loop for a single page. Returns the accepted frame,
    /// or `None` once the attempt budget is exhausted.
    fn acquire_page(
        &mut self,
        state: &mut AcquisitionState,
        first_overall: bool,
        last_in_batch: bool,
    ) -> Option<DynamicImage> {
        for attempt in 1..=self.config.max_attempts {
            let wait = if attempt == 1 {
                self.config.min_delay
            } else {
                self.config.retry_delay
            };
            debug!(
                attempt,
                max = self.config.max_attempts,
                wait_ms = wait.as_millis(),
                "capture attempt"
            );
            if !wait.is_zero() {
                thread::sleep(wait);
            }

            let frame = match self.capture.grab(&self.config.region) {
                Ok(frame) => frame,
                Err(err) => {
                    // Not in the quality taxonomy: treat as a transient
                    // attempt failure, never as a batch abort.
                    warn!(attempt, error = %err, "capture attempt failed");
                    continue;
                }
            };

            if quality::is_duplicate(&frame, state.previous()) {
                debug!(attempt, "frame identical to previous page — retrying");
                continue;
            }

            match quality::validate(&frame, state.baseline) {
                Verdict::Accept { sharpness } => {
                    self.adopt_baseline(state, sharpness);
                    debug!(attempt, sharpness, "frame accepted");
                    return Some(frame);
                }
                Verdict::Reject {
                    kind: FailureKind::Blurry,
                    sharpness,
                } if first_overall || last_in_batch => {
                    info!(
                        attempt,
                        ?sharpness,
                        first_overall,
                        last_in_batch,
                        "blurry frame accepted by first/last-page override"
                    );
                    if let Some(sharpness) = sharpness {
                        self.adopt_baseline(state, sharpness);
                    }
                    return Some(frame);
                }
                Verdict::Reject { kind, sharpness } => {
                    debug!(attempt, %kind, ?sharpness, "frame rejected — retrying");
                }
            }
        }
        None
    }

    /// Adopt the sharpness baseline exactly once, on the first acceptance of
    /// the run.
    fn adopt_baseline(&self, state: &mut AcquisitionState, sharpness: f64) {
        if state.baseline.is_none() {
            info!(sharpness, "sharpness baseline adopted");
            state.baseline = Some(sharpness);
        }
    }

    /// Click the advance point once. Fire-and-forget: failures are logged
    /// and acquisition continues.
    pub(crate) fn advance_viewer(&mut self) {
        debug!(point = %self.config.advance, "advancing viewer");
        if let Err(err) = self
            .pointer
            .click(self.config.advance.x, self.config.advance.y)
        {
            warn!(error = %err, "advance click failed");
        }
    }
}
