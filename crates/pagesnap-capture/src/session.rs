// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session controller — accumulates the ordered page sequence and skip list
// across one or more acquisition batches within a single run.

use image::DynamicImage;
use tracing::{info, instrument};

use crate::engine::{AcquisitionState, BatchReport, PageAcquisitionEngine};
use crate::ports::{PointerController, ScreenCapture};

/// Owns the engine and all mutable run state.
///
/// The run state (page sequence, sharpness baseline, skip list, duplicate
/// comparison image) is carried forward unchanged from batch to batch; the
/// session ends when the caller stops requesting batches.
pub struct CaptureSession<C, P> {
    engine: PageAcquisitionEngine<C, P>,
    state: AcquisitionState,
}

impl<C: ScreenCapture, P: PointerController> CaptureSession<C, P> {
    pub fn new(engine: PageAcquisitionEngine<C, P>) -> Self {
        Self {
            engine,
            state: AcquisitionState::new(),
        }
    }

    /// Acquire a batch of pages.
    #[instrument(skip(self))]
    pub fn run_batch(&mut self, num_pages: u32) -> BatchReport {
        let report = self.engine.acquire_batch(num_pages, &mut self.state);
        info!(
            accepted = report.accepted,
            skipped = report.skipped.len(),
            total = self.state.pages().len(),
            "batch finished"
        );
        report
    }

    /// Advance the viewer once, then acquire another batch.
    ///
    /// The previous batch's final page deliberately got no in-batch advance
    /// click (the user reviews and saves in between); this extra click moves
    /// the viewer onto the next unseen page before resuming.
    #[instrument(skip(self))]
    pub fn run_additional(&mut self, num_pages: u32) -> BatchReport {
        self.engine.advance_viewer();
        self.run_batch(num_pages)
    }

    /// Accepted pages so far, in final document order.
    pub fn pages(&self) -> &[DynamicImage] {
        self.state.pages()
    }

    /// Page numbers abandoned as unrecoverable so far.
    pub fn skipped(&self) -> &[usize] {
        self.state.skipped()
    }

    /// The sharpness baseline, once adopted.
    pub fn baseline(&self) -> Option<f64> {
        self.state.baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use image::{GrayImage, Luma};
    use pagesnap_core::types::{AdvancePoint, CaptureRegion};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn checkerboard(lo: u8, hi: u8) -> DynamicImage {
        let img = GrayImage::from_fn(32, 32, |x, y| {
            if ((x / 2) + (y / 2)) % 2 == 0 {
                Luma([lo])
            } else {
                Luma([hi])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    struct ScriptedCapture {
        frames: Vec<DynamicImage>,
        calls: Rc<RefCell<usize>>,
    }

    impl ScreenCapture for ScriptedCapture {
        fn grab(&mut self, _region: &CaptureRegion) -> pagesnap_core::error::Result<DynamicImage> {
            let mut calls = self.calls.borrow_mut();
            let idx = (*calls).min(self.frames.len() - 1);
            *calls += 1;
            Ok(self.frames[idx].clone())
        }
    }

    struct SharedPointer {
        clicks: Rc<RefCell<usize>>,
    }

    impl PointerController for SharedPointer {
        fn click(&mut self, _x: i32, _y: i32) -> pagesnap_core::error::Result<()> {
            *self.clicks.borrow_mut() += 1;
            Ok(())
        }
    }

    fn session(
        frames: Vec<DynamicImage>,
    ) -> (
        CaptureSession<ScriptedCapture, SharedPointer>,
        Rc<RefCell<usize>>,
        Rc<RefCell<usize>>,
    ) {
        let calls = Rc::new(RefCell::new(0));
        let clicks = Rc::new(RefCell::new(0));
        let capture = ScriptedCapture {
            frames,
            calls: Rc::clone(&calls),
        };
        let pointer = SharedPointer {
            clicks: Rc::clone(&clicks),
        };
        let mut config = EngineConfig::new(
            CaptureRegion::new(0, 0, 32, 32).unwrap(),
            AdvancePoint { x: 10, y: 20 },
            Duration::ZERO,
        );
        config.retry_delay = Duration::ZERO;
        let engine = PageAcquisitionEngine::new(capture, pointer, config);
        (CaptureSession::new(engine), calls, clicks)
    }

    #[test]
    fn state_carries_across_batches() {
        let a = checkerboard(0, 255);
        let b = checkerboard(10, 245);
        let c = checkerboard(20, 235);

        // The resumed batch first sees page B again (the viewer has not
        // moved yet from the capture's point of view), which must be
        // discarded as a duplicate of the carried-forward previous page.
        let (mut session, calls, clicks) = session(vec![a, b.clone(), b, c]);

        let first = session.run_batch(2);
        assert_eq!(first.accepted, 2);
        let baseline = session.baseline().expect("baseline set in batch 1");

        let second = session.run_additional(1);
        assert_eq!(second.accepted, 1);

        assert_eq!(session.pages().len(), 3);
        assert_eq!(session.baseline(), Some(baseline));
        assert_eq!(*calls.borrow(), 4, "duplicate retry costs one extra grab");
        // One in-batch advance (after page 1) plus the between-batches click.
        assert_eq!(*clicks.borrow(), 2);
        assert!(session.skipped().is_empty());
    }

    #[test]
    fn skip_list_accumulates_across_batches() {
        let a = checkerboard(0, 255);
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(32, 32, Luma([255])));

        // Batch 1 accepts page 1; batch 2's only page never renders.
        let mut frames = vec![a];
        frames.extend(std::iter::repeat_with(|| blank.clone()).take(5));

        let (mut session, _calls, _clicks) = session(frames);
        session.run_batch(1);
        let report = session.run_additional(1);

        assert_eq!(report.skipped, vec![2]);
        assert_eq!(session.skipped(), &[2]);
        assert_eq!(session.pages().len(), 1);
    }
}
