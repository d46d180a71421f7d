// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Screen capture backend using `xcap`.
//
// The capture region is given in global (virtual desktop) coordinates and
// may span multiple displays; each intersecting monitor is captured and its
// overlap blitted onto one canvas.

use image::{DynamicImage, RgbaImage, imageops};
use pagesnap_core::error::{PagesnapError, Result};
use pagesnap_core::types::CaptureRegion;
use tracing::{debug, warn};
use xcap::Monitor;

use crate::ports::ScreenCapture;

/// `ScreenCapture` backend over the `xcap` monitor API.
///
/// Permissions note: on macOS the process needs "Screen & System Audio
/// Recording" permission in System Settings > Privacy & Security.
#[derive(Debug, Default)]
pub struct XcapCapture;

impl XcapCapture {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenCapture for XcapCapture {
    fn grab(&mut self, region: &CaptureRegion) -> Result<DynamicImage> {
        let monitors = Monitor::all()
            .map_err(|e| PagesnapError::Capture(format!("enumerate monitors: {e}")))?;
        if monitors.is_empty() {
            return Err(PagesnapError::Capture("no monitors found".into()));
        }

        let mut canvas = RgbaImage::new(region.width, region.height);
        let mut covered_pixels: u64 = 0;

        for monitor in &monitors {
            let mon_left = monitor.x() as i64;
            let mon_top = monitor.y() as i64;
            let mon_right = mon_left + monitor.width() as i64;
            let mon_bottom = mon_top + monitor.height() as i64;

            // Intersection of the requested region with this monitor.
            let ix = (region.left as i64).max(mon_left);
            let iy = (region.top as i64).max(mon_top);
            let ix2 = region.right().min(mon_right);
            let iy2 = region.bottom().min(mon_bottom);
            if ix >= ix2 || iy >= iy2 {
                continue;
            }

            let shot = monitor
                .capture_image()
                .map_err(|e| PagesnapError::Capture(format!("capture monitor: {e}")))?;
            let shot = DynamicImage::ImageRgba8(shot);

            let (iw, ih) = ((ix2 - ix) as u32, (iy2 - iy) as u32);
            let tile = shot
                .crop_imm((ix - mon_left) as u32, (iy - mon_top) as u32, iw, ih)
                .to_rgba8();

            imageops::replace(
                &mut canvas,
                &tile,
                ix - region.left as i64,
                iy - region.top as i64,
            );
            covered_pixels += iw as u64 * ih as u64;

            debug!(
                monitor_left = mon_left,
                monitor_top = mon_top,
                overlap_w = iw,
                overlap_h = ih,
                "monitor overlap captured"
            );
        }

        if covered_pixels == 0 {
            return Err(PagesnapError::Capture(format!(
                "region ({region}) lies outside every display"
            )));
        }
        if covered_pixels < region.width as u64 * region.height as u64 {
            // Partially off-screen regions keep the uncovered area black.
            warn!(%region, "capture region partially outside the displays");
        }

        Ok(DynamicImage::ImageRgba8(canvas))
    }
}
