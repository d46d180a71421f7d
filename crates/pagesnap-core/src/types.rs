// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pagesnap capture tool.

use serde::{Deserialize, Serialize};

use crate::error::{PagesnapError, Result};

/// Per-page attempt budget. Fixed for the whole run: `max_attempts` acts as
/// the only per-page timeout (there is no other cancellation mechanism).
pub const MAX_ATTEMPTS: u32 = 5;

/// The screen rectangle captured for every page.
///
/// Chosen once at run start and immutable thereafter. `left`/`top` are in
/// global (virtual desktop) coordinates and may be negative on multi-monitor
/// setups where a display sits left of or above the primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Create a region, enforcing the `width > 0 && height > 0` invariant.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PagesnapError::InvalidRegion(format!(
                "zero-area region {}x{}",
                width, height
            )));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Build a region from two opposite corner points, in any order.
    ///
    /// The corners are normalised so `left`/`top` is the minimum corner, the
    /// way a user would sweep out a rectangle with the mouse.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self> {
        let left = x1.min(x2);
        let top = y1.min(y2);
        let width = x1.abs_diff(x2);
        let height = y1.abs_diff(y2);
        Self::new(left, top, width, height)
    }

    /// Exclusive right edge in global coordinates.
    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    /// Exclusive bottom edge in global coordinates.
    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }
}

impl std::fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "left={}, top={}, width={}, height={}",
            self.left, self.top, self.width, self.height
        )
    }
}

/// The fixed screen point clicked to advance the viewer to the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancePoint {
    pub x: i32,
    pub y: i32,
}

impl std::fmt::Display for AdvancePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
