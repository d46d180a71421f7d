// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pointer control backend using `enigo`.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use pagesnap_core::error::{PagesnapError, Result};
use tracing::debug;

use crate::ports::PointerController;

/// `PointerController` backend over the `enigo` input-synthesis crate.
///
/// Also exposes the current pointer position, which the interactive setup
/// uses to record the capture region corners and the advance-click point.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| PagesnapError::Pointer(format!("initialise input backend: {e}")))?;
        Ok(Self { enigo })
    }

    /// Current pointer position in global screen coordinates.
    pub fn location(&self) -> Result<(i32, i32)> {
        self.enigo
            .location()
            .map_err(|e| PagesnapError::Pointer(format!("read pointer position: {e}")))
    }
}

impl PointerController for EnigoPointer {
    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        debug!(x, y, "clicking");
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| PagesnapError::Pointer(format!("move to ({x}, {y}): {e}")))?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| PagesnapError::Pointer(format!("click at ({x}, {y}): {e}")))?;
        Ok(())
    }
}
