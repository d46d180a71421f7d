// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagesnap-capture — Frame acquisition for the Pagesnap capture tool.
//
// Defines the collaborator contracts (screen capture, pointer control) with
// their platform backends, the per-page retry engine that decides whether a
// captured frame becomes a permanent page, and the session controller that
// accumulates pages across acquisition batches.

pub mod engine;
pub mod pointer;
pub mod ports;
pub mod screen;
pub mod session;

pub use engine::{AcquisitionState, BatchReport, EngineConfig, PageAcquisitionEngine};
pub use pointer::EnigoPointer;
pub use ports::{PointerController, ScreenCapture};
pub use screen::XcapCapture;
pub use session::CaptureSession;
