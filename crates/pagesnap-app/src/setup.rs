// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive run setup — console prompts for the page count and delay, and
// mouse-position capture for the region corners and the advance-click point.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use pagesnap_capture::EnigoPointer;
use pagesnap_core::error::Result;
use pagesnap_core::types::{AdvancePoint, CaptureRegion};

/// Prompt for an integer, re-asking until a value `>= min` is entered.
pub fn ask_count(prompt: &str, min: u32) -> Result<u32> {
    loop {
        let line = read_line(&format!("{prompt} (>= {min}): "))?;
        match line.parse::<u32>() {
            Ok(value) if value >= min => return Ok(value),
            _ => println!("Invalid value, enter a whole number >= {min}."),
        }
    }
}

/// Prompt for a non-negative number of seconds. Accepts a comma as the
/// decimal separator.
pub fn ask_delay(prompt: &str) -> Result<f64> {
    loop {
        let line = read_line(&format!("{prompt} (>= 0): "))?;
        match line.replace(',', ".").parse::<f64>() {
            Ok(value) if value >= 0.0 && value.is_finite() => return Ok(value),
            _ => println!("Invalid value, enter a number >= 0."),
        }
    }
}

/// Yes/no prompt; only an explicit `y`/`yes` counts as yes.
pub fn confirm(prompt: &str) -> Result<bool> {
    let answer = read_line(&format!("{prompt} (y/N): "))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Print `msg` and block until Enter is pressed.
pub fn pause(msg: &str) -> Result<()> {
    let _ = read_line(&format!("{msg} "))?;
    Ok(())
}

/// Ask the user to park the pointer somewhere and press Enter, then record
/// where it is.
pub fn wait_for_position(pointer: &EnigoPointer, msg: &str) -> Result<(i32, i32)> {
    println!();
    println!("{msg}");
    println!(" -> Move the pointer to the desired spot and press Enter here.");
    pause("Press Enter when ready...")?;
    let (x, y) = pointer.location()?;
    println!("   Recorded position: ({x}, {y})");
    Ok((x, y))
}

/// Collect the capture region from two corner positions, re-prompting until
/// the user confirms a non-empty rectangle.
pub fn choose_capture_region(pointer: &EnigoPointer) -> Result<CaptureRegion> {
    println!("\n--- CAPTURE REGION ---");
    loop {
        let (x1, y1) = wait_for_position(pointer, "TOP-LEFT corner of the area to capture")?;
        let (x2, y2) = wait_for_position(pointer, "BOTTOM-RIGHT corner of the area to capture")?;

        let region = match CaptureRegion::from_corners(x1, y1, x2, y2) {
            Ok(region) => region,
            Err(err) => {
                println!("Unusable region ({err}), let's redo the selection.");
                continue;
            }
        };

        println!("\nSelected area: {region}");
        if confirm("Confirm?")? {
            return Ok(region);
        }
        println!("Redoing the region selection.");
    }
}

/// Collect the point clicked to advance the viewer to the next page.
pub fn choose_advance_point(pointer: &EnigoPointer) -> Result<AdvancePoint> {
    println!("\n--- NEXT-PAGE CLICK POINT ---");
    let (x, y) = wait_for_position(pointer, "Point to click to move to the next page")?;
    Ok(AdvancePoint { x, y })
}

/// Resolve the output path: default to `capture_<timestamp>.pdf` in the
/// working directory, enforce the `.pdf` extension, and create missing
/// parent directories.
pub fn resolve_output_path(requested: Option<PathBuf>) -> Result<PathBuf> {
    let path = match requested {
        Some(path) => path,
        None => {
            let name = format!("capture_{}.pdf", chrono::Local::now().format("%Y%m%d_%H%M%S"));
            std::env::current_dir()?.join(name)
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            println!("Directory '{}' does not exist, creating it...", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(ensure_pdf_extension(path))
}

/// Append `.pdf` unless the path already ends with it (case-insensitive).
fn ensure_pdf_extension(path: PathBuf) -> PathBuf {
    let has_pdf_ext = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if has_pdf_ext {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_appended_when_missing() {
        assert_eq!(
            ensure_pdf_extension(PathBuf::from("book")),
            PathBuf::from("book.pdf")
        );
        assert_eq!(
            ensure_pdf_extension(PathBuf::from("book.txt")),
            PathBuf::from("book.txt.pdf")
        );
    }

    #[test]
    fn pdf_extension_is_kept_case_insensitively() {
        assert_eq!(
            ensure_pdf_extension(PathBuf::from("book.pdf")),
            PathBuf::from("book.pdf")
        );
        assert_eq!(
            ensure_pdf_extension(PathBuf::from("book.PDF")),
            PathBuf::from("book.PDF")
        );
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("out");

        let resolved = resolve_output_path(Some(nested.clone())).unwrap();

        assert_eq!(resolved, dir.path().join("a").join("b").join("out.pdf"));
        assert!(nested.parent().unwrap().exists());
    }

    #[test]
    fn default_output_name_carries_a_timestamp() {
        let resolved = resolve_output_path(None).unwrap();
        let name = resolved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("capture_"));
        assert!(name.ends_with(".pdf"));
    }
}
