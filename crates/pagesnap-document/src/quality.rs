// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image quality heuristics — monochrome test, sharpness estimate, corner
// quadrant sampling, duplicate detection, and the composite validation
// decision. Pure functions over in-memory images; no state.

use image::DynamicImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use tracing::debug;

/// A frame whose worst quadrant falls below `baseline * SHARPNESS_MIN_RATIO`
/// is rejected as blurry.
pub const SHARPNESS_MIN_RATIO: f64 = 0.7;

/// Why a captured frame was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// At least one check quadrant is a single flat colour — the page has
    /// not finished rendering (or is blank).
    Monochrome,
    /// Both quadrants have content but the worst one is too far below the
    /// baseline sharpness.
    Blurry,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monochrome => write!(f, "monochrome"),
            Self::Blurry => write!(f, "blurry"),
        }
    }
}

/// Outcome of validating a captured frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// The frame is usable. `sharpness` is the worst-quadrant score; the
    /// caller decides whether to adopt it as the run baseline.
    Accept { sharpness: f64 },
    /// The frame is not usable. `sharpness` is present for blurry
    /// rejections and absent for monochrome ones.
    Reject {
        kind: FailureKind,
        sharpness: Option<f64>,
    },
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept { .. })
    }
}

/// Extract the two fixed check quadrants: the top-left crop
/// `(0,0)..(w/2, h/2)` and the bottom-right crop `(w/2, h/2)..(w, h)`.
///
/// Corners are where viewer chrome and unloaded-content placeholders show up
/// first, so two independent quarter-area samples anchored at opposite
/// corners catch both "blank" and "partially rendered" frames cheaply.
pub fn corner_quadrants(image: &DynamicImage) -> (DynamicImage, DynamicImage) {
    let (w, h) = (image.width(), image.height());
    let tl = image.crop_imm(0, 0, w / 2, h / 2);
    let br = image.crop_imm(w / 2, h / 2, w - w / 2, h - h / 2);
    (tl, br)
}

/// True if the image is effectively a single flat colour: the spread between
/// the brightest and darkest luminance value is within `tolerance`.
///
/// A zero-area image counts as monochrome (it has no content to judge).
pub fn is_monochrome(image: &DynamicImage, tolerance: u8) -> bool {
    let gray = image.to_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return true;
    }

    let mut lo = u8::MAX;
    let mut hi = u8::MIN;
    for pixel in gray.pixels() {
        let v = pixel.0[0];
        lo = lo.min(v);
        hi = hi.max(v);
    }
    hi - lo <= tolerance
}

/// Estimate image sharpness as the mean per-pixel gradient magnitude
/// `sqrt(gx^2 + gy^2)` over the luminance channel (Sobel operator).
///
/// The value is relative, not absolute: it is only meaningful when compared
/// against a baseline computed from the same document with the same region.
pub fn sharpness(image: &DynamicImage) -> f64 {
    let gray = image.to_luma8();
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }

    let gx = horizontal_sobel(&gray);
    let gy = vertical_sobel(&gray);

    let mut total = 0.0f64;
    for (px, py) in gx.pixels().zip(gy.pixels()) {
        let dx = px.0[0] as f64;
        let dy = py.0[0] as f64;
        total += (dx * dx + dy * dy).sqrt();
    }
    total / (w as f64 * h as f64)
}

/// True iff the frame is pixel-identical to the previously accepted page.
///
/// Absent previous page or differing dimensions both mean "not a duplicate";
/// the frame then goes through normal validation instead.
pub fn is_duplicate(image: &DynamicImage, previous: Option<&DynamicImage>) -> bool {
    let Some(prev) = previous else {
        return false;
    };
    if image.width() != prev.width() || image.height() != prev.height() {
        return false;
    }
    image.color() == prev.color() && image.as_bytes() == prev.as_bytes()
}

/// Composite validation decision for one captured frame.
///
/// Both corner quadrants must have content (not monochrome, tolerance 0) and
/// the *worst* of the two sharpness scores must clear the baseline threshold.
/// Using the minimum rather than the average means each quadrant passes
/// independently: a sharp header over a blurry body does not slip through.
///
/// With no baseline yet the frame is accepted on content alone and its score
/// is returned for the caller to adopt.
pub fn validate(image: &DynamicImage, baseline: Option<f64>) -> Verdict {
    let (tl, br) = corner_quadrants(image);

    if is_monochrome(&tl, 0) || is_monochrome(&br, 0) {
        debug!("check quadrant is monochrome — page not loaded?");
        return Verdict::Reject {
            kind: FailureKind::Monochrome,
            sharpness: None,
        };
    }

    let sharp_tl = sharpness(&tl);
    let sharp_br = sharpness(&br);
    let combined = sharp_tl.min(sharp_br);

    match baseline {
        None => {
            debug!(sharp_tl, sharp_br, combined, "no baseline yet — accepting");
            Verdict::Accept {
                sharpness: combined,
            }
        }
        Some(base) if combined < base * SHARPNESS_MIN_RATIO => {
            debug!(
                sharp_tl,
                sharp_br,
                combined,
                threshold = base * SHARPNESS_MIN_RATIO,
                "quadrants too blurry against baseline"
            );
            Verdict::Reject {
                kind: FailureKind::Blurry,
                sharpness: Some(combined),
            }
        }
        Some(_) => Verdict::Accept {
            sharpness: combined,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Uniform grayscale image.
    fn flat(w: u32, h: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(w, h, Luma([value])))
    }

    /// Checkerboard with the given cell size. Smaller cells mean more edges
    /// and therefore a higher sharpness score.
    fn checkerboard(w: u32, h: u32, cell: u32, lo: u8, hi: u8) -> DynamicImage {
        let img = GrayImage::from_fn(w, h, |x, y| {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                Luma([lo])
            } else {
                Luma([hi])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn uniform_image_is_monochrome() {
        assert!(is_monochrome(&flat(16, 16, 0), 0));
        assert!(is_monochrome(&flat(16, 16, 255), 0));
        assert!(is_monochrome(&flat(3, 7, 128), 0));
    }

    #[test]
    fn monochrome_tolerance_matches_pixel_spread() {
        let mut img = GrayImage::from_pixel(8, 8, Luma([100]));
        img.put_pixel(3, 3, Luma([104]));
        let img = DynamicImage::ImageLuma8(img);

        // Spread is 4: true iff tolerance >= 4.
        assert!(!is_monochrome(&img, 0));
        assert!(!is_monochrome(&img, 3));
        assert!(is_monochrome(&img, 4));
        assert!(is_monochrome(&img, 10));
    }

    #[test]
    fn quadrants_cover_opposite_corners_without_overlap() {
        // Four 4x3 blocks with distinct values; the two check quadrants must
        // land exactly on the top-left and bottom-right blocks.
        let img = GrayImage::from_fn(8, 6, |x, y| match (x < 4, y < 3) {
            (true, true) => Luma([10]),
            (false, true) => Luma([60]),
            (true, false) => Luma([110]),
            (false, false) => Luma([210]),
        });
        let img = DynamicImage::ImageLuma8(img);

        let (tl, br) = corner_quadrants(&img);
        assert_eq!((tl.width(), tl.height()), (4, 3));
        assert_eq!((br.width(), br.height()), (4, 3));
        assert!(is_monochrome(&tl, 0));
        assert!(is_monochrome(&br, 0));
        assert_eq!(tl.to_luma8().get_pixel(0, 0).0[0], 10);
        assert_eq!(br.to_luma8().get_pixel(0, 0).0[0], 210);
    }

    #[test]
    fn quadrants_on_odd_dimensions_use_floor_split() {
        let (tl, br) = corner_quadrants(&flat(9, 7, 0));
        // Top-left gets the floor half, bottom-right runs to the far edge.
        assert_eq!((tl.width(), tl.height()), (4, 3));
        assert_eq!((br.width(), br.height()), (5, 4));
    }

    #[test]
    fn duplicate_of_itself_is_true() {
        let img = checkerboard(16, 16, 2, 0, 255);
        assert!(is_duplicate(&img, Some(&img.clone())));
    }

    #[test]
    fn single_pixel_change_breaks_duplicate() {
        let img = checkerboard(16, 16, 2, 0, 255);
        let mut other = img.to_luma8();
        other.put_pixel(5, 9, Luma([128]));
        let other = DynamicImage::ImageLuma8(other);
        assert!(!is_duplicate(&other, Some(&img)));
    }

    #[test]
    fn missing_previous_or_size_mismatch_is_not_duplicate() {
        let img = checkerboard(16, 16, 2, 0, 255);
        assert!(!is_duplicate(&img, None));
        let smaller = checkerboard(8, 8, 2, 0, 255);
        assert!(!is_duplicate(&smaller, Some(&img)));
    }

    #[test]
    fn finer_detail_scores_strictly_sharper() {
        let fine = sharpness(&checkerboard(32, 32, 1, 0, 255));
        let coarse = sharpness(&checkerboard(32, 32, 4, 0, 255));
        let blank = sharpness(&flat(32, 32, 128));

        assert!(fine > coarse, "fine={fine} coarse={coarse}");
        assert!(coarse > blank, "coarse={coarse} blank={blank}");
        assert_eq!(blank, 0.0);
    }

    #[test]
    fn monochrome_quadrant_rejects_frame() {
        let verdict = validate(&flat(32, 32, 255), None);
        assert_eq!(
            verdict,
            Verdict::Reject {
                kind: FailureKind::Monochrome,
                sharpness: None
            }
        );
    }

    #[test]
    fn first_frame_accepted_without_baseline() {
        let img = checkerboard(32, 32, 2, 0, 255);
        match validate(&img, None) {
            Verdict::Accept { sharpness } => assert!(sharpness > 0.0),
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn frame_below_threshold_is_blurry() {
        let sharp = checkerboard(32, 32, 1, 0, 255);
        let soft = checkerboard(32, 32, 8, 0, 255);

        let base = match validate(&sharp, None) {
            Verdict::Accept { sharpness } => sharpness,
            other => panic!("expected acceptance, got {other:?}"),
        };

        match validate(&soft, Some(base)) {
            Verdict::Reject {
                kind: FailureKind::Blurry,
                sharpness: Some(s),
            } => assert!(s < base * SHARPNESS_MIN_RATIO),
            other => panic!("expected blurry rejection, got {other:?}"),
        }
    }

    #[test]
    fn frame_near_baseline_is_accepted() {
        let img = checkerboard(32, 32, 2, 0, 255);
        let base = match validate(&img, None) {
            Verdict::Accept { sharpness } => sharpness,
            other => panic!("expected acceptance, got {other:?}"),
        };

        // Identical content trivially clears 0.7x its own baseline.
        assert!(validate(&img, Some(base)).is_accept());
    }

    #[test]
    fn worst_quadrant_drives_the_decision() {
        // Sharp top-left quadrant, soft bottom-right: the combined score must
        // be the bottom-right one, so the frame fails a baseline set from
        // uniformly sharp content.
        let img = GrayImage::from_fn(32, 32, |x, y| {
            let cell = if x >= 16 && y >= 16 { 8 } else { 1 };
            if ((x / cell) + (y / cell)) % 2 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        let mixed = DynamicImage::ImageLuma8(img);
        let sharp = checkerboard(32, 32, 1, 0, 255);

        let base = match validate(&sharp, None) {
            Verdict::Accept { sharpness } => sharpness,
            other => panic!("expected acceptance, got {other:?}"),
        };

        match validate(&mixed, Some(base)) {
            Verdict::Reject {
                kind: FailureKind::Blurry,
                ..
            } => {}
            other => panic!("expected blurry rejection, got {other:?}"),
        }
    }
}
