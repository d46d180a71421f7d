// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembler — turns the ordered sequence of accepted page images into a
// single PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::DynamicImage;
use pagesnap_core::error::{PagesnapError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Pages are embedded full-bleed at their native pixel size, rendered at this
/// resolution. 72 dpi makes one pixel equal one PDF point.
const RENDER_DPI: f32 = 72.0;

/// Assembles accepted page images, in acquisition order, into one PDF.
///
/// Page order is exactly the slice order; each image becomes one page sized
/// to its own pixel dimensions. Images are normalised to RGB8 before
/// embedding.
pub struct PdfAssembler {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfAssembler {
    pub fn new() -> Self {
        Self { title: None }
    }

    /// Set a title for the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Serialise the page sequence to PDF bytes.
    ///
    /// Fails with `EmptyDocument` if `pages` is empty — a partial or empty
    /// document is never produced.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn assemble(&self, pages: &[DynamicImage]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(PagesnapError::EmptyDocument);
        }

        let title = self.title.as_deref().unwrap_or("Pagesnap Capture");
        info!(title, "assembling PDF");

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for (idx, page) in pages.iter().enumerate() {
            let rgb = page.to_rgb8();
            let (w_px, h_px) = rgb.dimensions();

            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: w_px as usize,
                height: h_px as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Full-bleed page sized to the image at RENDER_DPI.
            let page_w = Mm(w_px as f32 * 25.4 / RENDER_DPI);
            let page_h = Mm(h_px as f32 * 25.4 / RENDER_DPI);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(RENDER_DPI),
                    rotate: None,
                },
            }];

            debug!(page = idx + 1, w_px, h_px, "page placed");
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(bytes = output.len(), warnings = warnings.len(), "PDF serialised");

        Ok(output)
    }

    /// Assemble and write the PDF to `path`, returning the page count.
    ///
    /// The empty-sequence check happens before any file is touched, so a
    /// failed save leaves no partial output behind.
    #[instrument(skip(self, pages), fields(pages = pages.len(), path = %path.as_ref().display()))]
    pub fn save(&self, pages: &[DynamicImage], path: impl AsRef<Path>) -> Result<usize> {
        let bytes = self.assemble(pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            pages = pages.len(),
            "PDF written to {}",
            path.as_ref().display()
        );
        Ok(pages.len())
    }
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}
