// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders a story to a downloadable PDF byte stream.
//!
//! Dark page, wrapped paragraphs, a watermark footer on every page, and an
//! optional embedded TTF (the shipped exports use a Nastaliq face) with a
//! builtin-font fallback.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, Point, Polygon,
    PolygonMode, Rgb, WindingOrder,
};
use tracing::debug;

use qissa_config::model::PdfConfig;
use qissa_core::QissaError;

// A4 geometry in millimeters.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 18.0;
const TOP_Y: f32 = 272.0;
const BOTTOM_Y: f32 = 24.0;
const LINE_HEIGHT: f32 = 9.0;

const BODY_SIZE: f32 = 13.0;
const FOOTER_SIZE: f32 = 9.0;
const WRAP_WIDTH: usize = 88;

fn pdf_err(e: impl std::error::Error + Send + Sync + 'static) -> QissaError {
    QissaError::Provider {
        message: format!("PDF rendering failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Render `text` into a complete PDF document.
pub fn render_story(text: &str, config: &PdfConfig) -> Result<Vec<u8>, QissaError> {
    let (doc, page, layer) = PdfDocument::new("Story", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "page");
    let font = load_font(&doc, config)?;

    let lines = wrap_text(text, WRAP_WIDTH);
    let mut layer = doc.get_page(page).get_layer(layer);
    paint_page_background(&layer);
    paint_footer(&layer, &font, &config.watermark);

    let mut y = TOP_Y;
    for line in &lines {
        if y < BOTTOM_Y + LINE_HEIGHT {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "page");
            layer = doc.get_page(next_page).get_layer(next_layer);
            paint_page_background(&layer);
            paint_footer(&layer, &font, &config.watermark);
            y = TOP_Y;
        }
        layer.set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
        layer.use_text(line.clone(), BODY_SIZE, Mm(MARGIN_X), Mm(y), &font);
        y -= LINE_HEIGHT;
    }

    let bytes = doc.save_to_bytes().map_err(pdf_err)?;
    debug!(pages = lines.len().div_ceil(lines_per_page()), size = bytes.len(), "story rendered");
    Ok(bytes)
}

fn lines_per_page() -> usize {
    (((TOP_Y - BOTTOM_Y) / LINE_HEIGHT) as usize).max(1)
}

fn load_font(
    doc: &PdfDocumentReference,
    config: &PdfConfig,
) -> Result<IndirectFontRef, QissaError> {
    if let Some(path) = &config.font_path {
        let file = std::fs::File::open(path).map_err(|e| QissaError::Provider {
            message: format!("failed to open font {path}: {e}"),
            source: Some(Box::new(e)),
        })?;
        return doc.add_external_font(file).map_err(pdf_err);
    }
    doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)
}

fn paint_page_background(layer: &printpdf::PdfLayerReference) {
    // The dark sheet the stories are presented on.
    layer.set_fill_color(Color::Rgb(Rgb::new(0.125, 0.133, 0.161, None)));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(0.0), Mm(0.0)), false),
            (Point::new(Mm(PAGE_WIDTH), Mm(0.0)), false),
            (Point::new(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT)), false),
            (Point::new(Mm(0.0), Mm(PAGE_HEIGHT)), false),
        ]],
        mode: PolygonMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

fn paint_footer(layer: &printpdf::PdfLayerReference, font: &IndirectFontRef, watermark: &str) {
    layer.set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
    layer.use_text(watermark.to_string(), FOOTER_SIZE, Mm(MARGIN_X), Mm(12.0), font);
}

/// Greedy word wrap by character count; paragraph breaks are preserved.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
