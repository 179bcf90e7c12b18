// PDF painting: replays a `FormPlan`'s display lists onto printpdf pages.

use ::lopdf::{Document, Object};
use log::warn;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::io::BufWriter;

use crate::error::RenderError;
use crate::layout::{PAGE_HEIGHT, PAGE_WIDTH};
use crate::render::canvas::{Font, Layer, Mark, Op, RgbColor};
use crate::render::FormPlan;

const DOCUMENT_TITLE: &str = "Certificate of Compliance for Electrical Work";

/// printpdf works in millimetres; the layout registry is in points.
const MM_PER_POINT: f32 = 25.4 / 72.0;

fn mm(points: f32) -> Mm {
    Mm(points * MM_PER_POINT)
}

/// Which marks reach the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintScope {
    /// Bands, labels, boxes and values.
    Full,
    /// Values and check marks only, on an otherwise transparent page.
    VariableOnly,
}

impl PaintScope {
    fn includes(self, mark: &Mark) -> bool {
        match self {
            PaintScope::Full => true,
            PaintScope::VariableOnly => mark.layer == Layer::Variable,
        }
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
        }
    }
}

/// Paint every page of the plan and return the serialised PDF.
pub fn paint(plan: &FormPlan, scope: PaintScope) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(DOCUMENT_TITLE, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
    let doc = doc.with_conformance(PdfConformance::Custom(CustomPdfConformance {
        requires_icc_profile: false,
        requires_xmp_metadata: false,
        ..Default::default()
    }));

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
    };

    for (index, canvas) in plan.pages().iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        for mark in canvas.marks().iter().filter(|m| scope.includes(m)) {
            warn_if_lossy(mark);
            paint_op(&layer, &fonts, &mark.op);
        }
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer).map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bytes = writer.into_inner().map_err(|e| RenderError::Io(e.into_error()))?;

    let mut document = Document::load_mem(&bytes).map_err(|e| RenderError::Pdf(e.to_string()))?;
    strip_volatile(&mut document);
    save_document(&mut document)
}

fn paint_op(layer: &PdfLayerReference, fonts: &Fonts, op: &Op) {
    match op {
        Op::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            line_width,
        } => {
            let mode = match (fill, stroke) {
                (Some(_), Some(_)) => PaintMode::FillStroke,
                (Some(_), None) => PaintMode::Fill,
                (None, Some(_)) => PaintMode::Stroke,
                (None, None) => return,
            };
            if let Some(color) = fill {
                layer.set_fill_color(pdf_color(*color));
            }
            if let Some(color) = stroke {
                layer.set_outline_color(pdf_color(*color));
                layer.set_outline_thickness(*line_width);
            }
            let corners = [
                (*x, *y),
                (*x + *width, *y),
                (*x + *width, *y + *height),
                (*x, *y + *height),
            ];
            layer.add_polygon(Polygon {
                rings: vec![corners
                    .iter()
                    .map(|&(px, py)| (Point::new(mm(px), mm(py)), false))
                    .collect()],
                mode,
                winding_order: WindingOrder::NonZero,
            });
        }
        Op::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*width);
            draw_line(layer, *x1, *y1, *x2, *y2);
        }
        Op::Text {
            x,
            y,
            size,
            font,
            color,
            text,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size, mm(*x), mm(*y), fonts.get(*font));
        }
    }
}

// ============================================================================
// Text encoding
// ============================================================================

/// Characters in `text` the built-in fonts cannot show. printpdf writes
/// builtin-font text as WinAnsi and silently drops anything outside it.
pub(crate) fn unencodable_chars(text: &str) -> Vec<char> {
    text.chars().filter(|&c| !is_win_ansi(c)).collect()
}

fn is_win_ansi(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' '..='~' | '\u{a0}'..='\u{ff}')
        || WIN_ANSI_EXTRAS.contains(&c)
}

/// Code points WinAnsi maps into 0x80..=0x9F.
const WIN_ANSI_EXTRAS: [char; 27] = [
    '\u{20ac}', '\u{201a}', '\u{0192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02c6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017d}', '\u{2018}',
    '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02dc}',
    '\u{2122}', '\u{0161}', '\u{203a}', '\u{0153}', '\u{017e}', '\u{0178}',
];

fn warn_if_lossy(mark: &Mark) {
    let Op::Text { text, .. } = &mark.op else {
        return;
    };
    let dropped = unencodable_chars(text);
    if !dropped.is_empty() {
        warn!(
            "Field {} has characters the built-in font cannot encode; dropping {:?}",
            mark.field.as_deref().unwrap_or("(label)"),
            dropped
        );
    }
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(mm(x1), mm(y1)), false),
        (Point::new(mm(x2), mm(y2)), false),
    ];
    let line = Line {
        points,
        is_closed: false,
    };
    layer.add_line(line);
}

// ============================================================================
// Serialisation
// ============================================================================

/// Drop everything printpdf derives from the clock or a random source: the
/// trailer file ID, the Info dates and the XMP packet.
pub(crate) fn strip_volatile(document: &mut Document) {
    document.trailer.remove(b"ID");

    if let Ok(info_id) = document.trailer.get(b"Info").and_then(Object::as_reference) {
        if let Ok(info) = document.get_object_mut(info_id).and_then(Object::as_dict_mut) {
            info.remove(b"CreationDate");
            info.remove(b"ModDate");
        }
    }

    if let Ok(root_id) = document.trailer.get(b"Root").and_then(Object::as_reference) {
        if let Ok(catalog) = document.get_object_mut(root_id).and_then(Object::as_dict_mut) {
            catalog.remove(b"Metadata");
        }
    }

    document.prune_objects();
}

pub(crate) fn save_document(document: &mut Document) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormData;
    use crate::record::SubmissionRecord;

    fn plan() -> FormPlan {
        let record = SubmissionRecord::new().with("serial_no", "3015").with("nmi", "4103");
        FormPlan::build(&FormData::from_record(&record))
    }

    #[test]
    fn writes_three_pages() {
        let bytes = paint(&plan(), PaintScope::Full).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let document = Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 3);
    }

    #[test]
    fn output_is_byte_stable_across_a_clock_tick() {
        let plan = plan();
        let first = paint(&plan, PaintScope::Full).unwrap();
        // PDF dates have one-second resolution
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = paint(&plan, PaintScope::Full).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn variable_only_is_smaller() {
        let plan = plan();
        let full = paint(&plan, PaintScope::Full).unwrap();
        let overlay = paint(&plan, PaintScope::VariableOnly).unwrap();
        assert!(overlay.len() < full.len());
    }

    #[test]
    fn non_win_ansi_characters_are_reported() {
        assert_eq!(unencodable_chars("Zo\u{eb} \u{674e} (x)"), vec!['\u{674e}']);
        assert!(unencodable_chars("Caf\u{e9} \u{2013} \u{20ac}5 \u{201c}ok\u{201d}").is_empty());
    }

    #[test]
    fn lossy_text_still_renders() {
        let record = SubmissionRecord::new()
            .with("serial_no", "3015")
            .with("customer_company_name", "Zo\u{eb} \u{674e}");
        let plan = FormPlan::build(&FormData::from_record(&record));
        let bytes = paint(&plan, PaintScope::Full).unwrap();
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 3);
    }

    #[test]
    fn clock_and_random_entries_are_stripped() {
        let bytes = paint(&plan(), PaintScope::Full).unwrap();
        let document = Document::load_mem(&bytes).unwrap();
        assert!(document.trailer.get(b"ID").is_err());

        if let Ok(info_id) = document.trailer.get(b"Info").and_then(Object::as_reference) {
            let info = document.get_dictionary(info_id).unwrap();
            assert!(!info.has(b"CreationDate"));
            assert!(!info.has(b"ModDate"));
        }

        let root_id = document.trailer.get(b"Root").and_then(Object::as_reference).unwrap();
        assert!(!document.get_dictionary(root_id).unwrap().has(b"Metadata"));
    }
}
