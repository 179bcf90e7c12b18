// Display list and drawing primitives.
//
// Nothing here touches a PDF. Primitives append `Mark`s to a `Canvas`; the
// PDF painter replays them later. Every mark carries its own colours and line
// widths, so no style state leaks between calls or between renders.

use crate::layout::{
    FieldSlot, LABEL_FONT_SIZE, SECTION_TITLE_FONT_SIZE, TITLE_OFFSET_X, TITLE_OFFSET_Y,
    VALUE_FONT_SIZE,
};

// ============================================================================
// Colours
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

pub const BLACK: RgbColor = RgbColor { r: 0.0, g: 0.0, b: 0.0 };
pub const WHITE: RgbColor = RgbColor { r: 1.0, g: 1.0, b: 1.0 };
/// Section band fill used on the official form (#8DB04C).
pub const BAND_GREEN: RgbColor = RgbColor { r: 0.553, g: 0.690, b: 0.298 };
/// #C41E3A
pub const NSW_RED: RgbColor = RgbColor { r: 0.769, g: 0.118, b: 0.227 };

const BOX_LINE_WIDTH: f32 = 0.5;
const CHECK_LINE_WIDTH: f32 = 1.0;
/// Inset of value text from the left edge of its box.
const VALUE_INSET: f32 = 3.0;

// ============================================================================
// Display list
// ============================================================================

/// Which strategy paints a mark. The overlay strategy paints `Variable` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Bands, labels, box outlines: pre-printed on the official template.
    Static,
    /// Submission values and check marks.
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<RgbColor>,
        stroke: Option<RgbColor>,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: RgbColor,
        width: f32,
    },
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: RgbColor,
        text: String,
    },
}

/// A single drawing operation, tagged with the field it belongs to (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub layer: Layer,
    pub field: Option<String>,
    pub op: Op,
}

/// Ordered list of marks for one page (or one section while it is being laid out).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    marks: Vec<Mark>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn push(&mut self, layer: Layer, field: Option<&str>, op: Op) {
        self.marks.push(Mark {
            layer,
            field: field.map(str::to_string),
            op,
        });
    }

    /// Append another canvas's marks, keeping their order.
    pub fn extend(&mut self, other: Canvas) {
        self.marks.extend(other.marks);
    }

    // ------------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------------

    /// Bordered white box; the value is drawn only when non-empty.
    pub fn draw_field(
        &mut self,
        field: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        value: &str,
    ) {
        self.push(
            Layer::Static,
            Some(field),
            Op::Rect {
                x,
                y,
                width,
                height,
                fill: Some(WHITE),
                stroke: Some(BLACK),
                line_width: BOX_LINE_WIDTH,
            },
        );
        if !value.is_empty() {
            let baseline = y + (height - VALUE_FONT_SIZE) / 2.0 + 2.0;
            self.push(
                Layer::Variable,
                Some(field),
                Op::Text {
                    x: x + VALUE_INSET,
                    y: baseline,
                    size: VALUE_FONT_SIZE,
                    font: Font::Regular,
                    color: BLACK,
                    text: value.to_string(),
                },
            );
        }
    }

    /// Bordered box, crossed with two diagonals when checked.
    pub fn draw_checkbox(&mut self, field: &str, x: f32, y: f32, size: f32, checked: bool) {
        self.push(
            Layer::Static,
            Some(field),
            Op::Rect {
                x,
                y,
                width: size,
                height: size,
                fill: Some(WHITE),
                stroke: Some(BLACK),
                line_width: BOX_LINE_WIDTH,
            },
        );
        if checked {
            for (x1, y1, x2, y2) in [(x, y, x + size, y + size), (x + size, y, x, y + size)] {
                self.push(
                    Layer::Variable,
                    Some(field),
                    Op::Line {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: BLACK,
                        width: CHECK_LINE_WIDTH,
                    },
                );
            }
        }
    }

    /// Coloured band with its title in white, offset from the top-left corner.
    pub fn draw_section_band(&mut self, x: f32, y: f32, width: f32, height: f32, title: &str) {
        self.push(
            Layer::Static,
            None,
            Op::Rect {
                x,
                y,
                width,
                height,
                fill: Some(BAND_GREEN),
                stroke: Some(BLACK),
                line_width: BOX_LINE_WIDTH,
            },
        );
        self.push(
            Layer::Static,
            None,
            Op::Text {
                x: x + TITLE_OFFSET_X,
                y: y + height - TITLE_OFFSET_Y,
                size: SECTION_TITLE_FONT_SIZE,
                font: Font::Bold,
                color: WHITE,
                text: title.to_string(),
            },
        );
    }

    /// Field label, white on the band.
    pub fn draw_label(&mut self, x: f32, y: f32, text: &str) {
        self.draw_text(x, y, LABEL_FONT_SIZE, Font::Bold, WHITE, text);
    }

    /// Static text in an explicit style.
    pub fn draw_text(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: RgbColor,
        text: &str,
    ) {
        self.push(
            Layer::Static,
            None,
            Op::Text {
                x,
                y,
                size,
                font,
                color,
                text: text.to_string(),
            },
        );
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Marks the given strategy layer paints, in order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &Mark> {
        self.marks.iter().filter(move |m| m.layer == layer)
    }

    /// Box of the named field, if it was placed on this canvas.
    pub fn slot(&self, page: usize, field: &str) -> Option<FieldSlot> {
        self.marks.iter().find_map(|mark| match (&mark.field, &mark.op) {
            (Some(name), Op::Rect { x, y, width, height, .. }) if name == field => Some(FieldSlot {
                page,
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            }),
            _ => None,
        })
    }

    /// Variable text drawn for the named field.
    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.marks.iter().find_map(|mark| match (&mark.field, &mark.op, mark.layer) {
            (Some(name), Op::Text { text, .. }, Layer::Variable) if name == field => {
                Some(text.as_str())
            }
            _ => None,
        })
    }

    /// Whether the named checkbox carries a check mark.
    pub fn is_checked(&self, field: &str) -> bool {
        self.marks.iter().any(|mark| {
            mark.layer == Layer::Variable
                && matches!(mark.op, Op::Line { .. })
                && mark.field.as_deref() == Some(field)
        })
    }
}
