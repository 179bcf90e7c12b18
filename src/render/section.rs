// Two-phase section drawing.
//
// A band's height is only known once its rows are laid out, but the band has
// to be painted underneath them. Phase one (`SectionLayout`) lays content out
// top-down and measures it; phase two (`SectionLayout::paint`) emits the band
// first and then replays the phase-one content on top of it.

use super::canvas::Canvas;
use crate::layout::{BAND_LEFT, BAND_TITLE_HEIGHT, BAND_WIDTH, SECTION_GUTTER, SECTION_PADDING};

/// Phase one: content of a section laid out below its (not yet painted) title.
#[derive(Debug)]
pub struct SectionLayout {
    title: &'static str,
    top: f32,
    cursor: f32,
    content: Canvas,
}

/// Phase two result: the band plus content, ready to append to a page.
#[derive(Debug)]
pub struct PaintedSection {
    pub canvas: Canvas,
    pub top: f32,
    pub height: f32,
    /// Where the next section starts.
    pub next_cursor: f32,
}

impl SectionLayout {
    /// Start a section whose band top edge sits at `top`. The title area is
    /// reserved immediately; its band is painted in phase two.
    pub fn begin(title: &'static str, top: f32) -> Self {
        Self {
            title,
            top,
            cursor: top - BAND_TITLE_HEIGHT,
            content: Canvas::new(),
        }
    }

    /// Top edge of the next row to lay out.
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor -= dy;
    }

    pub fn canvas(&mut self) -> &mut Canvas {
        &mut self.content
    }

    /// Height measured so far, bottom padding included.
    pub fn height(&self) -> f32 {
        self.top - self.cursor + SECTION_PADDING
    }

    /// Phase two: band first, then every phase-one mark on top of it.
    pub fn paint(self) -> PaintedSection {
        let height = self.height();
        let bottom = self.top - height;

        let mut canvas = Canvas::new();
        canvas.draw_section_band(BAND_LEFT, bottom, BAND_WIDTH, height, self.title);
        canvas.extend(self.content);

        PaintedSection {
            canvas,
            top: self.top,
            height,
            next_cursor: bottom - SECTION_GUTTER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::{BAND_GREEN, Op};

    #[test]
    fn measures_title_plus_rows_plus_padding() {
        let mut section = SectionLayout::begin("TEST", 700.0);
        section.advance(30.0);
        section.advance(30.0);
        assert_eq!(section.height(), BAND_TITLE_HEIGHT + 60.0 + SECTION_PADDING);
    }

    #[test]
    fn band_is_painted_beneath_the_content() {
        let mut section = SectionLayout::begin("CUSTOMER DETAILS", 700.0);
        section.canvas().draw_label(62.0, 670.0, "*First Name");
        section.canvas().draw_field("customer_first_name", 62.0, 655.0, 232.0, 14.0, "Jim");
        section.advance(40.0);
        let painted = section.paint();

        let marks = painted.canvas.marks();
        match &marks[0].op {
            Op::Rect { y, height, fill, .. } => {
                assert_eq!(*fill, Some(BAND_GREEN));
                assert_eq!(*y + *height, 700.0);
                assert_eq!(*height, painted.height);
            }
            other => panic!("band must come first, got {:?}", other),
        }
        assert_eq!(painted.canvas.value_of("customer_first_name"), Some("Jim"));
        // band rect + band title, then the three content marks
        assert_eq!(marks.len(), 5);
    }

    #[test]
    fn next_section_starts_below_the_gutter() {
        let mut section = SectionLayout::begin("X", 500.0);
        section.advance(100.0);
        let painted = section.paint();
        assert_eq!(painted.next_cursor, 500.0 - painted.height - SECTION_GUTTER);
    }
}
