// Page assembler: three fixed pages, three sections each, no reflow.

use super::canvas::{Canvas, Font, BLACK, NSW_RED};
use super::sections::{self, SectionRenderer};
use crate::form::FormData;
use crate::layout::*;
use crate::record::SERIAL_KEY;

static PAGE_SECTIONS: [&[SectionRenderer]; PAGE_COUNT] = [
    &[
        sections::installation_address,
        sections::customer_details,
        sections::installation_details,
    ],
    &[sections::equipment, sections::meters, sections::installer_license],
    &[sections::test_report, sections::tester_license, sections::submission],
];

/// The laid-out form: one display list per page, in page order.
#[derive(Debug, Clone)]
pub struct FormPlan {
    pages: Vec<Canvas>,
}

impl FormPlan {
    pub fn build(form: &FormData<'_>) -> Self {
        let pages = PAGE_SECTIONS
            .iter()
            .enumerate()
            .map(|(index, renderers)| {
                let number = index + 1;
                let mut canvas = Canvas::new();
                let mut cursor = PAGE_TOP;
                if number == 1 {
                    masthead(&mut canvas, form);
                    cursor = FIRST_PAGE_TOP;
                }
                for render in renderers.iter() {
                    let section = render(cursor, form);
                    cursor = section.next_cursor;
                    canvas.extend(section.canvas);
                }
                footer(&mut canvas, number);
                canvas
            })
            .collect();

        Self { pages }
    }

    pub fn pages(&self) -> &[Canvas] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Absolute position of a field, searching every page.
    pub fn slot(&self, field: &str) -> Option<FieldSlot> {
        self.pages
            .iter()
            .enumerate()
            .find_map(|(index, canvas)| canvas.slot(index + 1, field))
    }

    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.pages.iter().find_map(|canvas| canvas.value_of(field))
    }

    pub fn is_checked(&self, field: &str) -> bool {
        self.pages.iter().any(|canvas| canvas.is_checked(field))
    }
}

/// Regulator name, form title and the serial-number box.
fn masthead(canvas: &mut Canvas, form: &FormData<'_>) {
    canvas.draw_text(INNER_LEFT, MASTHEAD_Y, MASTHEAD_FONT_SIZE, Font::Bold, NSW_RED, "NSW");
    canvas.draw_text(
        INNER_LEFT + 36.0,
        MASTHEAD_Y,
        MASTHEAD_FONT_SIZE,
        Font::Bold,
        BLACK,
        "Fair Trading",
    );
    canvas.draw_text(
        INNER_LEFT,
        FORM_TITLE_Y,
        FORM_TITLE_FONT_SIZE,
        Font::Bold,
        BLACK,
        "Certificate of Compliance for Electrical Work (CCEW)",
    );
    canvas.draw_text(
        INNER_LEFT,
        MANDATORY_NOTE_Y,
        LABEL_FONT_SIZE,
        Font::Regular,
        BLACK,
        "Fields marked with an * are mandatory",
    );

    canvas.draw_text(
        SERIAL_LABEL_X,
        SERIAL.y + 4.0,
        LABEL_FONT_SIZE,
        Font::Bold,
        BLACK,
        "Serial No.",
    );
    let serial = form.serial_no().unwrap_or_default();
    canvas.draw_field(SERIAL_KEY, SERIAL.x, SERIAL.y, SERIAL.width, SERIAL.height, &serial);
}

fn footer(canvas: &mut Canvas, number: usize) {
    canvas.draw_text(
        PAGE_WIDTH / 2.0 - 20.0,
        FOOTER_Y,
        TEXT_FONT_SIZE,
        Font::Regular,
        BLACK,
        &format!("Page {} of {}", number, PAGE_COUNT),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SubmissionRecord;
    use crate::render::canvas::Op;
    use serde_json::json;

    fn plan_for(value: serde_json::Value) -> FormPlan {
        let record = SubmissionRecord::from_value(value).unwrap();
        FormPlan::build(&FormData::from_record(&record))
    }

    #[test]
    fn always_three_pages() {
        assert_eq!(plan_for(json!({})).page_count(), PAGE_COUNT);
    }

    #[test]
    fn sections_land_on_their_pages() {
        let plan = plan_for(json!({}));
        assert_eq!(plan.slot("property_name").map(|s| s.page), Some(1));
        assert_eq!(plan.slot("non_compliance_no").map(|s| s.page), Some(1));
        assert_eq!(plan.slot("equip_storage_rating").map(|s| s.page), Some(2));
        assert_eq!(plan.slot("installer_contractor_license").map(|s| s.page), Some(2));
        assert_eq!(plan.slot("test_date").map(|s| s.page), Some(3));
        assert_eq!(plan.slot("signature").map(|s| s.page), Some(3));
        assert_eq!(plan.slot(SERIAL_KEY), Some(SERIAL));
    }

    #[test]
    fn content_stays_above_the_footer() {
        let plan = plan_for(json!({}));
        for page in plan.pages() {
            for mark in page.marks().iter().filter(|m| m.field.is_some()) {
                if let Op::Rect { y, .. } = mark.op {
                    assert!(y > FOOTER_Y + 10.0, "{:?} runs into the footer", mark.field);
                }
            }
        }
    }

    #[test]
    fn serial_shows_in_the_masthead() {
        let plan = plan_for(json!({"serial_no": 3015}));
        assert_eq!(plan.value_of(SERIAL_KEY), Some("3015"));
    }

    #[test]
    fn checkbox_follows_the_sentinel() {
        let plan = plan_for(json!({
            "work_new_work": "yes",
            "work_ev_connection": "Yes",
            "special_off_grid": true,
        }));
        assert!(plan.is_checked("work_new_work"));
        assert!(!plan.is_checked("work_ev_connection"));
        assert!(plan.is_checked("special_off_grid"));
    }
}
