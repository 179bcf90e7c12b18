// The nine section renderers.
//
// Each takes the band's top edge and the form data and returns the painted
// section, whose `next_cursor` is where the following band starts.

use log::debug;

use super::canvas::{Font, WHITE};
use super::section::{PaintedSection, SectionLayout};
use crate::date::localize_date;
use crate::form::{EquipmentCategory, FormData, InstallationType, MeterEntry, TestCheck};
use crate::layout::*;

/// Shared signature of every section renderer.
pub type SectionRenderer = fn(f32, &FormData<'_>) -> PaintedSection;

// ============================================================================
// Shared row helpers
// ============================================================================

/// Labels over field boxes, one `FieldRow` at a time.
fn field_rows(section: &mut SectionLayout, rows: &[FieldRow], form: &FormData<'_>) {
    for row in rows {
        let top = section.cursor();
        let field_y = top - LABEL_HEIGHT - row.height;
        for cell in row.cells {
            let value = cell_value(cell, form);
            let canvas = section.canvas();
            canvas.draw_label(cell.x, top - LABEL_HEIGHT + 3.0, cell.label);
            canvas.draw_field(cell.key, cell.x, field_y, cell.width, row.height, &value);
        }
        section.advance(row.pitch());
    }
}

fn cell_value(cell: &Cell, form: &FormData<'_>) -> String {
    let raw = form.text(cell.key);
    match cell.format {
        CellFormat::Text => raw.into_owned(),
        CellFormat::Date => localize_date(&raw),
    }
}

/// Captioned checkboxes laid out on `rows` rows.
fn check_grid(section: &mut SectionLayout, cells: &[CheckCell], rows: usize, form: &FormData<'_>) {
    let top = section.cursor();
    for cell in cells {
        let y = check_y(top, cell.row as usize);
        let canvas = section.canvas();
        canvas.draw_checkbox(cell.key, cell.x, y, CHECKBOX_SIZE, form.flag(cell.key));
        canvas.draw_label(cell.x + CHECKBOX_SIZE + CHECK_CAPTION_GAP, y + 1.0, cell.label);
    }
    section.advance(rows as f32 * CHECK_ROW_PITCH);
}

/// Bottom of a checkbox centred in check row `row` below `top`.
fn check_y(top: f32, row: usize) -> f32 {
    top - (row as f32 + 1.0) * CHECK_ROW_PITCH + (CHECK_ROW_PITCH - CHECKBOX_SIZE) / 2.0
}

/// One line of body text.
fn text_line(section: &mut SectionLayout, x: f32, text: &str) {
    let baseline = section.cursor() - TEXT_FONT_SIZE - 1.0;
    section
        .canvas()
        .draw_text(x, baseline, TEXT_FONT_SIZE, Font::Regular, WHITE, text);
    section.advance(TEXT_LINE_HEIGHT);
}

/// Bold sub-heading inside a band.
fn sub_heading(section: &mut SectionLayout, text: &str) {
    let baseline = section.cursor() - TEXT_FONT_SIZE - 1.0;
    section
        .canvas()
        .draw_text(INNER_LEFT, baseline, TEXT_FONT_SIZE, Font::Bold, WHITE, text);
    section.advance(TEXT_LINE_HEIGHT);
}

/// Column titles of a table, one table row high.
fn table_header(section: &mut SectionLayout, columns: &[Column]) {
    let baseline = section.cursor() - TABLE_ROW_HEIGHT + 4.0;
    for column in columns.iter().filter(|c| !c.title.is_empty()) {
        section.canvas().draw_label(column.x + 2.0, baseline, column.title);
    }
    section.advance(TABLE_ROW_HEIGHT);
}

/// A checkbox centred in a table cell.
fn table_checkbox(section: &mut SectionLayout, field: &str, column: &Column, checked: bool) {
    let row_bottom = section.cursor() - TABLE_ROW_HEIGHT;
    let x = column.x + (column.width - CHECKBOX_SIZE) / 2.0;
    let y = row_bottom + (TABLE_ROW_HEIGHT - CHECKBOX_SIZE) / 2.0;
    section.canvas().draw_checkbox(field, x, y, CHECKBOX_SIZE, checked);
}

/// A value box filling a table cell.
fn table_field(section: &mut SectionLayout, field: &str, column: &Column, value: &str) {
    let row_bottom = section.cursor() - TABLE_ROW_HEIGHT;
    section
        .canvas()
        .draw_field(field, column.x, row_bottom, column.width, TABLE_ROW_HEIGHT, value);
}

// ============================================================================
// Page 1
// ============================================================================

pub fn installation_address(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("INSTALLATION ADDRESS", top);
    field_rows(&mut section, INSTALLATION_ADDRESS_ROWS, form);
    section.paint()
}

pub fn customer_details(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("CUSTOMER DETAILS", top);
    field_rows(&mut section, CUSTOMER_ROWS, form);
    section.paint()
}

pub fn installation_details(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("INSTALLATION DETAILS", top);

    sub_heading(&mut section, "*Type of Installation");
    let row_top = section.cursor();
    for (kind, x) in InstallationType::ALL.into_iter().zip(INSTALLATION_TYPE_X) {
        let y = check_y(row_top, 0);
        let checked = form.installation_type == Some(kind);
        let canvas = section.canvas();
        canvas.draw_checkbox(kind.field(), x, y, CHECKBOX_SIZE, checked);
        canvas.draw_label(x + CHECKBOX_SIZE + CHECK_CAPTION_GAP, y + 1.0, kind.label());
    }
    section.advance(CHECK_ROW_PITCH);

    sub_heading(&mut section, "*Work Carried Out");
    let grid_top = section.cursor();
    check_grid(&mut section, WORK_CARRIED_OUT, WORK_ROWS, form);
    {
        // Non-compliance number shares the re-inspection row.
        let last_row = (WORK_ROWS - 1) as f32;
        let row_bottom = grid_top - (last_row + 1.0) * CHECK_ROW_PITCH;
        let value = form.text(NON_COMPLIANCE.key).into_owned();
        let canvas = section.canvas();
        canvas.draw_label(
            NON_COMPLIANCE_LABEL_X,
            check_y(grid_top, WORK_ROWS - 1) + 1.0,
            NON_COMPLIANCE.label,
        );
        canvas.draw_field(
            NON_COMPLIANCE.key,
            NON_COMPLIANCE.x,
            row_bottom + 0.5,
            NON_COMPLIANCE.width,
            CHECK_ROW_PITCH - 1.0,
            &value,
        );
    }

    sub_heading(&mut section, "Special Conditions");
    check_grid(&mut section, SPECIAL_CONDITIONS, SPECIAL_ROWS, form);

    section.paint()
}

// ============================================================================
// Page 2
// ============================================================================

pub fn equipment(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("DETAILS OF EQUIPMENT", top);
    table_header(&mut section, &EQUIPMENT_COLUMNS);

    let [check_col, name_col, rating_col, quantity_col, particulars_col] = &EQUIPMENT_COLUMNS;
    for category in EquipmentCategory::ALL.into_iter().take(EQUIPMENT_ROW_CAP) {
        let item = form.equipment_item(category);

        table_checkbox(&mut section, category.key(), check_col, item.is_some());
        let baseline = section.cursor() - TABLE_ROW_HEIGHT + 4.0;
        section.canvas().draw_label(name_col.x + 2.0, baseline, category.label());

        let (rating, quantity, particulars) = match item {
            Some(item) => (item.rating.as_str(), item.quantity.as_str(), item.particulars.as_str()),
            None => ("", "", ""),
        };
        table_field(&mut section, &category.rating_key(), rating_col, rating);
        table_field(&mut section, &category.quantity_key(), quantity_col, quantity);
        table_field(&mut section, &category.particulars_key(), particulars_col, particulars);

        section.advance(TABLE_ROW_HEIGHT);
    }

    section.paint()
}

pub fn meters(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("METERS", top);
    table_header(&mut section, &METER_COLUMNS);

    if form.meters.len() > METER_ROW_CAP {
        debug!(
            "{} meters supplied; only the first {} fit the table",
            form.meters.len(),
            METER_ROW_CAP
        );
    }

    let blank = MeterEntry::default();
    for row in 1..=METER_ROW_CAP {
        let meter = form.meters.get(row - 1).unwrap_or(&blank);
        meter_row(&mut section, row, meter);
        section.advance(TABLE_ROW_HEIGHT);
    }

    section.advance(ROW_GAP);
    load_details(&mut section, form);

    section.paint()
}

fn meter_row(section: &mut SectionLayout, row: usize, meter: &MeterEntry) {
    let field = |suffix: &str| format!("meter_{}_{}", row, suffix);
    let [
        installed,
        removed,
        existing,
        number,
        dials,
        master_sub,
        wired_as,
        register_no,
        reading,
        tariff,
    ] = &METER_COLUMNS;

    table_checkbox(section, &field("i"), installed, meter.installed);
    table_checkbox(section, &field("r"), removed, meter.removed);
    table_checkbox(section, &field("e"), existing, meter.existing);

    let values = [
        ("number", number, &meter.number),
        ("dials", dials, &meter.dials),
        ("master_sub", master_sub, &meter.master_sub),
        ("wired_as", wired_as, &meter.wired_as),
        ("register_no", register_no, &meter.register_no),
        ("reading", reading, &meter.reading),
        ("tariff", tariff, &meter.tariff),
    ];
    for (suffix, column, value) in values {
        table_field(section, &field(suffix), column, value);
    }
}

/// Load increase plus the two Yes/No questions under the meter table.
fn load_details(section: &mut SectionLayout, form: &FormData<'_>) {
    let top = section.cursor();
    let value = form.text(LOAD_INCREASE.key).into_owned();
    let canvas = section.canvas();
    canvas.draw_label(INNER_LEFT, top - FIELD_HEIGHT + 4.0, LOAD_INCREASE.label);
    canvas.draw_field(
        LOAD_INCREASE.key,
        LOAD_INCREASE.x,
        top - FIELD_HEIGHT,
        LOAD_INCREASE.width,
        FIELD_HEIGHT,
        &value,
    );
    section.advance(FIELD_HEIGHT + ROW_GAP);

    for &(key, question) in LOAD_QUESTIONS {
        let y = check_y(section.cursor(), 0);
        let yes_field = format!("{}_yes", key);
        let no_field = format!("{}_no", key);
        let canvas = section.canvas();
        canvas.draw_label(INNER_LEFT, y + 1.0, question);
        canvas.draw_checkbox(&yes_field, YES_X, y, CHECKBOX_SIZE, form.flag(key));
        canvas.draw_label(YES_X + CHECKBOX_SIZE + CHECK_CAPTION_GAP, y + 1.0, "Yes");
        canvas.draw_checkbox(&no_field, NO_X, y, CHECKBOX_SIZE, form.declined(key));
        canvas.draw_label(NO_X + CHECKBOX_SIZE + CHECK_CAPTION_GAP, y + 1.0, "No");
        section.advance(CHECK_ROW_PITCH + 2.0);
    }
}

pub fn installer_license(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("INSTALLERS LICENSE DETAILS", top);
    field_rows(&mut section, INSTALLER_ROWS, form);
    section.paint()
}

// ============================================================================
// Page 3
// ============================================================================

pub fn test_report(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("*TEST REPORT", top);

    text_line(
        &mut section,
        INNER_LEFT,
        concat!(
            "In respect to the test carried out by me on the above mentioned installation, ",
            "I certify that:",
        ),
    );
    text_line(
        &mut section,
        INNER_LEFT,
        concat!(
            "1.  I have carried out the test below and that the installation has passed ",
            "the following requirements:",
        ),
    );

    for check in TestCheck::ALL {
        let y = check_y(section.cursor(), 0);
        let canvas = section.canvas();
        canvas.draw_checkbox(
            check.name(),
            TEST_CHECK_X,
            y,
            CHECKBOX_SIZE,
            form.tests.passed(check),
        );
        canvas.draw_text(
            TEST_CHECK_X + CHECKBOX_SIZE + CHECK_CAPTION_GAP,
            y + 1.0,
            TEXT_FONT_SIZE,
            Font::Regular,
            WHITE,
            check.label(),
        );
        section.advance(CHECK_ROW_PITCH);
    }

    text_line(
        &mut section,
        INNER_LEFT,
        concat!(
            "2.  I confirm that I have visually checked that the installation described ",
            "in this Certificate complies with the",
        ),
    );
    text_line(&mut section, INNER_LEFT + 12.0, "relevant Acts, Regulations, Codes and Standards.");

    let top = section.cursor();
    let value = cell_value(&TEST_DATE, form);
    let canvas = section.canvas();
    canvas.draw_text(
        INNER_LEFT,
        top - FIELD_HEIGHT + 4.0,
        TEXT_FONT_SIZE,
        Font::Regular,
        WHITE,
        TEST_DATE.label,
    );
    canvas.draw_field(
        TEST_DATE.key,
        TEST_DATE.x,
        top - FIELD_HEIGHT,
        TEST_DATE.width,
        FIELD_HEIGHT,
        &value,
    );
    section.advance(FIELD_HEIGHT + ROW_GAP);

    section.paint()
}

pub fn tester_license(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("TESTERS LICENSE DETAILS", top);
    field_rows(&mut section, TESTER_ROWS, form);
    text_line(
        &mut section,
        INNER_LEFT,
        concat!(
            "In my capacity as the Tester, I certify that the electrical work carried out ",
            "on the above mentioned property",
        ),
    );
    text_line(&mut section, INNER_LEFT, "was completed by the nominated electrician.");
    section.paint()
}

pub fn submission(top: f32, form: &FormData<'_>) -> PaintedSection {
    let mut section = SectionLayout::begin("*SUBMIT CCEW", top);
    field_rows(&mut section, SUBMISSION_ROWS, form);
    section.paint()
}
