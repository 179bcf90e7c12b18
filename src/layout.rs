// Layout registry: every coordinate the CCEW form uses, in one place.
//
// Units are PDF points with the origin at the bottom-left of an A4 page.
// Field rows are stored top-down relative to the top of their section; the
// section renderer resolves absolute y once it knows its start cursor. x is
// always absolute because every section spans the full band width.

// ============================================================================
// Page geometry
// ============================================================================

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const PAGE_COUNT: usize = 3;

/// Left edge and width of every section band.
pub const BAND_LEFT: f32 = 56.0;
pub const BAND_WIDTH: f32 = 482.0;

/// Content area inside a band.
pub const INNER_LEFT: f32 = 62.0;
pub const INNER_WIDTH: f32 = 470.0;

/// First section cursor on pages 2 and 3.
pub const PAGE_TOP: f32 = 806.0;
/// First section cursor on page 1, below the masthead.
pub const FIRST_PAGE_TOP: f32 = 736.0;

pub const FOOTER_Y: f32 = 24.0;

// ============================================================================
// Section banding
// ============================================================================

pub const BAND_TITLE_HEIGHT: f32 = 20.0;
/// Title baseline offset from the band's top-left corner.
pub const TITLE_OFFSET_X: f32 = 6.0;
pub const TITLE_OFFSET_Y: f32 = 14.0;
pub const SECTION_PADDING: f32 = 6.0;
pub const SECTION_GUTTER: f32 = 8.0;

// ============================================================================
// Rows
// ============================================================================

pub const LABEL_HEIGHT: f32 = 11.0;
pub const FIELD_HEIGHT: f32 = 14.0;
pub const ROW_GAP: f32 = 4.0;
pub const TEXT_LINE_HEIGHT: f32 = 12.0;

pub const CHECKBOX_SIZE: f32 = 8.0;
pub const CHECK_ROW_PITCH: f32 = 13.0;
/// Gap between a checkbox and its caption.
pub const CHECK_CAPTION_GAP: f32 = 4.0;

/// Row pitch shared by the equipment and meter tables.
pub const TABLE_ROW_HEIGHT: f32 = 15.0;
pub const EQUIPMENT_ROW_CAP: usize = 7;
pub const METER_ROW_CAP: usize = 8;

// ============================================================================
// Type sizes
// ============================================================================

pub const MASTHEAD_FONT_SIZE: f32 = 14.0;
pub const FORM_TITLE_FONT_SIZE: f32 = 13.0;
pub const SECTION_TITLE_FONT_SIZE: f32 = 11.0;
pub const LABEL_FONT_SIZE: f32 = 7.0;
pub const TEXT_FONT_SIZE: f32 = 8.0;
pub const VALUE_FONT_SIZE: f32 = 9.0;

// ============================================================================
// Field tables
// ============================================================================

/// Absolute position of a placed field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSlot {
    /// 1-based page number.
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    Text,
    /// ISO dates are localized before drawing.
    Date,
}

/// A labeled field box inside a row.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub key: &'static str,
    pub label: &'static str,
    pub x: f32,
    pub width: f32,
    pub format: CellFormat,
}

/// One row of labels over field boxes.
#[derive(Debug, Clone, Copy)]
pub struct FieldRow {
    pub cells: &'static [Cell],
    /// Height of the field boxes in this row.
    pub height: f32,
}

impl FieldRow {
    /// Vertical space the row consumes, gap included.
    pub const fn pitch(&self) -> f32 {
        LABEL_HEIGHT + self.height + ROW_GAP
    }
}

/// A captioned checkbox at a fixed column within a checkbox grid.
#[derive(Debug, Clone, Copy)]
pub struct CheckCell {
    pub key: &'static str,
    pub label: &'static str,
    pub x: f32,
    pub row: u8,
}

/// A table column: header title plus horizontal extent.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub x: f32,
    pub width: f32,
}

const fn text(key: &'static str, label: &'static str, x: f32, width: f32) -> Cell {
    Cell { key, label, x, width, format: CellFormat::Text }
}

const fn date(key: &'static str, label: &'static str, x: f32, width: f32) -> Cell {
    Cell { key, label, x, width, format: CellFormat::Date }
}

const fn check(key: &'static str, label: &'static str, x: f32, row: u8) -> CheckCell {
    CheckCell { key, label, x, row }
}

// Address-shaped rows shared by the customer, installer and tester blocks.

macro_rules! name_row {
    ($p:literal) => {
        FieldRow {
            cells: &[
                text(concat!($p, "first_name"), "*First Name", 62.0, 232.0),
                text(concat!($p, "last_name"), "*Last Name", 300.0, 232.0),
            ],
            height: FIELD_HEIGHT,
        }
    };
}

macro_rules! premises_row {
    ($p:literal) => {
        FieldRow {
            cells: &[
                text(concat!($p, "floor"), "Floor", 62.0, 70.0),
                text(concat!($p, "unit"), "Unit", 138.0, 70.0),
                text(concat!($p, "street_number"), "*Street Number", 214.0, 100.0),
                text(concat!($p, "lot_rmb"), "&/or Lot/RMB", 320.0, 212.0),
            ],
            height: FIELD_HEIGHT,
        }
    };
}

macro_rules! street_row {
    ($p:literal) => {
        FieldRow {
            cells: &[
                text(concat!($p, "street_name"), "*Street Name", 62.0, 232.0),
                text(concat!($p, "nearest_cross"), "Nearest Cross Street", 300.0, 232.0),
            ],
            height: FIELD_HEIGHT,
        }
    };
}

macro_rules! locality_row {
    ($p:literal) => {
        FieldRow {
            cells: &[
                text(concat!($p, "suburb"), "*Suburb", 62.0, 232.0),
                text(concat!($p, "state"), "*State", 300.0, 100.0),
                text(concat!($p, "postcode"), "*Post Code", 406.0, 126.0),
            ],
            height: FIELD_HEIGHT,
        }
    };
}

macro_rules! contact_row {
    ($p:literal, $email:literal, $office:literal) => {
        FieldRow {
            cells: &[
                text(concat!($p, "email"), $email, 62.0, 232.0),
                text(concat!($p, "office_phone"), $office, 300.0, 110.0),
                text(concat!($p, "mobile_phone"), "Mobile No.", 416.0, 116.0),
            ],
            height: FIELD_HEIGHT,
        }
    };
}

macro_rules! license_row {
    ($p:literal) => {
        FieldRow {
            cells: &[
                text(concat!($p, "license_no"), "*Licence / Supervisor No.", 62.0, 232.0),
                date(concat!($p, "license_expiry"), "*Licence Expiry", 300.0, 232.0),
            ],
            height: FIELD_HEIGHT,
        }
    };
}

macro_rules! contractor_row {
    ($p:literal) => {
        FieldRow {
            cells: &[
                text(concat!($p, "contractor_license"), "Contractor Licence No.", 62.0, 232.0),
                date(concat!($p, "contractor_expiry"), "Contractor Licence Expiry", 300.0, 232.0),
            ],
            height: FIELD_HEIGHT,
        }
    };
}

pub static INSTALLATION_ADDRESS_ROWS: &[FieldRow] = &[
    FieldRow {
        cells: &[text("property_name", "Property Name", 62.0, 470.0)],
        height: FIELD_HEIGHT,
    },
    premises_row!("install_"),
    FieldRow {
        cells: &[
            text("install_street_name", "*Street Name", 62.0, 232.0),
            text("nearest_cross_street", "Nearest Cross Street", 300.0, 232.0),
        ],
        height: FIELD_HEIGHT,
    },
    locality_row!("install_"),
    FieldRow {
        cells: &[
            text("pit_pillar_pole_no", "Pit/Pillar/Pole No.", 62.0, 110.0),
            text("nmi", "NMI", 178.0, 110.0),
            text("meter_no", "Meter No.", 294.0, 110.0),
            text("aemo_provider_id", "AEMO Metering Provider I.D.", 410.0, 122.0),
        ],
        height: FIELD_HEIGHT,
    },
];

pub static CUSTOMER_ROWS: &[FieldRow] = &[
    name_row!("customer_"),
    FieldRow {
        cells: &[text("customer_company_name", "Company Name", 62.0, 470.0)],
        height: FIELD_HEIGHT,
    },
    premises_row!("customer_"),
    street_row!("customer_"),
    locality_row!("customer_"),
    contact_row!("customer_", "Email", "Office No."),
];

pub static INSTALLER_ROWS: &[FieldRow] = &[
    name_row!("installer_"),
    premises_row!("installer_"),
    street_row!("installer_"),
    locality_row!("installer_"),
    contact_row!("installer_", "*Email", "*Office No."),
    license_row!("installer_"),
    contractor_row!("installer_"),
];

pub static TESTER_ROWS: &[FieldRow] = &[
    name_row!("tester_"),
    premises_row!("tester_"),
    street_row!("tester_"),
    locality_row!("tester_"),
    contact_row!("tester_", "*Email", "Office No."),
    license_row!("tester_"),
    contractor_row!("tester_"),
];

pub static SUBMISSION_ROWS: &[FieldRow] = &[
    FieldRow {
        cells: &[text("energy_provider", "*Energy Provider", 62.0, 470.0)],
        height: FIELD_HEIGHT,
    },
    FieldRow {
        cells: &[text("meter_provider_email", "*Meter Provider's Email", 62.0, 470.0)],
        height: FIELD_HEIGHT,
    },
    FieldRow {
        cells: &[text("owner_email", "Owner's Email", 62.0, 470.0)],
        height: FIELD_HEIGHT,
    },
    FieldRow {
        cells: &[text("signature", "*Signature", 62.0, 230.0)],
        height: 40.0,
    },
];

// ============================================================================
// Installation details
// ============================================================================

/// Columns of the installation-type radio row, in `InstallationType::ALL` order.
pub const INSTALLATION_TYPE_X: [f32; 5] = [62.0, 150.0, 238.0, 312.0, 380.0];

#[rustfmt::skip]
pub static WORK_CARRIED_OUT: &[CheckCell] = &[
    check("work_new_work", "New Work", 62.0, 0),
    check("work_installed_meter", "Installed Meter", 220.0, 0),
    check("work_network_connection", "Network connection", 380.0, 0),
    check("work_addition_alteration", "Addition/alteration to existing", 62.0, 1),
    check("work_advanced_meter", "Install Advanced Meter", 220.0, 1),
    check("work_ev_connection", "EV Connection", 380.0, 1),
    check("work_reinspection", "Re-inspection of non-compliant work", 62.0, 2),
];

pub const WORK_ROWS: usize = 3;

/// Sits on the last work-carried-out row, right of the re-inspection box.
pub const NON_COMPLIANCE_LABEL_X: f32 = 262.0;
pub const NON_COMPLIANCE: Cell = text("non_compliance_no", "Non-Compliance No.", 340.0, 192.0);

#[rustfmt::skip]
pub static SPECIAL_CONDITIONS: &[CheckCell] = &[
    check("special_over_100_amps", "Over 100 amps", 62.0, 0),
    check("special_hazardous_area", "Hazardous Area", 220.0, 0),
    check("special_off_grid", "Off Grid Installation", 380.0, 0),
    check("special_high_voltage", "High Voltage", 62.0, 1),
    check("special_unmetered", "Unmetered Supply", 220.0, 1),
    check("special_secondary_power", "Secondary Power Supply", 380.0, 1),
];

pub const SPECIAL_ROWS: usize = 2;

// ============================================================================
// Tables
// ============================================================================

/// Checkbox, category name, then the three value columns.
#[rustfmt::skip]
pub static EQUIPMENT_COLUMNS: [Column; 5] = [
    Column { title: "", x: 62.0, width: 24.0 },
    Column { title: "EQUIPMENT", x: 86.0, width: 106.0 },
    Column { title: "RATING", x: 192.0, width: 90.0 },
    Column { title: "NUMBER INSTALLED", x: 282.0, width: 90.0 },
    Column { title: "PARTICULARS", x: 372.0, width: 160.0 },
];

/// Installed / Removed / Existing flags, then the seven value columns.
#[rustfmt::skip]
pub static METER_COLUMNS: [Column; 10] = [
    Column { title: "I", x: 62.0, width: 18.0 },
    Column { title: "R", x: 80.0, width: 18.0 },
    Column { title: "E", x: 98.0, width: 18.0 },
    Column { title: "Meter No.", x: 116.0, width: 78.0 },
    Column { title: "Dials", x: 194.0, width: 34.0 },
    Column { title: "Master/Sub", x: 228.0, width: 50.0 },
    Column { title: "Wired As", x: 278.0, width: 58.0 },
    Column { title: "Register No.", x: 336.0, width: 58.0 },
    Column { title: "Reading", x: 394.0, width: 66.0 },
    Column { title: "Tariff", x: 460.0, width: 72.0 },
];

pub const LOAD_INCREASE: Cell = text(
    "load_increase",
    "Estimated increase in load A/ph due to work covered by this certificate",
    400.0,
    132.0,
);

/// Yes/No questions under the meter table: record key and question text.
pub static LOAD_QUESTIONS: &[(&str, &str)] = &[
    ("load_within_capacity", "Is the increased load within capacity of installation/service?"),
    ("work_connected", "Is the work connected to supply? (pending DSNP inspection)"),
];

pub const YES_X: f32 = 400.0;
pub const NO_X: f32 = 460.0;

// ============================================================================
// Test report
// ============================================================================

pub const TEST_CHECK_X: f32 = 72.0;
pub const TEST_DATE: Cell = date("test_date", "3. *The test was completed on", 232.0, 110.0);

// ============================================================================
// Masthead (page 1)
// ============================================================================

pub const MASTHEAD_Y: f32 = 796.0;
pub const FORM_TITLE_Y: f32 = 768.0;
pub const MANDATORY_NOTE_Y: f32 = 754.0;
pub const SERIAL_LABEL_X: f32 = 404.0;
pub const SERIAL: FieldSlot = FieldSlot {
    page: 1,
    x: 452.0,
    y: 792.0,
    width: 80.0,
    height: FIELD_HEIGHT,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn all_rows() -> impl Iterator<Item = &'static FieldRow> {
        INSTALLATION_ADDRESS_ROWS
            .iter()
            .chain(CUSTOMER_ROWS)
            .chain(INSTALLER_ROWS)
            .chain(TESTER_ROWS)
            .chain(SUBMISSION_ROWS)
    }

    #[test]
    fn cells_stay_inside_the_band() {
        for row in all_rows() {
            for cell in row.cells {
                assert!(cell.x >= INNER_LEFT, "{} starts left of the band", cell.key);
                assert!(
                    cell.x + cell.width <= INNER_LEFT + INNER_WIDTH + 0.01,
                    "{} overflows the band",
                    cell.key
                );
            }
        }
    }

    #[test]
    fn cells_in_a_row_do_not_overlap() {
        for row in all_rows() {
            for pair in row.cells.windows(2) {
                let (left, right) = (&pair[0], &pair[1]);
                assert!(left.x + left.width <= right.x, "{} overlaps {}", left.key, right.key);
            }
        }
    }

    #[test]
    fn field_keys_are_unique() {
        let mut keys: Vec<&str> = all_rows().flat_map(|r| r.cells.iter().map(|c| c.key)).collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn prefixed_rows_expand_to_record_keys() {
        let keys: Vec<&str> =
            TESTER_ROWS.iter().flat_map(|r| r.cells.iter().map(|c| c.key)).collect();
        assert!(keys.contains(&"tester_contractor_license"));
        assert!(keys.contains(&"tester_license_no"));
        assert!(keys.contains(&"tester_nearest_cross"));
    }

    #[test]
    fn table_columns_tile_the_content_width() {
        let equipment: f32 = EQUIPMENT_COLUMNS.iter().map(|c| c.width).sum();
        let meters: f32 = METER_COLUMNS.iter().map(|c| c.width).sum();
        assert_eq!(equipment, INNER_WIDTH);
        assert_eq!(meters, INNER_WIDTH);
        for columns in [&EQUIPMENT_COLUMNS[..], &METER_COLUMNS[..]] {
            for pair in columns.windows(2) {
                assert_eq!(pair[0].x + pair[0].width, pair[1].x);
            }
        }
    }
}
