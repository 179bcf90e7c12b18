// Data transformer: flat submission record -> the structures the section
// renderers consume.

use log::debug;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::record::{is_truthy, value_text, SubmissionRecord};

// ============================================================================
// Installation type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationType {
    Residential,
    Commercial,
    Industrial,
    Rural,
    MixedDevelopment,
}

impl InstallationType {
    /// Order of the radio row on the form.
    pub const ALL: [InstallationType; 5] = [
        InstallationType::Residential,
        InstallationType::Commercial,
        InstallationType::Industrial,
        InstallationType::Rural,
        InstallationType::MixedDevelopment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InstallationType::Residential => "Residential",
            InstallationType::Commercial => "Commercial",
            InstallationType::Industrial => "Industrial",
            InstallationType::Rural => "Rural",
            InstallationType::MixedDevelopment => "Mixed Development",
        }
    }

    /// Field name of this option's checkbox.
    pub fn field(self) -> &'static str {
        match self {
            InstallationType::Residential => "installation_type_residential",
            InstallationType::Commercial => "installation_type_commercial",
            InstallationType::Industrial => "installation_type_industrial",
            InstallationType::Rural => "installation_type_rural",
            InstallationType::MixedDevelopment => "installation_type_mixed_development",
        }
    }

    /// Case-insensitive; spaces, dashes and underscores are interchangeable.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        match normalized.as_str() {
            "residential" => Some(InstallationType::Residential),
            "commercial" => Some(InstallationType::Commercial),
            "industrial" => Some(InstallationType::Industrial),
            "rural" => Some(InstallationType::Rural),
            "mixed_development" | "mixed" => Some(InstallationType::MixedDevelopment),
            _ => None,
        }
    }
}

// ============================================================================
// Equipment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentCategory {
    Switchboard,
    Circuits,
    Lighting,
    SocketOutlets,
    Appliances,
    Generation,
    Storage,
}

impl EquipmentCategory {
    /// Table order.
    pub const ALL: [EquipmentCategory; 7] = [
        EquipmentCategory::Switchboard,
        EquipmentCategory::Circuits,
        EquipmentCategory::Lighting,
        EquipmentCategory::SocketOutlets,
        EquipmentCategory::Appliances,
        EquipmentCategory::Generation,
        EquipmentCategory::Storage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EquipmentCategory::Switchboard => "Switchboard",
            EquipmentCategory::Circuits => "Circuits",
            EquipmentCategory::Lighting => "Lighting",
            EquipmentCategory::SocketOutlets => "Socket Outlets",
            EquipmentCategory::Appliances => "Appliances",
            EquipmentCategory::Generation => "Generation",
            EquipmentCategory::Storage => "Storage",
        }
    }

    /// Record key of the category's checkbox; value keys append a suffix.
    pub fn key(self) -> &'static str {
        match self {
            EquipmentCategory::Switchboard => "equip_switchboard",
            EquipmentCategory::Circuits => "equip_circuits",
            EquipmentCategory::Lighting => "equip_lighting",
            EquipmentCategory::SocketOutlets => "equip_sockets",
            EquipmentCategory::Appliances => "equip_appliances",
            EquipmentCategory::Generation => "equip_generation",
            EquipmentCategory::Storage => "equip_storage",
        }
    }

    pub fn rating_key(self) -> String {
        format!("{}_rating", self.key())
    }

    pub fn quantity_key(self) -> String {
        format!("{}_number", self.key())
    }

    pub fn particulars_key(self) -> String {
        format!("{}_particulars", self.key())
    }
}

/// A checked equipment category with its values.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentItem {
    pub category: EquipmentCategory,
    pub rating: String,
    pub quantity: String,
    pub particulars: String,
}

// ============================================================================
// Meters
// ============================================================================

/// Flat meter slots read from `meter_{n}_*` keys.
pub const METER_SLOTS: usize = 8;

/// Key under which meters may arrive as a nested list.
pub const METERS_KEY: &str = "meters";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeterEntry {
    pub installed: bool,
    pub removed: bool,
    pub existing: bool,
    pub number: String,
    pub dials: String,
    pub master_sub: String,
    pub wired_as: String,
    pub register_no: String,
    pub reading: String,
    pub tariff: String,
}

impl MeterEntry {
    /// Build an entry from any suffix lookup. `None` when the slot is absent:
    /// no type flag set and no meter number.
    fn read<'v>(lookup: impl Fn(&str) -> Option<&'v Value>) -> Option<Self> {
        let text = |suffix: &str| {
            lookup(suffix)
                .map(value_text)
                .unwrap_or(Cow::Borrowed(""))
                .into_owned()
        };
        let flag = |suffix: &str| lookup(suffix).map(is_truthy).unwrap_or(false);

        let present = ["i", "r", "e", "number"].into_iter().any(|suffix| !text(suffix).is_empty());
        if !present {
            return None;
        }

        Some(MeterEntry {
            installed: flag("i"),
            removed: flag("r"),
            existing: flag("e"),
            number: text("number"),
            dials: text("dials"),
            master_sub: text("master_sub"),
            wired_as: text("wired_as"),
            register_no: text("register_no"),
            reading: text("reading"),
            tariff: text("tariff"),
        })
    }

    /// Flat slot `n` (1-based).
    pub fn from_slot(record: &SubmissionRecord, n: usize) -> Option<Self> {
        Self::read(|suffix| record.get(&format!("meter_{}_{}", n, suffix)))
    }

    /// One object of the nested `meters` list.
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        Self::read(|suffix| object.get(suffix))
    }
}

/// Present meters in order. The nested list wins over the flat slots.
fn collect_meters(record: &SubmissionRecord) -> Vec<MeterEntry> {
    if matches!(record.get(METERS_KEY), Some(Value::Array(_))) {
        return record
            .list(METERS_KEY)
            .iter()
            .filter_map(Value::as_object)
            .filter_map(MeterEntry::from_object)
            .collect();
    }
    (1..=METER_SLOTS).filter_map(|n| MeterEntry::from_slot(record, n)).collect()
}

// ============================================================================
// Test report
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCheck {
    EarthingSystem,
    RcdOperational,
    InsulationResistance,
    VisualCheck,
    Polarity,
    StandAloneSystem,
    CurrentConnections,
    FaultLoopImpedance,
}

impl TestCheck {
    pub const ALL: [TestCheck; 8] = [
        TestCheck::EarthingSystem,
        TestCheck::RcdOperational,
        TestCheck::InsulationResistance,
        TestCheck::VisualCheck,
        TestCheck::Polarity,
        TestCheck::StandAloneSystem,
        TestCheck::CurrentConnections,
        TestCheck::FaultLoopImpedance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TestCheck::EarthingSystem => "earthing_system",
            TestCheck::RcdOperational => "rcd_operational",
            TestCheck::InsulationResistance => "insulation_resistance",
            TestCheck::VisualCheck => "visual_check",
            TestCheck::Polarity => "polarity",
            TestCheck::StandAloneSystem => "stand_alone_system",
            TestCheck::CurrentConnections => "current_connections",
            TestCheck::FaultLoopImpedance => "fault_loop_impedance",
        }
    }

    /// Record key the intake form submits this check under.
    pub fn intake_key(self) -> &'static str {
        match self {
            TestCheck::EarthingSystem => "test_earthing",
            TestCheck::RcdOperational => "test_rcd",
            TestCheck::InsulationResistance => "test_insulation",
            TestCheck::VisualCheck => "test_visual",
            TestCheck::Polarity => "test_polarity",
            TestCheck::StandAloneSystem => "test_standalone",
            TestCheck::CurrentConnections => "test_current",
            TestCheck::FaultLoopImpedance => "test_fault_loop",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TestCheck::EarthingSystem => "Earthing system integrity",
            TestCheck::RcdOperational => "Residual current device operational",
            TestCheck::InsulationResistance => "Insulation resistance Mohms",
            TestCheck::VisualCheck => {
                "Visual check that installation is suitable for connection to supply"
            }
            TestCheck::Polarity => "Polarity",
            TestCheck::StandAloneSystem => "Stand-Alone system complies with AS4509",
            TestCheck::CurrentConnections => "Correct current connections",
            TestCheck::FaultLoopImpedance => "Fault loop impedance (if necessary)",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Pass flags for the eight test checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestResults {
    passed: [bool; 8],
}

impl TestResults {
    pub fn from_record(record: &SubmissionRecord) -> Self {
        let mut results = Self::default();
        for check in TestCheck::ALL {
            results.passed[check.index()] = record.flag(check.intake_key());
        }
        results
    }

    pub fn passed(&self, check: TestCheck) -> bool {
        self.passed[check.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TestCheck, bool)> + '_ {
        TestCheck::ALL.into_iter().map(move |check| (check, self.passed(check)))
    }
}

// ============================================================================
// Form data
// ============================================================================

/// Address groups that carry a licence block.
const LICENSE_PREFIXES: [&str; 2] = ["installer_", "tester_"];

/// Contractor field <- licence field, applied only when the target is blank.
const LICENSE_BACKFILL: [(&str, &str); 2] = [
    ("contractor_license", "license_no"),
    ("contractor_expiry", "license_expiry"),
];

/// Everything the section renderers read, derived from one record.
///
/// The record is borrowed and never mutated; derived values such as the
/// licence back-fill live in `overrides` and shadow the record on lookup.
#[derive(Debug, Clone)]
pub struct FormData<'a> {
    record: &'a SubmissionRecord,
    overrides: BTreeMap<String, String>,
    pub installation_type: Option<InstallationType>,
    pub equipment: Vec<EquipmentItem>,
    pub meters: Vec<MeterEntry>,
    pub tests: TestResults,
}

impl<'a> FormData<'a> {
    pub fn from_record(record: &'a SubmissionRecord) -> Self {
        let installation_type = {
            let raw = record.text("installation_type");
            let parsed = InstallationType::parse(&raw);
            if parsed.is_none() && !raw.is_empty() {
                debug!("Unrecognised installation type {:?}; leaving the row blank", raw);
            }
            parsed
        };

        let equipment = EquipmentCategory::ALL
            .into_iter()
            .filter(|category| record.flag(category.key()))
            .map(|category| EquipmentItem {
                category,
                rating: record.text(&category.rating_key()).into_owned(),
                quantity: record.text(&category.quantity_key()).into_owned(),
                particulars: record.text(&category.particulars_key()).into_owned(),
            })
            .collect();

        Self {
            record,
            overrides: license_backfill(record),
            installation_type,
            equipment,
            meters: collect_meters(record),
            tests: TestResults::from_record(record),
        }
    }

    /// Display text of a field, back-filled values included.
    pub fn text(&self, key: &str) -> Cow<'_, str> {
        match self.overrides.get(key) {
            Some(value) => Cow::Borrowed(value.as_str()),
            None => self.record.text(key),
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        self.record.flag(key)
    }

    pub fn declined(&self, key: &str) -> bool {
        self.record.declined(key)
    }

    pub fn serial_no(&self) -> Option<Cow<'_, str>> {
        self.record.serial_no()
    }

    pub fn equipment_item(&self, category: EquipmentCategory) -> Option<&EquipmentItem> {
        self.equipment.iter().find(|item| item.category == category)
    }
}

fn license_backfill(record: &SubmissionRecord) -> BTreeMap<String, String> {
    let mut overrides = BTreeMap::new();
    for prefix in LICENSE_PREFIXES {
        for (target, source) in LICENSE_BACKFILL {
            let target = format!("{}{}", prefix, target);
            if !record.text(&target).is_empty() {
                continue;
            }
            let source = record.text(&format!("{}{}", prefix, source));
            if !source.is_empty() {
                overrides.insert(target, source.into_owned());
            }
        }
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> SubmissionRecord {
        SubmissionRecord::from_value(value).unwrap()
    }

    #[test]
    fn backfills_blank_contractor_fields() {
        let rec = record(json!({
            "tester_contractor_license": "",
            "tester_license_no": "L999",
            "tester_license_expiry": "2027-03-01",
        }));
        let form = FormData::from_record(&rec);
        assert_eq!(form.text("tester_contractor_license"), "L999");
        assert_eq!(form.text("tester_contractor_expiry"), "2027-03-01");
        // the record itself is untouched
        assert_eq!(rec.text("tester_contractor_license"), "");
    }

    #[test]
    fn backfill_keeps_explicit_values() {
        let rec = record(json!({
            "installer_contractor_license": "C123",
            "installer_license_no": "L999",
        }));
        let form = FormData::from_record(&rec);
        assert_eq!(form.text("installer_contractor_license"), "C123");
        assert_eq!(form.text("installer_contractor_expiry"), "");
    }

    #[test]
    fn unchecked_equipment_is_omitted() {
        let rec = record(json!({
            "equip_switchboard": "yes",
            "equip_switchboard_rating": "63A",
            "equip_switchboard_number": 1,
            "equip_lighting": "no",
            "equip_lighting_rating": "10A",
            "equip_storage": true,
        }));
        let form = FormData::from_record(&rec);
        assert_eq!(form.equipment.len(), 2);
        let switchboard = form.equipment_item(EquipmentCategory::Switchboard).unwrap();
        assert_eq!(switchboard.rating, "63A");
        assert_eq!(switchboard.quantity, "1");
        assert!(form.equipment_item(EquipmentCategory::Lighting).is_none());
        assert!(form.equipment_item(EquipmentCategory::Storage).is_some());
    }

    #[test]
    fn meter_slots_skip_absent_entries_and_keep_order() {
        let rec = record(json!({
            "meter_1_i": "yes",
            "meter_1_number": "M1",
            "meter_2_dials": "5",
            "meter_3_number": "M3",
            "meter_5_r": "yes",
        }));
        let form = FormData::from_record(&rec);
        let numbers: Vec<&str> = form.meters.iter().map(|m| m.number.as_str()).collect();
        assert_eq!(numbers, ["M1", "M3", ""]);
        assert!(form.meters[0].installed);
        assert!(form.meters[2].removed);
    }

    #[test]
    fn nested_meter_list_takes_precedence() {
        let rec = record(json!({
            "meter_1_number": "FLAT",
            "meters": [
                {"i": "yes", "number": "N1", "tariff": "EA010"},
                {"dials": "6"},
                "garbage",
                {"e": "yes"},
            ],
        }));
        let form = FormData::from_record(&rec);
        assert_eq!(form.meters.len(), 2);
        assert_eq!(form.meters[0].tariff, "EA010");
        assert!(form.meters[1].existing);
    }

    #[test]
    fn test_flags_use_semantic_names() {
        let rec = record(json!({
            "test_earthing": "yes",
            "test_fault_loop": "yes",
            "test_rcd": "no",
        }));
        let form = FormData::from_record(&rec);
        assert!(form.tests.passed(TestCheck::EarthingSystem));
        assert!(form.tests.passed(TestCheck::FaultLoopImpedance));
        assert!(!form.tests.passed(TestCheck::RcdOperational));
        assert_eq!(form.tests.iter().filter(|(_, passed)| *passed).count(), 2);
        assert_eq!(TestCheck::StandAloneSystem.name(), "stand_alone_system");
    }

    #[test]
    fn installation_type_parses_loosely() {
        assert_eq!(InstallationType::parse("Residential"), Some(InstallationType::Residential));
        assert_eq!(
            InstallationType::parse("mixed development"),
            Some(InstallationType::MixedDevelopment)
        );
        assert_eq!(
            InstallationType::parse("Mixed-Development"),
            Some(InstallationType::MixedDevelopment)
        );
        assert_eq!(InstallationType::parse(""), None);
        assert_eq!(InstallationType::parse("marine"), None);
    }
}
