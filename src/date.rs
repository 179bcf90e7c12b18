use chrono::NaiveDate;

const ISO_FORMAT: &str = "%Y-%m-%d";
const LOCAL_FORMAT: &str = "%d/%m/%Y";

/// Convert an ISO calendar date (`YYYY-MM-DD`) to `DD/MM/YYYY`.
///
/// Anything that does not parse, including an already-localized date, is
/// returned unchanged.
pub fn localize_date(value: &str) -> String {
    match NaiveDate::parse_from_str(value, ISO_FORMAT) {
        Ok(date) => date.format(LOCAL_FORMAT).to_string(),
        Err(_) => value.to_string(),
    }
}
