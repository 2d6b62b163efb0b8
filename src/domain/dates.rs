//! Brazilian Portuguese date stamps shown on listing and article pages.

use time::{OffsetDateTime, UtcOffset};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// `15 mar 2021`
pub fn format_publication_date(timestamp: OffsetDateTime, offset: UtcOffset) -> String {
    let local = timestamp.to_offset(offset);
    format!(
        "{:02} {} {}",
        local.day(),
        month_abbreviation(local),
        local.year()
    )
}

/// `25 mar 2021, às 9:05`
pub fn format_edit_timestamp(timestamp: OffsetDateTime, offset: UtcOffset) -> String {
    let local = timestamp.to_offset(offset);
    format!(
        "{}, às {}:{:02}",
        format_publication_date(timestamp, offset),
        local.hour(),
        local.minute()
    )
}

fn month_abbreviation(timestamp: OffsetDateTime) -> &'static str {
    MONTH_ABBREVIATIONS[usize::from(u8::from(timestamp.month())) - 1]
}
