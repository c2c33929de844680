use chrono::{Datelike, NaiveDate};

use crate::models::BillStatus;

// French short month names, capitalised and cut to three characters.
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Formats an ISO date for the bills table, e.g. `2004-04-04` becomes `4 Avr. 04`.
pub fn format_date(date: &str) -> Result<String, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
    let month = MONTHS[date.month0() as usize];
    let year = date.year().rem_euclid(100);

    Ok(format!("{} {}. {:02}", date.day(), month, year))
}

pub fn format_status(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refused",
    }
}
