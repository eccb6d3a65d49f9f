pub mod artwork;
pub mod loading;
pub mod notifications;
pub mod render;
pub mod theme;

use chrono::{DateTime, Datelike, Local, Timelike};

const WEEKDAYS: [&str; 7] = [
    "LUNDI", "MARDI", "MERCREDI", "JEUDI", "VENDREDI", "SAMEDI", "DIMANCHE",
];

const MONTHS: [&str; 12] = [
    "JANVIER",
    "FÉVRIER",
    "MARS",
    "AVRIL",
    "MAI",
    "JUIN",
    "JUILLET",
    "AOÛT",
    "SEPTEMBRE",
    "OCTOBRE",
    "NOVEMBRE",
    "DÉCEMBRE",
];

/// Set-top style clock line, e.g. "MARDI 26 AOÛT  20:45".
pub fn format_clock(now: DateTime<Local>) -> String {
    let weekday = WEEKDAYS[now.weekday().num_days_from_monday() as usize];
    let month = MONTHS[now.month0() as usize];
    format!(
        "{} {} {}  {:02}:{:02}",
        weekday,
        now.day(),
        month,
        now.hour(),
        now.minute()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn clock_is_french_and_uppercase() {
        let dt = Local.with_ymd_and_hms(2024, 8, 26, 20, 45, 0).unwrap();
        // 2024-08-26 is a Monday.
        assert_eq!(format_clock(dt), "LUNDI 26 AOÛT  20:45");
    }
}
