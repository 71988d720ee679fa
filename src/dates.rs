use crate::models::DateEntry;
use chrono::{NaiveDate, NaiveDateTime};

pub const JOURNEY_START: NaiveDate = match NaiveDate::from_ymd_opt(2025, 11, 15) {
    Some(date) => date,
    None => panic!("invalid journey start"),
};

pub const JOURNEY_END: NaiveDate = match NaiveDate::from_ymd_opt(2026, 2, 26) {
    Some(date) => date,
    None => panic!("invalid journey end"),
};

pub fn journey_dates() -> Vec<DateEntry> {
    generate_date_list(JOURNEY_START, JOURNEY_END)
}

/// One entry per calendar day from `start` to `end` inclusive, ascending.
/// An inverted range is empty.
pub fn generate_date_list(start: NaiveDate, end: NaiveDate) -> Vec<DateEntry> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(date_entry)
        .collect()
}

pub fn date_entry(date: NaiveDate) -> DateEntry {
    DateEntry {
        id: date_id(date),
        date,
        display_text: display_date(date),
        label: date.format("%A, %b %-d").to_string(),
    }
}

pub fn date_id(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn short_weekday(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

pub fn is_today(entry: &DateEntry, now: NaiveDateTime) -> bool {
    entry.date == now.date()
}

pub fn range_caption() -> String {
    format!("{} - {}", display_date(JOURNEY_START), display_date(JOURNEY_END))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn journey_has_one_entry_per_day() {
        let dates = journey_dates();
        assert_eq!(dates.len(), 104);
        assert_eq!(dates.first().unwrap().id, "2025-11-15");
        assert_eq!(dates.last().unwrap().id, "2026-02-26");

        let ids: HashSet<&str> = dates.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), dates.len());

        for pair in dates.windows(2) {
            assert!(pair[0].id < pair[1].id);
            assert_eq!(pair[1].date.signed_duration_since(pair[0].date).num_days(), 1);
        }
    }

    #[test]
    fn entry_formats() {
        let entry = date_entry(JOURNEY_START);
        assert_eq!(entry.id, "2025-11-15");
        assert_eq!(entry.display_text, "15/11/2025");
        assert_eq!(entry.label, "Saturday, Nov 15");
        assert_eq!(short_weekday(entry.date), "Sat");

        let leap_free = date_entry(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(leap_free.label, "Sunday, Feb 1");
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(generate_date_list(JOURNEY_END, JOURNEY_START).is_empty());
        assert_eq!(generate_date_list(JOURNEY_START, JOURNEY_START).len(), 1);
    }

    #[test]
    fn today_matches_calendar_day_only() {
        let entry = date_entry(JOURNEY_START);
        let morning = JOURNEY_START.and_hms_opt(0, 0, 1).unwrap();
        let night = JOURNEY_START.and_hms_opt(23, 59, 59).unwrap();
        let next = JOURNEY_START.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert!(is_today(&entry, morning));
        assert!(is_today(&entry, night));
        assert!(!is_today(&entry, next));
    }

    #[test]
    fn caption_spans_the_journey() {
        assert_eq!(range_caption(), "15/11/2025 - 26/02/2026");
    }
}
