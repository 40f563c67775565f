// Release-date display formatting.

use chrono::{Datelike, NaiveDate};

use crate::model::UNKNOWN_RELEASE;

/// Format a `YYYY-MM-DD` release date as e.g. `"March 3rd 1995"`.
///
/// Returns `None` for the unknown-date sentinel. Strings that do not parse
/// as a calendar date come back verbatim.
pub fn format_release(date: &str) -> Option<String> {
    if date == UNKNOWN_RELEASE {
        return None;
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => Some(format!(
            "{} {}{} {}",
            d.format("%B"),
            d.day(),
            ordinal_suffix(d.day()),
            d.year()
        )),
        Err(_) => Some(date.to_string()),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_hidden() {
        assert_eq!(format_release("0000-00-00"), None);
    }

    #[test]
    fn formats_with_ordinal_day() {
        assert_eq!(format_release("1995-03-03").as_deref(), Some("March 3rd 1995"));
        assert_eq!(format_release("1991-08-23").as_deref(), Some("August 23rd 1991"));
        assert_eq!(format_release("1985-10-18").as_deref(), Some("October 18th 1985"));
        assert_eq!(format_release("2001-09-01").as_deref(), Some("September 1st 2001"));
        assert_eq!(format_release("1990-11-21").as_deref(), Some("November 21st 1990"));
    }

    #[test]
    fn teens_always_take_th() {
        assert_eq!(format_release("1996-06-11").as_deref(), Some("June 11th 1996"));
        assert_eq!(format_release("1996-06-12").as_deref(), Some("June 12th 1996"));
        assert_eq!(format_release("1996-06-13").as_deref(), Some("June 13th 1996"));
    }

    #[test]
    fn unparseable_passes_through() {
        assert_eq!(format_release("sometime 1994").as_deref(), Some("sometime 1994"));
        assert_eq!(format_release("1994-13-40").as_deref(), Some("1994-13-40"));
    }
}
