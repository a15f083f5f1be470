use chrono::NaiveDateTime;

use super::text::strip_line_breaks;
use super::ExtractError;

const INPUT_FORMAT: &str = "%H:%M %d/%m/%Y";
const OUTPUT_FORMAT: &str = "%H:%M %d-%m-%Y";

/// Reformat a timeline timestamp from "HH:MM DD/MM/YYYY" to "HH:MM DD-MM-YYYY".
///
/// Embedded line breaks and their indentation are stripped first. The clock
/// value passes through verbatim; only the date separator changes. Anything
/// that does not parse as a valid calendar date/time is a format error —
/// a corrupted timestamp must not be silently defaulted.
pub fn reformat_time(raw: &str) -> Result<String, ExtractError> {
    let cleaned = strip_line_breaks(raw);
    let parsed = NaiveDateTime::parse_from_str(&cleaned, INPUT_FORMAT).map_err(|source| {
        ExtractError::Format {
            input: cleaned.clone(),
            source,
        }
    })?;
    Ok(parsed.format(OUTPUT_FORMAT).to_string())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reformats_valid_timestamp() {
        assert_eq!(reformat_time("12:30 31/01/2022").unwrap(), "12:30 31-01-2022");
    }

    #[test]
    fn strips_embedded_breaks_first() {
        assert_eq!(
            reformat_time("12:30 \n   31/01/2022").unwrap(),
            "12:30 31-01-2022"
        );
        assert_eq!(
            reformat_time("\n                18:05 03/09/2021\n            ").unwrap(),
            "18:05 03-09-2021"
        );
    }

    #[test]
    fn clock_digits_unchanged() {
        assert_eq!(reformat_time("00:00 01/01/2021").unwrap(), "00:00 01-01-2021");
        assert_eq!(reformat_time("23:59 29/02/2020").unwrap(), "23:59 29-02-2020");
    }

    #[test]
    fn month_out_of_range_is_format_error() {
        let err = reformat_time("12:30 31/13/2022").unwrap_err();
        assert!(matches!(err, ExtractError::Format { .. }));
    }

    #[test]
    fn invalid_calendar_day_is_format_error() {
        assert!(reformat_time("12:30 29/02/2021").is_err());
    }

    #[test]
    fn non_numeric_segment_is_format_error() {
        assert!(reformat_time("12:30 ab/01/2022").is_err());
        assert!(reformat_time("noon 31/01/2022").is_err());
    }

    #[test]
    fn trailing_garbage_is_format_error() {
        assert!(reformat_time("12:30 31/01/2022 extra").is_err());
    }
}
