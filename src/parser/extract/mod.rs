pub mod cases;
pub mod cities;
pub mod text;
pub mod time;

use serde::Serialize;
use thiserror::Error;

pub use cities::{CityCasePair, CityCases, NO_FIGURES};

/// Unparsed text bundle for one timeline entry, as handed over by the
/// structural layer. `None` means the page had no matching element for this
/// entry — distinct from an empty string, which is present-but-unparsable.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub source_url: String,
    pub time_text: Option<String>,
    pub case_text: Option<String>,
    pub detail_text: Option<String>,
}

/// One structured epidemiological entry, the sole output of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredRecord {
    pub time: Option<String>,
    pub new_cases: Option<u64>,
    pub city_cases: Option<CityCases>,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The timestamp text does not match the "HH:MM DD/MM/YYYY" grammar.
    #[error("invalid timestamp {input:?}: {source}")]
    Format {
        input: String,
        source: chrono::ParseError,
    },
    /// A matched numeric token failed integer conversion after separator
    /// removal. Data corruption, not an absent value.
    #[error("numeric token {token:?} does not convert to an integer: {source}")]
    Conversion {
        token: String,
        source: std::num::ParseIntError,
    },
}

/// Assemble one raw record into one structured record.
///
/// Each field transform is a direct function call. An absent input field
/// yields an absent output field and is never an error; a parse failure on a
/// present field fails the whole assembly with that field's typed error, so
/// a bad field cannot pass as a successful extraction.
pub fn assemble(raw: &RawRecord) -> Result<StructuredRecord, ExtractError> {
    let time = raw
        .time_text
        .as_deref()
        .map(time::reformat_time)
        .transpose()?;
    let new_cases = match raw.case_text.as_deref() {
        Some(text) => cases::extract_case_count(text)?,
        None => None,
    };
    let city_cases = raw.detail_text.as_deref().map(cities::extract_city_cases);

    Ok(StructuredRecord {
        time,
        new_cases,
        city_cases,
        url: raw.source_url.clone(),
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        time_text: Option<&str>,
        case_text: Option<&str>,
        detail_text: Option<&str>,
    ) -> RawRecord {
        RawRecord {
            source_url: "https://covid19.gov.vn/t/1.htm".to_string(),
            time_text: time_text.map(str::to_string),
            case_text: case_text.map(str::to_string),
            detail_text: detail_text.map(str::to_string),
        }
    }

    #[test]
    fn full_record() {
        let rec = assemble(&raw(
            Some("12:30 \n   31/01/2022"),
            Some("New: 1.234 cases"),
            Some("Hà Nội (500)"),
        ))
        .unwrap();
        assert_eq!(rec.time.as_deref(), Some("12:30 31-01-2022"));
        assert_eq!(rec.new_cases, Some(1234));
        assert_eq!(
            rec.city_cases,
            Some(CityCases::Pairs(vec![CityCasePair {
                city: "Ha Noi".to_string(),
                case: "500".to_string(),
            }]))
        );
        assert_eq!(rec.url, "https://covid19.gov.vn/t/1.htm");
    }

    #[test]
    fn all_fields_absent_is_not_an_error() {
        let rec = assemble(&raw(None, None, None)).unwrap();
        assert_eq!(rec.time, None);
        assert_eq!(rec.new_cases, None);
        assert_eq!(rec.city_cases, None);
    }

    #[test]
    fn present_detail_without_pattern_is_sentinel_not_absent() {
        let rec = assemble(&raw(None, None, Some("no data here"))).unwrap();
        assert_eq!(rec.city_cases, Some(CityCases::Unavailable));
    }

    #[test]
    fn present_case_text_without_digits_is_absent() {
        let rec = assemble(&raw(None, Some("chưa có số liệu"), None)).unwrap();
        assert_eq!(rec.new_cases, None);
    }

    #[test]
    fn bad_timestamp_fails_assembly() {
        let err = assemble(&raw(Some("12:30 31/13/2022"), Some("5 cases"), None)).unwrap_err();
        assert!(matches!(err, ExtractError::Format { .. }));
    }

    #[test]
    fn serializes_for_export() {
        let rec =
            assemble(&raw(Some("12:30 31/01/2022"), Some("845 ca"), Some("Huế (3)"))).unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["time"], "12:30 31-01-2022");
        assert_eq!(json["new_cases"], 845);
        assert_eq!(json["city_cases"][0]["city"], "Hue");
        assert_eq!(json["city_cases"][0]["case"], "3");
    }
}
