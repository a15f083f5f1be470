use std::sync::LazyLock;

use regex::Regex;

use super::text::strip_line_breaks;
use super::ExtractError;

// Decimal before integer: at the same position "1.234" must win over "1".
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+|\d+").unwrap());

/// Pull the first numeric token out of noisy headline text as a case count.
///
/// Dots inside the token are thousands separators and are merged away, so
/// "1.234" becomes 1234. Returns `None` when the text has no digits at all —
/// absent, not zero. A matched token that still fails integer conversion
/// (digit run overflowing u64) is a conversion error: the grammar and the
/// conversion have gone out of sync, and that must surface.
pub fn extract_case_count(raw: &str) -> Result<Option<u64>, ExtractError> {
    let cleaned = strip_line_breaks(raw);
    let Some(m) = NUMERIC_RE.find(&cleaned) else {
        return Ok(None);
    };
    let digits = m.as_str().replace('.', "");
    let count = digits
        .parse::<u64>()
        .map_err(|source| ExtractError::Conversion {
            token: m.as_str().to_string(),
            source,
        })?;
    Ok(Some(count))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_thousands_separator() {
        assert_eq!(extract_case_count("Total cases: 1.234 so far").unwrap(), Some(1234));
        assert_eq!(extract_case_count("Thêm 12.607 ca mắc mới").unwrap(), Some(12607));
    }

    #[test]
    fn comma_ends_the_token() {
        // Only "." merges into the token; a comma terminates it.
        assert_eq!(extract_case_count("Total cases: 1,234.56").unwrap(), Some(1));
    }

    #[test]
    fn decimal_preferred_over_integer_at_same_position() {
        assert_eq!(extract_case_count("1.234 new cases").unwrap(), Some(1234));
    }

    #[test]
    fn plain_integer() {
        assert_eq!(extract_case_count("New: 845 cases").unwrap(), Some(845));
    }

    #[test]
    fn first_token_wins() {
        assert_eq!(extract_case_count("wave 4: 1.406 then 233").unwrap(), Some(4));
    }

    #[test]
    fn zero_is_a_count_not_absent() {
        assert_eq!(extract_case_count("0").unwrap(), Some(0));
    }

    #[test]
    fn no_digits_is_absent() {
        assert_eq!(extract_case_count("no figures today").unwrap(), None);
        assert_eq!(extract_case_count("").unwrap(), None);
    }

    #[test]
    fn digits_across_stripped_break() {
        // "1.\n   234" collapses to "1.234" before matching
        assert_eq!(extract_case_count("1.\n   234 ca").unwrap(), Some(1234));
    }

    #[test]
    fn overflow_is_conversion_error() {
        let err = extract_case_count("99999999999999999999999999").unwrap_err();
        assert!(matches!(err, ExtractError::Conversion { .. }));
    }
}
