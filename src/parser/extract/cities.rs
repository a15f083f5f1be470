use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, Serializer};

use super::text::fold_accents;

/// Sentinel returned when a detail block yields no city/case pairs. Covers
/// both "empty text" and "text with no recognizable pattern".
pub const NO_FIGURES: &str = "Figures not available";

// Capitalized name token, then a parenthesized integer or decimal-looking count.
static CITY_CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\b[A-Z][\w\s]+\b)\s*\((\d+(?:\.\d+)?)\)\s*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CityCasePair {
    pub city: String,
    /// Digits exactly as captured. Left as text on purpose: downstream
    /// consumers of the per-city breakdown expect the raw token, unlike the
    /// headline count which is merged into an integer.
    pub case: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityCases {
    Pairs(Vec<CityCasePair>),
    Unavailable,
}

// Serializes as either an array of pairs or the sentinel string, matching
// the shape of the exported records.
impl Serialize for CityCases {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CityCases::Pairs(pairs) => pairs.serialize(serializer),
            CityCases::Unavailable => serializer.serialize_str(NO_FIGURES),
        }
    }
}

/// Scan a free-text detail block for "<City> (<count>)" groups.
///
/// The block is accent-folded first, then matched left to right,
/// non-overlapping. The name grammar requires a capitalized first letter, so
/// a name that folds to a lowercase initial is skipped; that matches the
/// source data observed so far and is left as is.
pub fn extract_city_cases(detail: &str) -> CityCases {
    let folded = fold_accents(detail);
    let pairs: Vec<CityCasePair> = CITY_CASE_RE
        .captures_iter(&folded)
        .map(|caps| CityCasePair {
            city: caps[1].to_string(),
            case: caps[2].to_string(),
        })
        .collect();
    if pairs.is_empty() {
        CityCases::Unavailable
    } else {
        CityCases::Pairs(pairs)
    }
}

// ── Tests ──
