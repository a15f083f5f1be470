use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s+").unwrap());

/// Combining diacritics that appear when source text is NFD-decomposed:
/// grave, acute, circumflex, tilde, breve, hook above, dot below.
const COMBINING_MARKS: &[char] = &[
    '\u{0300}', '\u{0301}', '\u{0302}', '\u{0303}', '\u{0306}', '\u{0309}', '\u{0323}',
];

/// Delete every line break together with the whitespace run that follows it.
///
/// No replacement space is inserted, so words adjacent to an indented break
/// concatenate ("is\n   a" → "isa"). A break with nothing after it survives.
pub fn strip_line_breaks(text: &str) -> String {
    LINE_BREAK_RE.replace_all(text, "").into_owned()
}

/// Replace accented Vietnamese letters with their base Latin letter and drop
/// standalone combining marks. Idempotent; already-folded text passes through.
pub fn fold_accents(text: &str) -> String {
    text.chars().filter_map(fold_char).collect()
}

fn fold_char(c: char) -> Option<char> {
    if COMBINING_MARKS.contains(&c) {
        return None;
    }
    Some(match c {
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ'
        | 'ắ' | 'ặ' | 'ẳ' | 'ẵ' => 'a',
        'À' | 'Á' | 'Ạ' | 'Ả' | 'Ã' | 'Ă' | 'Ằ' | 'Ắ' | 'Ặ' | 'Ẳ' | 'Ẵ' | 'Â' | 'Ầ'
        | 'Ấ' | 'Ậ' | 'Ẩ' | 'Ẫ' => 'A',
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' => 'e',
        'È' | 'É' | 'Ẹ' | 'Ẻ' | 'Ẽ' | 'Ê' | 'Ề' | 'Ế' | 'Ệ' | 'Ể' | 'Ễ' => 'E',
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ'
        | 'ớ' | 'ợ' | 'ở' | 'ỡ' => 'o',
        'Ò' | 'Ó' | 'Ọ' | 'Ỏ' | 'Õ' | 'Ô' | 'Ồ' | 'Ố' | 'Ộ' | 'Ổ' | 'Ỗ' | 'Ơ' | 'Ờ'
        | 'Ớ' | 'Ợ' | 'Ở' | 'Ỡ' => 'O',
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' => 'i',
        'Ì' | 'Í' | 'Ị' | 'Ỉ' | 'Ĩ' => 'I',
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' => 'u',
        'Ư' | 'Ừ' | 'Ứ' | 'Ự' | 'Ử' | 'Ữ' | 'Ù' | 'Ú' | 'Ụ' | 'Ủ' | 'Ũ' => 'U',
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' => 'y',
        'Ỳ' | 'Ý' | 'Ỵ' | 'Ỷ' | 'Ỹ' => 'Y',
        'Đ' => 'D',
        'đ' => 'd',
        other => other,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_plus_indent_deleted_without_space() {
        // "\n   " before "a sample" goes away entirely; the words concatenate.
        // The final "\n" has no whitespace after it, so it stays.
        assert_eq!(
            strip_line_breaks("This is\n   a sample \nstring."),
            "This isa sample \nstring."
        );
    }

    #[test]
    fn consecutive_breaks_are_one_run() {
        assert_eq!(strip_line_breaks("a\n\n   b"), "ab");
    }

    #[test]
    fn no_breaks_is_identity() {
        assert_eq!(strip_line_breaks("12:30 31/01/2022"), "12:30 31/01/2022");
    }

    #[test]
    fn leading_and_trailing_indented_breaks() {
        assert_eq!(
            strip_line_breaks("\n                12:30 31/01/2022\n            "),
            "12:30 31/01/2022"
        );
    }

    #[test]
    fn folds_city_names() {
        assert_eq!(fold_accents("Hà Nội"), "Ha Noi");
        assert_eq!(fold_accents("Hồ Chí Minh"), "Ho Chi Minh");
        assert_eq!(fold_accents("Đà Nẵng"), "Da Nang");
        assert_eq!(fold_accents("Thừa Thiên Huế"), "Thua Thien Hue");
    }

    #[test]
    fn folds_uppercase() {
        assert_eq!(fold_accents("ĐÀ NẴNG"), "DA NANG");
        assert_eq!(fold_accents("HƯNG YÊN"), "HUNG YEN");
    }

    #[test]
    fn drops_combining_marks() {
        // "Hà Nội" with NFD combining marks instead of precomposed letters
        let decomposed = "Ha\u{0300} Nô\u{0323}i";
        assert_eq!(fold_accents(decomposed), "Ha Noi");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "Hà Nội (1000) and Hồ Chí Minh City (2000)",
            "Đắk Lắk",
            "plain ascii text 123",
            "Quảng Ngãi, Bình Dương, Vĩnh Phúc",
        ];
        for s in samples {
            let once = fold_accents(s);
            assert_eq!(fold_accents(&once), once);
        }
    }

    #[test]
    fn leaves_digits_and_punctuation() {
        assert_eq!(fold_accents("Bến Tre (12.3)"), "Ben Tre (12.3)");
    }
}
