//! Canonical formatting of numeric text
//!
//! Cells display numbers in a canonical form: at most one leading `-`, a `0` in front
//! of a bare decimal point, and every flavour of zero shown as `0`. Anything that does
//! not look like a number is left untouched.

use cellcalc_core::CellError;
use lazy_regex::{regex_is_match, regex_replace_all};

/// Remove a single leading `=`
pub fn drop_leading_equals(s: &str) -> &str {
    s.strip_prefix('=').unwrap_or(s)
}

/// Sign of a run of leading `+`/`-` characters: `"-"` for an odd number of minuses,
/// otherwise empty
pub fn sign(s: &str) -> &'static str {
    let minuses = s
        .trim_start()
        .chars()
        .take_while(|c| matches!(c, '+' | '-'))
        .filter(|c| *c == '-')
        .count();
    if minuses % 2 == 1 {
        "-"
    } else {
        ""
    }
}

/// The text after any leading signs
pub fn numeric_body(s: &str) -> &str {
    s.trim().trim_start_matches(|c: char| c == '+' || c == '-')
}

/// Prefix a `0` to a body that starts with its decimal point
pub fn cover_leading_decimal_point(body: &str) -> String {
    if body.starts_with('.') {
        format!("0{}", body)
    } else {
        body.to_string()
    }
}

/// Canonicalise any text that parses as zero to `"0"`
pub fn coalesce_zero(s: &str) -> String {
    match s.trim().parse::<f64>() {
        Ok(n) if n == 0.0 => "0".to_string(),
        _ => s.to_string(),
    }
}

/// Collapse runs of two or more `-`
///
/// An odd run becomes a single `-`. An even run becomes `+` when `show_plus` is set,
/// otherwise it disappears. Single minuses are left alone.
///
/// ```
/// use cellcalc_formula::format::collapse_negative_signs;
///
/// assert_eq!(collapse_negative_signs("2--3", true), "2+3");
/// assert_eq!(collapse_negative_signs("---456.", true), "-456.");
/// assert_eq!(collapse_negative_signs("--456", false), "456");
/// ```
pub fn collapse_negative_signs(s: &str, show_plus: bool) -> String {
    regex_replace_all!(r"-{2,}", s, |run: &str| {
        if run.len() % 2 == 1 {
            "-"
        } else if show_plus {
            "+"
        } else {
            ""
        }
    })
    .into_owned()
}

/// Whether `s` is plain decimal number text: an optional sign, digits with an
/// optional decimal point, or a decimal point followed by digits
pub fn is_numeric_text(s: &str) -> bool {
    regex_is_match!(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)$", s.trim())
}

/// Canonical display form of numeric text; other text is returned unchanged
///
/// Idempotent: formatting a formatted result changes nothing.
///
/// ```
/// use cellcalc_formula::format_calc_result;
///
/// assert_eq!(format_calc_result(".456"), "0.456");
/// assert_eq!(format_calc_result("-.456"), "-0.456");
/// assert_eq!(format_calc_result("-0.00"), "0");
/// assert_eq!(format_calc_result("AbCd"), "AbCd");
/// ```
pub fn format_calc_result(s: &str) -> String {
    if !is_numeric_text(s) {
        return s.to_string();
    }
    let canonical = format!("{}{}", sign(s), cover_leading_decimal_point(numeric_body(s)));
    coalesce_zero(&canonical)
}

/// Decimal text for a computed number
///
/// Infinite and NaN results (division by zero) become `#DIV0!`. The text never uses
/// exponent notation, so it is always accepted by [`is_numeric_text`].
pub fn format_number(n: f64) -> Result<String, CellError> {
    if !n.is_finite() {
        return Err(CellError::Div0);
    }
    if n == 0.0 {
        return Ok("0".to_string());
    }
    Ok(format!("{}", n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_drop_leading_equals() {
        assert_eq!(drop_leading_equals("=1+1"), "1+1");
        assert_eq!(drop_leading_equals("==1"), "=1");
        assert_eq!(drop_leading_equals("1"), "1");
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign("-5"), "-");
        assert_eq!(sign("--5"), "");
        assert_eq!(sign("-+-5"), "");
        assert_eq!(sign("---5"), "-");
        assert_eq!(sign("5-3"), "");
    }

    #[test]
    fn test_numeric_body() {
        assert_eq!(numeric_body("--.5"), ".5");
        assert_eq!(numeric_body("+12"), "12");
        assert_eq!(numeric_body("12"), "12");
    }

    #[test]
    fn test_cover_leading_decimal_point() {
        assert_eq!(cover_leading_decimal_point(".456"), "0.456");
        assert_eq!(cover_leading_decimal_point("1.5"), "1.5");
    }

    #[test]
    fn test_coalesce_zero() {
        assert_eq!(coalesce_zero("0.000"), "0");
        assert_eq!(coalesce_zero("-0"), "0");
        assert_eq!(coalesce_zero("0.1"), "0.1");
        assert_eq!(coalesce_zero("abc"), "abc");
    }

    #[test]
    fn test_collapse_negative_signs() {
        assert_eq!(collapse_negative_signs("--456.", true), "+456.");
        assert_eq!(collapse_negative_signs("----.456", true), "+.456");
        assert_eq!(collapse_negative_signs("---.456", true), "-.456");
        assert_eq!(collapse_negative_signs("2-3", true), "2-3");
        assert_eq!(collapse_negative_signs("1--2---3", false), "12-3");
    }

    #[test]
    fn test_is_numeric_text() {
        for text in ["123", "-123", "123.456", ".456", "-.456", "456.", "+7", " 8 "] {
            assert!(is_numeric_text(text), "{text}");
        }
        for text in ["", ".", "-", "1e5", "--1", "1.2.3", "AbCd123", "inf", "1+1", "#REF!"] {
            assert!(!is_numeric_text(text), "{text}");
        }
    }

    #[test]
    fn test_format_calc_result() {
        assert_eq!(format_calc_result("123"), "123");
        assert_eq!(format_calc_result("-123.456"), "-123.456");
        assert_eq!(format_calc_result(".456"), "0.456");
        assert_eq!(format_calc_result("+5"), "5");
        assert_eq!(format_calc_result("-0"), "0");
        assert_eq!(format_calc_result("1+1"), "1+1");
        assert_eq!(format_calc_result("#NAME?"), "#NAME?");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0).unwrap(), "2");
        assert_eq!(format_number(-1.5).unwrap(), "-1.5");
        assert_eq!(format_number(-0.0).unwrap(), "0");
        assert_eq!(format_number(0.1 + 0.2).unwrap(), "0.30000000000000004");
        assert_eq!(format_number(1e21).unwrap(), "1000000000000000000000");
        assert_eq!(format_number(f64::INFINITY), Err(CellError::Div0));
        assert_eq!(format_number(f64::NAN), Err(CellError::Div0));
    }

    proptest! {
        #[test]
        fn prop_format_calc_result_idempotent(s in r"[-+]{0,3}[0-9]{0,4}\.?[0-9]{0,4}|\PC{0,8}") {
            let once = format_calc_result(&s);
            prop_assert_eq!(format_calc_result(&once), once.clone());
        }

        #[test]
        fn prop_format_number_is_numeric(n in any::<f64>()) {
            if let Ok(text) = format_number(n) {
                prop_assert!(is_numeric_text(&text));
                prop_assert_eq!(text.parse::<f64>().unwrap(), n);
            }
        }
    }
}
