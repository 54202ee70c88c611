//! Raw entry classification

use crate::format::is_numeric_text;
use cellcalc_core::is_valid_address_text;
use lazy_regex::regex_is_match;

/// What a raw cell entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    /// Leading apostrophe: the rest is shown verbatim
    Text(&'a str),
    /// Leading `=`, `+` or `-`
    Formula(&'a str),
    /// The whole entry is a plain decimal number
    Number(&'a str),
    /// Anything else, shown unchanged
    Literal(&'a str),
}

/// Classify a raw cell entry
///
/// ```
/// use cellcalc_formula::{classify, Entry};
///
/// assert_eq!(classify("'=1"), Entry::Text("=1"));
/// assert_eq!(classify("-123"), Entry::Formula("-123"));
/// assert_eq!(classify(".5"), Entry::Number(".5"));
/// assert_eq!(classify("1+1"), Entry::Literal("1+1"));
/// ```
pub fn classify(raw: &str) -> Entry<'_> {
    if let Some(rest) = raw.strip_prefix('\'') {
        return Entry::Text(rest);
    }
    if raw.starts_with(['=', '+', '-']) {
        return Entry::Formula(raw);
    }
    if is_numeric_text(raw) {
        return Entry::Number(raw);
    }
    Entry::Literal(raw)
}

/// The symbol a formula like `=ABC` degrades to
///
/// After one leading `=`, `+` or `-`, a body that is a single identifier and not a
/// cell address is shown as literal text instead of being evaluated.
pub fn bare_symbol(formula: &str) -> Option<&str> {
    let body = formula
        .strip_prefix(['=', '+', '-'])
        .unwrap_or(formula)
        .trim();
    if regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_]*$", body) && !is_valid_address_text(body) {
        Some(body)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_escape() {
        assert_eq!(classify("'AbCd"), Entry::Text("AbCd"));
        assert_eq!(classify("'"), Entry::Text(""));
        assert_eq!(classify("''x"), Entry::Text("'x"));
    }

    #[test]
    fn test_formula() {
        assert_eq!(classify("=1+1"), Entry::Formula("=1+1"));
        assert_eq!(classify("+1"), Entry::Formula("+1"));
        assert_eq!(classify("--456."), Entry::Formula("--456."));
    }

    #[test]
    fn test_number_and_literal() {
        assert_eq!(classify("123.456"), Entry::Number("123.456"));
        assert_eq!(classify("AbCd123"), Entry::Literal("AbCd123"));
        assert_eq!(classify("1*3"), Entry::Literal("1*3"));
        assert_eq!(classify(""), Entry::Literal(""));
        assert_eq!(classify(" =1"), Entry::Literal(" =1"));
    }

    #[test]
    fn test_bare_symbol() {
        assert_eq!(bare_symbol("=ABC"), Some("ABC"));
        assert_eq!(bare_symbol("-abc"), Some("abc"));
        assert_eq!(bare_symbol("= total_2 "), Some("total_2"));

        assert_eq!(bare_symbol("=A1"), None);
        assert_eq!(bare_symbol("=SUM(A1)"), None);
        assert_eq!(bare_symbol("=A+B"), None);
        assert_eq!(bare_symbol("=-ABC"), None);
        assert_eq!(bare_symbol("=1"), None);
    }
}
