//! Numeric literal parsing: `$` hex, `%` binary, bare decimal.

/// Parse a numeric literal.
///
/// Accepts `$FF` (hex, either case), `%1010` (binary, arbitrary length) and
/// `255` (decimal). Returns `None` for anything else; callers phrase their
/// own range and format errors.
pub(super) fn parse_number(text: &str) -> Option<u32> {
    if let Some(digits) = text.strip_prefix('$') {
        return u32::from_str_radix(digits, 16).ok();
    }
    if let Some(digits) = text.strip_prefix('%') {
        return u32::from_str_radix(digits, 2).ok();
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_number;

    #[test]
    fn parses_all_three_bases() {
        assert_eq!(parse_number("123"), Some(123));
        assert_eq!(parse_number("$7B"), Some(0x7B));
        assert_eq!(parse_number("$7b"), Some(0x7B));
        assert_eq!(parse_number("%01111011"), Some(0x7B));
        assert_eq!(parse_number("%11"), Some(3));
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("$FFFF"), Some(0xFFFF));
    }

    #[test]
    fn rejects_malformed_literals() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("$"), None);
        assert_eq!(parse_number("%"), None);
        assert_eq!(parse_number("$XYZ"), None);
        assert_eq!(parse_number("%012"), None);
        assert_eq!(parse_number("12A"), None);
        assert_eq!(parse_number("-1"), None);
        assert_eq!(parse_number("LABEL"), None);
    }

    #[test]
    fn values_above_16_bits_still_parse() {
        // Range checks live at the call sites, which know their width.
        assert_eq!(parse_number("$10000"), Some(0x10000));
        assert_eq!(parse_number("65536"), Some(65536));
    }
}
