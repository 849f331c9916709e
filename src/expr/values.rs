//! Numeric literals with SPICE magnitude suffixes.

/// Multiplier for the letters written right after a number.
///
/// Suffixes are case-insensitive, so `M` is milli and mega is `meg`.
/// Letters that are not a suffix (unit names such as `Hz`) scale by 1.
pub fn suffix_multiplier(letters: &str) -> f64 {
    let lower = letters.to_lowercase();
    if lower.starts_with("meg") {
        return 1e6;
    }
    if lower.starts_with("mil") {
        return 25.4e-6;
    }
    match lower.chars().next() {
        Some('t') => 1e12,
        Some('g') => 1e9,
        Some('k') => 1e3,
        Some('m') => 1e-3,
        Some('u') | Some('µ') | Some('μ') => 1e-6,
        Some('n') => 1e-9,
        Some('p') => 1e-12,
        Some('f') => 1e-15,
        _ => 1.0,
    }
}

/// Byte length of the unsigned decimal number (mantissa and exponent)
/// at the start of `text`, 0 if there is none.
pub(crate) fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let int_end = digits_from(0);
    let mut end = int_end;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        if int_end > 0 || frac_end > end + 1 {
            end = frac_end;
        }
    }
    if end == 0 {
        return 0;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut i = end + 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_end = digits_from(i);
        if exp_end > i {
            end = exp_end;
        }
    }

    end
}

/// Parse a number string with optional sign, magnitude suffix and unit letters.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };

    let len = numeric_prefix_len(unsigned);
    if len == 0 {
        return None;
    }
    let (mantissa, letters) = unsigned.split_at(len);
    if !letters.chars().all(char::is_alphabetic) {
        return None;
    }

    mantissa
        .parse::<f64>()
        .ok()
        .map(|v| sign * v * suffix_multiplier(letters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(parse_value("10k").unwrap(), 10_000.0, max_relative = 1e-12);
        assert_relative_eq!(parse_value("100n").unwrap(), 100e-9, max_relative = 1e-12);
        assert_relative_eq!(parse_value("4.7u").unwrap(), 4.7e-6, max_relative = 1e-12);
        assert_relative_eq!(parse_value("12.3µ").unwrap(), 12.3e-6, max_relative = 1e-12);
        assert_relative_eq!(parse_value("12.3μ").unwrap(), 12.3e-6, max_relative = 1e-12);
        assert_relative_eq!(parse_value("1meg").unwrap(), 1e6, max_relative = 1e-12);
        assert_relative_eq!(parse_value("1M").unwrap(), 1e-3, max_relative = 1e-12);
        assert_relative_eq!(parse_value("2.2").unwrap(), 2.2, max_relative = 1e-12);
        assert_relative_eq!(parse_value("1e-9").unwrap(), 1e-9, max_relative = 1e-12);
        assert_relative_eq!(parse_value("-3.3").unwrap(), -3.3, max_relative = 1e-12);
        assert_relative_eq!(parse_value("1kHz").unwrap(), 1e3, max_relative = 1e-12);
        assert_relative_eq!(parse_value("5Hz").unwrap(), 5.0, max_relative = 1e-12);
        assert_relative_eq!(parse_value(".5p").unwrap(), 0.5e-12, max_relative = 1e-12);
        assert_relative_eq!(parse_value("1e3k").unwrap(), 1e6, max_relative = 1e-12);
    }

    #[test]
    fn test_parse_value_rejects() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("k"), None);
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value("1k2"), None);
        assert_eq!(parse_value("1.2.3"), None);
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix_len("12.5e-3x"), 7);
        assert_eq!(numeric_prefix_len("2e"), 1);
        assert_eq!(numeric_prefix_len("3.k"), 2);
        assert_eq!(numeric_prefix_len(".e"), 0);
    }
}
