use regex::Regex;

#[inline]
pub fn capture_group_1<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove thousands separators (`,` and `.`) from a numeral run.
///
/// Scraped pages report counts in locale formats like `12,345` or `12.345`;
/// both separators are stripped before integer conversion.
#[inline]
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse an abbreviated count like `1.2K`, `3.4M`, `7.5万` or `1,234`.
///
/// Suffixes: `k` ×1 000, `m` ×1 000 000, `w`/`万` ×10 000. The numeric
/// prefix is parsed as a float and the scaled value truncated. Input with
/// no suffix must be a plain integer (thousands commas allowed).
///
/// Returns `None` for anything unparseable so a failed parse is never
/// mistaken for a verified zero-follower count.
pub fn parse_abbreviated(text: &str) -> Option<u64> {
    let text = text.trim().to_lowercase().replace(',', "");
    if text.is_empty() {
        return None;
    }

    let (prefix, multiplier) = if let Some(p) = text.strip_suffix('k') {
        (p, 1_000.0)
    } else if let Some(p) = text.strip_suffix('m') {
        (p, 1_000_000.0)
    } else if let Some(p) = text.strip_suffix('w') {
        (p, 10_000.0)
    } else if let Some(p) = text.strip_suffix('万') {
        (p, 10_000.0)
    } else {
        return text.parse::<u64>().ok();
    };

    prefix
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| (n * multiplier) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_abbreviated_suffixes() {
        assert_eq!(parse_abbreviated("1.2K"), Some(1_200));
        assert_eq!(parse_abbreviated("3.4M"), Some(3_400_000));
        assert_eq!(parse_abbreviated("7.5w"), Some(75_000));
        assert_eq!(parse_abbreviated("1.2万"), Some(12_000));
        assert_eq!(parse_abbreviated("980"), Some(980));
    }

    #[test]
    fn test_parse_abbreviated_separators() {
        assert_eq!(parse_abbreviated("1,234"), Some(1_234));
        assert_eq!(parse_abbreviated("12,345,678"), Some(12_345_678));
    }

    #[test]
    fn test_parse_abbreviated_rejects_garbage() {
        assert_eq!(parse_abbreviated("abc"), None);
        assert_eq!(parse_abbreviated(""), None);
        assert_eq!(parse_abbreviated("  "), None);
        assert_eq!(parse_abbreviated("k"), None);
        // A bare decimal has no integer meaning without a suffix.
        assert_eq!(parse_abbreviated("12.3"), None);
    }

    #[test]
    fn test_strip_separators() {
        assert_eq!(strip_separators("12,345"), "12345");
        assert_eq!(strip_separators("12.345"), "12345");
        assert_eq!(strip_separators("1,234.567"), "1234567");
    }
}
