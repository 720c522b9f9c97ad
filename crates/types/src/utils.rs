//! Utility functions and helpers

/// Skip leading whitespace, counting a byte order mark as whitespace
fn trim_leading_space(input: &str) -> &str {
    input.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Parse the longest leading integer of `input`.
///
/// Leading whitespace is skipped, a single `+`/`-` sign is accepted and a
/// `0x`/`0X` prefix switches to base 16. Anything after the digits is
/// ignored, so `"42abc"` yields 42 and `"3.9"` yields 3. Returns `None`
/// when no digits are found or the value does not fit in an `i64`.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let s = trim_leading_space(input);
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, body) = if rest.starts_with("0x") || rest.starts_with("0X") {
        (16, &rest[2..])
    } else {
        (10, rest)
    };

    let end = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    let digits = &body[..end];
    if digits.is_empty() {
        return None;
    }

    if negative {
        i64::from_str_radix(&format!("-{}", digits), radix).ok()
    } else {
        i64::from_str_radix(digits, radix).ok()
    }
}

/// Parse the longest leading decimal number of `input`.
///
/// Accepts `Infinity`, `digits[.digits][e[sign]digits]` and `.digits`
/// forms with an optional sign after leading whitespace. An exponent marker
/// without digits is left out of the match, so `"1e"` yields 1.0.
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let s = trim_leading_space(input);
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut i = 0;
    let negative = matches!(bytes.first(), Some(b'-'));
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }

    if s[i..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < len && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - (i + 1);
        if mantissa_digits > 0 {
            i = j;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut k = i + 1;
        if k < len && (bytes[k] == b'+' || bytes[k] == b'-') {
            k += 1;
        }
        let exp_start = k;
        while k < len && bytes[k].is_ascii_digit() {
            k += 1;
        }
        if k > exp_start {
            i = k;
        }
    }

    s[..i].parse::<f64>().ok()
}

/// Parse a canonical boolean word, case-insensitively.
///
/// `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`; anything else is `None`.
pub fn parse_strict_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
