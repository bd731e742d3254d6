//! Numeric parsing and formatting shared by the coercion layer and the
//! built-in library. Everything here is total: bad input yields NaN, never
//! an error.

pub(crate) fn is_script_whitespace(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{A0}' | '\u{FEFF}' | '\u{2028}' | '\u{2029}'
    ) || c.is_whitespace()
}

/// ECMA number-to-string: shortest digits that round-trip, positional
/// notation between 1e-6 and 1e21, exponential outside.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == f64::INFINITY {
        return "Infinity".to_string();
    }
    if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_float(-value));
    }

    // {:e} yields the shortest round-trip digits as "d[.ddd]e±x".
    let raw = format!("{value:e}");
    let exp_idx = raw.find('e').unwrap_or(raw.len());
    let mantissa = &raw[..exp_idx];
    let exponent: i32 = raw[exp_idx + 1..].parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let k = digits.len() as i32;
    // value = 0.digits * 10^n
    let n = exponent + 1;

    if k <= n && n <= 21 {
        let mut out = digits.to_string();
        out.extend(std::iter::repeat_n('0', (n - k) as usize));
        out
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        let mut out = String::from("0.");
        out.extend(std::iter::repeat_n('0', (-n) as usize));
        out.push_str(digits);
        out
    } else {
        let mantissa_out = if k == 1 {
            digits.to_string()
        } else {
            format!("{}.{}", &digits[..1], &digits[1..])
        };
        format!("{mantissa_out}e{:+}", n - 1)
    }
}

pub(crate) fn format_float_radix(value: f64, radix: u32) -> String {
    debug_assert!((2..=36).contains(&radix));
    if radix == 10 {
        return format_float(value);
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == f64::INFINITY {
        return "Infinity".to_string();
    }
    if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_float_radix(-value, radix));
    }

    let digit_char = |d: u32| -> char { char::from_digit(d, radix).unwrap_or('0') };
    let base = f64::from(radix);
    let mut int_part = value.trunc();
    let mut frac_part = value - int_part;

    let mut int_digits = Vec::new();
    if int_part == 0.0 {
        int_digits.push('0');
    }
    while int_part >= 1.0 {
        let digit = (int_part % base) as u32;
        int_digits.push(digit_char(digit));
        int_part = (int_part / base).trunc();
    }
    int_digits.reverse();
    let mut out: String = int_digits.into_iter().collect();

    if frac_part > 0.0 {
        out.push('.');
        // Cap fractional digits; doubles carry no more useful precision.
        for _ in 0..32 {
            frac_part *= base;
            let digit = frac_part.trunc() as u32;
            out.push(digit_char(digit.min(radix - 1)));
            frac_part -= frac_part.trunc();
            if frac_part <= 0.0 {
                break;
            }
        }
    }
    out
}

/// Full string-to-number coercion: the whole trimmed string must be a
/// numeric literal (decimal, hex, or signed Infinity), otherwise NaN.
pub(crate) fn string_to_number(src: &str) -> f64 {
    let trimmed = src.trim_matches(is_script_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return f64::NAN;
        }
        return hex
            .bytes()
            .fold(0.0_f64, |acc, b| acc * 16.0 + f64::from(hex_digit(b)));
    }

    let (sign, body) = match trimmed.as_bytes().first() {
        Some(b'+') => (1.0, &trimmed[1..]),
        Some(b'-') => (-1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if body == "Infinity" {
        return sign * f64::INFINITY;
    }
    if body.is_empty() || !is_decimal_literal(body) {
        return f64::NAN;
    }
    body.parse::<f64>().map_or(f64::NAN, |v| sign * v)
}

fn is_decimal_literal(src: &str) -> bool {
    let bytes = src.as_bytes();
    let mut i = 0usize;
    let mut digits = 0usize;
    while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
        digits += 1;
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            digits += 1;
            i += 1;
        }
    }
    if digits == 0 {
        return false;
    }
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let mut exp_digits = 0usize;
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            exp_digits += 1;
            i += 1;
        }
        if exp_digits == 0 {
            return false;
        }
    }
    i == bytes.len()
}

fn hex_digit(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => u32::from(b - b'0'),
        b'a'..=b'f' => u32::from(b - b'a' + 10),
        _ => u32::from(b - b'A' + 10),
    }
}

/// `parseFloat`: longest numeric prefix, leading whitespace skipped.
pub(crate) fn parse_float_prefix(src: &str) -> f64 {
    let src = src.trim_start_matches(is_script_whitespace);
    if src.is_empty() {
        return f64::NAN;
    }

    let bytes = src.as_bytes();
    let mut i = 0usize;

    if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    if src[i..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut int_digits = 0usize;
    while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
        int_digits += 1;
        i += 1;
    }

    let mut frac_digits = 0usize;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            frac_digits += 1;
            i += 1;
        }
    }

    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let exp_start = i;
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let mut exp_digits = 0usize;
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            exp_digits += 1;
            i += 1;
        }
        if exp_digits == 0 {
            i = exp_start;
        }
    }

    src[..i].parse::<f64>().unwrap_or(f64::NAN)
}

/// `parseInt`: explicit radix 2..=36, hex autodetection, longest digit
/// prefix in that radix.
pub(crate) fn parse_int_prefix(src: &str, radix: Option<i32>) -> f64 {
    let src = src.trim_start_matches(is_script_whitespace);
    let bytes = src.as_bytes();
    let mut i = 0usize;
    let mut sign = 1.0_f64;

    match bytes.first() {
        Some(b'+') => i += 1,
        Some(b'-') => {
            sign = -1.0;
            i += 1;
        }
        _ => {}
    }

    let mut radix = match radix {
        None | Some(0) => 0u32,
        Some(r) if (2..=36).contains(&r) => r as u32,
        Some(_) => return f64::NAN,
    };

    if (radix == 0 || radix == 16)
        && bytes.get(i) == Some(&b'0')
        && matches!(bytes.get(i + 1), Some(b'x') | Some(b'X'))
    {
        i += 2;
        radix = 16;
    }
    if radix == 0 {
        radix = 10;
    }

    let mut value = 0.0_f64;
    let mut digits = 0usize;
    while let Some(&b) = bytes.get(i) {
        let digit = match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'a'..=b'z' => u32::from(b - b'a' + 10),
            b'A'..=b'Z' => u32::from(b - b'A' + 10),
            _ => break,
        };
        if digit >= radix {
            break;
        }
        value = value * f64::from(radix) + f64::from(digit);
        digits += 1;
        i += 1;
    }

    if digits == 0 {
        return f64::NAN;
    }
    sign * value
}

/// ToInt32: modulo-2^32 wraparound into the signed range.
pub(crate) fn to_int32(value: f64) -> i32 {
    to_uint32(value) as i32
}

pub(crate) fn to_uint32(value: f64) -> u32 {
    if !value.is_finite() || value == 0.0 {
        return 0;
    }
    let modulus = 4_294_967_296.0_f64;
    let mut n = value.trunc() % modulus;
    if n < 0.0 {
        n += modulus;
    }
    n as u32
}

/// A property key that is a canonical array index: digits only, no
/// superfluous leading zero, below 2^32-1.
pub(crate) fn array_index_from_key(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    let value: u64 = key.parse().ok()?;
    if value >= u64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

/// UTF-16 code unit count, which is what `length` and string indexing see.
pub(crate) fn utf16_length(s: &str) -> usize {
    s.encode_utf16().count()
}

pub(crate) fn utf16_unit_at(s: &str, index: usize) -> Option<u16> {
    s.encode_utf16().nth(index)
}

/// UTF-16 index corresponding to a byte offset into the same string.
pub(crate) fn utf16_index_at_byte(s: &str, byte_pos: usize) -> usize {
    utf16_length(&s[..byte_pos.min(s.len())])
}

/// Byte offset corresponding to a UTF-16 index; saturates at the end.
pub(crate) fn byte_index_at_utf16(s: &str, utf16_pos: usize) -> usize {
    let mut units = 0usize;
    for (byte_idx, c) in s.char_indices() {
        if units >= utf16_pos {
            return byte_idx;
        }
        units += c.len_utf16();
    }
    s.len()
}

pub(crate) fn utf16_slice(s: &str, start: usize, end: usize) -> String {
    let units: Vec<u16> = s.encode_utf16().collect();
    let start = start.min(units.len());
    let end = end.clamp(start, units.len());
    String::from_utf16_lossy(&units[start..end])
}
