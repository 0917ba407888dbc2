use num_format::{Locale, ToFormattedString};

// Any finite f64 has at most 1074 digits after the decimal point.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Fixed-point rendering of `x` with `digits` fraction digits.
///
/// Rounds the exact binary value half away from zero, so a true tie such as
/// 0.125 goes up to "0.13" while 1.005 (stored slightly below) stays "1.00".
pub fn to_fixed(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, x.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part.bytes().collect();
    let int_len = kept.len();
    kept.extend(frac_part.bytes().take(digits));
    while kept.len() < int_len + digits {
        kept.push(b'0');
    }

    let round_up = frac_part.as_bytes().get(digits).map(|d| *d >= b'5').unwrap_or(false);
    let mut int_len = int_len;
    if round_up && increment_decimal(&mut kept) {
        kept.insert(0, b'1');
        int_len += 1;
    }

    let mut out = String::with_capacity(kept.len() + 2);
    if x < 0.0 {
        out.push('-');
    }
    out.push_str(std::str::from_utf8(&kept[..int_len]).unwrap_or("0"));
    if digits > 0 {
        out.push('.');
        out.push_str(std::str::from_utf8(&kept[int_len..]).unwrap_or(""));
    }
    out
}

// Adds one unit in the last place; returns true when the carry runs off the front.
fn increment_decimal(digits: &mut [u8]) -> bool {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return false;
        }
    }
    true
}

/// en-US digit grouping: 1234567 -> "1,234,567".
pub fn thousands(n: i64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Percentage of `part` in `whole`, or None when `whole` is zero.
pub fn percent(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        None
    } else {
        Some(part / whole * 100.0)
    }
}
