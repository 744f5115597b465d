//! Rendering numbers for the display field.

/// Decimal places used when no configuration overrides it.
pub const DEFAULT_PRECISION: usize = 8;

/// Render `value` rounded half-up to `precision` decimals, then strip
/// trailing zeros and a dangling decimal point.
///
/// Rounding works on the shortest decimal that round-trips to `value`, not
/// on its exact binary expansion, so `1e23` shows as a clean power of ten
/// and `1 / 512` rounds its trailing 5 up.
///
/// IEEE specials are spelled out instead of erroring.
pub fn format_display(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let (mut digits, mut point) = shortest_digits(value.abs());
    round_half_up(&mut digits, &mut point, precision);

    // Everything rounded away, including tiny negatives.
    if digits.iter().all(|&d| d == 0) {
        return "0".to_string();
    }

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }

    if point <= 0 {
        out.push('0');
    } else {
        for i in 0..point as usize {
            out.push(digit_char(digits.get(i).copied().unwrap_or(0)));
        }
    }

    let mut fraction = String::new();
    for i in point..digits.len() as i64 {
        fraction.push(if i < 0 { '0' } else { digit_char(digits[i as usize]) });
    }
    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Significant digits of a finite, non-negative `value` and the position of
/// the decimal point counted from the first digit.
fn shortest_digits(value: f64) -> (Vec<u8>, i64) {
    // `{:e}` is the shortest round-trip form, e.g. "1.953125e-3".
    let sci = format!("{:e}", value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let digits = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    (digits, exponent + 1)
}

/// Keep `precision` digits after the point, carrying when the first dropped
/// digit is 5 or more.
fn round_half_up(digits: &mut Vec<u8>, point: &mut i64, precision: usize) {
    let keep = *point + precision as i64;
    if keep < 0 {
        digits.clear();
        return;
    }
    let keep = keep as usize;
    if keep >= digits.len() {
        return;
    }

    let round_up = digits[keep] >= 5;
    digits.truncate(keep);
    if !round_up {
        return;
    }

    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    // Carried past the leading digit.
    digits.insert(0, 1);
    *point += 1;
}

fn digit_char(d: u8) -> char {
    char::from(b'0' + d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt8(v: f64) -> String {
        format_display(v, DEFAULT_PRECISION)
    }

    #[test]
    fn test_integers_drop_the_point() {
        assert_eq!(fmt8(3.0), "3");
        assert_eq!(fmt8(0.0), "0");
        assert_eq!(fmt8(100.0), "100");
        assert_eq!(fmt8(-42.0), "-42");
    }

    #[test]
    fn test_trailing_zeros_stripped_significant_kept() {
        assert_eq!(fmt8(2.5), "2.5");
        assert_eq!(fmt8(3.14159265), "3.14159265");
        assert_eq!(fmt8(0.1 + 0.2), "0.3");
        assert_eq!(fmt8(std::f64::consts::PI), "3.14159265");
    }

    #[test]
    fn test_rounding_to_precision() {
        assert_eq!(fmt8(1e-10), "0");
        assert_eq!(fmt8(-1e-10), "0");
        assert_eq!(fmt8(2.0 / 3.0), "0.66666667");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(fmt8(f64::NAN), "NaN");
        assert_eq!(fmt8(f64::INFINITY), "Infinity");
        assert_eq!(fmt8(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_zero_precision_keeps_integer_digits() {
        assert_eq!(format_display(100.0, 0), "100");
        assert_eq!(format_display(2.5, 2), "2.5");
        assert_eq!(format_display(2.5, 0), "3");
        assert_eq!(format_display(0.4, 0), "0");
    }

    #[test]
    fn test_large_values_use_shortest_digits() {
        assert_eq!(fmt8(1e23), "100000000000000000000000");
        assert_eq!(fmt8(-1e23), "-100000000000000000000000");
        assert_eq!(fmt8(1.5511210043330986e25), "15511210043330986000000000");
        assert_eq!(fmt8(1e21 + 0.5), "1000000000000000000000");
    }

    #[test]
    fn test_ties_round_half_up() {
        // 2^-9 is exactly 0.001953125
        assert_eq!(fmt8(1.0 / 512.0), "0.00195313");
        assert_eq!(fmt8(-1.0 / 512.0), "-0.00195313");
        assert_eq!(fmt8(0.000000005), "0.00000001");
        assert_eq!(fmt8(0.999999995), "1");
        assert_eq!(fmt8(9.999999995), "10");
    }
}
