//! Compact number formatting for engagement counters
//!
//! Mirrors en-US compact short notation: `1500 -> "1.5K"`, `12345 -> "12K"`,
//! `2_300_000 -> "2.3M"`.

const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Format `n` in compact short notation
///
/// `None` and NaN render as `"0"`.
pub fn format_compact(n: Option<f64>) -> String {
    let n = match n {
        Some(n) if !n.is_nan() => n,
        _ => return "0".to_string(),
    };

    if n.is_infinite() {
        return if n > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let abs = n.abs();

    let mut unit = UNITS.iter().position(|(size, _)| abs >= *size);
    let mut scaled = round_compact(abs / unit.map_or(1.0, |i| UNITS[i].0));

    // Rounding can carry into the next unit: 999_999 -> 1000K -> 1M
    if scaled >= 1000.0 {
        let next = match unit {
            Some(0) => None,
            Some(i) => Some(i - 1),
            None => Some(UNITS.len() - 1),
        };
        if let Some(i) = next {
            unit = Some(i);
            scaled = round_compact(abs / UNITS[i].0);
        }
    }

    if scaled == 0.0 {
        return "0".to_string();
    }

    let suffix = unit.map_or("", |i| UNITS[i].1);
    format!("{}{}{}", sign, scaled, suffix)
}

/// Format an engagement counter; missing counters render as `"0"`
pub fn format_count(n: Option<u64>) -> String {
    format_compact(n.map(|n| n as f64))
}

// Two significant digits below 100, whole numbers above
fn round_compact(value: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    if value >= 100.0 {
        return value.round();
    }
    let magnitude = value.log10().floor() as i32;
    let factor = 10f64.powi(1 - magnitude);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_nan() {
        assert_eq!(format_compact(None), "0");
        assert_eq!(format_compact(Some(f64::NAN)), "0");
        assert_eq!(format_count(None), "0");
    }

    #[test]
    fn test_small_numbers() {
        assert_eq!(format_compact(Some(0.0)), "0");
        assert_eq!(format_compact(Some(7.0)), "7");
        assert_eq!(format_compact(Some(999.0)), "999");
        assert_eq!(format_compact(Some(1.25)), "1.3");
        assert_eq!(format_compact(Some(0.5)), "0.5");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(format_compact(Some(1000.0)), "1K");
        assert_eq!(format_compact(Some(1500.0)), "1.5K");
        assert_eq!(format_compact(Some(1234.0)), "1.2K");
        assert_eq!(format_compact(Some(12_345.0)), "12K");
        assert_eq!(format_compact(Some(123_456.0)), "123K");
    }

    #[test]
    fn test_larger_units() {
        assert_eq!(format_count(Some(2_300_000)), "2.3M");
        assert_eq!(format_count(Some(1_000_000_000)), "1B");
        assert_eq!(format_count(Some(4_560_000_000_000)), "4.6T");
    }

    #[test]
    fn test_rounding_carries_into_next_unit() {
        assert_eq!(format_compact(Some(999.7)), "1K");
        assert_eq!(format_compact(Some(999_999.0)), "1M");
        assert_eq!(format_compact(Some(999_950_000.0)), "1B");
    }

    #[test]
    fn test_negative_and_infinite() {
        assert_eq!(format_compact(Some(-1500.0)), "-1.5K");
        assert_eq!(format_compact(Some(f64::INFINITY)), "∞");
        assert_eq!(format_compact(Some(f64::NEG_INFINITY)), "-∞");
    }
}
