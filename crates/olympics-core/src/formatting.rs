//! Display helpers for KPI cards and text tables.

/// Format a whole count with thousands separators.
///
/// # Examples
///
/// ```
/// use olympics_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(11_113), "11,113");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a measurement (height, weight, age) with a fixed number of
/// decimals, or `"n/a"` when absent.
///
/// # Examples
///
/// ```
/// use olympics_core::formatting::format_measure;
///
/// assert_eq!(format_measure(Some(187.0), 0, "cm"), "187 cm");
/// assert_eq!(format_measure(Some(72.45), 1, "kg"), "72.5 kg");
/// assert_eq!(format_measure(None, 0, "cm"), "n/a");
/// ```
pub fn format_measure(value: Option<f64>, decimals: usize, unit: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.prec$} {}", v, unit, prec = decimals),
        _ => "n/a".to_string(),
    }
}

/// `(part / whole) * 100`, rounded to `decimal_places`; `0.0` when `whole`
/// is zero.
///
/// # Examples
///
/// ```
/// use olympics_core::formatting::percentage;
///
/// assert!((percentage(40, 160, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(3, 0, 2), 0.0);
/// ```
pub fn percentage(part: u64, whole: u64, decimal_places: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64 / whole as f64) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Render a share as `"25.0%"`.
pub fn format_share(part: u64, whole: u64) -> String {
    format!("{:.1}%", percentage(part, whole, 1))
}

/// Initials shown on an athlete avatar: the first two characters of the
/// trimmed name, uppercased; `"??"` for an empty name, `"X?"` for a single
/// character.
pub fn initials(name: Option<&str>) -> String {
    let trimmed = name.map(str::trim).unwrap_or_default();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (None, _) => "??".to_string(),
        (Some(a), None) => format!("{}?", a.to_uppercase()),
        (Some(a), Some(b)) => format!("{}{}", a.to_uppercase(), b.to_uppercase()),
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
