//! Display helpers for dollar amounts and percentages.

/// `$1,234.56`, or `-$1,234.56` for negatives.
///
/// NaN prints as `$NaN` and infinities as `$inf` / `-$inf`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".into();
    }
    let cents = (value.abs() * 100.0).round();
    let sign = if value < 0.0 && cents > 0.0 { "-" } else { "" };
    if cents.is_infinite() {
        return format!("{sign}$inf");
    }

    // whole cents as decimal digits, at least "000"
    let digits = format!("{cents:03.0}");
    let (whole, frac) = digits.split_at(digits.len() - 2);

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac}")
}

/// `12.34%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}
