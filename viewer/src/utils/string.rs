//! String utility functions

/// Maximum fraction digits kept when formatting non-integer numbers
const MAX_FRACTION_DIGITS: usize = 3;

/// Truncate text to max length (in characters) with ellipsis
pub fn truncate_preview(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.chars().count() > max_len {
        format!("{}...", text.chars().take(max_len).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Group an integer with thousands separators (`1234567` -> `1,234,567`)
pub fn group_digits(value: i64) -> String {
    let grouped = group_digit_str(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Group an unsigned integer, for values past `i64::MAX`
pub fn group_digits_u64(value: u64) -> String {
    group_digit_str(&value.to_string())
}

/// Insert separators into a plain ASCII digit string
fn group_digit_str(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a number with digit grouping.
///
/// Integers are grouped (`12,345`). Fractional values keep up to three
/// fraction digits with trailing zeros trimmed (`1,234.5`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return group_digits(value as i64);
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let int_grouped = group_digit_str(int_part);
    let sign = if value < 0.0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, int_grouped)
    } else {
        format!("{}{}.{}", sign, int_grouped, frac)
    }
}

/// Format a USD amount (`$0.0012`)
pub fn format_usd(amount: f64) -> String {
    format!("${:.4}", amount)
}
