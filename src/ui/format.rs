//! Number formatting for console output.

/// Group digits in threes with commas, e.g. `1234567` -> `"1,234,567"`
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Two-decimal percentage in parentheses, e.g. `(82.27%)`
pub fn format_share(percent: f64) -> String {
    format!("({percent:.2}%)")
}
