/// Group the integer digits of `value` with `.` as thousands separator
fn grouped(value: i64) -> String {
    let digits = value.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a euro amount German style (e.g., `2.600,10 €`)
pub fn format_euro(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    let cents_total = (value.abs() * 100.0).round() as i64;
    let sign = if value < 0.0 && cents_total > 0 { "-" } else { "" };
    format!("{sign}{},{:02} €", grouped(cents_total / 100), cents_total % 100)
}

/// Format a euro amount without cents (shorter format for tight columns)
pub fn format_euro_short(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    let euros = value.abs().round() as i64;
    let sign = if value < 0.0 && euros > 0 { "-" } else { "" };
    format!("{sign}{} €", grouped(euros))
}

/// Format an amount with an explicit sign, for deltas
pub fn format_signed_euro(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_euro(value))
    } else {
        format_euro(value)
    }
}

/// Format a value that is already a percentage (e.g., `4.5` -> `4,50 %`)
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    format!("{value:.2} %").replace('.', ",")
}

/// Format years with one decimal (e.g., `2,0 J.`)
pub fn format_years(value: f64) -> String {
    format!("{} J.", format!("{value:.1}").replace('.', ","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_euro() {
        assert_eq!(format_euro(2600.1), "2.600,10 €");
        assert_eq!(format_euro(-1234567.891), "-1.234.567,89 €");
        assert_eq!(format_euro(0.0), "0,00 €");
        assert_eq!(format_euro(-0.001), "0,00 €");
        assert_eq!(format_euro(f64::NAN), "—");
    }

    #[test]
    fn test_short_and_signed() {
        assert_eq!(format_euro_short(38400.4), "38.400 €");
        assert_eq!(format_signed_euro(49.9), "+49,90 €");
        assert_eq!(format_signed_euro(-49.9), "-49,90 €");
    }

    #[test]
    fn test_percent_and_years() {
        assert_eq!(format_percent(4.5), "4,50 %");
        assert_eq!(format_percent(-12.5), "-12,50 %");
        assert_eq!(format_years(2.0), "2,0 J.");
    }
}
