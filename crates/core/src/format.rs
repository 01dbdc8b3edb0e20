pub const DEFAULT_CURRENCY_SYMBOL: &str = "S/";

/// Whole units with `.` thousands separators: `S/ 45.000`.
pub fn format_amount(amount: u64, symbol: &str) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{symbol} {grouped}")
}

/// Rounds a projected balance down to whole units for display.
pub fn format_projected(balance: f64, symbol: &str) -> String {
    format_amount(balance.max(0.0).floor() as u64, symbol)
}

pub fn format_days(days: f64) -> String {
    if days.is_infinite() {
        "∞".to_string()
    } else {
        format!("{days:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_amount(0, "S/"), "S/ 0");
        assert_eq!(format_amount(999, "S/"), "S/ 999");
        assert_eq!(format_amount(45_000, "S/"), "S/ 45.000");
        assert_eq!(format_amount(1_234_567, "S/"), "S/ 1.234.567");
    }

    #[test]
    fn projected_balance_rounds_down() {
        assert_eq!(format_projected(3_428.57, "S/"), "S/ 3.428");
        assert_eq!(format_projected(-1.0, "S/"), "S/ 0");
    }

    #[test]
    fn days_use_one_decimal() {
        assert_eq!(format_days(1.75), "1.8");
        assert_eq!(format_days(7.5), "7.5");
        assert_eq!(format_days(f64::INFINITY), "∞");
    }
}
