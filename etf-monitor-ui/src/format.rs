//! Display Formatting
//!
//! Pure helpers applied at render time. Stored data is never rounded.

/// Weight fraction as a percentage with 3 decimals (0.07 -> "7.000%")
pub fn format_weight(weight: f64) -> String {
    format!("{:.3}%", weight * 100.0)
}

/// Price as currency with 2 decimals (150.234 -> "$150.23")
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Holding size label for chart bars
pub fn format_holding_size(size: f64) -> String {
    format!("{:.3}", size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight() {
        assert_eq!(format_weight(0.07), "7.000%");
        assert_eq!(format_weight(1.0), "100.000%");
        assert_eq!(format_weight(0.00125), "0.125%");
    }

    #[test]
    fn test_price() {
        assert_eq!(format_price(150.23), "$150.23");
        assert_eq!(format_price(102.5), "$102.50");
        assert_eq!(format_price(0.0), "$0.00");
    }

    #[test]
    fn test_holding_size() {
        assert_eq!(format_holding_size(0.07), "0.070");
        assert_eq!(format_holding_size(57.0), "57.000");
    }
}
