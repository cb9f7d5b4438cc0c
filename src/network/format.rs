// Display-only rounding. Arithmetic always keeps full precision.

pub const INPUT_DECIMALS: usize = 2;
pub const VALUE_DECIMALS: usize = 4;

pub fn format_input(value: f64) -> String {
    format!("{:.*}", INPUT_DECIMALS, value)
}

/// Weights and derived values.
pub fn format_value(value: f64) -> String {
    format!("{:.*}", VALUE_DECIMALS, value)
}

pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_uses_two_decimals() {
        assert_eq!(format_input(0.05), "0.05");
        assert_eq!(format_input(0.1), "0.10");
    }

    #[test]
    fn test_value_uses_four_decimals() {
        assert_eq!(format_value(0.0275), "0.0275");
        assert_eq!(format_value(0.15), "0.1500");
        assert_eq!(format_value(0.506874567), "0.5069");
    }

    #[test]
    fn test_missing_value_renders_question_mark() {
        assert_eq!(format_optional(None), "?");
        assert_eq!(format_optional(Some(1.0)), "1.0000");
    }
}
