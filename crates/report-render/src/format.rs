/// Compact amount: `1.23B`, `-4.50M`, `12.00K`, `999.99`.
pub fn human_readable(num: f64) -> String {
    if num == f64::INFINITY {
        return "∞".to_string();
    }
    if num == f64::NEG_INFINITY {
        return "-∞".to_string();
    }

    let abs_val = num.abs();
    let sign = if num < 0.0 { "-" } else { "" };
    if abs_val >= 1e9 {
        format!("{}{:.2}B", sign, abs_val / 1e9)
    } else if abs_val >= 1e6 {
        format!("{}{:.2}M", sign, abs_val / 1e6)
    } else if abs_val >= 1e3 {
        format!("{}{:.2}K", sign, abs_val / 1e3)
    } else {
        format!("{:.2}", num)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioFormat {
    /// `12.34%`
    Percent,
    /// `2.50x`
    Multiple,
    /// `2.50`
    Plain,
}

/// Undefined ratios print as `n/a`.
pub fn format_ratio(value: f64, format: RatioFormat) -> String {
    if value.is_infinite() {
        return "n/a".to_string();
    }
    match format {
        RatioFormat::Percent => format!("{:.2}%", value * 100.0),
        RatioFormat::Multiple => format!("{:.2}x", value),
        RatioFormat::Plain => format!("{:.2}", value),
    }
}

// Qualitative readings shown next to each ratio. An undefined ratio reads the
// same way it scores: best case.

pub fn leverage_reading(debt_to_ebitda: f64) -> &'static str {
    if debt_to_ebitda == f64::INFINITY || debt_to_ebitda < 2.0 {
        "Strong"
    } else if debt_to_ebitda < 3.0 {
        "Good"
    } else if debt_to_ebitda < 4.0 {
        "Moderate"
    } else {
        "Elevated"
    }
}

pub fn coverage_reading(interest_coverage: f64) -> &'static str {
    if interest_coverage > 8.0 {
        "Excellent"
    } else if interest_coverage > 5.0 {
        "Strong"
    } else if interest_coverage > 3.0 {
        "Adequate"
    } else {
        "Weak"
    }
}

pub fn dscr_reading(dscr: f64) -> &'static str {
    if dscr > 1.8 {
        "Strong"
    } else if dscr > 1.4 {
        "Good"
    } else if dscr > 1.1 {
        "Adequate"
    } else {
        "Weak"
    }
}

pub fn fcf_to_debt_reading(fcf_to_debt: f64) -> &'static str {
    if fcf_to_debt > 0.25 {
        "Excellent"
    } else if fcf_to_debt > 0.15 {
        "Good"
    } else if fcf_to_debt > 0.08 {
        "Moderate"
    } else {
        "Low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_readable_scales() {
        assert_eq!(human_readable(13e9), "13.00B");
        assert_eq!(human_readable(-2.5e9), "-2.50B");
        assert_eq!(human_readable(4_500_000.0), "4.50M");
        assert_eq!(human_readable(-1_234.0), "-1.23K");
        assert_eq!(human_readable(999.999), "1000.00");
        assert_eq!(human_readable(-12.5), "-12.50");
        assert_eq!(human_readable(0.0), "0.00");
        assert_eq!(human_readable(f64::INFINITY), "∞");
        assert_eq!(human_readable(f64::NEG_INFINITY), "-∞");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(1.153846, RatioFormat::Percent), "115.38%");
        assert_eq!(format_ratio(0.4333, RatioFormat::Multiple), "0.43x");
        assert_eq!(format_ratio(12.5, RatioFormat::Plain), "12.50");
        assert_eq!(format_ratio(f64::INFINITY, RatioFormat::Multiple), "n/a");
        assert_eq!(format_ratio(f64::NEG_INFINITY, RatioFormat::Percent), "n/a");
    }

    #[test]
    fn test_readings() {
        assert_eq!(leverage_reading(1.0), "Strong");
        assert_eq!(leverage_reading(f64::INFINITY), "Strong");
        assert_eq!(leverage_reading(3.5), "Moderate");
        assert_eq!(leverage_reading(6.0), "Elevated");
        assert_eq!(coverage_reading(12.5), "Excellent");
        assert_eq!(coverage_reading(2.0), "Weak");
        assert_eq!(dscr_reading(1.5), "Good");
        assert_eq!(fcf_to_debt_reading(0.1), "Moderate");
        assert_eq!(fcf_to_debt_reading(f64::INFINITY), "Excellent");
    }
}
