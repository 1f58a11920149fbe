use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Debug;

/// Number and date presentation used by the section builder.
///
/// The application owns the real formatting rules (locale, currency); the
/// engine only calls through this trait.
pub trait Formatter: Send + Sync + Debug {
    fn currency(&self, amount: f64) -> String;

    /// `value` is already a percentage (`12.5` means 12.5%).
    fn percent(&self, value: f64) -> String;

    fn count(&self, value: f64) -> String;

    /// Reformats a raw date string; returns it unchanged when unrecognised.
    fn date(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Grouped digits, two decimals only when there is a fractional part,
/// ISO dates.
#[derive(Debug, Clone)]
pub struct DefaultFormatter {
    pub currency_symbol: String,
    pub group_separator: char,
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self {
            currency_symbol: String::new(),
            group_separator: ',',
        }
    }
}

impl DefaultFormatter {
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Inserts the group separator into a run of ASCII digits.
    fn group_digits(&self, digits: &str) -> String {
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(digit);
        }
        out
    }
}

// From 2^53 up every f64 is a whole number, so there are no cents to show.
const WHOLE_ONLY: f64 = 9_007_199_254_740_992.0;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Collapses `-0.0` so rounding a small negative never prints "-0".
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl Formatter for DefaultFormatter {
    fn currency(&self, amount: f64) -> String {
        let amount = finite_or_zero(amount);
        let magnitude = amount.abs();
        let (whole, fraction) = if magnitude < WHOLE_ONLY {
            let cents = (magnitude * 100.0).round() as u64;
            ((cents / 100).to_string(), cents % 100)
        } else {
            (format!("{:.0}", magnitude), 0)
        };
        let sign = if amount < 0.0 && (whole != "0" || fraction > 0) { "-" } else { "" };
        let digits = self.group_digits(&whole);
        if fraction == 0 {
            format!("{}{}{}", sign, self.currency_symbol, digits)
        } else {
            format!("{}{}{}.{:02}", sign, self.currency_symbol, digits, fraction)
        }
    }

    fn percent(&self, value: f64) -> String {
        let tenths = unsigned_zero((finite_or_zero(value) * 10.0).round() / 10.0);
        if tenths.fract() == 0.0 {
            format!("{:.0}%", tenths)
        } else {
            format!("{:.1}%", tenths)
        }
    }

    fn count(&self, value: f64) -> String {
        let rounded = unsigned_zero(finite_or_zero(value).round());
        let sign = if rounded < 0.0 { "-" } else { "" };
        format!("{}{}", sign, self.group_digits(&format!("{:.0}", rounded.abs())))
    }

    fn date(&self, raw: &str) -> String {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return dt.format("%Y-%m-%d").to_string();
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return dt.format("%Y-%m-%d").to_string();
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        let f = DefaultFormatter::default();
        assert_eq!(f.currency(0.0), "0");
        assert_eq!(f.currency(1000.0), "1,000");
        assert_eq!(f.currency(1234567.891), "1,234,567.89");
        assert_eq!(f.currency(-12.5), "-12.50");
        assert_eq!(f.currency(-0.001), "0");
        assert_eq!(f.currency(f64::NAN), "0");
    }

    #[test]
    fn test_large_amounts_are_not_capped() {
        let f = DefaultFormatter::default();
        assert_eq!(f.currency(1e14), "100,000,000,000,000");
        assert_eq!(f.currency(-2.5e14), "-250,000,000,000,000");
        assert_eq!(f.currency(123_456_789_012.34), "123,456,789,012.34");
        assert_eq!(f.currency(1e20), "100,000,000,000,000,000,000");
        assert_eq!(f.count(2.5e14), "250,000,000,000,000");
        assert_eq!(f.count(-1e16), "-10,000,000,000,000,000");
    }

    #[test]
    fn test_currency_symbol() {
        let f = DefaultFormatter::default().with_currency_symbol("$");
        assert_eq!(f.currency(250.0), "$250");
        assert_eq!(f.currency(-3.0), "-$3");
    }

    #[test]
    fn test_percent() {
        let f = DefaultFormatter::default();
        assert_eq!(f.percent(12.0), "12%");
        assert_eq!(f.percent(12.54), "12.5%");
        assert_eq!(f.percent(-3.25), "-3.3%");
        assert_eq!(f.percent(f64::NAN), "0%");
    }

    #[test]
    fn test_negative_values_that_round_to_zero() {
        let f = DefaultFormatter::default();
        assert_eq!(f.percent(-0.04), "0%");
        assert_eq!(f.percent(-0.0), "0%");
        assert_eq!(f.count(-0.4), "0");
        assert_eq!(f.currency(-0.004), "0");
    }

    #[test]
    fn test_count() {
        let f = DefaultFormatter::default();
        assert_eq!(f.count(4.0), "4");
        assert_eq!(f.count(1999.6), "2,000");
        assert_eq!(f.count(-1500.0), "-1,500");
        assert_eq!(f.count(f64::INFINITY), "0");
    }

    #[test]
    fn test_date() {
        let f = DefaultFormatter::default();
        assert_eq!(f.date("2024-01-31T23:00:00+02:00"), "2024-01-31");
        assert_eq!(f.date("2024-01-31T23:00:00.123"), "2024-01-31");
        assert_eq!(f.date("2024-01-31"), "2024-01-31");
        assert_eq!(f.date("Jan 31"), "Jan 31");
    }
}
