use crate::format::Formatter;
use serde_json::Value;

/// Placeholder shown wherever a value is missing or not displayable.
pub const MISSING_TEXT: &str = "-";

/// Finite number, or `0.0` when `value` is missing or unparseable.
pub fn to_safe_number(value: Option<&Value>) -> f64 {
    to_optional_number(value).unwrap_or(0.0)
}

/// Like [`to_safe_number`] but keeps "no number here" distinguishable.
pub fn to_optional_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    // `f64::from_str` also accepts "inf" and "NaN"
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Display text for a scalar; [`MISSING_TEXT`] for missing, null, blank or
/// structured values.
pub fn to_safe_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_TEXT.to_string(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                MISSING_TEXT.to_string()
            } else {
                trimmed.to_string()
            }
        }
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(plain_number)
                .unwrap_or_else(|| MISSING_TEXT.to_string()),
        },
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => MISSING_TEXT.to_string(),
    }
}

/// Shortest text for a finite number, without a trailing `.0`.
pub fn plain_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// The array behind `value`, or an empty slice for anything that is not one.
pub fn to_safe_list(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

pub fn to_currency_text(value: Option<&Value>, formatter: &dyn Formatter) -> String {
    formatter.currency(to_safe_number(value))
}

pub fn to_percent_text(value: Option<&Value>, formatter: &dyn Formatter) -> String {
    formatter.percent(to_safe_number(value))
}

pub fn to_count_text(value: Option<&Value>, formatter: &dyn Formatter) -> String {
    formatter.count(to_safe_number(value))
}

/// Date text through the formatter; missing dates stay [`MISSING_TEXT`].
pub fn to_date_text(value: Option<&Value>, formatter: &dyn Formatter) -> String {
    let raw = to_safe_text(value);
    if raw == MISSING_TEXT {
        raw
    } else {
        formatter.date(&raw)
    }
}
