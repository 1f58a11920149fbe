//! Defensive value normalization.
//!
//! Report payloads arrive with no shape guarantee. Everything in this crate
//! takes an `Option<&Value>` (a field that may be missing) and always returns
//! something displayable: numbers are finite, text is never empty, lists are
//! always slices.

mod format;
mod value;

pub use format::{DefaultFormatter, Formatter};
pub use value::{
    MISSING_TEXT, plain_number, to_count_text, to_currency_text, to_date_text,
    to_optional_number, to_percent_text, to_safe_list, to_safe_number, to_safe_text,
};
