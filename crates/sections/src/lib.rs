//! Report sections.
//!
//! A report bundle enters as untyped JSON, is coerced once into the typed
//! per-kind schema in [`schema`], and is then assembled into ordered
//! [`SummarySection`]s and [`TableSection`]s by [`build_sections`].

mod builder;
mod kind;
pub mod schema;
mod section;

pub use builder::{build_sections, build_sections_from_value};
pub use kind::{ParseReportKindError, ReportKind};
pub use schema::{Report, ReportBundle};
pub use section::{BuiltSections, NO_DATA_TEXT, Section, SummarySection, TableSection, fit_row};
