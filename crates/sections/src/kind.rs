use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The report kinds a bundle may carry, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Overview,
    Sales,
    Purchases,
    Inventory,
    Customers,
    Suppliers,
    Financial,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::Overview,
        ReportKind::Sales,
        ReportKind::Purchases,
        ReportKind::Inventory,
        ReportKind::Customers,
        ReportKind::Suppliers,
        ReportKind::Financial,
    ];

    /// Key of this kind in a bundle object.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Overview => "overview",
            ReportKind::Sales => "sales",
            ReportKind::Purchases => "purchases",
            ReportKind::Inventory => "inventory",
            ReportKind::Customers => "customers",
            ReportKind::Suppliers => "suppliers",
            ReportKind::Financial => "financial",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Overview => "Overview",
            ReportKind::Sales => "Sales",
            ReportKind::Purchases => "Purchases",
            ReportKind::Inventory => "Inventory",
            ReportKind::Customers => "Customers",
            ReportKind::Suppliers => "Suppliers",
            ReportKind::Financial => "Financial",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReportKindError(pub String);

impl fmt::Display for ParseReportKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown report kind '{}'", self.0)
    }
}

impl std::error::Error for ParseReportKindError {}

impl FromStr for ReportKind {
    type Err = ParseReportKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| ParseReportKindError(s.to_string()))
    }
}
