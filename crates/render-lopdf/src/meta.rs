use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document-level information printed in the report header.
///
/// Optional fields that are `None` are left out of the header entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub title: String,
    #[serde(default)]
    pub period_label: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_address: Option<String>,
    #[serde(default)]
    pub company_phone: Option<String>,
    #[serde(default)]
    pub company_email: Option<String>,
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self::new("Business Report")
    }
}

impl ReportMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            period_label: None,
            company_name: None,
            company_address: None,
            company_phone: None,
            company_email: None,
            generated_at: Utc::now(),
        }
    }

    pub fn with_period(mut self, label: impl Into<String>) -> Self {
        self.period_label = Some(label.into());
        self
    }

    pub fn with_company(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.company_address = Some(address.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.company_phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.company_email = Some(email.into());
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }

    /// Header lines under the title, skipping unset or blank fields.
    pub fn header_lines(&self) -> Vec<String> {
        let present = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let mut lines = Vec::new();
        lines.extend(present(&self.company_name));
        lines.extend(present(&self.company_address));
        lines.extend(present(&self.company_phone).map(|p| format!("Phone: {}", p)));
        lines.extend(present(&self.company_email).map(|e| format!("Email: {}", e)));
        lines.extend(present(&self.period_label).map(|p| format!("Period: {}", p)));
        lines.push(format!(
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        lines
    }
}
