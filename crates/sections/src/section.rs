use crate::kind::ReportKind;
use folio_normalize::MISSING_TEXT;

/// Placeholder text for a section that has nothing to show.
pub const NO_DATA_TEXT: &str = "No data available";

/// A label/value block.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySection {
    pub kind: ReportKind,
    pub title: String,
    pub entries: Vec<(String, String)>,
}

impl SummarySection {
    /// An empty entry list is replaced by a single placeholder entry.
    pub fn new(kind: ReportKind, title: impl Into<String>, entries: Vec<(String, String)>) -> Self {
        let entries = if entries.is_empty() {
            vec![(NO_DATA_TEXT.to_string(), MISSING_TEXT.to_string())]
        } else {
            entries
        };
        Self {
            kind,
            title: title.into(),
            entries,
        }
    }
}

/// A table. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSection {
    pub kind: ReportKind,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    placeholder: bool,
}

impl TableSection {
    /// Builds a table, fitting every row to the header count. With no rows
    /// the table gets one placeholder row.
    pub fn new(
        kind: ReportKind,
        title: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        let width = headers.len();
        let placeholder = rows.is_empty();
        let rows = if placeholder {
            let mut placeholder = vec![String::new(); width.max(1)];
            placeholder[0] = NO_DATA_TEXT.to_string();
            vec![placeholder]
        } else {
            rows.into_iter().map(|row| fit_row(row, width)).collect()
        };
        Self {
            kind,
            title: title.into(),
            headers,
            rows,
            placeholder,
        }
    }

    /// True when the table was built without rows and shows the "no data"
    /// placeholder instead.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// Pads with [`MISSING_TEXT`] or truncates so `row` has `width` cells.
pub fn fit_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize_with(width, || MISSING_TEXT.to_string());
    row
}

/// A borrowed section in render order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Section<'a> {
    Summary(&'a SummarySection),
    Table(&'a TableSection),
}

impl<'a> Section<'a> {
    pub fn kind(&self) -> ReportKind {
        match self {
            Section::Summary(s) => s.kind,
            Section::Table(t) => t.kind,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            Section::Summary(s) => &s.title,
            Section::Table(t) => &t.title,
        }
    }
}

/// The output of section assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltSections {
    pub summaries: Vec<SummarySection>,
    pub tables: Vec<TableSection>,
}

impl BuiltSections {
    /// Summaries first, then tables; each list in kind order.
    pub fn iter(&self) -> impl Iterator<Item = Section<'_>> {
        self.summaries
            .iter()
            .map(Section::Summary)
            .chain(self.tables.iter().map(Section::Table))
    }

    pub fn len(&self) -> usize {
        self.summaries.len() + self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty() && self.tables.is_empty()
    }

    /// Distinct kinds that produced at least one section, in kind order.
    pub fn kinds(&self) -> Vec<ReportKind> {
        let mut kinds: Vec<ReportKind> = self.iter().map(|s| s.kind()).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rows_are_fitted_to_headers() {
        let table = TableSection::new(
            ReportKind::Sales,
            "t",
            headers(&["A", "B", "C"]),
            vec![
                vec!["1".into()],
                vec!["1".into(), "2".into(), "3".into(), "4".into()],
            ],
        );
        assert_eq!(table.rows[0], vec!["1", "-", "-"]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
        assert!(!table.is_placeholder());
    }

    #[test]
    fn test_empty_table_gets_placeholder_row() {
        let table = TableSection::new(ReportKind::Sales, "t", headers(&["A", "B"]), vec![]);
        assert_eq!(table.rows, vec![vec![NO_DATA_TEXT.to_string(), String::new()]]);
        assert!(table.is_placeholder());
    }

    #[test]
    fn test_real_row_reading_no_data_is_not_a_placeholder() {
        let table = TableSection::new(
            ReportKind::Inventory,
            "t",
            headers(&["Item", "Note"]),
            vec![vec![NO_DATA_TEXT.to_string(), "restock".to_string()]],
        );
        assert_eq!(table.rows.len(), 1);
        assert!(!table.is_placeholder());
    }

    #[test]
    fn test_empty_summary_gets_placeholder_entry() {
        let summary = SummarySection::new(ReportKind::Overview, "s", vec![]);
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].0, NO_DATA_TEXT);
    }
}
