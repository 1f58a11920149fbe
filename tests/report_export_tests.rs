mod common;

use chrono::{TimeZone, Utc};
use common::fixtures::*;
use common::{
    GeneratedPdf, TestResult, exporter_with_sink, fixture_sources, memory_exporter,
    single_delivery,
};
use folio::{
    DefaultFormatter, DirectorySink, ExportError, Exporter, InMemoryFontFetcher, MemorySink,
    PartialExportOptions, ReportKind, ReportMeta, ResourceError,
};
use folio_resource::fixtures as fonts;
use folio_sections::{NO_DATA_TEXT, build_sections_from_value};
use serde_json::json;
use std::sync::Arc;

fn meta() -> ReportMeta {
    ReportMeta::new("Quarterly Report")
        .with_company("Acme Ltd")
        .with_period("Q1 2024")
        .with_generated_at(Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).unwrap())
}

#[tokio::test]
async fn test_sales_summary_with_empty_lists() -> TestResult {
    let (exporter, sink) = memory_exporter();
    exporter
        .export_report_bundle(
            &sales_summary_only(),
            &meta(),
            PartialExportOptions::new().with_filename("sales.pdf"),
        )
        .await?;

    let (filename, pdf) = single_delivery(&sink);
    assert_eq!(filename, "sales.pdf");
    assert_pdf_page_count!(pdf, 1);
    assert_pdf_contains_text!(pdf, "Sales Summary");
    assert_pdf_contains_text!(pdf, "1,000");
    assert_pdf_contains_text!(pdf, "Page 1 of 1");
    assert_pdf_has_font!(pdf, "Fixture-Sans");

    let placeholders = pdf.page_texts()[0]
        .iter()
        .filter(|t| t.as_str() == NO_DATA_TEXT)
        .count();
    assert_eq!(placeholders, 4);
    assert_eq!(
        common::pdf_assertions::info_title(&pdf.doc).as_deref(),
        Some("Quarterly Report")
    );
    Ok(())
}

#[tokio::test]
async fn test_default_filename() -> TestResult {
    let (exporter, sink) = memory_exporter();
    exporter
        .export_report_bundle(&json!({"customers": {}}), &meta(), PartialExportOptions::new())
        .await?;
    let (filename, _) = single_delivery(&sink);
    assert_eq!(filename, "document.pdf");
    Ok(())
}

#[tokio::test]
async fn test_every_kind_appears_in_fixed_order() -> TestResult {
    let (exporter, _) = memory_exporter();
    let bytes = exporter
        .build_report(&full_bundle(), &meta(), PartialExportOptions::new())
        .await?;
    let pdf = GeneratedPdf::from_bytes(bytes)?;
    let texts: Vec<String> = pdf.page_texts().into_iter().flatten().collect();

    let position = |needle: &str| {
        texts
            .iter()
            .position(|t| t == needle)
            .unwrap_or_else(|| panic!("'{}' not rendered", needle))
    };
    let summaries: Vec<usize> = ReportKind::ALL
        .iter()
        .map(|kind| position(&format!("{} Summary", kind.title())))
        .collect();
    assert!(summaries.windows(2).all(|w| w[0] < w[1]), "{:?}", summaries);

    assert_pdf_contains_text!(pdf, "Widget");
    assert_pdf_contains_text!(pdf, "Fabrikam");
    Ok(())
}

#[test]
fn test_widget_row_normalizes_missing_values() {
    let sections = build_sections_from_value(&full_bundle(), &DefaultFormatter::default());
    let top_items = sections
        .tables
        .iter()
        .find(|t| t.kind == ReportKind::Sales && t.title == "Sales: Top Items")
        .expect("sales top items table");
    assert_eq!(top_items.rows[0], vec!["1", "Widget", "0", "-"]);
}

#[tokio::test]
async fn test_long_table_spans_pages() -> TestResult {
    let (exporter, _) = memory_exporter();
    let bytes = exporter
        .build_report(&large_inventory(150), &meta(), PartialExportOptions::new())
        .await?;
    let pdf = GeneratedPdf::from_bytes(bytes)?;
    assert_pdf_min_pages!(pdf, 3);

    let pages = pdf.page_texts();
    let total = pages.len();
    for (index, texts) in pages.iter().enumerate() {
        let footer = format!("Page {} of {}", index + 1, total);
        assert!(texts.contains(&footer), "missing '{}'", footer);
        if texts.iter().any(|t| t.starts_with("SKU-")) {
            assert!(texts.iter().any(|t| t == "SKU"), "page {} lacks the table header", index + 1);
        }
    }
    assert_pdf_contains_text!(pdf, "SKU-0149");
    Ok(())
}

#[tokio::test]
async fn test_identical_input_gives_identical_documents() -> TestResult {
    let (exporter, _) = memory_exporter();
    let first = exporter
        .build_report(&full_bundle(), &meta(), PartialExportOptions::new())
        .await?;
    let second = exporter
        .build_report(&full_bundle(), &meta(), PartialExportOptions::new())
        .await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_exports_fetch_each_font_once() -> TestResult {
    let fetcher = common::fixture_fetcher();
    let sink = Arc::new(MemorySink::new());
    let exporter = Arc::new(
        Exporter::builder()
            .with_sink(sink.clone())
            .with_font_fetcher(fetcher.clone())
            .with_font_sources(fixture_sources())
            .build()?,
    );

    let exports = (0..8).map(|i| {
        let exporter = exporter.clone();
        tokio::spawn(async move {
            exporter
                .export_report_bundle(
                    &sales_summary_only(),
                    &meta(),
                    PartialExportOptions::new().with_filename(format!("report-{}.pdf", i)),
                )
                .await
        })
    });
    for result in futures::future::join_all(exports).await {
        result??;
    }

    assert_eq!(fetcher.fetch_count(), 2);
    assert_eq!(sink.len(), 8);
    Ok(())
}

#[tokio::test]
async fn test_font_failure_is_retried_on_next_export() -> TestResult {
    let fetcher = Arc::new(InMemoryFontFetcher::new());
    fetcher.add("memory://regular.ttf", fonts::regular_font())?;
    let sink = Arc::new(MemorySink::new());
    let exporter = Exporter::builder()
        .with_sink(sink.clone())
        .with_font_fetcher(fetcher.clone())
        .with_font_sources(fixture_sources())
        .build()?;

    let err = exporter
        .export_report_bundle(&sales_summary_only(), &meta(), PartialExportOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::ResourceLoad(ResourceError::NotFound(_))));
    assert!(sink.is_empty());

    let fetches_after_failure = fetcher.fetch_count();
    fetcher.add("memory://bold.ttf", fonts::bold_font())?;
    exporter
        .export_report_bundle(&sales_summary_only(), &meta(), PartialExportOptions::new())
        .await?;
    assert!(fetcher.fetch_count() > fetches_after_failure);
    assert_eq!(sink.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_page_without_room_is_a_configuration_error() {
    let (exporter, sink) = memory_exporter();
    let err = exporter
        .export_report_bundle(
            &sales_summary_only(),
            &meta(),
            PartialExportOptions::new().with_margin(150.0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::Configuration(_)), "{:?}", err);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_report_written_to_directory() -> TestResult {
    let dir = tempfile::tempdir()?;
    let exporter = exporter_with_sink(Arc::new(DirectorySink::new(dir.path())))?;
    exporter
        .export_report_bundle(
            &json!({"financial": {"summary": {"revenue": 10}}}),
            &meta(),
            PartialExportOptions::new().with_filename("financial.pdf"),
        )
        .await?;

    let pdf = GeneratedPdf::from_bytes(std::fs::read(dir.path().join("financial.pdf"))?)?;
    assert_pdf_contains_text!(pdf, "Financial Summary");
    assert_pdf_not_contains_text!(pdf, "Sales Summary");
    Ok(())
}
