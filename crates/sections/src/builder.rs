use crate::kind::ReportKind;
use crate::schema::{
    ItemStat, MonthlyFigures, OrderRecord, PartyStat, Report, ReportBundle, SeriesPoint, StockItem,
};
use crate::section::{BuiltSections, SummarySection, TableSection};
use folio_normalize::{Formatter, MISSING_TEXT, to_date_text};
use log::debug;
use serde_json::Value;

/// Coerces `bundle` and assembles its sections.
pub fn build_sections_from_value(bundle: &Value, formatter: &dyn Formatter) -> BuiltSections {
    build_sections(&ReportBundle::from_value(bundle), formatter)
}

/// Assembles the sections of every report present in `bundle`.
///
/// Each present kind yields one summary when its payload had a summary
/// object, and one table per list field whether or not the list has rows.
/// Absent kinds yield nothing.
pub fn build_sections(bundle: &ReportBundle, formatter: &dyn Formatter) -> BuiltSections {
    let mut out = BuiltSections::default();
    for report in bundle.reports() {
        let mut asm = Assembler {
            kind: report.kind(),
            fmt: formatter,
            out: &mut out,
        };
        asm.report(report);
    }
    debug!(
        "Built {} summaries and {} tables for {} report kinds",
        out.summaries.len(),
        out.tables.len(),
        bundle.reports().len()
    );
    out
}

/// How a summary value is displayed.
enum Metric {
    Money(f64),
    Count(f64),
    Percent(f64),
}

struct Assembler<'a> {
    kind: ReportKind,
    fmt: &'a dyn Formatter,
    out: &'a mut BuiltSections,
}

impl Assembler<'_> {
    fn report(&mut self, report: &Report) {
        use Metric::*;
        match report {
            Report::Overview(r) => {
                if let Some(s) = &r.summary {
                    self.summary(&[
                        ("Total Sales", Money(s.total_sales)),
                        ("Total Purchases", Money(s.total_purchases)),
                        ("Gross Profit", Money(s.gross_profit)),
                        ("Total Orders", Count(s.total_orders)),
                        ("Total Customers", Count(s.total_customers)),
                        ("Total Items", Count(s.total_items)),
                    ]);
                }
                self.orders("Recent Orders", "Order", "Customer", &r.recent_orders);
            }
            Report::Sales(r) => {
                if let Some(s) = &r.summary {
                    self.summary(&[
                        ("Total Sales", Money(s.total_sales)),
                        ("Total Orders", Count(s.total_orders)),
                        ("Total Discount", Money(s.total_discount)),
                        ("Average Order Value", Money(s.average_order_value)),
                    ]);
                }
                self.items("Top Items", "Revenue", &r.top_items);
                self.parties("Top Customers", "Customer", "Total Spent", &r.top_customers);
                self.orders("Recent Orders", "Order", "Customer", &r.recent_orders);
                self.series("Daily Sales", "Sales", &r.chart_data);
            }
            Report::Purchases(r) => {
                if let Some(s) = &r.summary {
                    self.summary(&[
                        ("Total Purchases", Money(s.total_purchases)),
                        ("Total Orders", Count(s.total_orders)),
                        ("Average Purchase Value", Money(s.average_purchase_value)),
                        ("Pending Orders", Count(s.pending_orders)),
                    ]);
                }
                self.parties("Top Suppliers", "Supplier", "Total Purchases", &r.top_suppliers);
                self.items("Top Purchased Items", "Cost", &r.top_items);
                self.orders("Recent Purchases", "Purchase", "Supplier", &r.recent_purchases);
                self.series("Daily Purchases", "Purchases", &r.chart_data);
            }
            Report::Inventory(r) => {
                if let Some(s) = &r.summary {
                    self.summary(&[
                        ("Total Items", Count(s.total_items)),
                        ("Total Stock Value", Money(s.total_stock_value)),
                        ("Low Stock Items", Count(s.low_stock_items)),
                        ("Out of Stock Items", Count(s.out_of_stock_items)),
                    ]);
                }
                self.stock_levels(&r.items);
                self.low_stock(&r.low_stock);
            }
            Report::Customers(r) => {
                if let Some(s) = &r.summary {
                    self.summary(&[
                        ("Total Customers", Count(s.total_customers)),
                        ("New Customers", Count(s.new_customers)),
                        ("Active Customers", Count(s.active_customers)),
                        ("Average Spend", Money(s.average_spend)),
                    ]);
                }
                self.parties("Top Customers", "Customer", "Total Spent", &r.top_customers);
            }
            Report::Suppliers(r) => {
                if let Some(s) = &r.summary {
                    self.summary(&[
                        ("Total Suppliers", Count(s.total_suppliers)),
                        ("Active Suppliers", Count(s.active_suppliers)),
                        ("Total Purchases", Money(s.total_purchases)),
                    ]);
                }
                self.parties("Top Suppliers", "Supplier", "Total Purchases", &r.top_suppliers);
            }
            Report::Financial(r) => {
                if let Some(s) = &r.summary {
                    self.summary(&[
                        ("Revenue", Money(s.revenue)),
                        ("Cost of Goods", Money(s.cost_of_goods)),
                        ("Gross Profit", Money(s.gross_profit)),
                        ("Expenses", Money(s.expenses)),
                        ("Net Profit", Money(s.net_profit)),
                        ("Profit Margin", Percent(s.profit_margin)),
                    ]);
                }
                self.monthly(&r.monthly);
            }
        }
    }

    fn summary(&mut self, metrics: &[(&str, Metric)]) {
        let entries = metrics
            .iter()
            .map(|(label, metric)| {
                let value = match *metric {
                    Metric::Money(v) => self.fmt.currency(v),
                    Metric::Count(v) => self.fmt.count(v),
                    Metric::Percent(v) => self.fmt.percent(v),
                };
                (label.to_string(), value)
            })
            .collect();
        let title = format!("{} Summary", self.kind.title());
        self.out
            .summaries
            .push(SummarySection::new(self.kind, title, entries));
    }

    /// Pushes a table; `ranked` tables get a leading `#` column.
    fn table<T>(&mut self, name: &str, headers: &[&str], ranked: bool, records: &[T], row: impl Fn(&T) -> Vec<String>) {
        let mut header_row: Vec<String> = Vec::with_capacity(headers.len() + 1);
        if ranked {
            header_row.push("#".to_string());
        }
        header_row.extend(headers.iter().map(|h| h.to_string()));

        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let cells = row(record);
                if ranked {
                    std::iter::once((index + 1).to_string()).chain(cells).collect()
                } else {
                    cells
                }
            })
            .collect();

        let title = format!("{}: {}", self.kind.title(), name);
        self.out
            .tables
            .push(TableSection::new(self.kind, title, header_row, rows));
    }

    fn items(&mut self, name: &str, amount: &str, items: &[ItemStat]) {
        let fmt = self.fmt;
        self.table(name, &["Item", amount, "Quantity"], true, items, |i| {
            vec![i.name.clone(), fmt.currency(i.revenue), optional_count(fmt, i.quantity)]
        });
    }

    fn parties(&mut self, name: &str, party: &str, amount: &str, parties: &[PartyStat]) {
        let fmt = self.fmt;
        self.table(name, &[party, "Orders", amount], true, parties, |p| {
            vec![p.name.clone(), optional_count(fmt, p.orders), fmt.currency(p.total)]
        });
    }

    fn orders(&mut self, name: &str, reference: &str, party: &str, orders: &[OrderRecord]) {
        let fmt = self.fmt;
        self.table(name, &[reference, party, "Date", "Total", "Status"], false, orders, |o| {
            vec![
                o.reference.clone(),
                o.party.clone(),
                to_date_text(o.date.as_ref(), fmt),
                fmt.currency(o.total),
                o.status.clone(),
            ]
        });
    }

    fn series(&mut self, name: &str, amount: &str, points: &[SeriesPoint]) {
        let fmt = self.fmt;
        self.table(name, &["Date", amount, "Orders"], false, points, |p| {
            vec![to_date_text(p.label.as_ref(), fmt), fmt.currency(p.amount), optional_count(fmt, p.orders)]
        });
    }

    fn stock_levels(&mut self, items: &[StockItem]) {
        let fmt = self.fmt;
        self.table(
            "Stock Levels",
            &["Item", "SKU", "Stock", "Unit Price", "Stock Value"],
            false,
            items,
            |s| {
                vec![
                    s.name.clone(),
                    s.sku.clone(),
                    fmt.count(s.quantity),
                    fmt.currency(s.unit_price),
                    fmt.currency(s.stock_value),
                ]
            },
        );
    }

    fn low_stock(&mut self, items: &[StockItem]) {
        let fmt = self.fmt;
        self.table("Low Stock", &["Item", "SKU", "Stock", "Reorder Level"], false, items, |s| {
            vec![
                s.name.clone(),
                s.sku.clone(),
                fmt.count(s.quantity),
                optional_count(fmt, s.reorder_level),
            ]
        });
    }

    fn monthly(&mut self, months: &[MonthlyFigures]) {
        let fmt = self.fmt;
        self.table("Monthly Breakdown", &["Month", "Revenue", "Expenses", "Profit"], false, months, |m| {
            vec![
                m.month.clone(),
                fmt.currency(m.revenue),
                fmt.currency(m.expenses),
                fmt.currency(m.profit),
            ]
        });
    }
}

fn optional_count(fmt: &dyn Formatter, value: Option<f64>) -> String {
    value.map_or_else(|| MISSING_TEXT.to_string(), |v| fmt.count(v))
}
