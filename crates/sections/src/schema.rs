//! Typed report payloads.
//!
//! Coercion never fails. Every field is looked up under a small set of
//! aliases (dotted paths reach into nested records) and normalized on the way
//! in, so a field that is missing, null or of the wrong shape ends up as `0`,
//! `"-"` or `None`.

use crate::kind::ReportKind;
use folio_normalize::{to_optional_number, to_safe_list, to_safe_number, to_safe_text};
use log::{debug, warn};
use serde_json::Value;

/// The reports present in one export request, in [`ReportKind::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportBundle {
    reports: Vec<Report>,
}

impl ReportBundle {
    /// Coerces a bundle object. A missing or `null` entry means the kind is
    /// absent; a bundle that is not an object has no reports at all.
    pub fn from_value(bundle: &Value) -> Self {
        if !bundle.is_object() {
            warn!("Report bundle is not an object; treating it as empty");
            return Self::default();
        }
        let reports: Vec<Report> = ReportKind::ALL
            .into_iter()
            .filter_map(|kind| match bundle.get(kind.as_str()) {
                None | Some(Value::Null) => None,
                Some(payload) => Some(Report::from_value(kind, payload)),
            })
            .collect();
        debug!(
            "Coerced report bundle with kinds [{}]",
            reports.iter().map(|r| r.kind().as_str()).collect::<Vec<_>>().join(", ")
        );
        Self { reports }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn kinds(&self) -> impl Iterator<Item = ReportKind> + '_ {
        self.reports.iter().map(Report::kind)
    }

    pub fn get(&self, kind: ReportKind) -> Option<&Report> {
        self.reports.iter().find(|r| r.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// One report payload, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Overview(OverviewReport),
    Sales(SalesReport),
    Purchases(PurchasesReport),
    Inventory(InventoryReport),
    Customers(CustomersReport),
    Suppliers(SuppliersReport),
    Financial(FinancialReport),
}

impl Report {
    pub fn from_value(kind: ReportKind, payload: &Value) -> Self {
        match kind {
            ReportKind::Overview => Report::Overview(OverviewReport {
                summary: summary(payload, |s| OverviewSummary {
                    total_sales: number(s, &["totalSales"]),
                    total_purchases: number(s, &["totalPurchases"]),
                    gross_profit: number(s, &["grossProfit"]),
                    total_orders: number(s, &["totalOrders"]),
                    total_customers: number(s, &["totalCustomers"]),
                    total_items: number(s, &["totalItems"]),
                }),
                recent_orders: list(payload, "recentOrders", OrderRecord::from_value),
            }),
            ReportKind::Sales => Report::Sales(SalesReport {
                summary: summary(payload, |s| SalesSummary {
                    total_sales: number(s, &["totalSales"]),
                    total_orders: number(s, &["totalOrders"]),
                    total_discount: number(s, &["totalDiscount"]),
                    average_order_value: number(s, &["averageOrderValue"]),
                }),
                top_items: list(payload, "topItems", ItemStat::from_value),
                top_customers: list(payload, "topCustomers", PartyStat::from_value),
                recent_orders: list(payload, "recentOrders", OrderRecord::from_value),
                chart_data: list(payload, "chartData", SeriesPoint::from_value),
            }),
            ReportKind::Purchases => Report::Purchases(PurchasesReport {
                summary: summary(payload, |s| PurchasesSummary {
                    total_purchases: number(s, &["totalPurchases"]),
                    total_orders: number(s, &["totalOrders"]),
                    average_purchase_value: number(s, &["averagePurchaseValue"]),
                    pending_orders: number(s, &["pendingOrders"]),
                }),
                top_suppliers: list(payload, "topSuppliers", PartyStat::from_value),
                top_items: list(payload, "topItems", ItemStat::from_value),
                recent_purchases: list(payload, "recentPurchases", OrderRecord::from_value),
                chart_data: list(payload, "chartData", SeriesPoint::from_value),
            }),
            ReportKind::Inventory => Report::Inventory(InventoryReport {
                summary: summary(payload, |s| InventorySummary {
                    total_items: number(s, &["totalItems"]),
                    total_stock_value: number(s, &["totalStockValue", "totalValue"]),
                    low_stock_items: number(s, &["lowStockItems", "lowStockCount"]),
                    out_of_stock_items: number(s, &["outOfStockItems", "outOfStockCount"]),
                }),
                items: list(payload, "items", StockItem::from_value),
                low_stock: list(payload, "lowStock", StockItem::from_value),
            }),
            ReportKind::Customers => Report::Customers(CustomersReport {
                summary: summary(payload, |s| CustomersSummary {
                    total_customers: number(s, &["totalCustomers"]),
                    new_customers: number(s, &["newCustomers"]),
                    active_customers: number(s, &["activeCustomers"]),
                    average_spend: number(s, &["averageSpend", "averageOrderValue"]),
                }),
                top_customers: list(payload, "topCustomers", PartyStat::from_value),
            }),
            ReportKind::Suppliers => Report::Suppliers(SuppliersReport {
                summary: summary(payload, |s| SuppliersSummary {
                    total_suppliers: number(s, &["totalSuppliers"]),
                    active_suppliers: number(s, &["activeSuppliers"]),
                    total_purchases: number(s, &["totalPurchases"]),
                }),
                top_suppliers: list(payload, "topSuppliers", PartyStat::from_value),
            }),
            ReportKind::Financial => Report::Financial(FinancialReport {
                summary: summary(payload, |s| FinancialSummary {
                    revenue: number(s, &["revenue", "totalRevenue"]),
                    cost_of_goods: number(s, &["costOfGoods", "costOfGoodsSold"]),
                    gross_profit: number(s, &["grossProfit"]),
                    expenses: number(s, &["expenses", "totalExpenses"]),
                    net_profit: number(s, &["netProfit"]),
                    profit_margin: number(s, &["profitMargin"]),
                }),
                monthly: list(payload, "monthly", MonthlyFigures::from_value),
            }),
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Overview(_) => ReportKind::Overview,
            Report::Sales(_) => ReportKind::Sales,
            Report::Purchases(_) => ReportKind::Purchases,
            Report::Inventory(_) => ReportKind::Inventory,
            Report::Customers(_) => ReportKind::Customers,
            Report::Suppliers(_) => ReportKind::Suppliers,
            Report::Financial(_) => ReportKind::Financial,
        }
    }
}

// --- Per-kind reports ---

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewReport {
    pub summary: Option<OverviewSummary>,
    pub recent_orders: Vec<OrderRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewSummary {
    pub total_sales: f64,
    pub total_purchases: f64,
    pub gross_profit: f64,
    pub total_orders: f64,
    pub total_customers: f64,
    pub total_items: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesReport {
    pub summary: Option<SalesSummary>,
    pub top_items: Vec<ItemStat>,
    pub top_customers: Vec<PartyStat>,
    pub recent_orders: Vec<OrderRecord>,
    pub chart_data: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub total_sales: f64,
    pub total_orders: f64,
    pub total_discount: f64,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchasesReport {
    pub summary: Option<PurchasesSummary>,
    pub top_suppliers: Vec<PartyStat>,
    pub top_items: Vec<ItemStat>,
    pub recent_purchases: Vec<OrderRecord>,
    pub chart_data: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchasesSummary {
    pub total_purchases: f64,
    pub total_orders: f64,
    pub average_purchase_value: f64,
    pub pending_orders: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryReport {
    pub summary: Option<InventorySummary>,
    pub items: Vec<StockItem>,
    pub low_stock: Vec<StockItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub total_items: f64,
    pub total_stock_value: f64,
    pub low_stock_items: f64,
    pub out_of_stock_items: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomersReport {
    pub summary: Option<CustomersSummary>,
    pub top_customers: Vec<PartyStat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomersSummary {
    pub total_customers: f64,
    pub new_customers: f64,
    pub active_customers: f64,
    pub average_spend: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuppliersReport {
    pub summary: Option<SuppliersSummary>,
    pub top_suppliers: Vec<PartyStat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuppliersSummary {
    pub total_suppliers: f64,
    pub active_suppliers: f64,
    pub total_purchases: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialReport {
    pub summary: Option<FinancialSummary>,
    pub monthly: Vec<MonthlyFigures>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    pub revenue: f64,
    pub cost_of_goods: f64,
    pub gross_profit: f64,
    pub expenses: f64,
    pub net_profit: f64,
    /// Percent, e.g. `23.5` for 23.5%.
    pub profit_margin: f64,
}

// --- Records ---

/// A ranked item: best sellers or most purchased.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStat {
    pub name: String,
    pub revenue: f64,
    pub quantity: Option<f64>,
}

impl ItemStat {
    fn from_value(record: &Value) -> Self {
        Self {
            name: text(record, &["name", "itemName", "item.name"]),
            revenue: number(record, &["revenue", "totalRevenue", "totalCost", "total"]),
            quantity: optional(record, &["quantity", "quantitySold", "qty"]),
        }
    }
}

/// A ranked customer or supplier.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyStat {
    pub name: String,
    pub orders: Option<f64>,
    pub total: f64,
}

impl PartyStat {
    fn from_value(record: &Value) -> Self {
        Self {
            name: text(record, &["name", "customerName", "supplierName"]),
            orders: optional(record, &["orders", "orderCount", "totalOrders"]),
            total: number(record, &["totalSpent", "totalPurchases", "total", "amount"]),
        }
    }
}

/// A sales order or purchase order line in a "recent" list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub reference: String,
    pub party: String,
    /// Raw date value; formatted at assembly time.
    pub date: Option<Value>,
    pub total: f64,
    pub status: String,
}

impl OrderRecord {
    fn from_value(record: &Value) -> Self {
        Self {
            reference: text(record, &["orderNumber", "purchaseNumber", "reference", "id"]),
            party: text(
                record,
                &["customerName", "supplierName", "customer.name", "supplier.name"],
            ),
            date: raw(record, &["date", "orderDate", "purchaseDate", "createdAt"]),
            total: number(record, &["total", "totalAmount", "amount"]),
            status: text(record, &["status"]),
        }
    }
}

/// One point of a daily sales/purchases series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    /// Raw date or period value; formatted at assembly time.
    pub label: Option<Value>,
    pub amount: f64,
    pub orders: Option<f64>,
}

impl SeriesPoint {
    fn from_value(record: &Value) -> Self {
        Self {
            label: raw(record, &["date", "label", "period"]),
            amount: number(record, &["sales", "purchases", "total", "amount", "value"]),
            orders: optional(record, &["orders", "count"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockItem {
    pub name: String,
    pub sku: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub reorder_level: Option<f64>,
    pub stock_value: f64,
}

impl StockItem {
    fn from_value(record: &Value) -> Self {
        let quantity = number(record, &["quantity", "stock", "currentStock"]);
        let unit_price = number(record, &["unitPrice", "price", "costPrice"]);
        Self {
            name: text(record, &["name", "itemName"]),
            sku: text(record, &["sku", "code"]),
            quantity,
            unit_price,
            reorder_level: optional(record, &["reorderLevel", "minStock"]),
            stock_value: optional(record, &["stockValue", "totalValue"])
                .unwrap_or(quantity * unit_price),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyFigures {
    pub month: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

impl MonthlyFigures {
    fn from_value(record: &Value) -> Self {
        let revenue = number(record, &["revenue", "sales"]);
        let expenses = number(record, &["expenses", "costs"]);
        Self {
            month: text(record, &["month", "period", "label"]),
            revenue,
            expenses,
            profit: optional(record, &["profit", "netProfit"]).unwrap_or(revenue - expenses),
        }
    }
}

// --- Field access ---

/// First non-null value among `paths`.
fn field<'a>(record: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| path.split('.').try_fold(record, |value, key| value.get(key)))
        .find(|value| !value.is_null())
}

fn number(record: &Value, paths: &[&str]) -> f64 {
    to_safe_number(field(record, paths))
}

fn optional(record: &Value, paths: &[&str]) -> Option<f64> {
    to_optional_number(field(record, paths))
}

fn text(record: &Value, paths: &[&str]) -> String {
    to_safe_text(field(record, paths))
}

fn raw(record: &Value, paths: &[&str]) -> Option<Value> {
    field(record, paths).cloned()
}

fn summary<T>(payload: &Value, parse: impl FnOnce(&Value) -> T) -> Option<T> {
    payload.get("summary").filter(|s| s.is_object()).map(parse)
}

fn list<T>(payload: &Value, key: &str, parse: fn(&Value) -> T) -> Vec<T> {
    to_safe_list(payload.get(key)).iter().map(parse).collect()
}
