use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{Value, json};
use std::io::Cursor;

/// Sales with a summary and every list empty.
pub fn sales_summary_only() -> Value {
    json!({
        "sales": {
            "summary": {
                "totalSales": 1000,
                "totalOrders": 4,
                "totalDiscount": 0,
                "averageOrderValue": 250
            },
            "topItems": [],
            "topCustomers": [],
            "recentOrders": [],
            "chartData": []
        }
    })
}

/// One payload per report kind, with awkward values mixed in.
pub fn full_bundle() -> Value {
    json!({
        "overview": {
            "summary": {"totalSales": 125000.5, "totalPurchases": "80000", "grossProfit": 45000.5,
                        "totalOrders": 310, "totalCustomers": 42, "totalItems": 118},
            "recentOrders": [
                {"orderNumber": "SO-1001", "customerName": "Northwind", "date": "2024-03-02", "total": 1200, "status": "paid"}
            ]
        },
        "sales": {
            "summary": {"totalSales": 98000, "totalOrders": 250, "totalDiscount": 1200, "averageOrderValue": 392},
            "topItems": [
                {"name": "Widget", "revenue": "N/A", "quantity": null},
                {"itemName": "Gadget", "totalRevenue": 5400.75, "quantitySold": "12"}
            ],
            "topCustomers": [{"customerName": "Northwind", "orderCount": 9, "totalSpent": 8800}],
            "recentOrders": [{"orderNumber": "SO-1002", "customer": {"name": "Contoso"}, "orderDate": "2024-03-05", "totalAmount": 640}],
            "chartData": [{"date": "2024-03-01", "sales": 3200, "orders": 8}]
        },
        "purchases": {
            "summary": {"totalPurchases": 80000, "totalOrders": 60, "averagePurchaseValue": 1333.33, "pendingOrders": 3},
            "topSuppliers": [{"supplierName": "Fabrikam", "totalPurchases": 22000}],
            "topItems": [{"name": "Steel", "totalCost": 9000, "quantity": 300}],
            "recentPurchases": [{"purchaseNumber": "PO-77", "supplierName": "Fabrikam", "purchaseDate": "2024-03-04", "total": 1500, "status": "received"}],
            "chartData": [{"label": "Week 9", "purchases": 4100}]
        },
        "inventory": {
            "summary": {"totalItems": 118, "totalValue": 56000, "lowStockCount": 2, "outOfStockCount": 1},
            "items": [{"name": "Widget", "sku": "W-1", "quantity": 40, "unitPrice": 2.5}],
            "lowStock": [{"name": "Bolt", "sku": "B-9", "stock": 3, "reorderLevel": 10}]
        },
        "customers": {
            "summary": {"totalCustomers": 42, "newCustomers": 5, "activeCustomers": 30, "averageSpend": 410},
            "topCustomers": [{"name": "Northwind", "orders": 9, "total": 8800}]
        },
        "suppliers": {
            "summary": {"totalSuppliers": 12, "activeSuppliers": 9, "totalPurchases": 80000},
            "topSuppliers": [{"name": "Fabrikam", "orders": 14, "amount": 22000}]
        },
        "financial": {
            "summary": {"revenue": 125000, "costOfGoods": 70000, "grossProfit": 55000,
                        "expenses": 20000, "netProfit": 35000, "profitMargin": 28},
            "monthly": [{"month": "2024-01", "revenue": 40000, "expenses": 30000}]
        }
    })
}

/// An inventory payload long enough to need several pages.
pub fn large_inventory(rows: usize) -> Value {
    let items: Vec<Value> = (0..rows)
        .map(|i| json!({"name": format!("Item {}", i), "sku": format!("SKU-{:04}", i), "quantity": i, "unitPrice": 1.5}))
        .collect();
    json!({ "inventory": { "items": items } })
}

/// A solid-color PNG.
pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode png");
    out.into_inner()
}
