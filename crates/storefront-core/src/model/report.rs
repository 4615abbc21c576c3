use serde::Serialize;

/// Units sold per product over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_id: u64,
    pub name: String,
    pub total_quantity: u64,
}

/// Revenue in cents per product over a date range, at order-time prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRevenue {
    pub product_id: u64,
    pub name: String,
    pub revenue: u64,
}
