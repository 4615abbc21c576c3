//! Persistence seam.
//!
//! Handlers talk to the store through these traits only; `MemoryStore` is the
//! shipped implementation. A SQL-backed store slots in by implementing the
//! same three traits.

pub mod memory;
pub mod seed;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use storefront_core::error::Result;
use storefront_core::model::{
    Customer, NewCustomer, NewOrder, NewProduct, Order, OrderItem, OrderStatus, Page, PageRequest,
    Product, ProductRevenue, ProductSales,
};

pub use memory::MemoryStore;

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, new: NewProduct) -> Result<Product>;
    /// Ordered by id.
    async fn find_products(&self, req: PageRequest) -> Result<Page<Product>>;
    async fn find_product(&self, id: u64) -> Result<Option<Product>>;
    async fn find_products_by_category(&self, category: &str) -> Result<Vec<Product>>;
    /// Stock > 0, ordered by stock ascending.
    async fn find_available_products(&self) -> Result<Vec<Product>>;
    async fn find_products_with_stock_below(&self, min_stock: u32) -> Result<Vec<Product>>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn insert_customer(&self, new: NewCustomer) -> Result<Customer>;
    /// Ordered by id.
    async fn find_customers(&self, req: PageRequest) -> Result<Page<Customer>>;
    async fn find_customer(&self, id: u64) -> Result<Option<Customer>>;
    /// Ordered by first name ascending.
    async fn find_customers_by_last_name(&self, last_name: &str) -> Result<Vec<Customer>>;
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Checks the customer and product references, copies current product
    /// prices onto the items, and derives the total.
    async fn insert_order(&self, new: NewOrder) -> Result<Order>;
    /// Ordered by order date, newest first.
    async fn find_orders(&self, req: PageRequest) -> Result<Page<Order>>;
    async fn find_order(&self, id: u64) -> Result<Option<Order>>;
    async fn find_orders_by_customer(&self, customer_id: u64) -> Result<Vec<Order>>;
    async fn find_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;
    /// Orders in `status` placed strictly before `before`.
    async fn find_stale_orders(&self, status: OrderStatus, before: NaiveDateTime) -> Result<Vec<Order>>;
    /// PENDING or PROCESSING orders placed strictly before `cutoff`.
    async fn find_orders_needing_attention(&self, cutoff: NaiveDateTime) -> Result<Vec<Order>>;
    /// Orders placed in `[start, end]` (inclusive), ordered by id.
    async fn find_orders_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        req: PageRequest,
    ) -> Result<Page<Order>>;

    async fn find_items_by_order(&self, order_id: u64) -> Result<Vec<OrderItem>>;
    async fn find_items_by_product(&self, product_id: u64) -> Result<Vec<OrderItem>>;
    /// Units sold per product for orders in `[start, end]`, most sold first;
    /// ties by product id.
    async fn top_selling_products(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<ProductSales>>;
    /// `quantity * price` summed per product for orders in `[start, end]`,
    /// highest first; ties by product id.
    async fn revenue_by_product(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<ProductRevenue>>;
}

pub trait StorefrontStore: ProductStore + CustomerStore + OrderStore {}

impl<T: ProductStore + CustomerStore + OrderStore> StorefrontStore for T {}
