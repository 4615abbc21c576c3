//! In-memory store backed by `DashMap` tables.
//!
//! Ids come from one sequence per table. Email uniqueness is enforced through
//! an index map claimed with `entry`, so two concurrent inserts with the same
//! email cannot both succeed. Scans copy matching rows out and sort them
//! before any shard guard is released back to the caller.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use storefront_core::error::{Result, StorefrontError};
use storefront_core::model::{
    Customer, NewCustomer, NewOrder, NewProduct, Order, OrderItem, OrderStatus, Page, PageRequest,
    Product, ProductRevenue, ProductSales,
};

use super::{CustomerStore, OrderStore, ProductStore};

pub struct MemoryStore {
    products: DashMap<u64, Product>,
    customers: DashMap<u64, Customer>,
    orders: DashMap<u64, Order>,
    email_index: DashMap<String, u64>,
    product_seq: AtomicU64,
    customer_seq: AtomicU64,
    order_seq: AtomicU64,
    item_seq: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            customers: DashMap::new(),
            orders: DashMap::new(),
            email_index: DashMap::new(),
            product_seq: AtomicU64::new(1),
            customer_seq: AtomicU64::new(1),
            order_seq: AtomicU64::new(1),
            item_seq: AtomicU64::new(1),
        }
    }

    /// Per-product sum of `weight(item)` over orders placed in `[start, end]`,
    /// largest first, ties by product id.
    fn aggregate_items(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        weight: impl Fn(&OrderItem) -> u64,
    ) -> Vec<(u64, String, u64)> {
        let mut totals: BTreeMap<u64, u64> = BTreeMap::new();
        for order in self.orders.iter() {
            let o = order.value();
            if o.order_date < start || o.order_date > end {
                continue;
            }
            for item in &o.items {
                let t = totals.entry(item.product_id).or_insert(0);
                *t = t.saturating_add(weight(item));
            }
        }

        let mut rows: Vec<(u64, String, u64)> = totals
            .into_iter()
            .map(|(id, total)| {
                let name = self
                    .products
                    .get(&id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                (id, name, total)
            })
            .collect();
        rows.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
        rows
    }

    fn scan<T: Clone>(table: &DashMap<u64, T>, keep: impl Fn(&T) -> bool) -> Vec<T> {
        table
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect()
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StorefrontError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert_product(&self, new: NewProduct) -> Result<Product> {
        require("name", &new.name)?;
        require("category", &new.category)?;

        let id = self.product_seq.fetch_add(1, Ordering::Relaxed);
        let product = Product {
            id,
            name: new.name,
            category: new.category,
            price: new.price,
            stock: new.stock,
        };
        self.products.insert(id, product.clone());
        Ok(product)
    }

    async fn find_products(&self, req: PageRequest) -> Result<Page<Product>> {
        let mut rows = Self::scan(&self.products, |_| true);
        rows.sort_by_key(|p| p.id);
        Ok(Page::from_ordered(rows, req))
    }

    async fn find_product(&self, id: u64) -> Result<Option<Product>> {
        Ok(self.products.get(&id).map(|r| r.value().clone()))
    }

    async fn find_products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let mut rows = Self::scan(&self.products, |p| p.category == category);
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    async fn find_available_products(&self) -> Result<Vec<Product>> {
        let mut rows = Self::scan(&self.products, Product::is_available);
        rows.sort_by_key(|p| (p.stock, p.id));
        Ok(rows)
    }

    async fn find_products_with_stock_below(&self, min_stock: u32) -> Result<Vec<Product>> {
        let mut rows = Self::scan(&self.products, |p| p.stock < min_stock);
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert_customer(&self, new: NewCustomer) -> Result<Customer> {
        require("first_name", &new.first_name)?;
        require("last_name", &new.last_name)?;
        require("email", &new.email)?;
        require("address", &new.address)?;

        let id = match self.email_index.entry(new.email.clone()) {
            Entry::Occupied(_) => {
                return Err(StorefrontError::Conflict(format!(
                    "email already registered: {}",
                    new.email
                )))
            }
            Entry::Vacant(v) => {
                let id = self.customer_seq.fetch_add(1, Ordering::Relaxed);
                v.insert(id);
                id
            }
        };

        let customer = Customer {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            address: new.address,
        };
        self.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn find_customers(&self, req: PageRequest) -> Result<Page<Customer>> {
        let mut rows = Self::scan(&self.customers, |_| true);
        rows.sort_by_key(|c| c.id);
        Ok(Page::from_ordered(rows, req))
    }

    async fn find_customer(&self, id: u64) -> Result<Option<Customer>> {
        Ok(self.customers.get(&id).map(|r| r.value().clone()))
    }

    async fn find_customers_by_last_name(&self, last_name: &str) -> Result<Vec<Customer>> {
        let mut rows = Self::scan(&self.customers, |c| c.last_name == last_name);
        rows.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let Some(id) = self.email_index.get(email).map(|r| *r.value()) else {
            return Ok(None);
        };
        self.find_customer(id).await
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, new: NewOrder) -> Result<Order> {
        if !self.customers.contains_key(&new.customer_id) {
            return Err(StorefrontError::BadRequest(format!(
                "unknown customer: {}",
                new.customer_id
            )));
        }

        let order_id = self.order_seq.fetch_add(1, Ordering::Relaxed);
        let mut items = Vec::with_capacity(new.items.len());
        for item in &new.items {
            if item.quantity == 0 {
                return Err(StorefrontError::BadRequest(format!(
                    "quantity must be positive (product {})",
                    item.product_id
                )));
            }
            let price = self
                .products
                .get(&item.product_id)
                .map(|p| p.price)
                .ok_or_else(|| {
                    StorefrontError::BadRequest(format!("unknown product: {}", item.product_id))
                })?;
            items.push(OrderItem {
                id: self.item_seq.fetch_add(1, Ordering::Relaxed),
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                price,
            });
        }

        let mut order = Order {
            id: order_id,
            customer_id: new.customer_id,
            order_date: new.order_date,
            status: new.status,
            total_amount: 0,
            items,
        };
        order.calculate_total();
        self.orders.insert(order_id, order.clone());
        Ok(order)
    }

    async fn find_orders(&self, req: PageRequest) -> Result<Page<Order>> {
        let mut rows = Self::scan(&self.orders, |_| true);
        rows.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(a.id.cmp(&b.id)));
        Ok(Page::from_ordered(rows, req))
    }

    async fn find_order(&self, id: u64) -> Result<Option<Order>> {
        Ok(self.orders.get(&id).map(|r| r.value().clone()))
    }

    async fn find_orders_by_customer(&self, customer_id: u64) -> Result<Vec<Order>> {
        let mut rows = Self::scan(&self.orders, |o| o.customer_id == customer_id);
        rows.sort_by_key(|o| o.id);
        Ok(rows)
    }

    async fn find_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let mut rows = Self::scan(&self.orders, |o| o.status == status);
        rows.sort_by_key(|o| o.id);
        Ok(rows)
    }

    async fn find_stale_orders(&self, status: OrderStatus, before: NaiveDateTime) -> Result<Vec<Order>> {
        let mut rows = Self::scan(&self.orders, |o| o.status == status && o.order_date < before);
        rows.sort_by_key(|o| o.id);
        Ok(rows)
    }

    async fn find_orders_needing_attention(&self, cutoff: NaiveDateTime) -> Result<Vec<Order>> {
        let mut rows = Self::scan(&self.orders, |o| o.status.is_open() && o.order_date < cutoff);
        rows.sort_by_key(|o| o.id);
        Ok(rows)
    }

    async fn find_orders_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        req: PageRequest,
    ) -> Result<Page<Order>> {
        let mut rows = Self::scan(&self.orders, |o| o.order_date >= start && o.order_date <= end);
        rows.sort_by_key(|o| o.id);
        Ok(Page::from_ordered(rows, req))
    }

    async fn find_items_by_order(&self, order_id: u64) -> Result<Vec<OrderItem>> {
        Ok(self
            .orders
            .get(&order_id)
            .map(|o| o.items.clone())
            .unwrap_or_default())
    }

    async fn find_items_by_product(&self, product_id: u64) -> Result<Vec<OrderItem>> {
        let mut items: Vec<OrderItem> = self
            .orders
            .iter()
            .flat_map(|o| {
                o.value()
                    .items
                    .iter()
                    .filter(|i| i.product_id == product_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn top_selling_products(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<ProductSales>> {
        let rows = self.aggregate_items(start, end, |i| u64::from(i.quantity));
        Ok(rows
            .into_iter()
            .map(|(product_id, name, total_quantity)| ProductSales { product_id, name, total_quantity })
            .collect())
    }

    async fn revenue_by_product(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<ProductRevenue>> {
        let rows = self.aggregate_items(start, end, OrderItem::line_total);
        Ok(rows
            .into_iter()
            .map(|(product_id, name, revenue)| ProductRevenue { product_id, name, revenue })
            .collect())
    }
}
