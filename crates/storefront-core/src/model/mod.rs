//! Storefront rows shared by the store and the HTTP layer.
//!
//! Money is carried in minor units (cents) as integers.

pub mod customer;
pub mod order;
pub mod page;
pub mod product;
pub mod report;

pub use customer::{Customer, NewCustomer};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
pub use page::{Page, PageRequest};
pub use product::{NewProduct, Product, ProductDto};
pub use report::{ProductRevenue, ProductSales};
