//! Demo catalog loaded when `store.seed_demo_data` is set.

use chrono::{Duration, NaiveDateTime, Utc};

use storefront_core::error::{Result, StorefrontError};
use storefront_core::model::{NewCustomer, NewOrder, NewOrderItem, NewProduct, OrderStatus};

use super::StorefrontStore;

const PRODUCTS: [(&str, &str, u64, u32); 6] = [
    ("Desk Lamp", "home", 3_499, 12),
    ("LED Bulb 4-pack", "home", 1_299, 140),
    ("Cordless Drill", "tools", 8_999, 3),
    ("Socket Set", "tools", 4_550, 0),
    ("Trail Backpack", "outdoor", 6_400, 25),
    ("Water Bottle", "outdoor", 1_500, 1),
];

const CUSTOMERS: [(&str, &str, &str, &str); 3] = [
    ("Ada", "Lovelace", "ada@example.com", "12 St James's Square, London"),
    ("Grace", "Hopper", "grace@example.com", "1 Navy Yard, Arlington"),
    ("Alan", "Hopper", "alan@example.com", "9 Bletchley Road, Milton Keynes"),
];

/// Insert the demo rows. Order dates are relative to `now` so the
/// needs-attention queries return something on a fresh start.
pub async fn load_demo_data(store: &dyn StorefrontStore) -> Result<()> {
    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (name, category, price, stock) in PRODUCTS {
        let p = store
            .insert_product(NewProduct {
                name: name.into(),
                category: category.into(),
                price,
                stock,
            })
            .await?;
        product_ids.push(p.id);
    }

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (first, last, email, address) in CUSTOMERS {
        let c = store
            .insert_customer(NewCustomer {
                first_name: first.into(),
                last_name: last.into(),
                email: email.into(),
                phone: None,
                address: address.into(),
            })
            .await?;
        customer_ids.push(c.id);
    }

    let now: NaiveDateTime = Utc::now().naive_utc();
    let orders = [
        (0, now - Duration::days(3), OrderStatus::Pending, vec![(0, 1), (1, 2)]),
        (0, now - Duration::days(10), OrderStatus::Delivered, vec![(2, 1)]),
        (1, now - Duration::hours(30), OrderStatus::Processing, vec![(4, 1), (5, 2)]),
        (2, now - Duration::hours(2), OrderStatus::Pending, vec![(1, 6)]),
        (2, now - Duration::days(1), OrderStatus::Shipped, vec![(4, 1)]),
    ];

    for (customer, order_date, status, lines) in orders {
        let items = lines
            .into_iter()
            .map(|(product, quantity)| {
                Ok(NewOrderItem {
                    product_id: seeded_id(&product_ids, product)?,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        store
            .insert_order(NewOrder {
                customer_id: seeded_id(&customer_ids, customer)?,
                order_date,
                status,
                items,
            })
            .await?;
    }

    tracing::info!(
        products = product_ids.len(),
        customers = customer_ids.len(),
        "demo data loaded"
    );
    Ok(())
}

fn seeded_id(ids: &[u64], idx: usize) -> Result<u64> {
    ids.get(idx)
        .copied()
        .ok_or_else(|| StorefrontError::Internal(format!("demo data references missing row {idx}")))
}
