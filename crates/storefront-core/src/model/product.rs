use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub category: String,
    /// Unit price in cents.
    pub price: u64,
    pub stock: u32,
}

impl Product {
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: u64,
    pub stock: u32,
}

/// Public view of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: u64,
    pub stock: u32,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            category: p.category.clone(),
            price: p.price,
            stock: p.stock,
        }
    }
}
