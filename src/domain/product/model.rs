//! Product domain entity

use chrono::{DateTime, Utc};

use crate::domain::Identifiable;

/// Product listed in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Store-assigned id; `0` until the product has been saved
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Price in smallest currency unit (e.g., cents)
    pub price: i64,
    /// Currency code (ISO 4217)
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Format price as human-readable string
    pub fn format_price(&self) -> String {
        let sign = if self.price < 0 { "-" } else { "" };
        let cents = self.price.unsigned_abs();
        format!("{}{}.{:02} {}", sign, cents / 100, cents % 100, self.currency)
    }
}

impl Identifiable for Product {
    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

/// Input for a product that does not exist yet
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: String,
}

impl NewProduct {
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: 0,
            name: self.name,
            description: self.description,
            price: self.price,
            currency: self.currency,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub currency: Option<String>,
}

impl ProductChanges {
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(currency) = self.currency {
            product.currency = currency;
        }
        product.updated_at = now;
    }
}
