//! Product ↔ `products` table mapping

use sea_orm::ActiveValue::{NotSet, Set};

use super::sea_orm_repository::{EntityMapping, SeaOrmRepository};
use crate::domain::Product;
use crate::infrastructure::database::entities::product;

/// Product repository backed by SeaORM
pub type SeaOrmProductRepository = SeaOrmRepository<Product>;

impl EntityMapping for Product {
    type Entity = product::Entity;

    const NAME: &'static str = "Product";

    fn from_model(m: product::Model) -> Self {
        Product {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            currency: m.currency,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn to_insert_model(&self) -> product::ActiveModel {
        product::ActiveModel {
            id: NotSet,
            ..self.to_update_model()
        }
    }

    fn to_update_model(&self) -> product::ActiveModel {
        product::ActiveModel {
            id: Set(self.id),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            price: Set(self.price),
            currency: Set(self.currency.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}
