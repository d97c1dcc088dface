use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{ProductId, ProductName, ProductPrice, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub price: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Product))]
#[diesel(table_name = crate::schema::product_price_changes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductPriceChange {
    pub id: i32,
    pub product_id: i32,
    pub price: f64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_price_changes)]
pub struct NewProductPriceChange {
    pub product_id: i32,
    pub price: f64,
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(product: &'a DomainNewProduct) -> Self {
        Self {
            name: product.name.as_str(),
            price: product.price.get(),
            updated_at: product.updated_at,
        }
    }
}

impl Product {
    /// Combine a stored row with its price history, oldest change first.
    pub fn into_domain(
        self,
        changes: Vec<ProductPriceChange>,
    ) -> Result<DomainProduct, TypeConstraintError> {
        let changes = changes
            .into_iter()
            .map(|change| ProductPrice::new(change.price))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DomainProduct {
            id: ProductId::new(self.id)?,
            name: ProductName::new(self.name)?,
            price: ProductPrice::new(self.price)?,
            changes,
            updated_at: self.updated_at,
        })
    }
}
