use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ProductId, ProductName, ProductPrice};

/// A product together with its price history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    /// Current price.
    pub price: ProductPrice,
    /// Every price the product had before the current one, oldest first.
    pub changes: Vec<ProductPrice>,
    /// Time of the most recent price-affecting write.
    pub updated_at: NaiveDateTime,
}

/// Information required to create or reprice a [`Product`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
    pub name: ProductName,
    pub price: ProductPrice,
    pub updated_at: NaiveDateTime,
}

/// Result of saving a [`NewProduct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No product with this name existed; a new record was inserted.
    Created(ProductId),
    /// The price differed; the previous price was appended to the history.
    Updated(ProductId),
    /// The price was unchanged; nothing was written.
    Unchanged(ProductId),
}

impl SaveOutcome {
    pub fn product_id(self) -> ProductId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Unchanged(id) => id,
        }
    }
}
