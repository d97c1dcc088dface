use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Body of the Fetch call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub url: String,
}

/// `result` is always `0`; failures are reported as errors instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub result: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Id of the last product of the previous page.
    #[serde(default)]
    pub cursor_id: Option<String>,
    /// Page size; `0` or absent selects the default.
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    #[default]
    Default,
    Name,
    Price,
    Updated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    #[default]
    Desc,
    Asc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sorting {
    #[serde(default)]
    pub field: Field,
    #[serde(default)]
    pub direction: Direction,
}

/// Body of the List call. Both blocks are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub paging: Option<Paging>,
    #[serde(default)]
    pub sorting: Option<Sorting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub name: String,
    pub price: f64,
    pub num_of_changes: i64,
    pub last_update: String,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            num_of_changes: value.changes.len() as i64,
            last_update: value.updated_at.and_utc().to_rfc3339(),
            price: value.price.get(),
            name: value.name.into_inner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    /// Cursor for the next page; empty when this page is empty.
    pub last_id: String,
    pub products: Vec<ProductDto>,
}

/// Error body returned by every failing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
