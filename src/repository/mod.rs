use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product, SaveOutcome};
use crate::domain::types::{PageLimit, ProductId, ProductName};

pub mod errors;
pub mod product;

use errors::RepositoryResult;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Field used to order listed products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Store's natural order, which is ascending id.
    #[default]
    Default,
    Name,
    Price,
    UpdatedAt,
}

/// Direction applied to a non-default [`SortField`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

/// Options for [`ProductReader::list_products`].
///
/// `Default` yields natural order, no cursor and [`PageLimit::DEFAULT`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub sort: SortField,
    pub direction: SortDirection,
    /// Only products with an id strictly greater than this are returned.
    pub cursor: Option<ProductId>,
    pub limit: PageLimit,
}

impl ListOptions {
    pub fn sort_by(mut self, sort: SortField, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }
    pub fn after(mut self, cursor: ProductId) -> Self {
        self.cursor = Some(cursor);
        self
    }
    pub fn limit(mut self, limit: PageLimit) -> Self {
        self.limit = limit;
        self
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// Point lookup by the unique product name.
    fn find_by_name(&self, name: &ProductName) -> RepositoryResult<Option<Product>>;
    /// List at most `options.limit` products after the optional cursor.
    fn list_products(&self, options: &ListOptions) -> RepositoryResult<Vec<Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Insert a product or reprice an existing one, appending the superseded
    /// price to its history. Saving an unchanged price writes nothing.
    fn save_product(&self, product: &NewProduct) -> RepositoryResult<SaveOutcome>;
}
