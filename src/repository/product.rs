use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::product::{NewProduct, Product, SaveOutcome};
use crate::domain::types::{ProductId, ProductName};
use crate::models::product::{
    NewProduct as DbNewProduct, NewProductPriceChange, Product as DbProduct, ProductPriceChange,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, ListOptions, ProductReader, ProductWriter, SortDirection, SortField,
};
use crate::schema::{product_price_changes, products};

/// Attach price histories to a batch of rows, preserving row order.
fn with_changes(
    conn: &mut SqliteConnection,
    rows: Vec<DbProduct>,
) -> RepositoryResult<Vec<Product>> {
    let changes = ProductPriceChange::belonging_to(&rows)
        .order(product_price_changes::id.asc())
        .load::<ProductPriceChange>(conn)?
        .grouped_by(&rows);

    let items = rows
        .into_iter()
        .zip(changes)
        .map(|(row, changes)| row.into_domain(changes))
        .collect::<Result<Vec<Product>, _>>()?;

    Ok(items)
}

fn find_row_by_name(
    conn: &mut SqliteConnection,
    name: &ProductName,
) -> RepositoryResult<Option<DbProduct>> {
    let row = products::table
        .filter(products::name.eq(name.as_str()))
        .first::<DbProduct>(conn)
        .optional()?;
    Ok(row)
}

impl ProductReader for DieselRepository {
    fn find_by_name(&self, name: &ProductName) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;

        let Some(row) = find_row_by_name(&mut conn, name)? else {
            return Ok(None);
        };

        Ok(with_changes(&mut conn, vec![row])?.pop())
    }

    fn list_products(&self, options: &ListOptions) -> RepositoryResult<Vec<Product>> {
        let mut conn = self.conn()?;

        let mut items = products::table.into_boxed::<Sqlite>();

        // The cursor always seeks on id, whatever the requested ordering.
        if let Some(cursor) = options.cursor {
            items = items.filter(products::id.gt(cursor.get()));
        }

        items = match (options.sort, options.direction) {
            (SortField::Default, _) => items.order(products::id.asc()),
            (SortField::Name, SortDirection::Asc) => {
                items.order((products::name.asc(), products::id.asc()))
            }
            (SortField::Name, SortDirection::Desc) => {
                items.order((products::name.desc(), products::id.asc()))
            }
            (SortField::Price, SortDirection::Asc) => {
                items.order((products::price.asc(), products::id.asc()))
            }
            (SortField::Price, SortDirection::Desc) => {
                items.order((products::price.desc(), products::id.asc()))
            }
            (SortField::UpdatedAt, SortDirection::Asc) => {
                items.order((products::updated_at.asc(), products::id.asc()))
            }
            (SortField::UpdatedAt, SortDirection::Desc) => {
                items.order((products::updated_at.desc(), products::id.asc()))
            }
        };

        let rows = items
            .limit(options.limit.get())
            .load::<DbProduct>(&mut conn)?;

        with_changes(&mut conn, rows)
    }
}

impl ProductWriter for DieselRepository {
    fn save_product(&self, product: &NewProduct) -> RepositoryResult<SaveOutcome> {
        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock before the lookup, so concurrent saves
        // of the same name cannot both observe the old price.
        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            match find_row_by_name(conn, &product.name)? {
                None => {
                    let id = diesel::insert_into(products::table)
                        .values(DbNewProduct::from(product))
                        .returning(products::id)
                        .get_result::<i32>(conn)?;
                    Ok(SaveOutcome::Created(ProductId::new(id)?))
                }
                Some(existing) if existing.price == product.price.get() => {
                    Ok(SaveOutcome::Unchanged(ProductId::new(existing.id)?))
                }
                Some(existing) => {
                    diesel::insert_into(product_price_changes::table)
                        .values(NewProductPriceChange {
                            product_id: existing.id,
                            price: existing.price,
                        })
                        .execute(conn)?;

                    diesel::update(products::table.find(existing.id))
                        .set((
                            products::price.eq(product.price.get()),
                            products::updated_at.eq(product.updated_at),
                        ))
                        .execute(conn)?;

                    Ok(SaveOutcome::Updated(ProductId::new(existing.id)?))
                }
            }
        })
    }
}
