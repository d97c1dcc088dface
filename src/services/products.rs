use crate::domain::types::{PageLimit, ProductId};
use crate::dto::products::{
    Direction, Field, ListRequest, ListResponse, Paging, ProductDto, Sorting,
};
use crate::repository::{ListOptions, ProductReader, SortDirection, SortField};

use super::{ServiceError, ServiceResult};

/// Translate wire paging and sorting into store options.
///
/// Pure; absent fields fall back to the [`ListOptions`] defaults. An empty
/// cursor means "first page".
pub fn build_list_options(paging: &Paging, sorting: &Sorting) -> ServiceResult<ListOptions> {
    let sort = match sorting.field {
        Field::Default => SortField::Default,
        Field::Name => SortField::Name,
        Field::Price => SortField::Price,
        Field::Updated => SortField::UpdatedAt,
    };
    let direction = match sorting.direction {
        Direction::Desc => SortDirection::Desc,
        Direction::Asc => SortDirection::Asc,
    };

    let mut options = ListOptions::default().sort_by(sort, direction);

    if let Some(limit) = paging.limit {
        options = options.limit(PageLimit::new(limit)?);
    }

    match paging.cursor_id.as_deref() {
        None | Some("") => {}
        Some(cursor) => match cursor.parse::<ProductId>() {
            Ok(id) => options = options.after(id),
            Err(_) => {
                return Err(ServiceError::InvalidArgument(format!(
                    "invalid cursor id: {cursor}"
                )));
            }
        },
    }

    Ok(options)
}

/// Core business logic for the List operation.
///
/// Both the paging and the sorting block must be present. Repository errors
/// are logged and reported as internal failures.
pub fn list_products<R>(request: &ListRequest, repo: &R) -> ServiceResult<ListResponse>
where
    R: ProductReader + ?Sized,
{
    let (Some(paging), Some(sorting)) = (&request.paging, &request.sorting) else {
        return Err(ServiceError::InvalidArgument(
            "paging and sorting must be specified".to_string(),
        ));
    };

    let options = build_list_options(paging, sorting)?;

    let products = match repo.list_products(&options) {
        Ok(products) => products,
        Err(e) => {
            log::error!("Failed to list products: {e}");
            return Err(ServiceError::Internal(
                "could not retrieve products".to_string(),
            ));
        }
    };

    let last_id = products
        .last()
        .map(|p| p.id.to_string())
        .unwrap_or_default();

    Ok(ListResponse {
        last_id,
        products: products.into_iter().map(ProductDto::from).collect(),
    })
}
