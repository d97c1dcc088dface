use actix_web::{HttpResponse, Responder, post, web};

use crate::dto::products::{FetchRequest, FetchResponse, ListRequest};
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::ServiceError;
use crate::services::fetch::{FeedFetcher, fetch_feed as fetch_feed_service};
use crate::services::products::list_products as list_products_service;

#[post("/v1/fetch")]
pub async fn fetch_feed(
    request: web::Json<FetchRequest>,
    repo: web::Data<DieselRepository>,
    fetcher: web::Data<FeedFetcher>,
) -> impl Responder {
    let url = request.into_inner().url;
    let repo = repo.into_inner();
    let fetcher = fetcher.into_inner();

    match web::block(move || fetch_feed_service(&url, repo.as_ref(), &fetcher)).await {
        Ok(Ok(_report)) => HttpResponse::Ok().json(FetchResponse { result: 0 }),
        Ok(Err(err)) => service_error_response(&err),
        Err(e) => {
            log::error!("Fetch worker failed: {e}");
            service_error_response(&ServiceError::Internal("fetch worker failed".to_string()))
        }
    }
}

#[post("/v1/list")]
pub async fn list_products(
    request: web::Json<ListRequest>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let request = request.into_inner();
    let repo = repo.into_inner();

    match web::block(move || list_products_service(&request, repo.as_ref())).await {
        Ok(Ok(response)) => HttpResponse::Ok().json(response),
        Ok(Err(err)) => service_error_response(&err),
        Err(e) => {
            log::error!("List worker failed: {e}");
            service_error_response(&ServiceError::Internal("list worker failed".to_string()))
        }
    }
}
