use actix_web::http::StatusCode;
use actix_web::{HttpResponse, error, web};

use crate::dto::products::ErrorResponse;
use crate::services::ServiceError;

pub mod api;

/// Register the remote procedure endpoints and JSON error handling.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("Rejected request body: {message}");
        let response = service_error_response(&ServiceError::InvalidArgument(message));
        error::InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .service(api::fetch_feed)
        .service(api::list_products);
}

pub fn service_error_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ServiceError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        ServiceError::Format(_) | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn service_error_response(err: &ServiceError) -> HttpResponse {
    HttpResponse::build(service_error_status(err)).json(ErrorResponse {
        error: err.to_string(),
    })
}
