pub mod errors;
pub mod fetch;
pub mod ingest;
pub mod products;

pub use errors::{ServiceError, ServiceResult};
