//! Storage-agnostic entities and value types.

pub mod product;
pub mod types;
