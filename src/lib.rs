//! Core library exports for the price feed service.
//!
//! The `data` feature exposes the persistence and domain layer (`domain`,
//! `models`, `schema`, `db`, `repository`). The `server` feature adds the
//! feed ingestion and fetch services, wire DTOs and Actix routes.

pub mod db;
pub mod domain;
pub mod models;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
