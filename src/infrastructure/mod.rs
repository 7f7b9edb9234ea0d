//! Infrastructure: wire protocols, providers, and services

pub mod embedding;
pub mod http_client;
pub mod logging;
pub mod services;
pub mod vector_store;
