pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod schema;
pub mod table;

#[cfg(test)]
pub mod testing;
