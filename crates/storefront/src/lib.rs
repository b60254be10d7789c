//! Darccuir storefront library.
//!
//! Public JSON API for the Darccuir and Yatay product lines: catalog search,
//! product detail, similar products, category tree, cart and customer
//! accounts. Exposed as a library so the binary stays thin and the pieces
//! can be tested in isolation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
