//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `cart` - Cart ownership and line operations
//! - `catalog` - Catalog search and pagination
//! - `similar` - Tiered similar-product lookup

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod similar;
