//! Darccuir Core - shared types for the Darccuir / Yatay store.
//!
//! Used by:
//! - `storefront` - public catalog, cart and customer accounts
//! - `admin` - back-office (products, subrubros, price imports, users)
//! - `cli` - migrations and admin seeding
//!
//! The crate holds types and pure functions only: no I/O, no database access.
//! Enable the `postgres` feature for `sqlx` encode/decode support.
//!
//! # Modules
//!
//! - [`types`] - type-safe ids, emails, rubros and roles
//! - [`paging`] - page/limit parsing and pagination blocks
//! - [`text`] - search normalization, snippets and slugs
//! - [`tree`] - the subrubro tree and its recursive loader

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod paging;
pub mod text;
pub mod tree;
pub mod types;

pub use types::*;
