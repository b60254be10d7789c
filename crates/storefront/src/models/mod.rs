//! Domain models for the storefront.
//!
//! Row types stay private to `db`; these are the validated shapes handlers
//! and services work with.

pub mod cart;
pub mod catalog;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartItemView, CartOwner, CartProduct, CartView};
pub use catalog::{CatalogFilter, SearchText, SimilarTier, SimilaritySeed};
pub use product::{Product, ProductSummary, SimilarProduct};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
