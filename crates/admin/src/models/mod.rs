//! Domain models for the back-office.

pub mod product;
pub mod session;
pub mod subrubro;
pub mod user;

pub use product::{PricedProduct, Product, ProductDraft, ProductListing};
pub use session::{CurrentAdmin, keys as session_keys};
pub use subrubro::{NewSubrubro, SubrubroListItem};
pub use user::{NewUser, User};
