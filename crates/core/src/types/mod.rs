//! Domain types shared by the storefront, admin and CLI.

pub mod email;
pub mod id;
pub mod role;
pub mod rubro;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::{PriceType, UserRole};
pub use rubro::{InvalidRubro, Rubro};
