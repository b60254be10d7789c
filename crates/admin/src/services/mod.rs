//! Business logic services for the back-office.

pub mod auth;
pub mod import;
pub mod products;
pub mod subrubros;
