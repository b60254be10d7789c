//! Darccuir admin library.
//!
//! Back-office JSON API: product CRUD, subrubro management, bulk price
//! import from spreadsheets and user management. Every `/api` route requires
//! a session whose account has the `admin` role.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
