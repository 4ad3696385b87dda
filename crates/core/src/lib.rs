//! Core business logic for Strata.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `maintenance` - Maintenance ledger: dues carry-forward, payment posting,
//!   corrections, and fund aggregation
//! - `auth` - Password hashing

pub mod auth;
pub mod maintenance;
