//! # Inkpost Shared Library
//!
//! This crate contains the types and business logic shared by the Inkpost
//! web server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, password validation, and session tokens
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Inkpost shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
