//! # RecipeBox Shared Library
//!
//! This crate contains the data layer and business logic used by the
//! RecipeBox API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: Database models and owner-scoped queries
//! - `recipes`: Recipe write path, nested-collection reconciler and read models
//! - `auth`: Authentication utilities (passwords, JWT, middleware)

pub mod auth;
pub mod db;
pub mod models;
pub mod recipes;

/// Current version of the RecipeBox shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
