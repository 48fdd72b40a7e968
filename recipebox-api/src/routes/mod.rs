/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `users`: The authenticated user's profile
/// - `recipes`: Recipe CRUD with nested tags and ingredients
/// - `tags`, `ingredients`: Listing, renaming and deleting named entities

pub mod auth;
pub mod health;
pub mod ingredients;
mod named;
pub mod recipes;
pub mod tags;
pub mod users;
