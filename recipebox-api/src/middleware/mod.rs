/// Middleware for the API server
///
/// Authentication lives in `recipebox_shared::auth::middleware`; this module
/// holds HTTP-only concerns.

pub mod security;
