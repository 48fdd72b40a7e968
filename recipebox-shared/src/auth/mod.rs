/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and policy checks
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer-token authentication and the requester identity
///
/// # Example
///
/// ```no_run
/// use recipebox_shared::auth::jwt::issue_token_pair;
/// use recipebox_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("testpass123")?;
/// assert!(verify_password("testpass123", &hash)?);
///
/// let tokens = issue_token_pair(Uuid::new_v4(), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
