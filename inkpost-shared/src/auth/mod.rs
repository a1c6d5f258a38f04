/// Authentication primitives for Inkpost
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and account password validation
/// - [`session`]: Opaque session tokens and the session cookie
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: Secure random generation with SHA-256 hashing at rest
/// - **Constant-time Comparison**: Password verification never short-circuits
///
/// # Example
///
/// ```no_run
/// use inkpost_shared::auth::password::{hash_password, verify_password};
/// use inkpost_shared::auth::session::generate_session_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let (token, token_hash) = generate_session_token();
/// assert_eq!(token.len(), 32);
/// assert_eq!(token_hash.len(), 64);
/// # Ok(())
/// # }
/// ```
pub mod password;
pub mod session;
