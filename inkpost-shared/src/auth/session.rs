/// Session token utilities
///
/// Logged-in browsers hold an opaque session token in a cookie; the server
/// stores only the SHA-256 hash of that token next to the user it belongs
/// to. Stealing the sessions table therefore yields nothing replayable.
///
/// # Token Format
///
/// 32 random alphanumeric characters (base62: [A-Za-z0-9]), giving a key
/// space of 62^32 (about 2^190) combinations.
///
/// # Cookie
///
/// The cookie is named `sessionid` and is always `HttpOnly`, `SameSite=Lax`
/// and `Path=/`. The `Secure` attribute is added in production. Lifetime
/// defaults to two weeks and is configured by the server.
///
/// # Example
///
/// ```
/// use inkpost_shared::auth::session::{generate_session_token, hash_session_token};
///
/// let (token, hash) = generate_session_token();
/// assert_eq!(token.len(), 32);
/// assert_eq!(hash.len(), 64); // SHA-256 hex
///
/// // Deterministic: the stored hash can be recomputed from the cookie value
/// assert_eq!(hash, hash_session_token(&token));
/// ```
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a session token, in characters
pub const SESSION_TOKEN_LENGTH: usize = 32;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "sessionid";

/// Default session lifetime: two weeks, in seconds
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 1_209_600;

/// Generates a new session token
///
/// Returns the plaintext token (for the cookie) together with its SHA-256
/// hash (for the database).
///
/// # Example
///
/// ```
/// use inkpost_shared::auth::session::generate_session_token;
///
/// let (token, hash) = generate_session_token();
/// assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
/// assert_eq!(hash.len(), 64);
/// ```
pub fn generate_session_token() -> (String, String) {
    let token = generate_random_string(SESSION_TOKEN_LENGTH);
    let hash = hash_session_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string
///
/// Uses base62 encoding (A-Z, a-z, 0-9) so tokens are cookie-safe.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a session token using SHA-256
///
/// # Returns
///
/// Hex-encoded SHA-256 hash (64 characters)
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates session token format
///
/// Checks length and that every character is alphanumeric. A cookie that
/// fails this check never reaches the database.
pub fn validate_session_token_format(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Builds the `Set-Cookie` value that establishes a session
///
/// # Arguments
///
/// * `token` - Plaintext session token
/// * `max_age_seconds` - Session lifetime
/// * `secure` - Whether to add the `Secure` attribute (production)
pub fn session_cookie(token: &str, max_age_seconds: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE_NAME, token, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE_NAME
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extracts the session token from a `Cookie` request header value
///
/// Returns `None` when the header carries no `sessionid` pair or the value
/// has an invalid format.
///
/// # Example
///
/// ```
/// use inkpost_shared::auth::session::extract_session_token;
///
/// let header = "theme=dark; sessionid=AbCdEfGhIjKlMnOpQrStUvWxYz012345";
/// assert_eq!(
///     extract_session_token(header),
///     Some("AbCdEfGhIjKlMnOpQrStUvWxYz012345")
/// );
/// assert_eq!(extract_session_token("theme=dark"), None);
/// ```
pub fn extract_session_token(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value)
        .filter(|value| validate_session_token_format(value))
}
