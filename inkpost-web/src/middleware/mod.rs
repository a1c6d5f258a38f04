/// HTTP middleware
///
/// - `security`: security-related response headers
///
/// Session loading lives in `app` since it needs the shared state.
pub mod security;
