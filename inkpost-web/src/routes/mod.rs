/// Route handlers, organized by resource
///
/// - `accounts`: registration, login, logout
/// - `posts`: the post list
/// - `health`: health check endpoint
use axum::Extension;

use crate::app::CurrentSession;

pub mod accounts;
pub mod health;
pub mod posts;

/// The signed-in username for nav rendering, if any
pub(crate) fn current_username(session: &Option<Extension<CurrentSession>>) -> Option<&str> {
    session
        .as_ref()
        .map(|Extension(current)| current.user.username.as_str())
}
