/// Account endpoints: registration, login, logout
///
/// All three follow the same shape: GET renders a form, POST processes it.
/// A submission that fails validation re-renders the form at 200 with the
/// errors in place and the username echoed back; a successful submission
/// answers 303 to the post list (or a safe `next` target for login).
///
/// # Endpoints
///
/// - `GET|POST /accounts/register` - Create an account
/// - `GET|POST /accounts/login` - Establish a session
/// - `GET|POST /accounts/logout` - End the session (POST only; GET confirms)
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use inkpost_shared::{
    auth::{
        password,
        session::{clear_session_cookie, generate_session_token, session_cookie},
    },
    models::{
        session::{CreateSession, Session},
        user::{CreateUser, User},
    },
};
use serde::Deserialize;

use crate::{
    app::{AppState, CurrentSession},
    error::{is_unique_violation, AppError, AppResult},
    forms::{FormErrors, LoginForm, RegisterForm, INVALID_LOGIN_ERROR, USERNAME_TAKEN_ERROR},
    pages,
    routes::current_username,
};

/// Where successful account submissions land
const POST_LIST_URL: &str = "/posts";

/// Query parameters accepted by the login form
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Path to return to after logging in
    pub next: Option<String>,
}

/// `GET /accounts/register` - the empty registration form
pub async fn register_form(session: Option<Extension<CurrentSession>>) -> Html<String> {
    Html(pages::register_page(
        "",
        &FormErrors::new(),
        current_username(&session),
    ))
}

/// `POST /accounts/register` - create the account
///
/// On success redirects to the post list without logging the new user in;
/// they sign in through the login form like anyone else.
pub async fn register(
    State(state): State<AppState>,
    session: Option<Extension<CurrentSession>>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let mut errors = form.validate_fields();

    // Friendly availability check; the unique index still backstops races
    if errors.field("username").is_empty()
        && User::username_taken(&state.db, &form.username).await?
    {
        errors.add_field("username", USERNAME_TAKEN_ERROR);
    }

    if !errors.is_empty() {
        return Ok(Html(pages::register_page(
            &form.username,
            &errors,
            current_username(&session),
        ))
        .into_response());
    }

    let password_hash = password::hash_password(&form.password1)?;

    match User::create(
        &state.db,
        CreateUser {
            username: form.username.clone(),
            password_hash,
        },
    )
    .await
    {
        Ok(user) => {
            tracing::info!(username = %user.username, user_id = %user.id, "User registered");
            Ok(Redirect::to(POST_LIST_URL).into_response())
        }
        Err(e) if is_unique_violation(&e, "username") => {
            // Lost the race against a concurrent registration
            errors.add_field("username", USERNAME_TAKEN_ERROR);
            Ok(Html(pages::register_page(
                &form.username,
                &errors,
                current_username(&session),
            ))
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /accounts/login` - the empty login form
///
/// An optional `?next=` query parameter is threaded through the form as a
/// hidden input.
pub async fn login_form(
    session: Option<Extension<CurrentSession>>,
    Query(query): Query<LoginQuery>,
) -> Html<String> {
    Html(pages::login_page(
        "",
        query.next.as_deref(),
        &FormErrors::new(),
        current_username(&session),
    ))
}

/// `POST /accounts/login` - verify credentials and establish a session
///
/// An unknown username and a wrong password produce the same response.
/// Logging in rotates sessions: any previous session for the user is
/// dropped before the new token is issued.
pub async fn login(
    State(state): State<AppState>,
    session: Option<Extension<CurrentSession>>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let mut errors = form.validate_fields();

    if !errors.is_empty() {
        return Ok(Html(pages::login_page(
            &form.username,
            form.next.as_deref(),
            &errors,
            current_username(&session),
        ))
        .into_response());
    }

    let mut authenticated = None;
    if let Some(user) = User::find_by_username(&state.db, &form.username).await? {
        if password::verify_password(&form.password, &user.password_hash)? {
            authenticated = Some(user);
        }
    }

    let Some(user) = authenticated else {
        tracing::debug!(username = %form.username, "Failed login attempt");
        errors.add_non_field(INVALID_LOGIN_ERROR);
        return Ok(Html(pages::login_page(
            &form.username,
            form.next.as_deref(),
            &errors,
            current_username(&session),
        ))
        .into_response());
    };

    // Session rotation: a fresh login invalidates earlier tokens
    Session::delete_for_user(&state.db, user.id).await?;

    let (token, token_hash) = generate_session_token();
    Session::create(
        &state.db,
        CreateSession {
            token_hash,
            user_id: user.id,
            ttl_seconds: state.session_ttl(),
        },
    )
    .await?;

    User::update_last_login(&state.db, user.id).await?;
    tracing::info!(username = %user.username, user_id = %user.id, "User logged in");

    let cookie = session_cookie(&token, state.session_ttl(), state.production());
    redirect_with_cookie(safe_next(form.next.as_deref()), &cookie)
}

/// `GET /accounts/logout` - confirmation page
///
/// Logout mutates state, so the GET side only shows the button.
pub async fn logout_confirm(session: Option<Extension<CurrentSession>>) -> Html<String> {
    Html(pages::logout_page(current_username(&session)))
}

/// `POST /accounts/logout` - end the session
///
/// Deletes the session row and expires the cookie. Logging out while not
/// logged in isn't an error; it just redirects.
pub async fn logout(
    State(state): State<AppState>,
    session: Option<Extension<CurrentSession>>,
) -> AppResult<Response> {
    if let Some(Extension(current)) = session {
        Session::delete(&state.db, &current.token_hash).await?;
        tracing::info!(username = %current.user.username, "User logged out");
    }

    let cookie = clear_session_cookie(state.production());
    redirect_with_cookie(POST_LIST_URL, &cookie)
}

/// Builds a 303 redirect carrying a `Set-Cookie` header
fn redirect_with_cookie(target: &str, cookie: &str) -> AppResult<Response> {
    let mut response = Redirect::to(target).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(cookie)
            .map_err(|e| AppError::Internal(format!("Invalid cookie value: {}", e)))?,
    );
    Ok(response)
}

/// Clamps a `next` value to a safe local redirect target
///
/// Only same-origin absolute paths are honored; anything else (full URLs,
/// protocol-relative `//host` forms, backslash tricks) falls back to the
/// post list.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n,
        _ => POST_LIST_URL,
    }
}
