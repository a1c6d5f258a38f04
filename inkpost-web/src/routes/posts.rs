/// The post list
///
/// `GET /posts` (also mounted at `/`) renders the most recent posts. This
/// page is where the account flows redirect after a successful submit.
use axum::{extract::State, response::Html, Extension};
use inkpost_shared::models::post::Post;

use crate::{
    app::{AppState, CurrentSession},
    error::AppResult,
    pages,
    routes::current_username,
};

/// How many posts the list shows
const POST_LIST_LIMIT: i64 = 50;

/// `GET /posts` - recent posts, newest first
pub async fn post_list(
    State(state): State<AppState>,
    session: Option<Extension<CurrentSession>>,
) -> AppResult<Html<String>> {
    let posts = Post::list_recent(&state.db, POST_LIST_LIMIT).await?;

    Ok(Html(pages::post_list_page(
        &posts,
        current_username(&session),
    )))
}
