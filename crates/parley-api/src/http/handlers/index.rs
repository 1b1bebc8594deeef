//! Index page handler.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Response};

use parley_types::chat::UserId;

use crate::http::extractors::session::MaybeSession;
use crate::state::AppState;

/// The single-page chat UI.
const INDEX_HTML: &str = include_str!("../../../web/index.html");

/// GET / - Render the chat page, issuing a session cookie if there is none.
pub async fn index(State(state): State<AppState>, MaybeSession(session): MaybeSession) -> Response {
    if session.is_some() {
        return Html(INDEX_HTML).into_response();
    }

    let user_id = UserId::generate();
    tracing::info!(user_id = %user_id, "New session issued");
    (
        [(SET_COOKIE, state.sessions.set_cookie(&user_id))],
        Html(INDEX_HTML),
    )
        .into_response()
}
