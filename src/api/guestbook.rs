//! Guestbook page and signing endpoints.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Form,
};

use super::{ApiResponse, ApiResult};
use crate::auth::PreVerifiedIdentity;
use crate::errors::AppError;
use crate::models::{GuestbookQuery, GuestbookView, SignForm};
use crate::telemetry::traced;
use crate::AppState;

/// GET / - Recent greetings of a guestbook plus the caller's session link.
pub async fn get_guestbook(
    State(state): State<AppState>,
    identity: PreVerifiedIdentity,
    Query(query): Query<GuestbookQuery>,
) -> ApiResult<GuestbookView> {
    let guestbook_name = query.name_or(&state.config.default_guestbook);

    let greetings = traced(
        "list_recent_greetings",
        state
            .store
            .list_recent_greetings(guestbook_name, state.config.recent_limit),
    )
    .await?;

    let (url, url_linktext) = identity.session_link();

    Ok(ApiResponse::new(GuestbookView {
        user: identity.email().map(str::to_string),
        greetings,
        guestbook_name: guestbook_name.to_string(),
        url: url.to_string(),
        url_linktext: url_linktext.to_string(),
    }))
}

/// POST /sign - Store a greeting, then send the caller back to the guestbook.
pub async fn sign_guestbook(
    State(state): State<AppState>,
    identity: PreVerifiedIdentity,
    Query(query): Query<GuestbookQuery>,
    Form(form): Form<SignForm>,
) -> Result<Redirect, AppError> {
    let guestbook_name = query.name_or(&state.config.default_guestbook);

    traced(
        "append_greeting",
        state
            .store
            .append_greeting(guestbook_name, identity.email(), form.content.as_deref()),
    )
    .await?;

    Ok(Redirect::to(&guestbook_url(guestbook_name)))
}

/// Page URL of a guestbook.
fn guestbook_url(guestbook_name: &str) -> String {
    format!("/?guestbook_name={}", urlencoding::encode(guestbook_name))
}
