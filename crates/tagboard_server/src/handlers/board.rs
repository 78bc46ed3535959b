//! Board HTTP handlers.

use crate::{
    error::HttpError,
    models::message::CreateMessageRequest,
    session::SessionId,
    tagger::{normalize_tag_query, tag_message},
    views::{self, PageKind},
    AppError, AppState, PAGE_SIZE,
};
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Extension, Form,
};

/// Home feed: the newest messages first.
///
/// # Errors
/// Returns an error page when the store cannot be read.
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, HttpError> {
    let messages = state.db.messages.list_recent(PAGE_SIZE)?;
    Ok(Html(views::board_page(PageKind::Home, &messages)))
}

/// Messages carrying one tag.
///
/// # Errors
/// Returns 400 for tags containing the key separator and an error page when
/// the store cannot be read.
pub async fn tag_page(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Html<String>, HttpError> {
    let tag = normalize_tag_query(&tag);
    let messages = state.db.messages.list_by_tag(&tag, PAGE_SIZE)?;
    Ok(Html(views::board_page(PageKind::Tag(&tag), &messages)))
}

/// A single message by id. A missing id renders an empty list.
///
/// # Errors
/// Returns 400 for ids containing the key separator and an error page when
/// the store cannot be read.
pub async fn message_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, HttpError> {
    let messages: Vec<_> = state.db.messages.get(&id)?.into_iter().collect();
    Ok(Html(views::board_page(PageKind::Single(&id), &messages)))
}

/// Store a posted message and redirect home.
///
/// Empty messages are a no-op; rejected media is dropped.
///
/// # Errors
/// Returns 400 for oversized messages and an error page when the write fails.
pub async fn create_message(
    State(state): State<AppState>,
    session: Option<Extension<SessionId>>,
    Form(req): Form<CreateMessageRequest>,
) -> Result<Redirect, HttpError> {
    if req.message.len() > state.config.max_message_size {
        return Err(AppError::BadRequest(format!(
            "Message exceeds maximum of {} bytes",
            state.config.max_message_size
        ))
        .into());
    }

    let tagged = match tag_message(&req.message, req.media.as_deref()) {
        Ok(tagged) => tagged,
        Err(AppError::EmptyMessage) => {
            tracing::info!("Nothing saved: empty message");
            return Ok(Redirect::to("/"));
        }
        Err(err) => return Err(err.into()),
    };

    let message = state.db.messages.create(tagged)?;
    match session {
        Some(Extension(SessionId(session_id))) => {
            tracing::info!("Saved message {} (session {})", message.id, session_id)
        }
        None => tracing::info!("Saved message {}", message.id),
    }

    Ok(Redirect::to("/"))
}
