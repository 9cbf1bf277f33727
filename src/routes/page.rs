use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::html::ThreadPage;
use crate::model::{CommentId, ReplyId};
use crate::renderer::ThreadRenderer;
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => AppError::Template(e).into_response(),
        }
    }
}

/// Transient row state carried in the query string, since a plain page
/// load has nowhere else to keep it.
#[derive(Deserialize, Debug, Default)]
pub struct RowState {
    pub reply: Option<String>,
    pub edit_comment: Option<String>,
    pub edit_reply: Option<String>,
}

pub async fn thread_page(
    State(state): State<AppState>,
    uri: Uri,
    Query(rows): Query<RowState>,
) -> AppResult<Response> {
    let page = uri.path();
    let mut renderer = load(&state, page).await?;

    if let Some(id) = rows.reply {
        renderer.toggle_reply_input(&CommentId::new(id));
    }
    if let Some(id) = rows.edit_comment {
        renderer.show_edit_comment(&CommentId::new(id));
    }
    if let Some(id) = rows.edit_reply {
        renderer.show_edit_reply(&ReplyId::new(id));
    }

    Ok(render_page(&renderer, page))
}

/// Builds a renderer for `page` and runs the initial load.
pub async fn load(state: &AppState, page: &str) -> AppResult<ThreadRenderer> {
    if !page.starts_with('/') {
        return Err(AppError::BadRequest(format!(
            "Page path must be absolute, got '{page}'"
        )));
    }
    Ok(ThreadRenderer::initialize(state.api.clone(), page, state.render.clone()).await)
}

pub fn render_page(renderer: &ThreadRenderer, page: &str) -> Response {
    let view = renderer.view();
    Html(ThreadPage { view: &view, page }).into_response()
}
