// Form posts from the rendered widget. Each action replays what a user would
// do on the page (open the box, type, submit) so a rejected call leaves the
// page exactly as it was, drafts included.
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::post;
use axum::{Form, Router};
use serde::Deserialize;

use crate::error::AppResult;
use crate::model::{CommentId, ReplyId};
use crate::renderer::{EditTarget, Outcome, ReplyBoxToggle};
use crate::routes::page::{load, render_page};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ContentForm {
    pub page: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ReplyForm {
    pub page: String,
    pub comment_id: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct PageForm {
    pub page: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/actions/comments", post(create_comment))
        .route("/actions/comments/{id}/update", post(update_comment))
        .route("/actions/comments/{id}/delete", post(delete_comment))
        .route("/actions/replies", post(create_reply))
        .route("/actions/replies/{id}/update", post(update_reply))
        .route("/actions/replies/{id}/delete", post(delete_reply))
}

async fn create_comment(
    State(state): State<AppState>,
    Form(form): Form<ContentForm>,
) -> AppResult<Response> {
    let mut renderer = load(&state, &form.page).await?;
    renderer.set_composer_draft(form.content);
    report(renderer.submit_composer().await, "create comment");
    Ok(render_page(&renderer, &form.page))
}

async fn create_reply(
    State(state): State<AppState>,
    Form(form): Form<ReplyForm>,
) -> AppResult<Response> {
    let mut renderer = load(&state, &form.page).await?;
    let comment_id = CommentId::new(form.comment_id);

    let outcome = match renderer.toggle_reply_input(&comment_id) {
        ReplyBoxToggle::Opened => {
            renderer.set_reply_draft(&comment_id, form.content);
            renderer.submit_reply(&comment_id).await
        }
        // The comment is no longer listed; let the backend decide.
        ReplyBoxToggle::Closed | ReplyBoxToggle::Missing => {
            renderer.create_reply(&comment_id, &form.content).await
        }
    };
    report(outcome, "create reply");
    Ok(render_page(&renderer, &form.page))
}

async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ContentForm>,
) -> AppResult<Response> {
    let mut renderer = load(&state, &form.page).await?;
    let comment_id = CommentId::new(id);

    let outcome = if renderer.show_edit_comment(&comment_id) {
        let target = EditTarget::Comment(comment_id);
        renderer.set_edit_draft(&target, form.content);
        renderer.save_edit(&target).await
    } else {
        renderer.update_comment(&comment_id, &form.content).await
    };
    report(outcome, "update comment");
    Ok(render_page(&renderer, &form.page))
}

async fn update_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ContentForm>,
) -> AppResult<Response> {
    let mut renderer = load(&state, &form.page).await?;
    let reply_id = ReplyId::new(id);

    let outcome = if renderer.show_edit_reply(&reply_id) {
        let target = EditTarget::Reply(reply_id);
        renderer.set_edit_draft(&target, form.content);
        renderer.save_edit(&target).await
    } else {
        renderer.update_reply(&reply_id, &form.content).await
    };
    report(outcome, "update reply");
    Ok(render_page(&renderer, &form.page))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PageForm>,
) -> AppResult<Response> {
    let mut renderer = load(&state, &form.page).await?;
    let outcome = renderer.delete_comment(&CommentId::new(id)).await;
    report(outcome, "delete comment");
    Ok(render_page(&renderer, &form.page))
}

async fn delete_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PageForm>,
) -> AppResult<Response> {
    let mut renderer = load(&state, &form.page).await?;
    let outcome = renderer.delete_reply(&ReplyId::new(id)).await;
    report(outcome, "delete reply");
    Ok(render_page(&renderer, &form.page))
}

fn report(outcome: Outcome, action: &str) {
    if outcome == Outcome::Abandoned {
        tracing::debug!("{} left the page unchanged", action);
    }
}
