// Thread renderer - owns the last snapshot and the transient UI state for one
// page, and turns user actions into backend calls followed by a full refresh.
use std::sync::Arc;

use futures::future::join_all;

use crate::api::{ApiError, ThreadApi};
use crate::context::ThreadContext;
use crate::model::{CommentId, Reply, ReplyId};
use crate::view::{self, RenderOptions, Snapshot, ThreadEntry, ThreadView, UiState};

/// What a mutating action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted the change and the list was fetched again
    Refreshed,
    /// The call failed; the failure was logged and nothing else changed
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyBoxToggle {
    Opened,
    Closed,
    /// No rendered comment carries that id
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Comment(CommentId),
    Reply(ReplyId),
}

pub struct ThreadRenderer {
    api: Arc<dyn ThreadApi>,
    context: ThreadContext,
    options: RenderOptions,
    snapshot: Snapshot,
    ui: UiState,
}

impl ThreadRenderer {
    pub fn new(api: Arc<dyn ThreadApi>, context: ThreadContext, options: RenderOptions) -> Self {
        Self {
            api,
            context,
            options,
            snapshot: Snapshot::default(),
            ui: UiState::default(),
        }
    }

    /// Page-ready entry point: derive the post from the page path and load it.
    pub async fn initialize(
        api: Arc<dyn ThreadApi>,
        page_path: &str,
        options: RenderOptions,
    ) -> Self {
        let context = ThreadContext::from_page_path(page_path);
        tracing::debug!("Initializing thread for post '{}'", context.post_id);
        let mut renderer = Self::new(api, context, options);
        renderer.list_comments().await;
        renderer
    }

    pub fn context(&self) -> &ThreadContext {
        &self.context
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn view(&self) -> ThreadView {
        view::render(&self.context.post_id, &self.snapshot, &self.ui, &self.options)
    }

    // --- Queries ---

    /// Fetches the comment list and rebuilds every row from it.
    ///
    /// Rows are cleared even when the fetch fails, so a failed refresh shows
    /// an empty thread rather than stale content.
    pub async fn list_comments(&mut self) -> &[ThreadEntry] {
        self.ui.reset_rows();

        let comments = match self.api.list_comments(&self.context.post_id).await {
            Ok(comments) => comments,
            Err(e) => {
                tracing::error!("list comments failed: {}", e);
                self.snapshot = Snapshot::default();
                return &self.snapshot.entries;
            }
        };

        // Each comment fetches its own replies; none waits on a sibling.
        let replies = join_all(
            comments
                .iter()
                .map(|comment| self.list_replies(&comment.comment_id)),
        )
        .await;

        self.snapshot = Snapshot {
            entries: comments
                .into_iter()
                .zip(replies)
                .map(|(comment, replies)| ThreadEntry { comment, replies })
                .collect(),
        };
        &self.snapshot.entries
    }

    /// Replies for one comment; empty when the fetch fails.
    pub async fn list_replies(&self, comment_id: &CommentId) -> Vec<Reply> {
        match self.api.list_replies(comment_id).await {
            Ok(replies) => replies,
            Err(e) => {
                tracing::error!("list replies for comment {} failed: {}", comment_id, e);
                Vec::new()
            }
        }
    }

    // --- Local UI state ---

    pub fn toggle_reply_input(&mut self, comment_id: &CommentId) -> ReplyBoxToggle {
        if self.snapshot.entry(comment_id).is_none() {
            tracing::warn!("No rendered comment {} to reply to", comment_id);
            return ReplyBoxToggle::Missing;
        }

        if self.ui.reply_boxes.remove(comment_id).is_some() {
            if self.ui.scroll_target.as_ref() == Some(comment_id) {
                self.ui.scroll_target = None;
            }
            ReplyBoxToggle::Closed
        } else {
            self.ui.reply_boxes.insert(comment_id.clone(), String::new());
            self.ui.scroll_target = Some(comment_id.clone());
            ReplyBoxToggle::Opened
        }
    }

    pub fn set_composer_draft(&mut self, text: impl Into<String>) {
        self.ui.composer_draft = text.into();
    }

    /// Returns false when no reply box is open for the comment.
    pub fn set_reply_draft(&mut self, comment_id: &CommentId, text: impl Into<String>) -> bool {
        match self.ui.reply_boxes.get_mut(comment_id) {
            Some(draft) => {
                *draft = text.into();
                true
            }
            None => false,
        }
    }

    /// Switches a comment row to editing, pre-filled with its current content.
    pub fn show_edit_comment(&mut self, comment_id: &CommentId) -> bool {
        let Some(entry) = self.snapshot.entry(comment_id) else {
            tracing::warn!("No rendered comment {} to edit", comment_id);
            return false;
        };
        let content = entry.comment.content.clone();
        self.ui.comment_edits.insert(comment_id.clone(), content);
        true
    }

    pub fn show_edit_reply(&mut self, reply_id: &ReplyId) -> bool {
        let Some(reply) = self.snapshot.reply(reply_id) else {
            tracing::warn!("No rendered reply {} to edit", reply_id);
            return false;
        };
        let content = reply.content.clone();
        self.ui.reply_edits.insert(reply_id.clone(), content);
        true
    }

    /// Returns false when the target is not being edited.
    pub fn set_edit_draft(&mut self, target: &EditTarget, text: impl Into<String>) -> bool {
        let draft = match target {
            EditTarget::Comment(id) => self.ui.comment_edits.get_mut(id),
            EditTarget::Reply(id) => self.ui.reply_edits.get_mut(id),
        };
        match draft {
            Some(draft) => {
                *draft = text.into();
                true
            }
            None => false,
        }
    }

    // --- Mutations ---

    pub async fn create_comment(&mut self, content: &str) -> Outcome {
        match self.api.create_comment(&self.context.post_id, content).await {
            Ok(body) => {
                tracing::info!("Comment created, server replied: {}", body);
                self.ui.composer_draft.clear();
                self.refresh().await
            }
            Err(e) => abandon("create comment", e),
        }
    }

    /// Posts whatever is in the composer.
    pub async fn submit_composer(&mut self) -> Outcome {
        let content = self.ui.composer_draft.clone();
        self.create_comment(&content).await
    }

    /// Refreshes the whole comment list, not only the parent's replies.
    pub async fn create_reply(&mut self, comment_id: &CommentId, content: &str) -> Outcome {
        match self.api.create_reply(comment_id, content).await {
            Ok(()) => {
                tracing::info!("Reply to comment {} created", comment_id);
                self.refresh().await
            }
            Err(e) => abandon("create reply", e),
        }
    }

    /// Posts the draft from the comment's open reply box.
    pub async fn submit_reply(&mut self, comment_id: &CommentId) -> Outcome {
        let Some(content) = self.ui.reply_boxes.get(comment_id).cloned() else {
            tracing::warn!("No open reply box for comment {}", comment_id);
            return Outcome::Abandoned;
        };
        self.create_reply(comment_id, &content).await
    }

    pub async fn update_comment(&mut self, comment_id: &CommentId, content: &str) -> Outcome {
        match self.api.update_comment(comment_id, content).await {
            Ok(()) => {
                tracing::info!("Comment {} updated", comment_id);
                self.refresh().await
            }
            Err(e) => abandon("update comment", e),
        }
    }

    pub async fn update_reply(&mut self, reply_id: &ReplyId, content: &str) -> Outcome {
        match self.api.update_reply(reply_id, content).await {
            Ok(()) => {
                tracing::info!("Reply {} updated", reply_id);
                self.refresh().await
            }
            Err(e) => abandon("update reply", e),
        }
    }

    /// Saves the edit draft of a row in editing mode.
    pub async fn save_edit(&mut self, target: &EditTarget) -> Outcome {
        match target {
            EditTarget::Comment(id) => match self.ui.comment_edits.get(id).cloned() {
                Some(draft) => self.update_comment(id, &draft).await,
                None => not_editing(target),
            },
            EditTarget::Reply(id) => match self.ui.reply_edits.get(id).cloned() {
                Some(draft) => self.update_reply(id, &draft).await,
                None => not_editing(target),
            },
        }
    }

    pub async fn delete_comment(&mut self, comment_id: &CommentId) -> Outcome {
        tracing::debug!("Deleting comment {}", comment_id);
        match self.api.delete_comment(comment_id).await {
            Ok(()) => {
                tracing::info!("Comment {} deleted", comment_id);
                self.refresh().await
            }
            Err(e) => abandon("delete comment", e),
        }
    }

    pub async fn delete_reply(&mut self, reply_id: &ReplyId) -> Outcome {
        match self.api.delete_reply(reply_id).await {
            Ok(()) => {
                tracing::info!("Reply {} deleted", reply_id);
                self.refresh().await
            }
            Err(e) => abandon("delete reply", e),
        }
    }

    async fn refresh(&mut self) -> Outcome {
        self.list_comments().await;
        Outcome::Refreshed
    }
}

fn abandon(operation: &str, error: ApiError) -> Outcome {
    tracing::error!("{} failed: {}", operation, error);
    Outcome::Abandoned
}

fn not_editing(target: &EditTarget) -> Outcome {
    tracing::warn!("{:?} is not being edited", target);
    Outcome::Abandoned
}
