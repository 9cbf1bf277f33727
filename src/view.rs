// View model - a pure mapping from fetched data + transient UI state to an
// immutable tree. Nothing here touches the network.
use std::collections::BTreeMap;

use crate::model::{Comment, CommentId, Entry, PostId, Reply, ReplyId};

pub const DEFAULT_PROFILE_IMAGE: &str = "/image/profile/profile.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub default_profile_image: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_profile_image: DEFAULT_PROFILE_IMAGE.to_string(),
        }
    }
}

// --- Inputs ---

/// A comment as last fetched, with whatever replies its own fetch produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub comment: Comment,
    pub replies: Vec<Reply>,
}

/// Result of the last list refresh, in the order the backend returned it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub entries: Vec<ThreadEntry>,
}

impl Snapshot {
    pub fn entry(&self, comment_id: &CommentId) -> Option<&ThreadEntry> {
        self.entries
            .iter()
            .find(|e| &e.comment.comment_id == comment_id)
    }

    pub fn reply(&self, reply_id: &ReplyId) -> Option<&Reply> {
        self.entries
            .iter()
            .flat_map(|e| e.replies.iter())
            .find(|r| &r.reply_id == reply_id)
    }
}

/// Local-only state. Never persisted; a list refresh throws it away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub composer_draft: String,
    pub comment_edits: BTreeMap<CommentId, String>,
    pub reply_edits: BTreeMap<ReplyId, String>,
    pub reply_boxes: BTreeMap<CommentId, String>,
    pub scroll_target: Option<CommentId>,
}

impl UiState {
    /// Drops everything a rebuilt subtree would lose. The composer lives
    /// outside the comment list and survives.
    pub fn reset_rows(&mut self) {
        self.comment_edits.clear();
        self.reply_edits.clear();
        self.reply_boxes.clear();
        self.scroll_target = None;
    }
}

// --- View tree ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Edit,
    Delete,
    Reply,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Edit => "Edit",
            Control::Delete => "Delete",
            Control::Reply => "Reply",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub image_url: String,
    pub nickname: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub profile: ProfileView,
    pub controls: Vec<Control>,
}

impl EntryView {
    pub fn has(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentMode {
    Viewing {
        entry: EntryView,
        replies: Vec<ReplyRow>,
    },
    Editing {
        draft: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMode {
    Viewing(EntryView),
    Editing { draft: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyBox {
    pub draft: String,
    pub scroll_into_view: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub id: CommentId,
    pub mode: CommentMode,
    pub reply_box: Option<ReplyBox>,
}

impl CommentRow {
    pub fn viewing(&self) -> Option<&EntryView> {
        match &self.mode {
            CommentMode::Viewing { entry, .. } => Some(entry),
            CommentMode::Editing { .. } => None,
        }
    }

    pub fn editing_draft(&self) -> Option<&str> {
        match &self.mode {
            CommentMode::Editing { draft } => Some(draft.as_str()),
            CommentMode::Viewing { .. } => None,
        }
    }

    /// Replies are only part of the tree while the row is being viewed.
    pub fn replies(&self) -> &[ReplyRow] {
        match &self.mode {
            CommentMode::Viewing { replies, .. } => replies.as_slice(),
            CommentMode::Editing { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRow {
    pub id: ReplyId,
    pub comment_id: CommentId,
    pub mode: ReplyMode,
}

impl ReplyRow {
    pub fn viewing(&self) -> Option<&EntryView> {
        match &self.mode {
            ReplyMode::Viewing(entry) => Some(entry),
            ReplyMode::Editing { .. } => None,
        }
    }

    pub fn editing_draft(&self) -> Option<&str> {
        match &self.mode {
            ReplyMode::Editing { draft } => Some(draft.as_str()),
            ReplyMode::Viewing(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadView {
    pub post_id: PostId,
    pub composer_draft: String,
    pub comments: Vec<CommentRow>,
}

// --- Rendering ---

pub fn render(
    post_id: &PostId,
    snapshot: &Snapshot,
    ui: &UiState,
    options: &RenderOptions,
) -> ThreadView {
    ThreadView {
        post_id: post_id.clone(),
        composer_draft: ui.composer_draft.clone(),
        comments: snapshot
            .entries
            .iter()
            .map(|entry| comment_row(entry, ui, options))
            .collect(),
    }
}

fn comment_row(entry: &ThreadEntry, ui: &UiState, options: &RenderOptions) -> CommentRow {
    let id = entry.comment.comment_id.clone();

    let mode = match ui.comment_edits.get(&id) {
        Some(draft) => CommentMode::Editing {
            draft: draft.clone(),
        },
        None => {
            let mut view = entry_view(&entry.comment, options);
            view.controls.push(Control::Reply);
            CommentMode::Viewing {
                entry: view,
                replies: entry
                    .replies
                    .iter()
                    .map(|reply| reply_row(&id, reply, ui, options))
                    .collect(),
            }
        }
    };

    let reply_box = ui.reply_boxes.get(&id).map(|draft| ReplyBox {
        draft: draft.clone(),
        scroll_into_view: ui.scroll_target.as_ref() == Some(&id),
    });

    CommentRow {
        id,
        mode,
        reply_box,
    }
}

fn reply_row(
    comment_id: &CommentId,
    reply: &Reply,
    ui: &UiState,
    options: &RenderOptions,
) -> ReplyRow {
    let mode = match ui.reply_edits.get(&reply.reply_id) {
        Some(draft) => ReplyMode::Editing {
            draft: draft.clone(),
        },
        None => ReplyMode::Viewing(entry_view(reply, options)),
    };

    ReplyRow {
        id: reply.reply_id.clone(),
        comment_id: comment_id.clone(),
        mode,
    }
}

fn entry_view(entry: &impl Entry, options: &RenderOptions) -> EntryView {
    let image_url = entry
        .profile_image_url()
        .filter(|url| !url.is_empty())
        .unwrap_or(&options.default_profile_image)
        .to_string();

    let controls = if entry.is_author() {
        vec![Control::Edit, Control::Delete]
    } else {
        Vec::new()
    };

    EntryView {
        profile: ProfileView {
            image_url,
            nickname: entry.nickname().to_string(),
            content: entry.content().to_string(),
        },
        controls,
    }
}
