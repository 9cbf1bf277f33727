// In-memory stand-in for the comment backend, recording every call it sees
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use comment_thread::api::{ApiError, Endpoint, ThreadApi};
use comment_thread::model::{Comment, CommentId, PostId, Reply, ReplyId};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Store {
    next_id: u64,
    comments: Vec<(PostId, Comment)>,
    replies: Vec<(CommentId, Reply)>,
    calls: Vec<Call>,
    failures: HashMap<&'static str, u16>,
}

#[derive(Default)]
pub struct FakeBackend {
    store: Mutex<Store>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(self, post_id: &str, id: &str, content: &str, author: bool) -> Self {
        self.store.lock().unwrap().comments.push((
            PostId::new(post_id),
            Comment {
                comment_id: CommentId::new(id),
                content: content.to_string(),
                nickname: format!("user-{id}"),
                profile_image_url: None,
                author,
            },
        ));
        self
    }

    pub fn with_reply(self, comment_id: &str, id: &str, content: &str, author: bool) -> Self {
        self.store.lock().unwrap().replies.push((
            CommentId::new(comment_id),
            Reply {
                reply_id: ReplyId::new(id),
                content: content.to_string(),
                nickname: format!("replier-{id}"),
                profile_image_url: None,
                author,
            },
        ));
        self
    }

    /// Makes every call to the named operation answer with `status`.
    pub fn fail(&self, operation: &'static str, status: u16) {
        self.store.lock().unwrap().failures.insert(operation, status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.store.lock().unwrap().calls.clear();
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn record(&self, endpoint: Endpoint<'_>, body: Option<Value>) -> Result<(), ApiError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(Call {
            method: endpoint.method().to_string(),
            path: endpoint.path(),
            body,
        });
        match store.failures.get(endpoint.name()) {
            Some(status) => Err(ApiError::Status { status: *status }),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> String {
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        format!("n{}", store.next_id)
    }
}

#[async_trait]
impl ThreadApi for FakeBackend {
    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, ApiError> {
        self.record(Endpoint::ListComments(post_id), None)?;
        let store = self.store.lock().unwrap();
        Ok(store
            .comments
            .iter()
            .filter(|(post, _)| post == post_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn create_comment(&self, post_id: &PostId, content: &str) -> Result<Value, ApiError> {
        self.record(
            Endpoint::CreateComment,
            Some(json!({"content": content, "postId": post_id})),
        )?;
        let id = self.next_id();
        self.store.lock().unwrap().comments.push((
            post_id.clone(),
            Comment {
                comment_id: CommentId::new(id.clone()),
                content: content.to_string(),
                nickname: "me".to_string(),
                profile_image_url: None,
                author: true,
            },
        ));
        Ok(json!({"commentId": id}))
    }

    async fn update_comment(&self, comment_id: &CommentId, content: &str) -> Result<(), ApiError> {
        self.record(
            Endpoint::UpdateComment(comment_id),
            Some(json!({"content": content})),
        )?;
        let mut store = self.store.lock().unwrap();
        for (_, c) in store.comments.iter_mut() {
            if &c.comment_id == comment_id {
                c.content = content.to_string();
            }
        }
        Ok(())
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), ApiError> {
        self.record(Endpoint::DeleteComment(comment_id), None)?;
        let mut store = self.store.lock().unwrap();
        store.comments.retain(|(_, c)| &c.comment_id != comment_id);
        store.replies.retain(|(parent, _)| parent != comment_id);
        Ok(())
    }

    async fn list_replies(&self, comment_id: &CommentId) -> Result<Vec<Reply>, ApiError> {
        self.record(Endpoint::ListReplies(comment_id), None)?;
        let store = self.store.lock().unwrap();
        Ok(store
            .replies
            .iter()
            .filter(|(parent, _)| parent == comment_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn create_reply(&self, comment_id: &CommentId, content: &str) -> Result<(), ApiError> {
        self.record(
            Endpoint::CreateReply,
            Some(json!({"content": content, "commentId": comment_id})),
        )?;
        let id = self.next_id();
        self.store.lock().unwrap().replies.push((
            comment_id.clone(),
            Reply {
                reply_id: ReplyId::new(id),
                content: content.to_string(),
                nickname: "me".to_string(),
                profile_image_url: None,
                author: true,
            },
        ));
        Ok(())
    }

    async fn update_reply(&self, reply_id: &ReplyId, content: &str) -> Result<(), ApiError> {
        self.record(
            Endpoint::UpdateReply(reply_id),
            Some(json!({"content": content})),
        )?;
        let mut store = self.store.lock().unwrap();
        for (_, r) in store.replies.iter_mut() {
            if &r.reply_id == reply_id {
                r.content = content.to_string();
            }
        }
        Ok(())
    }

    async fn delete_reply(&self, reply_id: &ReplyId) -> Result<(), ApiError> {
        self.record(Endpoint::DeleteReply(reply_id), None)?;
        self.store
            .lock()
            .unwrap()
            .replies
            .retain(|(_, r)| &r.reply_id != reply_id);
        Ok(())
    }
}
