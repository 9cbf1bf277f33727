// Backend collaborator - every network side effect goes through ThreadApi
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::model::{Comment, CommentId, ContentUpdate, NewComment, NewReply, PostId, Reply, ReplyId};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unexpected status: {status}")]
    Status { status: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// The eight REST operations the thread consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    ListComments(&'a PostId),
    CreateComment,
    UpdateComment(&'a CommentId),
    DeleteComment(&'a CommentId),
    ListReplies(&'a CommentId),
    CreateReply,
    UpdateReply(&'a ReplyId),
    DeleteReply(&'a ReplyId),
}

impl Endpoint<'_> {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::ListComments(_) | Endpoint::ListReplies(_) => Method::GET,
            Endpoint::CreateComment | Endpoint::CreateReply => Method::POST,
            Endpoint::UpdateComment(_) | Endpoint::UpdateReply(_) => Method::PUT,
            Endpoint::DeleteComment(_) | Endpoint::DeleteReply(_) => Method::DELETE,
        }
    }

    /// Unencoded path segments; the id, when present, is always last.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::ListComments(id) => vec!["api", "comments", "post", id.as_str()],
            Endpoint::CreateComment => vec!["api", "comments", "reg"],
            Endpoint::UpdateComment(id) => vec!["api", "comments", "update", id.as_str()],
            Endpoint::DeleteComment(id) => vec!["api", "comments", "delete", id.as_str()],
            Endpoint::ListReplies(id) => vec!["api", "replies", "comment", id.as_str()],
            Endpoint::CreateReply => vec!["api", "replies", "reg"],
            Endpoint::UpdateReply(id) => vec!["api", "replies", "update", id.as_str()],
            Endpoint::DeleteReply(id) => vec!["api", "replies", "delete", id.as_str()],
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    /// Operation name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::ListComments(_) => "list comments",
            Endpoint::CreateComment => "create comment",
            Endpoint::UpdateComment(_) => "update comment",
            Endpoint::DeleteComment(_) => "delete comment",
            Endpoint::ListReplies(_) => "list replies",
            Endpoint::CreateReply => "create reply",
            Endpoint::UpdateReply(_) => "update reply",
            Endpoint::DeleteReply(_) => "delete reply",
        }
    }
}

#[async_trait]
pub trait ThreadApi: Send + Sync {
    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, ApiError>;

    /// Returns whatever JSON the backend answers with. A success without a
    /// JSON body counts as a failure.
    async fn create_comment(
        &self,
        post_id: &PostId,
        content: &str,
    ) -> Result<serde_json::Value, ApiError>;

    async fn update_comment(&self, comment_id: &CommentId, content: &str) -> Result<(), ApiError>;

    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), ApiError>;

    async fn list_replies(&self, comment_id: &CommentId) -> Result<Vec<Reply>, ApiError>;

    async fn create_reply(&self, comment_id: &CommentId, content: &str) -> Result<(), ApiError>;

    async fn update_reply(&self, reply_id: &ReplyId, content: &str) -> Result<(), ApiError>;

    async fn delete_reply(&self, reply_id: &ReplyId) -> Result<(), ApiError>;
}

/// reqwest-backed implementation talking to the real backend.
#[derive(Clone)]
pub struct HttpThreadApi {
    client: Client,
    base_url: Url,
}

impl HttpThreadApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn parse(base_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        Ok(Self::new(url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, endpoint: &Endpoint<'_>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }

    fn request(&self, endpoint: &Endpoint<'_>) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(endpoint.method(), self.url(endpoint)?))
    }

    async fn execute(
        &self,
        endpoint: Endpoint<'_>,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        tracing::debug!("{} {}", endpoint.method(), endpoint.path());
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn fetch_list<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<Vec<T>, ApiError> {
        let request = self.request(&endpoint)?;
        let response = self.execute(endpoint, request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ThreadApi for HttpThreadApi {
    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, ApiError> {
        self.fetch_list(Endpoint::ListComments(post_id)).await
    }

    async fn create_comment(
        &self,
        post_id: &PostId,
        content: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let endpoint = Endpoint::CreateComment;
        let request = self
            .request(&endpoint)?
            .json(&NewComment { content, post_id });
        let bytes = self.execute(endpoint, request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn update_comment(&self, comment_id: &CommentId, content: &str) -> Result<(), ApiError> {
        let endpoint = Endpoint::UpdateComment(comment_id);
        let request = self.request(&endpoint)?.json(&ContentUpdate { content });
        self.execute(endpoint, request).await?;
        Ok(())
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), ApiError> {
        let endpoint = Endpoint::DeleteComment(comment_id);
        let request = self.request(&endpoint)?;
        self.execute(endpoint, request).await?;
        Ok(())
    }

    async fn list_replies(&self, comment_id: &CommentId) -> Result<Vec<Reply>, ApiError> {
        self.fetch_list(Endpoint::ListReplies(comment_id)).await
    }

    async fn create_reply(&self, comment_id: &CommentId, content: &str) -> Result<(), ApiError> {
        let endpoint = Endpoint::CreateReply;
        let request = self
            .request(&endpoint)?
            .json(&NewReply { content, comment_id });
        self.execute(endpoint, request).await?;
        Ok(())
    }

    async fn update_reply(&self, reply_id: &ReplyId, content: &str) -> Result<(), ApiError> {
        let endpoint = Endpoint::UpdateReply(reply_id);
        let request = self.request(&endpoint)?.json(&ContentUpdate { content });
        self.execute(endpoint, request).await?;
        Ok(())
    }

    async fn delete_reply(&self, reply_id: &ReplyId) -> Result<(), ApiError> {
        let endpoint = Endpoint::DeleteReply(reply_id);
        let request = self.request(&endpoint)?;
        self.execute(endpoint, request).await?;
        Ok(())
    }
}
