use percent_encoding::percent_decode_str;

use crate::model::PostId;

/// Per-page context passed to every thread operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadContext {
    pub post_id: PostId,
}

impl ThreadContext {
    pub fn new(post_id: PostId) -> Self {
        Self { post_id }
    }

    /// The post id is the last `/`-delimited segment of the page path.
    ///
    /// Page paths arrive percent-encoded; the id is held decoded so the
    /// backend URL encodes it exactly once. Nothing else is validated:
    /// `/posts/` yields an empty id and the list fetch that follows fails
    /// against the backend.
    pub fn from_page_path(path: &str) -> Self {
        let last = path.rsplit('/').next().unwrap_or_default();
        let decoded = percent_decode_str(last).decode_utf8_lossy();
        Self::new(PostId::new(decoded.into_owned()))
    }
}
