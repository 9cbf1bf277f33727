// Wire types exchanged with the comment backend
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ids arrive as JSON numbers from the backend but as strings from page paths
/// and form posts, so both shapes are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }
    };
}

id_type!(
    /// Post a thread hangs off. Taken from the page path, never from the backend.
    PostId
);
id_type!(CommentId);
id_type!(ReplyId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: CommentId,
    pub content: String,
    pub nickname: String,
    #[serde(default, alias = "profileImageurl")]
    pub profile_image_url: Option<String>,
    /// True only when the viewing user wrote this comment
    #[serde(default)]
    pub author: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub reply_id: ReplyId,
    pub content: String,
    pub nickname: String,
    #[serde(default, alias = "profileImageurl")]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub author: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment<'a> {
    pub content: &'a str,
    pub post_id: &'a PostId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReply<'a> {
    pub content: &'a str,
    pub comment_id: &'a CommentId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentUpdate<'a> {
    pub content: &'a str,
}

/// Shared shape of comments and replies as far as display is concerned.
pub trait Entry {
    fn content(&self) -> &str;
    fn nickname(&self) -> &str;
    fn profile_image_url(&self) -> Option<&str>;
    fn is_author(&self) -> bool;
}

impl Entry for Comment {
    fn content(&self) -> &str {
        &self.content
    }

    fn nickname(&self) -> &str {
        &self.nickname
    }

    fn profile_image_url(&self) -> Option<&str> {
        self.profile_image_url.as_deref()
    }

    fn is_author(&self) -> bool {
        self.author
    }
}

impl Entry for Reply {
    fn content(&self) -> &str {
        &self.content
    }

    fn nickname(&self) -> &str {
        &self.nickname
    }

    fn profile_image_url(&self) -> Option<&str> {
        self.profile_image_url.as_deref()
    }

    fn is_author(&self) -> bool {
        self.author
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comment_accepts_numeric_id() {
        let comment: Comment = serde_json::from_value(json!({
            "commentId": 7,
            "content": "hi",
            "nickname": "mina",
            "profileImageUrl": "/img/mina.png",
            "author": true
        }))
        .unwrap();

        assert_eq!(comment.comment_id, CommentId::new("7"));
        assert_eq!(comment.profile_image_url.as_deref(), Some("/img/mina.png"));
        assert!(comment.author);
    }

    #[test]
    fn comment_defaults_missing_optional_fields() {
        let comment: Comment = serde_json::from_value(json!({
            "commentId": "c-1",
            "content": "hi",
            "nickname": "mina"
        }))
        .unwrap();

        assert!(comment.profile_image_url.is_none());
        assert!(!comment.author);
    }

    #[test]
    fn profile_image_accepts_lowercase_spelling() {
        let reply: Reply = serde_json::from_value(json!({
            "replyId": 3,
            "content": "yo",
            "nickname": "jun",
            "profileImageurl": "/img/jun.png",
            "author": false
        }))
        .unwrap();

        assert_eq!(reply.reply_id.as_str(), "3");
        assert_eq!(reply.profile_image_url.as_deref(), Some("/img/jun.png"));
    }

    #[test]
    fn new_comment_serializes_post_id_as_string() {
        let post_id = PostId::new("42");
        let body = serde_json::to_value(NewComment {
            content: "hello",
            post_id: &post_id,
        })
        .unwrap();

        assert_eq!(body, json!({"content": "hello", "postId": "42"}));
    }

    #[test]
    fn new_reply_uses_camel_case_comment_id() {
        let comment_id = CommentId::new("7");
        let body = serde_json::to_value(NewReply {
            content: "same",
            comment_id: &comment_id,
        })
        .unwrap();

        assert_eq!(body, json!({"content": "same", "commentId": "7"}));
    }
}
