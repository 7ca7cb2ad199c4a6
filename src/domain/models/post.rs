use serde::{Deserialize, Serialize};

/// A content post extracted from a `search_notes` tool response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XhsPost {
    pub id: String,
    pub title: String,
    pub author: String,
    pub likes: i64,
    pub excerpt: String,
    pub post_url: String,
}

impl XhsPost {
    pub fn with_link(title: impl Into<String>, post_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            post_url: post_url.into(),
            ..Self::default()
        }
    }
}
