use serde::Deserialize;

/// Backend post identifier (a Mongo ObjectId rendered as a hex string).
/// Used as the card key in the grid and as the photo cache key.
#[derive(Debug, Deserialize, Clone, Hash, PartialEq, Eq)]
pub struct PostId(pub String);

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "postedBy", default)]
    pub posted_by: Option<Author>,
}

/// One feed item as served by the API. Display fields besides `_id` are
/// optional on the wire: a post missing them still renders, just sparser.
#[derive(Debug, Deserialize, Clone)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    #[serde(default)]
    pub caption: String,
    /// Photo URL, absolute or relative to the API base. Empty = no photo.
    #[serde(default)]
    pub photo: String,
    #[serde(rename = "postedBy", default)]
    pub posted_by: Option<Author>,
    /// Ids of users who liked the post.
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// ISO-8601 timestamp as sent by the server.
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

impl Post {
    pub fn author_name(&self) -> &str {
        self.posted_by
            .as_ref()
            .map(|a| a.username.as_str())
            .unwrap_or("unknown")
    }

    /// Date part of the server timestamp ("2023-07-10T12:00:00Z" -> "2023-07-10").
    pub fn created_date(&self) -> &str {
        self.created_at
            .split_once('T')
            .map(|(d, _)| d)
            .unwrap_or(&self.created_at)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Pagination {
    pub page: u32,
    pub total: u32,
}

/// One fetched feed page.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedMsg {
    pub data: Vec<Post>,
    pub pagination: Pagination,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_post() {
        let json = r#"{
            "_id": "64ac01f2e4d3a9b1c0ffee01",
            "caption": "Beach day",
            "photo": "https://cdn.example.com/p/1.jpg",
            "postedBy": { "_id": "u1", "username": "rex" },
            "likes": ["u2", "u3"],
            "comments": [
                { "_id": "c1", "text": "good boy", "postedBy": { "_id": "u2", "username": "lady" } }
            ],
            "createdAt": "2023-07-10T12:00:00.000Z"
        }"#;
        let p: Post = serde_json::from_str(json).unwrap();
        assert_eq!(p.id.as_str(), "64ac01f2e4d3a9b1c0ffee01");
        assert_eq!(p.author_name(), "rex");
        assert_eq!(p.likes.len(), 2);
        assert_eq!(p.comments.len(), 1);
        assert_eq!(p.created_date(), "2023-07-10");
    }

    #[test]
    fn parses_sparse_post() {
        // Only the id is mandatory; everything else degrades gracefully.
        let p: Post = serde_json::from_str(r#"{ "_id": "a" }"#).unwrap();
        assert_eq!(p.id.as_str(), "a");
        assert!(p.caption.is_empty());
        assert!(p.photo.is_empty());
        assert_eq!(p.author_name(), "unknown");
        assert!(p.likes.is_empty());
        assert!(p.comments.is_empty());
        assert_eq!(p.created_date(), "");
    }

    #[test]
    fn feed_msg_preserves_input_order() {
        let json = r#"{
            "data": [ { "_id": "a" }, { "_id": "b" }, { "_id": "c" } ],
            "pagination": { "page": 1, "total": 4 },
            "count": 3
        }"#;
        let msg: FeedMsg = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = msg.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(msg.pagination.total, 4);
    }
}
