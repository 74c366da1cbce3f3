// Feed client: fetch and parse one page of posts from the puppygram API.
// Public API:
//   - FeedQuery: listing request parameters (author search, page size)
//   - Post, Pagination, FeedMsg: typed response structures
//   - fetch_feed_page(page, &query) -> Result<FeedMsg, FeedError>
//   - fetch_photo(url) -> decoded RGBA8 bytes + dimensions
//
// Endpoint shape: GET {api_base}/api/posts?page=N returns
// { "status": "ok", "msg": { "data": [...], "pagination": {...}, "count": N } }
// or { "status": "error", "msg": "reason" }.

use lazy_static::lazy_static;
use serde::Deserialize;
use std::fmt;

mod post;
pub use post::{Author, Comment, FeedMsg, Pagination, Post, PostId};

lazy_static! {
    static ref CLIENT: reqwest::Client = reqwest::Client::builder()
        .user_agent(concat!("puppygram/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    /// Restrict the feed to posts by this username. Empty = everyone.
    pub author: String,
    /// Posts per page. None = server default.
    pub per_page: Option<u32>,
}

impl FeedQuery {
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
    pub fn with_per_page(mut self, n: u32) -> Self {
        self.per_page = Some(n);
        self
    }
}

/// Resolve a possibly-relative photo URL against the API base.
pub fn normalize_url(base: &str, s: &str) -> String {
    if s.starts_with("http://") || s.starts_with("https://") {
        s.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), s.trim_start_matches('/'))
    }
}

#[derive(Debug)]
pub enum FeedError {
    Request(reqwest::Error),
    Api(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Request(e) => write!(f, "Request/Decode error: {}", e),
            FeedError::Api(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Request(e) => Some(e),
            FeedError::Api(_) => None,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Request(e)
    }
}

// Top-level response carries either the msg object on success or a string on error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Msg {
    Success(FeedMsg),
    Error(String),
}

#[derive(Debug, Deserialize)]
struct Root {
    status: String,
    msg: Msg,
}

/// Fetch and parse one feed page with the provided query.
/// Returns the 'msg' object which contains data, pagination, and total count.
pub async fn fetch_feed_page(page: u32, query: &FeedQuery) -> Result<FeedMsg, FeedError> {
    let client = &CLIENT;
    let base = crate::app::settings::api_base();
    let url = format!("{}/api/posts", base.trim_end_matches('/'));

    let mut params: Vec<(String, String)> = vec![("page".into(), page.to_string())];
    if !query.author.is_empty() {
        params.push(("author".into(), query.author.clone()));
    }
    if let Some(n) = query.per_page {
        params.push(("limit".into(), n.to_string()));
    }

    // On 429 (Too Many Requests), wait 1 second and retry once to avoid
    // immediate hammering.
    let mut raw_resp = client.get(&url).query(&params).send().await?;
    if raw_resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        log::warn!("fetch_feed_page: received 429 Too Many Requests; delaying 1s before retry");
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        raw_resp = client.get(&url).query(&params).send().await?;
    }

    let raw_resp = raw_resp.error_for_status()?;
    let resp: Root = match raw_resp.json().await {
        Ok(v) => v,
        Err(err) => {
            let text = format!("Failed to parse JSON response: {err}");
            log::error!("{}", text);
            return Err(FeedError::Api(text));
        }
    };

    match resp.msg {
        Msg::Success(msg) if resp.status == "ok" => Ok(msg),
        Msg::Error(err) => Err(FeedError::Api(err)),
        _ => Err(FeedError::Api(format!("unexpected status: {}", resp.status))),
    }
}

/// Download a post photo and return RGBA8 bytes + size.
pub async fn fetch_photo(url: &str) -> Result<(usize, usize, Vec<u8>), String> {
    let client = &CLIENT;
    log::debug!("fetch_photo: GET {}", url);

    let resp = match client
        .get(url)
        .header(
            "Accept",
            "image/jpeg,image/png,image/gif,image/webp;q=0.9,*/*;q=0.5",
        )
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            log::warn!("fetch_photo: request error for {}: {}", url, e);
            return Err(format!("request error for {}: {}", url, e));
        }
    };

    let status = resp.status();
    if !status.is_success() {
        log::warn!("fetch_photo: http status {} for {}", status.as_u16(), url);
        return Err(format!("http status {} for {}", status.as_u16(), url));
    }

    let bytes = match resp.bytes().await {
        Ok(b) => b,
        Err(e) => {
            log::warn!("fetch_photo: body read error for {}: {}", url, e);
            return Err(format!("body read error for {}: {}", url, e));
        }
    };

    let img = match image::load_from_memory(&bytes) {
        Ok(i) => i,
        Err(e) => {
            let msg = format!("decode error for {}: {}", url, e);
            log::warn!("fetch_photo: {}", msg);
            return Err(msg);
        }
    };
    let rgba8 = img.to_rgba8();
    let (w, h) = rgba8.dimensions();
    Ok((w as usize, h as usize, rgba8.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_absolute_urls() {
        let u = "https://cdn.example.com/p/1.jpg";
        assert_eq!(normalize_url("http://localhost:5000", u), u);
        let u = "http://other.host/p.png";
        assert_eq!(normalize_url("http://localhost:5000", u), u);
    }

    #[test]
    fn normalize_joins_relative_paths() {
        assert_eq!(
            normalize_url("http://localhost:5000/", "/uploads/1.jpg"),
            "http://localhost:5000/uploads/1.jpg"
        );
        assert_eq!(
            normalize_url("http://localhost:5000", "uploads/1.jpg"),
            "http://localhost:5000/uploads/1.jpg"
        );
    }

    #[test]
    fn envelope_success_and_error() {
        let ok = r#"{
            "status": "ok",
            "msg": { "data": [ { "_id": "a" } ], "pagination": { "page": 1, "total": 1 }, "count": 1 }
        }"#;
        let root: Root = serde_json::from_str(ok).unwrap();
        assert_eq!(root.status, "ok");
        assert!(matches!(root.msg, Msg::Success(ref m) if m.data.len() == 1));

        let err = r#"{ "status": "error", "msg": "feed unavailable" }"#;
        let root: Root = serde_json::from_str(err).unwrap();
        assert!(matches!(root.msg, Msg::Error(ref s) if s == "feed unavailable"));
    }

    #[test]
    fn query_builder() {
        let q = FeedQuery::default().with_author("rex").with_per_page(20);
        assert_eq!(q.author, "rex");
        assert_eq!(q.per_page, Some(20));
    }
}
