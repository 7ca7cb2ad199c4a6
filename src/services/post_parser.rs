//! Extraction of posts from free-form `search_notes` output
//!
//! Tool servers answer with numbered text lists, JSON, or prose sprinkled
//! with links. [`ParseStrategy::CHAIN`] lists the recognised shapes in
//! priority order; the first one that yields a post wins.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::domain::models::post::XhsPost;

const CANONICAL_DETAIL_PREFIX: &str = "https://www.xiaohongshu.com/explore/";

static ITEM_LINK_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d+\.\s*(.+?)\s*\n\s*链接:\s*(\S+)\s*$").unwrap()
});

static ITEM_TITLE_THEN_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d+\.\s*(.+?)\s*\n\s*(https?://\S+)\s*$").unwrap()
});

static ANY_POST_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(https?://(?:www\.)?xiaohongshu\.com/\S+)").unwrap());

static DETAIL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?xiaohongshu\.com/(?:explore|discovery/item)/([A-Za-z0-9]+)")
        .unwrap()
});

static SEARCH_RESULT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?xiaohongshu\.com/search_result/([A-Za-z0-9]+)").unwrap()
});

const URL_ALIASES: [&str; 4] = ["url", "link", "post_url", "href"];
const TITLE_ALIASES: [&str; 4] = ["title", "name", "desc", "excerpt"];

/// One recognised output shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// `1. <title>` followed by a `链接: <url>` line.
    LabeledLink,
    /// `1. <title>` followed by a line holding only a URL.
    TitleThenUrl,
    /// A JSON array of objects with url/title-like keys.
    JsonArray,
    /// Every post URL anywhere in the text, without titles.
    BareUrlScan,
}

impl ParseStrategy {
    pub const CHAIN: [Self; 4] = [
        Self::LabeledLink,
        Self::TitleThenUrl,
        Self::JsonArray,
        Self::BareUrlScan,
    ];

    /// Posts in order of appearance; empty when the shape does not match.
    pub fn extract(self, text: &str) -> Vec<XhsPost> {
        match self {
            Self::LabeledLink => numbered_items(&ITEM_LINK_LABEL, text),
            Self::TitleThenUrl => numbered_items(&ITEM_TITLE_THEN_URL, text),
            Self::JsonArray => json_array_items(text),
            Self::BareUrlScan => ANY_POST_URL
                .captures_iter(text)
                .map(|caps| XhsPost::with_link("", caps[1].trim()))
                .collect(),
        }
    }
}

fn numbered_items(pattern: &Regex, text: &str) -> Vec<XhsPost> {
    pattern
        .captures_iter(text)
        .map(|caps| XhsPost::with_link(caps[1].trim(), caps[2].trim()))
        .collect()
}

fn json_array_items(text: &str) -> Vec<XhsPost> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|object| {
            let url = first_non_empty(object, &URL_ALIASES)?;
            let title = first_non_empty(object, &TITLE_ALIASES).unwrap_or_default();
            Some(XhsPost::with_link(title, url))
        })
        .collect()
}

fn first_non_empty<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Run the strategy chain and report which shape matched
///
/// Returns `None` when no strategy found a post.
pub fn parse_with_strategy(text: &str) -> Option<(ParseStrategy, Vec<XhsPost>)> {
    ParseStrategy::CHAIN.into_iter().find_map(|strategy| {
        let posts = unique_posts(strategy.extract(text));
        (!posts.is_empty()).then_some((strategy, posts))
    })
}

/// Posts found in `text`, de-duplicated on URL.
pub fn parse_search_output(text: &str) -> Vec<XhsPost> {
    parse_with_strategy(text)
        .map(|(_, posts)| posts)
        .unwrap_or_default()
}

/// Drop posts without a URL and keep the first post per trimmed URL.
pub fn unique_posts(posts: Vec<XhsPost>) -> Vec<XhsPost> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter(|post| {
            let url = post.post_url.trim();
            !url.is_empty() && seen.insert(url.to_string())
        })
        .collect()
}

/// Rewrite a post URL into its detail-page form
///
/// - detail URLs (`/explore/<id>`, `/discovery/item/<id>`) are kept as-is
/// - `/search_result/<id>` becomes `https://www.xiaohongshu.com/explore/<id>`
/// - any other `/search_result` URL is rejected with an empty string
/// - everything else is returned trimmed but otherwise unchanged
pub fn normalize_post_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() || DETAIL_URL.is_match(url) {
        return url.to_string();
    }
    if let Some(caps) = SEARCH_RESULT_URL.captures(url) {
        return format!("{CANONICAL_DETAIL_PREFIX}{}", &caps[1]);
    }
    if url.contains("/search_result") {
        return String::new();
    }
    url.to_string()
}

/// Note id of a detail-page URL.
pub fn note_id(url: &str) -> Option<&str> {
    DETAIL_URL
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELED: &str = "搜索结果:\n\
        1. 上海外滩夜景\n   链接: https://www.xiaohongshu.com/explore/aaa111\n\
        2. 武康路拍照攻略\n   链接: https://www.xiaohongshu.com/explore/bbb222\n";

    #[test]
    fn test_labeled_link_items_in_order() {
        let (strategy, posts) = parse_with_strategy(LABELED).unwrap();
        assert_eq!(strategy, ParseStrategy::LabeledLink);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "上海外滩夜景");
        assert_eq!(posts[0].post_url, "https://www.xiaohongshu.com/explore/aaa111");
        assert_eq!(posts[1].title, "武康路拍照攻略");
    }

    #[test]
    fn test_labeled_link_wins_over_later_shapes() {
        let text = format!(
            "{LABELED}3. 另一个\nhttps://www.xiaohongshu.com/explore/ccc333\n\
             see also https://xiaohongshu.com/explore/ddd444"
        );
        let (strategy, posts) = parse_with_strategy(&text).unwrap();
        assert_eq!(strategy, ParseStrategy::LabeledLink);
        assert_eq!(posts.len(), 2);
    }

    #[test]
    fn test_duplicate_urls_keep_first_title() {
        let text = "1. First\n链接: https://www.xiaohongshu.com/explore/same\n\
                    2. Second\n链接: https://www.xiaohongshu.com/explore/same\n";
        let posts = parse_search_output(text);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "First");
    }

    #[test]
    fn test_title_then_url() {
        let text = "1. 咖啡店\nhttps://www.xiaohongshu.com/explore/abc\n2. 书店\n  http://xiaohongshu.com/explore/def\n";
        let (strategy, posts) = parse_with_strategy(text).unwrap();
        assert_eq!(strategy, ParseStrategy::TitleThenUrl);
        assert_eq!(posts[1].title, "书店");
        assert_eq!(posts[1].post_url, "http://xiaohongshu.com/explore/def");
    }

    #[test]
    fn test_json_array_aliases() {
        let text = r#"[
            {"link": " https://www.xiaohongshu.com/explore/j1 ", "name": "Park"},
            {"url": "", "href": "https://www.xiaohongshu.com/explore/j2", "title": "", "desc": "Museum"},
            {"title": "no url"},
            "not an object"
        ]"#;
        let (strategy, posts) = parse_with_strategy(text).unwrap();
        assert_eq!(strategy, ParseStrategy::JsonArray);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].post_url, "https://www.xiaohongshu.com/explore/j1");
        assert_eq!(posts[0].title, "Park");
        assert_eq!(posts[1].title, "Museum");
    }

    #[test]
    fn test_json_array_without_urls_falls_through_to_scan() {
        let text = r#"[{"title": "see https://www.xiaohongshu.com/explore/zz9"}]"#;
        let (strategy, posts) = parse_with_strategy(text).unwrap();
        assert_eq!(strategy, ParseStrategy::BareUrlScan);
        assert_eq!(posts.len(), 1);
        assert!(posts[0].title.is_empty());
    }

    #[test]
    fn test_bare_url_scan_dedups_in_order() {
        let text = "found https://www.xiaohongshu.com/explore/b and \
                    https://xiaohongshu.com/explore/a then https://www.xiaohongshu.com/explore/b again";
        let posts = parse_search_output(text);
        let urls: Vec<&str> = posts.iter().map(|p| p.post_url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.xiaohongshu.com/explore/b",
                "https://xiaohongshu.com/explore/a"
            ]
        );
    }

    #[test]
    fn test_nothing_recognisable() {
        assert!(parse_with_strategy("no results today").is_none());
        assert!(parse_search_output("").is_empty());
    }

    #[test]
    fn test_normalize_search_result_url() {
        assert_eq!(
            normalize_post_url("https://www.xiaohongshu.com/search_result/abc123?x=1"),
            "https://www.xiaohongshu.com/explore/abc123"
        );
    }

    #[test]
    fn test_normalize_rejects_search_result_without_id() {
        assert_eq!(
            normalize_post_url("https://www.xiaohongshu.com/search_result?keyword=cat"),
            ""
        );
    }

    #[test]
    fn test_normalize_keeps_detail_urls() {
        let explore = "https://www.xiaohongshu.com/explore/abc123?xsec_token=t";
        assert_eq!(normalize_post_url(explore), explore);
        let discovery = "https://xiaohongshu.com/discovery/item/def456";
        assert_eq!(normalize_post_url(discovery), discovery);
    }

    #[test]
    fn test_normalize_other_urls() {
        assert_eq!(normalize_post_url("  "), "");
        assert_eq!(
            normalize_post_url(" https://example.com/page "),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_note_id() {
        assert_eq!(
            note_id("https://www.xiaohongshu.com/explore/abc123?x=1"),
            Some("abc123")
        );
        assert_eq!(
            note_id("https://www.xiaohongshu.com/discovery/item/DEF"),
            Some("DEF")
        );
        assert_eq!(note_id("https://example.com/explore/abc"), None);
    }
}
