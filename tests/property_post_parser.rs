//! Property tests for search-output parsing and URL normalization

use photo_gateway::services::post_parser::note_id;
use photo_gateway::services::{normalize_post_url, parse_search_output};
use proptest::prelude::*;

fn note_id_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{8,24}"
}

fn title_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z\u{4e00}-\u{4e2f}][A-Za-z \u{4e00}-\u{4e2f}]{0,15}[A-Za-z\u{4e00}-\u{4e2f}]"
}

fn labeled_listing(items: &[(String, String)]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, (title, id))| {
            format!("{}. {title}\n链接: https://www.xiaohongshu.com/explore/{id}\n", i + 1)
        })
        .collect()
}

proptest! {
    #[test]
    fn normalize_is_idempotent(input in "\\PC{0,80}") {
        let once = normalize_post_url(&input);
        prop_assert_eq!(normalize_post_url(&once), once.clone());
    }

    #[test]
    fn search_result_urls_become_detail_urls(id in note_id_strategy(), query in "[a-z_=&0-9]{0,20}") {
        let url = format!("https://www.xiaohongshu.com/search_result/{id}?{query}");
        let normalized = normalize_post_url(&url);
        prop_assert_eq!(&normalized, &format!("https://www.xiaohongshu.com/explore/{id}"));
        prop_assert_eq!(note_id(&normalized), Some(id.as_str()));
    }

    #[test]
    fn labeled_listing_keeps_order_and_titles(
        items in proptest::collection::vec((title_strategy(), note_id_strategy()), 1..8)
    ) {
        let posts = parse_search_output(&labeled_listing(&items));

        let mut expected = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for (title, id) in &items {
            if seen.insert(id.clone()) {
                expected.push((title.clone(), format!("https://www.xiaohongshu.com/explore/{id}")));
            }
        }

        let actual: Vec<(String, String)> = posts
            .into_iter()
            .map(|post| (post.title, post.post_url))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn parsed_urls_are_unique(text in "(\\PC|\n){0,300}", ids in proptest::collection::vec(note_id_strategy(), 0..5)) {
        let mut input = text;
        for id in &ids {
            input.push_str(&format!(" https://www.xiaohongshu.com/explore/{id}\n"));
        }
        let posts = parse_search_output(&input);
        prop_assert!(posts.iter().all(|p| !p.post_url.is_empty()));

        let mut urls: Vec<&str> = posts.iter().map(|p| p.post_url.as_str()).collect();
        let total = urls.len();
        urls.sort_unstable();
        urls.dedup();
        prop_assert_eq!(urls.len(), total);
    }
}
