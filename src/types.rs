use crate::feed::Post;

/// Client-side ordering of the fetched feed. Applied before the posts reach
/// the grid, so the renderer always sees a plain ordered sequence.
#[derive(strum::EnumCount, strum::EnumIter, strum::Display, PartialEq, Clone, Copy, Default, Debug)]
pub enum FeedSort {
    #[default]
    Newest,
    MostLiked,
    MostCommented,
}

impl FeedSort {
    pub fn label(&self) -> &'static str {
        match self {
            FeedSort::Newest => "🕓 NEWEST",
            FeedSort::MostLiked => "👍 MOST LIKED",
            FeedSort::MostCommented => "💬 MOST COMMENTED",
        }
    }

    /// Reorders posts in place. `Newest` keeps server order (the API already
    /// serves newest-first). Sorts are stable, so ties keep server order too.
    pub fn apply(&self, posts: &mut [Post]) {
        match self {
            FeedSort::Newest => {}
            FeedSort::MostLiked => {
                posts.sort_by_key(|p| std::cmp::Reverse(p.likes.len()));
            }
            FeedSort::MostCommented => {
                posts.sort_by_key(|p| std::cmp::Reverse(p.comments.len()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, likes: usize, comments: usize) -> Post {
        let likes: Vec<String> = (0..likes).map(|i| format!("u{i}")).collect();
        let comments = format!(
            "[{}]",
            (0..comments)
                .map(|i| format!(r#"{{ "_id": "c{i}" }}"#))
                .collect::<Vec<_>>()
                .join(",")
        );
        serde_json::from_str(&format!(
            r#"{{ "_id": "{id}", "likes": {}, "comments": {} }}"#,
            serde_json::to_string(&likes).unwrap(),
            comments
        ))
        .unwrap()
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn newest_keeps_server_order() {
        let mut posts = vec![post("a", 0, 0), post("b", 5, 0), post("c", 2, 0)];
        FeedSort::Newest.apply(&mut posts);
        assert_eq!(ids(&posts), ["a", "b", "c"]);
    }

    #[test]
    fn most_liked_sorts_descending_and_keeps_set() {
        let mut posts = vec![post("a", 1, 0), post("b", 5, 0), post("c", 2, 0)];
        FeedSort::MostLiked.apply(&mut posts);
        assert_eq!(ids(&posts), ["b", "c", "a"]);
        assert_eq!(posts.len(), 3);
    }

    #[test]
    fn ties_are_stable() {
        let mut posts = vec![post("a", 2, 0), post("b", 2, 0), post("c", 2, 0)];
        FeedSort::MostLiked.apply(&mut posts);
        assert_eq!(ids(&posts), ["a", "b", "c"]);
    }

    #[test]
    fn most_commented_sorts_by_comment_count() {
        let mut posts = vec![post("a", 0, 1), post("b", 0, 0), post("c", 0, 3)];
        FeedSort::MostCommented.apply(&mut posts);
        assert_eq!(ids(&posts), ["c", "a", "b"]);
    }
}
