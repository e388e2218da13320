use std::collections::HashMap;

use crate::models::{Film, FilmId};

/// Orders films by like count descending, breaking ties by ascending id so
/// the ranking is reproducible, and truncates to `count`. Films without any
/// likes rank with a count of zero rather than dropping out.
pub fn rank_by_likes(mut films: Vec<Film>, counts: &HashMap<FilmId, u64>, count: u64) -> Vec<Film> {
    films.sort_by(|a, b| {
        let likes_a = counts.get(&a.id).copied().unwrap_or(0);
        let likes_b = counts.get(&b.id).copied().unwrap_or(0);
        likes_b.cmp(&likes_a).then_with(|| a.id.cmp(&b.id))
    });
    films.truncate(usize::try_from(count).unwrap_or(usize::MAX));
    films
}
