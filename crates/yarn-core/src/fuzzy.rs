//! "Did you mean" name matching.
//!
//! Similarity is a normalized Levenshtein distance in `0.0..=1.0`, compared
//! case-insensitively. A candidate matches when its distance is at or below the
//! threshold, so lower thresholds are stricter.

/// Returns the `items` whose name is within `threshold` of `query`, with their
/// distances, closest first.
///
/// Ties keep the order in which items were supplied.
pub fn rank_by_similarity<T, I, F>(query: &str, items: I, threshold: f32, name: F) -> Vec<(f32, T)>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &str,
{
    let query: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    let mut scored: Vec<(f32, T)> = items
        .into_iter()
        .filter_map(|item| {
            let distance = normalized_distance(&query, name(&item));
            (distance <= threshold).then_some((distance, item))
        })
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    scored
}

fn normalized_distance(query: &[char], candidate: &str) -> f32 {
    let candidate: Vec<char> = candidate.chars().flat_map(char::to_lowercase).collect();
    let longest = query.len().max(candidate.len());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(query, &candidate) as f32 / longest as f32
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
