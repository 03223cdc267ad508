use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::contacts::ContactRecord;

use super::node::ContactNode;

/// Case-insensitive substring match over the display fields and tags.
/// A blank query matches everything.
pub fn matches_search(record: &ContactRecord, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    record
        .searchable_fields()
        .any(|field| field.to_lowercase().contains(&query))
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

pub fn rank_search_results(
    nodes: &[ContactNode],
    visible: &[usize],
    query: &str,
    limit: usize,
) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = visible
        .iter()
        .filter_map(|&index| {
            let node = &nodes[index];
            std::iter::once(node.label())
                .chain(node.record().searchable_fields())
                .filter_map(|field| fuzzy_match_score(&matcher, field, query))
                .max()
                .map(|score| (score, index))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| nodes[a.1].label().cmp(nodes[b.1].label()))
    });
    scored.truncate(limit);
    scored.into_iter().map(|(_, index)| index).collect()
}
