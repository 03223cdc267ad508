use std::collections::BTreeSet;

use super::node::ContactNode;

/// Similarity edge between two visible nodes, by index into the node list.
/// `source < target` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub weight: usize,
}

impl Link {
    #[cfg(test)]
    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }
}

pub fn shared_tag_count(a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    a.intersection(b).count()
}

/// All-pairs link derivation over the visible nodes.
///
/// Quadratic in the visible count; sized for personal and small-team
/// contact lists.
pub fn derive_links(nodes: &[ContactNode], visible: &[usize]) -> Vec<Link> {
    let mut links = Vec::new();
    for (position, &first) in visible.iter().enumerate() {
        for &second in &visible[position + 1..] {
            if first == second {
                continue;
            }
            let weight = shared_tag_count(nodes[first].tags(), nodes[second].tags());
            if weight > 0 {
                links.push(Link {
                    source: first.min(second),
                    target: first.max(second),
                    weight,
                });
            }
        }
    }
    links.sort_unstable_by_key(|link| (link.source, link.target));
    links
}
