use std::collections::{BTreeMap, BTreeSet};

use super::node::ContactNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchLevel {
    NoMatch,
    Partial,
    Exact,
}

impl MatchLevel {
    pub fn zone(self) -> usize {
        match self {
            Self::Exact => 0,
            Self::Partial => 1,
            Self::NoMatch => 2,
        }
    }
}

/// Returns `None` while the filter is empty.
pub fn classify(tags: &BTreeSet<String>, filter: &TagFilter) -> Option<MatchLevel> {
    if filter.is_empty() {
        return None;
    }

    let level = if *tags == filter.selected {
        MatchLevel::Exact
    } else if tags.iter().any(|tag| filter.selected.contains(tag)) {
        MatchLevel::Partial
    } else {
        MatchLevel::NoMatch
    };
    Some(level)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    selected: BTreeSet<String>,
}

impl TagFilter {
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.selected.remove(tag) {
            false
        } else {
            self.selected.insert(tag.to_owned());
            true
        }
    }

    pub fn replace(&mut self, tags: &BTreeSet<String>) {
        self.selected.clone_from(tags);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.selected.contains(tag)
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.selected
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagEntry {
    pub count: usize,
    pub members: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct TagIndex {
    entries: BTreeMap<String, TagEntry>,
}

impl TagIndex {
    pub fn build(nodes: &[ContactNode]) -> Self {
        let mut entries: BTreeMap<String, TagEntry> = BTreeMap::new();
        for node in nodes {
            for tag in node.tags() {
                let entry = entries.entry(tag.clone()).or_default();
                entry.count += 1;
                entry.members.push(node.id().to_owned());
            }
        }
        Self { entries }
    }

    #[cfg(test)]
    pub fn count(&self, tag: &str) -> usize {
        self.entries.get(tag).map_or(0, |entry| entry.count)
    }

    pub fn members(&self, tag: &str) -> &[String] {
        self.entries
            .get(tag)
            .map(|entry| entry.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagEntry)> {
        self.entries.iter().map(|(tag, entry)| (tag.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
