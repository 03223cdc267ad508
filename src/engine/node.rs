use std::collections::BTreeSet;

use eframe::egui::Vec2;

use crate::contacts::ContactRecord;

pub const MIN_RADIUS: f32 = 25.0;
pub const MAX_RADIUS: f32 = 90.0;
pub const STYLE_COUNT: u8 = 10;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Palette slot chosen once when a node is created. FNV-1a over the id, so the
/// same contact keeps its color across runs and toolchains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StyleToken(pub u8);

impl StyleToken {
    fn for_id(id: &str) -> Self {
        let hash = id.bytes().fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        });
        Self((hash % u64::from(STYLE_COUNT)) as u8)
    }
}

pub fn radius_for_label(label: &str) -> f32 {
    (16.0 + label.chars().count() as f32 * 4.0).clamp(MIN_RADIUS, MAX_RADIUS)
}

pub struct ContactNode {
    record: ContactRecord,
    tags: BTreeSet<String>,
    label: String,
    radius: f32,
    style: StyleToken,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pin: Option<Vec2>,
}

impl ContactNode {
    pub fn create(mut record: ContactRecord, position: Vec2) -> Self {
        let tags = normalize_tags(&mut record.tags);
        let label = record.display_label();
        let radius = radius_for_label(&label);
        let style = StyleToken::for_id(&record.id);

        Self {
            record,
            tags,
            label,
            radius,
            style,
            position,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    /// Replaces the record fields. The id and style token are kept; the radius
    /// is only re-derived when the label changed.
    pub fn apply_edit(&mut self, mut record: ContactRecord) {
        record.id = self.record.id.clone();
        self.tags = normalize_tags(&mut record.tags);

        let label = record.display_label();
        if label != self.label {
            self.radius = radius_for_label(&label);
            self.label = label;
        }
        self.record = record;
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &ContactRecord {
        &self.record
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn style(&self) -> StyleToken {
        self.style
    }
}

fn normalize_tags(tags: &mut Vec<String>) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    tags.retain_mut(|tag| {
        let trimmed = tag.trim();
        if trimmed.len() != tag.len() {
            *tag = trimmed.to_owned();
        }
        !tag.is_empty() && seen.insert(tag.clone())
    });
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, first: &str, tags: &[&str]) -> ContactRecord {
        ContactRecord {
            id: id.into(),
            first_name: first.into(),
            tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
            ..ContactRecord::default()
        }
    }

    #[test]
    fn radius_stays_in_bounds() {
        assert_eq!(radius_for_label(""), MIN_RADIUS);
        assert_eq!(radius_for_label("Al"), MIN_RADIUS);
        assert_eq!(radius_for_label(&"x".repeat(200)), MAX_RADIUS);
        let mid = radius_for_label("Jane Roe");
        assert!((MIN_RADIUS..=MAX_RADIUS).contains(&mid));
        assert_eq!(mid, radius_for_label("Jane Roe"));
    }

    #[test]
    fn creation_normalizes_tags() {
        let node = ContactNode::create(record("1", "Jane", &[" vip", "vip", "", "client "]), Vec2::ZERO);
        assert_eq!(node.record().tags, vec!["vip".to_owned(), "client".to_owned()]);
        assert_eq!(node.tags().len(), 2);
    }

    #[test]
    fn style_and_radius_survive_unrelated_edits() {
        let mut node = ContactNode::create(record("1", "Jane", &["vip"]), Vec2::ZERO);
        let style = node.style();
        let radius = node.radius();

        let mut edited = node.record().clone();
        edited.company = "Acme".into();
        edited.tags = vec!["client".into()];
        node.apply_edit(edited);
        assert_eq!(node.style(), style);
        assert_eq!(node.radius(), radius);
        assert!(node.tags().contains("client"));

        let mut renamed = node.record().clone();
        renamed.first_name = "Janet Marie Longname".into();
        node.apply_edit(renamed);
        assert_eq!(node.style(), style);
        assert!(node.radius() > radius);
    }

    #[test]
    fn edit_keeps_id() {
        let mut node = ContactNode::create(record("1", "Jane", &[]), Vec2::ZERO);
        node.apply_edit(record("other", "Jane", &[]));
        assert_eq!(node.id(), "1");
    }

    #[test]
    fn style_token_is_stable_per_id() {
        let a = ContactNode::create(record("abc", "A", &[]), Vec2::ZERO);
        let b = ContactNode::create(record("abc", "B", &[]), Vec2::ZERO);
        assert_eq!(a.style(), b.style());
        assert!(a.style().0 < STYLE_COUNT);
    }

    #[test]
    fn style_token_uses_fixed_fnv_hash() {
        // FNV-1a 64: "" = 0xcbf29ce484222325, "a" = 0xaf63dc4c8601ec8c.
        assert_eq!(StyleToken::for_id(""), StyleToken(7));
        assert_eq!(StyleToken::for_id("a"), StyleToken(6));
    }
}
