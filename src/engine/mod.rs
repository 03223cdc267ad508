//! Layout and interaction engine for the bubble view.
//!
//! [`Engine`] owns the contact nodes, the tag filter, focus, viewport and the
//! force simulation. Every mutation re-derives tags, match levels, the visible
//! set and links from scratch before returning, so the next [`Engine::tick`]
//! never sees half-updated state.

mod interaction;
mod links;
mod node;
mod physics;
mod search;
mod snapshot;
mod tags;
mod viewport;

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::contacts::ContactRecord;

pub use interaction::{Gesture, InteractionEvent};
pub use links::Link;
pub use node::{ContactNode, STYLE_COUNT, StyleToken};
pub use physics::{Alpha, ForceConfig, ForceToggles};
pub use snapshot::FrameSnapshot;
pub use tags::{MatchLevel, TagFilter, TagIndex};
pub use viewport::{ViewTransform, Viewport, ZOOM_MAX, ZOOM_MIN};

use links::derive_links;
use physics::{ForceField, ForceSimulation};
use search::{matches_search, rank_search_results};
use tags::classify;

#[derive(Default)]
struct Derived {
    tag_index: TagIndex,
    index_by_id: HashMap<String, usize>,
    match_levels: Vec<Option<MatchLevel>>,
    visible: Vec<bool>,
    visible_indices: Vec<usize>,
    links: Vec<Link>,
}

pub struct Engine {
    nodes: Vec<ContactNode>,
    filter: TagFilter,
    focus: Option<String>,
    search: String,
    viewport: Viewport,
    simulation: ForceSimulation,
    gesture: Gesture,
    pending_delete: Option<String>,
    derived: Derived,
    placement_rng: StdRng,
    contacts_revision: u64,
}

impl Engine {
    pub fn new(records: Vec<ContactRecord>, width: f32, height: f32, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut engine = Self {
            nodes: Vec::with_capacity(records.len()),
            filter: TagFilter::default(),
            focus: None,
            search: String::new(),
            viewport: Viewport::new(width, height),
            simulation: ForceSimulation::new(seed),
            gesture: Gesture::Idle,
            pending_delete: None,
            derived: Derived::default(),
            placement_rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            contacts_revision: 0,
        };

        for record in records {
            engine.push_node(record);
        }
        engine.rederive();
        tracing::debug!(contacts = engine.nodes.len(), seed, "engine created");
        engine
    }

    fn spawn_position(&mut self) -> Vec2 {
        let outer = self.viewport.zone_radii()[2].max(1.0);
        let angle = self.placement_rng.gen_range(0.0..TAU);
        let distance = outer * self.placement_rng.gen_range(0.0_f32..1.0).sqrt();
        self.viewport.center() + vec2(angle.cos(), angle.sin()) * distance
    }

    /// Appends a node, replacing a missing or duplicate id. Returns the id used.
    fn push_node(&mut self, mut record: ContactRecord) -> String {
        if record.id.trim().is_empty() || self.nodes.iter().any(|node| node.id() == record.id) {
            record.id = ContactRecord::with_new_id().id;
        }
        let position = self.spawn_position();
        let node = ContactNode::create(record, position);
        let id = node.id().to_owned();
        self.nodes.push(node);
        id
    }

    fn contacts_changed(&mut self) {
        self.contacts_revision = self.contacts_revision.wrapping_add(1);
        self.rederive();
        self.simulation.reheat();
    }

    pub fn add_contact(&mut self, record: ContactRecord) -> String {
        let id = self.push_node(record);
        tracing::debug!(%id, "contact added");
        self.contacts_changed();
        id
    }

    pub fn import_contacts(&mut self, records: Vec<ContactRecord>) -> usize {
        let count = records.len();
        if count == 0 {
            return 0;
        }
        for record in records {
            self.push_node(record);
        }
        tracing::info!(count, total = self.nodes.len(), "contacts imported");
        self.contacts_changed();
        count
    }

    /// Replaces the fields of the contact with `record.id`. A focused contact
    /// keeps focus and the filter follows its new tags.
    pub fn update_contact(&mut self, record: ContactRecord) -> bool {
        let Some(index) = self.index_of(&record.id) else {
            return false;
        };
        self.nodes[index].apply_edit(record);
        if self.focus.as_deref() == Some(self.nodes[index].id()) {
            self.filter.replace(self.nodes[index].tags());
        }
        self.contacts_changed();
        true
    }

    pub fn request_delete(&mut self, id: &str) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id.to_owned());
        true
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Completes a pending deletion. Declining leaves every contact untouched.
    pub fn resolve_delete(&mut self, confirmed: bool) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        if !confirmed {
            return false;
        }
        self.remove_contact(&id)
    }

    fn remove_contact(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        if matches!(&self.gesture, Gesture::DraggingBubble { id: dragged, .. } if dragged == id) {
            self.gesture = Gesture::Idle;
            self.simulation.set_dragging(false);
        }
        if self.focus.as_deref() == Some(id) {
            self.focus = None;
        }

        self.nodes.remove(index);
        tracing::debug!(%id, "contact deleted");
        self.contacts_changed();
        true
    }

    pub fn set_search(&mut self, query: &str) {
        if self.search == query {
            return;
        }
        self.search = query.to_owned();
        self.rederive();
    }

    pub fn search_results(&self, limit: usize) -> Vec<&ContactNode> {
        rank_search_results(
            &self.nodes,
            &self.derived.visible_indices,
            &self.search,
            limit,
        )
        .into_iter()
        .map(|index| &self.nodes[index])
        .collect()
    }

    fn rederive(&mut self) {
        let derived = &mut self.derived;
        derived.tag_index = TagIndex::build(&self.nodes);
        derived.index_by_id = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id().to_owned(), index))
            .collect();
        derived.match_levels = self
            .nodes
            .iter()
            .map(|node| classify(node.tags(), &self.filter))
            .collect();
        derived.visible = self
            .nodes
            .iter()
            .map(|node| matches_search(node.record(), &self.search))
            .collect();
        derived.visible_indices = derived
            .visible
            .iter()
            .enumerate()
            .filter_map(|(index, visible)| visible.then_some(index))
            .collect();
        derived.links = derive_links(&self.nodes, &derived.visible_indices);
    }

    pub fn tick(&mut self) {
        let field = ForceField {
            center: self.viewport.center(),
            zone_radii: self.viewport.zone_radii(),
            filtered: !self.filter.is_empty(),
            match_levels: &self.derived.match_levels,
            links: &self.derived.links,
        };
        self.simulation.tick(&mut self.nodes, &field);
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.derived.index_by_id.get(id).copied()
    }

    pub fn contact(&self, id: &str) -> Option<&ContactNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn contacts(&self) -> &[ContactNode] {
        &self.nodes
    }

    pub fn records(&self) -> Vec<ContactRecord> {
        self.nodes.iter().map(|node| node.record().clone()).collect()
    }

    pub fn contacts_revision(&self) -> u64 {
        self.contacts_revision
    }

    #[cfg(test)]
    pub fn match_level(&self, id: &str) -> Option<MatchLevel> {
        self.index_of(id)
            .and_then(|index| self.derived.match_levels[index])
    }

    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.derived.tag_index
    }

    pub fn links(&self) -> &[Link] {
        &self.derived.links
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn alpha(&self) -> Alpha {
        self.simulation.alpha()
    }

    pub fn force_config_mut(&mut self) -> &mut ForceConfig {
        &mut self.simulation.config
    }

    pub fn force_toggles_mut(&mut self) -> &mut ForceToggles {
        &mut self.simulation.toggles
    }
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

    fn scenario() -> Engine {
        Engine::new(
            vec![
                record("a", "Alice", &["x", "y"]),
                record("b", "Bob", &["y"]),
                record("c", "Carol", &[]),
            ],
            800.0,
            600.0,
            Some(42),
        )
    }

    fn link_ids(engine: &Engine) -> Vec<(String, String, usize)> {
        engine
            .links()
            .iter()
            .map(|link| {
                (
                    engine.contacts()[link.source].id().to_owned(),
                    engine.contacts()[link.target].id().to_owned(),
                    link.weight,
                )
            })
            .collect()
    }

    #[test]
    fn scenario_links_and_classification() {
        let mut engine = scenario();
        assert_eq!(link_ids(&engine), vec![("a".into(), "b".into(), 1)]);
        assert_eq!(engine.match_level("a"), None);

        engine.handle(InteractionEvent::ToggleTag { tag: "x".into() });
        engine.handle(InteractionEvent::ToggleTag { tag: "y".into() });
        assert_eq!(engine.match_level("a"), Some(MatchLevel::Exact));
        assert_eq!(engine.match_level("b"), Some(MatchLevel::Partial));
        assert_eq!(engine.match_level("c"), Some(MatchLevel::NoMatch));
    }

    #[test]
    fn empty_engine_is_well_defined() {
        let mut engine = Engine::new(Vec::new(), 800.0, 600.0, Some(1));
        engine.tick();
        engine.handle(InteractionEvent::ToggleTag { tag: "x".into() });
        engine.handle(InteractionEvent::PointerDown {
            at: vec2(400.0, 300.0),
        });
        engine.handle(InteractionEvent::PointerUp);
        assert!(engine.links().is_empty());
        assert!(engine.tag_index().is_empty());
        let snapshot = engine.snapshot();
        assert!(snapshot.nodes.is_empty());
        assert_eq!(snapshot.zone_rings.len(), 3);
    }

    #[test]
    fn radius_is_stable_across_ticks() {
        let mut engine = scenario();
        let before = engine.contact("a").map(ContactNode::radius);
        for _ in 0..20 {
            engine.tick();
            let _ = engine.snapshot();
        }
        assert_eq!(engine.contact("a").map(ContactNode::radius), before);
        for node in engine.contacts() {
            assert!((25.0..=90.0).contains(&node.radius()));
        }
    }

    #[test]
    fn search_limits_visible_links() {
        let mut engine = scenario();
        engine.set_search("ali");
        assert!(engine.links().is_empty());
        let snapshot = engine.snapshot();
        let bob = snapshot.nodes.iter().find(|node| node.id == "b").unwrap();
        assert!(!bob.visible);
        assert!(bob.opacity < 0.5);

        let results = engine.search_results(5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id(), "a");

        engine.set_search("");
        assert_eq!(engine.links().len(), 1);
        assert!(engine.search_results(5).is_empty());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut engine = scenario();
        let revision = engine.contacts_revision();
        assert!(engine.request_delete("b"));
        assert_eq!(engine.pending_delete(), Some("b"));
        assert!(!engine.resolve_delete(false));
        assert_eq!(engine.contacts().len(), 3);
        assert_eq!(engine.contacts_revision(), revision);
        assert_eq!(engine.pending_delete(), None);

        assert!(!engine.request_delete("missing"));
        assert!(engine.request_delete("b"));
        assert!(engine.resolve_delete(true));
        assert!(engine.contact("b").is_none());
        assert!(engine.links().is_empty());
    }

    #[test]
    fn deleting_focused_contact_clears_focus_and_its_links() {
        let mut engine = Engine::new(
            vec![
                record("a", "Alice", &["x"]),
                record("b", "Bob", &["x"]),
                record("c", "Carol", &["y"]),
                record("d", "Dan", &["y"]),
            ],
            800.0,
            600.0,
            Some(5),
        );
        assert_eq!(engine.links().len(), 2);

        engine.handle(InteractionEvent::FocusContact { id: "a".into() });
        assert_eq!(engine.focus(), Some("a"));
        engine.request_delete("a");
        engine.resolve_delete(true);

        assert_eq!(engine.focus(), None);
        assert_eq!(link_ids(&engine), vec![("c".into(), "d".into(), 1)]);
        assert!(engine.contacts().iter().all(|node| node.pin.is_none()));
    }

    #[test]
    fn edits_reheat_and_rederive() {
        let mut engine = scenario();
        for _ in 0..200 {
            engine.tick();
        }
        assert!(engine.alpha().value() < 0.5);

        let mut carol = engine.contact("c").unwrap().record().clone();
        carol.tags = vec!["x".into()];
        assert!(engine.update_contact(carol));
        assert_eq!(engine.alpha().value(), 1.0);
        assert_eq!(engine.links().len(), 2);
        assert_eq!(engine.tag_index().count("x"), 2);
        assert!(!engine.update_contact(record("zzz", "Nobody", &[])));
    }

    #[test]
    fn editing_focused_contact_moves_filter() {
        let mut engine = scenario();
        engine.handle(InteractionEvent::FocusContact { id: "b".into() });
        let mut bob = engine.contact("b").unwrap().record().clone();
        bob.tags = vec!["z".into()];
        engine.update_contact(bob);
        assert_eq!(engine.focus(), Some("b"));
        assert!(engine.filter().contains("z"));
        assert_eq!(engine.match_level("b"), Some(MatchLevel::Exact));
    }

    #[test]
    fn duplicate_and_blank_ids_are_replaced() {
        let mut engine = scenario();
        let id = engine.add_contact(record("a", "Second", &[]));
        assert_ne!(id, "a");
        let blank = engine.add_contact(record("", "Blank", &[]));
        assert!(!blank.is_empty());
        assert_eq!(engine.contacts().len(), 5);
    }

    #[test]
    fn import_adds_batch_at_once() {
        let mut engine = scenario();
        let revision = engine.contacts_revision();
        let added = engine.import_contacts(vec![
            record("n1", "New", &["y"]),
            record("n2", "Newer", &["y"]),
        ]);
        assert_eq!(added, 2);
        assert_eq!(engine.contacts_revision(), revision + 1);
        assert_eq!(engine.tag_index().count("y"), 4);
        assert_eq!(engine.import_contacts(Vec::new()), 0);
        assert_eq!(engine.records().len(), 5);
    }

    #[test]
    fn zone_rings_follow_filter() {
        let mut engine = scenario();
        assert_eq!(engine.snapshot().zone_rings.len(), 1);
        engine.handle(InteractionEvent::ToggleTag { tag: "y".into() });
        assert_eq!(engine.snapshot().zone_rings.len(), 3);
    }

    #[test]
    fn snapshot_draws_focused_node_last() {
        let mut engine = scenario();
        engine.handle(InteractionEvent::FocusContact { id: "b".into() });
        let snapshot = engine.snapshot();
        let last = snapshot.nodes.last().unwrap();
        assert_eq!(last.id, "b");
        assert!(last.focused);
        assert_eq!(snapshot.links.len(), 1);
    }
}
