mod forces;

use eframe::egui::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::links::Link;
use super::node::ContactNode;
use super::tags::MatchLevel;
use forces::{
    apply_centering, apply_charge, apply_collision, apply_drift, apply_radial,
    apply_tag_attraction, integrate,
};

pub const ALPHA_FLOOR: f32 = 0.05;
pub const ALPHA_DRAG: f32 = 0.3;
const ALPHA_DECAY: f32 = 0.0228;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
    pub charge_strength: f32,
    pub charge_distance_min: f32,
    pub centering_strength: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub radial_strength_unfiltered: f32,
    pub radial_strength_filtered: f32,
    pub drift_magnitude: f32,
    pub tag_attraction_strength: f32,
    pub velocity_decay: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge_strength: -50.0,
            charge_distance_min: 10.0,
            centering_strength: 1.0,
            collision_padding: 5.0,
            collision_strength: 0.8,
            radial_strength_unfiltered: 0.2,
            radial_strength_filtered: 0.4,
            drift_magnitude: 0.25,
            tag_attraction_strength: 0.002,
            velocity_decay: 0.4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForceToggles {
    pub charge: bool,
    pub centering: bool,
    pub collision: bool,
    pub radial: bool,
    pub drift: bool,
    pub tag_attraction: bool,
}

impl Default for ForceToggles {
    fn default() -> Self {
        Self {
            charge: true,
            centering: true,
            collision: true,
            radial: true,
            drift: true,
            tag_attraction: true,
        }
    }
}

/// Simulation temperature. Decays toward a nonzero floor so the layout never freezes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alpha {
    value: f32,
    target: f32,
}

impl Default for Alpha {
    fn default() -> Self {
        Self {
            value: 1.0,
            target: ALPHA_FLOOR,
        }
    }
}

impl Alpha {
    pub fn value(self) -> f32 {
        self.value
    }

    pub fn reheat(&mut self) {
        self.value = 1.0;
    }

    /// Dragging lifts alpha to at least `ALPHA_DRAG` and holds it there;
    /// releasing lets it decay back to the floor.
    pub fn set_dragging(&mut self, dragging: bool) {
        if dragging {
            self.target = ALPHA_DRAG;
            self.value = self.value.max(ALPHA_DRAG);
        } else {
            self.target = ALPHA_FLOOR;
        }
    }

    fn step(&mut self) {
        self.value = (self.value + (self.target - self.value) * ALPHA_DECAY).clamp(0.0, 1.0);
    }
}

pub struct ForceField<'a> {
    pub center: Vec2,
    pub zone_radii: [f32; 3],
    pub filtered: bool,
    pub match_levels: &'a [Option<MatchLevel>],
    pub links: &'a [Link],
}

pub struct ForceSimulation {
    pub config: ForceConfig,
    pub toggles: ForceToggles,
    alpha: Alpha,
    rng: StdRng,
}

impl ForceSimulation {
    pub fn new(seed: u64) -> Self {
        Self {
            config: ForceConfig::default(),
            toggles: ForceToggles::default(),
            alpha: Alpha::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub fn reheat(&mut self) {
        self.alpha.reheat();
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.alpha.set_dragging(dragging);
    }

    pub fn tick(&mut self, nodes: &mut [ContactNode], field: &ForceField<'_>) {
        self.alpha.step();
        let alpha = self.alpha.value();
        let config = self.config;
        let toggles = self.toggles;

        if toggles.charge {
            apply_charge(nodes, config.charge_strength, alpha, config.charge_distance_min);
        }
        if toggles.centering {
            apply_centering(nodes, field.center, config.centering_strength);
        }
        if toggles.collision {
            apply_collision(nodes, config.collision_padding, config.collision_strength);
        }
        if toggles.radial {
            let strength = if field.filtered {
                config.radial_strength_filtered
            } else {
                config.radial_strength_unfiltered
            };
            apply_radial(
                nodes,
                field.match_levels,
                field.zone_radii,
                field.center,
                strength,
                alpha,
            );
        }
        if toggles.tag_attraction {
            apply_tag_attraction(nodes, field.links, config.tag_attraction_strength, alpha);
        }
        if toggles.drift {
            apply_drift(nodes, &mut self.rng, config.drift_magnitude);
        }

        integrate(nodes, config.velocity_decay);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::contacts::ContactRecord;

    fn node(id: &str, position: Vec2) -> ContactNode {
        ContactNode::create(
            ContactRecord {
                id: id.into(),
                first_name: id.into(),
                ..ContactRecord::default()
            },
            position,
        )
    }

    fn only(toggles: impl FnOnce(&mut ForceToggles)) -> ForceSimulation {
        let mut simulation = ForceSimulation::new(7);
        simulation.toggles = ForceToggles {
            charge: false,
            centering: false,
            collision: false,
            radial: false,
            drift: false,
            tag_attraction: false,
        };
        toggles(&mut simulation.toggles);
        simulation
    }

    fn field<'a>(levels: &'a [Option<MatchLevel>], links: &'a [Link]) -> ForceField<'a> {
        ForceField {
            center: vec2(400.0, 300.0),
            zone_radii: [66.0, 132.0, 220.0],
            filtered: levels.iter().any(Option::is_some),
            match_levels: levels,
            links,
        }
    }

    #[test]
    fn alpha_decays_to_floor_and_reheats() {
        let mut alpha = Alpha::default();
        for _ in 0..2000 {
            alpha.step();
        }
        assert!((alpha.value() - ALPHA_FLOOR).abs() < 1e-3);
        assert!(alpha.value() > 0.0);

        alpha.set_dragging(true);
        for _ in 0..2000 {
            alpha.step();
        }
        assert!((alpha.value() - ALPHA_DRAG).abs() < 1e-3);

        alpha.reheat();
        assert_eq!(alpha.value(), 1.0);
    }

    #[test]
    fn empty_tick_is_a_noop() {
        let mut simulation = ForceSimulation::new(1);
        simulation.tick(&mut [], &field(&[], &[]));
        assert!(simulation.alpha().value() < 1.0);
    }

    #[test]
    fn charge_pushes_nodes_apart() {
        let mut simulation = only(|toggles| toggles.charge = true);
        let mut nodes = [node("a", vec2(390.0, 300.0)), node("b", vec2(410.0, 300.0))];
        simulation.tick(&mut nodes, &field(&[], &[]));
        assert!(nodes[0].position.x < 390.0);
        assert!(nodes[1].position.x > 410.0);
    }

    #[test]
    fn collision_separates_overlap() {
        let mut simulation = only(|toggles| toggles.collision = true);
        let mut nodes = [node("a", vec2(400.0, 300.0)), node("b", vec2(401.0, 300.0))];
        let before = (nodes[1].position - nodes[0].position).length();
        for _ in 0..5 {
            simulation.tick(&mut nodes, &field(&[], &[]));
        }
        assert!((nodes[1].position - nodes[0].position).length() > before);
    }

    #[test]
    fn centering_moves_centroid_to_center() {
        let mut simulation = only(|toggles| toggles.centering = true);
        let mut nodes = [node("a", vec2(0.0, 0.0)), node("b", vec2(100.0, 0.0))];
        simulation.tick(&mut nodes, &field(&[], &[]));
        let centroid = (nodes[0].position + nodes[1].position) * 0.5;
        assert!((centroid - vec2(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn radial_pulls_exact_matches_inward() {
        let mut simulation = only(|toggles| toggles.radial = true);
        let mut nodes = [node("a", vec2(700.0, 300.0)), node("b", vec2(700.0, 300.0))];
        let levels = [Some(MatchLevel::Exact), Some(MatchLevel::NoMatch)];
        for _ in 0..300 {
            simulation.tick(&mut nodes, &field(&levels, &[]));
        }
        let center = vec2(400.0, 300.0);
        let exact = (nodes[0].position - center).length();
        let other = (nodes[1].position - center).length();
        assert!((exact - 66.0).abs() < 10.0, "exact settled at {exact}");
        assert!((other - 220.0).abs() < 10.0, "other settled at {other}");
    }

    #[test]
    fn tag_attraction_pulls_linked_nodes_together() {
        let mut simulation = only(|toggles| toggles.tag_attraction = true);
        let mut nodes = [node("a", vec2(100.0, 300.0)), node("b", vec2(700.0, 300.0))];
        let links = [Link {
            source: 0,
            target: 1,
            weight: 3,
        }];
        simulation.tick(&mut nodes, &field(&[], &links));
        assert!(nodes[0].position.x > 100.0);
        assert!(nodes[1].position.x < 700.0);
    }

    #[test]
    fn drift_keeps_nodes_moving_at_rest() {
        let mut simulation = only(|toggles| toggles.drift = true);
        let mut nodes = [node("a", vec2(400.0, 300.0))];
        for _ in 0..3000 {
            simulation.tick(&mut nodes, &field(&[], &[]));
        }
        let before = nodes[0].position;
        simulation.tick(&mut nodes, &field(&[], &[]));
        assert_ne!(nodes[0].position, before);
    }

    #[test]
    fn pinned_node_holds_exactly() {
        let mut simulation = ForceSimulation::new(3);
        let pin = vec2(400.0, 300.0);
        let mut nodes = [node("a", pin), node("b", vec2(405.0, 300.0))];
        nodes[0].pin = Some(pin);
        for _ in 0..50 {
            simulation.tick(&mut nodes, &field(&[], &[]));
            assert_eq!(nodes[0].position, pin);
            assert_eq!(nodes[0].velocity, Vec2::ZERO);
        }
        assert!((nodes[1].position - pin).length() > 5.0);
    }

    #[test]
    fn full_simulation_stays_finite() {
        let mut simulation = ForceSimulation::new(11);
        let mut nodes = (0..30)
            .map(|index| node(&format!("n{index}"), vec2(400.0, 300.0)))
            .collect::<Vec<_>>();
        let levels = vec![None; nodes.len()];
        for _ in 0..500 {
            simulation.tick(&mut nodes, &field(&levels, &[]));
        }
        for node in &nodes {
            assert!(node.position.x.is_finite() && node.position.y.is_finite());
            assert!((node.position - vec2(400.0, 300.0)).length() < 2000.0);
        }
    }
}
