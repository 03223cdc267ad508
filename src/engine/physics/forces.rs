use eframe::egui::{Vec2, vec2};
use rand::Rng;

use super::super::links::Link;
use super::super::node::ContactNode;
use super::super::tags::MatchLevel;

fn fallback_direction(first: usize, second: usize) -> Vec2 {
    let angle = ((first as f32) * 0.618_034 + (second as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

pub(super) fn apply_charge(nodes: &mut [ContactNode], strength: f32, alpha: f32, distance_min: f32) {
    let distance_min_sq = distance_min * distance_min;
    for first in 0..nodes.len() {
        for second in (first + 1)..nodes.len() {
            let mut delta = nodes[second].position - nodes[first].position;
            if delta.length_sq() <= 1e-6 {
                delta = fallback_direction(first, second) * 1e-3;
            }
            let distance_sq = delta.length_sq().max(distance_min_sq);
            let push = delta * (strength * alpha / distance_sq);

            nodes[first].velocity += push;
            nodes[second].velocity -= push;
        }
    }
}

pub(super) fn apply_centering(nodes: &mut [ContactNode], center: Vec2, strength: f32) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.position;
    }
    centroid /= nodes.len() as f32;

    let shift = (centroid - center) * strength;
    for node in nodes.iter_mut() {
        node.position -= shift;
    }
}

/// Soft minimum separation of `r_i + r_j + padding`, resolved on predicted
/// positions and split by radius-squared mass.
pub(super) fn apply_collision(nodes: &mut [ContactNode], padding: f32, strength: f32) {
    for first in 0..nodes.len() {
        for second in (first + 1)..nodes.len() {
            let radius_first = nodes[first].radius();
            let radius_second = nodes[second].radius();
            let min_distance = radius_first + radius_second + padding;

            let mut delta = (nodes[second].position + nodes[second].velocity)
                - (nodes[first].position + nodes[first].velocity);
            if delta.length_sq() <= 1e-6 {
                delta = fallback_direction(first, second) * 1e-3;
            }
            let distance_sq = delta.length_sq();
            if distance_sq >= min_distance * min_distance {
                continue;
            }

            let distance = distance_sq.sqrt();
            let correction = delta * ((min_distance - distance) / distance * strength);
            let mass_first = radius_first * radius_first;
            let mass_second = radius_second * radius_second;
            let share_first = mass_second / (mass_first + mass_second);

            nodes[first].velocity -= correction * share_first;
            nodes[second].velocity += correction * (1.0 - share_first);
        }
    }
}

pub(super) fn apply_radial(
    nodes: &mut [ContactNode],
    match_levels: &[Option<MatchLevel>],
    zone_radii: [f32; 3],
    center: Vec2,
    strength: f32,
    alpha: f32,
) {
    for (index, node) in nodes.iter_mut().enumerate() {
        let zone = match_levels
            .get(index)
            .copied()
            .flatten()
            .map_or(2, MatchLevel::zone);
        let target = zone_radii[zone];

        let offset = node.position - center;
        let distance = offset.length().max(1e-6);
        let k = (target - distance) * strength * alpha / distance;
        node.velocity += offset * k;
    }
}

/// Random velocity kick that keeps the layout moving at rest. Not scaled by alpha.
pub(super) fn apply_drift(nodes: &mut [ContactNode], rng: &mut impl Rng, magnitude: f32) {
    if magnitude <= 0.0 {
        return;
    }
    for node in nodes.iter_mut() {
        node.velocity += vec2(
            rng.gen_range(-magnitude..=magnitude),
            rng.gen_range(-magnitude..=magnitude),
        );
    }
}

pub(super) fn apply_tag_attraction(
    nodes: &mut [ContactNode],
    links: &[Link],
    strength: f32,
    alpha: f32,
) {
    for link in links {
        if link.source >= nodes.len() || link.target >= nodes.len() || link.source == link.target {
            continue;
        }

        let delta = nodes[link.target].position - nodes[link.source].position;
        let k = (strength * alpha * link.weight as f32).min(0.25);
        let pull = delta * k;

        nodes[link.source].velocity += pull;
        nodes[link.target].velocity -= pull;
    }
}

/// Applies velocity decay and moves nodes. Pinned nodes sit exactly on their pin.
pub(super) fn integrate(nodes: &mut [ContactNode], velocity_decay: f32) {
    let keep = 1.0 - velocity_decay.clamp(0.0, 1.0);
    for node in nodes.iter_mut() {
        if let Some(pin) = node.pin {
            node.position = pin;
            node.velocity = Vec2::ZERO;
            continue;
        }

        node.velocity *= keep;
        node.position += node.velocity;
    }
}
