use eframe::egui::Vec2;

use super::Engine;
use super::interaction::Gesture;
use super::node::StyleToken;
use super::tags::MatchLevel;
use super::viewport::ViewTransform;

const HIDDEN_OPACITY: f32 = 0.12;
const NO_MATCH_OPACITY: f32 = 0.35;
const PARTIAL_OPACITY: f32 = 0.8;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
    pub id: String,
    pub label: String,
    pub position: Vec2,
    pub radius: f32,
    pub style: StyleToken,
    pub opacity: f32,
    pub match_level: Option<MatchLevel>,
    pub visible: bool,
    pub focused: bool,
    pub dragged: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkSnapshot {
    pub from: Vec2,
    pub to: Vec2,
    pub weight: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub links: Vec<LinkSnapshot>,
    pub center: Vec2,
    pub zone_rings: Vec<f32>,
    pub transform: ViewTransform,
}

fn opacity_for(visible: bool, match_level: Option<MatchLevel>) -> f32 {
    if !visible {
        return HIDDEN_OPACITY;
    }
    match match_level {
        None | Some(MatchLevel::Exact) => 1.0,
        Some(MatchLevel::Partial) => PARTIAL_OPACITY,
        Some(MatchLevel::NoMatch) => NO_MATCH_OPACITY,
    }
}

impl Engine {
    /// Draw-ordered snapshot: hidden nodes first, then by match level, with the
    /// focused and dragged nodes on top.
    pub fn snapshot(&self) -> FrameSnapshot {
        let dragged_id = match &self.gesture {
            Gesture::DraggingBubble { id, .. } => Some(id.as_str()),
            _ => None,
        };

        let mut nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let visible = self.derived.visible.get(index).copied().unwrap_or(true);
                let match_level = self.derived.match_levels.get(index).copied().flatten();
                NodeSnapshot {
                    id: node.id().to_owned(),
                    label: node.label().to_owned(),
                    position: node.position,
                    radius: node.radius(),
                    style: node.style(),
                    opacity: opacity_for(visible, match_level),
                    match_level,
                    visible,
                    focused: self.focus.as_deref() == Some(node.id()),
                    dragged: dragged_id == Some(node.id()),
                }
            })
            .collect::<Vec<_>>();
        nodes.sort_by_key(|node| (node.visible, node.match_level, node.focused, node.dragged));

        let links = self
            .derived
            .links
            .iter()
            .map(|link| LinkSnapshot {
                from: self.nodes[link.source].position,
                to: self.nodes[link.target].position,
                weight: link.weight,
            })
            .collect();

        let zones = self.viewport.zone_radii();
        let zone_rings = if self.filter.is_empty() {
            vec![zones[2]]
        } else {
            zones.to_vec()
        };

        FrameSnapshot {
            nodes,
            links,
            center: self.viewport.center(),
            zone_rings,
            transform: self.viewport.transform(),
        }
    }
}
