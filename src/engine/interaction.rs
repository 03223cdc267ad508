use eframe::egui::Vec2;

use super::Engine;

/// Input consumed by [`Engine::handle`]. Pointer positions are in screen
/// space relative to the canvas origin.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
    PointerDown { at: Vec2 },
    PointerMove { at: Vec2 },
    PointerUp,
    PointerLeave,
    Click { at: Vec2 },
    FocusContact { id: String },
    Wheel { notches: f32 },
    ZoomSlider { zoom: f32 },
    ZoomReset,
    ToggleTag { tag: String },
    ClearFilter,
    Resize { width: f32, height: f32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingBubble {
        id: String,
        last_pointer: Vec2,
        velocity: Vec2,
    },
    PanningCanvas {
        last_pointer: Vec2,
    },
}

impl Engine {
    pub fn handle(&mut self, event: InteractionEvent) {
        match event {
            InteractionEvent::PointerDown { at } => self.begin_gesture(at),
            InteractionEvent::PointerMove { at } => self.continue_gesture(at),
            InteractionEvent::PointerUp | InteractionEvent::PointerLeave => self.end_gesture(),
            InteractionEvent::Click { at } => {
                if let Some(index) = self.hit_test(at) {
                    let id = self.nodes[index].id().to_owned();
                    self.focus_contact(&id);
                }
            }
            InteractionEvent::FocusContact { id } => {
                self.focus_contact(&id);
            }
            InteractionEvent::Wheel { notches } => self.viewport.zoom_by_notches(notches),
            InteractionEvent::ZoomSlider { zoom } => self.viewport.set_zoom(zoom),
            InteractionEvent::ZoomReset => self.viewport.reset_view(),
            InteractionEvent::ToggleTag { tag } => {
                self.release_focus();
                let selected = self.filter.toggle(&tag);
                tracing::debug!(%tag, selected, "tag filter toggled");
                self.filter_changed();
            }
            InteractionEvent::ClearFilter => {
                self.release_focus();
                self.filter.clear();
                tracing::debug!("tag filter cleared");
                self.filter_changed();
            }
            InteractionEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    fn filter_changed(&mut self) {
        self.rederive();
        self.simulation.reheat();
    }

    pub fn hit_test(&self, at: Vec2) -> Option<usize> {
        let world = self.viewport.to_world(at);
        self.derived
            .visible_indices
            .iter()
            .filter_map(|&index| {
                let node = &self.nodes[index];
                let distance = (node.position - world).length();
                (distance <= node.radius()).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub fn focus_contact(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        self.release_focus();
        let center = self.viewport.center();
        let node = &mut self.nodes[index];
        node.pin = Some(center);
        self.filter.replace(node.tags());
        self.focus = Some(id.to_owned());
        tracing::debug!(%id, "contact focused");
        self.filter_changed();
        true
    }

    /// Drops focus and its center pin. A node mid-drag keeps its drag pin.
    fn release_focus(&mut self) {
        let Some(id) = self.focus.take() else {
            return;
        };
        if self.is_dragging(&id) {
            return;
        }
        if let Some(index) = self.index_of(&id) {
            self.nodes[index].pin = None;
        }
    }

    fn is_dragging(&self, id: &str) -> bool {
        matches!(&self.gesture, Gesture::DraggingBubble { id: dragged, .. } if dragged == id)
    }

    fn begin_gesture(&mut self, at: Vec2) {
        self.end_gesture();

        let Some(index) = self.hit_test(at) else {
            self.gesture = Gesture::PanningCanvas { last_pointer: at };
            return;
        };

        let world = self.viewport.to_world(at);
        let node = &mut self.nodes[index];
        node.pin = Some(world);
        self.gesture = Gesture::DraggingBubble {
            id: node.id().to_owned(),
            last_pointer: at,
            velocity: Vec2::ZERO,
        };
        self.simulation.set_dragging(true);
    }

    fn continue_gesture(&mut self, at: Vec2) {
        let zoom = self.viewport.zoom();
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::PanningCanvas { last_pointer } => {
                let delta = at - *last_pointer;
                *last_pointer = at;
                self.viewport.pan_by(delta);
            }
            Gesture::DraggingBubble {
                id,
                last_pointer,
                velocity,
            } => {
                *velocity = (at - *last_pointer) / zoom;
                *last_pointer = at;
                let pin = self.viewport.to_world(at);
                if let Some(&index) = self.derived.index_by_id.get(id.as_str()) {
                    self.nodes[index].pin = Some(pin);
                }
            }
        }
    }

    /// Ends any gesture. A released bubble keeps its throw velocity; the focused
    /// bubble goes back to its center pin.
    fn end_gesture(&mut self) {
        let gesture = std::mem::take(&mut self.gesture);
        let Gesture::DraggingBubble { id, velocity, .. } = gesture else {
            return;
        };

        self.simulation.set_dragging(false);
        let Some(index) = self.index_of(&id) else {
            return;
        };
        let center = self.viewport.center();
        let focused = self.focus.as_deref() == Some(id.as_str());
        let node = &mut self.nodes[index];
        if focused {
            node.pin = Some(center);
        } else {
            node.pin = None;
            node.velocity = velocity;
        }
    }

    fn resize(&mut self, width: f32, height: f32) {
        if !self.viewport.resize(width, height) {
            return;
        }

        if let Some(id) = self.focus.clone()
            && !self.is_dragging(&id)
            && let Some(index) = self.index_of(&id)
        {
            self.nodes[index].pin = Some(self.viewport.center());
        }
        tracing::debug!(width, height, "viewport resized");
        self.simulation.reheat();
    }
}
