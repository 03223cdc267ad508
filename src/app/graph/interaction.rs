use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use crate::engine::{Gesture, InteractionEvent};

use super::super::ViewModel;

fn local(rect: Rect, pos: Pos2) -> Vec2 {
    pos - rect.min
}

impl ViewModel {
    /// Translates this frame's canvas input into engine events, in the order
    /// they happened.
    pub(in crate::app) fn canvas_events(
        &self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> Vec<InteractionEvent> {
        let mut events = Vec::new();

        let size = rect.size();
        if (self.engine.viewport().size() - size).length() > 0.5 {
            events.push(InteractionEvent::Resize {
                width: size.x,
                height: size.y,
            });
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin {
                events.push(InteractionEvent::PointerDown {
                    at: local(rect, origin),
                });
            }
        }

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            events.push(InteractionEvent::PointerMove {
                at: local(rect, pointer),
            });
        }

        if response.drag_stopped() {
            events.push(InteractionEvent::PointerUp);
        } else if !matches!(self.engine.gesture(), Gesture::Idle)
            && ui.input(|input| input.pointer.hover_pos()).is_none()
        {
            events.push(InteractionEvent::PointerLeave);
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            events.push(InteractionEvent::Click {
                at: local(rect, pointer),
            });
        }

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                events.push(InteractionEvent::Wheel {
                    notches: scroll.signum(),
                });
            }
        }

        events
    }

    pub(in crate::app) fn apply_canvas_events(&mut self, events: Vec<InteractionEvent>) {
        for event in events {
            let is_click = matches!(event, InteractionEvent::Click { .. });
            let focus_before = self.engine.focus().map(str::to_owned);
            self.engine.handle(event);

            if is_click {
                let focus_after = self.engine.focus().map(str::to_owned);
                if focus_after != focus_before {
                    match focus_after {
                        Some(id) => self.open_form_for(&id),
                        None => self.form = None,
                    }
                }
            }
        }
    }

    pub(in crate::app) fn hovered_contact(&self, ui: &Ui, rect: Rect) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }
        self.engine.hit_test(local(rect, pointer))
    }
}
