use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use crate::engine::Gesture;

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, circle_visible, draw_background, match_stroke, style_color, to_screen,
    with_opacity,
};

const LABEL_MIN_SCREEN_RADIUS: f32 = 14.0;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        let events = self.canvas_events(ui, rect, &response);
        self.apply_canvas_events(events);
        self.engine.tick();

        let snapshot = self.engine.snapshot();
        let transform = snapshot.transform;
        let scale = transform.scale;
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, transform);

        let center = to_screen(rect, transform, snapshot.center);
        for radius in &snapshot.zone_rings {
            painter.circle_stroke(
                center,
                radius * scale,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(140, 160, 185, 55)),
            );
        }

        for link in &snapshot.links {
            let from = to_screen(rect, transform, link.from);
            let to = to_screen(rect, transform, link.to);
            let width = (0.6 + link.weight as f32 * 0.5).min(3.0) * scale.sqrt();
            painter.line_segment(
                [from, to],
                Stroke::new(width, Color32::from_rgba_unmultiplied(170, 185, 200, 70)),
            );
        }

        for node in &snapshot.nodes {
            let position = to_screen(rect, transform, node.position);
            let radius = node.radius * scale;
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let base = style_color(node.style);
            let fill = if node.dragged {
                blend_color(base, Color32::WHITE, 0.2)
            } else {
                base
            };
            painter.circle_filled(position, radius, with_opacity(fill, node.opacity));

            let stroke = match_stroke(node.match_level, node.focused);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(stroke.width, with_opacity(stroke.color, node.opacity)),
            );

            if radius >= LABEL_MIN_SCREEN_RADIUS {
                let font_size = (radius * 0.32).clamp(9.0, 18.0);
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    &node.label,
                    FontId::proportional(font_size),
                    with_opacity(Color32::from_rgb(245, 245, 245), node.opacity),
                );
            }
        }

        if let Some(index) = self.hovered_contact(ui, rect)
            && !matches!(self.engine.gesture(), Gesture::PanningCanvas { .. })
        {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
            let node = &self.engine.contacts()[index];
            let mut hover_text = node.label().to_owned();
            if !node.record().email.is_empty() {
                hover_text.push_str(&format!(" | {}", node.record().email));
            }
            if !node.tags().is_empty() {
                let tags = node.tags().iter().cloned().collect::<Vec<_>>().join(", ");
                hover_text.push_str(&format!(" | {tags}"));
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                hover_text,
                FontId::proportional(13.0),
                Color32::from_rgb(230, 230, 230),
            );
        }

        if snapshot.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No contacts yet. Use \"Add contact\" or import a CSV file.",
                FontId::proportional(16.0),
                Color32::from_gray(170),
            );
        }

        // Drift keeps the layout alive, so every frame repaints.
        ui.ctx().request_repaint();
    }
}
