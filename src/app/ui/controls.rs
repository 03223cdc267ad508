use eframe::egui::{self, RichText, Ui};

use crate::contacts::{spawn_export, spawn_import};
use crate::engine::{InteractionEvent, ZOOM_MAX, ZOOM_MIN};

use super::super::ViewModel;

const SEARCH_RESULT_LIMIT: usize = 12;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_search(ui);
                ui.separator();
                self.draw_tag_filter(ui);
                ui.separator();
                self.draw_view_controls(ui);
                ui.separator();
                self.draw_csv_controls(ui);
                ui.separator();
                self.draw_physics_controls(ui);
            });
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("name, email, company, tag...")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.engine.set_search(&self.search);
        }

        let results = self
            .engine
            .search_results(SEARCH_RESULT_LIMIT)
            .into_iter()
            .map(|node| (node.id().to_owned(), node.label().to_owned()))
            .collect::<Vec<_>>();

        if !self.search.trim().is_empty() && results.is_empty() {
            ui.small("No contacts match.");
        }

        let mut picked = None;
        for (id, label) in results {
            let selected = self.engine.focus() == Some(id.as_str());
            if ui.selectable_label(selected, label).clicked() {
                picked = Some(id);
            }
        }
        if let Some(id) = picked {
            self.engine.handle(InteractionEvent::FocusContact { id: id.clone() });
            self.open_form_for(&id);
        }
    }

    fn draw_tag_filter(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Tags");
            let clear = ui.add_enabled(!self.engine.filter().is_empty(), egui::Button::new("Clear"));
            if clear.clicked() {
                self.engine.handle(InteractionEvent::ClearFilter);
            }
        });

        if self.engine.tag_index().is_empty() {
            ui.small("No tags yet.");
            return;
        }

        let chips = self
            .engine
            .tag_index()
            .iter()
            .map(|(tag, entry)| {
                let members = self
                    .engine
                    .tag_index()
                    .members(tag)
                    .iter()
                    .filter_map(|id| self.engine.contact(id))
                    .map(|node| node.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                (
                    tag.to_owned(),
                    entry.count,
                    self.engine.filter().contains(tag),
                    members,
                )
            })
            .collect::<Vec<_>>();

        let mut toggled = None;
        ui.horizontal_wrapped(|ui| {
            for (tag, count, selected, members) in &chips {
                let chip = ui
                    .selectable_label(*selected, format!("{tag} ({count})"))
                    .on_hover_text(members.as_str());
                if chip.clicked() {
                    toggled = Some(tag.clone());
                }
            }
        });
        if let Some(tag) = toggled {
            self.engine.handle(InteractionEvent::ToggleTag { tag });
        }

        if let Some(focus) = self.engine.focus()
            && let Some(node) = self.engine.contact(focus)
        {
            ui.small(format!("Focused on {}", node.label()));
        }
    }

    fn draw_view_controls(&mut self, ui: &mut Ui) {
        ui.heading("View");
        let mut zoom = self.engine.viewport().zoom();
        let slider = ui.add(
            egui::Slider::new(&mut zoom, ZOOM_MIN..=ZOOM_MAX)
                .text("Zoom")
                .clamping(egui::SliderClamping::Always),
        );
        if slider.changed() {
            self.engine.handle(InteractionEvent::ZoomSlider { zoom });
        }
        if ui.button("Reset view").clicked() {
            self.engine.handle(InteractionEvent::ZoomReset);
        }
    }

    fn draw_csv_controls(&mut self, ui: &mut Ui) {
        ui.heading("CSV");
        ui.add(
            egui::TextEdit::singleline(&mut self.csv_path)
                .hint_text("path/to/contacts.csv")
                .desired_width(f32::INFINITY),
        );

        let idle = !self.transfer_pending();
        ui.horizontal(|ui| {
            if ui.add_enabled(idle, egui::Button::new("Import")).clicked() {
                self.transfer_rx = Some(spawn_import(self.csv_path.clone()));
            }
            if ui.add_enabled(idle, egui::Button::new("Export")).clicked() {
                self.transfer_rx = Some(spawn_export(self.csv_path.clone(), self.engine.records()));
            }
            if !idle {
                ui.spinner();
            }
        });
    }

    fn draw_physics_controls(&mut self, ui: &mut Ui) {
        ui.collapsing(RichText::new("Physics").strong(), |ui| {
            let toggles = self.engine.force_toggles_mut();
            ui.checkbox(&mut toggles.charge, "Charge")
                .on_hover_text("Mutual repulsion between bubbles.");
            ui.checkbox(&mut toggles.centering, "Centering");
            ui.checkbox(&mut toggles.collision, "Collision")
                .on_hover_text("Keeps bubbles from overlapping.");
            ui.checkbox(&mut toggles.radial, "Radial zones");
            ui.checkbox(&mut toggles.tag_attraction, "Tag attraction")
                .on_hover_text("Pulls contacts that share tags together.");
            ui.checkbox(&mut toggles.drift, "Drift");

            ui.add_space(4.0);
            let config = self.engine.force_config_mut();
            ui.add(
                egui::Slider::new(&mut config.charge_strength, -200.0..=0.0)
                    .text("Charge strength"),
            );
            ui.add(
                egui::Slider::new(&mut config.tag_attraction_strength, 0.0..=0.02)
                    .text("Tag attraction"),
            );
            ui.add(egui::Slider::new(&mut config.drift_magnitude, 0.0..=1.0).text("Drift"));
            ui.add(
                egui::Slider::new(&mut config.velocity_decay, 0.05..=0.9)
                    .text("Velocity decay")
                    .clamping(egui::SliderClamping::Always),
            );
        });
    }
}
