use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};

use super::super::{ContactForm, ViewModel};

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context, data_file: &Path) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Contact Bubbles");
                    ui.separator();
                    ui.label(format!("contacts: {}", self.engine.contacts().len()));
                    ui.label(format!("tags: {}", self.engine.tag_index().len()));
                    ui.label(format!("links: {}", self.engine.links().len()));
                    if ui.button("Add contact").clicked() {
                        self.form = Some(ContactForm::default());
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("alpha {:.3}", self.engine.alpha().value()));
                        ui.small(data_file.display().to_string());
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.form.is_some() {
            egui::SidePanel::right("contact_form")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        self.draw_delete_confirmation(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }
}
