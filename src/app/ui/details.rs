use eframe::egui::{self, Align2, Context, RichText, Ui};

use super::super::ViewModel;

fn form_row(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY));
    ui.end_row();
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        ui.heading(if form.is_new() {
            "New contact"
        } else {
            "Edit contact"
        });
        if let Some(id) = &form.id {
            ui.small(id.as_str());
        }
        ui.add_space(6.0);

        egui::Grid::new("contact_form_grid")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                form_row(ui, "First name", &mut form.first_name);
                form_row(ui, "Last name", &mut form.last_name);
                form_row(ui, "Email", &mut form.email);
                form_row(ui, "Phone", &mut form.phone);
                form_row(ui, "Address", &mut form.address);
                form_row(ui, "Title", &mut form.title);
                form_row(ui, "Company", &mut form.company);
                form_row(ui, "Tags", &mut form.tags);
            });
        ui.small("Separate tags with commas.");

        ui.add_space(10.0);
        let mut save = false;
        let mut delete = false;
        let mut close = false;
        ui.horizontal(|ui| {
            save = ui.button("Save").clicked();
            if !form.is_new() {
                delete = ui.button("Delete").clicked();
            }
            close = ui.button("Close").clicked();
        });

        if save {
            let record = form.to_record();
            if form.is_new() {
                let id = self.engine.add_contact(record);
                self.status = Some("Contact added".to_owned());
                self.open_form_for(&id);
            } else if self.engine.update_contact(record) {
                self.status = Some("Contact saved".to_owned());
            } else {
                self.status = Some("Contact no longer exists".to_owned());
                self.form = None;
            }
        } else if delete {
            if let Some(id) = form.id.clone() {
                self.engine.request_delete(&id);
            }
        } else if close {
            self.form = None;
        }
    }

    pub(in crate::app) fn draw_delete_confirmation(&mut self, ctx: &Context) {
        let Some(pending) = self.engine.pending_delete() else {
            return;
        };
        let label = self
            .engine
            .contact(pending)
            .map(|node| node.label().to_owned())
            .unwrap_or_else(|| pending.to_owned());

        let mut answer = None;
        egui::Window::new("Delete contact?")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(format!("Delete \"{label}\"?")).strong());
                ui.label("This cannot be undone.");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(false);
                    }
                });
            });

        if let Some(confirmed) = answer {
            let removed = self.engine.resolve_delete(confirmed);
            if removed {
                self.form = None;
                self.status = Some(format!("Deleted {label}"));
            }
        }
    }
}
