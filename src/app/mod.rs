use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

use eframe::egui::{self, Context, Vec2};
use tracing::{info, warn};

use crate::contacts::{ContactRecord, CsvTransfer, SaveWorker, spawn_load};
use crate::engine::Engine;

mod graph;
mod render_utils;
mod ui;

pub struct ContactBubblesApp {
    data_file: PathBuf,
    seed: Option<u64>,
    canvas_hint: Vec2,
    state: AppState,
}

enum AppState {
    Loading { rx: Receiver<Vec<ContactRecord>> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    engine: Engine,
    save_worker: SaveWorker,
    saved_revision: u64,
    search: String,
    form: Option<ContactForm>,
    csv_path: String,
    transfer_rx: Option<Receiver<Result<CsvTransfer, String>>>,
    status: Option<String>,
}

/// Editable copy of a contact shown in the side panel. `id` is `None` while
/// creating a new contact.
#[derive(Clone, Debug, Default, PartialEq)]
struct ContactForm {
    id: Option<String>,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    address: String,
    title: String,
    company: String,
    tags: String,
}

impl ContactBubblesApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        data_file: PathBuf,
        seed: Option<u64>,
        canvas_hint: Vec2,
    ) -> Self {
        let state = AppState::Loading {
            rx: spawn_load(data_file.clone()),
        };
        Self {
            data_file,
            seed,
            canvas_hint,
            state,
        }
    }
}

impl eframe::App for ContactBubblesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(records) => {
                        info!(count = records.len(), "contacts ready");
                        let engine = Engine::new(
                            records,
                            self.canvas_hint.x,
                            self.canvas_hint.y,
                            self.seed,
                        );
                        let save_worker = SaveWorker::spawn(self.data_file.clone());
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            engine,
                            save_worker,
                        ))));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        warn!("contact load worker disconnected");
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading contacts...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load contacts");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(AppState::Loading {
                            rx: spawn_load(self.data_file.clone()),
                        });
                    }
                });
            }
            AppState::Ready(model) => {
                model.poll_transfer();
                model.show(ctx, &self.data_file);
                model.persist_if_changed();
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(engine: Engine, save_worker: SaveWorker) -> Self {
        Self {
            saved_revision: engine.contacts_revision(),
            engine,
            save_worker,
            search: String::new(),
            form: None,
            csv_path: String::new(),
            transfer_rx: None,
            status: None,
        }
    }

    fn persist_if_changed(&mut self) {
        let revision = self.engine.contacts_revision();
        if revision == self.saved_revision {
            return;
        }
        self.saved_revision = revision;
        self.save_worker.save(self.engine.records());
    }

    fn poll_transfer(&mut self) {
        let Some(rx) = self.transfer_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(CsvTransfer::Canceled)) => {
                self.status = Some("CSV transfer canceled".to_owned());
            }
            Ok(Ok(CsvTransfer::Imported(records))) => {
                let added = self.engine.import_contacts(records);
                info!(added, "imported contacts from csv");
                self.status = Some(format!("Imported {added} contacts"));
            }
            Ok(Ok(CsvTransfer::Exported { path, count })) => {
                self.status = Some(format!("Exported {count} contacts to {}", path.display()));
            }
            Ok(Err(error)) => {
                warn!(%error, "csv transfer failed");
                self.status = Some(error);
            }
            Err(TryRecvError::Empty) => {
                self.transfer_rx = Some(rx);
            }
            Err(TryRecvError::Disconnected) => {
                self.status = Some("CSV worker disconnected".to_owned());
            }
        }
    }

    fn transfer_pending(&self) -> bool {
        self.transfer_rx.is_some()
    }

    fn open_form_for(&mut self, id: &str) {
        self.form = self
            .engine
            .contact(id)
            .map(|node| ContactForm::from_record(node.record()));
    }
}

impl ContactForm {
    fn from_record(record: &ContactRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            address: record.address.clone(),
            title: record.title.clone(),
            company: record.company.clone(),
            tags: record.tags.join(", "),
        }
    }

    fn to_record(&self) -> ContactRecord {
        ContactRecord {
            id: self.id.clone().unwrap_or_default(),
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: self.address.trim().to_owned(),
            title: self.title.trim().to_owned(),
            company: self.company.trim().to_owned(),
            tags: crate::contacts::parse_tag_list(&self.tags, ','),
        }
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
