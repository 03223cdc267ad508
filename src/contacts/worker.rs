use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use super::csv::{import_csv, write_csv};
use super::record::ContactRecord;
use super::store::{load_contacts, save_contacts};

#[derive(Debug)]
pub enum CsvTransfer {
    Canceled,
    Imported(Vec<ContactRecord>),
    Exported { path: PathBuf, count: usize },
}

pub fn spawn_load(path: PathBuf) -> Receiver<Vec<ContactRecord>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let _ = tx.send(load_contacts(&path));
    });

    rx
}

/// Single writer for the contact file.
///
/// Snapshots queued while a write is in flight are coalesced: only the most
/// recent one is written next. Dropping the worker finishes pending writes.
pub struct SaveWorker {
    tx: Option<Sender<Vec<ContactRecord>>>,
    handle: Option<JoinHandle<()>>,
}

impl SaveWorker {
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel::<Vec<ContactRecord>>();

        let handle = thread::spawn(move || {
            while let Ok(mut snapshot) = rx.recv() {
                let mut skipped = 0usize;
                while let Ok(newer) = rx.try_recv() {
                    snapshot = newer;
                    skipped += 1;
                }

                match save_contacts(&path, &snapshot) {
                    Ok(()) => tracing::debug!(
                        count = snapshot.len(),
                        coalesced = skipped,
                        "saved contacts"
                    ),
                    Err(error) => tracing::warn!("failed to save contacts: {error:#}"),
                }
            }
        });

        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn save(&self, records: Vec<ContactRecord>) {
        let sent = self
            .tx
            .as_ref()
            .is_some_and(|tx| tx.send(records).is_ok());
        if !sent {
            tracing::warn!("save worker stopped; contact changes are not being persisted");
        }
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("save worker panicked before finishing");
        }
    }
}

pub fn spawn_import(path: String) -> Receiver<Result<CsvTransfer, String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = read_import(path.trim()).map_err(|error| format!("{error:#}"));
        let _ = tx.send(result);
    });

    rx
}

pub fn spawn_export(
    path: String,
    records: Vec<ContactRecord>,
) -> Receiver<Result<CsvTransfer, String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = write_export(path.trim(), &records).map_err(|error| format!("{error:#}"));
        let _ = tx.send(result);
    });

    rx
}

fn read_import(path: &str) -> Result<CsvTransfer> {
    if path.is_empty() {
        return Ok(CsvTransfer::Canceled);
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read CSV file {path}"))?;
    let records = import_csv(&content);
    tracing::info!(path, count = records.len(), "imported contacts from CSV");
    Ok(CsvTransfer::Imported(records))
}

fn write_export(path: &str, records: &[ContactRecord]) -> Result<CsvTransfer> {
    if path.is_empty() {
        return Ok(CsvTransfer::Canceled);
    }

    let file = File::create(path).with_context(|| format!("failed to create CSV file {path}"))?;
    write_csv(file, records).with_context(|| format!("failed to write CSV file {path}"))?;
    tracing::info!(path, count = records.len(), "exported contacts to CSV");
    Ok(CsvTransfer::Exported {
        path: PathBuf::from(path),
        count: records.len(),
    })
}
