mod csv;
mod record;
mod store;
mod worker;

pub use record::{ContactRecord, parse_tag_list};
pub use worker::{CsvTransfer, SaveWorker, spawn_export, spawn_import, spawn_load};
