mod app;
mod contacts;
mod engine;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui::vec2;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file the contact list is loaded from and saved to.
    #[arg(long, default_value = "contacts.json")]
    data_file: PathBuf,

    /// Seed for placement and drift, for reproducible layouts.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 820.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    tracing::info!(data_file = %args.data_file.display(), seed = ?args.seed, "starting");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "Contact Bubbles",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ContactBubblesApp::new(
                cc,
                args.data_file.clone(),
                args.seed,
                vec2(args.width, args.height),
            )))
        }),
    )
}
