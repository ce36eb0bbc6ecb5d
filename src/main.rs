mod app;
mod docs;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the analyzed document collection (JSON).
    #[arg(long)]
    documents: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "doc-mindmap",
        options,
        Box::new(move |cc| Ok(Box::new(app::MindMapApp::new(cc, args.documents.clone())))),
    )
}
