use clap::Parser;

use taskbubble::app::TaskBubbleApp;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "board.json")]
    board: String,

    #[arg(long)]
    seed: Option<String>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TaskBubble",
        options,
        Box::new(move |cc| {
            Ok(Box::new(TaskBubbleApp::new(
                cc,
                args.board.clone(),
                args.seed.clone(),
            )))
        }),
    )
}
