//! Emoji Art replay binary.

use clap::Parser;
use emojiart_core::EditorConfig;
use emojiart_replay::{ReplayError, Script, load_document, open_canvas, replay};
use std::path::PathBuf;

/// Replay recorded input events against an Emoji Art document and print
/// the resulting document as JSON.
#[derive(Debug, Parser)]
#[command(name = "emojiart-replay", version)]
struct Args {
    /// JSON script of input events.
    script: PathBuf,
    /// Editor config file (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Document to start from instead of an empty one.
    #[arg(short, long)]
    document: Option<PathBuf>,
    /// Write the resulting document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), ReplayError> {
    let config = match &args.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    let document = args.document.as_deref().map(load_document).transpose()?;
    let script = Script::from_file(&args.script)?;

    let canvas = open_canvas(config, document);
    replay(&canvas, script);

    let json = canvas.read(|canvas| canvas.document.to_json())?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| ReplayError::Io {
                path: path.clone(),
                source,
            })?;
            log::info!("Saved document to: {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting Emoji Art replay");

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
