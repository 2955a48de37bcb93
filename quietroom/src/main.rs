//! QuietRoom, a fullscreen distraction-free text editor.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod autosave;
mod buffer;
mod config;
mod dialogs;
mod scroll;

use app::RoomApp;
use std::path::PathBuf;

const HELP: &str = "\
quietroom, a distraction-free text editor

usage: quietroom [options] [file ...]

options:
  -s, --style <name>   use the named theme for this session
      --lang <tag>     interface language (e.g. en-US, fr)
  -v, --version        print version and exit
  -h, --help           print this help and exit
";

struct Args {
    style: Option<String>,
    lang: Option<String>,
    files: Vec<PathBuf>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }
    if pargs.contains(["-v", "--version"]) {
        println!("quietroom {}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    let args = Args {
        style: pargs.opt_value_from_str(["-s", "--style"])?,
        lang: pargs.opt_value_from_str("--lang")?,
        files: pargs
            .finish()
            .into_iter()
            .map(PathBuf::from)
            .collect(),
    };
    Ok(args)
}

fn main() -> eframe::Result<()> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprint!("{}", HELP);
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("QuietRoom")
            .with_app_id("org.quietroom.quietroom")
            .with_fullscreen(true),
        ..Default::default()
    };

    eframe::run_native(
        "quietroom",
        options,
        Box::new(move |cc| Box::new(RoomApp::new(cc, args.style, args.lang, args.files))),
    )
}
