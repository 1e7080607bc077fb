//! Astrax - modal terminal text editor.
//!
//! Usage: astrax [--dump] [FILE]

use astrax_core::EditorConfig;
use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "Usage: astrax [--dump] [FILE]

Options:
  --dump    Render one 80x24 frame to stdout and exit
  --help    Show this message";

/// Frame size used by `--dump`.
const DUMP_WIDTH: usize = 80;
const DUMP_HEIGHT: usize = 24;

fn init_logging(to_stderr: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    // The editor owns the screen, so interactive sessions log to a file.
    if !to_stderr {
        let path = env::temp_dir().join("astrax.log");
        match File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Failed to create log file {}: {}", path.display(), e);
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

fn main() -> ExitCode {
    let mut dump = false;
    let mut file: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dump" => dump = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return ExitCode::SUCCESS;
            }
            flag if flag.starts_with("--") => {
                eprintln!("Unknown option: {}\n\n{}", flag, USAGE);
                return ExitCode::FAILURE;
            }
            path => file = Some(PathBuf::from(path)),
        }
    }

    init_logging(dump);
    log::info!("Starting Astrax");
    if let Some(path) = &file {
        log::info!("Opening file: {}", path.display());
    }

    let config = EditorConfig::default();
    let result = if dump {
        astrax_ui::dump(file, config, DUMP_WIDTH, DUMP_HEIGHT).map(|frame| println!("{}", frame))
    } else {
        astrax_ui::run(file, config)
    };

    match result {
        Ok(()) => {
            log::info!("Astrax exited");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Editor failed: {}", e);
            eprintln!("astrax: {}", e);
            ExitCode::FAILURE
        }
    }
}
