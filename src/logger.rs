use log::LevelFilter;
use env_logger::{Builder, Target};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use chrono::Local;

/// Installs the global logger, appending to `log_file`.
///
/// Falls back to stderr when the file cannot be opened.
pub fn init(log_file: &Path) {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "[{}] [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info);

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Could not open log file {:?}: {}. Logging to stderr.", log_file, e),
    }

    // Already installed (e.g. a second init in the same process).
    if builder.try_init().is_err() {
        return;
    }

    log::info!("Logger initialized.");
}
