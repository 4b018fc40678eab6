//! Record loading on background threads, with a native file dialog (rfd).

use crossbeam_channel::Sender;

use loaddesk_core::source::{self, TabularSource};

use crate::state::{AppMessage, LogEntry};

/// Open a file dialog and load the chosen CSV in a background thread.
pub fn open_records(tx: Sender<AppMessage>) {
    std::thread::spawn(move || {
        let path = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .add_filter("All files", &["*"])
            .set_title("Open driver/carrier records")
            .pick_file();

        match path {
            Some(path) => load_records(TabularSource::File(path), tx),
            None => {
                let _ = tx.send(AppMessage::LoadCancelled);
            }
        }
    });
}

/// Load and deduplicate the records at `source` in a background thread.
///
/// Never reports failure as such: an unreadable source arrives as an empty
/// directory, with a warning on the console.
pub fn load_records(source: TabularSource, tx: Sender<AppMessage>) {
    std::thread::spawn(move || {
        let _ = tx.send(AppMessage::Log(LogEntry::info(format!(
            "Loading records from {}...",
            source
        ))));

        let directory = source::blocking::load_directory(&source);
        let entry = if directory.is_empty() {
            LogEntry::warning(format!(
                "No drivers or carriers found in {}; lists are empty",
                source
            ))
        } else {
            LogEntry::success(format!(
                "Loaded {} carriers and {} drivers from {}",
                directory.carriers.len(),
                directory.drivers.len(),
                source
            ))
        };
        let _ = tx.send(AppMessage::Log(entry));
        let _ = tx.send(AppMessage::DirectoryLoaded { source, directory });
    });
}

/// The feed loaded at startup: the first CLI argument, else the well-known file.
pub fn startup_source() -> TabularSource {
    std::env::args()
        .nth(1)
        .map(|arg| TabularSource::from_str_or_url(&arg))
        .unwrap_or_default()
}
