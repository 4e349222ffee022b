//! Binary entry point: open the contact database, start logging, and drive
//! the Ratatui event loop until the user exits.
use contact_book::{data_dir, init_logging, run_app, App, RecordStore};

fn main() -> anyhow::Result<()> {
    let log_path = init_logging(&data_dir()?)?;
    tracing::info!(log = %log_path.display(), "starting contact book");

    let store = RecordStore::open_default()?;
    let mut app = App::new(store)?;
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!(error = %err, "contact book exited with an error");
    }
    result
}
