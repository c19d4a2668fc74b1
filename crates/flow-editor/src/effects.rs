use crate::store::{NoticeLevel, Store};
use std::path::PathBuf;
use tracing::warn;

/// Deferred effects that must run outside the main reducer (e.g., file IO)
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Export the scenario and settings to disk
    SaveToFile { path: PathBuf },
    /// Import a project from disk, replacing the open scenario
    LoadFromFile { path: PathBuf },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, effect: Effect) {
    match effect {
        Effect::SaveToFile { path } => match store.save_to_file(&path) {
            Ok(()) => store.notify(
                NoticeLevel::Info,
                format!("Saved to {}", path.display()),
            ),
            Err(e) => {
                warn!(error = %e, "export failed");
                store.notify(NoticeLevel::Error, e.to_string());
            }
        },
        Effect::LoadFromFile { path } => {
            if let Err(e) = store.load_from_file(&path) {
                warn!(error = %e, "import failed");
                store.notify(NoticeLevel::Error, e.to_string());
            }
        }
    }
}
