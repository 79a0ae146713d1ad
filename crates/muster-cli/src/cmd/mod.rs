pub mod config;
pub mod init;
pub mod reconcile;
pub mod roster;
pub mod setup;
pub mod subject;
pub mod update;
pub mod zen;

use muster_core::file_store::FileStore;
use muster_core::service::Muster;
use std::path::Path;

/// Construct the engine over the workspace's file-backed store.
pub(crate) fn service(root: &Path) -> Muster<FileStore> {
    Muster::new(FileStore::new(root))
}
