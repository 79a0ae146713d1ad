use anyhow::Context;
use muster_core::file_store::FileStore;
use muster_core::paths;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    FileStore::init(root).context("failed to scaffold .muster directory")?;
    println!("initialized {}", paths::muster_dir(root).display());
    Ok(())
}
