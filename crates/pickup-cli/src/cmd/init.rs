use anyhow::Context;
use pickup_core::{
    backend::{json_file::Document, JsonFileBackend},
    config::{Config, StorageConfig, WarnLevel},
    paths,
};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing pickup schedule in: {}", root.display());

    let dir = paths::pickup_dir(root);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    let config = Config::load(root).context("failed to load config")?;
    match &config.storage {
        StorageConfig::JsonFile { path } => {
            let backend = JsonFileBackend::new(paths::data_path(root, path));
            if backend.path().exists() {
                println!("  exists:  {}", path.display());
            } else {
                backend
                    .write(&Document::default())
                    .context("failed to write schedule file")?;
                println!("  created: {}", path.display());
            }
        }
        StorageConfig::Sheets { spreadsheet_id, .. } => {
            println!("  storage: spreadsheet {spreadsheet_id}");
        }
    }

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!();
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "note",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    Ok(())
}
