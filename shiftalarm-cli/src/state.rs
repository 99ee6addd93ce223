use anyhow::{Context, Result};
use shiftalarm_core::{AlarmDefaults, ShiftCatalog, default_catalog};
use std::fs;
use std::path::{Path, PathBuf};

/// `$SHIFTALARM_HOME`, or `~/.shiftalarm`.
pub fn shiftalarm_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SHIFTALARM_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".shiftalarm"))
}

pub fn ensure_shiftalarm_home() -> Result<PathBuf> {
    let dir = shiftalarm_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn catalog_path() -> Result<PathBuf> {
    Ok(ensure_shiftalarm_home()?.join("catalog.toml"))
}

pub fn store_path() -> Result<PathBuf> {
    Ok(ensure_shiftalarm_home()?.join("store.json"))
}

pub fn scheduler_queue_path() -> Result<PathBuf> {
    Ok(ensure_shiftalarm_home()?.join("scheduler").join("calls.jsonl"))
}

pub fn read_catalog(path: &Path) -> Result<ShiftCatalog> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_catalog(path: &Path, catalog: &ShiftCatalog) -> Result<()> {
    let s = toml::to_string_pretty(catalog).context("serialize catalog")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Catalog on disk, or the default catalog when none has been written yet.
pub fn load_catalog(defaults: &AlarmDefaults) -> Result<ShiftCatalog> {
    let p = catalog_path()?;
    if !p.exists() {
        return Ok(default_catalog(defaults));
    }
    read_catalog(&p)
}
