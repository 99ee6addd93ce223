use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shiftalarm_core::{AlarmDefaults, Fallback};
use shiftalarm_ingest::ParserConfig;
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_shiftalarm_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone for exporting wall-clock alarms as absolute instants.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub alarms: AlarmDefaults,
    #[serde(default)]
    pub recognition: ParserConfig,
    #[serde(default)]
    pub classifier: ClassifierSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    #[default]
    FirstShift,
    Unclassified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    pub fallback: FallbackMode,
    pub unclassified_label: String,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            fallback: FallbackMode::FirstShift,
            unclassified_label: "未识别".to_string(),
        }
    }
}

impl ClassifierSection {
    pub fn fallback(&self) -> Fallback {
        match self.fallback {
            FallbackMode::FirstShift => Fallback::FirstShift,
            FallbackMode::Unclassified => Fallback::Unclassified(self.unclassified_label.clone()),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Shanghai".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            alarms: AlarmDefaults::default(),
            recognition: ParserConfig::default(),
            classifier: ClassifierSection::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_shiftalarm_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[classifier]
fallback = "unclassified"
unclassified_label = "??"

[recognition]
origin = "bottom-left"
"#,
        )
        .unwrap();
        assert_eq!(cfg.timezone, "Asia/Shanghai");
        assert_eq!(cfg.alarms.wake_offset_minutes, -90);
        assert_eq!(cfg.classifier.fallback(), Fallback::Unclassified("??".into()));
        assert_eq!(cfg.recognition.origin, shiftalarm_ingest::BoxOrigin::BottomLeft);
        assert_eq!(cfg.recognition.column_tolerance, 0.08);
    }

    #[test]
    fn test_default_config_serializes() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(s.contains("wake_offset_minutes = -90"));
        assert!(s.contains("fallback = \"first-shift\""));
    }
}
